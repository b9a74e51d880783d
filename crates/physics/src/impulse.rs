//! Closed-form contact response between the vehicle and a rolling body.

use engine_core::heading_forward;
use glam::Vec3;

/// Parameters of the vehicle/rock contact model.
#[derive(Debug, Clone, Copy)]
pub struct ContactModel {
    /// Bounciness of the contact (0 = inelastic, 1 = elastic).
    pub restitution: f32,
    /// Effective mass of the vehicle.
    pub vehicle_mass: f32,
    /// Floor for the closing speed so slow bumps still register.
    pub min_relative_speed: f32,
}

impl Default for ContactModel {
    fn default() -> Self {
        Self {
            restitution: 0.7,
            vehicle_mass: 20.0,
            min_relative_speed: 5.0,
        }
    }
}

/// Result of resolving one contact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Closing speed used for the response.
    pub relative_speed: f32,
    /// Scalar impact strength (drives damage and audio).
    pub impact_force: f32,
    /// Unit vector from the vehicle centre to the other body's centre.
    pub normal: Vec3,
}

impl ContactModel {
    /// Evaluate a contact between the vehicle (speed, heading) and a body
    /// whose centre lies at `other_center`.
    pub fn contact(&self, vehicle_center: Vec3, other_center: Vec3, speed: f32, heading: f32) -> Contact {
        let normal = (other_center - vehicle_center).normalize_or_zero();
        let relative_speed = sanitize(speed).abs().max(self.min_relative_speed);
        let alignment = normal.dot(heading_forward(heading)).abs();
        Contact {
            relative_speed,
            impact_force: relative_speed * (0.5 + alignment * 0.5),
            normal,
        }
    }

    /// Impulse magnitude transferred to a body of `mass`.
    pub fn impulse_magnitude(&self, relative_speed: f32, mass: f32) -> f32 {
        let mass = sanitize(mass).max(0.0);
        let total = self.vehicle_mass + mass;
        if total <= 0.0 {
            return 0.0;
        }
        (1.0 + self.restitution) * relative_speed * (mass / total)
    }
}

/// Component of an impulse across the vehicle's heading; positive values
/// nudge the heading one way, negative the other.
pub fn lateral_component(impulse: Vec3, heading: f32) -> f32 {
    impulse.x * heading.cos() + impulse.z * heading.sin()
}

/// Replace NaN/infinite inputs with zero.
pub fn sanitize(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slow_contacts_use_minimum_speed() {
        let model = ContactModel::default();
        let c = model.contact(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 0.0, 0.0);
        assert_eq!(c.relative_speed, 5.0);
        // Side-on hit: normal is perpendicular to heading.
        assert!((c.impact_force - 2.5).abs() < 1e-5);
    }

    #[test]
    fn head_on_contact_has_full_force() {
        let model = ContactModel::default();
        let c = model.contact(Vec3::ZERO, Vec3::new(0.0, 0.0, 5.0), 40.0, 0.0);
        assert!((c.impact_force - 40.0).abs() < 1e-4);
    }

    #[test]
    fn impulse_matches_reduced_mass_formula() {
        let model = ContactModel::default();
        // (1 + 0.7) * 10 * (5 / 25)
        assert!((model.impulse_magnitude(10.0, 5.0) - 3.4).abs() < 1e-5);
    }

    #[test]
    fn nan_speed_is_treated_as_stationary() {
        let model = ContactModel::default();
        let c = model.contact(Vec3::ZERO, Vec3::Z, f32::NAN, 0.0);
        assert_eq!(c.relative_speed, 5.0);
    }
}
