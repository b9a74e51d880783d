//! Player vehicle controller and state.

use std::time::Duration;

use engine_core::{heading_forward, Health, Transform, Vec3};
use input::{Control, ControlSource};
use physics::sanitize;

/// Where the car starts and where `Reset` puts it.
pub const SPAWN_POSITION: Vec3 = Vec3::new(0.0, 3.0, 0.0);
/// Longest step the driving model integrates at once.
pub const MAX_DRIVE_DT: f32 = 0.1;
/// Speed above which steering or braking squeals the tyres.
pub const SCREECH_SPEED: f32 = 50.0;
pub const SCREECH_COOLDOWN: Duration = Duration::from_millis(500);

/// Outcome of one driving step, for audio and HUD.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveReport {
    pub screech: bool,
    pub reset: bool,
    /// Change in speed per second this step.
    pub acceleration: f32,
}

/// Arcade car: a heading and a scalar forward speed.
pub struct PlayerVehicle {
    pub transform: Transform,
    /// Yaw in radians; 0 faces +Z.
    pub heading: f32,
    /// Forward speed in units per second (negative = reversing).
    pub speed: f32,
    pub health: Health,
    pub score: u32,
    pub acceleration: f32,
    pub max_speed: f32,
    pub deceleration: f32,
    pub brake_strength: f32,
    last_screech: Option<Duration>,
}

impl PlayerVehicle {
    pub fn new(max_health: f32) -> Self {
        Self {
            transform: Transform::from_position(SPAWN_POSITION),
            heading: 0.0,
            speed: 0.0,
            health: Health::new(max_health),
            score: 0,
            acceleration: 20.0,
            max_speed: 180.0,
            deceleration: 15.0,
            brake_strength: 40.0,
            last_screech: None,
        }
    }

    /// Get player position.
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Unit vector the car points along.
    pub fn forward(&self) -> Vec3 {
        heading_forward(self.heading)
    }

    /// Back to the spawn point, stopped, facing +Z. Health and score stay.
    pub fn reset(&mut self) {
        self.transform.position = SPAWN_POSITION;
        self.speed = 0.0;
        self.heading = 0.0;
        self.transform.set_yaw(0.0);
    }

    /// Apply one frame of controls and integrate position.
    pub fn drive(&mut self, controls: &impl ControlSource, dt: f32, now: Duration) -> DriveReport {
        let dt = sanitize(dt).clamp(0.0, MAX_DRIVE_DT);
        self.speed = sanitize(self.speed);
        let previous_speed = self.speed;
        let mut wants_screech = false;

        if controls.is_held(Control::SteerLeft) {
            self.heading += dt * 0.2 * (self.speed / 30.0);
            wants_screech |= self.speed.abs() > SCREECH_SPEED;
        }
        if controls.is_held(Control::SteerRight) {
            self.heading -= dt * 0.1 * (self.speed / 30.0);
            wants_screech |= self.speed.abs() > SCREECH_SPEED;
        }

        if controls.is_held(Control::Accelerate) {
            self.speed = (self.speed + self.acceleration * dt).min(self.max_speed);
        } else if controls.is_held(Control::Brake) {
            if self.speed > 0.0 {
                wants_screech |= self.speed > SCREECH_SPEED;
                self.speed -= self.brake_strength * dt;
            } else {
                // Max reverse speed is half
                self.speed = (self.speed - self.acceleration * dt).max(-self.max_speed / 2.0);
            }
        } else if self.speed.abs() < self.deceleration * dt {
            self.speed = 0.0;
        } else {
            self.speed -= self.deceleration * dt * self.speed.signum();
        }

        let reset = controls.is_held(Control::Reset);
        if reset {
            self.reset();
        }

        self.heading = sanitize(self.heading);
        self.transform.set_yaw(self.heading);
        let (sin, cos) = self.heading.sin_cos();
        self.transform.position.x += sin * self.speed * dt;
        self.transform.position.z += cos * self.speed * dt;

        let screech = wants_screech && self.screech_ready(now);
        if screech {
            self.last_screech = Some(now);
        }

        DriveReport {
            screech,
            reset,
            acceleration: if dt > 0.0 { (self.speed - previous_speed) / dt } else { 0.0 },
        }
    }

    fn screech_ready(&self, now: Duration) -> bool {
        self.last_screech
            .map_or(true, |last| now.saturating_sub(last) >= SCREECH_COOLDOWN)
    }

    /// Stop dead (game over).
    pub fn halt(&mut self) {
        self.speed = 0.0;
    }

    /// Display speed, always non-negative.
    pub fn display_speed(&self) -> f32 {
        self.speed.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::ControlSet;

    const FRAME: f32 = 1.0 / 60.0;

    #[test]
    fn accelerates_to_cap() {
        let mut car = PlayerVehicle::new(100.0);
        let controls = ControlSet::new().holding(Control::Accelerate);
        for i in 0..2_000 {
            car.drive(&controls, 0.1, Duration::from_millis(i * 100));
        }
        assert_eq!(car.speed, 180.0);
    }

    #[test]
    fn reverse_is_capped_at_half_speed() {
        let mut car = PlayerVehicle::new(100.0);
        let controls = ControlSet::new().holding(Control::Brake);
        for i in 0..2_000 {
            car.drive(&controls, 0.1, Duration::from_millis(i * 100));
        }
        assert_eq!(car.speed, -90.0);
    }

    #[test]
    fn coasting_comes_to_rest() {
        let mut car = PlayerVehicle::new(100.0);
        car.speed = 10.0;
        let idle = ControlSet::new();
        for i in 0..100 {
            car.drive(&idle, 0.1, Duration::from_millis(i * 100));
        }
        assert_eq!(car.speed, 0.0);
    }

    #[test]
    fn moves_along_heading() {
        let mut car = PlayerVehicle::new(100.0);
        car.speed = 10.0;
        car.heading = std::f32::consts::FRAC_PI_2;
        car.drive(&ControlSet::new().holding(Control::Accelerate), 0.1, Duration::ZERO);
        // Speed is 12 after accelerating, facing +X.
        assert!((car.position().x - 1.2).abs() < 1e-4);
        assert!(car.position().z.abs() < 1e-4);
    }

    #[test]
    fn steering_left_turns_twice_as_fast_as_right() {
        let mut left = PlayerVehicle::new(100.0);
        let mut right = PlayerVehicle::new(100.0);
        left.speed = 30.0;
        right.speed = 30.0;
        left.drive(&ControlSet::new().holding(Control::SteerLeft), 0.1, Duration::ZERO);
        right.drive(&ControlSet::new().holding(Control::SteerRight), 0.1, Duration::ZERO);
        assert!(left.heading > 0.0 && right.heading < 0.0);
        assert!((left.heading + 2.0 * right.heading).abs() < 1e-4);
    }

    #[test]
    fn screech_is_rate_limited() {
        let mut car = PlayerVehicle::new(100.0);
        car.speed = 100.0;
        let steer = ControlSet::new().holding(Control::SteerLeft);
        assert!(car.drive(&steer, FRAME, Duration::ZERO).screech);
        assert!(!car.drive(&steer, FRAME, Duration::from_millis(100)).screech);
        assert!(car.drive(&steer, FRAME, Duration::from_millis(600)).screech);
    }

    #[test]
    fn nan_speed_is_zeroed() {
        let mut car = PlayerVehicle::new(100.0);
        car.speed = f32::NAN;
        car.drive(&ControlSet::new(), FRAME, Duration::ZERO);
        assert_eq!(car.speed, 0.0);
        assert!(car.position().is_finite());
    }

    #[test]
    fn reset_returns_to_spawn() {
        let mut car = PlayerVehicle::new(100.0);
        car.speed = 50.0;
        car.heading = 1.0;
        car.transform.position = Vec3::new(500.0, 3.0, 900.0);
        car.drive(&ControlSet::new().holding(Control::Reset), FRAME, Duration::ZERO);
        assert_eq!(car.position(), SPAWN_POSITION);
        assert_eq!(car.speed, 0.0);
        assert_eq!(car.heading, 0.0);
    }
}
