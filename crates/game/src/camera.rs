//! Chase camera rig.

use engine_core::{Quat, Vec3};

/// Where the renderer should look from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub position: Vec3,
    pub target: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    /// Behind and above the car, turning with it.
    Follow,
    /// Slow orbit around the car.
    Orbit,
}

/// Chase offset in car space: up and behind.
pub const FOLLOW_OFFSET: Vec3 = Vec3::new(0.0, 12.0, -40.0);
const ORBIT_RADIUS: f32 = 60.0;
const ORBIT_HEIGHT: f32 = 25.0;
/// Radians per second.
const ORBIT_SPEED: f32 = 0.25;

#[derive(Debug, Clone)]
pub struct CameraRig {
    pub mode: CameraMode,
    orbit_angle: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            mode: CameraMode::Follow,
            orbit_angle: 0.0,
        }
    }
}

impl CameraRig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) -> CameraMode {
        self.mode = match self.mode {
            CameraMode::Follow => CameraMode::Orbit,
            CameraMode::Orbit => CameraMode::Follow,
        };
        log::debug!("Camera mode: {:?}", self.mode);
        self.mode
    }

    pub fn update(&mut self, dt: f32) {
        if self.mode == CameraMode::Orbit {
            self.orbit_angle = (self.orbit_angle + ORBIT_SPEED * dt) % std::f32::consts::TAU;
        }
    }

    pub fn view(&self, car_position: Vec3, heading: f32) -> CameraView {
        match self.mode {
            CameraMode::Follow => CameraView {
                position: car_position + Quat::from_rotation_y(heading) * FOLLOW_OFFSET,
                target: car_position,
            },
            CameraMode::Orbit => {
                let (s, c) = self.orbit_angle.sin_cos();
                CameraView {
                    position: car_position + Vec3::new(s * ORBIT_RADIUS, ORBIT_HEIGHT, c * ORBIT_RADIUS),
                    target: car_position + Vec3::new(0.0, 3.0, 0.0),
                }
            }
        }
    }
}
