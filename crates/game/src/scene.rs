//! Boundary to whatever draws the world.
//!
//! The game never builds meshes. It tells a [`Scene`] which objects exist,
//! where they are and what they look like ([`ObjectKind`]); objects are
//! identified by their registry entity.

use std::collections::HashMap;

use engine_core::{Entity, Transform, Vec3};
use physics::Aabb;
use procgen::{BalloonColor, BiomeType, GroundKind, RewardKind, TreeSpecies, VegetationKind};

use crate::camera::CameraView;
use crate::world::DecorKind;

/// What an object looks like, for the renderer.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectKind {
    Car,
    Ground { kind: GroundKind, biome: BiomeType, size: f32 },
    Road { width: f32, length: f32, markings: Vec<Vec3> },
    Tree { species: TreeSpecies, scale: f32 },
    /// A tree or cactus after the car went through it.
    Debris { of: DecorKind, scale: f32 },
    Boulder { size: f32, rotation: Vec3 },
    Vegetation { kind: VegetationKind, scale: f32 },
    Rock { size: f32 },
    Reward(RewardKind),
    RockDust,
    Splinter,
    BalloonShred(BalloonColor),
    Sparkle,
}

/// Rendering collaborator.
pub trait Scene {
    fn add_object(&mut self, id: Entity, kind: &ObjectKind, transform: &Transform);

    fn remove_object(&mut self, id: Entity);

    fn set_transform(&mut self, id: Entity, transform: &Transform);

    /// Mesh-accurate world bounds, when the renderer has them. `None` makes
    /// the game fall back to the object's nominal bounds.
    fn world_bounds(&self, _id: Entity) -> Option<Aabb> {
        None
    }

    fn render(&mut self, camera: &CameraView);
}

/// In-memory scene: keeps the latest state of every object. Used for
/// headless runs and tests.
#[derive(Debug, Default)]
pub struct RecordingScene {
    pub objects: HashMap<Entity, (ObjectKind, Transform)>,
    pub bounds_overrides: HashMap<Entity, Aabb>,
    pub added: usize,
    pub removed: usize,
    pub frames: u64,
    pub last_camera: Option<CameraView>,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: Entity) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn kind(&self, id: Entity) -> Option<&ObjectKind> {
        self.objects.get(&id).map(|(kind, _)| kind)
    }

    pub fn transform(&self, id: Entity) -> Option<&Transform> {
        self.objects.get(&id).map(|(_, t)| t)
    }

    pub fn count(&self, pred: impl Fn(&ObjectKind) -> bool) -> usize {
        self.objects.values().filter(|(kind, _)| pred(kind)).count()
    }
}

impl Scene for RecordingScene {
    fn add_object(&mut self, id: Entity, kind: &ObjectKind, transform: &Transform) {
        self.added += 1;
        self.objects.insert(id, (kind.clone(), *transform));
    }

    fn remove_object(&mut self, id: Entity) {
        if self.objects.remove(&id).is_some() {
            self.removed += 1;
        }
        self.bounds_overrides.remove(&id);
    }

    fn set_transform(&mut self, id: Entity, transform: &Transform) {
        if let Some((_, t)) = self.objects.get_mut(&id) {
            *t = *transform;
        }
    }

    fn world_bounds(&self, id: Entity) -> Option<Aabb> {
        self.bounds_overrides.get(&id).copied()
    }

    fn render(&mut self, camera: &CameraView) {
        self.frames += 1;
        self.last_camera = Some(*camera);
    }
}
