//! Registry components and the spawn/despawn paths for world objects.
//!
//! Every object in the world is a `hecs` entity carrying a [`Transform`],
//! a [`Bounds`] and, if anything can touch it, a [`Collidable`]. Despawning
//! the entity is the only way an object leaves the world, so removing
//! something twice is harmless.

use std::time::Duration;

use engine_core::{Entity, Transform, Vec3, World};
use physics::Bounds;
use procgen::{
    BoulderPlacement, ChunkContent, ChunkCoord, RewardKind, RewardPlacement, TreePlacement, TreeSpecies,
    VegetationKind, VegetationPlacement,
};

use crate::scene::{ObjectKind, Scene};

/// Half extents of the car body.
pub const CAR_HALF_EXTENTS: Vec3 = Vec3::new(4.0, 3.75, 11.5);
/// Half size of a reward's box.
pub const REWARD_HALF_SIZE: f32 = 1.2;
/// Rock collision radius per unit of size.
pub const ROCK_RADIUS_PER_SIZE: f32 = 2.5;

/// Static roadside object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DecorKind {
    Tree(TreeSpecies),
    Cactus,
    Boulder,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decor {
    pub kind: DecorKind,
    pub scale: f32,
    pub destroyed: bool,
}

impl Decor {
    /// Only trees break when hit; cacti and boulders are scenery.
    pub fn is_destructible(&self) -> bool {
        matches!(self.kind, DecorKind::Tree(_))
    }
}

/// Rolling rock hazard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RollingRock {
    /// Travel direction in the ground plane: moves along `(cos, sin)` in `(x, z)`.
    pub direction: f32,
    pub speed: f32,
    pub mass: f32,
    pub size: f32,
    pub damage: f32,
    pub spawned_at: Duration,
    /// Accumulated roll angle (visual only).
    pub roll: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reward {
    pub kind: RewardKind,
    pub collected: bool,
    /// Ground position the idle animation hovers around.
    pub anchor: Vec3,
}

/// Anything the car can touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collidable {
    Decor(Decor),
    Hazard(RollingRock),
    Reward(Reward),
}

impl Collidable {
    /// Still takes part in collision tests.
    pub fn is_live(&self) -> bool {
        match self {
            Collidable::Decor(d) => !d.destroyed,
            Collidable::Hazard(_) => true,
            Collidable::Reward(r) => !r.collected,
        }
    }
}

/// Marks an entity as part of a chunk; it goes away with the chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkOwned(pub ChunkCoord);

/// Marks the player's car.
#[derive(Debug, Clone, Copy)]
pub struct CarBody;

/// Remove an entity from the registry and the scene. No-op if it is
/// already gone.
pub fn despawn(registry: &mut World, scene: &mut impl Scene, entity: Entity) -> bool {
    if registry.despawn(entity).is_ok() {
        scene.remove_object(entity);
        true
    } else {
        false
    }
}

pub fn spawn_car(registry: &mut World, scene: &mut impl Scene, transform: Transform) -> Entity {
    let entity = registry.spawn((CarBody, transform, Bounds::new(CAR_HALF_EXTENTS)));
    scene.add_object(entity, &ObjectKind::Car, &transform);
    entity
}

/// Nominal bounds for a tree of the given species and scale.
pub fn tree_bounds(species: TreeSpecies, scale: f32) -> Bounds {
    let (radius, height) = match species {
        TreeSpecies::Pine => (0.4, 3.0),
        TreeSpecies::Oak => (0.5, 2.6),
        TreeSpecies::Palm => (0.3, 3.2),
    };
    Bounds::standing(Vec3::new(radius * scale, height * scale, radius * scale))
}

pub fn cactus_bounds(scale: f32) -> Bounds {
    Bounds::standing(Vec3::new(0.5 * scale, 1.5 * scale, 0.5 * scale))
}

pub fn rock_bounds(size: f32) -> Bounds {
    Bounds::cube(ROCK_RADIUS_PER_SIZE * size)
}

/// Materialise generated chunk content as entities. Returns everything the
/// chunk owns.
pub fn spawn_chunk(
    content: &ChunkContent,
    chunk_size: f32,
    registry: &mut World,
    scene: &mut impl Scene,
) -> Vec<Entity> {
    let owner = ChunkOwned(content.coord);
    let origin = content.coord.origin(chunk_size);
    let mut entities = Vec::new();

    let ground = Transform::from_position(origin);
    let kind = ObjectKind::Ground {
        kind: content.ground,
        biome: content.biome,
        size: chunk_size,
    };
    let entity = registry.spawn((owner, ground));
    scene.add_object(entity, &kind, &ground);
    entities.push(entity);

    if let Some(road) = &content.road {
        let transform = Transform::from_position(road.center + Vec3::new(0.0, 0.01, 0.0));
        let kind = ObjectKind::Road {
            width: road.width,
            length: road.length,
            markings: road.markings.clone(),
        };
        let entity = registry.spawn((owner, transform));
        scene.add_object(entity, &kind, &transform);
        entities.push(entity);
    }

    for tree in &content.trees {
        entities.push(spawn_tree(tree, owner, registry, scene));
    }
    for boulder in &content.boulders {
        entities.push(spawn_boulder(boulder, owner, registry, scene));
    }
    for plant in &content.vegetation {
        entities.push(spawn_vegetation(plant, owner, registry, scene));
    }
    for reward in &content.rewards {
        entities.push(spawn_reward(reward, owner, registry, scene));
    }
    entities
}

fn spawn_tree(tree: &TreePlacement, owner: ChunkOwned, registry: &mut World, scene: &mut impl Scene) -> Entity {
    let transform = Transform::from_position(tree.position);
    let collidable = Collidable::Decor(Decor {
        kind: DecorKind::Tree(tree.species),
        scale: tree.scale,
        destroyed: false,
    });
    let entity = registry.spawn((owner, transform, tree_bounds(tree.species, tree.scale), collidable));
    let kind = ObjectKind::Tree {
        species: tree.species,
        scale: tree.scale,
    };
    scene.add_object(entity, &kind, &transform);
    entity
}

fn spawn_boulder(
    boulder: &BoulderPlacement,
    owner: ChunkOwned,
    registry: &mut World,
    scene: &mut impl Scene,
) -> Entity {
    let transform = Transform::from_position(boulder.position);
    let collidable = Collidable::Decor(Decor {
        kind: DecorKind::Boulder,
        scale: boulder.size,
        destroyed: false,
    });
    let entity = registry.spawn((owner, transform, Bounds::cube(boulder.size), collidable));
    let kind = ObjectKind::Boulder {
        size: boulder.size,
        rotation: boulder.rotation,
    };
    scene.add_object(entity, &kind, &transform);
    entity
}

fn spawn_vegetation(
    plant: &VegetationPlacement,
    owner: ChunkOwned,
    registry: &mut World,
    scene: &mut impl Scene,
) -> Entity {
    let transform = Transform::from_position(plant.position);
    let entity = if plant.kind == VegetationKind::Cactus {
        let collidable = Collidable::Decor(Decor {
            kind: DecorKind::Cactus,
            scale: plant.scale,
            destroyed: false,
        });
        registry.spawn((owner, transform, cactus_bounds(plant.scale), collidable))
    } else {
        registry.spawn((owner, transform))
    };
    let kind = ObjectKind::Vegetation {
        kind: plant.kind,
        scale: plant.scale,
    };
    scene.add_object(entity, &kind, &transform);
    entity
}

fn spawn_reward(
    reward: &RewardPlacement,
    owner: ChunkOwned,
    registry: &mut World,
    scene: &mut impl Scene,
) -> Entity {
    let transform = Transform::from_position(reward.position);
    let collidable = Collidable::Reward(Reward {
        kind: reward.kind,
        collected: false,
        anchor: reward.position,
    });
    let entity = registry.spawn((owner, transform, Bounds::cube(REWARD_HALF_SIZE), collidable));
    scene.add_object(entity, &ObjectKind::Reward(reward.kind), &transform);
    entity
}
