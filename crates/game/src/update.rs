//! Per-frame update for the session.
//! Fixed order: input, driving, streaming, hazards, collisions, effects,
//! deferred removals, presentation.

use std::time::Duration;

use audio::AudioCues;
use engine_core::Transform;
use input::{Control, ControlSource};
use procgen::RewardKind;

use crate::effects;
use crate::hud::{FlashKind, HudData, HudSink};
use crate::player::DriveReport;
use crate::scene::{ObjectKind, Scene};
use crate::session::Session;
use crate::state::{GameEvent, SessionPhase};
use crate::world::Collidable;

impl<S: Scene, A: AudioCues, H: HudSink> Session<S, A, H> {
    /// Advance one frame using the wall clock.
    pub fn tick(&mut self, controls: &impl ControlSource) -> SessionPhase {
        self.time.update();
        self.frame(controls)
    }

    /// Advance one frame by a fixed `dt` (headless runs, tests).
    pub fn step(&mut self, controls: &impl ControlSource, dt: Duration) -> SessionPhase {
        self.time.advance(dt);
        self.frame(controls)
    }

    fn frame(&mut self, controls: &impl ControlSource) -> SessionPhase {
        let now = self.time.now();
        let dt = self.time.delta_seconds();
        self.fps.record_fps(self.time.fps());

        if self.phase == SessionPhase::NotStarted {
            self.present(DriveReport::default(), dt);
            return self.phase;
        }

        let mut drive = DriveReport::default();
        if self.phase == SessionPhase::Running {
            drive = self.handle_input(controls, dt, now);
        }

        self.stream_world();

        if self.phase == SessionPhase::Running {
            let world = &mut self.world;
            let position = world.player.position();
            world
                .spawner
                .update(now, dt, position, &mut world.registry, &mut self.scene);

            let mut events = self.collisions.check_collisions(
                now,
                &mut world.registry,
                &mut world.player,
                world.car,
                &self.scene,
            );
            events.extend(self.collisions.check_reward_collection(
                now,
                &mut world.registry,
                &mut world.player,
                world.car,
                &mut world.pending,
                &self.scene,
            ));
            for event in events {
                self.dispatch(event);
            }
        }

        let world = &mut self.world;
        effects::update_effects(&mut world.registry, &mut self.scene, dt);
        self.animator
            .animate(&mut world.registry, &mut self.scene, self.time.elapsed_seconds(), dt);
        world.pending.drain(now, &mut world.registry, &mut self.scene);

        self.present(drive, dt);
        self.phase
    }

    fn handle_input(&mut self, controls: &impl ControlSource, dt: f32, now: Duration) -> DriveReport {
        if controls.was_pressed(Control::ToggleMute) {
            self.audio.toggle_mute();
        }
        if controls.was_pressed(Control::ToggleCamera) {
            self.camera.toggle();
        }

        let world = &mut self.world;
        let drive = world.player.drive(controls, dt, now);
        if drive.screech {
            self.audio.tire_screech();
        }
        self.sync_car();
        drive
    }

    /// Push the player's transform to the car entity and the scene.
    fn sync_car(&mut self) {
        let world = &mut self.world;
        let transform = world.player.transform;
        if let Ok(mut t) = world.registry.get::<&mut Transform>(world.car) {
            *t = transform;
        }
        self.scene.set_transform(world.car, &transform);
    }

    fn dispatch(&mut self, event: GameEvent) {
        match event {
            GameEvent::Impact { force } => self.audio.collision_impact(force),
            GameEvent::Damaged { .. } => self.hud.flash(FlashKind::Damage),
            GameEvent::Destroyed => self.enter_game_over(),
            GameEvent::DecorSmashed { entity, position } => {
                let world = &mut self.world;
                let decor = match world.registry.get::<&Collidable>(entity).map(|c| *c) {
                    Ok(Collidable::Decor(decor)) => decor,
                    _ => return,
                };
                let transform = Transform::from_position(position);
                self.scene.remove_object(entity);
                self.scene.add_object(
                    entity,
                    &ObjectKind::Debris {
                        of: decor.kind,
                        scale: decor.scale,
                    },
                    &transform,
                );
                effects::spawn_splinters(&mut world.registry, &mut self.scene, position);
            }
            GameEvent::RockStruck { position, size } => {
                effects::spawn_rock_dust(&mut self.world.registry, &mut self.scene, position, size * 0.5);
            }
            GameEvent::RewardCollected { kind, position, .. } => {
                let world = &mut self.world;
                match kind {
                    RewardKind::Health => {
                        self.hud.popup("+25 ❤️", glam::Vec3::new(1.0, 0.3, 0.3));
                        self.hud.flash(FlashKind::Health);
                        effects::spawn_sparkles(&mut world.registry, &mut self.scene, position);
                    }
                    RewardKind::Points(color) => {
                        self.hud.popup("+1 🎈", color.rgb());
                        self.hud.flash(FlashKind::Points);
                        effects::spawn_balloon_burst(&mut world.registry, &mut self.scene, position, color);
                    }
                }
                self.audio.item_collect();
            }
        }
    }

    fn present(&mut self, drive: DriveReport, dt: f32) {
        let player = &self.world.player;
        if self.phase == SessionPhase::Running {
            self.audio.engine(player.speed, drive.acceleration);
        }
        self.hud.update(&HudData {
            speed: player.display_speed(),
            health_percent: player.health.percentage(),
            score: player.score,
            fps: self.fps.average(),
        });
        self.camera.update(dt);
        let view = self.camera.view(player.position(), player.heading);
        self.scene.render(&view);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audio::SilentAudio;
    use engine_core::{Entity, Vec3};
    use input::ControlSet;

    use crate::config::GameConfig;
    use crate::hud::{HudCall, RecordingHud};
    use crate::scene::RecordingScene;
    use crate::world::{self, tree_bounds, Decor, DecorKind, Reward};
    use physics::Bounds;
    use procgen::{BalloonColor, TreeSpecies};

    type TestSession = Session<RecordingScene, SilentAudio, RecordingHud>;

    const FRAME: Duration = Duration::from_millis(16);

    fn session() -> TestSession {
        let config = GameConfig {
            rng_seed: Some(7),
            ..GameConfig::default()
        };
        Session::new(config, RecordingScene::new(), SilentAudio::new(), RecordingHud::new())
    }

    /// Started session with the road's generated rewards cleared so tests
    /// control what the car can touch.
    fn started() -> TestSession {
        let mut s = session();
        assert!(s.start());
        let rewards: Vec<Entity> = s
            .world
            .registry
            .query::<&Collidable>()
            .iter()
            .filter(|(_, c)| matches!(c, Collidable::Reward(_)))
            .map(|(e, _)| e)
            .collect();
        for e in rewards {
            world::despawn(&mut s.world.registry, &mut s.scene, e);
        }
        s
    }

    fn place_tree(s: &mut TestSession, position: Vec3) -> Entity {
        s.world.registry.spawn((
            Transform::from_position(position),
            tree_bounds(TreeSpecies::Pine, 4.0),
            Collidable::Decor(Decor {
                kind: DecorKind::Tree(TreeSpecies::Pine),
                scale: 4.0,
                destroyed: false,
            }),
        ))
    }

    fn place_balloon(s: &mut TestSession, position: Vec3) -> Entity {
        let e = s.world.registry.spawn((
            Transform::from_position(position),
            Bounds::cube(1.2),
            Collidable::Reward(Reward {
                kind: RewardKind::Points(BalloonColor::Yellow),
                collected: false,
                anchor: position,
            }),
        ));
        let t = Transform::from_position(position);
        s.scene.add_object(e, &ObjectKind::Reward(RewardKind::Points(BalloonColor::Yellow)), &t);
        e
    }

    #[test]
    fn nothing_happens_before_start() {
        let mut s = session();
        s.step(&ControlSet::new().holding(Control::Accelerate), FRAME);
        assert_eq!(s.phase, SessionPhase::NotStarted);
        assert_eq!(s.world.chunks.loaded_count(), 0);
        assert_eq!(s.world.spawner.spawned_total(), 0);
        assert_eq!(s.world.player.speed, 0.0);
    }

    #[test]
    fn start_streams_the_square_around_the_car() {
        let mut s = session();
        assert!(s.start());
        assert!(!s.start());
        assert_eq!(s.world.chunks.loaded_count(), 49);
    }

    #[test]
    fn first_running_tick_spawns_a_rock() {
        let mut s = started();
        s.step(&ControlSet::new(), FRAME);
        assert_eq!(s.world.spawner.spawned_total(), 1);
    }

    #[test]
    fn game_over_happens_once_and_freezes_hazards() {
        let mut s = started();
        s.world.player.health.take_damage(99.0);
        s.world.player.speed = 100.0;
        place_tree(&mut s, Vec3::new(0.0, 0.0, 8.0));
        let idle = ControlSet::new();
        s.step(&idle, FRAME);
        assert_eq!(s.phase, SessionPhase::GameOver);
        assert_eq!(s.world.player.speed, 0.0);

        let spawned = s.world.spawner.spawned_total();
        place_tree(&mut s, Vec3::new(0.0, 0.0, 6.0));
        for _ in 0..300 {
            s.step(&ControlSet::new().holding(Control::Accelerate), FRAME);
        }
        assert_eq!(s.hud.game_over_shown(), 1);
        assert_eq!(s.world.spawner.spawned_total(), spawned);
        assert_eq!(s.world.player.speed, 0.0);
        assert_eq!(s.world.player.health.current(), 0.0);
    }

    #[test]
    fn fatal_hit_is_not_undone_by_a_pickup_in_the_same_frame() {
        let mut s = started();
        s.world.player.health.take_damage(99.0);
        s.world.player.speed = 100.0;
        place_tree(&mut s, Vec3::new(0.0, 0.0, 8.0));
        let pickup = s.world.registry.spawn((
            Transform::from_position(Vec3::new(0.0, 1.5, 2.0)),
            Bounds::cube(1.2),
            Collidable::Reward(Reward {
                kind: RewardKind::Health,
                collected: false,
                anchor: Vec3::new(0.0, 1.5, 2.0),
            }),
        ));
        s.step(&ControlSet::new(), FRAME);

        assert_eq!(s.phase, SessionPhase::GameOver);
        assert_eq!(s.world.player.health.current(), 0.0);
        assert_eq!(s.hud.last.expect("hud updated").health_percent, 0.0);
        assert_eq!(s.hud.count(&HudCall::Popup("+25 ❤️".to_string())), 0);
        let c = *s.world.registry.get::<&Collidable>(pickup).expect("pickup stays");
        assert!(c.is_live());
    }

    #[test]
    fn smashed_tree_becomes_debris() {
        let mut s = started();
        s.world.player.speed = 30.0;
        let tree = place_tree(&mut s, Vec3::new(0.0, 0.0, 8.0));
        s.scene.add_object(
            tree,
            &ObjectKind::Tree {
                species: TreeSpecies::Pine,
                scale: 4.0,
            },
            &Transform::from_position(Vec3::new(0.0, 0.0, 8.0)),
        );
        s.step(&ControlSet::new(), FRAME);
        assert!(matches!(s.scene.kind(tree), Some(ObjectKind::Debris { .. })));
        assert_eq!(s.hud.count(&HudCall::Flash(FlashKind::Damage)), 1);
        assert!(s.world.player.health.current() < 100.0);
    }

    #[test]
    fn balloon_scores_once_and_leaves_after_a_second() {
        let mut s = started();
        let balloon = place_balloon(&mut s, Vec3::new(0.0, 1.5, 4.0));
        let idle = ControlSet::new();
        s.step(&idle, FRAME);
        assert_eq!(s.world.player.score, 1);
        assert_eq!(s.hud.count(&HudCall::Popup("+1 🎈".to_string())), 1);

        for _ in 0..30 {
            s.step(&idle, FRAME);
        }
        assert_eq!(s.world.player.score, 1);
        assert!(s.scene.contains(balloon));

        for _ in 0..40 {
            s.step(&idle, FRAME);
        }
        assert!(!s.scene.contains(balloon));
        assert!(!s.world.registry.contains(balloon));
    }

    #[test]
    fn mute_and_camera_toggle_on_press() {
        let mut s = started();
        s.step(&ControlSet::new().tapping(Control::ToggleMute).tapping(Control::ToggleCamera), FRAME);
        assert!(s.audio.is_muted());
        assert_eq!(s.camera.mode, crate::camera::CameraMode::Orbit);
    }

    #[test]
    fn driving_moves_the_car_in_the_scene() {
        let mut s = started();
        let accelerate = ControlSet::new().holding(Control::Accelerate);
        for _ in 0..30 {
            s.step(&accelerate, FRAME);
        }
        let t = s.scene.transform(s.world.car).expect("car is in the scene");
        assert!(t.position.z > 0.0);
        assert!(s.hud.last.expect("hud updated").speed > 0.0);
        assert!(s.scene.frames >= 30);
    }

    #[test]
    fn restart_rebuilds_everything() {
        let mut s = started();
        s.world.player.health.take_damage(99.0);
        s.world.player.speed = 100.0;
        place_tree(&mut s, Vec3::new(0.0, 0.0, 8.0));
        s.step(&ControlSet::new(), FRAME);
        assert!(s.is_game_over());

        s.restart();
        assert!(s.is_running());
        assert_eq!(s.world.player.health.current(), 100.0);
        assert_eq!(s.world.player.score, 0);
        assert_eq!(s.world.chunks.loaded_count(), 49);
        assert_eq!(s.hud.count(&HudCall::HideGameOver), 1);
        // Every object in the scene belongs to the new world.
        assert_eq!(s.scene.objects.len(), s.world.registry.len() as usize);
    }
}
