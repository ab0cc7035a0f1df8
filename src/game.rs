//! The game aggregate: lifecycle, world, randomness and sound, driven one
//! frame at a time.

use crate::audio::Sfx;
use crate::config::Tuning;
use crate::input::Action;
use crate::lifecycle::{Lifecycle, Phase};
use crate::overlay::{Button, HudState, Overlay};
use crate::storage::ScoreStore;
use crate::world::{Cloud, Field, World};
use rand::Rng;
use tracing::{debug, info};

/// Result of one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub scored: u32,
    pub collided: bool,
}

/// What the frame loop should do after handling an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// World units per raster pixel, chosen so the field is `field_height` tall.
pub fn field_for(raster_w: usize, raster_h: usize, field_height: f64) -> Field {
    let units_per_px = field_height / raster_h.max(1) as f64;
    Field {
        width: raster_w.max(1) as f64 * units_per_px,
        height: field_height,
    }
}

pub struct Game<R: Rng> {
    lifecycle: Lifecycle<Box<dyn ScoreStore>>,
    world: World,
    tuning: Tuning,
    field_height: f64,
    /// Field matching the current viewport; adopted on the next reset.
    viewport: Field,
    /// Cloud layout every reset starts from.
    clouds: Vec<Cloud>,
    rng: R,
    audio: Box<dyn Sfx>,
}

impl<R: Rng> Game<R> {
    pub fn new(
        tuning: Tuning,
        field: Field,
        store: Box<dyn ScoreStore>,
        audio: Box<dyn Sfx>,
        mut rng: R,
        now_ms: f64,
    ) -> Self {
        let clouds = Cloud::scatter(&mut rng, tuning.cloud_count);
        let world = World::new(field, tuning.clone(), &clouds, now_ms);
        Self {
            lifecycle: Lifecycle::new(store),
            world,
            tuning,
            field_height: field.height,
            viewport: field,
            clouds,
            rng,
            audio,
        }
    }

    pub fn phase(&self) -> Phase {
        self.lifecycle.phase()
    }

    pub fn lifecycle(&self) -> &Lifecycle<Box<dyn ScoreStore>> {
        &self.lifecycle
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct access for scripted scenarios.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn is_muted(&self) -> bool {
        self.audio.is_muted()
    }

    pub fn hud(&self) -> HudState {
        HudState {
            phase: self.lifecycle.phase(),
            score: self.lifecycle.score(),
            high_score: self.lifecycle.high_score(),
            muted: self.audio.is_muted(),
        }
    }

    fn reset_world(&mut self, field: Field, now_ms: f64) {
        self.world = World::new(field, self.tuning.clone(), &self.clouds, now_ms);
    }

    /// Starts a run from `Ready`, flaps while `Playing`, ignored once ended.
    pub fn jump(&mut self, now_ms: f64) {
        match self.lifecycle.phase() {
            Phase::Ready => {
                if self.lifecycle.start() {
                    self.world.jump();
                    self.world.begin_run(now_ms);
                }
            }
            Phase::Playing => self.world.jump(),
            Phase::Ended => {}
        }
    }

    pub fn restart(&mut self, now_ms: f64) {
        self.lifecycle.restart();
        self.reset_world(self.viewport, now_ms);
        debug!("world reset for a new run");
    }

    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.audio.toggle_mute();
        info!(muted, "sound toggled");
        muted
    }

    /// New raster size. The world only adopts the new field between runs.
    pub fn resize(&mut self, raster_w: usize, raster_h: usize, now_ms: f64) {
        self.viewport = field_for(raster_w, raster_h, self.field_height);
        if self.lifecycle.phase() == Phase::Ready {
            self.reset_world(self.viewport, now_ms);
            debug!(
                width = self.viewport.width,
                height = self.viewport.height,
                "field resized"
            );
        }
    }

    /// Advance one frame.
    pub fn tick(&mut self, now_ms: f64) -> TickReport {
        self.world.animate(now_ms);
        if self.lifecycle.phase() != Phase::Playing {
            return TickReport::default();
        }

        let events = self.world.step(now_ms, &mut self.rng);
        for _ in 0..events.scored {
            self.lifecycle.increment_score();
            self.audio.play_success();
        }
        if events.collided && self.lifecycle.end() {
            self.audio.play_hit();
        }
        TickReport {
            scored: events.scored,
            collided: events.collided,
        }
    }

    /// Apply an input action. `overlay` is the last painted overlay, used to
    /// resolve clicks on its buttons.
    pub fn handle(&mut self, action: Action, overlay: &Overlay, now_ms: f64) -> Flow {
        match action {
            Action::Quit => return Flow::Quit,
            Action::Jump => self.jump(now_ms),
            Action::Restart => {
                if self.lifecycle.phase() == Phase::Ended {
                    self.restart(now_ms);
                }
            }
            Action::ToggleMute => {
                self.toggle_mute();
            }
            Action::Click { col, row } => match overlay.button_at(col, row) {
                Some(Button::Restart) => self.restart(now_ms),
                Some(Button::Mute) => {
                    self.toggle_mute();
                }
                None => self.jump(now_ms),
            },
            Action::Resize { cols, rows } => {
                self.resize(cols as usize, rows as usize * 2, now_ms);
            }
        }
        Flow::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Audio;
    use crate::lifecycle::HIGH_SCORE_KEY;
    use crate::storage::MemoryStore;
    use crate::world::Pipe;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const FIELD: Field = Field {
        width: 800.0,
        height: 600.0,
    };

    fn game() -> Game<ChaCha8Rng> {
        Game::new(
            Tuning::default(),
            FIELD,
            Box::new(MemoryStore::new()),
            Box::new(Audio::silent()),
            ChaCha8Rng::seed_from_u64(1),
            0.0,
        )
    }

    #[test]
    fn field_keeps_aspect() {
        let f = field_for(160, 96, 600.0);
        assert_eq!(f.height, 600.0);
        assert_eq!(f.width, 1000.0);
        let f = field_for(0, 0, 600.0);
        assert_eq!(f, Field { width: 600.0, height: 600.0 });
    }

    #[test]
    fn ready_phase_only_animates_decorations() {
        let mut g = game();
        let before = g.world().bird.clone();
        let clouds_before = g.world().clouds.clone();
        g.tick(16.0);
        assert_eq!(g.world().bird, before);
        assert_ne!(g.world().clouds, clouds_before);
        assert_eq!(g.world().ground_x, 0.0);
    }

    #[test]
    fn first_jump_starts_run_with_impulse() {
        let mut g = game();
        g.jump(500.0);
        assert_eq!(g.phase(), Phase::Playing);
        assert_eq!(g.world().bird.velocity, -2.2);
        assert_eq!(g.world().last_pipe_ms, 500.0);
        assert_eq!(g.world().start_ms, 500.0);
    }

    #[test]
    fn jump_after_end_is_ignored() {
        let mut g = game();
        g.jump(0.0);
        g.world_mut().bird.y = -50.0;
        assert!(g.tick(16.0).collided);
        assert_eq!(g.phase(), Phase::Ended);
        let v = g.world().bird.velocity;
        g.jump(32.0);
        assert_eq!(g.phase(), Phase::Ended);
        assert_eq!(g.world().bird.velocity, v);
    }

    #[test]
    fn scoring_flows_into_lifecycle() {
        let mut g = game();
        g.jump(0.0);
        g.world_mut().pipes.push(Pipe {
            x: 40.5,
            width: 60.0,
            top_height: 200.0,
            gap: 160.0,
            passed: false,
        });
        g.world_mut().bird.y = 250.0;
        g.world_mut().bird.velocity = -0.08;
        let report = g.tick(16.0);
        assert_eq!(report.scored, 1);
        assert_eq!(g.lifecycle().score(), 1);
    }

    #[test]
    fn collision_ends_and_saves_best() {
        let mut g = game();
        g.jump(0.0);
        g.world_mut().bird.y = 250.0;
        for _ in 0..3 {
            g.world_mut().pipes.push(Pipe {
                x: 40.5,
                width: 60.0,
                top_height: 200.0,
                gap: 160.0,
                passed: false,
            });
            g.world_mut().bird.velocity = -0.08;
            g.tick(16.0);
            g.world_mut().pipes.clear();
        }
        assert_eq!(g.lifecycle().score(), 3);
        g.world_mut().bird.y = 700.0;
        assert!(g.tick(32.0).collided);
        assert_eq!(g.phase(), Phase::Ended);
        assert_eq!(g.lifecycle().high_score(), 3);
        assert_eq!(
            g.lifecycle().store().get(HIGH_SCORE_KEY).unwrap().as_deref(),
            Some("3")
        );

        // A frozen world doesn't move after the run ends.
        let bird = g.world().bird.clone();
        g.tick(48.0);
        assert_eq!(g.world().bird, bird);
    }

    #[test]
    fn restart_resets_world_and_phase() {
        let mut g = game();
        g.jump(0.0);
        for t in 1..300 {
            g.tick(t as f64 * 16.0);
        }
        assert_eq!(g.phase(), Phase::Ended);
        let overlay = Overlay::default();
        assert_eq!(g.handle(Action::Restart, &overlay, 5000.0), Flow::Continue);
        assert_eq!(g.phase(), Phase::Ready);
        assert_eq!(g.lifecycle().score(), 0);
        assert_eq!(g.world().bird.y, 300.0);
        assert!(g.world().pipes.is_empty());
        assert_eq!(g.world().ground_x, 0.0);
    }

    #[test]
    fn restart_key_only_acts_when_ended() {
        let mut g = game();
        let overlay = Overlay::default();
        g.jump(0.0);
        g.handle(Action::Restart, &overlay, 10.0);
        assert_eq!(g.phase(), Phase::Playing);
    }

    #[test]
    fn clicks_route_to_buttons_or_jump() {
        let mut g = game();
        let overlay = Overlay::compose(g.hud(), 80, 24);
        let mute = overlay
            .hotspots
            .iter()
            .find(|h| h.button == Button::Mute)
            .copied()
            .unwrap();
        g.handle(
            Action::Click {
                col: mute.col,
                row: mute.row,
            },
            &overlay,
            0.0,
        );
        assert!(g.is_muted());
        assert_eq!(g.phase(), Phase::Ready);

        g.handle(Action::Click { col: 0, row: 20 }, &overlay, 0.0);
        assert_eq!(g.phase(), Phase::Playing);
    }

    #[test]
    fn resize_applies_only_when_ready() {
        let mut g = game();
        g.handle(Action::Resize { cols: 100, rows: 30 }, &Overlay::default(), 0.0);
        assert_eq!(g.world().field, field_for(100, 60, 600.0));

        g.jump(0.0);
        let field = g.world().field;
        g.resize(40, 40, 10.0);
        assert_eq!(g.world().field, field);

        // The pending size is picked up by the next restart.
        g.restart(20.0);
        assert_eq!(g.world().field, field_for(40, 40, 600.0));
    }

    #[test]
    fn quit_action() {
        let mut g = game();
        assert_eq!(g.handle(Action::Quit, &Overlay::default(), 0.0), Flow::Quit);
    }
}
