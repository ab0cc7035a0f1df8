//! Simulation state: bird, pipes, clouds, ground scroll and the day clock.
//!
//! Times are milliseconds on the caller's monotonic clock. Movement is
//! applied per call of [`World::step`], one call per rendered frame.

use crate::collision;
use crate::config::Tuning;
use rand::Rng;
use std::f64::consts::TAU;
use tracing::{debug, trace};

/// Play field size in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    pub x: f64,
    pub y: f64,
    /// Positive is downward.
    pub velocity: f64,
    pub width: f64,
    pub height: f64,
}

impl Bird {
    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Nose-up / nose-down pitch in radians.
    pub fn pitch(&self) -> f64 {
        (self.velocity * 0.1).clamp(-0.5, 0.5)
    }
}

/// A top and bottom segment with a gap between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub x: f64,
    pub width: f64,
    /// Height of the top segment, i.e. where the gap starts.
    pub top_height: f64,
    pub gap: f64,
    /// Set once the bird is past this pipe.
    pub passed: bool,
}

impl Pipe {
    pub fn trailing_edge(&self) -> f64 {
        self.x + self.width
    }

    pub fn gap_bottom(&self) -> f64 {
        self.top_height + self.gap
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub speed: f64,
}

impl Cloud {
    /// Random layout used as the starting position on every reset.
    pub fn scatter<R: Rng>(rng: &mut R, count: usize) -> Vec<Cloud> {
        (0..count)
            .map(|_| Cloud {
                x: rng.gen_range(0.0..800.0),
                y: rng.gen_range(50.0..150.0),
                width: rng.gen_range(60.0..100.0),
                speed: rng.gen_range(0.15..0.35),
            })
            .collect()
    }
}

/// What happened during one physics step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepEvents {
    pub scored: u32,
    pub collided: bool,
    pub spawned: bool,
}

#[derive(Debug, Clone)]
pub struct World {
    pub field: Field,
    pub tuning: Tuning,
    pub bird: Bird,
    /// Oldest first; older pipes have smaller x.
    pub pipes: Vec<Pipe>,
    pub clouds: Vec<Cloud>,
    /// Ground texture offset, kept within (-tile, 0].
    pub ground_x: f64,
    /// Day/night angle in radians.
    pub time_of_day: f64,
    pub last_pipe_ms: f64,
    pub start_ms: f64,
}

impl World {
    pub fn new(field: Field, tuning: Tuning, clouds: &[Cloud], now_ms: f64) -> Self {
        let bird = Bird {
            x: tuning.bird_x,
            y: field.height / 2.0,
            velocity: 0.0,
            width: tuning.bird_width,
            height: tuning.bird_height,
        };
        Self {
            field,
            tuning,
            bird,
            pipes: Vec::new(),
            clouds: clouds.to_vec(),
            ground_x: 0.0,
            time_of_day: 0.0,
            last_pipe_ms: 0.0,
            start_ms: now_ms,
        }
    }

    pub fn ground_y(&self) -> f64 {
        self.field.height - self.tuning.ground_height
    }

    /// Replace the vertical velocity with the jump impulse.
    pub fn jump(&mut self) {
        self.bird.velocity = self.tuning.jump_velocity;
    }

    /// Restart the spawn timer and the day clock at `now_ms`.
    pub fn begin_run(&mut self, now_ms: f64) {
        self.last_pipe_ms = now_ms;
        self.start_ms = now_ms;
    }

    /// Cosmetic motion that runs in every phase: clouds and the day clock.
    pub fn animate(&mut self, now_ms: f64) {
        let elapsed = now_ms - self.start_ms;
        self.time_of_day = elapsed / self.tuning.day_cycle_ms * TAU;

        let respawn_x = self.field.width + 50.0;
        for cloud in &mut self.clouds {
            cloud.x -= cloud.speed;
            if cloud.x + cloud.width < 0.0 {
                cloud.x = respawn_x;
            }
        }
    }

    /// Day/night blend: 0 is full day, 1 is full night.
    pub fn night_factor(&self) -> f64 {
        (self.time_of_day.sin() + 1.0) / 2.0
    }

    /// One frame of gameplay physics. Only call while a run is in progress.
    pub fn step<R: Rng>(&mut self, now_ms: f64, rng: &mut R) -> StepEvents {
        let mut events = StepEvents::default();

        self.bird.velocity += self.tuning.gravity;
        self.bird.y += self.bird.velocity;

        if now_ms - self.last_pipe_ms > self.tuning.pipe_interval_ms {
            self.spawn_pipe(rng);
            self.last_pipe_ms = now_ms;
            events.spawned = true;
        }

        let bird_x = self.bird.x;
        let speed = self.tuning.pipe_speed;
        let despawn_x = self.tuning.pipe_despawn_x;
        self.pipes.retain_mut(|pipe| {
            pipe.x -= speed;
            if !pipe.passed && pipe.trailing_edge() < bird_x {
                pipe.passed = true;
                events.scored += 1;
            }
            pipe.trailing_edge() > despawn_x
        });

        if collision::collides(&self.bird, &self.pipes, self.ground_y()) {
            debug!(y = self.bird.y, velocity = self.bird.velocity, "bird collided");
            events.collided = true;
        }

        self.ground_x -= self.tuning.ground_speed;
        if self.ground_x <= -self.tuning.ground_tile {
            self.ground_x += self.tuning.ground_tile;
        }

        events
    }

    /// Band of allowed top-segment heights for a new pipe.
    pub fn top_height_range(&self) -> (f64, f64) {
        let t = &self.tuning;
        let min = t.pipe_margin;
        let max = self.ground_y() - t.pipe_gap - t.pipe_margin;
        (min, max.max(min))
    }

    fn spawn_pipe<R: Rng>(&mut self, rng: &mut R) {
        let (min, max) = self.top_height_range();
        let top_height = min + rng.gen_range(0.0_f64..1.0) * (max - min);
        trace!(top_height, "spawning pipe");
        self.pipes.push(Pipe {
            x: self.field.width,
            width: self.tuning.pipe_width,
            top_height,
            gap: self.tuning.pipe_gap,
            passed: false,
        });
    }
}
