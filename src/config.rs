//! Command-line options and simulation tuning.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "skyflap")]
#[command(about = "Flap a bird through scrolling pipes under a day-night sky", long_about = None)]
#[command(version)]
pub struct Args {
    /// Target frames per second (the physics constants assume 60)
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub fps: u32,

    /// Height of the play field in world units
    #[arg(long, default_value_t = 600.0, value_parser = parse_field_height)]
    pub field_height: f64,

    /// Seed for pipe heights and cloud layout
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory holding the best score and the log file
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Log level written to the log file (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    /// Start with sound muted
    #[arg(long)]
    pub mute: bool,
}

/// The field must hold the ground band and a full pipe with its margins.
fn parse_field_height(s: &str) -> Result<f64, String> {
    let height: f64 = s.parse().map_err(|e| format!("{e}"))?;
    let min = Tuning::default().min_field_height();
    if !height.is_finite() || height < min {
        return Err(format!("must be a finite number of at least {min}"));
    }
    Ok(height)
}

/// Per-frame physics and layout constants, in world units.
///
/// Gravity and the scroll speeds are applied once per frame, not scaled by
/// elapsed time.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuning {
    pub gravity: f64,
    pub jump_velocity: f64,
    pub pipe_speed: f64,
    pub pipe_interval_ms: f64,
    pub pipe_gap: f64,
    pub pipe_width: f64,
    /// Clearance kept above the top segment and below the bottom one.
    pub pipe_margin: f64,
    /// Pipes are dropped once their trailing edge passes this x.
    pub pipe_despawn_x: f64,
    pub ground_height: f64,
    pub ground_speed: f64,
    pub ground_tile: f64,
    pub day_cycle_ms: f64,
    pub bird_x: f64,
    pub bird_width: f64,
    pub bird_height: f64,
    pub cloud_count: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.08,
            jump_velocity: -2.2,
            pipe_speed: 0.8,
            pipe_interval_ms: 3000.0,
            pipe_gap: 160.0,
            pipe_width: 60.0,
            pipe_margin: 50.0,
            pipe_despawn_x: -50.0,
            ground_height: 80.0,
            ground_speed: 1.0,
            ground_tile: 20.0,
            day_cycle_ms: 90_000.0,
            bird_x: 100.0,
            bird_width: 34.0,
            bird_height: 24.0,
            cloud_count: 5,
        }
    }
}

impl Tuning {
    /// Smallest field height that fits the ground and one pipe gap.
    pub fn min_field_height(&self) -> f64 {
        self.ground_height + self.pipe_gap + 2.0 * self.pipe_margin
    }
}
