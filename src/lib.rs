//! A Flappy Bird clone rendered with half-block pixels in the terminal.
//!
//! [`game::Game`] ties the pieces together: [`lifecycle`] holds the phase and
//! scores, [`world`] and [`collision`] run the per-frame physics, [`render`]
//! paints the world into a [`raster::PixelBuf`] and [`overlay`] adds text on
//! top. The binary drives it from a single-threaded frame loop.

pub mod audio;
pub mod collision;
pub mod config;
pub mod frame;
pub mod game;
pub mod input;
pub mod lifecycle;
pub mod overlay;
pub mod raster;
pub mod render;
pub mod storage;
pub mod world;

pub use config::{Args, Tuning};
pub use game::{Flow, Game, TickReport};
pub use lifecycle::{Lifecycle, Phase};
