//! Axis-aligned collision tests between the bird and its surroundings.

use crate::world::{Bird, Pipe};

/// True when the bird leaves the sky band: bottom edge at or below the
/// ground line, or top edge above the field.
pub fn hits_bounds(bird: &Bird, ground_y: f64) -> bool {
    bird.bottom() >= ground_y || bird.top() < 0.0
}

/// True when the bird overlaps the pipe horizontally and is not fully inside
/// its gap. Touching edges do not count as overlap.
pub fn hits_pipe(bird: &Bird, pipe: &Pipe) -> bool {
    let overlaps = bird.right() > pipe.x && bird.x < pipe.trailing_edge();
    overlaps && (bird.top() < pipe.top_height || bird.bottom() > pipe.gap_bottom())
}

pub fn collides(bird: &Bird, pipes: &[Pipe], ground_y: f64) -> bool {
    hits_bounds(bird, ground_y) || pipes.iter().any(|p| hits_pipe(bird, p))
}
