//! Paints a [`World`] onto a [`PixelBuf`].
//!
//! Drawing is a pure read of the world. Shapes are specified in world units
//! and rasterised by sampling pixel centres, so the same scene scales to any
//! terminal size.

use crate::raster::{PixelBuf, Rgb};
use crate::world::{Bird, Cloud, Pipe, World};

const DAY_TOP: Rgb = Rgb(135, 206, 235);
const DAY_BOTTOM: Rgb = Rgb(176, 224, 230);
const NIGHT_TOP: Rgb = Rgb(10, 15, 30);
const NIGHT_BOTTOM: Rgb = Rgb(25, 25, 50);
const CLOUD_DAY: Rgb = Rgb(255, 255, 255);
const CLOUD_NIGHT: Rgb = Rgb(100, 100, 120);
const CLOUD_ALPHA: f64 = 0.8;

const PIPE_BODY: Rgb = Rgb(0x22, 0x8B, 0x22);
const PIPE_INNER: Rgb = Rgb(0x2E, 0x8B, 0x57);
const PIPE_CAP: Rgb = Rgb(0x1A, 0x5F, 0x1A);
const PIPE_CAP_H: f64 = 20.0;

const BIRD_BODY: Rgb = Rgb(0xFF, 0xD7, 0x00);
const BIRD_BEAK: Rgb = Rgb(0xFF, 0xA5, 0x00);
const BIRD_EYE: Rgb = Rgb(0, 0, 0);
const BIRD_FEET: Rgb = Rgb(0x8B, 0x45, 0x13);

const GROUND: Rgb = Rgb(0x8B, 0x73, 0x55);
const GROUND_DASH: Rgb = Rgb(0x6B, 0x53, 0x45);
const GRASS: Rgb = Rgb(0x22, 0x8B, 0x22);

/// Sky gradient end points (top, bottom) for a night factor in [0, 1].
pub fn sky_colors(night: f64) -> (Rgb, Rgb) {
    (
        Rgb::mix(DAY_TOP, NIGHT_TOP, night),
        Rgb::mix(DAY_BOTTOM, NIGHT_BOTTOM, night),
    )
}

pub fn cloud_color(night: f64) -> Rgb {
    Rgb::mix(CLOUD_DAY, CLOUD_NIGHT, night)
}

/// World-to-pixel mapping for one frame.
#[derive(Clone, Copy)]
struct View {
    sx: f64,
    sy: f64,
}

impl View {
    fn px(&self, wx: f64) -> i32 {
        (wx * self.sx).round() as i32
    }

    fn py(&self, wy: f64) -> i32 {
        (wy * self.sy).round() as i32
    }

    /// World coordinates of the centre of pixel (x, y).
    fn centre(&self, x: i32, y: i32) -> (f64, f64) {
        ((x as f64 + 0.5) / self.sx, (y as f64 + 0.5) / self.sy)
    }

    /// Pixel bounds covering a world-space box.
    fn bounds(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> (i32, i32, i32, i32) {
        (
            (x0 * self.sx).floor() as i32,
            (y0 * self.sy).floor() as i32,
            (x1 * self.sx).ceil() as i32,
            (y1 * self.sy).ceil() as i32,
        )
    }
}

/// Back to front: sky, clouds, pipes, bird, ground.
pub fn draw(world: &World, buf: &mut PixelBuf) {
    if buf.width() == 0 || buf.height() == 0 {
        return;
    }
    let view = View {
        sx: buf.width() as f64 / world.field.width,
        sy: buf.height() as f64 / world.field.height,
    };
    let night = world.night_factor();

    draw_sky(buf, night);
    let cloud = cloud_color(night);
    for c in &world.clouds {
        draw_cloud(buf, view, c, cloud);
    }
    for p in &world.pipes {
        draw_pipe(buf, view, p, world.field.height);
    }
    draw_bird(buf, view, &world.bird);
    draw_ground(buf, view, world);
}

fn draw_sky(buf: &mut PixelBuf, night: f64) {
    let (top, bottom) = sky_colors(night);
    let h = buf.height();
    for y in 0..h {
        let t = (y as f64 + 0.5) / h as f64;
        buf.fill_row(y as i32, Rgb::mix(top, bottom, t));
    }
}

fn fill_world_rect(buf: &mut PixelBuf, view: View, x: f64, y: f64, w: f64, h: f64, c: Rgb) {
    let (x0, y0) = (view.px(x), view.py(y));
    let (x1, y1) = (view.px(x + w), view.py(y + h));
    buf.fill_rect(x0, y0, x1 - x0, y1 - y0, c);
}

fn draw_cloud(buf: &mut PixelBuf, view: View, cloud: &Cloud, color: Rgb) {
    let w = cloud.width;
    let puffs = [
        (cloud.x, cloud.y, w / 3.0),
        (cloud.x + w / 3.0, cloud.y - 10.0, w / 4.0),
        (cloud.x + w / 2.0, cloud.y, w / 3.0),
    ];
    let (x0, y0, x1, y1) = view.bounds(
        cloud.x - w / 3.0,
        cloud.y - 10.0 - w / 3.0,
        cloud.x + w / 2.0 + w / 3.0,
        cloud.y + w / 3.0,
    );
    for py in y0..y1 {
        for px in x0..x1 {
            let (wx, wy) = view.centre(px, py);
            let inside = puffs
                .iter()
                .any(|&(cx, cy, r)| (wx - cx).powi(2) + (wy - cy).powi(2) <= r * r);
            if inside {
                buf.blend(px, py, color, CLOUD_ALPHA);
            }
        }
    }
}

fn draw_pipe(buf: &mut PixelBuf, view: View, pipe: &Pipe, field_h: f64) {
    let (x, w) = (pipe.x, pipe.width);
    let bottom_y = pipe.gap_bottom();
    let bottom_h = field_h - bottom_y;

    fill_world_rect(buf, view, x, 0.0, w, pipe.top_height, PIPE_BODY);
    fill_world_rect(buf, view, x + 5.0, 0.0, w - 10.0, pipe.top_height, PIPE_INNER);
    fill_world_rect(buf, view, x, bottom_y, w, bottom_h, PIPE_BODY);
    fill_world_rect(buf, view, x + 5.0, bottom_y, w - 10.0, bottom_h, PIPE_INNER);

    let cap_w = w + 10.0;
    fill_world_rect(buf, view, x - 5.0, pipe.top_height - PIPE_CAP_H, cap_w, PIPE_CAP_H, PIPE_CAP);
    fill_world_rect(buf, view, x - 5.0, bottom_y, cap_w, PIPE_CAP_H, PIPE_CAP);
}

fn in_triangle(p: (f64, f64), a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> bool {
    let edge = |u: (f64, f64), v: (f64, f64)| (v.0 - u.0) * (p.1 - u.1) - (v.1 - u.1) * (p.0 - u.0);
    let (d1, d2, d3) = (edge(a, b), edge(b, c), edge(c, a));
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Colour of the bird sprite at a point in its own rotated frame, origin at
/// the body centre.
fn bird_texel(bird: &Bird, lx: f64, ly: f64) -> Option<Rgb> {
    let (hw, hh) = (bird.width / 2.0, bird.height / 2.0);
    let in_rect = |x: f64, y: f64, w: f64, h: f64| lx >= x && lx < x + w && ly >= y && ly < y + h;

    if in_rect(hw - 10.0, hh - 2.0, 8.0, 2.0) || in_rect(hw - 5.0, hh - 2.0, 8.0, 2.0) {
        return Some(BIRD_FEET);
    }
    if (lx - bird.width / 4.0).powi(2) + (ly + bird.height / 4.0).powi(2) <= 9.0 {
        return Some(BIRD_EYE);
    }
    if in_triangle((lx, ly), (hw, 0.0), (hw + 10.0, 0.0), (hw + 5.0, 5.0)) {
        return Some(BIRD_BEAK);
    }
    if in_rect(-hw, -hh, bird.width, bird.height) {
        return Some(BIRD_BODY);
    }
    None
}

fn draw_bird(buf: &mut PixelBuf, view: View, bird: &Bird) {
    let cx = bird.x + bird.width / 2.0;
    let cy = bird.y + bird.height / 2.0;
    let (sin, cos) = bird.pitch().sin_cos();
    let reach = (bird.width / 2.0 + 10.0).hypot(bird.height / 2.0) + 1.0;

    let (x0, y0, x1, y1) = view.bounds(cx - reach, cy - reach, cx + reach, cy + reach);
    for py in y0..y1 {
        for px in x0..x1 {
            let (wx, wy) = view.centre(px, py);
            let (dx, dy) = (wx - cx, wy - cy);
            let lx = dx * cos + dy * sin;
            let ly = -dx * sin + dy * cos;
            if let Some(c) = bird_texel(bird, lx, ly) {
                buf.set(px, py, c);
            }
        }
    }
}

fn draw_ground(buf: &mut PixelBuf, view: View, world: &World) {
    let field = world.field;
    let gy = world.ground_y();
    fill_world_rect(buf, view, 0.0, gy, field.width, field.height - gy, GROUND);

    let dashes = (field.width / 20.0) as usize + 2;
    for i in 0..dashes {
        let x = (i as f64 * 20.0 + world.ground_x).rem_euclid(field.width);
        fill_world_rect(buf, view, x, gy + 10.0, 15.0, 5.0, GROUND_DASH);
    }

    let tufts = (field.width / 30.0) as usize + 2;
    for i in 0..tufts {
        let x = (i as f64 * 30.0 + world.ground_x * 0.5).rem_euclid(field.width);
        let (x0, y0, x1, y1) = view.bounds(x - 5.0, gy, x + 5.0, gy + 10.0);
        for py in y0..y1 {
            for px in x0..x1 {
                let p = view.centre(px, py);
                if in_triangle(p, (x, gy), (x - 5.0, gy + 10.0), (x + 5.0, gy + 10.0)) {
                    buf.set(px, py, GRASS);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;
    use crate::world::Field;

    const FIELD: Field = Field {
        width: 800.0,
        height: 600.0,
    };

    fn paint(world: &World) -> PixelBuf {
        let mut buf = PixelBuf::new(80, 60);
        draw(world, &mut buf);
        buf
    }

    #[test]
    fn sky_endpoints() {
        assert_eq!(sky_colors(0.0), (DAY_TOP, DAY_BOTTOM));
        assert_eq!(sky_colors(1.0), (NIGHT_TOP, NIGHT_BOTTOM));
        assert_eq!(cloud_color(0.0), CLOUD_DAY);
        assert_eq!(cloud_color(1.0), CLOUD_NIGHT);
    }

    #[test]
    fn sky_gradient_follows_time_of_day() {
        let mut world = World::new(FIELD, Tuning::default(), &[], 0.0);
        world.animate(22_500.0); // full night
        let buf = paint(&world);
        let expected = Rgb::mix(NIGHT_TOP, NIGHT_BOTTOM, 0.5 / 60.0);
        assert_eq!(buf.get(0, 0), expected);
    }

    #[test]
    fn bird_body_painted_at_its_position() {
        let world = World::new(FIELD, Tuning::default(), &[], 0.0);
        let buf = paint(&world);
        // Bird spans x 100..134, y 300..324; pixel (11, 31) centres on (115, 315).
        assert_eq!(buf.get(11, 31), BIRD_BODY);
    }

    #[test]
    fn pipes_and_ground_are_painted() {
        let mut world = World::new(FIELD, Tuning::default(), &[], 0.0);
        world.pipes.push(Pipe {
            x: 400.0,
            width: 60.0,
            top_height: 200.0,
            gap: 160.0,
            passed: false,
        });
        let buf = paint(&world);
        assert_eq!(buf.get(43, 5), PIPE_INNER);
        assert_eq!(buf.get(40, 5), PIPE_BODY);
        assert_eq!(buf.get(43, 19), PIPE_CAP);
        // Inside the gap is sky.
        let (top, bottom) = sky_colors(world.night_factor());
        assert_eq!(buf.get(43, 30), Rgb::mix(top, bottom, 30.5 / 60.0));
        assert_eq!(buf.get(43, 59), GROUND);
    }

    #[test]
    fn clouds_blend_over_sky() {
        let cloud = Cloud {
            x: 300.0,
            y: 100.0,
            width: 90.0,
            speed: 0.2,
        };
        let world = World::new(FIELD, Tuning::default(), &[cloud], 0.0);
        let buf = paint(&world);
        let (top, bottom) = sky_colors(world.night_factor());
        let sky = Rgb::mix(top, bottom, 10.5 / 60.0);
        let want = cloud_color(world.night_factor()).over(sky, CLOUD_ALPHA);
        assert_eq!(buf.get(30, 10), want);
    }

    #[test]
    fn bird_texel_shapes() {
        let world = World::new(FIELD, Tuning::default(), &[], 0.0);
        let bird = &world.bird;
        assert_eq!(bird_texel(bird, 0.0, 0.0), Some(BIRD_BODY));
        assert_eq!(bird_texel(bird, 8.5, -6.0), Some(BIRD_EYE));
        assert_eq!(bird_texel(bird, 20.0, 1.0), Some(BIRD_BEAK));
        assert_eq!(bird_texel(bird, 10.0, 11.0), Some(BIRD_FEET));
        assert_eq!(bird_texel(bird, 30.0, 30.0), None);
    }

    #[test]
    fn empty_buffer_is_a_no_op() {
        let world = World::new(FIELD, Tuning::default(), &[], 0.0);
        let mut buf = PixelBuf::new(0, 0);
        draw(&world, &mut buf);
    }
}
