//! Phase-dependent text drawn as terminal cells on top of the pixel raster.

use crate::lifecycle::Phase;
use crate::raster::Rgb;
use crossterm::{
    cursor, queue,
    style::{self, Attribute},
};
use std::io::{self, Write};

const WHITE: Rgb = Rgb(255, 255, 255);
const GOLD: Rgb = Rgb(0xFF, 0xD7, 0x00);
const LIGHT_GREY: Rgb = Rgb(0xCC, 0xCC, 0xCC);
const GREY: Rgb = Rgb(0xAA, 0xAA, 0xAA);
const RED: Rgb = Rgb(0xFF, 0x6B, 0x6B);
const PANEL: Rgb = Rgb(24, 24, 28);
const BUTTON: Rgb = Rgb(0x4C, 0xAF, 0x50);
const TOGGLE: Rgb = Rgb(48, 48, 56);

// ── 3x5 bitmap digits ──────────────────────────────────────────────────────

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

/// Five text rows spelling `n` in block glyphs, one space between digits.
pub fn big_number(n: u32) -> [String; 5] {
    let mut rows: [String; 5] = Default::default();
    for (i, ch) in n.to_string().bytes().enumerate() {
        let glyph = &DIGITS[(ch - b'0') as usize];
        for (r, row) in rows.iter_mut().enumerate() {
            if i > 0 {
                row.push(' ');
            }
            for c in 0..3 {
                row.push(if glyph[r * 3 + c] == 1 { '\u{2588}' } else { ' ' });
            }
        }
    }
    rows
}

/// What the overlay needs to know each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudState {
    pub phase: Phase,
    pub score: u32,
    pub high_score: u32,
    pub muted: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Restart,
    Mute,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub col: u16,
    pub row: u16,
    pub text: String,
    pub fg: Rgb,
    /// `None` leaves the raster visible behind spaces.
    pub bg: Option<Rgb>,
    pub bold: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hotspot {
    pub button: Button,
    pub col: u16,
    pub row: u16,
    pub width: u16,
}

impl Hotspot {
    pub fn contains(&self, col: u16, row: u16) -> bool {
        row == self.row && col >= self.col && col < self.col.saturating_add(self.width)
    }
}

struct Line {
    text: String,
    fg: Rgb,
    bold: bool,
    button: Option<Button>,
}

impl Line {
    fn text(text: impl Into<String>, fg: Rgb) -> Self {
        Self {
            text: text.into(),
            fg,
            bold: false,
            button: None,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    fn blank() -> Self {
        Self::text("", WHITE)
    }
}

fn width_of(s: &str) -> u16 {
    s.chars().count().min(u16::MAX as usize) as u16
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Overlay {
    pub labels: Vec<Label>,
    pub hotspots: Vec<Hotspot>,
}

impl Overlay {
    pub fn compose(hud: HudState, cols: u16, rows: u16) -> Self {
        let mut overlay = Overlay::default();
        match hud.phase {
            Phase::Ready => overlay.panel(
                cols,
                rows,
                vec![
                    Line::text("Flappy Bird", WHITE).bold(),
                    Line::blank(),
                    Line::text("Click or Press Space to Fly", GOLD),
                    Line::blank(),
                    Line::text(format!("High Score: {}", hud.high_score), LIGHT_GREY),
                    Line::blank(),
                    Line::text("Watch the day-night cycle", GREY),
                    Line::text("Fly through the pipes", GREY),
                    Line::text("Slow & steady wins!", GREY),
                ],
            ),
            Phase::Playing => overlay.score(hud.score, cols, rows),
            Phase::Ended => overlay.panel(
                cols,
                rows,
                vec![
                    Line::text("Game Over!", RED).bold(),
                    Line::blank(),
                    Line::text(format!("Score: {}", hud.score), GOLD).bold(),
                    Line::text(format!("Best: {}", hud.high_score), LIGHT_GREY),
                    Line::blank(),
                    Line {
                        button: Some(Button::Restart),
                        ..Line::text("  Play Again (R)  ", WHITE).bold()
                    },
                ],
            ),
        }
        overlay.mute_toggle(hud.muted, cols);
        overlay
    }

    /// Which button, if any, sits under a click at (col, row).
    pub fn button_at(&self, col: u16, row: u16) -> Option<Button> {
        self.hotspots
            .iter()
            .find(|h| h.contains(col, row))
            .map(|h| h.button)
    }

    fn score(&mut self, score: u32, cols: u16, rows: u16) {
        let glyphs = big_number(score);
        let top = if rows > 12 { 2 } else { 0 };
        let col = (cols / 2).saturating_sub(width_of(&glyphs[0]) / 2);
        for (i, text) in glyphs.into_iter().enumerate() {
            self.labels.push(Label {
                col,
                row: top + i as u16,
                text,
                fg: WHITE,
                bg: None,
                bold: false,
            });
        }
    }

    /// Centred box with one padded label per line.
    fn panel(&mut self, cols: u16, rows: u16, lines: Vec<Line>) {
        let inner = lines.iter().map(|l| width_of(&l.text)).max().unwrap_or(0);
        let width = inner + 6;
        let height = lines.len() as u16 + 2;
        let left = (cols / 2).saturating_sub(width / 2);
        let top = (rows / 2).saturating_sub(height / 2);

        let blank = " ".repeat(width as usize);
        self.labels.push(Label {
            col: left,
            row: top,
            text: blank.clone(),
            fg: WHITE,
            bg: Some(PANEL),
            bold: false,
        });
        for (i, line) in lines.into_iter().enumerate() {
            let row = top + 1 + i as u16;
            let w = width_of(&line.text);
            let pad_left = (width - w) / 2;

            self.labels.push(Label {
                col: left,
                row,
                text: " ".repeat(width as usize),
                fg: WHITE,
                bg: Some(PANEL),
                bold: false,
            });
            if w == 0 {
                continue;
            }
            let bg = if line.button.is_some() { BUTTON } else { PANEL };
            self.labels.push(Label {
                col: left + pad_left,
                row,
                text: line.text,
                fg: line.fg,
                bg: Some(bg),
                bold: line.bold,
            });
            if let Some(button) = line.button {
                self.hotspots.push(Hotspot {
                    button,
                    col: left + pad_left,
                    row,
                    width: w,
                });
            }
        }
        self.labels.push(Label {
            col: left,
            row: top + height - 1,
            text: blank,
            fg: WHITE,
            bg: Some(PANEL),
            bold: false,
        });
    }

    fn mute_toggle(&mut self, muted: bool, cols: u16) {
        let text = if muted {
            " Sound: off [M] "
        } else {
            " Sound: on  [M] "
        };
        let w = width_of(text);
        let col = cols.saturating_sub(w + 2);
        self.labels.push(Label {
            col,
            row: 1,
            text: text.to_string(),
            fg: WHITE,
            bg: Some(TOGGLE),
            bold: false,
        });
        self.hotspots.push(Hotspot {
            button: Button::Mute,
            col,
            row: 1,
            width: w,
        });
    }

    /// Queue every label to `out`. The caller flushes.
    pub fn paint(&self, out: &mut impl Write) -> io::Result<()> {
        for label in &self.labels {
            queue!(out, style::SetForegroundColor(label.fg.to_crossterm()))?;
            if label.bold {
                queue!(out, style::SetAttribute(Attribute::Bold))?;
            }
            match label.bg {
                Some(bg) => {
                    queue!(
                        out,
                        style::SetBackgroundColor(bg.to_crossterm()),
                        cursor::MoveTo(label.col, label.row),
                        style::Print(&label.text)
                    )?;
                }
                None => {
                    for (i, ch) in label.text.chars().enumerate() {
                        if ch != ' ' {
                            let col = label.col.saturating_add(i as u16);
                            queue!(out, cursor::MoveTo(col, label.row), style::Print(ch))?;
                        }
                    }
                }
            }
            queue!(out, style::SetAttribute(Attribute::Reset), style::ResetColor)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hud(phase: Phase) -> HudState {
        HudState {
            phase,
            score: 12,
            high_score: 30,
            muted: false,
        }
    }

    fn texts(o: &Overlay) -> Vec<&str> {
        o.labels.iter().map(|l| l.text.as_str()).collect()
    }

    #[test]
    fn big_number_layout() {
        let rows = big_number(10);
        assert_eq!(rows[0], " \u{2588}  \u{2588}\u{2588}\u{2588}");
        for row in &rows {
            assert_eq!(row.chars().count(), 7);
        }
        assert_eq!(big_number(7)[4], " \u{2588} ");
    }

    #[test]
    fn ready_shows_title_and_best() {
        let o = Overlay::compose(hud(Phase::Ready), 80, 24);
        let t = texts(&o);
        assert!(t.contains(&"Flappy Bird"));
        assert!(t.contains(&"Click or Press Space to Fly"));
        assert!(t.contains(&"High Score: 30"));
        assert_eq!(o.button_at(0, 0), None);
        assert!(o.hotspots.iter().all(|h| h.button != Button::Restart));
    }

    #[test]
    fn playing_shows_only_score_and_toggle() {
        let o = Overlay::compose(hud(Phase::Playing), 80, 24);
        let glyph_rows: Vec<_> = o.labels.iter().filter(|l| l.bg.is_none()).collect();
        assert_eq!(glyph_rows.len(), 5);
        assert_eq!(glyph_rows[0].text, big_number(12)[0]);
        assert_eq!(o.labels.len(), 6);
    }

    #[test]
    fn ended_has_scores_and_restart_button() {
        let o = Overlay::compose(hud(Phase::Ended), 80, 24);
        let t = texts(&o);
        assert!(t.contains(&"Game Over!"));
        assert!(t.contains(&"Score: 12"));
        assert!(t.contains(&"Best: 30"));

        let spot = o
            .hotspots
            .iter()
            .find(|h| h.button == Button::Restart)
            .copied()
            .unwrap();
        assert_eq!(o.button_at(spot.col, spot.row), Some(Button::Restart));
        assert_eq!(
            o.button_at(spot.col + spot.width - 1, spot.row),
            Some(Button::Restart)
        );
        assert_eq!(o.button_at(spot.col + spot.width, spot.row), None);
        assert_eq!(o.button_at(spot.col, spot.row + 1), None);
    }

    #[test]
    fn mute_toggle_reflects_state_and_is_clickable() {
        let on = Overlay::compose(hud(Phase::Ready), 80, 24);
        assert!(texts(&on).contains(&" Sound: on  [M] "));
        let off = Overlay::compose(
            HudState {
                muted: true,
                ..hud(Phase::Ready)
            },
            80,
            24,
        );
        assert!(texts(&off).contains(&" Sound: off [M] "));
        assert_eq!(off.button_at(80 - 18, 1), Some(Button::Mute));
    }

    #[test]
    fn tiny_terminal_does_not_underflow() {
        for phase in [Phase::Ready, Phase::Playing, Phase::Ended] {
            let o = Overlay::compose(hud(phase), 4, 3);
            assert!(!o.labels.is_empty());
        }
    }

    #[test]
    fn paint_writes_label_text() {
        let o = Overlay::compose(hud(Phase::Ended), 80, 24);
        let mut out = Vec::new();
        o.paint(&mut out).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.contains("Game Over!"));
        assert!(s.contains("Play Again (R)"));
    }
}
