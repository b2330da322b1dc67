//! Terminal drawing of a running session.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::game::GameState;
use crate::session::MazeSession;
use crate::world::{BodyView, PhysicsWorld, Tag};

/// Terminal columns per canvas cell.
const CELL_W: usize = 2;
/// Smallest number of canvas cells a maze cell may shrink to.
const MIN_CELL_SPAN: f32 = 2.0;

#[derive(Clone, Copy, PartialEq, Debug)]
enum Glyph {
    Empty,
    Wall,
    Goal,
    Ball,
}

impl Glyph {
    fn for_tag(tag: Tag) -> Self {
        match tag {
            Tag::Wall => Glyph::Wall,
            Tag::Goal => Glyph::Goal,
            Tag::Ball => Glyph::Ball,
        }
    }

    fn text(self) -> (&'static str, Color) {
        match self {
            Glyph::Empty => ("  ", Color::Reset),
            Glyph::Wall => ("██", Color::Red),
            Glyph::Goal => ("▓▓", Color::Green),
            Glyph::Ball => ("●", Color::Blue),
        }
    }
}

/// A grid of glyphs covering the world at a fixed scale.
#[derive(Debug)]
struct Canvas {
    width: usize,
    height: usize,
    scale: f32,
    cells: Vec<Glyph>,
}

impl Canvas {
    fn new(width: usize, height: usize, scale: f32) -> Self {
        Self {
            width,
            height,
            scale,
            cells: vec![Glyph::Empty; width * height],
        }
    }

    /// Marks every cell overlapped by `body`. Bodies outside the canvas are skipped.
    fn paint(&mut self, body: &BodyView) {
        let span = |min: f32, max: f32, len: usize| -> Option<(usize, usize)> {
            let lo = (min * self.scale).floor();
            let hi = (max * self.scale).ceil() - 1.0;
            if hi < 0.0 || lo >= len as f32 {
                return None;
            }
            let lo = lo.max(0.0) as usize;
            let hi = (hi.max(lo as f32) as usize).min(len - 1);
            Some((lo, hi))
        };
        let Some((x0, x1)) = span(body.min.x, body.max.x, self.width) else {
            return;
        };
        let Some((y0, y1)) = span(body.min.y, body.max.y, self.height) else {
            return;
        };
        let glyph = Glyph::for_tag(body.tag);
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.cells[y * self.width + x] = glyph;
            }
        }
    }

    fn get(&self, x: usize, y: usize) -> Glyph {
        self.cells[y * self.width + x]
    }
}

/// Draws bodies back to front so the ball is never hidden.
fn rasterize(views: &[BodyView], width: usize, height: usize, scale: f32) -> Canvas {
    let mut canvas = Canvas::new(width, height, scale);
    for tag in [Tag::Wall, Tag::Goal, Tag::Ball] {
        for view in views.iter().filter(|v| v.tag == tag) {
            canvas.paint(view);
        }
    }
    canvas
}

pub struct Renderer {
    last: Vec<Glyph>,
    last_hud: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
    canvas_w: usize,
    canvas_h: usize,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            last: Vec::new(),
            last_hud: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
            canvas_w: 0,
            canvas_h: 0,
        }
    }

    pub fn render<W: PhysicsWorld>(
        &mut self,
        out: &mut impl Write,
        session: &MazeSession<W>,
    ) -> io::Result<()> {
        let layout = session.layout();
        let (term_w, term_h) = terminal::size()?;
        let avail_w = (term_w as usize / CELL_W).saturating_sub(1) as f32;
        let avail_h = (term_h as usize).saturating_sub(3) as f32;
        let scale = (avail_w / layout.width).min(avail_h / layout.height);

        out.queue(MoveTo(0, 0))?;
        if scale * layout.cell_width.min(layout.cell_height) < MIN_CELL_SPAN {
            out.queue(Clear(ClearType::All))?;
            let need_w = (MIN_CELL_SPAN * layout.width / layout.cell_width.min(layout.cell_height))
                .ceil() as usize
                + 1;
            let need_h = (MIN_CELL_SPAN * layout.height / layout.cell_width.min(layout.cell_height))
                .ceil() as usize
                + 3;
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                need_w * CELL_W,
                need_h,
                term_w,
                term_h
            );
            out.queue(Print(msg))?;
            out.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let canvas_w = (layout.width * scale) as usize + 1;
        let canvas_h = (layout.height * scale) as usize + 1;
        let origin_x = ((term_w as usize).saturating_sub(canvas_w * CELL_W) / 2) as u16;
        let origin_y = ((term_h as usize).saturating_sub(canvas_h + 2) / 2 + 1) as u16;
        if (origin_x, origin_y, canvas_w, canvas_h)
            != (self.origin_x, self.origin_y, self.canvas_w, self.canvas_h)
        {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.canvas_w = canvas_w;
            self.canvas_h = canvas_h;
            self.last = vec![Glyph::Empty; canvas_w * canvas_h];
            self.needs_full = true;
        }
        if self.needs_full {
            out.queue(Clear(ClearType::All))?;
        }

        let state = match session.state() {
            GameState::Playing => "find the green goal",
            GameState::Won => "solved",
        };
        let hud = format!(
            "Maze {}x{}  seed {}  {}  (WASD/arrows to move, q to quit)",
            session.grid().rows(),
            session.grid().cols(),
            session.seed(),
            state
        );
        if self.needs_full || hud != self.last_hud {
            out.queue(MoveTo(self.origin_x, self.origin_y - 1))?;
            out.queue(SetForegroundColor(Color::White))?;
            out.queue(Clear(ClearType::CurrentLine))?;
            out.queue(Print(&hud))?;
            out.queue(ResetColor)?;
            self.last_hud = hud;
        }

        let canvas = rasterize(&session.world().snapshot(), canvas_w, canvas_h, scale);
        for y in 0..canvas_h {
            for x in 0..canvas_w {
                let glyph = canvas.get(x, y);
                let idx = y * canvas_w + x;
                if self.needs_full || glyph != self.last[idx] {
                    self.last[idx] = glyph;
                    self.draw_cell(out, x, y, glyph)?;
                }
            }
        }

        if session.state() == GameState::Won {
            out.queue(MoveTo(self.origin_x, self.origin_y + canvas_h as u16))?;
            out.queue(SetForegroundColor(Color::Green))?;
            out.queue(Print("You win! (press q to quit)"))?;
            out.queue(ResetColor)?;
        }
        self.needs_full = false;

        out.flush()?;
        Ok(())
    }

    fn draw_cell(&self, out: &mut impl Write, x: usize, y: usize, glyph: Glyph) -> io::Result<()> {
        let (text, color) = glyph.text();
        let x_pos = self.origin_x + (x * CELL_W) as u16;
        let y_pos = self.origin_y + y as u16;
        out.queue(MoveTo(x_pos, y_pos))?;
        out.queue(SetForegroundColor(color))?;
        out.queue(Print(text))?;
        let w = UnicodeWidthStr::width(text);
        if w < CELL_W {
            for _ in 0..(CELL_W - w) {
                out.queue(Print(' '))?;
            }
        }
        out.queue(ResetColor)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Vector;

    fn view(tag: Tag, min: (f32, f32), max: (f32, f32)) -> BodyView {
        BodyView {
            tag,
            min: Vector::new(min.0, min.1),
            max: Vector::new(max.0, max.1),
        }
    }

    #[test]
    fn thin_walls_still_cover_a_cell() {
        let views = [view(Tag::Wall, (29.0, 0.0), (31.0, 30.0))];
        let canvas = rasterize(&views, 7, 7, 0.1);
        assert_eq!(canvas.get(2, 0), Glyph::Wall);
        assert_eq!(canvas.get(2, 2), Glyph::Wall);
        assert_eq!(canvas.get(0, 0), Glyph::Empty);
        assert_eq!(canvas.get(4, 0), Glyph::Empty);
    }

    #[test]
    fn ball_drawn_over_goal() {
        let views = [
            view(Tag::Ball, (10.0, 10.0), (20.0, 20.0)),
            view(Tag::Goal, (0.0, 0.0), (30.0, 30.0)),
        ];
        let canvas = rasterize(&views, 4, 4, 0.1);
        assert_eq!(canvas.get(1, 1), Glyph::Ball);
        assert_eq!(canvas.get(0, 0), Glyph::Goal);
    }

    #[test]
    fn bodies_off_canvas_are_skipped() {
        let views = [view(Tag::Wall, (0.0, 500.0), (30.0, 505.0))];
        let canvas = rasterize(&views, 4, 4, 0.1);
        assert!(canvas.cells.iter().all(|&g| g == Glyph::Empty));
    }

    #[test]
    fn glyphs_fit_the_cell() {
        for glyph in [Glyph::Empty, Glyph::Wall, Glyph::Goal, Glyph::Ball] {
            assert!(UnicodeWidthStr::width(glyph.text().0) <= CELL_W);
        }
    }
}
