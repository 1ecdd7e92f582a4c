//! BoardView: maps a [`GameSnapshot`] plus presentation state into a framebuffer.
//!
//! Pure drawing, no I/O, so it can be unit-tested against plain buffers.

use crate::core::{GamePhase, GameSnapshot};
use crate::decor::Decoration;
use crate::fb::{Cell, FrameBuffer, Rgb, Style};
use crate::popups::PopupLayer;
use crate::theme::TileTheme;
use crate::types::{CellPos, EMPTY_LEVEL};

/// Terminal size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Everything drawn in one frame.
pub struct Scene<'a> {
    pub snapshot: &'a GameSnapshot,
    pub theme: &'a TileTheme,
    pub popups: &'a PopupLayer,
    pub decorations: &'a [Decoration],
}

/// Rows above the board frame (HUD plus a spacer).
const HUD_ROWS: u16 = 2;
/// Rows below the board frame (spacer plus status line).
const STATUS_ROWS: u16 = 2;
/// Candidate cell sizes, largest first. Terminal glyphs are about twice as
/// tall as wide, so cells are wider than high.
const CELL_SIZES: [(u16, u16); 4] = [(8, 3), (6, 3), (4, 2), (2, 1)];

const TIMER_WARN_SECS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    cell_w: u16,
    cell_h: u16,
    x: u16,
    y: u16,
    frame_w: u16,
    frame_h: u16,
}

impl Layout {
    /// Top-left terminal cell of a board cell's rectangle.
    fn origin(&self, pos: CellPos) -> (u16, u16) {
        (
            self.x + 1 + pos.col * self.cell_w,
            self.y + 1 + pos.row * self.cell_h,
        )
    }
}

#[derive(Debug, Default)]
pub struct BoardView {
    /// Force one cell size instead of picking the largest that fits.
    fixed_cell: Option<(u16, u16)>,
}

impl BoardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cell_size(cell_w: u16, cell_h: u16) -> Self {
        Self {
            fixed_cell: Some((cell_w.max(1), cell_h.max(1))),
        }
    }

    fn layout(&self, snap: &GameSnapshot, viewport: Viewport) -> Layout {
        let fits = |(cw, ch): (u16, u16)| {
            let w = snap.width.saturating_mul(cw).saturating_add(2);
            let h = snap
                .height
                .saturating_mul(ch)
                .saturating_add(2 + HUD_ROWS + STATUS_ROWS);
            w <= viewport.width && h <= viewport.height
        };
        let (cell_w, cell_h) = self.fixed_cell.unwrap_or_else(|| {
            CELL_SIZES
                .iter()
                .copied()
                .find(|&size| fits(size))
                .unwrap_or(CELL_SIZES[CELL_SIZES.len() - 1])
        });

        let frame_w = snap.width.saturating_mul(cell_w).saturating_add(2);
        let frame_h = snap.height.saturating_mul(cell_h).saturating_add(2);
        let total_h = frame_h + HUD_ROWS + STATUS_ROWS;
        Layout {
            cell_w,
            cell_h,
            x: viewport.width.saturating_sub(frame_w) / 2,
            y: viewport.height.saturating_sub(total_h) / 2 + HUD_ROWS,
            frame_w,
            frame_h,
        }
    }

    /// Render into a reusable framebuffer, resizing it to the viewport.
    pub fn render_into(&self, scene: &Scene<'_>, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Cell::default());

        let theme = scene.theme;
        if theme.decorations {
            let style = Style::new(Rgb::new(110, 110, 125), Rgb::BLACK);
            for decoration in scene.decorations {
                decoration.draw_into(fb, style);
            }
        }

        let snap = scene.snapshot;
        if snap.width == 0 || snap.height == 0 {
            let style = Style::default().dim();
            fb.put_centered(0, viewport.height / 2, viewport.width, "preparing board...", style);
            return;
        }

        let layout = self.layout(snap, viewport);
        self.draw_hud(fb, snap, &layout);
        self.draw_board(fb, snap, theme, &layout);
        self.draw_popups(fb, scene.popups, theme, &layout);
        self.draw_status(fb, snap, &layout);
    }

    pub fn render(&self, scene: &Scene<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(scene, viewport, &mut fb);
        fb
    }

    fn draw_hud(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, layout: &Layout) {
        let y = layout.y.saturating_sub(HUD_ROWS);
        let label = Style::new(Rgb::new(150, 150, 160), Rgb::BLACK);
        let value = Style::default().bold();

        let mut x = layout.x;
        x = fb.put_str(x, y, "SCORE ", label);
        x = fb.put_str(x, y, &snap.score.to_string(), value);
        x = fb.put_str(x, y, "  BEST ", label);
        x = fb.put_str(x, y, &snap.high_score.to_string(), value);
        x = fb.put_str(x, y, "  COMBO ", label);
        x = fb.put_str(x, y, &format!("x{:.1}", snap.combo), value);
        x = fb.put_str(x, y, "  TIME ", label);

        let timer = if snap.time_left <= TIMER_WARN_SECS && snap.phase == GamePhase::Playing {
            Style::new(Rgb::new(240, 80, 70), Rgb::BLACK).bold()
        } else {
            value
        };
        fb.put_str(x, y, &snap.time_left.to_string(), timer);
    }

    fn draw_board(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, theme: &TileTheme, layout: &Layout) {
        let board = theme.board_style();
        fb.fill_rect(
            layout.x + 1,
            layout.y + 1,
            layout.frame_w - 2,
            layout.frame_h - 2,
            ' ',
            board,
        );
        fb.draw_frame(layout.x, layout.y, layout.frame_w, layout.frame_h, theme.frame_style());

        // Leave a one-cell gutter between tiles when there is room for it.
        let tile_w = if layout.cell_w >= 4 { layout.cell_w - 1 } else { layout.cell_w };
        let tile_h = if layout.cell_h >= 3 { layout.cell_h - 1 } else { layout.cell_h };

        for row in 0..snap.height {
            for col in 0..snap.width {
                let pos = CellPos::new(row, col);
                let (px, py) = layout.origin(pos);
                let mid_y = py + (tile_h - 1) / 2;
                let level = snap.level_at(pos);

                if level == EMPTY_LEVEL {
                    fb.put_centered(px, mid_y, tile_w, "·", board);
                    continue;
                }

                let digit = level.to_string();
                let (style, label) = match theme.tile(level) {
                    Some(tile) => (tile.style(), tile.label.as_str()),
                    // No model for this level: plain digit.
                    None => (Style::default().bold().on(Rgb::new(60, 60, 70)), digit.as_str()),
                };
                fb.fill_rect(px, py, tile_w, tile_h, ' ', style);
                let text = if label.chars().count() as u16 <= tile_w {
                    label
                } else {
                    digit.as_str()
                };
                fb.put_centered(px, mid_y, tile_w, text, style);
            }
        }
    }

    fn draw_popups(&self, fb: &mut FrameBuffer, popups: &PopupLayer, theme: &TileTheme, layout: &Layout) {
        let bright = Rgb::new(255, 230, 90);
        for popup in popups.iter() {
            let (px, py) = layout.origin(popup.cell);
            let y = py.saturating_sub(popup.rise());
            let fg = bright.mix(theme.board, popup.progress());
            let style = Style::new(fg, theme.board).bold();
            fb.put_centered(px, y, layout.cell_w, &popup.text, style);
        }
    }

    fn draw_status(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, layout: &Layout) {
        let y = layout.y + layout.frame_h + 1;
        let hint = Style::default().dim();
        let loud = Style::new(Rgb::WHITE, Rgb::BLACK).bold();

        let (text, style) = match snap.phase {
            GamePhase::Setup => ("loading tiles...".to_string(), hint),
            GamePhase::WaitingToStart => ("press SPACE to start  q quit".to_string(), loud),
            GamePhase::Playing => ("arrows/wasd/hjkl move  r restart  q quit".to_string(), hint),
            GamePhase::GameOver => {
                let reason = snap.game_over.map(|r| r.as_str()).unwrap_or("finished");
                (format!("GAME OVER: {reason}  r restart  q quit"), loud)
            }
        };
        fb.put_centered(layout.x, y, layout.frame_w, &text, style);

        if snap.phase == GamePhase::GameOver {
            let mid = layout.y + layout.frame_h / 2;
            fb.put_centered(layout.x, mid, layout.frame_w, " GAME OVER ", loud);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameOverReason;
    use crate::decor::default_decorations;

    fn snapshot(phase: GamePhase) -> GameSnapshot {
        GameSnapshot {
            phase,
            width: 4,
            height: 4,
            levels: vec![1, 0, 0, 0, 0, 2, 0, 0, 0, 0, 9, 0, 0, 0, 0, 0],
            score: 120,
            high_score: 300,
            combo: 1.5,
            time_left: 42,
            game_over: None,
        }
    }

    fn frame_text(fb: &FrameBuffer) -> String {
        (0..fb.height()).map(|y| fb.row_text(y) + "\n").collect()
    }

    fn render(snap: &GameSnapshot, theme: &TileTheme, popups: &PopupLayer) -> FrameBuffer {
        let decorations = default_decorations();
        let scene = Scene {
            snapshot: snap,
            theme,
            popups,
            decorations: &decorations,
        };
        BoardView::new().render(&scene, Viewport::new(80, 30))
    }

    #[test]
    fn draws_hud_and_tiles() {
        let theme = TileTheme::default();
        let fb = render(&snapshot(GamePhase::Playing), &theme, &PopupLayer::new());
        let text = frame_text(&fb);
        assert!(text.contains("SCORE 120"));
        assert!(text.contains("BEST 300"));
        assert!(text.contains("x1.5"));
        assert!(text.contains("TIME 42"));
        assert!(text.contains("tent"));
        assert!(text.contains("hut"));
        assert!(text.contains("city"));
        assert!(text.contains('┌'));
    }

    #[test]
    fn status_line_follows_phase() {
        let theme = TileTheme::default();
        let popups = PopupLayer::new();

        let text = frame_text(&render(&snapshot(GamePhase::Setup), &theme, &popups));
        assert!(text.contains("loading tiles"));

        let text = frame_text(&render(&snapshot(GamePhase::WaitingToStart), &theme, &popups));
        assert!(text.contains("press SPACE to start"));

        let mut over = snapshot(GamePhase::GameOver);
        over.game_over = Some(GameOverReason::TimeExpired);
        let text = frame_text(&render(&over, &theme, &popups));
        assert!(text.contains("GAME OVER: time expired"));
    }

    #[test]
    fn levels_without_model_fall_back_to_digits() {
        let theme = TileTheme::from_json(
            r#"{"tiles":[{"label":"a","fg":[0,0,0],"bg":[9,9,9]}],"decorations":false}"#,
        )
        .unwrap();
        let fb = render(&snapshot(GamePhase::Playing), &theme, &PopupLayer::new());
        let text = frame_text(&fb);
        assert!(text.contains('9'));
        assert!(!text.contains("city"));
    }

    #[test]
    fn small_viewport_uses_small_cells() {
        let theme = TileTheme::default();
        let mut snap = snapshot(GamePhase::Playing);
        snap.width = 10;
        snap.height = 10;
        snap.levels = vec![1; 100];
        let scene = Scene {
            snapshot: &snap,
            theme: &theme,
            popups: &PopupLayer::new(),
            decorations: &[],
        };
        let view = BoardView::new();
        let layout = view.layout(&snap, Viewport::new(40, 20));
        assert_eq!((layout.cell_w, layout.cell_h), (2, 1));

        let fb = view.render(&scene, Viewport::new(40, 20));
        assert_eq!(fb.width(), 40);
    }

    #[test]
    fn empty_snapshot_shows_placeholder() {
        let theme = TileTheme::default();
        let snap = GameSnapshot::default();
        let fb = render(&snap, &theme, &PopupLayer::new());
        assert!(frame_text(&fb).contains("preparing board"));
    }

    #[test]
    fn popups_are_drawn_over_the_board() {
        let theme = TileTheme::default();
        let mut ledger = crate::core::ScoreLedger::new(Box::new(crate::core::MemoryStore::new()));
        let award = ledger.record_merge(3, 2.0).unwrap();
        let mut popups = PopupLayer::new();
        popups.push(CellPos::new(2, 2), &award.popup);

        let fb = render(&snapshot(GamePhase::Playing), &theme, &popups);
        assert!(frame_text(&fb).contains("20x2"));
    }
}
