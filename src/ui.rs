//! Terminal UI rendering with ratatui

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::game::{Game, Phase};
use crate::settings::Settings;
use crate::shape::Shape;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const EMPTY: &str = "  ";

/// Board box width: 7 columns * 2 chars + 2 for borders
const BOARD_BOX_WIDTH: u16 = BOARD_WIDTH as u16 * 2 + 2;
/// Next box is wide enough for the widest unrotated template
const NEXT_BOX_WIDTH: u16 = 10;
const GAME_WIDTH: u16 = BOARD_BOX_WIDTH + NEXT_BOX_WIDTH;
const GAME_HEIGHT: u16 = BOARD_HEIGHT as u16 + 2;

/// Render the frame for the active phase
///
/// Title and GameOver are stubs and draw nothing.
pub fn render(frame: &mut Frame, game: &Game, settings: &Settings) {
    match game.phase {
        Phase::InGame => render_in_game(frame, game, settings),
        Phase::Title | Phase::GameOver => {}
    }
}

fn render_in_game(frame: &mut Frame, game: &Game, settings: &Settings) {
    let area = frame.area();
    let block_char = settings.visual.block_char();

    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BOARD_BOX_WIDTH),
            Constraint::Length(NEXT_BOX_WIDTH),
        ])
        .split(game_area);

    render_board(frame, main_layout[0], game, block_char);
    render_next(frame, main_layout[1], &game.next, block_char);
}

/// Draw settled blocks, then the falling shape on top
fn render_board(frame: &mut Frame, area: Rect, game: &Game, block_char: &'static str) {
    let block = Block::default()
        .title(" BLOCKFALL ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    for row in 0..BOARD_HEIGHT {
        let mut spans = Vec::new();
        for col in 0..BOARD_WIDTH {
            let color = falling_cell(game, col, row)
                .or_else(|| game.board.get(col, row).filter(|&cell| cell != 0));
            match color {
                Some(argb) => {
                    spans.push(Span::styled(
                        block_char,
                        Style::default().fg(argb_color(argb)),
                    ));
                }
                None => spans.push(Span::raw(EMPTY)),
            }
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// The falling shape's cell covering (col, row), if occupied
fn falling_cell(game: &Game, col: usize, row: usize) -> Option<u32> {
    if col < game.x || row < game.y {
        return None;
    }
    let px = col - game.x;
    let py = row - game.y;
    if px >= game.current.width() || py >= game.current.height() {
        return None;
    }
    let color = game.current.cell(px, py);
    (color != 0).then_some(color)
}

/// Preview box for the queued shape
fn render_next(frame: &mut Frame, area: Rect, next: &Shape, block_char: &'static str) {
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![Line::raw("")];
    for py in 0..next.height() {
        let mut spans = Vec::new();
        for px in 0..next.width() {
            let color = next.cell(px, py);
            if color != 0 {
                spans.push(Span::styled(
                    block_char,
                    Style::default().fg(argb_color(color)),
                ));
            } else {
                spans.push(Span::raw(EMPTY));
            }
        }
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

/// Unpack 0xAARRGGBB into a terminal RGB color; alpha is ignored
fn argb_color(argb: u32) -> Color {
    let r = ((argb >> 16) & 0xFF) as u8;
    let g = ((argb >> 8) & 0xFF) as u8;
    let b = (argb & 0xFF) as u8;
    Color::Rgb(r, g, b)
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::Shape;
    use crate::template::{COLORS, T_TEMPLATE};

    #[test]
    fn test_argb_color_unpacks_channels() {
        assert_eq!(argb_color(0xFFCC6666), Color::Rgb(0xCC, 0x66, 0x66));
        assert_eq!(argb_color(0xFFDAAA00), Color::Rgb(0xDA, 0xAA, 0x00));
    }

    #[test]
    fn test_falling_cell_tracks_anchor() {
        let mut game = Game::with_seed(5);
        game.set_phase(Phase::InGame);
        game.current = Shape::from_template(&T_TEMPLATE, COLORS[0]);
        game.x = 2;
        game.y = 3;
        assert_eq!(falling_cell(&game, 2, 3), Some(COLORS[0]));
        assert_eq!(falling_cell(&game, 3, 4), Some(COLORS[0]));
        // hollow corner of the T
        assert_eq!(falling_cell(&game, 2, 4), None);
        // outside the bounding box
        assert_eq!(falling_cell(&game, 1, 3), None);
        assert_eq!(falling_cell(&game, 5, 3), None);
    }

    #[test]
    fn test_center_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 10, 5);
        let centered = center_rect(area, 100, 100);
        assert_eq!(centered.width, 10);
        assert_eq!(centered.height, 5);
    }
}
