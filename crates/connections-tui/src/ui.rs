use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Wrap},
    Frame,
};

use crate::game::{Game, Overlay, Screen, BOARD_COLUMNS, GAME_OVER_MESSAGE};
use connections_core::{Difficulty, Storage};

// ── Constants ────────────────────────────────────────────────────────────────

const TILE_WIDTH: u16 = 16;
const TILE_HEIGHT: u16 = 3;
const BOARD_WIDTH: u16 = TILE_WIDTH * BOARD_COLUMNS as u16;

// ── Public entry point ───────────────────────────────────────────────────────

pub fn draw<S: Storage>(f: &mut Frame, game: &Game<S>) {
    match game.screen() {
        Screen::Loading => draw_loading(f, game),
        Screen::Menu => draw_menu(f, game),
        Screen::Playing => draw_playing(f, game),
    }

    match game.overlay {
        Overlay::None => {}
        Overlay::Hints => draw_hints(f, game),
        Overlay::HowToPlay => draw_how_to_play(f),
        Overlay::QuitConfirm => draw_quit_confirm(f),
    }
}

// ── Loading screen ───────────────────────────────────────────────────────────

fn draw_loading<S: Storage>(f: &mut Frame, game: &Game<S>) {
    let area = center_rect(50, 5, f.area());
    let lines = if game.state().load_error {
        vec![
            Line::from(Span::styled(
                "Could not load today's puzzle.",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Check the server and try again later.  q to quit",
                Style::default().fg(Color::Gray),
            )),
        ]
    } else {
        vec![Line::from(Span::styled(
            "Loading today's puzzle...",
            Style::default().fg(Color::Gray),
        ))]
    };
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

// ── Menu screen ──────────────────────────────────────────────────────────────

fn draw_menu<S: Storage>(f: &mut Frame, game: &Game<S>) {
    let chunks = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(4),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Min(0),
    ])
    .split(center_rect(60, 16, f.area()));

    let heading = Paragraph::new(vec![
        Line::from(Span::styled(
            game.menu_heading(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            game.menu_description(),
            Style::default().fg(Color::White),
        )),
    ])
    .alignment(Alignment::Center);
    f.render_widget(heading, chunks[1]);

    let button = Paragraph::new(Line::from(Span::styled(
        format!("  {}  ", game.menu_button()),
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(button, chunks[3]);

    if let Some((id, editor, date)) = game.puzzle_details() {
        let details = Paragraph::new(vec![
            Line::from(Span::styled(date, Style::default().fg(Color::White))),
            Line::from(Span::styled(
                format!("No. {}", id),
                Style::default().fg(Color::Gray),
            )),
            Line::from(Span::styled(
                format!("Edited by {}", editor),
                Style::default().fg(Color::Gray),
            )),
        ])
        .alignment(Alignment::Center);
        f.render_widget(details, chunks[5]);
    }

    let keys = Line::from(vec![
        Span::styled(" Enter", Style::default().fg(Color::Yellow)),
        Span::styled(" Play  ", Style::default().fg(Color::Gray)),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::styled(" How to play  ", Style::default().fg(Color::Gray)),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::styled(" Quit", Style::default().fg(Color::Gray)),
    ]);
    let area = f.area();
    let bar = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
    f.render_widget(
        Paragraph::new(keys).style(Style::default().bg(Color::DarkGray)),
        bar,
    );
}

// ── Playing screen ───────────────────────────────────────────────────────────

fn draw_playing<S: Storage>(f: &mut Frame, game: &Game<S>) {
    let area = f.area();
    let state = game.state();

    let outer = Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).split(area);

    let completed = state.completed_groups.len() as u16;
    let remaining_rows = game.remaining_words().len().div_ceil(BOARD_COLUMNS) as u16;
    let main = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(completed * TILE_HEIGHT),
        Constraint::Length(remaining_rows * TILE_HEIGHT),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .split(outer[0]);

    let title = Paragraph::new(Line::from(Span::styled(
        "Create four groups of four!",
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center);
    f.render_widget(title, main[1]);

    draw_completed(f, game, centered_columns(main[3], BOARD_WIDTH));
    draw_board(f, game, centered_columns(main[4], BOARD_WIDTH));

    let status = if state.game_over {
        Line::from(Span::styled(
            GAME_OVER_MESSAGE,
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(vec![
            Span::styled("Mistakes: ", Style::default().fg(Color::Gray)),
            Span::styled(
                state.incorrect_count.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::styled("   Selected: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}/4", state.selected.len()),
                Style::default().fg(Color::White),
            ),
        ])
    };
    f.render_widget(Paragraph::new(status).alignment(Alignment::Center), main[6]);

    let toasts: Vec<Span> = game
        .toasts
        .iter()
        .map(|t| {
            Span::styled(
                format!(" {} ", t),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
        })
        .collect();
    f.render_widget(
        Paragraph::new(Line::from(toasts)).alignment(Alignment::Center),
        main[7],
    );

    draw_key_hints(f, outer[1]);
}

fn draw_completed<S: Storage>(f: &mut Frame, game: &Game<S>, area: Rect) {
    let rows = game.state().completed_groups.len();
    if rows == 0 {
        return;
    }
    let chunks = Layout::vertical(vec![Constraint::Length(TILE_HEIGHT); rows]).split(area);

    for (completed, chunk) in game.state().completed_groups.iter().zip(chunks.iter()) {
        let color = difficulty_color(completed.group.difficulty_rank);
        let words: Vec<&str> = completed
            .group
            .words
            .iter()
            .map(String::as_str)
            .collect();
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .style(Style::default().fg(color));
        let text = Paragraph::new(vec![
            Line::from(Span::styled(
                completed.group_name.clone(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
        ])
        .block(block.title(format!(" {} ", words.join(", "))))
        .alignment(Alignment::Center);
        f.render_widget(text, *chunk);
    }
}

fn draw_board<S: Storage>(f: &mut Frame, game: &Game<S>, area: Rect) {
    let state = game.state();
    let words = game.remaining_words();
    let rows = words.len().div_ceil(BOARD_COLUMNS);
    if rows == 0 {
        return;
    }

    let row_chunks = Layout::vertical(vec![Constraint::Length(TILE_HEIGHT); rows]).split(area);
    for (r, row_area) in row_chunks.iter().enumerate() {
        let cols = Layout::horizontal(vec![Constraint::Length(TILE_WIDTH); BOARD_COLUMNS])
            .split(*row_area);
        for (c, tile) in cols.iter().enumerate() {
            let index = r * BOARD_COLUMNS + c;
            let Some(word) = words.get(index) else {
                continue;
            };
            let content = word.content.as_str();
            let is_cursor = index == game.cursor;
            let is_selected = state.is_selected(content);
            let is_wrong = game.wrong.iter().any(|w| w == content);
            let is_checking = game.checking.iter().any(|w| w == content);

            let (fg, bg) = if is_wrong {
                (Color::White, Color::Red)
            } else if is_checking {
                (Color::Black, Color::Cyan)
            } else if is_selected {
                (Color::White, Color::DarkGray)
            } else {
                (Color::Gray, Color::Reset)
            };
            let mut style = Style::default().fg(fg).bg(bg);
            if is_selected || is_checking {
                style = style.add_modifier(Modifier::BOLD);
            }
            if game.shuffling {
                style = style.add_modifier(Modifier::DIM);
            }

            let border = if is_cursor {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let block = Block::bordered()
                .border_type(if is_cursor {
                    BorderType::Thick
                } else {
                    BorderType::Rounded
                })
                .border_style(border);

            let text = Paragraph::new(Line::from(Span::styled(content.to_uppercase(), style)))
                .block(block)
                .alignment(Alignment::Center);
            f.render_widget(text, *tile);
        }
    }
}

fn draw_key_hints(f: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::styled(" ←↑↓→", Style::default().fg(Color::Yellow)),
        Span::styled(" Move  ", Style::default().fg(Color::Gray)),
        Span::styled("Spc", Style::default().fg(Color::Yellow)),
        Span::styled(" Select  ", Style::default().fg(Color::Gray)),
        Span::styled("Enter", Style::default().fg(Color::Yellow)),
        Span::styled(" Submit  ", Style::default().fg(Color::Gray)),
        Span::styled("s", Style::default().fg(Color::Yellow)),
        Span::styled(" Shuffle  ", Style::default().fg(Color::Gray)),
        Span::styled("d", Style::default().fg(Color::Yellow)),
        Span::styled(" Deselect  ", Style::default().fg(Color::Gray)),
        Span::styled("h", Style::default().fg(Color::Yellow)),
        Span::styled(" Hints  ", Style::default().fg(Color::Gray)),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::styled(" Help  ", Style::default().fg(Color::Gray)),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::styled(" Quit", Style::default().fg(Color::Gray)),
    ]);

    let bar = Paragraph::new(hints).style(Style::default().bg(Color::DarkGray));
    f.render_widget(bar, area);
}

// ── Popups ───────────────────────────────────────────────────────────────────

fn draw_hints<S: Storage>(f: &mut Frame, game: &Game<S>) {
    let word_hints = game.word_hints();
    let title_hints = game.title_hints();
    let height = 8 + word_hints.len() as u16 + title_hints.len() as u16;
    let popup = center_rect(48, height, f.area());

    f.render_widget(Clear, popup);

    let block = Block::bordered()
        .title(" Hints ")
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Color::Cyan));

    let mut lines = vec![
        Line::from(Span::styled(
            "Press 1-4 to reveal a word from each group.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
    ];
    for (i, hint) in word_hints.iter().enumerate() {
        let color = difficulty_color(hint.difficulty);
        let text = if game.revealed_hints.contains(&i) {
            hint.text.to_uppercase()
        } else {
            "?????".to_string()
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} {:<16}", i + 1, hint.difficulty.label()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(text, Style::default().fg(Color::White)),
        ]));
    }

    lines.push(Line::from(""));
    if title_hints.is_empty() {
        lines.push(Line::from(Span::styled(
            "Group titles unlock after 5 mistakes.",
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "Group titles",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )));
        for hint in &title_hints {
            lines.push(Line::from(Span::styled(
                hint.text.clone(),
                Style::default().fg(difficulty_color(hint.difficulty)),
            )));
        }
    }

    let text = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    f.render_widget(text, popup);
}

fn draw_how_to_play(f: &mut Frame) {
    let popup = center_rect(56, 16, f.area());

    f.render_widget(Clear, popup);

    let block = Block::bordered()
        .title(" How to Play ")
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Color::White));

    let mut lines = vec![
        Line::from("Find groups of four items that share something in common."),
        Line::from(""),
        Line::from("Select four items and press Enter to check if your guess is correct."),
        Line::from(""),
        Line::from("Each puzzle has exactly one solution. Watch out for words that seem to belong to multiple categories!"),
        Line::from(""),
        Line::from("Each group is assigned a colour, revealed as you solve:"),
    ];
    for &d in Difficulty::all() {
        lines.push(Line::from(Span::styled(
            format!("  {}", d.label()),
            Style::default().fg(difficulty_color(d)),
        )));
    }

    let text = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(text, popup);
}

fn draw_quit_confirm(f: &mut Frame) {
    let area = f.area();
    let popup = center_rect(36, 7, area);

    f.render_widget(Clear, popup);

    let block = Block::bordered()
        .title(" Quit? ")
        .border_type(BorderType::Rounded)
        .style(Style::default().fg(Color::Red));

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Progress is saved. Quit now?",
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "Y",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("/", Style::default().fg(Color::Gray)),
            Span::styled(
                "Enter",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" Yes   ", Style::default().fg(Color::Gray)),
            Span::styled(
                "Any key",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" No", Style::default().fg(Color::Gray)),
        ]),
    ])
    .block(block)
    .alignment(Alignment::Center);

    f.render_widget(text, popup);
}

// ── Layout helpers ───────────────────────────────────────────────────────────

fn center_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vert = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(height),
        Constraint::Min(0),
    ])
    .split(area);

    centered_columns(vert[1], width)
}

fn centered_columns(area: Rect, width: u16) -> Rect {
    let horiz = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(width),
        Constraint::Min(0),
    ])
    .split(area);

    horiz[1]
}

fn difficulty_color(d: Difficulty) -> Color {
    match d {
        Difficulty::Straightforward => Color::Yellow,
        Difficulty::Easy => Color::Green,
        Difficulty::Medium => Color::Blue,
        Difficulty::Tricky => Color::Magenta,
    }
}
