use itertools::Itertools;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use spelldrill::Phase;

use crate::{App, FlashKind};

const HORIZONTAL_MARGIN: u16 = 5;
const CONFETTI_COLORS: [Color; 5] = [
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
    Color::LightGreen,
    Color::LightRed,
];

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(2), // score and progress
            Constraint::Min(3),    // word
            Constraint::Length(2), // message
            Constraint::Length(if app.show_completed_words { 4 } else { 0 }),
            Constraint::Length(1), // help
        ])
        .split(area);

    match app.controller.phase() {
        // Building never outlives start_session, which runs on this thread
        Phase::Idle | Phase::Building => render_start(f, app, chunks[1]),
        _ => {
            render_status(f, app, chunks[0]);
            render_word(f, app, chunks[1]);
            render_flash(f, app, chunks[2]);
            if app.show_completed_words {
                render_completed(f, app, chunks[3]);
            }
        }
    }
    render_help(f, app, chunks[4]);

    if app.controller.phase() == Phase::SessionComplete {
        render_complete_overlay(f, app, area);
    }
    render_confetti(f, app, area);
}

fn render_start(f: &mut Frame, app: &App, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled("Spelling Drill", bold.fg(Color::Cyan))),
        Line::from(""),
        Line::from(Span::styled("Press Enter to play", bold)),
    ];

    if let Some(err) = app.controller.last_error() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            err.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    let widget = Paragraph::new(lines).alignment(Alignment::Center);
    f.render_widget(widget, centered_rows(area, 5));
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let state = app.controller.state();
    let word_number = (state.current_word_index + 1).min(state.session_words.len());
    let mut spans = vec![
        Span::styled(
            format!("Score: {}", state.score),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "   Word {} of {}",
            word_number,
            state.session_words.len()
        )),
    ];
    if let Some(category) = app.controller.current_category() {
        spans.push(Span::styled(
            format!("   ({category})"),
            Style::default().add_modifier(Modifier::ITALIC),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_word(f: &mut Frame, app: &App, area: Rect) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let filled = bold.fg(Color::Green);
    let empty = bold.add_modifier(Modifier::DIM);
    let cursor = empty.add_modifier(Modifier::UNDERLINED);
    let rejected = bold.fg(Color::Red);

    let slot = |c: char, style: Style| Span::styled(format!("[{c}]"), style);

    let spans: Vec<Span> = match (app.controller.validator(), app.controller.phase()) {
        (Some(v), _) => {
            let target = v.target_word();
            let entered = v.entered_prefix_len();
            target
                .chars()
                .enumerate()
                .map(|(idx, c)| {
                    if idx < entered {
                        slot(c, filled)
                    } else if idx == entered {
                        match v.last_rejected() {
                            Some(wrong) => slot(wrong, rejected),
                            None => slot(' ', cursor),
                        }
                    } else {
                        slot(' ', empty)
                    }
                })
                .collect()
        }
        // show the word that was just finished while waiting for the next one
        (None, Phase::WordComplete) | (None, Phase::SessionComplete) => app
            .controller
            .state()
            .completed_words
            .last()
            .map(|w| w.chars().map(|c| slot(c, filled)).collect())
            .unwrap_or_default(),
        _ => vec![],
    };

    let widget = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    f.render_widget(widget, centered_rows(area, 1));
}

fn render_flash(f: &mut Frame, app: &App, area: Rect) {
    let Some(flash) = &app.flash else {
        return;
    };
    let color = match flash.kind {
        FlashKind::Good => Color::Green,
        FlashKind::Bad => Color::Red,
    };
    let widget = Paragraph::new(Span::styled(
        flash.text.clone(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    f.render_widget(widget, area);
}

fn render_completed(f: &mut Frame, app: &App, area: Rect) {
    let words = &app.controller.state().completed_words;
    let text = if words.is_empty() {
        String::new()
    } else {
        words.iter().join(", ")
    };
    let widget = Paragraph::new(text)
        .block(Block::default().borders(Borders::TOP).title("Completed"))
        .wrap(Wrap { trim: true });
    f.render_widget(widget, area);
}

fn render_help(f: &mut Frame, app: &App, area: Rect) {
    let help = match app.controller.phase() {
        Phase::Idle | Phase::Building => "(enter) play / (esc) quit",
        Phase::InProgress | Phase::WordComplete => {
            "type the letters / (backspace) undo / (tab) hear word / (esc) quit"
        }
        Phase::SessionComplete => "(enter) play again / (esc) quit",
    };
    let widget = Paragraph::new(Span::styled(
        help,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    f.render_widget(widget, area);
}

fn render_complete_overlay(f: &mut Frame, app: &App, area: Rect) {
    let state = app.controller.state();
    let popup = centered_rect(area, 44, 7);
    let lines = vec![
        Line::from(Span::styled(
            "Congratulations!",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "You spelled all {} words",
            state.completed_words.len()
        )),
        Line::from(format!("Final score: {}", state.score)),
        Line::from(""),
        Line::from("Press Enter to play again"),
    ];

    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        popup,
    );
}

fn render_confetti(f: &mut Frame, app: &App, area: Rect) {
    let buf = f.buffer_mut();
    for piece in &app.confetti.pieces {
        if piece.x < 0.0 || piece.y < 0.0 {
            continue;
        }
        let (x, y) = (piece.x as u16, piece.y as u16);
        if x >= area.width || y >= area.height {
            continue;
        }
        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_char(piece.symbol)
                .set_fg(CONFETTI_COLORS[piece.color_index % CONFETTI_COLORS.len()]);
        }
    }
}

fn centered_rows(area: Rect, rows: u16) -> Rect {
    let rows = rows.min(area.height);
    Rect {
        y: area.y + (area.height - rows) / 2,
        height: rows,
        ..area
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
