//! ratatui layout of the session screen

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::api::HISTORY_LIMIT;
use crate::state_machine::SessionState;

use super::input::DraftCursor;
use super::view::{answer_view, ask_label, can_submit, history_line, AnswerView, ScoreMemo};

/// Terminal-only state that never reaches the session
#[derive(Debug, Default)]
pub struct UiState {
    pub cursor: DraftCursor,
    pub score: ScoreMemo,
    /// "How I answered" expanded
    pub show_trace: bool,
    /// First visible row of the answer panel
    pub answer_scroll: u16,
    /// Answer the scroll offset belongs to
    scrolled_revision: u64,
}

impl UiState {
    pub fn scroll_answer_up(&mut self, rows: u16) {
        self.answer_scroll = self.answer_scroll.saturating_sub(rows);
    }

    /// Clamped against the content on the next draw
    pub fn scroll_answer_down(&mut self, rows: u16) {
        self.answer_scroll = self.answer_scroll.saturating_add(rows);
    }
}

const HISTORY_TITLE: &str = "Chat History (Last 10)";

pub fn render(f: &mut Frame<'_>, session: &SessionState, ui: &mut UiState) {
    let area = f.area();
    let banner_height = if session.error().is_some() { 3 } else { 0 };
    let history_height = u16::try_from(HISTORY_LIMIT).unwrap_or(u16::MAX) + 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(banner_height),
            Constraint::Min(6),
            Constraint::Length(history_height),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, chunks[0]);
    render_input(f, session, ui, chunks[1]);
    if let Some(message) = session.error() {
        render_error(f, message, chunks[2]);
    }
    render_answer(f, session, ui, chunks[3]);
    render_history(f, session, chunks[4]);
    render_footer(f, chunks[5]);
}

fn render_header(f: &mut Frame<'_>, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            "kb-ask",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  ·  "),
        Span::styled("Knowledge-base assistant", Style::default().fg(Color::Gray)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_input(f: &mut Frame<'_>, session: &SessionState, ui: &mut UiState, area: Rect) {
    let button_style = if can_submit(session) {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Question ")
        .title(
            Line::from(Span::styled(format!("[ {} ]", ask_label(session)), button_style))
                .right_aligned(),
        );

    let draft = session.draft();
    ui.cursor.sync(draft);
    let inner_width = area.width.saturating_sub(2);
    let column = u16::try_from(ui.cursor.column(draft)).unwrap_or(u16::MAX);
    // Keep the cursor inside the box by scrolling long drafts
    let offset = column.saturating_sub(inner_width.saturating_sub(1));

    let paragraph = Paragraph::new(draft).block(block).scroll((0, offset));
    f.render_widget(paragraph, area);

    if !session.is_loading() {
        let cursor_x = area.x + 1 + (column - offset);
        f.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn render_error(f: &mut Frame<'_>, message: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    let paragraph = Paragraph::new(Line::from(vec![
        Span::styled(
            "Error: ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw(message.to_string()),
    ]))
    .block(block)
    .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_answer(f: &mut Frame<'_>, session: &SessionState, ui: &mut UiState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Answer ");

    let score = ui.score.get(session).to_string();
    let lines = match answer_view(session, &score) {
        Some(view) => answer_lines(&view, ui.show_trace),
        None if session.is_loading() => vec![Line::from(Span::styled(
            "Thinking...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ))],
        None => vec![Line::from(Span::styled(
            "Ask a question to get started.",
            Style::default().fg(Color::Gray),
        ))],
    };

    // A new answer starts at the top
    if ui.scrolled_revision != session.answer_revision() {
        ui.scrolled_revision = session.answer_revision();
        ui.answer_scroll = 0;
    }
    let inner_width = area.width.saturating_sub(2);
    let inner_height = area.height.saturating_sub(2);
    let max_scroll = wrapped_rows(&lines, inner_width).saturating_sub(inner_height);
    ui.answer_scroll = ui.answer_scroll.min(max_scroll);

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((ui.answer_scroll, 0));
    f.render_widget(paragraph, area);
}

/// Rows the lines occupy once wrapped to `width`
fn wrapped_rows(lines: &[Line<'_>], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn answer_lines(view: &AnswerView<'_>, show_trace: bool) -> Vec<Line<'static>> {
    let chip = Style::default().fg(Color::Black).bg(Color::Cyan);
    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!(" {} ", view.source_chip()), chip),
            Span::raw(" "),
            Span::styled(format!(" {} ", view.score_chip()), chip),
        ]),
        Line::from(""),
    ];
    lines.extend(view.body.lines().map(|l| Line::from(l.to_string())));
    lines.push(Line::from(""));

    let marker = if show_trace { "▾" } else { "▸" };
    lines.push(Line::from(Span::styled(
        format!("{marker} How I answered"),
        Style::default().add_modifier(Modifier::BOLD),
    )));

    if show_trace {
        if let Some(matched) = view.matched_question {
            lines.push(Line::from(vec![
                Span::styled("  Matched question: ", Style::default().fg(Color::Gray)),
                Span::raw(matched.to_string()),
            ]));
        }
        for step in view.trace {
            lines.push(Line::from(format!("  - {step}")));
        }
    }

    lines
}

fn render_history(f: &mut Frame<'_>, session: &SessionState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {HISTORY_TITLE} "));

    let lines: Vec<Line<'_>> = if session.history().is_empty() {
        vec![Line::from(Span::styled(
            "No history yet.",
            Style::default().fg(Color::Gray),
        ))]
    } else {
        session
            .history()
            .iter()
            .map(|item| Line::from(history_line(item)))
            .collect()
    };

    f.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}

fn render_footer(f: &mut Frame<'_>, area: Rect) {
    let hints = "Enter ask   ·   PgUp/PgDn scroll answer   ·   Ctrl+T how I answered   ·   Ctrl+R refresh   ·   Ctrl+L clear history   ·   Esc quit";
    f.render_widget(
        Paragraph::new(Span::styled(hints, Style::default().fg(Color::Gray))),
        area,
    );
}
