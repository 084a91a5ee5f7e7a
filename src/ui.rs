use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{Alert, App},
    difficulty::Difficulty,
    engine::Snapshot,
    round::Phase,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

const TITLE: &str = "🎯 Rep Target Trainer";
const HELP: &str = "(enter) guess / (←→) level / (ctrl+n) new challenge / (esc)ape";

impl<R> Widget for &App<R>
where
    R: rand::Rng,
{
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (r, g, b) = self.fade.color();
        // light backgrounds throughout, so text stays dark
        let base_style = Style::default().bg(Color::Rgb(r, g, b)).fg(Color::Black);
        buf.set_style(area, base_style);

        let snapshot = self.engine.snapshot();
        render_game(&snapshot, area, buf);

        if let Some(alert) = &self.alert {
            render_alert(alert, area, buf);
        }
    }
}

fn render_game(snapshot: &Snapshot<'_>, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(1), // level label
            Constraint::Length(1), // level tabs
            Constraint::Length(2), // range hint
            Constraint::Length(3), // guess input
            Constraint::Length(2), // feedback
            Constraint::Length(2), // stats
            Constraint::Length(1), // history title
            Constraint::Min(0),    // history
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled(TITLE, bold_style))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    Paragraph::new("Choose level:")
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    render_levels(snapshot.difficulty, chunks[2], buf);

    let (min, max) = snapshot.bounds;
    Paragraph::new(format!("Guess the rep target between {min} and {max}"))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    let input_line = match (snapshot.phase, snapshot.input.is_empty()) {
        (Phase::Resolved, _) => Line::from(Span::styled("next challenge coming up…", dim_style)),
        (Phase::Active, true) => Line::from(Span::styled("Your guess", dim_style)),
        (Phase::Active, false) => Line::from(Span::styled(snapshot.input, bold_style)),
    };
    Paragraph::new(input_line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL))
        .render(centered_columns(chunks[4], 40), buf);

    if !snapshot.feedback.is_empty() {
        Paragraph::new(Span::styled(snapshot.feedback.to_string(), bold_style))
            .alignment(Alignment::Center)
            .render(chunks[5], buf);
    }

    let timer_style = if snapshot.seconds_remaining <= 5 {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let stats = Line::from(vec![
        Span::raw(format!(
            "Attempts: {} | Score: {} | Streak: {} | ",
            snapshot.attempts, snapshot.score, snapshot.streak
        )),
        Span::styled(format!("Time: {}s", snapshot.seconds_remaining), timer_style),
    ]);
    Paragraph::new(stats)
        .alignment(Alignment::Center)
        .render(chunks[6], buf);

    Paragraph::new(Span::styled("History:", bold_style))
        .alignment(Alignment::Center)
        .render(chunks[7], buf);

    // newest at the bottom; older rows scroll off the top
    let visible = usize::from(chunks[8].height);
    let skip = snapshot.history.len().saturating_sub(visible);
    let lines: Vec<Line> = snapshot
        .history
        .iter()
        .skip(skip)
        .map(|entry| {
            Line::from(vec![
                Span::styled(format!("{}  ", entry.completed_at.format("%H:%M:%S")), dim_style),
                Span::raw(entry.to_string()),
            ])
        })
        .collect();
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(chunks[8], buf);

    Paragraph::new(Span::styled(HELP, italic_style))
        .alignment(Alignment::Center)
        .render(chunks[9], buf);
}

fn render_levels(selected: Difficulty, area: Rect, buf: &mut Buffer) {
    let titles: Vec<String> = Difficulty::ALL
        .iter()
        .enumerate()
        .map(|(i, d)| format!("F{} {d}", i + 1))
        .collect();
    let index = Difficulty::ALL
        .iter()
        .position(|d| *d == selected)
        .unwrap_or_default();

    let width = titles.iter().map(|t| t.width() as u16 + 3).sum::<u16>();
    Tabs::new(titles)
        .select(index)
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )
        .render(centered_columns(area, width), buf);
}

fn render_alert(alert: &Alert, area: Rect, buf: &mut Buffer) {
    let hint = "press any key";
    let content_width = [alert.title, alert.message, hint]
        .iter()
        .map(|s| s.width())
        .max()
        .unwrap_or_default() as u16;

    let popup = centered_rect(content_width + 6, 6, area);
    Clear.render(popup, buf);

    Paragraph::new(vec![
        Line::from(alert.message),
        Line::default(),
        Line::from(Span::styled(
            hint,
            Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .style(Style::default().bg(Color::White).fg(Color::Black))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                alert.title,
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ))
            .title_alignment(Alignment::Center),
    )
    .render(popup, buf);
}

/// Horizontally centred slice of `area`, at most `width` wide.
fn centered_columns(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
