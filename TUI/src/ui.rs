use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::{role_label, App};
use crate::config::KEY_HINTS;
use crate::message::Role;
use crate::strip::StripState;
use crate::ui_state::Focus;

// Copper Sapphire Morning color palette
const BG_DARK: Color = Color::Rgb(12, 12, 16);           // Deep background

// Primary blues
const SAPPHIRE: Color = Color::Rgb(101, 150, 243);       // #6596F3 - Primary accent
const CYAN_LIGHT: Color = Color::Rgb(178, 220, 226);     // #B2DCE2 - Light cyan

// Warm accents
const COPPER: Color = Color::Rgb(138, 72, 38);           // #8A4826 - Copper
const WARM_BROWN: Color = Color::Rgb(164, 103, 38);      // #A46726 - Warm brown

// Text colors
const TEXT_PRIMARY: Color = Color::Rgb(240, 240, 245);   // Near white
const TEXT_MUTED: Color = Color::Rgb(105, 116, 133);     // #697485 - Medium gray

// Borders
const BORDER_DIM: Color = Color::Rgb(45, 50, 60);        // Dim border

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(Style::default().bg(BG_DARK)), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    draw_messages(frame, app, chunks[0]);
    draw_status(frame, app, chunks[1]);
    draw_input(frame, app, chunks[2]);
    draw_key_hints(frame, chunks[3]);
}

/// Greedy word wrap measured in display cells.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![text.to_string()];
    }
    let mut result = Vec::new();
    let mut current_line = String::new();

    for word in text.split_whitespace() {
        if current_line.is_empty() {
            current_line = word.to_string();
        } else if current_line.width() + 1 + word.width() <= max_width {
            current_line.push(' ');
            current_line.push_str(word);
        } else {
            result.push(current_line);
            current_line = word.to_string();
        }
    }
    if !current_line.is_empty() {
        result.push(current_line);
    }
    if result.is_empty() {
        result.push(String::new());
    }
    result
}

fn draw_messages(frame: &mut Frame, app: &mut App, area: Rect) {
    let border_color = if matches!(app.ui.focus, Focus::Actions { .. }) {
        SAPPHIRE
    } else {
        BORDER_DIM
    };
    let block = Block::default()
        .title(Span::styled(" Chat ", Style::default().fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD)))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let padded = Rect {
        x: inner.x + 1,
        y: inner.y,
        width: inner.width.saturating_sub(2),
        height: inner.height,
    };

    // Strips that end up off screen must not claim clicks
    for cell in &mut app.cells {
        cell.strip_mut().clear_bounds();
    }

    if app.messages.is_empty() {
        let welcome = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("Type a message below to start.", Style::default().fg(TEXT_MUTED))),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(TEXT_MUTED)),
                Span::styled("Tab", Style::default().fg(SAPPHIRE)),
                Span::styled(" to reach the buttons under each reply.", Style::default().fg(TEXT_MUTED)),
            ]),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(welcome, padded);
        return;
    }

    let text_width = usize::from(padded.width.saturating_sub(2));
    let mut bottom = padded.y + padded.height;
    let end = app.messages.len().saturating_sub(app.ui.scroll_offset);

    for index in (0..end).rev() {
        let message = &app.messages[index];
        let strip = app.cells[index].strip();
        let strip_rows = if strip.is_visible() && strip.state() == StripState::Loaded {
            strip.desired_height()
        } else {
            0
        };

        let mut body = wrap_text(&message.content, text_width);
        if message.streaming {
            if let Some(last) = body.last_mut() {
                last.push('▍');
            }
        }
        let body_rows = u16::try_from(body.len()).unwrap_or(u16::MAX);
        let height = 1u16.saturating_add(body_rows).saturating_add(strip_rows);
        if bottom < padded.y.saturating_add(height) {
            break;
        }
        let top = bottom - height;

        let (label_style, content_style) = match message.role {
            Role::User => (
                Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD),
                Style::default().fg(TEXT_PRIMARY),
            ),
            Role::Assistant => (
                Style::default().fg(COPPER).add_modifier(Modifier::BOLD),
                Style::default().fg(TEXT_PRIMARY),
            ),
            Role::System => (
                Style::default().fg(WARM_BROWN).add_modifier(Modifier::BOLD),
                Style::default().fg(TEXT_MUTED),
            ),
        };
        let mut header = vec![
            Span::styled(role_label(message.role), label_style),
            Span::styled(format!("  {}", message.timestamp.format("%H:%M")), Style::default().fg(TEXT_MUTED)),
        ];
        if message.speaking {
            header.push(Span::styled("  ♪ speaking", Style::default().fg(CYAN_LIGHT)));
        }
        frame.render_widget(Paragraph::new(Line::from(header)), Rect::new(padded.x, top, padded.width, 1));

        let lines: Vec<Line> = body
            .into_iter()
            .map(|l| Line::from(Span::styled(format!("  {}", l), content_style)))
            .collect();
        frame.render_widget(Paragraph::new(lines), Rect::new(padded.x, top + 1, padded.width, body_rows));

        if strip_rows > 0 {
            let strip_area = Rect::new(padded.x, top + 1 + body_rows, padded.width, strip_rows);
            let strip = app.cells[index].strip_mut();
            strip.render(strip_area, frame.buffer_mut());
            if let Focus::Actions { message, button } = app.ui.focus {
                if message == index {
                    if let Some(focused) = strip.button_area(button) {
                        frame
                            .buffer_mut()
                            .set_style(focused, Style::default().add_modifier(Modifier::REVERSED));
                    }
                }
            }
        }

        // One blank row between messages
        bottom = top.saturating_sub(1);
        if bottom <= padded.y {
            break;
        }
    }
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let text = match (&app.ui.status_message, app.ui.focus) {
        (Some(status), _) => Span::styled(format!(" {}", status), Style::default().fg(CYAN_LIGHT)),
        (None, Focus::Actions { .. }) => Span::styled(" ←/→ to choose, Enter to run", Style::default().fg(TEXT_MUTED)),
        (None, Focus::Input) => Span::raw(""),
    };
    frame.render_widget(Paragraph::new(Line::from(text)), area);
}

fn draw_input(frame: &mut Frame, app: &App, area: Rect) {
    // Border color based on focus - pulse when focused, dim when not
    let border_color = if app.ui.focus == Focus::Input {
        let glow = (app.animation_tick as f64 / 90.0).sin() * 0.3 + 0.7;
        let r = (101.0 * glow) as u8;
        let g = (150.0 * glow) as u8;
        let b = (243.0 * glow) as u8;
        Color::Rgb(r, g, b)
    } else {
        BORDER_DIM
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let cursor = if app.ui.focus == Focus::Input && app.animation_tick % 30 < 15 { "|" } else { " " };
    let input_text = format!(" > {}{}", app.ui.input, cursor);

    let input = Paragraph::new(input_text)
        .style(Style::default().fg(TEXT_PRIMARY))
        .wrap(Wrap { trim: false });
    frame.render_widget(input, inner);
}

fn draw_key_hints(frame: &mut Frame, area: Rect) {
    let mut spans = Vec::new();
    for (key, desc) in KEY_HINTS {
        spans.push(Span::styled(format!(" {}", key), Style::default().fg(SAPPHIRE).add_modifier(Modifier::BOLD)));
        spans.push(Span::styled(format!(" {} ", desc), Style::default().fg(TEXT_MUTED)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}
