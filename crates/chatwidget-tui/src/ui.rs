use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use chatwidget_core::{Message, Sender};
use crate::app::App;

const SEND_BUTTON_WIDTH: u16 = 10;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, history, input, footer
    let [header_area, history_area, input_row, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_history(app, frame, history_area);
    render_input(app, frame, input_row);
    render_footer(frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Chat ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(app.server_url().to_string(), Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::styled(" Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" send  "),
        Span::styled("PgUp/PgDn", Style::default().fg(Color::Yellow)),
        Span::raw(" scroll  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" quit"),
    ]);
    frame.render_widget(Paragraph::new(hints), area);
}

fn message_lines(msg: &Message) -> Vec<Line<'static>> {
    let (label_color, text_color) = match msg.sender() {
        Sender::User => (Color::Cyan, Color::Cyan),
        Sender::Bot => (Color::Yellow, Color::Reset),
    };

    let mut header = vec![Span::styled(
        msg.sender().display_name(),
        Style::default().fg(label_color).add_modifier(Modifier::BOLD),
    )];
    if let Some(clock) = msg.clock() {
        header.push(Span::styled(format!(" {}", clock), Style::default().fg(Color::DarkGray)));
    }
    if msg.has_feedback_controls() {
        // decorative, no action is bound to these
        header.push(Span::styled("  [+] [-]", Style::default().fg(Color::DarkGray)));
    }

    let mut lines = vec![Line::from(header)];
    for line in msg.text().split('\n') {
        lines.push(Line::from(Span::styled(line.to_string(), Style::default().fg(text_color))));
    }
    lines.push(Line::default());
    lines
}

fn render_history(app: &mut App, frame: &mut Frame, area: Rect) {
    app.history_area = Some(area);

    // Store history area height for scroll calculations (inner size minus borders)
    app.history_height = area.height.saturating_sub(2);
    let inner_width = area.width.saturating_sub(2);

    let typing = app.typing_visible();
    let (len, mut lines) = app.client.view().with_history(|history| {
        let lines: Vec<Line<'static>> = history.messages().iter().flat_map(message_lines).collect();
        (history.len(), lines)
    });

    let text = if len == 0 && !typing {
        Text::from(Span::styled(
            "Say something...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        if typing {
            // Animated ellipsis: cycles through ".", "..", "..."
            let dots = ".".repeat((app.animation_frame as usize) + 1);
            lines.push(Line::from(Span::styled(
                format!("Bot is typing{}", dots),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )));
        }
        Text::from(lines)
    };

    // Measured before the block is attached so borders aren't counted
    let history = Paragraph::new(text).wrap(Wrap { trim: false });
    app.history_lines = u16::try_from(history.line_count(inner_width)).unwrap_or(u16::MAX);
    app.sync_scroll(len, app.history_lines);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" History ");

    let history = history.block(block).scroll((app.scroll, 0));
    frame.render_widget(history, area);
}

fn render_input(app: &mut App, frame: &mut Frame, area: Rect) {
    let [input_area, button_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(SEND_BUTTON_WIDTH),
    ])
    .areas(area);

    app.send_button_area = Some(button_area);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Message ");

    // Inner width = total width - 2 (for borders)
    let inner_width = input_area.width.saturating_sub(2) as usize;
    let cursor_pos = app.cursor;

    // Calculate scroll offset to keep cursor visible
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app.input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);
    frame.render_widget(input, input_area);

    let button = Paragraph::new(Line::from(Span::styled(
        "Send",
        Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD),
    )))
    .centered()
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));
    frame.render_widget(button, button_area);

    let cursor_x = (cursor_pos - scroll_offset) as u16;
    frame.set_cursor_position((input_area.x + cursor_x + 1, input_area.y + 1));
}
