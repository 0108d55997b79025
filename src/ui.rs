use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use crate::app::App;
use crate::state::{Message, Role};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, chat_area, input_row, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_conversation(app, frame, chat_area);
    render_input(app, frame, input_row);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Chat ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(app.endpoint.as_str(), Style::default().fg(Color::Gray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        Role::Bot | Role::Typing => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        Role::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    }
}

fn body_style(role: Role) -> Style {
    match role {
        Role::Typing => Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        Role::Error => Style::default().fg(Color::Red),
        Role::User | Role::Bot => Style::default(),
    }
}

/// Plain-text lines for one message; the text is never parsed for markup
fn message_lines(msg: &Message) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(msg.role.label(), role_style(msg.role)))];
    if msg.text.is_empty() {
        lines.push(Line::default());
    }
    for line in msg.text.lines() {
        lines.push(Line::from(Span::styled(line.to_string(), body_style(msg.role))));
    }
    lines.push(Line::default());
    lines
}

fn render_conversation(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store area for mouse hit-testing and inner size for scroll calculations
    app.chat_area = Some(area);
    app.chat_width = area.width.saturating_sub(2);
    app.chat_height = area.height.saturating_sub(2);

    let text = if app.widget.conversation.is_empty() {
        Text::from(Span::styled(
            "Type a message and press Enter...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(
            app.widget
                .conversation
                .messages()
                .iter()
                .flat_map(message_lines)
                .collect::<Vec<_>>(),
        )
    };

    // Measure with the same wrapping the pane renders with, block excluded
    let wrap = Wrap { trim: false };
    let rows = Paragraph::new(text.clone()).wrap(wrap).line_count(app.chat_width);
    app.chat_rows = u16::try_from(rows).unwrap_or(u16::MAX);

    let conversation = &mut app.widget.conversation;
    if conversation.follow {
        conversation.scroll_to_bottom(app.chat_rows, app.chat_height);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Conversation ");

    let chat = Paragraph::new(text)
        .block(block)
        .wrap(wrap)
        .scroll((conversation.scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input(app: &mut App, frame: &mut Frame, area: Rect) {
    let [input_area, send_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(10),
    ])
    .areas(area);

    app.send_area = Some(send_area);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Message ");

    // Inner width = total width - 2 (for borders)
    let inner_width = input_area.width.saturating_sub(2) as usize;
    let (visible_text, cursor_col) = app.widget.input.visible(inner_width);

    let input = Paragraph::new(visible_text)
        .style(Style::default().fg(Color::Cyan))
        .block(input_block);
    frame.render_widget(input, input_area);

    frame.set_cursor_position((
        input_area.x + cursor_col as u16 + 1,
        input_area.y + 1,
    ));

    let send = Paragraph::new(Span::styled("Send", Style::default().fg(Color::Black).bold()))
        .alignment(Alignment::Center)
        .style(Style::default().bg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(send, send_area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let waiting = app.widget.pending_placeholders();
    let mut spans = vec![
        Span::styled(" Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" send  "),
        Span::styled("PgUp/PgDn", Style::default().fg(Color::Yellow)),
        Span::raw(" scroll  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" quit"),
    ];
    if waiting > 0 {
        spans.push(Span::styled(
            format!("  [{} waiting]", waiting),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
