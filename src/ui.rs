use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{
        Block, Borders, Clear, List, ListItem, Paragraph, Scrollbar, ScrollbarOrientation,
        ScrollbarState, Tabs, Wrap,
    },
};
use crate::app::{App, ChatRole, FocusPane, InputMode, Tab};
use crate::documents::{DECK_PATH, OVERVIEW_TEXT, SAMPLE_DOCUMENTS};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    if app.slides_fullscreen_active() || !app.chat_open {
        // Viewer takes the whole body; fullscreen also hides an open chat
        app.chat_messages_area = None;
        render_viewer(app, frame, body_area);
    } else {
        let [viewer_area, chat_area] = Layout::horizontal([
            Constraint::Percentage(55),
            Constraint::Percentage(45),
        ])
        .areas(body_area);

        render_viewer(app, frame, viewer_area);
        render_chat(app, frame, chat_area);
    }

    render_footer(app, frame, footer_area);

    if app.show_file_input {
        render_file_input(app, frame, area);
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let pending_indicator = match &app.pending_file {
        Some(file) => format!(" [file: {}]", file.name),
        None => String::new(),
    };

    let title = Line::from(vec![
        Span::styled(" DocChat Assistant ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!(" {} ", app.backend.base_url()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(pending_indicator, Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = match app.input_mode {
        InputMode::Normal => " VIEW ",
        InputMode::Editing => " ASK ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let hints = if app.show_file_input {
        vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" select ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" cancel ", label_style),
        ]
    } else if app.input_mode == InputMode::Editing {
        let mut hints = vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" stop typing ", label_style),
        ];
        if app.composing {
            hints.push(Span::styled(" waiting for answer ", label_style));
        }
        hints
    } else {
        let mut hints = vec![
            Span::styled(" Tab ", key_style),
            Span::styled(" focus ", label_style),
            Span::styled(" 1-3 ", key_style),
            Span::styled(" tabs ", label_style),
        ];

        match app.focus {
            FocusPane::Viewer => match app.active_tab {
                Tab::Slides => {
                    hints.extend(vec![
                        Span::styled(" o ", key_style),
                        Span::styled(" open ", label_style),
                        Span::styled(" f ", key_style),
                        Span::styled(
                            if app.slides_fullscreen { " restore " } else { " fullscreen " },
                            label_style,
                        ),
                    ]);
                }
                Tab::Overview => {}
                Tab::Documents => {
                    hints.extend(vec![
                        Span::styled(" j/k ", key_style),
                        Span::styled(" nav ", label_style),
                        Span::styled(" Enter ", key_style),
                        Span::styled(" open ", label_style),
                        Span::styled(" y ", key_style),
                        Span::styled(" copy path ", label_style),
                    ]);
                }
            },
            FocusPane::Chat => {
                hints.extend(vec![
                    Span::styled(" j/k ", key_style),
                    Span::styled(" scroll ", label_style),
                    Span::styled(" g/G ", key_style),
                    Span::styled(" top/bottom ", label_style),
                ]);
            }
            FocusPane::Input => {}
        }

        if app.chat_open {
            hints.extend(vec![
                Span::styled(" i ", key_style),
                Span::styled(" ask ", label_style),
                Span::styled(" u ", key_style),
                Span::styled(" upload ", label_style),
                Span::styled(" p ", key_style),
                Span::styled(" pick file ", label_style),
            ]);
        }

        hints.extend(vec![
            Span::styled(" c ", key_style),
            Span::styled(if app.chat_open { " close chat " } else { " 💬 chat " }, label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ]);
        hints
    };

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn render_viewer(app: &mut App, frame: &mut Frame, area: Rect) {
    app.viewer_area = Some(area);

    let [tabs_area, content_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    let titles: Vec<Line> = Tab::all().iter().map(|t| Line::from(t.title())).collect();
    let tabs = Tabs::new(titles)
        .select(app.active_tab.index())
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .divider(" | ");
    frame.render_widget(tabs, tabs_area);

    match app.active_tab {
        Tab::Slides => render_slides_tab(app, frame, content_area),
        Tab::Overview => render_overview_tab(app, frame, content_area),
        Tab::Documents => render_documents_tab(app, frame, content_area),
    }
}

fn render_slides_tab(app: &App, frame: &mut Frame, area: Rect) {
    let viewer_focused = app.focus == FocusPane::Viewer;
    let border_color = if viewer_focused { Color::Cyan } else { Color::DarkGray };

    let title = if app.slides_fullscreen {
        " Slides (fullscreen) "
    } else {
        " Slides "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    // The deck itself opens in the system viewer; this frame is a reference
    let text = Text::from(vec![
        Line::default(),
        Line::from(Span::styled(
            "  Presentation deck",
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::from(Span::styled(
            format!("  {}", DECK_PATH),
            Style::default().fg(Color::DarkGray),
        )),
        Line::default(),
        Line::from("  Press 'o' to open the deck in your PDF viewer."),
        Line::from("  Press 'f' to toggle fullscreen for this frame."),
    ]);

    let slides = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    frame.render_widget(slides, area);
}

fn render_overview_tab(app: &App, frame: &mut Frame, area: Rect) {
    let viewer_focused = app.focus == FocusPane::Viewer;
    let border_color = if viewer_focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Overview ");

    let text = Text::from(vec![
        Line::default(),
        Line::from(Span::styled(
            "  Project Overview",
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::default(),
        Line::from(format!("  {}", OVERVIEW_TEXT)),
    ]);

    let overview = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
    frame.render_widget(overview, area);
}

fn render_documents_tab(app: &mut App, frame: &mut Frame, area: Rect) {
    let viewer_focused = app.focus == FocusPane::Viewer;
    let border_color = if viewer_focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(format!(" Project Documents ({}) ", SAMPLE_DOCUMENTS.len()));

    let items: Vec<ListItem> = SAMPLE_DOCUMENTS
        .iter()
        .map(|doc| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    format!(" 📄 {}", doc.name),
                    Style::default().fg(Color::Yellow).bold(),
                )),
                Line::from(Span::styled(
                    format!("    {}", doc.path),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.documents_state);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let [messages_area, upload_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(4),
        Constraint::Length(3),
    ])
    .areas(area);

    render_messages(app, frame, messages_area);
    render_upload_box(app, frame, upload_area);
    render_question_input(app, frame, input_area);
}

fn render_messages(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store area and dimensions for mouse hit-testing and scroll calculations
    app.chat_messages_area = Some(area);
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let chat_focused = app.focus == FocusPane::Chat;
    let border_color = if chat_focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Assistant ");

    let mut lines: Vec<Line> = Vec::new();

    for msg in &app.messages {
        match msg.role {
            ChatRole::User => {
                lines.push(Line::from(Span::styled(
                    "You:",
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
            }
            ChatRole::Assistant => {
                lines.push(Line::from(Span::styled(
                    "AI:",
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
            }
        }
        for line in msg.text.lines() {
            lines.push(Line::from(line.to_string()));
        }
        lines.push(Line::default());
    }

    // Waiting on the backend: animated ellipsis until the reveal takes over
    if app.composing && app.reveal.is_none() {
        lines.push(Line::from(Span::styled(
            "AI:",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("Thinking{}", dots),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
    }

    let total_lines = lines.len() as u16;

    let chat = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);

    if total_lines > app.chat_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("^"))
            .end_symbol(Some("v"));

        let mut scrollbar_state =
            ScrollbarState::new(total_lines as usize).position(app.chat_scroll as usize);

        frame.render_stateful_widget(
            scrollbar,
            area.inner(ratatui::layout::Margin {
                vertical: 1,
                horizontal: 0,
            }),
            &mut scrollbar_state,
        );
    }
}

fn render_upload_box(app: &App, frame: &mut Frame, area: Rect) {
    let border_color = if app.drop_highlight {
        Color::Yellow
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Upload (u to send, p to pick) ");

    let file_line = match &app.pending_file {
        Some(file) => Line::from(vec![
            Span::raw(" Selected: "),
            Span::styled(file.name.clone(), Style::default().fg(Color::Yellow)),
        ]),
        None => Line::from(Span::styled(
            " Drop a file onto the terminal, or press 'p' to choose one",
            Style::default().fg(Color::DarkGray),
        )),
    };

    let status_line = Line::from(Span::styled(
        format!(" {}", app.upload_status),
        Style::default().fg(Color::Cyan),
    ));

    let upload = Paragraph::new(Text::from(vec![file_line, status_line])).block(block);
    frame.render_widget(upload, area);
}

fn render_question_input(app: &App, frame: &mut Frame, area: Rect) {
    let input_focused = app.focus == FocusPane::Input;
    let border_color = if input_focused || app.input_mode == InputMode::Editing {
        Color::Yellow
    } else {
        Color::DarkGray
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Ask (Tab to focus) ");

    // Calculate visible portion of input with horizontal scrolling
    // Inner width = total width - 2 (for borders)
    let inner_width = area.width.saturating_sub(2) as usize;
    let cursor_pos = app.question_cursor;

    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let visible_text: String = app
        .question_input
        .chars()
        .skip(scroll_offset)
        .take(inner_width)
        .collect();

    let input = if app.question_input.is_empty() && app.input_mode == InputMode::Normal {
        Paragraph::new("Ask me anything...")
            .style(Style::default().fg(Color::DarkGray))
            .block(input_block)
    } else {
        Paragraph::new(visible_text)
            .style(Style::default().fg(Color::Cyan))
            .block(input_block)
    };

    frame.render_widget(input, area);

    // Show cursor when editing
    if app.input_mode == InputMode::Editing {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((area.x + cursor_x + 1, area.y + 1));
    }
}

fn render_file_input(app: &App, frame: &mut Frame, area: Rect) {
    // Calculate popup size and position (centered)
    let popup_width = 60.min(area.width.saturating_sub(4));
    let popup_height = 7;

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Select a file to upload ");

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let instructions =
        Paragraph::new("Type or paste a file path. Press Enter to select, Esc to cancel.")
            .style(Style::default().fg(Color::DarkGray));
    let instructions_area = Rect::new(inner.x, inner.y, inner.width, 1);
    frame.render_widget(instructions, instructions_area);

    let input_area = Rect::new(inner.x, inner.y + 2, inner.width, 1);
    let input = Paragraph::new(app.file_input.as_str()).style(Style::default().fg(Color::Cyan));
    frame.render_widget(input, input_area);

    // Show cursor
    let cursor_x = app.file_input_cursor.min(input_area.width as usize) as u16;
    frame.set_cursor_position((input_area.x + cursor_x, input_area.y));

    let char_count = format!("{} characters", app.file_input.chars().count());
    let status = Paragraph::new(char_count).style(Style::default().fg(Color::DarkGray));
    let status_area = Rect::new(inner.x, inner.y + 4, inner.width, 1);
    frame.render_widget(status, status_area);
}
