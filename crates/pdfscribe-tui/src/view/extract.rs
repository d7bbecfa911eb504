use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::App;
use crate::view::{spinner_char, truncate};

const PLACEHOLDER: &str = "Extracted text will appear here...\n\nDrag and drop a PDF file or press 'o' to get started.";

/// Render the main extraction screen: drop zone, text panel, status line.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // header
        Constraint::Length(3), // drop zone
        Constraint::Min(3),    // extracted text
        Constraint::Length(1), // status
        Constraint::Length(1), // footer
    ])
    .split(area);

    render_header(f, app, chunks[0]);
    render_drop_zone(f, app, chunks[1]);
    render_text(f, app, chunks[2]);
    render_status(f, app, chunks[3]);

    let footer = Line::from(Span::styled(
        " o:open  y:copy  s:save  c:clear  j/k:scroll  ?:help  q:quit",
        app.theme.footer_style(),
    ));
    f.render_widget(Paragraph::new(footer), chunks[4]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let mut spans = vec![
        Span::styled(" pdfscribe ", theme.header_style()),
        Span::styled(
            " PDF Text Extractor",
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(method) = &app.method {
        spans.push(Span::styled(
            format!("  [{}]", method.label()),
            Style::default().fg(theme.method_color(method)),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_drop_zone(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let line = if app.busy {
        let detail = match app.ocr_progress {
            Some((page, total)) => format!("OCR page {} of {}", page, total),
            None => "Processing PDF...".to_string(),
        };
        Line::from(Span::styled(
            format!("{} {}", spinner_char(app.tick), detail),
            Style::default()
                .fg(theme.spinner)
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(vec![
            Span::styled(
                "Drag & Drop PDF Here",
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  or press ", Style::default().fg(theme.dim)),
            Span::styled(
                "o",
                Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" to browse", Style::default().fg(theme.dim)),
        ])
    };

    let border = if app.busy { theme.active } else { theme.border };
    let zone = Paragraph::new(line).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(zone, area);
}

fn render_text(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let (content, style) = match &app.text {
        Some(text) => (text.as_str(), Style::default().fg(theme.text)),
        None => (PLACEHOLDER, Style::default().fg(theme.dim)),
    };

    let title = if app.text.is_some() && app.max_scroll() > 0 {
        format!(" Extracted Text ({}/{}) ", app.scroll, app.max_scroll())
    } else {
        " Extracted Text ".to_string()
    };

    let scroll = u16::try_from(app.scroll).unwrap_or(u16::MAX);
    let paragraph = Paragraph::new(content)
        .style(style)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(title),
        );
    f.render_widget(paragraph, area);
}

fn render_status(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let halves =
        Layout::horizontal([Constraint::Percentage(55), Constraint::Percentage(45)]).split(area);

    let status_style = if app.busy {
        Style::default().fg(theme.active)
    } else if app.status.starts_with("Error") {
        Style::default().fg(theme.error)
    } else {
        Style::default().fg(theme.text)
    };
    let prefix = if app.busy {
        format!(" {} ", spinner_char(app.tick))
    } else {
        " ".to_string()
    };
    let width = halves[0].width as usize;
    let status = truncate(&format!("{}{}", prefix, app.status), width);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(status, status_style))),
        halves[0],
    );

    if let Some(info) = &app.doc_info {
        let page_info = format!("Pages: {} | File: {} ", info.page_count, info.file_name);
        let page_info = truncate(&page_info, halves[1].width as usize);
        f.render_widget(
            Paragraph::new(Line::from(Span::styled(
                page_info,
                Style::default().fg(theme.dim),
            )))
            .alignment(Alignment::Right),
            halves[1],
        );
    }
}
