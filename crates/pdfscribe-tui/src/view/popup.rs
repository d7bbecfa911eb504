use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::Popup;
use crate::theme::Theme;
use crate::view::centered_rect;

/// Render an error or warning message box.
pub fn render(f: &mut Frame, theme: &Theme, popup: &Popup) {
    let area = f.area();
    let width = 60u16;
    // Rough wrapped height of the message plus padding and borders.
    let inner = width.saturating_sub(4).max(1) as usize;
    let message_rows = popup
        .message
        .lines()
        .map(|l| l.chars().count().div_ceil(inner).max(1))
        .sum::<usize>();
    let height = u16::try_from(message_rows + 5).unwrap_or(u16::MAX);
    let rect = centered_rect(width, height, area);

    let color = if popup.title == "Error" {
        theme.error
    } else {
        theme.warning
    };

    let mut lines = vec![Line::from("")];
    lines.extend(popup.message.lines().map(|l| {
        Line::from(Span::styled(
            l.to_string(),
            Style::default().fg(theme.text),
        ))
    }));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "y: copy  Enter/Esc: dismiss",
        Style::default().fg(theme.dim),
    )));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
                .title(format!(" {} ", popup.title)),
        );

    f.render_widget(Clear, rect);
    f.render_widget(paragraph, rect);
}
