use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::theme::Theme;
use crate::view::centered_rect;

/// Render the "save as" prompt with the path being edited.
pub fn render(f: &mut Frame, theme: &Theme, input: &str) {
    let area = f.area();
    let popup = centered_rect(70, 7, area);

    // Keep the tail of long paths visible, cursor sits at the end.
    let room = popup.width.saturating_sub(6) as usize;
    let count = input.chars().count();
    let shown: String = if count > room {
        input.chars().skip(count - room).collect()
    } else {
        input.to_string()
    };

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  > ", Style::default().fg(theme.active)),
            Span::styled(shown, Style::default().fg(theme.text)),
            Span::styled(
                "_",
                Style::default()
                    .fg(theme.active)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  Enter:save  Esc:cancel",
            Style::default().fg(theme.dim),
        )),
    ];

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.active))
            .title(" Save Extracted Text "),
    );

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}
