use crate::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph};

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "── Global ──",
        &[("?", "Toggle this help"), ("q", "Quit")],
    ),
    (
        "── Trace ──",
        &[
            ("j/k, ↓/↑", "Scroll one row"),
            ("PgDn/PgUp", "Scroll ten rows"),
            ("g/G", "Jump to newest/oldest"),
            ("wheel", "Scroll"),
        ],
    ),
    (
        "── Operations ──",
        &[
            ("mouse", "Hover a ● to open its detail"),
            ("Tab", "Focus next operation"),
            ("Shift-Tab", "Focus previous operation"),
            ("Esc", "Leave the focused operation"),
        ],
    ),
];

pub fn render(frame: &mut Frame, area: Rect) {
    // Center the help overlay
    let popup_width = 56u16.min(area.width.saturating_sub(4));
    let popup_height = 20u16.min(area.height.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let block = Theme::block_accent()
        .title(" Keyboard Shortcuts ")
        .padding(Theme::PADDING_COMPACT);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::new().fg(Theme::ACCENT_YELLOW).bold();
    let desc_style = Style::new().fg(Theme::TEXT_CONTENT);
    let header_style = Style::new().fg(Theme::BORDER_ACCENT).bold();
    let close_hint_line = Line::from(Span::styled(
        "Press any key to close",
        Style::new().fg(Color::DarkGray),
    ));

    let mut lines = Vec::new();
    for (index, (header, keys)) in SECTIONS.iter().enumerate() {
        if index > 0 {
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(Span::styled(*header, header_style)));
        for (key, desc) in *keys {
            lines.push(Line::from(vec![
                Span::styled(format!("  {key:<11}"), key_style),
                Span::styled(*desc, desc_style),
            ]));
        }
    }
    lines.push(Line::raw(""));
    lines.push(close_hint_line.clone());

    let max_lines = inner.height as usize;
    if max_lines == 0 {
        return;
    }
    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            *last = close_hint_line;
        }
    }

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}
