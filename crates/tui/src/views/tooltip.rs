use crate::presentation::TooltipContent;
use crate::theme::Theme;
use otlog_core::layout::TooltipPlacement;
use ratatui::prelude::*;
use ratatui::widgets::{Clear, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

/// Popup rectangle next to `anchor`, on the requested side and kept inside
/// `bounds`.
pub fn popup_rect(anchor: Rect, placement: TooltipPlacement, size: (u16, u16), bounds: Rect) -> Rect {
    let width = size.0.min(bounds.width);
    let height = size.1.min(bounds.height);
    let center_x = (anchor.x + anchor.width / 2).saturating_sub(width / 2);
    let center_y = (anchor.y + anchor.height / 2).saturating_sub(height / 2);

    let (x, y) = match placement {
        TooltipPlacement::Bottom => (center_x, anchor.bottom()),
        TooltipPlacement::Top => (center_x, anchor.y.saturating_sub(height)),
        TooltipPlacement::Left => (anchor.x.saturating_sub(width), center_y),
        TooltipPlacement::Right => (anchor.right(), center_y),
    };

    let x = x.clamp(bounds.x, bounds.right().saturating_sub(width));
    let y = y.clamp(bounds.y, bounds.bottom().saturating_sub(height));
    Rect::new(x, y, width, height)
}

/// Outer size of a tooltip holding `lines`, wrapped to `max_width`.
pub fn popup_size(lines: &[String], max_width: u16) -> (u16, u16) {
    // Border plus one column of padding on each side.
    let chrome = 4u16;
    let inner_max = max_width.saturating_sub(chrome).max(1);
    let mut rows = 0u16;
    let mut widest = 0u16;
    for line in lines {
        let width = UnicodeWidthStr::width(line.as_str()) as u16;
        widest = widest.max(width.min(inner_max));
        rows = rows.saturating_add(width.div_ceil(inner_max).max(1));
    }
    (widest.max(1) + chrome, rows.max(1) + 2)
}

pub fn render(
    frame: &mut Frame,
    anchor: Rect,
    placement: TooltipPlacement,
    content: &TooltipContent,
    max_width: u16,
) {
    let lines = content.lines();
    if lines.is_empty() {
        return;
    }
    let size = popup_size(&lines, max_width);
    let area = popup_rect(anchor, placement, size, frame.area());
    if area.width < 3 || area.height < 3 {
        return;
    }

    let (block, text_style) = match content {
        TooltipContent::Detail { .. } => (
            Theme::block_accent(),
            Style::new().fg(Theme::TEXT_PRIMARY),
        ),
        TooltipContent::Related(_) => (
            Theme::block(),
            Style::new().fg(Theme::TEXT_SECONDARY).italic(),
        ),
    };
    let block = block
        .padding(Theme::PADDING_COMPACT)
        .style(Style::new().bg(Theme::BG_SURFACE));

    frame.render_widget(Clear, area);
    let text: Vec<Line> = lines
        .into_iter()
        .map(|line| Line::from(Span::styled(line, text_style)))
        .collect();
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
        area,
    );
}
