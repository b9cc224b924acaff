use crate::hover::UnitId;
use crate::presentation::OpenStatus;
use crate::theme::{AuthorPalette, Theme};
use crate::trace_view::{MarkerPlace, TraceView};
use crate::views::diagram::{self, CellKind};
use otlog_core::layout::{layout_entry, state_narrative, Narrative, NarrativeSegment};
use otlog_core::RowKey;
use ratatui::layout::Position;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

const GUTTER: &str = "  ↑ ";
const GUTTER_WIDTH: u16 = 4;
const MARKER: &str = "●";

/// Screen cells of the operation markers drawn in the last frame.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    entries: Vec<(Rect, UnitId)>,
}

impl HitMap {
    pub fn push(&mut self, rect: Rect, unit: UnitId) {
        self.entries.push((rect, unit));
    }

    pub fn unit_at(&self, x: u16, y: u16) -> Option<UnitId> {
        let pos = Position::new(x, y);
        self.entries
            .iter()
            .find(|(rect, _)| rect.contains(pos))
            .map(|(_, unit)| *unit)
    }

    pub fn rect_of(&self, unit: UnitId) -> Option<Rect> {
        self.entries
            .iter()
            .find(|(_, id)| *id == unit)
            .map(|(rect, _)| *rect)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Render the trace newest-first starting at row `scroll`.
pub fn render<P>(
    frame: &mut Frame,
    view: &TraceView<P>,
    palette: &AuthorPalette,
    scroll: usize,
    area: Rect,
) -> HitMap {
    let mut hits = HitMap::default();
    let mut y = area.y;

    for row in view.trace().rows().into_iter().skip(scroll) {
        if y >= area.bottom() {
            break;
        }

        // Resulting state
        let state = state_narrative(row.state);
        let (spans, markers) =
            narrative_spans(&state, row.key, MarkerPlace::State, view, palette);
        let mut line_spans = vec![Span::raw(" ")];
        line_spans.extend(spans);
        let state_area = Rect::new(area.x, y, area.width, 1);
        frame.render_widget(
            Paragraph::new(Line::from(line_spans))
                .style(Style::new().bg(Theme::BG_STATE).fg(Theme::TEXT_SECONDARY)),
            state_area,
        );
        push_markers(&mut hits, &markers, area, area.x + 1, y);
        y += 1;

        if let Some(entry) = row.entry {
            let layout = layout_entry(entry);

            if let Some(d) = &layout.diagram {
                let plot = diagram::plot(d);
                for gy in 0..plot.height {
                    if y + gy < area.bottom() {
                        render_gutter(frame, area.x, y + gy);
                    }
                }
                let origin_x = area.x + GUTTER_WIDTH + 1;
                let buf = frame.buffer_mut();
                for cell in &plot.cells {
                    let (cx, cy) = (origin_x + cell.x, y + cell.y);
                    if cx >= area.right() || cy >= area.bottom() {
                        continue;
                    }
                    let color = match cell.kind {
                        CellKind::Corner => Theme::DIAGRAM_CORNER,
                        CellKind::Edge | CellKind::Head => Theme::DIAGRAM_EDGE,
                    };
                    buf[(cx, cy)].set_symbol(cell.symbol).set_fg(color);
                }
                for marker in &plot.markers {
                    let (cx, cy) = (origin_x + marker.x, y + marker.y);
                    if cx >= area.right() || cy >= area.bottom() {
                        continue;
                    }
                    let Some(unit) = view.unit_at(row.key, MarkerPlace::Arrow(marker.arrow))
                    else {
                        continue;
                    };
                    buf[(cx, cy)]
                        .set_symbol(MARKER)
                        .set_style(marker_style(view, unit, palette));
                    hits.push(Rect::new(cx, cy, 1, 1), unit);
                }
                y += plot.height;
            }

            if y < area.bottom() {
                render_gutter(frame, area.x, y);
                let (spans, markers) = narrative_spans(
                    &layout.narrative,
                    row.key,
                    MarkerPlace::Narrative,
                    view,
                    palette,
                );
                let text_x = area.x + GUTTER_WIDTH;
                let text_area = Rect::new(
                    text_x,
                    y,
                    area.width.saturating_sub(GUTTER_WIDTH),
                    1,
                );
                frame.render_widget(
                    Paragraph::new(Line::from(spans))
                        .style(Style::new().fg(Theme::TEXT_CONTENT)),
                    text_area,
                );
                push_markers(&mut hits, &markers, area, text_x, y);
            }
            y += 1;
        }

        // Spacer
        y += 1;
    }

    hits
}

fn render_gutter(frame: &mut Frame, x: u16, y: u16) {
    let area = Rect::new(x, y, GUTTER_WIDTH, 1);
    frame.render_widget(
        Paragraph::new(Span::styled(GUTTER, Style::new().fg(Theme::GUTTER))),
        area,
    );
}

fn push_markers(hits: &mut HitMap, markers: &[(u16, UnitId)], area: Rect, x: u16, y: u16) {
    for &(offset, unit) in markers {
        let cx = x + offset;
        if cx < area.right() && y < area.bottom() {
            hits.push(Rect::new(cx, y, 1, 1), unit);
        }
    }
}

/// Spans of a narrative line plus the column offset of each marker.
fn narrative_spans<P>(
    narrative: &Narrative<'_, P>,
    key: RowKey,
    place: fn(usize) -> MarkerPlace,
    view: &TraceView<P>,
    palette: &AuthorPalette,
) -> (Vec<Span<'static>>, Vec<(u16, UnitId)>) {
    let mut spans = Vec::with_capacity(narrative.segments.len());
    let mut markers = Vec::new();
    let mut offset = 0u16;
    let mut op_index = 0usize;

    for segment in &narrative.segments {
        match segment {
            NarrativeSegment::Text(text) => {
                offset = offset.saturating_add(UnicodeWidthStr::width(&**text) as u16);
                spans.push(Span::raw(text.to_string()));
            }
            NarrativeSegment::Operation(_) => {
                match view.unit_at(key, place(op_index)) {
                    Some(unit) => {
                        spans.push(Span::styled(MARKER, marker_style(view, unit, palette)));
                        markers.push((offset, unit));
                    }
                    None => spans.push(Span::raw(MARKER)),
                }
                offset = offset.saturating_add(1);
                op_index += 1;
            }
        }
    }

    (spans, markers)
}

fn marker_style<P>(view: &TraceView<P>, unit: UnitId, palette: &AuthorPalette) -> Style {
    let Some(u) = view.unit(unit) else {
        return Style::new();
    };
    let style = Style::new().fg(palette.color(u.author()));
    match u.status() {
        OpenStatus::Open => style.bold().reversed(),
        OpenStatus::Closed if u.related_to_hovered(view.hover()).is_some() => style.underlined(),
        _ => style,
    }
}
