//! Conflict diagrams drawn with box-drawing characters.
//!
//! Canvas coordinates are snapped to a coarse grid so that the slightly
//! skewed corners of the layout land on shared cells.

use otlog_core::layout::{Diagram, Point};

/// Canvas units per grid step.
const GRID_UNIT: u16 = 50;
/// Terminal columns per grid step.
const CELL_COLS: u16 = 7;
/// Terminal rows per grid step.
const CELL_ROWS: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Corner,
    Edge,
    Head,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotCell {
    pub x: u16,
    pub y: u16,
    pub symbol: &'static str,
    pub kind: CellKind,
}

/// Marker cell of one arrow, where its operation unit lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotMarker {
    pub arrow: usize,
    pub x: u16,
    pub y: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plot {
    pub width: u16,
    pub height: u16,
    pub cells: Vec<PlotCell>,
    pub markers: Vec<PlotMarker>,
}

fn snap(p: Point) -> (u16, u16) {
    ((p.x / GRID_UNIT) * CELL_COLS, (p.y / GRID_UNIT) * CELL_ROWS)
}

/// Lay a diagram out on terminal cells, relative to its top-left corner.
pub fn plot<P>(diagram: &Diagram<'_, P>) -> Plot {
    let mut cells = Vec::new();
    let mut markers = Vec::new();

    for (index, arrow) in diagram.arrows.iter().enumerate() {
        let (sx, sy) = snap(arrow.start);
        let (ex, ey) = snap(arrow.end);
        let marker = if sy == ey {
            let (lo, hi) = (sx.min(ex), sx.max(ex));
            for x in lo + 1..hi {
                cells.push(cell(x, sy, "─", CellKind::Edge));
            }
            if hi > lo + 1 {
                let (hx, head) = if ex >= sx { (hi - 1, "▶") } else { (lo + 1, "◀") };
                cells.push(cell(hx, sy, head, CellKind::Head));
            }
            (lo + (hi - lo) / 2, sy)
        } else if sx == ex {
            let (lo, hi) = (sy.min(ey), sy.max(ey));
            for y in lo + 1..hi {
                cells.push(cell(sx, y, "│", CellKind::Edge));
            }
            if hi > lo + 1 {
                let (hy, head) = if ey >= sy { (hi - 1, "▼") } else { (lo + 1, "▲") };
                cells.push(cell(sx, hy, head, CellKind::Head));
            }
            (sx, lo + (hi - lo) / 2)
        } else {
            // Not used by the built-in layouts; dotted straight line.
            let steps = sx.abs_diff(ex).max(sy.abs_diff(ey));
            for step in 1..steps {
                let x = lerp(sx, ex, step, steps);
                let y = lerp(sy, ey, step, steps);
                cells.push(cell(x, y, "·", CellKind::Edge));
            }
            (lerp(sx, ex, 1, 2), lerp(sy, ey, 1, 2))
        };
        cells.push(cell(sx, sy, "○", CellKind::Corner));
        cells.push(cell(ex, ey, "○", CellKind::Corner));
        markers.push(PlotMarker {
            arrow: index,
            x: marker.0,
            y: marker.1,
        });
    }

    Plot {
        width: (diagram.width / GRID_UNIT) * CELL_COLS + 1,
        height: (diagram.height / GRID_UNIT) * CELL_ROWS + 1,
        cells,
        markers,
    }
}

fn cell(x: u16, y: u16, symbol: &'static str, kind: CellKind) -> PlotCell {
    PlotCell { x, y, symbol, kind }
}

fn lerp(from: u16, to: u16, step: u16, steps: u16) -> u16 {
    let from = i32::from(from);
    let to = i32::from(to);
    let value = from + (to - from) * i32::from(step) / i32::from(steps.max(1));
    value.max(0) as u16
}
