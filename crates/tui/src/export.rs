//! Plain-text rendering of a trace for pipes and terminals without mouse
//! support.

use otlog_core::layout::{layout_entry, state_narrative};
use otlog_core::validate::ValidationError;
use otlog_core::{ClientTrace, Operation, RowKey};
use std::fmt::Write as _;

fn tag<P>(op: &Operation<P>) -> String {
    format!("[{}]", op.identity().tag())
}

/// Newest-first text rendering with `[author:id@depth]` operation tags.
pub fn render_plain<P>(trace: &ClientTrace<P>, warnings: &[ValidationError]) -> String {
    let mut out = String::new();

    for row in trace.rows() {
        match row.entry {
            Some(entry) => {
                let _ = writeln!(out, "{}  {}", row.key, entry.entry_type().as_str());
                let layout = layout_entry(entry);
                let _ = writeln!(out, "  {}", layout.narrative.to_plain(tag));
                if let Some(diagram) = &layout.diagram {
                    for (i, arrow) in diagram.arrows.iter().enumerate() {
                        let _ = writeln!(
                            out,
                            "    arrow {i} {} ({},{})->({},{})",
                            tag(arrow.operation),
                            arrow.start.x,
                            arrow.start.y,
                            arrow.end.x,
                            arrow.end.y,
                        );
                    }
                }
            }
            None => {
                debug_assert_eq!(row.key, RowKey::Initial);
                let _ = writeln!(out, "{}", row.key);
            }
        }
        let _ = writeln!(out, "  {}", state_narrative(row.state).to_plain(tag));
    }

    if !warnings.is_empty() {
        let _ = writeln!(out);
        for warning in warnings {
            let _ = writeln!(out, "warning: {warning}");
        }
    }
    out
}
