//! Per-entry layout: which operations a log entry shows, where their
//! arrows go in the conflict diagrams, and the narrative line around them.
//!
//! Diagram corners are wired so that horizontally-opposite arrows are
//! transforms of each other (`transformed_against` one step apart) and
//! vertically-opposite arrows share `meta.id`.

use crate::client_log::{ClientEntryType, ClientLogEntry, SynchronizationState};
use crate::operation::Operation;
use std::borrow::Cow;

/// Anchor point in diagram canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: u16,
    pub y: u16,
}

impl Point {
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Side of an operation marker on which its tooltip opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TooltipPlacement {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

/// One arrow of a conflict diagram. The arrow *is* the operation: it
/// leads from the document state before it to the state after it.
#[derive(Debug)]
pub struct DiagramArrow<'a, P> {
    pub operation: &'a Operation<P>,
    pub start: Point,
    pub end: Point,
    pub tooltip_placement: TooltipPlacement,
}

/// A pair of parallel arrows where `to` is `from` transformed once more.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformEdge {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug)]
pub struct Diagram<'a, P> {
    pub width: u16,
    pub height: u16,
    pub arrows: Vec<DiagramArrow<'a, P>>,
    pub transforms: Vec<TransformEdge>,
}

#[derive(Debug)]
pub enum NarrativeSegment<'a, P> {
    Text(Cow<'static, str>),
    Operation(&'a Operation<P>),
}

/// Prose line interleaving text with inline operation markers.
#[derive(Debug)]
pub struct Narrative<'a, P> {
    pub segments: Vec<NarrativeSegment<'a, P>>,
}

impl<'a, P> Narrative<'a, P> {
    fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn text(mut self, text: impl Into<Cow<'static, str>>) -> Self {
        self.segments.push(NarrativeSegment::Text(text.into()));
        self
    }

    fn op(mut self, operation: &'a Operation<P>) -> Self {
        self.segments.push(NarrativeSegment::Operation(operation));
        self
    }

    pub fn operations(&self) -> impl Iterator<Item = &'a Operation<P>> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            NarrativeSegment::Operation(op) => Some(*op),
            NarrativeSegment::Text(_) => None,
        })
    }

    /// Flatten to a single string, rendering each operation with `render_op`.
    pub fn to_plain<F>(&self, mut render_op: F) -> String
    where
        F: FnMut(&Operation<P>) -> String,
    {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                NarrativeSegment::Text(text) => out.push_str(text),
                NarrativeSegment::Operation(op) => out.push_str(&render_op(op)),
            }
        }
        out
    }
}

/// Everything needed to draw one log entry.
#[derive(Debug)]
pub struct EntryLayout<'a, P> {
    pub entry_type: ClientEntryType,
    pub diagram: Option<Diagram<'a, P>>,
    pub narrative: Narrative<'a, P>,
}

/// Map a log entry to its diagram and narrative.
pub fn layout_entry<P>(entry: &ClientLogEntry<P>) -> EntryLayout<'_, P> {
    let entry_type = entry.entry_type();
    let (diagram, narrative) = match entry {
        ClientLogEntry::UserEditAddedToBuffer => {
            (None, Narrative::new().text("新增用户操作到缓冲区"))
        }
        ClientLogEntry::UserEditImmediatelySentToServer { operation } => (
            None,
            Narrative::new()
                .text("操作 ")
                .op(operation)
                .text(" 被发送到服务器。"),
        ),
        ClientLogEntry::UserEditStoredAsBuffer { operation } => (
            None,
            Narrative::new()
                .text("操作 ")
                .op(operation)
                .text(" 被存储在缓冲区。"),
        ),
        ClientLogEntry::ReceivedOwnOperation {
            acknowledged_operation,
        } => (
            None,
            Narrative::new()
                .text("收到自己的操作 ")
                .op(acknowledged_operation)
                .text("."),
        ),
        ClientLogEntry::ReceivedOwnOperationAndSentBuffer {
            acknowledged_operation,
            sent_buffer,
        } => (
            None,
            Narrative::new()
                .text("接收到自己的操作 ")
                .op(acknowledged_operation)
                .text(" ，等待区： ")
                .op(sent_buffer)
                .text("。"),
        ),
        ClientLogEntry::ReceivedServerOperationWhileSynchronized { received_operation } => (
            None,
            Narrative::new()
                .text("接收到来自服务器的操作 ")
                .op(received_operation)
                .text(" 并且立即应用。"),
        ),
        ClientLogEntry::ReceivedServerOperationWhileAwaitingOperation {
            received_operation,
            transformed_received_operation,
            awaited_operation,
            transformed_awaited_operation,
        } => {
            let top_left = Point::new(20, 15);
            let top_right = Point::new(125, 20);
            let bottom_left = Point::new(15, 120);
            let bottom_right = Point::new(120, 125);

            let arrows = vec![
                arrow(awaited_operation, top_left, top_right, TooltipPlacement::Top),
                arrow(
                    transformed_awaited_operation,
                    bottom_left,
                    bottom_right,
                    TooltipPlacement::Bottom,
                ),
                arrow(received_operation, top_left, bottom_left, TooltipPlacement::Left),
                arrow(
                    transformed_received_operation,
                    top_right,
                    bottom_right,
                    TooltipPlacement::Right,
                ),
            ];
            let diagram = Diagram {
                width: 140,
                height: 140,
                arrows,
                transforms: vec![
                    TransformEdge { from: 0, to: 1 },
                    TransformEdge { from: 2, to: 3 },
                ],
            };
            let narrative = Narrative::new()
                .text("接收到的 ")
                .op(received_operation)
                .text(" 与自己发送的 ")
                .op(awaited_operation)
                .text(" 发生冲突，解决冲突后： ")
                .op(transformed_received_operation)
                .text(" 和 ")
                .op(transformed_awaited_operation)
                .text(".");
            (Some(diagram), narrative)
        }
        ClientLogEntry::ReceivedServerOperationWhileAwaitingOperationWithBuffer {
            received_operation,
            once_transformed_received_operation,
            twice_transformed_received_operation,
            awaited_operation,
            transformed_awaited_operation,
            buffer_operation,
            transformed_buffer_operation,
        } => {
            let top_left = Point::new(20, 15);
            let top_center = Point::new(125, 20);
            let top_right = Point::new(230, 25);
            let bottom_left = Point::new(15, 120);
            let bottom_center = Point::new(120, 125);
            let bottom_right = Point::new(225, 130);

            let arrows = vec![
                arrow(awaited_operation, top_left, top_center, TooltipPlacement::Top),
                arrow(
                    transformed_awaited_operation,
                    bottom_left,
                    bottom_center,
                    TooltipPlacement::Bottom,
                ),
                arrow(buffer_operation, top_center, top_right, TooltipPlacement::Top),
                arrow(
                    transformed_buffer_operation,
                    bottom_center,
                    bottom_right,
                    TooltipPlacement::Bottom,
                ),
                arrow(received_operation, top_left, bottom_left, TooltipPlacement::Left),
                arrow(
                    once_transformed_received_operation,
                    top_center,
                    bottom_center,
                    TooltipPlacement::Bottom,
                ),
                arrow(
                    twice_transformed_received_operation,
                    top_right,
                    bottom_right,
                    TooltipPlacement::Right,
                ),
            ];
            let diagram = Diagram {
                width: 245,
                height: 145,
                arrows,
                transforms: vec![
                    TransformEdge { from: 0, to: 1 },
                    TransformEdge { from: 2, to: 3 },
                    TransformEdge { from: 4, to: 5 },
                    TransformEdge { from: 5, to: 6 },
                ],
            };
            let narrative = Narrative::new()
                .text("接收到的 ")
                .op(received_operation)
                .text(" 与自己发送的 ")
                .op(awaited_operation)
                .text(" 以及临时区 ")
                .op(buffer_operation)
                .text(" 发生冲突，解决冲突后： ")
                .op(twice_transformed_received_operation)
                .text(" 与 ")
                .op(transformed_awaited_operation)
                .text(" ，新的临时区：")
                .op(transformed_buffer_operation)
                .text(".");
            (Some(diagram), narrative)
        }
    };

    EntryLayout {
        entry_type,
        diagram,
        narrative,
    }
}

/// The `状态：` line for a synchronization state.
pub fn state_narrative<P>(state: &SynchronizationState<P>) -> Narrative<'_, P> {
    let narrative = Narrative::new().text("状态： ");
    match state {
        SynchronizationState::Synchronized { server_revision } => {
            narrative.text(format!("同步服务器版本 {server_revision}"))
        }
        SynchronizationState::AwaitingOperation { awaited_operation } => {
            narrative.text("等待操作 ").op(awaited_operation)
        }
        SynchronizationState::AwaitingOperationWithBuffer {
            awaited_operation,
            buffer,
        } => narrative
            .text("等待该操作 ")
            .op(awaited_operation)
            .text(" ，临时区： ")
            .op(buffer),
    }
}

fn arrow<P>(
    operation: &Operation<P>,
    start: Point,
    end: Point,
    tooltip_placement: TooltipPlacement,
) -> DiagramArrow<'_, P> {
    DiagramArrow {
        operation,
        start,
        end,
        tooltip_placement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::{relate, Relation};
    use crate::testing;

    #[test]
    fn plain_entries_have_no_diagram() {
        let op = testing::op("a", "alice", &[]);
        let entry = ClientLogEntry::UserEditImmediatelySentToServer { operation: op };
        let layout = layout_entry(&entry);
        assert!(layout.diagram.is_none());
        assert_eq!(layout.narrative.operations().count(), 1);
        assert_eq!(
            layout.narrative.to_plain(|op| op.meta.id.clone()),
            "操作 a 被发送到服务器。"
        );
    }

    #[test]
    fn added_to_buffer_carries_no_operations() {
        let entry: ClientLogEntry<String> = ClientLogEntry::UserEditAddedToBuffer;
        let layout = layout_entry(&entry);
        assert!(layout.diagram.is_none());
        assert_eq!(layout.narrative.operations().count(), 0);
        assert_eq!(layout.narrative.to_plain(|_| String::new()), "新增用户操作到缓冲区");
    }

    #[test]
    fn conflict_square_has_four_consistent_arrows() {
        let entry = testing::conflict_entry("X", "Y");
        let layout = layout_entry(&entry);
        let diagram = layout.diagram.expect("conflict entries have a diagram");
        assert_eq!(diagram.arrows.len(), 4);
        assert_eq!((diagram.width, diagram.height), (140, 140));

        for edge in &diagram.transforms {
            let from = diagram.arrows[edge.from].operation;
            let to = diagram.arrows[edge.to].operation;
            assert_eq!(relate(from, to), Relation::Ancestor(1));
        }

        // Adjacent sides of the square belong to different edits.
        let awaited = diagram.arrows[0].operation;
        let received = diagram.arrows[2].operation;
        assert_eq!(relate(received, awaited), Relation::Unrelated);

        let placements: Vec<TooltipPlacement> =
            diagram.arrows.iter().map(|a| a.tooltip_placement).collect();
        assert_eq!(
            placements,
            vec![
                TooltipPlacement::Top,
                TooltipPlacement::Bottom,
                TooltipPlacement::Left,
                TooltipPlacement::Right,
            ]
        );
    }

    #[test]
    fn conflict_square_corners_are_shared_by_adjacent_arrows() {
        let entry = testing::conflict_entry("X", "Y");
        let diagram = layout_entry(&entry).diagram.unwrap();
        let [top, bottom, left, right] = [0, 1, 2, 3].map(|i| &diagram.arrows[i]);
        assert_eq!(top.start, left.start);
        assert_eq!(top.end, right.start);
        assert_eq!(bottom.start, left.end);
        assert_eq!(bottom.end, right.end);
    }

    #[test]
    fn buffered_conflict_has_seven_arrows_and_chained_transforms() {
        let entry = testing::buffered_conflict_entry("R", "W", "B");
        let layout = layout_entry(&entry);
        let diagram = layout.diagram.unwrap();
        assert_eq!(diagram.arrows.len(), 7);
        assert_eq!(diagram.transforms.len(), 4);
        for edge in &diagram.transforms {
            let from = diagram.arrows[edge.from].operation;
            let to = diagram.arrows[edge.to].operation;
            assert_eq!(relate(from, to), Relation::Ancestor(1), "edge {edge:?}");
        }
        let received = diagram.arrows[4].operation;
        let twice = diagram.arrows[6].operation;
        assert_eq!(relate(received, twice), Relation::Ancestor(2));
        assert_eq!(layout.narrative.operations().count(), 6);

        let placements: Vec<TooltipPlacement> =
            diagram.arrows.iter().map(|a| a.tooltip_placement).collect();
        // awaited, awaited', buffer, buffer', received, received', received''
        assert_eq!(
            placements,
            vec![
                TooltipPlacement::Top,
                TooltipPlacement::Bottom,
                TooltipPlacement::Top,
                TooltipPlacement::Bottom,
                TooltipPlacement::Left,
                TooltipPlacement::Bottom,
                TooltipPlacement::Right,
            ]
        );
    }

    #[test]
    fn state_lines_follow_status() {
        let synced: SynchronizationState<String> =
            SynchronizationState::Synchronized { server_revision: 3 };
        assert_eq!(
            state_narrative(&synced).to_plain(|_| String::new()),
            "状态： 同步服务器版本 3"
        );

        let buffered = SynchronizationState::AwaitingOperationWithBuffer {
            awaited_operation: testing::op("w", "alice", &[]),
            buffer: testing::op("b", "alice", &[]),
        };
        let line = state_narrative(&buffered);
        assert_eq!(line.operations().count(), 2);
        assert_eq!(
            line.to_plain(|op| op.meta.id.clone()),
            "状态： 等待该操作 w ，临时区： b"
        );
    }
}
