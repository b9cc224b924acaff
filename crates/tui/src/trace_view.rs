//! A loaded trace plus one operation unit per operation marker on screen,
//! all sharing one hover coordinator.

use crate::hover::{HoverCoordinator, UnitId};
use crate::presentation::{OpenStatus, OperationUnit, PayloadRenderer, TooltipContent};
use otlog_core::layout::{layout_entry, state_narrative, TooltipPlacement};
use otlog_core::{ClientTrace, Operation, RowKey};
use std::collections::HashMap;

/// Where a marker sits within its trace row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerPlace {
    /// n-th operation in the state line.
    State(usize),
    /// n-th inline operation in the narrative line.
    Narrative(usize),
    /// n-th arrow of the conflict diagram.
    Arrow(usize),
}

pub struct TraceView<P> {
    trace: ClientTrace<P>,
    hover: HoverCoordinator,
    units: Vec<OperationUnit<P>>,
    index: HashMap<(RowKey, MarkerPlace), UnitId>,
    rows: Vec<RowKey>,
    /// Units in reading order, for keyboard focus cycling.
    order: Vec<UnitId>,
    pointer: Option<UnitId>,
}

impl<P: Clone> TraceView<P> {
    pub fn new(trace: ClientTrace<P>) -> Self {
        let mut view = Self {
            trace,
            hover: HoverCoordinator::new(),
            units: Vec::new(),
            index: HashMap::new(),
            rows: Vec::new(),
            order: Vec::new(),
            pointer: None,
        };
        view.rebuild_units();
        view
    }

    /// Record a new transition. Units of existing rows keep their ids.
    pub fn append(
        &mut self,
        entry: otlog_core::ClientLogEntry<P>,
        new_state: otlog_core::SynchronizationState<P>,
    ) {
        self.trace.append(entry, new_state);
        let key = RowKey::Entry(self.trace.log.len());
        let Some(item) = self.trace.log.last() else {
            return;
        };
        let mut fresh = Vec::new();
        collect_markers(
            &mut fresh,
            key,
            state_narrative(&item.new_state).operations(),
            MarkerPlace::State,
        );
        let layout = layout_entry(&item.entry);
        if let Some(diagram) = &layout.diagram {
            for (i, arrow) in diagram.arrows.iter().enumerate() {
                fresh.push((
                    key,
                    MarkerPlace::Arrow(i),
                    arrow.operation.clone(),
                    arrow.tooltip_placement,
                ));
            }
        }
        collect_markers(
            &mut fresh,
            key,
            layout.narrative.operations(),
            MarkerPlace::Narrative,
        );

        // Newest row reads first.
        let mut new_ids = Vec::with_capacity(fresh.len());
        for (key, place, operation, placement) in fresh {
            new_ids.push(self.add_unit(key, place, &operation, placement));
        }
        new_ids.extend(self.order.drain(..));
        self.order = new_ids;
    }

    fn rebuild_units(&mut self) {
        self.hover.reset();
        self.units.clear();
        self.index.clear();
        self.rows.clear();
        self.order.clear();
        self.pointer = None;

        let mut markers = Vec::new();
        for row in self.trace.rows() {
            collect_markers(
                &mut markers,
                row.key,
                state_narrative(row.state).operations(),
                MarkerPlace::State,
            );
            if let Some(entry) = row.entry {
                let layout = layout_entry(entry);
                if let Some(diagram) = &layout.diagram {
                    for (i, arrow) in diagram.arrows.iter().enumerate() {
                        markers.push((
                            row.key,
                            MarkerPlace::Arrow(i),
                            arrow.operation.clone(),
                            arrow.tooltip_placement,
                        ));
                    }
                }
                collect_markers(
                    &mut markers,
                    row.key,
                    layout.narrative.operations(),
                    MarkerPlace::Narrative,
                );
            }
        }
        for (key, place, operation, placement) in markers {
            let id = self.add_unit(key, place, &operation, placement);
            self.order.push(id);
        }
    }

    fn add_unit(
        &mut self,
        key: RowKey,
        place: MarkerPlace,
        operation: &Operation<P>,
        placement: TooltipPlacement,
    ) -> UnitId {
        let id = UnitId(self.units.len());
        self.units
            .push(OperationUnit::new(id, operation, placement, &self.hover));
        self.index.insert((key, place), id);
        self.rows.push(key);
        id
    }
}

type Marker<P> = (RowKey, MarkerPlace, Operation<P>, TooltipPlacement);

fn collect_markers<'a, P: Clone + 'a>(
    out: &mut Vec<Marker<P>>,
    key: RowKey,
    operations: impl Iterator<Item = &'a Operation<P>>,
    place: fn(usize) -> MarkerPlace,
) {
    for (i, op) in operations.enumerate() {
        out.push((key, place(i), op.clone(), TooltipPlacement::Bottom));
    }
}

impl<P> TraceView<P> {
    pub fn trace(&self) -> &ClientTrace<P> {
        &self.trace
    }

    pub fn hover(&self) -> &HoverCoordinator {
        &self.hover
    }

    pub fn units(&self) -> &[OperationUnit<P>] {
        &self.units
    }

    pub fn unit(&self, id: UnitId) -> Option<&OperationUnit<P>> {
        self.units.get(id.0)
    }

    pub fn unit_at(&self, key: RowKey, place: MarkerPlace) -> Option<UnitId> {
        self.index.get(&(key, place)).copied()
    }

    /// Row a unit's marker lives in.
    pub fn row_of(&self, id: UnitId) -> Option<RowKey> {
        self.rows.get(id.0).copied()
    }

    pub fn focus_order(&self) -> &[UnitId] {
        &self.order
    }

    /// Unit currently under the pointer (or focused).
    pub fn pointer(&self) -> Option<UnitId> {
        self.pointer
    }

    /// Move the pointer onto `target` (or off every unit), issuing
    /// leave/enter to the units involved.
    pub fn point_at(&mut self, target: Option<UnitId>, renderer: &dyn PayloadRenderer<P>) {
        if target == self.pointer {
            return;
        }
        if let Some(previous) = self.pointer.take() {
            self.leave(previous);
        }
        if let Some(next) = target {
            self.enter(next, renderer);
        }
    }

    pub fn enter(&mut self, id: UnitId, renderer: &dyn PayloadRenderer<P>) {
        let Some(unit) = self.units.get_mut(id.0) else {
            return;
        };
        unit.pointer_enter(&mut self.hover, renderer);
        self.pointer = Some(id);
        self.notify();
    }

    pub fn leave(&mut self, id: UnitId) {
        let Some(unit) = self.units.get_mut(id.0) else {
            return;
        };
        unit.pointer_leave(&mut self.hover);
        if self.pointer == Some(id) {
            self.pointer = None;
        }
        self.notify();
    }

    /// Deliver the current hover slot to every subscribed unit.
    fn notify(&mut self) {
        for unit in &mut self.units {
            unit.observe(&self.hover);
        }
    }

    pub fn open_units(&self) -> Vec<UnitId> {
        self.units
            .iter()
            .filter(|unit| unit.status() == OpenStatus::Open)
            .map(OperationUnit::id)
            .collect()
    }

    /// Every tooltip currently on screen, open detail or related.
    pub fn visible_tooltips(&self) -> Vec<(UnitId, TooltipContent)> {
        self.units
            .iter()
            .filter_map(|unit| unit.tooltip(&self.hover).map(|t| (unit.id(), t)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otlog_core::testing;
    use otlog_core::{ClientLogEntry, Relation};

    fn render(payload: &String) -> String {
        payload.clone()
    }

    fn sample_view() -> TraceView<String> {
        TraceView::new(ClientTrace {
            initial_state: testing::synchronized(0),
            log: testing::sample_log(),
        })
    }

    #[test]
    fn every_marker_gets_a_unit() {
        let view = sample_view();
        // ack row: 1 narrative; conflict row: 1 state + 4 arrows + 4 narrative;
        // sent row: 1 state + 1 narrative; initial row: nothing.
        assert_eq!(view.units().len(), 12);
        assert_eq!(view.focus_order().len(), 12);
        assert!(
            view.unit_at(RowKey::Entry(2), MarkerPlace::Arrow(3))
                .is_some()
        );
        assert!(view.unit_at(RowKey::Initial, MarkerPlace::State(0)).is_none());
        let arrow = view
            .unit_at(RowKey::Entry(2), MarkerPlace::Arrow(1))
            .unwrap();
        assert_eq!(view.row_of(arrow), Some(RowKey::Entry(2)));
    }

    #[test]
    fn at_most_one_unit_is_open_under_interleaved_enters() {
        let mut view = sample_view();
        let ids: Vec<UnitId> = view.focus_order().to_vec();
        for &id in ids.iter().take(5) {
            view.enter(id, &render);
            assert_eq!(view.open_units(), vec![id]);
        }
        // Enter the first one again without any leave in between.
        view.enter(ids[0], &render);
        assert_eq!(view.open_units(), vec![ids[0]]);
    }

    #[test]
    fn hovering_an_arrow_lights_up_related_markers() {
        let mut view = sample_view();
        let received = view
            .unit_at(RowKey::Entry(2), MarkerPlace::Arrow(2))
            .unwrap();
        view.point_at(Some(received), &render);

        let tooltips = view.visible_tooltips();
        let transformed = view
            .unit_at(RowKey::Entry(2), MarkerPlace::Arrow(3))
            .unwrap();
        let awaited = view
            .unit_at(RowKey::Entry(2), MarkerPlace::Arrow(0))
            .unwrap();
        assert!(tooltips.contains(&(
            transformed,
            TooltipContent::Related(Relation::Descendant(1))
        )));
        assert!(tooltips.iter().all(|(id, _)| *id != awaited));
        // The inline narrative marker of the same operation reads "same edit".
        let inline = view
            .unit_at(RowKey::Entry(2), MarkerPlace::Narrative(0))
            .unwrap();
        assert!(tooltips.contains(&(inline, TooltipContent::Related(Relation::SameDepth))));
    }

    #[test]
    fn moving_pointer_off_clears_everything() {
        let mut view = sample_view();
        let first = view.focus_order()[0];
        let second = view.focus_order()[1];
        view.point_at(Some(first), &render);
        view.point_at(Some(second), &render);
        view.point_at(None, &render);
        assert!(view.hover().hovered().is_none());
        assert!(view.open_units().is_empty());
        assert!(view.visible_tooltips().is_empty());
        assert!(
            view.units()
                .iter()
                .all(|unit| unit.status() == OpenStatus::Closed)
        );
    }

    #[test]
    fn appending_keeps_existing_unit_ids() {
        let mut view = sample_view();
        let before = view
            .unit_at(RowKey::Entry(2), MarkerPlace::Arrow(0))
            .unwrap();
        view.append(
            ClientLogEntry::UserEditStoredAsBuffer {
                operation: testing::op("Z", "me", &[]),
            },
            testing::synchronized(3),
        );
        assert_eq!(
            view.unit_at(RowKey::Entry(2), MarkerPlace::Arrow(0)),
            Some(before)
        );
        let newest = view
            .unit_at(RowKey::Entry(4), MarkerPlace::Narrative(0))
            .unwrap();
        assert_eq!(view.focus_order()[0], newest);
    }
}
