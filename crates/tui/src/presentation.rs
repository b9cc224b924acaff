//! One interactive operation marker and its tooltip state machine.
//!
//! States:
//! - `Closed`: no local interaction. May still show a *related* tooltip when
//!   the hovered operation is the same edit at some depth.
//! - `Open`: pointed at or focused; shows the operation detail.
//! - `Closing`: left while something was still hovered; settles to
//!   `Closed` once the shared hover slot is empty.

use crate::hover::{HoverCoordinator, HoverSubscription, UnitId};
use otlog_core::layout::TooltipPlacement;
use otlog_core::{relate, Operation, OperationIdentity, Relation};

/// Renders the application-defined payload of an operation.
pub trait PayloadRenderer<P> {
    fn render_payload(&self, payload: &P) -> String;
}

impl<P, F> PayloadRenderer<P> for F
where
    F: Fn(&P) -> String,
{
    fn render_payload(&self, payload: &P) -> String {
        self(payload)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenStatus {
    #[default]
    Closed,
    Open,
    Closing,
}

/// Inputs that drive [`OpenStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitEvent {
    PointerEnter,
    PointerLeave,
    HoverChanged,
}

/// What a unit sees of the hover slot when an event arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverView {
    pub hovered: bool,
    pub published_by_self: bool,
}

impl HoverView {
    fn of(coordinator: &HoverCoordinator, unit: UnitId) -> Self {
        Self {
            hovered: coordinator.hovered().is_some(),
            published_by_self: coordinator.publisher() == Some(unit),
        }
    }
}

/// Pure transition function of the tooltip state machine.
pub fn transition(status: OpenStatus, event: UnitEvent, view: HoverView) -> OpenStatus {
    match (status, event) {
        (_, UnitEvent::PointerEnter) => OpenStatus::Open,
        (OpenStatus::Open, UnitEvent::PointerLeave) => {
            if view.hovered {
                OpenStatus::Closing
            } else {
                OpenStatus::Closed
            }
        }
        (OpenStatus::Open, UnitEvent::HoverChanged) => {
            if !view.hovered {
                OpenStatus::Closed
            } else if !view.published_by_self {
                // Another unit took over the slot.
                OpenStatus::Closing
            } else {
                OpenStatus::Open
            }
        }
        (OpenStatus::Closing, UnitEvent::HoverChanged) if !view.hovered => OpenStatus::Closed,
        (status, _) => status,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TooltipContent {
    /// Own detail, rendered when the unit opened.
    Detail {
        revision: Option<u64>,
        payload: String,
    },
    /// How this operation relates to the hovered one.
    Related(Relation),
}

impl TooltipContent {
    pub fn lines(&self) -> Vec<String> {
        match self {
            TooltipContent::Detail { revision, payload } => {
                let mut lines = Vec::new();
                if let Some(revision) = revision {
                    lines.push(format!("变更 {revision}"));
                }
                lines.extend(payload.lines().map(str::to_string));
                lines
            }
            TooltipContent::Related(relation) => relation.describe().into_iter().collect(),
        }
    }
}

/// One operation marker bound to one operation.
#[derive(Debug)]
pub struct OperationUnit<P> {
    id: UnitId,
    operation: Operation<P>,
    identity: OperationIdentity,
    placement: TooltipPlacement,
    status: OpenStatus,
    detail: Option<TooltipContent>,
    subscription: HoverSubscription,
}

impl<P: Clone> OperationUnit<P> {
    pub fn new(
        id: UnitId,
        operation: &Operation<P>,
        placement: TooltipPlacement,
        coordinator: &HoverCoordinator,
    ) -> Self {
        Self {
            id,
            identity: operation.identity(),
            operation: operation.clone(),
            placement,
            status: OpenStatus::Closed,
            detail: None,
            subscription: coordinator.subscribe(),
        }
    }
}

impl<P> OperationUnit<P> {
    pub fn id(&self) -> UnitId {
        self.id
    }

    pub fn identity(&self) -> &OperationIdentity {
        &self.identity
    }

    pub fn author(&self) -> &str {
        &self.identity.meta.author
    }

    pub fn placement(&self) -> TooltipPlacement {
        self.placement
    }

    pub fn status(&self) -> OpenStatus {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status == OpenStatus::Open
    }

    /// Local pointer-enter or focus.
    pub fn pointer_enter(
        &mut self,
        coordinator: &mut HoverCoordinator,
        renderer: &dyn PayloadRenderer<P>,
    ) {
        self.status = transition(
            self.status,
            UnitEvent::PointerEnter,
            HoverView::of(coordinator, self.id),
        );
        self.detail = Some(TooltipContent::Detail {
            revision: self.operation.revision,
            payload: renderer.render_payload(&self.operation.base),
        });
        coordinator.publish(self.id, self.identity.clone());
        // Our own publish is not news to us.
        self.subscription.poll(coordinator);
    }

    /// Local pointer-leave or blur.
    pub fn pointer_leave(&mut self, coordinator: &mut HoverCoordinator) {
        if self.status != OpenStatus::Open {
            return;
        }
        self.status = transition(
            self.status,
            UnitEvent::PointerLeave,
            HoverView::of(coordinator, self.id),
        );
        coordinator.clear(self.id);
        self.observe(coordinator);
    }

    /// React to a change of the hover slot. Returns whether anything changed.
    pub fn observe(&mut self, coordinator: &HoverCoordinator) -> bool {
        if !self.subscription.poll(coordinator) {
            return false;
        }
        let next = transition(
            self.status,
            UnitEvent::HoverChanged,
            HoverView::of(coordinator, self.id),
        );
        let changed = next != self.status;
        self.status = next;
        changed
    }

    /// Relation of this unit's operation to the hovered one, when this unit
    /// should display it.
    pub fn related_to_hovered(&self, coordinator: &HoverCoordinator) -> Option<Relation> {
        if self.status != OpenStatus::Closed {
            return None;
        }
        let hovered = coordinator.hovered()?;
        let relation = relate(&self.identity, hovered);
        relation.is_related().then_some(relation)
    }

    /// Tooltip currently shown by this unit, if any.
    pub fn tooltip(&self, coordinator: &HoverCoordinator) -> Option<TooltipContent> {
        if self.is_open() {
            return self.detail.clone();
        }
        self.related_to_hovered(coordinator)
            .map(TooltipContent::Related)
    }
}
