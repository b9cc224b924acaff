use crate::layout::{layout_entry, Diagram};
use crate::relation::{relate, Relation};
use crate::sequence::ClientTrace;
use thiserror::Error;

/// A broken geometric or relationship invariant in a rendered trace.
///
/// Protocol legality of the log is never checked here; only what the
/// diagrams would draw.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("log entry {entry}: arrows {from} and {to} are {relation}, expected one transformation apart")]
    BrokenTransform {
        entry: usize,
        from: usize,
        to: usize,
        relation: Relation,
    },
    #[error("log entry {entry}: arrow {arrow} has coinciding endpoints")]
    DegenerateArrow { entry: usize, arrow: usize },
    #[error("log entry {entry}: arrow {arrow} leaves the {width}x{height} canvas")]
    ArrowOutsideCanvas {
        entry: usize,
        arrow: usize,
        width: u16,
        height: u16,
    },
}

type DiagramValidator<P> = fn(usize, &Diagram<'_, P>) -> Vec<ValidationError>;

/// Validate every diagram in a trace by composing independent validators.
/// `entry` numbers in the errors are 1-based chronological positions.
pub fn validate_trace<P>(trace: &ClientTrace<P>) -> Result<(), Vec<ValidationError>> {
    let validators: &[DiagramValidator<P>] = &[validate_transforms, validate_geometry];

    let errors: Vec<ValidationError> = trace
        .log
        .iter()
        .enumerate()
        .filter_map(|(i, item)| layout_entry(&item.entry).diagram.map(|d| (i + 1, d)))
        .flat_map(|(entry, diagram)| {
            validators
                .iter()
                .flat_map(|v| v(entry, &diagram))
                .collect::<Vec<_>>()
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_transforms<P>(entry: usize, diagram: &Diagram<'_, P>) -> Vec<ValidationError> {
    diagram
        .transforms
        .iter()
        .filter_map(|edge| {
            let from = diagram.arrows[edge.from].operation;
            let to = diagram.arrows[edge.to].operation;
            let relation = relate(from, to);
            (relation != Relation::Ancestor(1)).then_some(ValidationError::BrokenTransform {
                entry,
                from: edge.from,
                to: edge.to,
                relation,
            })
        })
        .collect()
}

fn validate_geometry<P>(entry: usize, diagram: &Diagram<'_, P>) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (arrow, a) in diagram.arrows.iter().enumerate() {
        if a.start == a.end {
            errors.push(ValidationError::DegenerateArrow { entry, arrow });
        }
        let inside = |p: crate::layout::Point| p.x <= diagram.width && p.y <= diagram.height;
        if !inside(a.start) || !inside(a.end) {
            errors.push(ValidationError::ArrowOutsideCanvas {
                entry,
                arrow,
                width: diagram.width,
                height: diagram.height,
            });
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client_log::ClientLogEntry;
    use crate::testing;

    #[test]
    fn sample_trace_is_valid() {
        let trace = ClientTrace {
            initial_state: testing::synchronized(0),
            log: testing::sample_log(),
        };
        assert_eq!(validate_trace(&trace), Ok(()));
    }

    #[test]
    fn buffered_conflict_is_valid() {
        let mut trace = ClientTrace::new(testing::synchronized(0));
        trace.append(
            testing::buffered_conflict_entry("R", "W", "B"),
            testing::awaiting("W"),
        );
        assert!(validate_trace(&trace).is_ok());
    }

    #[test]
    fn untransformed_received_operation_is_reported() {
        let mut trace = ClientTrace::new(testing::synchronized(0));
        trace.append(
            ClientLogEntry::ReceivedServerOperationWhileAwaitingOperation {
                received_operation: testing::op("X", "server", &[]),
                // Forgot to transform: same depth as the original.
                transformed_received_operation: testing::op("X", "server", &[]),
                awaited_operation: testing::op("Y", "me", &[]),
                transformed_awaited_operation: testing::op("Y", "me", &["X"]),
            },
            testing::awaiting("Y"),
        );

        let errors = validate_trace(&trace).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::BrokenTransform {
                entry: 1,
                from: 2,
                to: 3,
                relation: Relation::SameDepth,
            }]
        );
        assert!(errors[0].to_string().contains("log entry 1"));
    }

    #[test]
    fn swapped_operations_are_reported_as_unrelated() {
        let mut trace = ClientTrace::new(testing::synchronized(0));
        trace.append(
            ClientLogEntry::ReceivedServerOperationWhileAwaitingOperation {
                received_operation: testing::op("X", "server", &[]),
                transformed_received_operation: testing::op("Y", "me", &["X"]),
                awaited_operation: testing::op("Y", "me", &[]),
                transformed_awaited_operation: testing::op("X", "server", &["Y"]),
            },
            testing::awaiting("Y"),
        );
        let errors = validate_trace(&trace).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| matches!(
            e,
            ValidationError::BrokenTransform {
                relation: Relation::Unrelated,
                ..
            }
        )));
    }
}
