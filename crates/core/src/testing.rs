use crate::client_log::{ClientLogEntry, ClientLogItem, SynchronizationState};
use crate::operation::Operation;

/// Operation with a text payload and the given transformation chain.
pub fn op(id: &str, author: &str, chain: &[&str]) -> Operation<String> {
    let mut op = Operation::new(id, author, format!("edit {id}"));
    op.transformed_against = chain.iter().map(|s| s.to_string()).collect();
    op
}

/// Conflict square: server operation `received` against own operation
/// `awaited`, both at depth 0 before the transform.
pub fn conflict_entry(received: &str, awaited: &str) -> ClientLogEntry<String> {
    ClientLogEntry::ReceivedServerOperationWhileAwaitingOperation {
        received_operation: op(received, "server", &[]),
        transformed_received_operation: op(received, "server", &[awaited]),
        awaited_operation: op(awaited, "me", &[]),
        transformed_awaited_operation: op(awaited, "me", &[received]),
    }
}

/// Two conflict squares: `received` transformed against `awaited`, then
/// against `buffer`.
pub fn buffered_conflict_entry(
    received: &str,
    awaited: &str,
    buffer: &str,
) -> ClientLogEntry<String> {
    ClientLogEntry::ReceivedServerOperationWhileAwaitingOperationWithBuffer {
        received_operation: op(received, "server", &[]),
        once_transformed_received_operation: op(received, "server", &[awaited]),
        twice_transformed_received_operation: op(received, "server", &[awaited, buffer]),
        awaited_operation: op(awaited, "me", &[]),
        transformed_awaited_operation: op(awaited, "me", &[received]),
        buffer_operation: op(buffer, "me", &[]),
        transformed_buffer_operation: op(buffer, "me", &[received]),
    }
}

pub fn synchronized(server_revision: u64) -> SynchronizationState<String> {
    SynchronizationState::Synchronized { server_revision }
}

pub fn awaiting(id: &str) -> SynchronizationState<String> {
    SynchronizationState::AwaitingOperation {
        awaited_operation: op(id, "me", &[]),
    }
}

pub fn item(
    entry: ClientLogEntry<String>,
    new_state: SynchronizationState<String>,
) -> ClientLogItem<String> {
    ClientLogItem { entry, new_state }
}

/// Short realistic session: send, conflict, acknowledge.
pub fn sample_log() -> Vec<ClientLogItem<String>> {
    vec![
        item(
            ClientLogEntry::UserEditImmediatelySentToServer {
                operation: op("Y", "me", &[]),
            },
            awaiting("Y"),
        ),
        item(
            conflict_entry("X", "Y"),
            SynchronizationState::AwaitingOperation {
                awaited_operation: op("Y", "me", &["X"]),
            },
        ),
        item(
            ClientLogEntry::ReceivedOwnOperation {
                acknowledged_operation: op("Y", "me", &["X"]),
            },
            synchronized(2),
        ),
    ]
}
