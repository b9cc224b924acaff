use crate::operation::Operation;
use serde::{Deserialize, Serialize};

/// One transition of the OT client, carrying the operations involved in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum ClientLogEntry<P> {
    /// A user edit was merged into the existing buffer. The merged
    /// operation is not materialized yet, so nothing is carried.
    UserEditAddedToBuffer,
    UserEditImmediatelySentToServer {
        operation: Operation<P>,
    },
    UserEditStoredAsBuffer {
        operation: Operation<P>,
    },
    ReceivedOwnOperation {
        acknowledged_operation: Operation<P>,
    },
    ReceivedOwnOperationAndSentBuffer {
        acknowledged_operation: Operation<P>,
        sent_buffer: Operation<P>,
    },
    ReceivedServerOperationWhileSynchronized {
        received_operation: Operation<P>,
    },
    /// Conflict square: the received operation and the awaited operation
    /// are transformed against each other.
    ReceivedServerOperationWhileAwaitingOperation {
        received_operation: Operation<P>,
        transformed_received_operation: Operation<P>,
        awaited_operation: Operation<P>,
        transformed_awaited_operation: Operation<P>,
    },
    /// Two conflict squares side by side: the received operation is
    /// transformed against the awaited operation and then the buffer.
    ReceivedServerOperationWhileAwaitingOperationWithBuffer {
        received_operation: Operation<P>,
        once_transformed_received_operation: Operation<P>,
        twice_transformed_received_operation: Operation<P>,
        awaited_operation: Operation<P>,
        transformed_awaited_operation: Operation<P>,
        buffer_operation: Operation<P>,
        transformed_buffer_operation: Operation<P>,
    },
}

/// Discriminant of [`ClientLogEntry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientEntryType {
    UserEditAddedToBuffer,
    UserEditImmediatelySentToServer,
    UserEditStoredAsBuffer,
    ReceivedOwnOperation,
    ReceivedOwnOperationAndSentBuffer,
    ReceivedServerOperationWhileSynchronized,
    ReceivedServerOperationWhileAwaitingOperation,
    ReceivedServerOperationWhileAwaitingOperationWithBuffer,
}

impl ClientEntryType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserEditAddedToBuffer => "USER_EDIT_ADDED_TO_BUFFER",
            Self::UserEditImmediatelySentToServer => "USER_EDIT_IMMEDIATELY_SENT_TO_SERVER",
            Self::UserEditStoredAsBuffer => "USER_EDIT_STORED_AS_BUFFER",
            Self::ReceivedOwnOperation => "RECEIVED_OWN_OPERATION",
            Self::ReceivedOwnOperationAndSentBuffer => "RECEIVED_OWN_OPERATION_AND_SENT_BUFFER",
            Self::ReceivedServerOperationWhileSynchronized => {
                "RECEIVED_SERVER_OPERATION_WHILE_SYNCHRONIZED"
            }
            Self::ReceivedServerOperationWhileAwaitingOperation => {
                "RECEIVED_SERVER_OPERATION_WHILE_AWAITING_OPERATION"
            }
            Self::ReceivedServerOperationWhileAwaitingOperationWithBuffer => {
                "RECEIVED_SERVER_OPERATION_WHILE_AWAITING_OPERATION_WITH_BUFFER"
            }
        }
    }
}

impl<P> ClientLogEntry<P> {
    pub fn entry_type(&self) -> ClientEntryType {
        match self {
            Self::UserEditAddedToBuffer => ClientEntryType::UserEditAddedToBuffer,
            Self::UserEditImmediatelySentToServer { .. } => {
                ClientEntryType::UserEditImmediatelySentToServer
            }
            Self::UserEditStoredAsBuffer { .. } => ClientEntryType::UserEditStoredAsBuffer,
            Self::ReceivedOwnOperation { .. } => ClientEntryType::ReceivedOwnOperation,
            Self::ReceivedOwnOperationAndSentBuffer { .. } => {
                ClientEntryType::ReceivedOwnOperationAndSentBuffer
            }
            Self::ReceivedServerOperationWhileSynchronized { .. } => {
                ClientEntryType::ReceivedServerOperationWhileSynchronized
            }
            Self::ReceivedServerOperationWhileAwaitingOperation { .. } => {
                ClientEntryType::ReceivedServerOperationWhileAwaitingOperation
            }
            Self::ReceivedServerOperationWhileAwaitingOperationWithBuffer { .. } => {
                ClientEntryType::ReceivedServerOperationWhileAwaitingOperationWithBuffer
            }
        }
    }

    /// Every operation carried by the entry, in field order.
    pub fn operations(&self) -> Vec<&Operation<P>> {
        match self {
            Self::UserEditAddedToBuffer => vec![],
            Self::UserEditImmediatelySentToServer { operation }
            | Self::UserEditStoredAsBuffer { operation } => vec![operation],
            Self::ReceivedOwnOperation {
                acknowledged_operation,
            } => vec![acknowledged_operation],
            Self::ReceivedOwnOperationAndSentBuffer {
                acknowledged_operation,
                sent_buffer,
            } => vec![acknowledged_operation, sent_buffer],
            Self::ReceivedServerOperationWhileSynchronized { received_operation } => {
                vec![received_operation]
            }
            Self::ReceivedServerOperationWhileAwaitingOperation {
                received_operation,
                transformed_received_operation,
                awaited_operation,
                transformed_awaited_operation,
            } => vec![
                received_operation,
                transformed_received_operation,
                awaited_operation,
                transformed_awaited_operation,
            ],
            Self::ReceivedServerOperationWhileAwaitingOperationWithBuffer {
                received_operation,
                once_transformed_received_operation,
                twice_transformed_received_operation,
                awaited_operation,
                transformed_awaited_operation,
                buffer_operation,
                transformed_buffer_operation,
            } => vec![
                received_operation,
                once_transformed_received_operation,
                twice_transformed_received_operation,
                awaited_operation,
                transformed_awaited_operation,
                buffer_operation,
                transformed_buffer_operation,
            ],
        }
    }
}

/// The client's protocol state after processing a log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "status",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum SynchronizationState<P> {
    Synchronized {
        server_revision: u64,
    },
    AwaitingOperation {
        awaited_operation: Operation<P>,
    },
    AwaitingOperationWithBuffer {
        awaited_operation: Operation<P>,
        buffer: Operation<P>,
    },
}

impl<P> SynchronizationState<P> {
    pub fn operations(&self) -> Vec<&Operation<P>> {
        match self {
            Self::Synchronized { .. } => vec![],
            Self::AwaitingOperation { awaited_operation } => vec![awaited_operation],
            Self::AwaitingOperationWithBuffer {
                awaited_operation,
                buffer,
            } => vec![awaited_operation, buffer],
        }
    }

    pub fn status_str(&self) -> &'static str {
        match self {
            Self::Synchronized { .. } => "SYNCHRONIZED",
            Self::AwaitingOperation { .. } => "AWAITING_OPERATION",
            Self::AwaitingOperationWithBuffer { .. } => "AWAITING_OPERATION_WITH_BUFFER",
        }
    }
}

/// A log entry paired with the state that resulted from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientLogItem<P> {
    pub entry: ClientLogEntry<P>,
    pub new_state: SynchronizationState<P>,
}

/// Chronological (oldest-first) client log. Append-only.
pub type ClientLog<P> = Vec<ClientLogItem<P>>;
