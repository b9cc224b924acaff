pub mod client_log;
pub mod jsonl;
pub mod layout;
pub mod operation;
pub mod relation;
pub mod sequence;
pub mod validate;

pub use client_log::*;
pub use operation::*;
pub use relation::{relate, Relation};
pub use sequence::{fold_trace, ClientTrace, RowKey, TraceRow};

#[cfg(any(test, feature = "testing"))]
pub mod testing;
