use serde::{Deserialize, Serialize};

/// Identity shared by every transformed descendant of one original edit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationMeta {
    /// Opaque edit identifier. Equal ids mean "same logical edit".
    pub id: String,
    /// Client that authored the edit. Only used for coloring.
    pub author: String,
}

/// A single edit at some transformation depth, carrying an
/// application-defined payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation<P> {
    pub meta: OperationMeta,
    /// Ids of the operations this version was transformed against, in order.
    #[serde(default)]
    pub transformed_against: Vec<String>,
    /// Server revision, once the server has assigned one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<u64>,
    pub base: P,
}

impl<P> Operation<P> {
    pub fn new(id: impl Into<String>, author: impl Into<String>, base: P) -> Self {
        Self {
            meta: OperationMeta {
                id: id.into(),
                author: author.into(),
            },
            transformed_against: Vec::new(),
            revision: None,
            base,
        }
    }

    /// Strip the payload, keeping only what relationship queries need.
    pub fn identity(&self) -> OperationIdentity {
        OperationIdentity {
            meta: self.meta.clone(),
            transformed_against: self.transformed_against.clone(),
        }
    }
}

/// An [`Operation`] without its payload.
///
/// This is what the hover coordinator carries and what the relationship
/// resolver compares; payload shape never influences either.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationIdentity {
    pub meta: OperationMeta,
    #[serde(default)]
    pub transformed_against: Vec<String>,
}

impl OperationIdentity {
    pub fn new(id: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            meta: OperationMeta {
                id: id.into(),
                author: author.into(),
            },
            transformed_against: Vec::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.transformed_against.len()
    }

    /// Short human tag, e.g. `alice:op-3@2`.
    pub fn tag(&self) -> String {
        format!("{}:{}@{}", self.meta.author, self.meta.id, self.depth())
    }
}

impl<P> From<&Operation<P>> for OperationIdentity {
    fn from(operation: &Operation<P>) -> Self {
        operation.identity()
    }
}

/// Anything the relationship resolver can compare.
pub trait HasIdentity {
    fn meta(&self) -> &OperationMeta;
    fn transformed_against(&self) -> &[String];
}

impl<P> HasIdentity for Operation<P> {
    fn meta(&self) -> &OperationMeta {
        &self.meta
    }

    fn transformed_against(&self) -> &[String] {
        &self.transformed_against
    }
}

impl HasIdentity for OperationIdentity {
    fn meta(&self) -> &OperationMeta {
        &self.meta
    }

    fn transformed_against(&self) -> &[String] {
        &self.transformed_against
    }
}
