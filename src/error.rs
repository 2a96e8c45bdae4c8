use crate::view::TypeTag;
use thiserror::Error;

/// Fatal failures while creating or updating a controller subtree.
///
/// Reconciliation is deterministic, so none of these are transient:
/// re-running the same update against the same state fails the same way.
#[derive(Debug, Error)]
pub enum ReconcileError {
	#[error("node type {0} not supported")]
	UnsupportedNodeType(TypeTag),

	#[error("duplicate key {key:?} among siblings")]
	DuplicateKey { key: String },

	#[error("malformed property {name:?}: {reason}")]
	MalformedProperty { name: String, reason: &'static str },

	#[error("a controller for {expected} can't be updated with a {found} node")]
	TypeMismatch { expected: TypeTag, found: TypeTag },

	#[error("depth limit of {limit} reached")]
	DepthLimitExceeded { limit: usize },

	#[error(transparent)]
	Host(#[from] HostError),
}

/// A host operation that had to produce a value failed.
#[derive(Debug, Error)]
#[error("host failed to {operation}: {message}")]
pub struct HostError {
	pub operation: &'static str,
	pub message: String,
}

impl HostError {
	pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
		Self {
			operation,
			message: message.into(),
		}
	}
}
