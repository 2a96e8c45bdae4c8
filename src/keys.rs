//! Sibling identity.
//!
//! Every child in a children list gets a key that is matched against the previous render's keys for the same parent.
//! Explicit [`Key`](crate::view::Key)s are used verbatim. Everything else is keyed by position among siblings of the same
//! type: the second `<span>` in a list is `span_1` no matter how many text nodes surround it.
//!
//! Keys are a pure function of the current children list. Nothing is carried over between renders.

use crate::{
	error::ReconcileError,
	view::{TypeTag, ViewNode},
};
use core::any::TypeId;
use hashbrown::{hash_map::Entry, HashMap};
use tracing::{instrument, trace};

/// Stable synthetic names for non-primitive type tags.
///
/// Owned by a [`Reconciler`](crate::registry::Reconciler), so names are stable for its lifetime
/// without leaking between independent roots.
#[derive(Debug, Default)]
pub struct TypeNames {
	names: HashMap<TypeId, String>,
}

impl TypeNames {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// The key prefix for `type_tag`. Native tags are their own name.
	pub fn name_of(&mut self, type_tag: &TypeTag) -> String {
		match type_tag {
			TypeTag::Native(name) => name.to_string(),
			TypeTag::Component(component) => {
				let next = self.names.len();
				self.names
					.entry(component.id())
					.or_insert_with(|| {
						trace!(component = component.name(), next, "Naming component type.");
						format!("$component{}", next)
					})
					.clone()
			}
		}
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.names.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}
}

/// A children list with its generated keys.
#[derive(Debug)]
pub struct KeyedChildren<'a> {
	/// One key per child, in order.
	pub keys: Vec<String>,
	/// Each key's node and its index in the children list.
	pub map: HashMap<String, (&'a ViewNode, usize)>,
}

impl<'a> KeyedChildren<'a> {
	#[must_use]
	pub fn get(&self, key: &str) -> Option<(&'a ViewNode, usize)> {
		self.map.get(key).copied()
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.keys.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.keys.is_empty()
	}
}

/// Assigns a key to every child.
///
/// # Errors
///
/// [`ReconcileError::DuplicateKey`] if two siblings end up with the same key, which can only happen through explicit keys.
#[instrument(skip(children, type_names), fields(children.len = children.len()))]
pub fn generate_keys<'a>(children: &'a [ViewNode], type_names: &mut TypeNames) -> Result<KeyedChildren<'a>, ReconcileError> {
	let mut counters = HashMap::<String, usize>::new();
	let mut keys = Vec::with_capacity(children.len());
	let mut map = HashMap::with_capacity(children.len());

	for (index, child) in children.iter().enumerate() {
		let key = match child.key() {
			Some(explicit) => explicit.to_string(),
			None => {
				let type_name = type_names.name_of(&child.type_tag());
				let occurrence = counters.entry(type_name.clone()).or_insert(0);
				let key = format!("{}_{}", type_name, occurrence);
				*occurrence += 1;
				key
			}
		};

		match map.entry(key) {
			Entry::Occupied(occupied) => {
				return Err(ReconcileError::DuplicateKey {
					key: occupied.key().clone(),
				})
			}
			Entry::Vacant(vacant) => {
				keys.push(vacant.key().clone());
				vacant.insert((child, index));
			}
		}
	}

	Ok(KeyedChildren { keys, map })
}
