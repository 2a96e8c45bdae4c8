//! Flat property diffing, including event listener (re)binding for event-prefixed names.

use crate::{
	error::ReconcileError,
	redact,
	renderer::Renderer,
	view::{Handler, PropValue, Props},
};
use hashbrown::{HashMap, HashSet};
use tracing::{instrument, trace, trace_span, warn};

/// Whether `name` is an event-prefixed property like `onClick`.
#[must_use]
pub fn is_event(name: &str) -> bool {
	let mut chars = name.chars();
	chars.next() == Some('o') && chars.next() == Some('n') && chars.next().map_or(false, |c| c.is_ascii_uppercase())
}

/// `onClick` -> `click`.
#[must_use]
pub fn event_name(name: &str) -> String {
	name.get(2..).unwrap_or_default().to_ascii_lowercase()
}

/// Differences between two property mappings, in the order they are applied.
#[derive(Debug, Default, PartialEq)]
pub struct PropsDiff<'a> {
	/// In the previous mapping only, in its order.
	pub removed: Vec<&'a str>,
	/// In the next mapping only, in its order.
	pub added: Vec<(&'a str, &'a PropValue)>,
	/// In both, with a different value.
	pub changed: Vec<(&'a str, &'a PropValue)>,
}

impl PropsDiff<'_> {
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.removed.is_empty() && self.added.is_empty() && self.changed.is_empty()
	}
}

/// Compares `previous` with `next`.
///
/// # Errors
///
/// [`ReconcileError::MalformedProperty`] if `next` has an event-prefixed property that isn't a [`Handler`],
/// a [`Handler`] under any other name, or two event-prefixed properties for the same event (`onClick` and `onCLICK`).
pub fn diff_props<'a>(previous: &'a Props, next: &'a Props) -> Result<PropsDiff<'a>, ReconcileError> {
	let mut events = HashSet::new();
	for (name, value) in next {
		match (is_event(name), value) {
			(true, PropValue::Handler(_)) => {
				if !events.insert(event_name(name)) {
					return Err(ReconcileError::MalformedProperty {
						name: name.clone(),
						reason: "event bound twice",
					});
				}
			}
			(false, PropValue::String(_) | PropValue::Number(_) | PropValue::Bool(_) | PropValue::Null) => (),
			(true, _) => {
				return Err(ReconcileError::MalformedProperty {
					name: name.clone(),
					reason: "event properties must be handlers",
				})
			}
			(false, PropValue::Handler(_)) => {
				return Err(ReconcileError::MalformedProperty {
					name: name.clone(),
					reason: "handlers are only accepted under event-prefixed names",
				})
			}
		}
	}

	let mut diff = PropsDiff::default();
	for name in previous.keys() {
		if !next.contains_key(name) {
			diff.removed.push(name.as_str());
		}
	}
	for (name, value) in next {
		match previous.get(name) {
			None => diff.added.push((name.as_str(), value)),
			Some(previous_value) if previous_value != value => diff.changed.push((name.as_str(), value)),
			Some(_) => (),
		}
	}
	Ok(diff)
}

/// Applies `diff` to `node`, keeping `listeners` (by event name) in step with attached handlers.
#[instrument(skip(renderer, node, listeners, diff), fields(removed = diff.removed.len(), added = diff.added.len(), changed = diff.changed.len()))]
pub(crate) fn apply_props<R: Renderer>(renderer: &R, node: &R::Node, listeners: &mut HashMap<String, R::Listener>, diff: &PropsDiff<'_>) {
	for &name in &diff.removed {
		let span = trace_span!("Removing property", name);
		let _enter = span.enter();
		if is_event(name) {
			let event = event_name(name);
			match listeners.remove(&event) {
				Some(listener) => renderer.unlisten(node, listener),
				None => warn!("No listener was attached for {:?}.", event),
			}
		} else {
			renderer.set_property(node, name, &PropValue::String(String::new()));
		}
	}

	for &(name, value) in &diff.added {
		let span = trace_span!("Adding property", name, value = %redacted(value));
		let _enter = span.enter();
		match value {
			PropValue::Handler(handler) => {
				let event = event_name(name);
				let listener = renderer.listen(node, &event, Handler::clone(handler));
				if let Some(stale) = listeners.insert(event, listener) {
					warn!("Replaced a listener that was still attached.");
					renderer.unlisten(node, stale)
				}
			}
			value => renderer.set_property(node, name, value),
		}
	}

	for &(name, value) in &diff.changed {
		let span = trace_span!("Changing property", name, value = %redacted(value));
		let _enter = span.enter();
		match value {
			PropValue::Handler(handler) => {
				let event = event_name(name);
				if let Some(previous) = listeners.remove(&event) {
					renderer.unlisten(node, previous);
				}
				let listener = renderer.listen(node, &event, Handler::clone(handler));
				listeners.insert(event, listener);
			}
			value => renderer.set_property(node, name, value),
		}
	}

	trace!(listeners = listeners.len(), "Applied properties.");
}

fn redacted(value: &PropValue) -> String {
	match value {
		PropValue::Handler(_) => "[handler]".to_owned(),
		value => redact(&value.to_string()).to_owned(),
	}
}
