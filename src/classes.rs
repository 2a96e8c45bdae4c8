//! Class list and inline style diffing.
//!
//! Both are normalized first, so switching between the [`ClassValue`] forms doesn't touch classes that stay applied.

use crate::{
	renderer::Renderer,
	view::{ClassValue, StyleMap},
};
use indexmap::{IndexMap, IndexSet};
use tracing::{instrument, trace};

/// Applied class names in first-seen order.
pub type ClassSet = IndexSet<String>;

/// Applied style declarations with unit suffixes resolved, i.e. `width` -> `100px`.
pub type StyleDeclarations = IndexMap<String, String>;

#[must_use]
pub fn normalize_class(class_name: Option<&ClassValue>) -> ClassSet {
	let mut classes = ClassSet::new();
	match class_name {
		None => (),
		Some(ClassValue::Single(names)) => classes.extend(names.split_whitespace().map(str::to_owned)),
		Some(ClassValue::List(list)) => {
			for names in list {
				classes.extend(names.split_whitespace().map(str::to_owned))
			}
		}
		Some(ClassValue::Map(map)) => {
			for (names, &enabled) in map {
				if enabled {
					classes.extend(names.split_whitespace().map(str::to_owned))
				}
			}
		}
	}
	classes
}

#[must_use]
pub fn normalize_style(style: Option<&StyleMap>) -> StyleDeclarations {
	let mut declarations = StyleDeclarations::new();
	for (name, value) in style.into_iter().flatten() {
		match name.split_once('.') {
			Some((name, unit)) => declarations.insert(name.to_owned(), format!("{}{}", value, unit)),
			None => declarations.insert(name.clone(), value.clone()),
		};
	}
	declarations
}

#[instrument(skip(renderer, node, previous, next))]
pub(crate) fn apply_classes<R: Renderer>(renderer: &R, node: &R::Node, previous: &ClassSet, next: &ClassSet) {
	let mut operations = 0_usize;
	for removed in previous.difference(next) {
		renderer.remove_class(node, removed);
		operations += 1;
	}
	for added in next.difference(previous) {
		renderer.add_class(node, added);
		operations += 1;
	}
	trace!(operations, "Applied classes.");
}

#[instrument(skip(renderer, node, previous, next))]
pub(crate) fn apply_style<R: Renderer>(renderer: &R, node: &R::Node, previous: &StyleDeclarations, next: &StyleDeclarations) {
	let mut operations = 0_usize;
	for name in previous.keys() {
		if !next.contains_key(name) {
			renderer.remove_style(node, name);
			operations += 1;
		}
	}
	for (name, value) in next {
		if previous.get(name) != Some(value) {
			renderer.set_style(node, name, value);
			operations += 1;
		}
	}
	trace!(operations, "Applied style.");
}
