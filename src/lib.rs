#![doc(html_root_url = "https://docs.rs/trellis-dom/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Keyed reconciliation of declarative view trees onto a mutable host tree.
//!
//! A [`Reconciler`] creates [`Controller`]s, each of which owns one host node for its lifetime.
//! Feeding a new [`ViewNode`] into [`Controller::update`] applies the minimal set of property, class, style,
//! listener and child changes through a [`Renderer`]: the browser DOM ([`web::WebRenderer`])
//! or an in-memory tree ([`memory::MemoryRenderer`]).

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod children;
pub mod classes;
pub mod controller;
pub mod error;
pub mod keys;
pub mod load;
pub mod memory;
pub mod props;
pub mod registry;
pub mod renderer;
pub mod root;
pub mod view;
pub mod web;

pub use crate::{
	controller::{Controller, ElementController, TextController},
	error::{HostError, ReconcileError},
	registry::{Config, ControllerKind, Reconciler},
	renderer::Renderer,
	root::Root,
	view::{ClassValue, ComponentType, ElementNode, Handler, Key, PropValue, Props, StyleMap, TextNode, TypeTag, ViewNode},
};

/// Rendered content only reaches logs with the `dangerous-logging` feature.
pub(crate) fn redact(content: &str) -> &str {
	if cfg!(feature = "dangerous-logging") {
		content
	} else {
		"[redacted]"
	}
}
