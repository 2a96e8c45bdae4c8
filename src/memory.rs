//! An in-memory host tree.
//!
//! [`MemoryRenderer`] behaves like a minimal DOM: nodes live in an arena, have at most one parent,
//! and can be serialized to HTML. Released nodes free their slot for reuse, and a [`MemoryNode`] handle
//! to a released node never aliases its successor.
//!
//! A [recording](`MemoryRenderer::recording`) renderer also logs every mutation,
//! which makes it easy to check how much work an update caused.

use crate::{
	error::HostError,
	renderer::Renderer,
	view::{Handler, PropValue},
};
use core::{
	any::Any,
	cell::RefCell,
	fmt::{self, Debug, Formatter, Write as _},
	mem,
};
use indexmap::{IndexMap, IndexSet};
use tracing::{error, trace, warn};

/// Handle to a node in a [`MemoryRenderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemoryNode {
	index: usize,
	generation: u32,
}

#[derive(Debug)]
pub struct MemoryListener {
	id: usize,
	event: String,
}

/// A recorded host operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
	CreateElement { node: MemoryNode, tag: String },
	CreateText { node: MemoryNode, content: String },
	SetText { node: MemoryNode, content: String },
	AppendChild { parent: MemoryNode, child: MemoryNode },
	InsertBefore { parent: MemoryNode, child: MemoryNode, reference: MemoryNode },
	RemoveChild { parent: MemoryNode, child: MemoryNode },
	SetProperty { node: MemoryNode, name: String, value: String },
	AddClass { node: MemoryNode, name: String },
	RemoveClass { node: MemoryNode, name: String },
	SetStyle { node: MemoryNode, name: String, value: String },
	RemoveStyle { node: MemoryNode, name: String },
	Listen { node: MemoryNode, event: String },
	Unlisten { node: MemoryNode, event: String },
	Release { node: MemoryNode },
}

enum Content {
	Text(String),
	Element {
		tag: String,
		props: IndexMap<String, String>,
		classes: IndexSet<String>,
		style: IndexMap<String, String>,
		listeners: Vec<(usize, String, Handler)>,
		children: Vec<MemoryNode>,
	},
}

struct Slot {
	/// Bumped on release, which invalidates every outstanding handle.
	generation: u32,
	parent: Option<MemoryNode>,
	content: Content,
}

#[derive(Default)]
struct Arena {
	slots: Vec<Slot>,
	free: Vec<usize>,
	mutations: Option<Vec<Mutation>>,
	next_listener: usize,
}

impl Arena {
	fn slot(&self, node: MemoryNode) -> Option<&Slot> {
		self.slots.get(node.index).filter(|slot| slot.generation == node.generation)
	}

	fn slot_mut(&mut self, node: MemoryNode) -> Option<&mut Slot> {
		self.slots.get_mut(node.index).filter(|slot| slot.generation == node.generation)
	}

	fn content(&self, node: MemoryNode) -> Option<&Content> {
		self.slot(node).map(|slot| &slot.content)
	}

	fn content_mut(&mut self, node: MemoryNode) -> Option<&mut Content> {
		self.slot_mut(node).map(|slot| &mut slot.content)
	}

	fn detach(&mut self, child: MemoryNode) {
		if let Some(parent) = self.slot_mut(child).and_then(|slot| slot.parent.take()) {
			if let Some(Content::Element { children, .. }) = self.content_mut(parent) {
				children.retain(|&c| c != child);
			}
		}
	}
}

const VOID_ELEMENTS: &[&str] = &["area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr"];

#[derive(Default)]
pub struct MemoryRenderer {
	arena: RefCell<Arena>,
}

impl Debug for MemoryRenderer {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		let arena = self.arena.borrow();
		f.debug_struct("MemoryRenderer")
			.field("nodes", &(arena.slots.len() - arena.free.len()))
			.field("slots", &arena.slots.len())
			.field("mutations", &arena.mutations.as_ref().map(Vec::len))
			.finish()
	}
}

impl MemoryRenderer {
	/// A renderer that doesn't log mutations.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// A renderer that logs every mutation until it's [taken](`MemoryRenderer::take_mutations`).
	#[must_use]
	pub fn recording() -> Self {
		let renderer = Self::new();
		renderer.arena.borrow_mut().mutations = Some(Vec::new());
		renderer
	}

	/// Creates a detached element without recording it, e.g. as a container for a [`Root`](crate::root::Root).
	#[must_use]
	pub fn container(&self, tag: &str) -> MemoryNode {
		self.push(Content::Element {
			tag: tag.to_owned(),
			props: IndexMap::new(),
			classes: IndexSet::new(),
			style: IndexMap::new(),
			listeners: Vec::new(),
			children: Vec::new(),
		})
	}

	/// Removes and returns all mutations recorded so far. Always empty unless [recording](`MemoryRenderer::recording`).
	pub fn take_mutations(&self) -> Vec<Mutation> {
		self.arena.borrow_mut().mutations.as_mut().map(mem::take).unwrap_or_default()
	}

	#[must_use]
	pub fn mutation_count(&self) -> usize {
		self.arena.borrow().mutations.as_ref().map_or(0, Vec::len)
	}

	/// Number of live (unreleased) nodes, containers included.
	#[must_use]
	pub fn node_count(&self) -> usize {
		let arena = self.arena.borrow();
		arena.slots.len() - arena.free.len()
	}

	/// Number of allocated slots, live or free.
	#[must_use]
	pub fn slot_count(&self) -> usize {
		self.arena.borrow().slots.len()
	}

	/// Whether `node` hasn't been released.
	#[must_use]
	pub fn is_live(&self, node: MemoryNode) -> bool {
		self.arena.borrow().slot(node).is_some()
	}

	#[must_use]
	pub fn parent(&self, node: MemoryNode) -> Option<MemoryNode> {
		self.arena.borrow().slot(node).and_then(|slot| slot.parent)
	}

	#[must_use]
	pub fn children(&self, node: MemoryNode) -> Vec<MemoryNode> {
		match self.arena.borrow().content(node) {
			Some(Content::Element { children, .. }) => children.clone(),
			Some(Content::Text(_)) | None => Vec::new(),
		}
	}

	#[must_use]
	pub fn text(&self, node: MemoryNode) -> Option<String> {
		match self.arena.borrow().content(node) {
			Some(Content::Text(text)) => Some(text.clone()),
			Some(Content::Element { .. }) | None => None,
		}
	}

	/// The property's current value as it would be serialized.
	#[must_use]
	pub fn property(&self, node: MemoryNode, name: &str) -> Option<String> {
		match self.arena.borrow().content(node) {
			Some(Content::Element { props, .. }) => props.get(name).cloned(),
			Some(Content::Text(_)) | None => None,
		}
	}

	#[must_use]
	pub fn listener_count(&self, node: MemoryNode) -> usize {
		match self.arena.borrow().content(node) {
			Some(Content::Element { listeners, .. }) => listeners.len(),
			Some(Content::Text(_)) | None => 0,
		}
	}

	/// Calls every listener for `event` on `node` (no bubbling) and returns how many there were.
	pub fn dispatch(&self, node: MemoryNode, event: &str, payload: &dyn Any) -> usize {
		let handlers = match self.arena.borrow().content(node) {
			Some(Content::Element { listeners, .. }) => listeners
				.iter()
				.filter(|(_, name, _)| name == event)
				.map(|(_, _, handler)| handler.clone())
				.collect::<Vec<_>>(),
			Some(Content::Text(_)) | None => Vec::new(),
		};
		trace!(?node, event, handlers = handlers.len(), "Dispatching.");
		for handler in &handlers {
			handler.call(payload);
		}
		handlers.len()
	}

	/// Serializes `node` and its descendants.
	#[must_use]
	pub fn to_html(&self, node: MemoryNode) -> String {
		let mut html = String::new();
		write_html(&self.arena.borrow(), node, &mut html);
		html
	}

	/// Serializes the children of `node`.
	#[must_use]
	pub fn inner_html(&self, node: MemoryNode) -> String {
		let arena = self.arena.borrow();
		let mut html = String::new();
		if let Some(Content::Element { children, .. }) = arena.content(node) {
			for &child in children {
				write_html(&arena, child, &mut html);
			}
		}
		html
	}

	fn push(&self, content: Content) -> MemoryNode {
		let mut arena = self.arena.borrow_mut();
		match arena.free.pop() {
			Some(index) => {
				let slot = &mut arena.slots[index];
				slot.parent = None;
				slot.content = content;
				MemoryNode {
					index,
					generation: slot.generation,
				}
			}
			None => {
				arena.slots.push(Slot {
					generation: 0,
					parent: None,
					content,
				});
				MemoryNode {
					index: arena.slots.len() - 1,
					generation: 0,
				}
			}
		}
	}

	fn record(&self, mutation: Mutation) {
		if let Some(mutations) = &mut self.arena.borrow_mut().mutations {
			mutations.push(mutation)
		}
	}

	/// Runs `f` on the element data of `node`, or logs and does nothing for text nodes.
	fn with_element<T>(&self, node: MemoryNode, operation: &str, f: impl FnOnce(&mut ElementData<'_>) -> T) -> Option<T> {
		let mut arena = self.arena.borrow_mut();
		match arena.content_mut(node) {
			Some(Content::Element {
				props,
				classes,
				style,
				listeners,
				..
			}) => Some(f(&mut ElementData {
				props,
				classes,
				style,
				listeners,
			})),
			Some(Content::Text(_)) => {
				error!(?node, operation, "Not an element.");
				None
			}
			None => {
				error!(?node, operation, "Node was released.");
				None
			}
		}
	}
}

struct ElementData<'a> {
	props: &'a mut IndexMap<String, String>,
	classes: &'a mut IndexSet<String>,
	style: &'a mut IndexMap<String, String>,
	listeners: &'a mut Vec<(usize, String, Handler)>,
}

impl Renderer for MemoryRenderer {
	type Node = MemoryNode;
	type Listener = MemoryListener;

	fn create_element(&self, tag: &str) -> Result<MemoryNode, HostError> {
		if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
			return Err(HostError::new("create element", format!("invalid tag name {:?}", tag)));
		}
		let node = self.container(tag);
		self.record(Mutation::CreateElement { node, tag: tag.to_owned() });
		Ok(node)
	}

	fn create_text(&self, content: &str) -> MemoryNode {
		let node = self.push(Content::Text(content.to_owned()));
		self.record(Mutation::CreateText {
			node,
			content: content.to_owned(),
		});
		node
	}

	fn set_text(&self, node: &MemoryNode, content: &str) {
		let node = *node;
		match self.arena.borrow_mut().content_mut(node) {
			Some(Content::Text(text)) => *text = content.to_owned(),
			Some(Content::Element { .. }) => return error!(?node, "Can't set text content of an element."),
			None => return error!(?node, "Can't set text content of a released node."),
		}
		self.record(Mutation::SetText {
			node,
			content: content.to_owned(),
		})
	}

	fn append_child(&self, parent: &MemoryNode, child: &MemoryNode) {
		let (parent, child) = (*parent, *child);
		{
			let mut arena = self.arena.borrow_mut();
			if arena.slot(child).is_none() {
				return error!(?child, "Can't append a released node.");
			}
			arena.detach(child);
			match arena.content_mut(parent) {
				Some(Content::Element { children, .. }) => children.push(child),
				Some(Content::Text(_)) => return error!(?parent, "Can't append to a text node."),
				None => return error!(?parent, "Can't append to a released node."),
			}
			if let Some(slot) = arena.slot_mut(child) {
				slot.parent = Some(parent);
			}
		}
		self.record(Mutation::AppendChild { parent, child })
	}

	fn insert_before(&self, parent: &MemoryNode, child: &MemoryNode, reference: &MemoryNode) {
		let (parent, child, reference) = (*parent, *child, *reference);
		{
			let mut arena = self.arena.borrow_mut();
			if arena.slot(child).is_none() {
				return error!(?child, "Can't insert a released node.");
			}
			arena.detach(child);
			match arena.content_mut(parent) {
				Some(Content::Element { children, .. }) => match children.iter().position(|&c| c == reference) {
					Some(index) => children.insert(index, child),
					None => return error!(?parent, ?reference, "Reference node is not a child of the parent."),
				},
				Some(Content::Text(_)) => return error!(?parent, "Can't insert into a text node."),
				None => return error!(?parent, "Can't insert into a released node."),
			}
			if let Some(slot) = arena.slot_mut(child) {
				slot.parent = Some(parent);
			}
		}
		self.record(Mutation::InsertBefore { parent, child, reference })
	}

	fn remove_child(&self, parent: &MemoryNode, child: &MemoryNode) {
		let (parent, child) = (*parent, *child);
		{
			let mut arena = self.arena.borrow_mut();
			if arena.slot(child).and_then(|slot| slot.parent) != Some(parent) {
				return warn!(?parent, ?child, "Not a child of this parent. Ignoring removal.");
			}
			arena.detach(child);
		}
		self.record(Mutation::RemoveChild { parent, child })
	}

	fn set_property(&self, node: &MemoryNode, name: &str, value: &PropValue) {
		let value = value.to_string();
		if self
			.with_element(*node, "set property", |element| {
				element.props.insert(name.to_owned(), value.clone());
			})
			.is_some()
		{
			self.record(Mutation::SetProperty {
				node: *node,
				name: name.to_owned(),
				value,
			})
		}
	}

	fn add_class(&self, node: &MemoryNode, name: &str) {
		if self.with_element(*node, "add class", |element| element.classes.insert(name.to_owned())).is_some() {
			self.record(Mutation::AddClass {
				node: *node,
				name: name.to_owned(),
			})
		}
	}

	fn remove_class(&self, node: &MemoryNode, name: &str) {
		if self.with_element(*node, "remove class", |element| element.classes.shift_remove(name)).is_some() {
			self.record(Mutation::RemoveClass {
				node: *node,
				name: name.to_owned(),
			})
		}
	}

	fn set_style(&self, node: &MemoryNode, name: &str, value: &str) {
		if self
			.with_element(*node, "set style", |element| element.style.insert(name.to_owned(), value.to_owned()))
			.is_some()
		{
			self.record(Mutation::SetStyle {
				node: *node,
				name: name.to_owned(),
				value: value.to_owned(),
			})
		}
	}

	fn remove_style(&self, node: &MemoryNode, name: &str) {
		if self.with_element(*node, "remove style", |element| element.style.shift_remove(name)).is_some() {
			self.record(Mutation::RemoveStyle {
				node: *node,
				name: name.to_owned(),
			})
		}
	}

	fn listen(&self, node: &MemoryNode, event: &str, handler: Handler) -> MemoryListener {
		let id = {
			let mut arena = self.arena.borrow_mut();
			arena.next_listener += 1;
			arena.next_listener
		};
		self.with_element(*node, "listen", |element| element.listeners.push((id, event.to_owned(), handler)));
		self.record(Mutation::Listen {
			node: *node,
			event: event.to_owned(),
		});
		MemoryListener { id, event: event.to_owned() }
	}

	fn unlisten(&self, node: &MemoryNode, listener: MemoryListener) {
		let removed = self
			.with_element(*node, "unlisten", |element| {
				let before = element.listeners.len();
				element.listeners.retain(|(id, _, _)| *id != listener.id);
				before != element.listeners.len()
			})
			.unwrap_or(false);
		if !removed {
			return warn!(?node, event = listener.event.as_str(), "Listener was not attached.");
		}
		self.record(Mutation::Unlisten {
			node: *node,
			event: listener.event,
		})
	}

	fn release(&self, node: MemoryNode) {
		{
			let mut arena = self.arena.borrow_mut();
			let parent = match arena.slot(node) {
				Some(slot) => slot.parent,
				None => return warn!(?node, "Already released."),
			};
			if parent.is_some() {
				warn!(?node, "Releasing a node that is still attached. Detaching it.");
				arena.detach(node);
			}

			let slot = &mut arena.slots[node.index];
			slot.generation = slot.generation.wrapping_add(1);
			let orphans = match mem::replace(&mut slot.content, Content::Text(String::new())) {
				Content::Element { children, .. } => children,
				Content::Text(_) => Vec::new(),
			};
			if !orphans.is_empty() {
				warn!(?node, orphans = orphans.len(), "Released an element that still had children.");
			}
			for orphan in orphans {
				if let Some(slot) = arena.slot_mut(orphan) {
					slot.parent = None;
				}
			}
			arena.free.push(node.index);
		}
		self.record(Mutation::Release { node })
	}
}

fn write_html(arena: &Arena, node: MemoryNode, html: &mut String) {
	match arena.content(node) {
		None => (),
		Some(Content::Text(text)) => escape(text, html),
		Some(Content::Element {
			tag,
			props,
			classes,
			style,
			children,
			..
		}) => {
			html.push('<');
			html.push_str(tag);
			for (name, value) in props {
				let _ = write!(html, " {}=\"", name.to_ascii_lowercase());
				escape(value, html);
				html.push('"');
			}
			if !classes.is_empty() {
				html.push_str(" class=\"");
				escape(&classes.iter().map(String::as_str).collect::<Vec<_>>().join(" "), html);
				html.push('"');
			}
			if !style.is_empty() {
				html.push_str(" style=\"");
				let declarations = style.iter().map(|(name, value)| format!("{}: {};", name, value)).collect::<Vec<_>>();
				escape(&declarations.join(" "), html);
				html.push('"');
			}
			html.push('>');
			if VOID_ELEMENTS.contains(&tag.as_str()) && children.is_empty() {
				return;
			}
			for &child in children {
				write_html(arena, child, html);
			}
			let _ = write!(html, "</{}>", tag);
		}
	}
}

fn escape(text: &str, html: &mut String) {
	for c in text.chars() {
		match c {
			'&' => html.push_str("&amp;"),
			'<' => html.push_str("&lt;"),
			'>' => html.push_str("&gt;"),
			'"' => html.push_str("&quot;"),
			c => html.push(c),
		}
	}
}
