//! View controllers: the persistent, host-node-owning side of reconciliation.
//!
//! A controller owns exactly one host node for as long as its type tag stays the same.
//! [`Controller::update`] patches that node (and, for elements, the child controllers it owns) towards a new descriptor.
//! [`Controller::destroy`] consumes the controller, so it can't run twice.

use crate::{
	children::{diff_keys, ChildChange},
	classes::{self, ClassSet, StyleDeclarations},
	error::ReconcileError,
	keys,
	props,
	redact,
	registry::Reconciler,
	renderer::Renderer,
	view::{Props, TypeTag, ViewNode},
};
use core::{
	fmt::{self, Debug, Formatter},
	mem,
};
use hashbrown::HashMap;
use tracing::{error, instrument, level_filters::STATIC_MAX_LEVEL, trace, trace_span, Level};

pub enum Controller<R: Renderer> {
	Text(TextController<R>),
	Element(ElementController<R>),
}

impl<R: Renderer> Controller<R> {
	#[must_use]
	pub fn node(&self) -> &R::Node {
		match self {
			Controller::Text(text) => text.node(),
			Controller::Element(element) => element.node(),
		}
	}

	#[must_use]
	pub fn type_tag(&self) -> TypeTag {
		match self {
			Controller::Text(_) => TypeTag::text(),
			Controller::Element(element) => element.type_tag.clone(),
		}
	}

	/// Whether `view` can be applied through [`Controller::update`], i.e. has the same type tag.
	#[must_use]
	pub fn accepts(&self, view: &ViewNode) -> bool {
		match (self, view) {
			(Controller::Text(_), ViewNode::Text(_)) => true,
			(Controller::Element(controller), ViewNode::Element(element)) => controller.type_tag == element.type_tag,
			_ => false,
		}
	}

	/// Patches the host subtree towards `view`.
	///
	/// Runs to completion synchronously. If it fails, the subtree reflects every node processed before the failure
	/// and remains consistent with this controller's bookkeeping.
	///
	/// # Errors
	///
	/// See [`ReconcileError`]. All variants are fatal for this subtree.
	pub fn update(&mut self, reconciler: &mut Reconciler<R>, view: &ViewNode) -> Result<(), ReconcileError> {
		let depth_limit = reconciler.config().depth_limit;
		self.update_within(reconciler, view, depth_limit)
	}

	pub(crate) fn update_within(&mut self, reconciler: &mut Reconciler<R>, view: &ViewNode, depth_limit: usize) -> Result<(), ReconcileError> {
		match self {
			Controller::Text(text) => text.update(reconciler.renderer(), view),
			Controller::Element(element) => element.update_within(reconciler, view, depth_limit),
		}
	}

	/// Releases all listeners and child controllers, then [releases](`Renderer::release`) the controller's own node.
	///
	/// The owner has to detach the node first.
	pub fn destroy(self, renderer: &R) {
		match self {
			Controller::Text(text) => text.destroy(renderer),
			Controller::Element(element) => element.destroy(renderer),
		}
	}

	#[must_use]
	pub fn as_element(&self) -> Option<&ElementController<R>> {
		match self {
			Controller::Element(element) => Some(element),
			Controller::Text(_) => None,
		}
	}
}

impl<R: Renderer> Debug for Controller<R> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Controller::Text(text) => text.fmt(f),
			Controller::Element(element) => element.fmt(f),
		}
	}
}

pub struct TextController<R: Renderer> {
	node: R::Node,
	content: Option<String>,
}

impl<R: Renderer> TextController<R> {
	pub fn new(renderer: &R) -> Self {
		Self {
			node: renderer.create_text(""),
			content: None,
		}
	}

	#[must_use]
	pub fn node(&self) -> &R::Node {
		&self.node
	}

	/// # Errors
	///
	/// [`ReconcileError::TypeMismatch`] iff `view` isn't a text node.
	pub fn update(&mut self, renderer: &R, view: &ViewNode) -> Result<(), ReconcileError> {
		let text = match view {
			ViewNode::Text(text) => text,
			ViewNode::Element(_) => {
				return Err(ReconcileError::TypeMismatch {
					expected: TypeTag::text(),
					found: view.type_tag(),
				})
			}
		};

		if self.content.as_deref() != Some(text.content.as_str()) {
			trace!(content = redact(&text.content), "Setting text.");
			renderer.set_text(&self.node, &text.content);
			self.content = Some(text.content.clone());
		}
		Ok(())
	}

	/// Text nodes hold no resources besides themselves.
	pub fn destroy(self, renderer: &R) {
		renderer.release(self.node)
	}
}

impl<R: Renderer> Debug for TextController<R> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("TextController")
			.field("node", &self.node)
			.field("content", &self.content.as_deref().map(redact))
			.finish()
	}
}

struct Child<R: Renderer> {
	key: String,
	controller: Controller<R>,
}

pub struct ElementController<R: Renderer> {
	type_tag: TypeTag,
	node: R::Node,
	children: Vec<Child<R>>,
	props: Props,
	listeners: HashMap<String, R::Listener>,
	classes: ClassSet,
	style: StyleDeclarations,
}

impl<R: Renderer> ElementController<R> {
	/// # Errors
	///
	/// [`ReconcileError::UnsupportedNodeType`] for component type tags,
	/// or [`ReconcileError::Host`] if the host refuses to create the element.
	pub fn new(renderer: &R, type_tag: TypeTag) -> Result<Self, ReconcileError> {
		let node = match type_tag.as_native() {
			Some(tag) => renderer.create_element(tag)?,
			None => return Err(ReconcileError::UnsupportedNodeType(type_tag)),
		};
		Ok(Self {
			type_tag,
			node,
			children: Vec::new(),
			props: Props::new(),
			listeners: HashMap::new(),
			classes: ClassSet::new(),
			style: StyleDeclarations::new(),
		})
	}

	#[must_use]
	pub fn node(&self) -> &R::Node {
		&self.node
	}

	#[must_use]
	pub fn type_tag(&self) -> &TypeTag {
		&self.type_tag
	}

	/// Current children with their keys, in order.
	pub fn children(&self) -> impl '_ + Iterator<Item = (&str, &Controller<R>)> {
		self.children.iter().map(|child| (child.key.as_str(), &child.controller))
	}

	#[must_use]
	pub fn child(&self, key: &str) -> Option<&Controller<R>> {
		self.children.iter().find(|child| child.key == key).map(|child| &child.controller)
	}

	/// The last applied properties.
	#[must_use]
	pub fn props(&self) -> &Props {
		&self.props
	}

	#[must_use]
	pub fn classes(&self) -> &ClassSet {
		&self.classes
	}

	#[must_use]
	pub fn style(&self) -> &StyleDeclarations {
		&self.style
	}

	/// Number of currently attached event listeners.
	#[must_use]
	pub fn listener_count(&self) -> usize {
		self.listeners.len()
	}

	#[instrument(skip(self, reconciler, view), fields(tag = %self.type_tag))]
	fn update_within(&mut self, reconciler: &mut Reconciler<R>, view: &ViewNode, depth_limit: usize) -> Result<(), ReconcileError> {
		if depth_limit == 0 {
			error!("Depth limit reached");
			return Err(ReconcileError::DepthLimitExceeded {
				limit: reconciler.config().depth_limit,
			});
		}

		let element = match view {
			ViewNode::Element(element) if element.type_tag == self.type_tag => element,
			_ => {
				return Err(ReconcileError::TypeMismatch {
					expected: self.type_tag.clone(),
					found: view.type_tag(),
				})
			}
		};

		{
			let diff = props::diff_props(&self.props, &element.props)?;
			if !diff.is_empty() {
				props::apply_props(reconciler.renderer(), &self.node, &mut self.listeners, &diff);
			}
		}
		self.props = element.props.clone();

		let classes = classes::normalize_class(element.class_name.as_ref());
		if classes != self.classes {
			classes::apply_classes(reconciler.renderer(), &self.node, &self.classes, &classes);
			self.classes = classes;
		}

		let style = classes::normalize_style(element.style.as_ref());
		if style != self.style {
			classes::apply_style(reconciler.renderer(), &self.node, &self.style, &style);
			self.style = style;
		}

		self.update_children(reconciler, element.children.as_deref().unwrap_or_default(), depth_limit - 1)
	}

	#[allow(clippy::too_many_lines)]
	fn update_children(&mut self, reconciler: &mut Reconciler<R>, children: &[ViewNode], depth_limit: usize) -> Result<(), ReconcileError> {
		let keyed = keys::generate_keys(children, reconciler.type_names_mut())?;

		let in_place = self.children.len() == keyed.keys.len()
			&& self
				.children
				.iter()
				.zip(&keyed.keys)
				.zip(children)
				.all(|((child, key), view)| child.key == *key && child.controller.accepts(view));
		if in_place {
			trace!(count = children.len(), "Children are in place.");
			for (child, view) in self.children.iter_mut().zip(children) {
				child.controller.update_within(reconciler, view, depth_limit)?;
			}
			return Ok(());
		}

		let mut diff = {
			let previous_keys = self.children.iter().map(|child| child.key.as_str()).collect::<Vec<_>>();
			let next_keys = keyed.keys.iter().map(String::as_str).collect::<Vec<_>>();
			diff_keys(&previous_keys, &next_keys)
		};

		// A reused key must also keep its type, or the old controller can't take the new node.
		for (from, child) in self.children.iter().enumerate() {
			if let Some((view, index)) = keyed.get(&child.key) {
				if !child.controller.accepts(view) {
					trace!(key = child.key.as_str(), "Type changed under the same key. Replacing.");
					diff.changes[index] = ChildChange::New;
					diff.removed.push(from);
				}
			}
		}
		diff.removed.sort_unstable();

		// Controller creation is the only fallible step here, so it runs before anything is detached.
		let mut created: Vec<Option<Controller<R>>> = Vec::with_capacity(children.len());
		for (change, view) in diff.changes.iter().zip(children) {
			let controller = match change {
				ChildChange::New => match reconciler.create(&view.type_tag()) {
					Ok(controller) => Some(controller),
					Err(error) => {
						for controller in created.into_iter().flatten() {
							Controller::destroy(controller, reconciler.renderer());
						}
						return Err(error);
					}
				},
				ChildChange::Unchanged { .. } | ChildChange::Moved { .. } => None,
			};
			created.push(controller);
		}

		{
			let renderer = reconciler.renderer();
			let mut previous = mem::take(&mut self.children).into_iter().map(Some).collect::<Vec<_>>();

			for &from in &diff.removed {
				if let Some(Child { key, controller }) = previous[from].take() {
					let span = trace_span!("Removing child", key = key.as_str());
					let _enter = span.enter();
					renderer.remove_child(&self.node, controller.node());
					controller.destroy(renderer);
				}
			}

			for change in &diff.changes {
				if let ChildChange::Moved { from } = *change {
					if let Some(child) = &previous[from] {
						trace!(key = child.key.as_str(), "Detaching moved child.");
						renderer.remove_child(&self.node, child.controller.node());
					}
				}
			}

			let mut current = Vec::with_capacity(children.len());
			for ((key, change), created) in keyed.keys.into_iter().zip(&diff.changes).zip(created) {
				let controller = change
					.source()
					.and_then(|from| previous[from].take())
					.map(|child| child.controller)
					.or(created)
					.expect("Every position has either a reused or a newly created controller.");
				current.push(Child { key, controller });
			}
			debug_assert!(previous.iter().all(Option::is_none), "Children left over after reconciliation.");

			// Back to front, so the reference node is always in its final position already.
			let queue = diff.insertions().collect::<Vec<_>>();
			for &index in queue.iter().rev() {
				let node = current[index].controller.node();
				match current.get(index + 1) {
					None => renderer.append_child(&self.node, node),
					Some(next) => renderer.insert_before(&self.node, node, next.controller.node()),
				}
			}

			if STATIC_MAX_LEVEL >= Level::TRACE {
				trace!(
					removed = diff.removed.len(),
					inserted = queue.len(),
					kept = current.len() - queue.len(),
					"Reordered children."
				);
			}
			self.children = current;
		}

		for (child, view) in self.children.iter_mut().zip(children) {
			child.controller.update_within(reconciler, view, depth_limit)?;
		}
		Ok(())
	}

	/// Detaches all listeners, then detaches and destroys every child, depth-first, and finally releases the node.
	pub fn destroy(mut self, renderer: &R) {
		let span = trace_span!("Destroying element", tag = %self.type_tag);
		let _enter = span.enter();

		for (_, listener) in self.listeners.drain() {
			renderer.unlisten(&self.node, listener);
		}

		for Child { key: _, controller } in self.children.drain(..) {
			renderer.remove_child(&self.node, controller.node());
			controller.destroy(renderer);
		}

		renderer.release(self.node)
	}
}

impl<R: Renderer> Debug for ElementController<R> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("ElementController")
			.field("type_tag", &self.type_tag)
			.field("node", &self.node)
			.field("props", &self.props.keys().collect::<Vec<_>>())
			.field("listeners", &self.listeners.keys().collect::<Vec<_>>())
			.field("classes", &self.classes)
			.field("style", &self.style)
			.field("children", &self.children.iter().map(|child| (&child.key, &child.controller)).collect::<Vec<_>>())
			.finish()
	}
}
