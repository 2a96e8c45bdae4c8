use crate::{
	error::HostError,
	view::{Handler, PropValue},
};
use core::fmt::Debug;

/// The host tree primitives controllers are built on.
///
/// Controllers only ever touch host nodes through this trait.
/// Apart from node creation, implementations report host-side failures by logging them rather than returning them.
pub trait Renderer {
	/// A handle to one host node. Cloning it must not clone the node.
	type Node: Clone + Debug;

	/// Detach handle for an attached event listener.
	type Listener;

	/// # Errors
	///
	/// Iff the host refuses the tag name.
	fn create_element(&self, tag: &str) -> Result<Self::Node, HostError>;

	fn create_text(&self, content: &str) -> Self::Node;

	fn set_text(&self, node: &Self::Node, content: &str);

	fn append_child(&self, parent: &Self::Node, child: &Self::Node);

	/// Inserts `child` into `parent` immediately before `reference`, which must be a child of `parent`.
	fn insert_before(&self, parent: &Self::Node, child: &Self::Node, reference: &Self::Node);

	fn remove_child(&self, parent: &Self::Node, child: &Self::Node);

	/// `value` is never [`PropValue::Handler`]. Those are routed to [`Renderer::listen`] instead.
	fn set_property(&self, node: &Self::Node, name: &str, value: &PropValue);

	fn add_class(&self, node: &Self::Node, name: &str);

	fn remove_class(&self, node: &Self::Node, name: &str);

	fn set_style(&self, node: &Self::Node, name: &str, value: &str);

	/// Clears an inline style declaration. Omitting it from later updates is not enough, since host styles persist.
	fn remove_style(&self, node: &Self::Node, name: &str);

	/// Attaches `handler` for events called `event` (already lower-case, without prefix).
	fn listen(&self, node: &Self::Node, event: &str, handler: Handler) -> Self::Listener;

	fn unlisten(&self, node: &Self::Node, listener: Self::Listener);

	/// Hands back a node that was detached and whose listeners and children are gone.
	///
	/// Called once per node, last, when its controller is destroyed. Hosts with their own garbage collection can ignore it.
	fn release(&self, _node: Self::Node) {}
}
