//! A [`Renderer`] for the browser DOM.

use crate::{
	error::HostError,
	renderer::Renderer,
	view::{Handler, PropValue},
};
use js_sys::Reflect;
use tracing::{error, trace, warn};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Node};

/// Patches [***Node***](https://developer.mozilla.org/en-US/docs/Web/API/Node)s owned by a [***Document***](https://developer.mozilla.org/en-US/docs/Web/API/Document).
///
/// Properties are assigned as ***JavaScript*** properties (like `element.tabIndex = 1`), not as attributes.
#[derive(Debug, Clone)]
pub struct WebRenderer {
	document: Document,
}

/// An attached event listener.
///
/// The closure is kept alive here and freed once the listener is removed via [`Renderer::unlisten`].
/// Dropping this without unlistening leaves a listener behind that throws into ***JavaScript*** when called.
#[derive(Debug)]
pub struct WebListener {
	event: String,
	closure: Closure<dyn FnMut(web_sys::Event)>,
}

impl WebRenderer {
	#[must_use]
	pub fn new(document: Document) -> Self {
		Self { document }
	}

	#[must_use]
	pub fn document(&self) -> &Document {
		&self.document
	}
}

impl Renderer for WebRenderer {
	type Node = Node;
	type Listener = WebListener;

	fn create_element(&self, tag: &str) -> Result<Node, HostError> {
		self.document
			.create_element(tag)
			.map(Into::into)
			.map_err(|error| HostError::new("create element", format!("<{}>: {:?}", tag, error)))
	}

	fn create_text(&self, content: &str) -> Node {
		self.document.create_text_node(content).into()
	}

	fn set_text(&self, node: &Node, content: &str) {
		node.set_text_content(Some(content))
	}

	fn append_child(&self, parent: &Node, child: &Node) {
		if let Err(error) = parent.append_child(child) {
			error!("Failed to append child: {:?}", error)
		}
	}

	fn insert_before(&self, parent: &Node, child: &Node, reference: &Node) {
		if let Err(error) = parent.insert_before(child, Some(reference)) {
			error!("Failed to insert node: {:?}", error)
		}
	}

	fn remove_child(&self, parent: &Node, child: &Node) {
		if let Err(error) = parent.remove_child(child) {
			error!("Failed to remove node: {:?}", error)
		}
	}

	fn set_property(&self, node: &Node, name: &str, value: &PropValue) {
		let value = match value {
			PropValue::Null => JsValue::NULL,
			PropValue::Bool(value) => JsValue::from_bool(*value),
			PropValue::Number(value) => JsValue::from_f64(*value),
			PropValue::String(value) => JsValue::from_str(value),
			PropValue::Handler(_) => return error!("Refusing to assign a handler to property {:?}.", name),
		};
		match Reflect::set(node, &JsValue::from_str(name), &value) {
			Ok(true) => (),
			Ok(false) => warn!("Property {:?} is read-only.", name),
			Err(error) => error!("Failed to set property {:?}: {:?}", name, error),
		}
	}

	fn add_class(&self, node: &Node, name: &str) {
		match node.dyn_ref::<Element>() {
			Some(element) => {
				if let Err(error) = element.class_list().add_1(name) {
					error!("Failed to add class {:?}: {:?}", name, error)
				}
			}
			None => error!("Expected an `Element` to add class {:?} to but found {:?}.", name, node),
		}
	}

	fn remove_class(&self, node: &Node, name: &str) {
		match node.dyn_ref::<Element>() {
			Some(element) => {
				if let Err(error) = element.class_list().remove_1(name) {
					error!("Failed to remove class {:?}: {:?}", name, error)
				}
			}
			None => error!("Expected an `Element` to remove class {:?} from but found {:?}.", name, node),
		}
	}

	fn set_style(&self, node: &Node, name: &str, value: &str) {
		match node.dyn_ref::<HtmlElement>() {
			Some(element) => {
				if let Err(error) = element.style().set_property(name, value) {
					error!("Failed to set style {:?}: {:?}", name, error)
				}
			}
			None => warn!("Inline styles are only supported on `HtmlElement`s. Ignoring {:?} on {:?}.", name, node),
		}
	}

	fn remove_style(&self, node: &Node, name: &str) {
		match node.dyn_ref::<HtmlElement>() {
			Some(element) => {
				if let Err(error) = element.style().remove_property(name) {
					error!("Failed to remove style {:?}: {:?}", name, error)
				}
			}
			None => warn!("Inline styles are only supported on `HtmlElement`s. Ignoring removal of {:?} on {:?}.", name, node),
		}
	}

	fn listen(&self, node: &Node, event: &str, handler: Handler) -> WebListener {
		let closure = Closure::wrap(Box::new(move |event: web_sys::Event| handler.call(&event)) as Box<dyn FnMut(web_sys::Event)>);
		if let Err(error) = node.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
			error!("Failed to add event listener {:?}: {:?}", event, error)
		}
		trace!("Created Closure.");
		WebListener {
			event: event.to_owned(),
			closure,
		}
	}

	fn unlisten(&self, node: &Node, listener: WebListener) {
		let WebListener { event, closure } = listener;
		if let Err(error) = node.remove_event_listener_with_callback(&event, closure.as_ref().unchecked_ref()) {
			error!("Failed to remove event listener {:?}: {:?}", event, error)
		}
		trace!("Destroyed Closure.");
	}
}
