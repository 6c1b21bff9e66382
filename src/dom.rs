//! The host capabilities the controllers rely on. The browser implementation
//! lives in `web_page`, the headless one in `memory`.

use crate::error::UiError;

pub trait Page {
    type Node: Clone + PartialEq + 'static;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;
    /// Connected elements matching a CSS selector, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;
    /// First descendant of `scope` matching `selector`.
    fn query_within(&self, scope: &Self::Node, selector: &str) -> Option<Self::Node>;
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn create_element(&self, tag: &str) -> Result<Self::Node, UiError>;
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), UiError>;
    /// Swaps every child of `parent` for `children`.
    fn replace_children(&self, parent: &Self::Node, children: &[Self::Node]) -> Result<(), UiError>;

    fn set_inner_html(&self, node: &Self::Node, html: &str);
    fn set_text(&self, node: &Self::Node, text: &str);

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str);
    fn remove_attribute(&self, node: &Self::Node, name: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&self, node: &Self::Node, class: &str);
    fn remove_class(&self, node: &Self::Node, class: &str);
    fn set_class_name(&self, node: &Self::Node, class_name: &str);
    fn set_style(&self, node: &Self::Node, property: &str, value: &str);

    /// Current value of a form control, empty for anything else.
    fn value(&self, node: &Self::Node) -> String;
    fn set_value(&self, node: &Self::Node, value: &str);
    fn set_disabled(&self, node: &Self::Node, disabled: bool);
    fn focus(&self, node: &Self::Node);

    /// Suspends (or restores) scrolling of the page body.
    fn lock_scroll(&self, locked: bool);
    /// Distance from the viewport top to the node's top edge.
    fn viewport_top(&self, node: &Self::Node) -> f64;
    /// `(offset top, height)` of the node within the document.
    fn document_span(&self, node: &Self::Node) -> (f64, f64);
    fn scroll_y(&self) -> f64;
    fn viewport_height(&self) -> f64;

    fn set_timeout(&self, delay_ms: u32, task: Box<dyn FnOnce()>);
}

/// Shows or hides a node through both the `hidden` attribute and inline display.
pub fn set_shown<P: Page + ?Sized>(page: &P, node: &P::Node, shown: bool) {
    if shown {
        page.remove_attribute(node, "hidden");
        page.set_style(node, "display", "block");
    } else {
        page.set_attribute(node, "hidden", "");
        page.set_style(node, "display", "none");
    }
}
