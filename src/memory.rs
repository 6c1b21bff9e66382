//! A headless [`Page`]: an element tree plus a manual clock, enough to drive
//! every controller without a browser.
//!
//! Elements are built from compound selectors, so
//! `page.add(body, "button.filter-btn[data-filter=vfx]")` creates a button
//! with that class and attribute.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use crate::dom::Page;
use crate::error::UiError;
use crate::markup::escape_html;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Default)]
struct NodeData {
    tag: String,
    classes: Vec<String>,
    attrs: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    html: String,
    value: String,
    disabled: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    viewport_top: f64,
    span: (f64, f64),
}

struct Timer {
    due: u64,
    seq: u64,
    task: Box<dyn FnOnce()>,
}

#[derive(Debug, Default, Clone)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

const MARKERS: [char; 3] = ['#', '.', '['];

fn parse_compound(input: &str) -> Compound {
    let mut compound = Compound::default();
    let input = input.trim();
    let tag_end = input.find(MARKERS).unwrap_or(input.len());
    if tag_end > 0 {
        compound.tag = Some(input[..tag_end].to_ascii_lowercase());
    }
    let mut rest = &input[tag_end..];

    while let Some(marker) = rest.chars().next() {
        if marker == '[' {
            let close = rest.find(']').unwrap_or(rest.len());
            let inner = &rest[1..close];
            let (name, value) = match inner.split_once('=') {
                Some((name, value)) => (name.trim(), Some(value.trim().trim_matches(['"', '\'']).to_string())),
                None => (inner.trim(), None),
            };
            compound.attrs.push((name.to_string(), value));
            rest = rest.get(close + 1..).unwrap_or("");
        } else {
            let body = &rest[1..];
            let end = body.find(MARKERS).unwrap_or(body.len());
            let name = body[..end].to_string();
            if marker == '#' {
                compound.id = Some(name);
            } else {
                compound.classes.push(name);
            }
            rest = &body[end..];
        }
    }
    compound
}

fn parse_selector(selector: &str) -> Vec<Compound> {
    selector
        .split(',')
        .filter(|part| !part.trim().is_empty())
        .map(parse_compound)
        .collect()
}

impl NodeData {
    fn matches(&self, compound: &Compound) -> bool {
        if let Some(tag) = &compound.tag {
            if !self.tag.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &compound.id {
            if self.attrs.get("id") != Some(id) {
                return false;
            }
        }
        compound.classes.iter().all(|c| self.classes.contains(c))
            && compound.attrs.iter().all(|(name, value)| match value {
                Some(value) => self.attrs.get(name) == Some(value),
                None => self.attrs.contains_key(name),
            })
    }
}

pub struct MemoryPage {
    nodes: RefCell<Vec<NodeData>>,
    timers: RefCell<Vec<Timer>>,
    now_ms: Cell<u64>,
    timer_seq: Cell<u64>,
    scroll_y: Cell<f64>,
    viewport_height: Cell<f64>,
    scroll_locked: Cell<bool>,
    focused: Cell<Option<NodeId>>,
    creates_left: Cell<Option<usize>>,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    pub fn new() -> Self {
        let body = NodeData {
            tag: "body".to_string(),
            ..Default::default()
        };
        Self {
            nodes: RefCell::new(vec![body]),
            timers: RefCell::new(Vec::new()),
            now_ms: Cell::new(0),
            timer_seq: Cell::new(0),
            scroll_y: Cell::new(0.0),
            viewport_height: Cell::new(800.0),
            scroll_locked: Cell::new(false),
            focused: Cell::new(None),
            creates_left: Cell::new(None),
        }
    }

    pub fn body(&self) -> NodeId {
        NodeId(0)
    }

    fn build(&self, spec: &str) -> NodeId {
        let compound = parse_compound(spec);
        let mut data = NodeData {
            tag: compound.tag.unwrap_or_else(|| "div".to_string()),
            classes: compound.classes,
            ..Default::default()
        };
        if let Some(id) = compound.id {
            data.attrs.insert("id".to_string(), id);
        }
        for (name, value) in compound.attrs {
            data.attrs.insert(name, value.unwrap_or_default());
        }
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(data);
        NodeId(nodes.len() - 1)
    }

    /// Creates an element from a compound selector and appends it to `parent`.
    pub fn add(&self, parent: NodeId, spec: &str) -> NodeId {
        let node = self.build(spec);
        self.attach(parent, node);
        node
    }

    fn attach(&self, parent: NodeId, child: NodeId) {
        self.detach(child);
        let mut nodes = self.nodes.borrow_mut();
        nodes[child.0].parent = Some(parent);
        nodes[parent.0].children.push(child);
    }

    fn detach(&self, child: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = nodes[child.0].parent.take() {
            nodes[parent.0].children.retain(|c| *c != child);
        }
    }

    fn detach_children(&self, parent: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        let children = std::mem::take(&mut nodes[parent.0].children);
        for child in children {
            nodes[child.0].parent = None;
        }
    }

    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = nodes[root.0].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(nodes[node.0].children.iter().rev().copied());
        }
        out
    }

    fn select(&self, root: NodeId, selector: &str) -> Vec<NodeId> {
        let compounds = parse_selector(selector);
        let candidates = self.descendants(root);
        let nodes = self.nodes.borrow();
        candidates
            .into_iter()
            .filter(|n| compounds.iter().any(|c| nodes[n.0].matches(c)))
            .collect()
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].html.clone()
    }

    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.nodes.borrow()[node.0].styles.get(property).cloned()
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.nodes.borrow()[node.0].disabled
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll_locked.get()
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused.get()
    }

    pub fn set_scroll_y(&self, y: f64) {
        self.scroll_y.set(y);
    }

    pub fn set_viewport_height(&self, height: f64) {
        self.viewport_height.set(height);
    }

    pub fn set_viewport_top(&self, node: NodeId, top: f64) {
        self.nodes.borrow_mut()[node.0].viewport_top = top;
    }

    pub fn set_document_span(&self, node: NodeId, top: f64, height: f64) {
        self.nodes.borrow_mut()[node.0].span = (top, height);
    }

    /// Lets `count` more `create_element` calls succeed; every later one fails.
    pub fn fail_creates_after(&self, count: usize) {
        self.creates_left.set(Some(count));
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Moves the clock forward, running every timer that falls due in order.
    pub fn advance(&self, ms: u64) {
        let target = self.now_ms.get() + ms;
        loop {
            let next = {
                let mut timers = self.timers.borrow_mut();
                let due = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.seq))
                    .map(|(i, _)| i);
                due.map(|i| timers.remove(i))
            };
            match next {
                Some(timer) => {
                    self.now_ms.set(timer.due);
                    (timer.task)();
                }
                None => break,
            }
        }
        self.now_ms.set(target);
    }
}

impl Page for MemoryPage {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let candidates = self.descendants(self.body());
        let nodes = self.nodes.borrow();
        candidates
            .into_iter()
            .find(|n| nodes[n.0].attrs.get("id").map(String::as_str) == Some(id))
    }

    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        self.select(self.body(), selector)
    }

    fn query_within(&self, scope: &NodeId, selector: &str) -> Option<NodeId> {
        self.select(*scope, selector).into_iter().next()
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes.borrow()[node.0].parent
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, UiError> {
        if tag.is_empty() || tag.contains(MARKERS) {
            return Err(UiError::Dom(format!("invalid tag name `{}`", tag)));
        }
        match self.creates_left.get() {
            Some(0) => return Err(UiError::Dom(format!("cannot create `{}`", tag))),
            Some(left) => self.creates_left.set(Some(left - 1)),
            None => {}
        }
        Ok(self.build(tag))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), UiError> {
        self.attach(*parent, *child);
        Ok(())
    }

    fn replace_children(&self, parent: &NodeId, children: &[NodeId]) -> Result<(), UiError> {
        self.nodes.borrow_mut()[parent.0].html.clear();
        self.detach_children(*parent);
        for child in children {
            self.attach(*parent, *child);
        }
        Ok(())
    }

    fn set_inner_html(&self, node: &NodeId, html: &str) {
        self.detach_children(*node);
        self.nodes.borrow_mut()[node.0].html = html.to_string();
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        self.set_inner_html(node, &escape_html(text));
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.nodes.borrow()[node.0].attrs.get(name).cloned()
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) {
        self.nodes.borrow_mut()[node.0]
            .attrs
            .insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, node: &NodeId, name: &str) {
        self.nodes.borrow_mut()[node.0].attrs.remove(name);
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.nodes.borrow()[node.0].classes.iter().any(|c| c == class)
    }

    fn add_class(&self, node: &NodeId, class: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let classes = &mut nodes[node.0].classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&self, node: &NodeId, class: &str) {
        self.nodes.borrow_mut()[node.0].classes.retain(|c| c != class);
    }

    fn set_class_name(&self, node: &NodeId, class_name: &str) {
        self.nodes.borrow_mut()[node.0].classes = class_name.split_whitespace().map(str::to_string).collect();
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) {
        self.nodes.borrow_mut()[node.0]
            .styles
            .insert(property.to_string(), value.to_string());
    }

    fn value(&self, node: &NodeId) -> String {
        self.nodes.borrow()[node.0].value.clone()
    }

    fn set_value(&self, node: &NodeId, value: &str) {
        self.nodes.borrow_mut()[node.0].value = value.to_string();
    }

    fn set_disabled(&self, node: &NodeId, disabled: bool) {
        self.nodes.borrow_mut()[node.0].disabled = disabled;
    }

    fn focus(&self, node: &NodeId) {
        self.focused.set(Some(*node));
    }

    fn lock_scroll(&self, locked: bool) {
        self.scroll_locked.set(locked);
    }

    fn viewport_top(&self, node: &NodeId) -> f64 {
        self.nodes.borrow()[node.0].viewport_top
    }

    fn document_span(&self, node: &NodeId) -> (f64, f64) {
        self.nodes.borrow()[node.0].span
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height.get()
    }

    fn set_timeout(&self, delay_ms: u32, task: Box<dyn FnOnce()>) {
        let seq = self.timer_seq.get();
        self.timer_seq.set(seq + 1);
        self.timers.borrow_mut().push(Timer {
            due: self.now_ms.get() + u64::from(delay_ms),
            seq,
            task,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_elements_from_selectors() {
        let page = MemoryPage::new();
        let button = page.add(page.body(), "button#go.btn.filter-btn[data-filter=\"vfx\"]");
        assert_eq!(page.element_by_id("go"), Some(button));
        assert!(page.has_class(&button, "filter-btn"));
        assert_eq!(page.attribute(&button, "data-filter").as_deref(), Some("vfx"));
        assert_eq!(page.query_all("button.btn"), vec![button]);
        assert_eq!(page.query_all("[data-filter=vfx]"), vec![button]);
        assert!(page.query_all("a").is_empty());
    }

    #[test]
    fn queries_follow_document_order() {
        let page = MemoryPage::new();
        let a = page.add(page.body(), "section#one");
        let inner = page.add(a, "p.note");
        let b = page.add(page.body(), "section#two.note");
        assert_eq!(page.query_all(".note, section"), vec![a, inner, b]);
        assert_eq!(page.query_within(&a, ".note"), Some(inner));
        assert_eq!(page.parent(&inner), Some(a));
    }

    #[test]
    fn detached_nodes_are_not_found() {
        let page = MemoryPage::new();
        let grid = page.add(page.body(), "div.grid");
        let card = page.create_element("article").expect("create");
        page.add_class(&card, "card");
        assert!(page.query_all(".card").is_empty());
        page.replace_children(&grid, &[card]).expect("replace");
        assert_eq!(page.query_all(".card"), vec![card]);
        page.set_inner_html(&grid, "<p>gone</p>");
        assert!(page.query_all(".card").is_empty());
    }

    #[test]
    fn creation_fails_once_budget_is_spent() {
        let page = MemoryPage::new();
        page.fail_creates_after(1);
        assert!(page.create_element("article").is_ok());
        assert!(page.create_element("article").is_err());
        assert!(page.create_element("article").is_err());
    }

    #[test]
    fn timers_run_in_due_order() {
        use std::rc::Rc;

        let page = MemoryPage::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (delay, label) in [(300, "late"), (10, "early"), (10, "early-2")] {
            let log = log.clone();
            page.set_timeout(delay, Box::new(move || log.borrow_mut().push(label)));
        }
        page.advance(50);
        assert_eq!(*log.borrow(), vec!["early", "early-2"]);
        assert_eq!(page.pending_timers(), 1);
        page.advance(250);
        assert_eq!(*log.borrow(), vec!["early", "early-2", "late"]);
        assert_eq!(page.now_ms(), 300);
    }

    #[test]
    fn text_is_stored_escaped() {
        let page = MemoryPage::new();
        let p = page.add(page.body(), "p");
        page.set_text(&p, "a < b");
        assert_eq!(page.inner_html(p), "a &lt; b");
    }
}
