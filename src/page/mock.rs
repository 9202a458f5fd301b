//! In-memory page for tests
//!
//! A tiny document tree with a virtual clock. Selectors support `#id`,
//! `.class`, `tag` and compound forms such as `form.add-to-cart-form`.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use futures::executor::{LocalPool, LocalSpawner};
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;

use super::{Element, FormFields, Listener, Page, Timer};

type Handler = Rc<RefCell<Box<dyn FnMut()>>>;

#[derive(Default)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    content: String,
    // Whether `content` came from `set_inner_html`
    markup: bool,
    styles: BTreeMap<String, String>,
    disabled: bool,
    checked: bool,
    action: String,
    fields: Vec<(String, String)>,
    parent: Option<usize>,
    children: Vec<usize>,
    click_handlers: Vec<Handler>,
    submit_handlers: Vec<Handler>,
    native_submits: usize,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    fn matches(&self, selector: &str) -> bool {
        let selector = selector.trim();
        let split = selector.find(&['.', '#'][..]).unwrap_or(selector.len());
        let (tag, mut rest) = selector.split_at(split);

        if !tag.is_empty() && !tag.eq_ignore_ascii_case(&self.tag) {
            return false;
        }

        while !rest.is_empty() {
            let marker = rest.as_bytes()[0];
            let body = &rest[1..];
            let end = body.find(&['.', '#'][..]).unwrap_or(body.len());
            let name = &body[..end];
            let matched = match marker {
                b'.' => self.classes.iter().any(|c| c == name),
                _ => self.id.as_deref() == Some(name),
            };
            if !matched {
                return false;
            }
            rest = &body[end..];
        }
        true
    }
}

const BODY: usize = 0;

struct Document {
    nodes: Vec<Node>,
}

impl Document {
    fn is_attached(&self, mut index: usize) -> bool {
        loop {
            if index == BODY {
                return true;
            }
            match self.nodes[index].parent {
                Some(parent) => index = parent,
                None => return false,
            }
        }
    }

    /// Descendants of `root` in document order, `root` excluded
    fn descendants(&self, root: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.nodes[root].children.iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            out.push(index);
            stack.extend(self.nodes[index].children.iter().rev().copied());
        }
        out
    }

    fn detach(&mut self, index: usize) {
        if let Some(parent) = self.nodes[index].parent.take() {
            self.nodes[parent].children.retain(|&child| child != index);
        }
    }
}

struct TimerState {
    cancelled: Cell<bool>,
    detached: Cell<bool>,
}

struct Scheduled {
    due: u64,
    seq: u64,
    state: Rc<TimerState>,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct Clock {
    now: u64,
    seq: u64,
    queue: Vec<Scheduled>,
}

pub struct MockTimer {
    state: Rc<TimerState>,
}

impl Timer for MockTimer {
    fn forget(self) {
        self.state.detached.set(true);
    }
}

impl Drop for MockTimer {
    fn drop(&mut self) {
        if !self.state.detached.get() {
            self.state.cancelled.set(true);
        }
    }
}

/// Click listener on a mock element; dropping it detaches the handler
pub struct MockListener {
    doc: Rc<RefCell<Document>>,
    index: usize,
    handler: Option<Handler>,
}

impl Listener for MockListener {
    fn forget(mut self) {
        self.handler = None;
    }
}

impl Drop for MockListener {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            self.doc.borrow_mut().nodes[self.index]
                .click_handlers
                .retain(|h| !Rc::ptr_eq(h, &handler));
        }
    }
}

#[derive(Clone)]
pub struct MockElement {
    doc: Rc<RefCell<Document>>,
    index: usize,
}

impl PartialEq for MockElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.doc, &other.doc) && self.index == other.index
    }
}

impl std::fmt::Debug for MockElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let doc = self.doc.borrow();
        let node = &doc.nodes[self.index];
        write!(f, "<{} #{:?} {:?}>", node.tag, node.id, node.classes)
    }
}

impl MockElement {
    fn with<R>(&self, f: impl FnOnce(&Node) -> R) -> R {
        f(&self.doc.borrow().nodes[self.index])
    }

    fn with_mut<R>(&self, f: impl FnOnce(&mut Node) -> R) -> R {
        f(&mut self.doc.borrow_mut().nodes[self.index])
    }

    fn handle(&self, index: usize) -> MockElement {
        MockElement {
            doc: Rc::clone(&self.doc),
            index,
        }
    }

    /// Create a child element and return it
    pub fn add(&self, tag: &str) -> MockElement {
        let mut doc = self.doc.borrow_mut();
        let index = doc.nodes.len();
        let mut node = Node::new(tag);
        node.parent = Some(self.index);
        doc.nodes.push(node);
        doc.nodes[self.index].children.push(index);
        drop(doc);
        self.handle(index)
    }

    pub fn with_id(self, id: &str) -> Self {
        self.with_mut(|n| n.id = Some(id.to_string()));
        self
    }

    pub fn with_class(self, class: &str) -> Self {
        self.set_class(class, true);
        self
    }

    pub fn with_html(self, html: &str) -> Self {
        self.set_inner_html(html);
        self
    }

    pub fn with_action(self, action: &str) -> Self {
        self.with_mut(|n| n.action = action.to_string());
        self
    }

    pub fn with_field(self, name: &str, value: &str) -> Self {
        self.with_mut(|n| n.fields.push((name.to_string(), value.to_string())));
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.with(|n| n.classes.iter().any(|c| c == class))
    }

    pub fn class_name(&self) -> String {
        self.with(|n| n.classes.join(" "))
    }

    pub fn style(&self, property: &str) -> Option<String> {
        self.with(|n| n.styles.get(property).cloned())
    }

    pub fn is_disabled(&self) -> bool {
        self.with(|n| n.disabled)
    }

    pub fn is_checked(&self) -> bool {
        self.with(|n| n.checked)
    }

    pub fn is_attached(&self) -> bool {
        self.doc.borrow().is_attached(self.index)
    }

    pub fn children(&self) -> Vec<MockElement> {
        let indices = self.with(|n| n.children.clone());
        indices.into_iter().map(|i| self.handle(i)).collect()
    }

    /// Whether the content was last set as markup rather than text
    pub fn has_markup(&self) -> bool {
        self.with(|n| n.markup)
    }

    pub fn click_listeners(&self) -> usize {
        self.with(|n| n.click_handlers.len())
    }

    pub fn native_submits(&self) -> usize {
        self.with(|n| n.native_submits)
    }

    /// Simulate a user click
    pub fn click(&self) {
        let handlers = self.with(|n| n.click_handlers.clone());
        for handler in handlers {
            (*handler.borrow_mut())();
        }
    }

    /// Simulate a user submitting the form. Without a listener the browser
    /// would navigate, which is recorded as a native submission.
    pub fn submit(&self) {
        let handlers = self.with(|n| n.submit_handlers.clone());
        if handlers.is_empty() {
            self.submit_natively();
            return;
        }
        for handler in handlers {
            (*handler.borrow_mut())();
        }
    }
}

impl Element for MockElement {
    type Listener = MockListener;

    fn query(&self, selector: &str) -> Option<Self> {
        let doc = self.doc.borrow();
        let found = doc
            .descendants(self.index)
            .into_iter()
            .find(|&i| doc.nodes[i].matches(selector));
        drop(doc);
        found.map(|i| self.handle(i))
    }

    fn append_child(&self, child: &Self) {
        let mut doc = self.doc.borrow_mut();
        doc.detach(child.index);
        doc.nodes[child.index].parent = Some(self.index);
        doc.nodes[self.index].children.push(child.index);
    }

    fn remove(&self) {
        self.doc.borrow_mut().detach(self.index);
    }

    fn set_class(&self, class: &str, present: bool) {
        self.with_mut(|n| {
            let has = n.classes.iter().any(|c| c == class);
            if present && !has {
                n.classes.push(class.to_string());
            } else if !present {
                n.classes.retain(|c| c != class);
            }
        });
    }

    fn toggle_class(&self, class: &str) -> bool {
        let present = !self.has_class(class);
        self.set_class(class, present);
        present
    }

    fn set_class_name(&self, class_name: &str) {
        self.with_mut(|n| n.classes = class_name.split_whitespace().map(str::to_string).collect());
    }

    fn set_id(&self, id: &str) {
        self.with_mut(|n| n.id = Some(id.to_string()));
    }

    fn text(&self) -> String {
        self.with(|n| n.content.clone())
    }

    fn set_text(&self, text: &str) {
        self.with_mut(|n| {
            n.content = text.to_string();
            n.markup = false;
        });
    }

    fn inner_html(&self) -> String {
        self.with(|n| n.content.clone())
    }

    fn set_inner_html(&self, html: &str) {
        self.with_mut(|n| {
            n.content = html.to_string();
            n.markup = true;
        });
    }

    fn set_style(&self, property: &str, value: &str) {
        self.with_mut(|n| {
            if value.is_empty() {
                n.styles.remove(property);
            } else {
                n.styles.insert(property.to_string(), value.to_string());
            }
        });
    }

    fn set_disabled(&self, disabled: bool) {
        self.with_mut(|n| n.disabled = disabled);
    }

    fn set_checked(&self, checked: bool) {
        self.with_mut(|n| {
            if n.tag == "input" {
                n.checked = checked;
            }
        });
    }

    fn form_action(&self) -> String {
        self.with(|n| n.action.clone())
    }

    fn form_fields(&self) -> FormFields {
        FormFields {
            entries: self.with(|n| n.fields.clone()),
        }
    }

    fn submit_natively(&self) {
        self.with_mut(|n| n.native_submits += 1);
    }

    fn listen_click(&self, handler: Box<dyn FnMut()>) -> MockListener {
        let handler: Handler = Rc::new(RefCell::new(handler));
        self.with_mut(|n| n.click_handlers.push(Rc::clone(&handler)));
        MockListener {
            doc: Rc::clone(&self.doc),
            index: self.index,
            handler: Some(handler),
        }
    }

    fn on_submit(&self, handler: Box<dyn FnMut()>) {
        self.with_mut(|n| n.submit_handlers.push(Rc::new(RefCell::new(handler))));
    }
}

#[derive(Clone)]
pub struct MockPage {
    doc: Rc<RefCell<Document>>,
    clock: Rc<RefCell<Clock>>,
    scroll_y: Rc<Cell<f64>>,
    scroll_handlers: Rc<RefCell<Vec<Handler>>>,
    pool: Rc<RefCell<LocalPool>>,
    spawner: LocalSpawner,
}

impl MockPage {
    pub fn new() -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self {
            doc: Rc::new(RefCell::new(Document {
                nodes: vec![Node::new("body")],
            })),
            clock: Rc::new(RefCell::new(Clock::default())),
            scroll_y: Rc::new(Cell::new(0.0)),
            scroll_handlers: Rc::new(RefCell::new(Vec::new())),
            pool: Rc::new(RefCell::new(pool)),
            spawner,
        }
    }

    pub fn root(&self) -> MockElement {
        MockElement {
            doc: Rc::clone(&self.doc),
            index: BODY,
        }
    }

    /// Scroll the window and dispatch `scroll` listeners
    pub fn scroll_to(&self, y: f64) {
        self.scroll_y.set(y);
        let handlers = self.scroll_handlers.borrow().clone();
        for handler in handlers {
            (*handler.borrow_mut())();
        }
    }

    /// Timers that are scheduled and not cancelled
    pub fn pending_timers(&self) -> usize {
        self.clock
            .borrow()
            .queue
            .iter()
            .filter(|t| !t.state.cancelled.get())
            .count()
    }

    /// Move the virtual clock forward, firing due timers in order
    pub fn advance(&self, ms: u64) {
        let target = self.clock.borrow().now + ms;
        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                clock.queue.retain(|t| !t.state.cancelled.get());
                let earliest = clock
                    .queue
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.seq))
                    .map(|(i, _)| i);
                earliest.map(|i| {
                    let timer = clock.queue.remove(i);
                    clock.now = timer.due;
                    timer
                })
            };
            match next {
                Some(timer) => (timer.callback)(),
                None => break,
            }
        }
        self.clock.borrow_mut().now = target;
    }

    /// Drive spawned futures until none can make progress
    pub fn run_until_stalled(&self) {
        self.pool.borrow_mut().run_until_stalled();
    }
}

impl Page for MockPage {
    type Element = MockElement;
    type Timer = MockTimer;

    fn element_by_id(&self, id: &str) -> Option<MockElement> {
        let doc = self.doc.borrow();
        let found = doc
            .descendants(BODY)
            .into_iter()
            .find(|&i| doc.nodes[i].id.as_deref() == Some(id));
        drop(doc);
        found.map(|index| MockElement {
            doc: Rc::clone(&self.doc),
            index,
        })
    }

    fn query(&self, selector: &str) -> Option<MockElement> {
        self.root().query(selector)
    }

    fn query_all(&self, selector: &str) -> Vec<MockElement> {
        let doc = self.doc.borrow();
        let found: Vec<usize> = doc
            .descendants(BODY)
            .into_iter()
            .filter(|&i| doc.nodes[i].matches(selector))
            .collect();
        drop(doc);
        found
            .into_iter()
            .map(|index| MockElement {
                doc: Rc::clone(&self.doc),
                index,
            })
            .collect()
    }

    fn body(&self) -> Option<MockElement> {
        Some(self.root())
    }

    fn create_element(&self, tag: &str) -> Option<MockElement> {
        let mut doc = self.doc.borrow_mut();
        let index = doc.nodes.len();
        doc.nodes.push(Node::new(tag));
        drop(doc);
        Some(MockElement {
            doc: Rc::clone(&self.doc),
            index,
        })
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn on_scroll(&self, handler: Box<dyn FnMut()>) {
        self.scroll_handlers
            .borrow_mut()
            .push(Rc::new(RefCell::new(handler)));
    }

    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> MockTimer {
        let state = Rc::new(TimerState {
            cancelled: Cell::new(false),
            detached: Cell::new(false),
        });
        let mut clock = self.clock.borrow_mut();
        clock.seq += 1;
        let scheduled = Scheduled {
            due: clock.now + u64::from(delay_ms),
            seq: clock.seq,
            state: Rc::clone(&state),
            callback,
        };
        clock.queue.push(scheduled);
        MockTimer { state }
    }

    fn spawn(&self, future: LocalBoxFuture<'static, ()>) {
        if self.spawner.spawn_local(future).is_err() {
            panic!("mock executor shut down");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_matching() {
        let page = MockPage::new();
        let form = page.root().add("form").with_class("add-to-cart-form");
        let button = form.add("button").with_id("buy");

        assert_eq!(page.query("form.add-to-cart-form"), Some(form.clone()));
        assert_eq!(page.query(".add-to-cart-form"), Some(form.clone()));
        assert_eq!(page.query("div.add-to-cart-form"), None);
        assert_eq!(form.query("button"), Some(button.clone()));
        assert_eq!(page.element_by_id("buy"), Some(button));
    }

    #[test]
    fn test_removed_elements_leave_queries() {
        let page = MockPage::new();
        let msg = page.root().add("div").with_class("message");
        assert_eq!(page.query_all(".message").len(), 1);

        msg.remove();
        assert!(!msg.is_attached());
        assert!(page.query_all(".message").is_empty());
    }

    #[test]
    fn test_text_and_markup_are_distinct() {
        let page = MockPage::new();
        let el = page.root().add("span");

        el.set_inner_html("<b>x</b>");
        assert!(el.has_markup());
        el.set_text("<b>x</b>");
        assert!(!el.has_markup());
        assert_eq!(el.text(), "<b>x</b>");
    }

    #[test]
    fn test_dropped_listener_detaches() {
        let page = MockPage::new();
        let button = page.root().add("button");
        let clicks = Rc::new(Cell::new(0));

        let counter = Rc::clone(&clicks);
        let listener = button.listen_click(Box::new(move || counter.set(counter.get() + 1)));
        button.click();
        drop(listener);
        button.click();

        assert_eq!(clicks.get(), 1);
        assert_eq!(button.click_listeners(), 0);
    }

    #[test]
    fn test_timers_fire_in_order_and_cancel_on_drop() {
        let page = MockPage::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let log_a = Rc::clone(&log);
        page.set_timeout(20, Box::new(move || log_a.borrow_mut().push("a"))).forget();
        let log_b = Rc::clone(&log);
        page.set_timeout(10, Box::new(move || log_b.borrow_mut().push("b"))).forget();
        let log_c = Rc::clone(&log);
        let cancelled = page.set_timeout(5, Box::new(move || log_c.borrow_mut().push("c")));
        drop(cancelled);

        page.advance(15);
        assert_eq!(*log.borrow(), vec!["b"]);
        page.advance(5);
        assert_eq!(*log.borrow(), vec!["b", "a"]);
        assert_eq!(page.pending_timers(), 0);
    }
}
