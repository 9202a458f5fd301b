//! Browser implementation of the page interface over `web-sys`.

use futures::future::LocalBoxFuture;
use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    FormData, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
};

use super::{Element, FormFields, Listener, Page, Timer};

impl Timer for Timeout {
    fn forget(self) {
        Timeout::forget(self);
    }
}

/// Event listener that is removed from its target when dropped
pub struct WebListener {
    target: web_sys::EventTarget,
    event: &'static str,
    callback: Option<Closure<dyn FnMut(web_sys::Event)>>,
}

impl Listener for WebListener {
    fn forget(mut self) {
        if let Some(callback) = self.callback.take() {
            callback.forget();
        }
    }
}

impl Drop for WebListener {
    fn drop(&mut self) {
        if let Some(callback) = self.callback.take() {
            self.target
                .remove_event_listener_with_callback(self.event, callback.as_ref().unchecked_ref())
                .ok();
        }
    }
}

fn listen(
    target: &web_sys::EventTarget,
    event: &'static str,
    mut handler: impl FnMut(web_sys::Event) + 'static,
) -> WebListener {
    let callback = Closure::wrap(Box::new(move |evt: web_sys::Event| handler(evt)) as Box<dyn FnMut(web_sys::Event)>);

    let attached = match target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref()) {
        Ok(()) => Some(callback),
        Err(e) => {
            log::debug!("Failed to add {} listener: {:?}", event, e);
            None
        }
    };

    WebListener {
        target: target.clone(),
        event,
        callback: attached,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct WebElement(web_sys::Element);

impl Element for WebElement {
    type Listener = WebListener;

    fn query(&self, selector: &str) -> Option<Self> {
        self.0.query_selector(selector).ok().flatten().map(WebElement)
    }

    fn append_child(&self, child: &Self) {
        if let Err(e) = self.0.append_child(&child.0) {
            log::debug!("Failed to append child: {:?}", e);
        }
    }

    fn remove(&self) {
        self.0.remove();
    }

    fn set_class(&self, class: &str, present: bool) {
        if let Err(e) = self.0.class_list().toggle_with_force(class, present) {
            log::debug!("Failed to set class {}: {:?}", class, e);
        }
    }

    fn toggle_class(&self, class: &str) -> bool {
        self.0.class_list().toggle(class).unwrap_or(false)
    }

    fn set_class_name(&self, class_name: &str) {
        self.0.set_class_name(class_name);
    }

    fn set_id(&self, id: &str) {
        self.0.set_id(id);
    }

    fn text(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }

    fn set_text(&self, text: &str) {
        self.0.set_text_content(Some(text));
    }

    fn inner_html(&self) -> String {
        self.0.inner_html()
    }

    fn set_inner_html(&self, html: &str) {
        self.0.set_inner_html(html);
    }

    fn set_style(&self, property: &str, value: &str) {
        let Some(element) = self.0.dyn_ref::<HtmlElement>() else {
            return;
        };
        if let Err(e) = element.style().set_property(property, value) {
            log::debug!("Failed to set style {}: {:?}", property, e);
        }
    }

    fn set_disabled(&self, disabled: bool) {
        if let Some(button) = self.0.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(disabled);
        } else if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            input.set_disabled(disabled);
        }
    }

    fn set_checked(&self, checked: bool) {
        if let Some(input) = self.0.dyn_ref::<HtmlInputElement>() {
            input.set_checked(checked);
        }
    }

    fn form_action(&self) -> String {
        self.0
            .dyn_ref::<HtmlFormElement>()
            .map(|form| form.action())
            .unwrap_or_default()
    }

    fn form_fields(&self) -> FormFields {
        let Some(form) = self.0.dyn_ref::<HtmlFormElement>() else {
            return FormFields::default();
        };
        let form_data = match FormData::new_with_form(form) {
            Ok(data) => data,
            Err(e) => {
                log::debug!("Failed to read form fields: {:?}", e);
                return FormFields::default();
            }
        };

        // Each entry is a [name, value] pair; files only travel in `form_data`
        let entries = match js_sys::try_iter(&form_data) {
            Ok(Some(entries)) => entries
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| {
                    let pair = js_sys::Array::from(&entry);
                    Some((pair.get(0).as_string()?, pair.get(1).as_string()?))
                })
                .collect(),
            _ => Vec::new(),
        };

        FormFields {
            entries,
            form_data: Some(form_data),
        }
    }

    fn submit_natively(&self) {
        if let Some(form) = self.0.dyn_ref::<HtmlFormElement>() {
            if let Err(e) = form.submit() {
                log::warn!("Native form submission failed: {:?}", e);
            }
        }
    }

    fn listen_click(&self, mut handler: Box<dyn FnMut()>) -> WebListener {
        listen(&self.0, "click", move |_| handler())
    }

    fn on_submit(&self, mut handler: Box<dyn FnMut()>) {
        listen(&self.0, "submit", move |evt| {
            evt.prevent_default();
            handler();
        })
        .forget();
    }
}

/// The live browser document
#[derive(Clone)]
pub struct WebPage {
    window: web_sys::Window,
    document: web_sys::Document,
}

impl WebPage {
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    /// Run `callback` once the document has been parsed.
    ///
    /// Fires immediately when the module loads after `DOMContentLoaded`.
    pub fn when_ready<F>(self, callback: F)
    where
        F: FnOnce(WebPage) + 'static,
    {
        if self.document.ready_state() != "loading" {
            callback(self);
            return;
        }

        let document = self.document.clone();
        let ready: Closure<dyn FnMut()> = Closure::once(move || callback(self));
        if let Err(e) = document
            .add_event_listener_with_callback("DOMContentLoaded", ready.as_ref().unchecked_ref())
        {
            log::error!("Failed to wait for DOMContentLoaded: {:?}", e);
            return;
        }
        ready.forget();
    }
}

impl Page for WebPage {
    type Element = WebElement;
    type Timer = Timeout;

    fn element_by_id(&self, id: &str) -> Option<WebElement> {
        self.document.get_element_by_id(id).map(WebElement)
    }

    fn query(&self, selector: &str) -> Option<WebElement> {
        self.document.query_selector(selector).ok().flatten().map(WebElement)
    }

    fn query_all(&self, selector: &str) -> Vec<WebElement> {
        let nodes = match self.document.query_selector_all(selector) {
            Ok(nodes) => nodes,
            Err(e) => {
                log::debug!("Invalid selector {}: {:?}", selector, e);
                return Vec::new();
            }
        };
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<web_sys::Element>().ok())
            .map(WebElement)
            .collect()
    }

    fn body(&self) -> Option<WebElement> {
        self.document.body().map(|body| WebElement(body.into()))
    }

    fn create_element(&self, tag: &str) -> Option<WebElement> {
        self.document.create_element(tag).ok().map(WebElement)
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn on_scroll(&self, mut handler: Box<dyn FnMut()>) {
        listen(&self.window, "scroll", move |_| handler()).forget();
    }

    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Timeout {
        Timeout::new(delay_ms, callback)
    }

    fn spawn(&self, future: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(future);
    }
}
