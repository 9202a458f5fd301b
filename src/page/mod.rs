//! Page interface
//!
//! Storefront behaviors never reach for `web_sys::window()` themselves. They
//! receive a [`Page`] and work with its [`Element`] handles, which keeps every
//! handler testable without a browser. The real implementation is
//! [`web::WebPage`]; tests use `mock::MockPage`.

use futures::future::LocalBoxFuture;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
pub mod mock;

/// Handle to a scheduled callback. Dropping the handle cancels the callback.
pub trait Timer: 'static {
    /// Detach the handle so the callback still fires after it is dropped.
    fn forget(self);
}

/// Handle to an event listener. Dropping the handle detaches the listener.
pub trait Listener: 'static {
    /// Keep the listener attached for the lifetime of the page.
    fn forget(self);
}

/// What a form would submit
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormFields {
    /// Text entries as name/value pairs
    pub entries: Vec<(String, String)>,
    /// The browser's own `FormData` for the form, file entries included
    #[cfg(target_arch = "wasm32")]
    pub form_data: Option<web_sys::FormData>,
}

/// A single element of the page.
///
/// Operations on elements that do not support them (checking a `div`,
/// submitting something that is not a form) are silently ignored.
pub trait Element: Clone + PartialEq + 'static {
    type Listener: Listener;

    /// First descendant matching a CSS selector
    fn query(&self, selector: &str) -> Option<Self>;

    fn append_child(&self, child: &Self);

    /// Detach the element from the page
    fn remove(&self);

    /// Add (`present = true`) or remove a class
    fn set_class(&self, class: &str, present: bool);

    /// Flip a class, returning whether it is now present
    fn toggle_class(&self, class: &str) -> bool;

    fn set_class_name(&self, class_name: &str);
    fn set_id(&self, id: &str);

    /// Text content; markup is not interpreted
    fn text(&self) -> String;
    fn set_text(&self, text: &str);

    fn inner_html(&self) -> String;
    fn set_inner_html(&self, html: &str);

    /// Set an inline style property (CSS name). An empty value clears it.
    fn set_style(&self, property: &str, value: &str);

    fn set_disabled(&self, disabled: bool);
    fn set_checked(&self, checked: bool);

    /// Resolved `action` URL of a form
    fn form_action(&self) -> String;

    fn form_fields(&self) -> FormFields;

    /// Submit a form the conventional way, without firing `submit` listeners
    fn submit_natively(&self);

    /// Listen for clicks until the returned handle is dropped
    fn listen_click(&self, handler: Box<dyn FnMut()>) -> Self::Listener;

    fn on_click(&self, handler: Box<dyn FnMut()>) {
        self.listen_click(handler).forget();
    }

    /// Listen for form submission. The default navigation is prevented before
    /// the handler runs.
    fn on_submit(&self, handler: Box<dyn FnMut()>);
}

/// The document plus the event loop facilities behaviors need.
pub trait Page: Clone + 'static {
    type Element: Element;
    type Timer: Timer;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// First element in the document matching a CSS selector
    fn query(&self, selector: &str) -> Option<Self::Element>;

    /// All elements matching a CSS selector, in document order
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    fn body(&self) -> Option<Self::Element>;
    fn create_element(&self, tag: &str) -> Option<Self::Element>;

    /// Vertical scroll offset of the window
    fn scroll_y(&self) -> f64;

    fn on_scroll(&self, handler: Box<dyn FnMut()>);

    /// Run `callback` once after `delay_ms` unless the returned handle is
    /// dropped first.
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> Self::Timer;

    /// Run a future to completion on the UI thread
    fn spawn(&self, future: LocalBoxFuture<'static, ()>);
}
