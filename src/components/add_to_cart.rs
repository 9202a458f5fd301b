//! Background add-to-cart submission
//!
//! Add-to-cart forms are posted with `fetch` instead of navigating. The
//! submit button shows a spinner while the request is in flight, then a short
//! "Added!" confirmation before returning to its original label. When the
//! request fails outright the form is submitted the conventional way so the
//! shopper is never stuck.

use std::cell::RefCell;
use std::rc::Rc;

use crate::components::toast::{show_toast, ToastKind};
use crate::context::StorefrontContext;
use crate::page::{Element, Page};
use crate::services::{CartRequest, CartResponse, SubmitError};
use crate::utils::TimerSlot;

pub const ADD_TO_CART_FORM_SELECTOR: &str = "form.add-to-cart-form";
pub const CART_BADGE_ID: &str = "cartBadge";
pub const CART_ICON_SELECTOR: &str = ".cart-icon";

/// Inline styles applied while the "Added!" confirmation shows
const CONFIRM_STYLES: [&str; 3] = ["background", "color", "border-color"];

/// Set the cart badge text, creating the badge under the cart icon on first
/// use. Returns `None` when there is neither a badge nor a cart icon.
pub fn update_cart_badge<P: Page>(page: &P, count: &str) -> Option<P::Element> {
    if let Some(badge) = page.element_by_id(CART_BADGE_ID) {
        badge.set_text(count);
        return Some(badge);
    }

    let icon = page.query(CART_ICON_SELECTOR)?;
    let badge = page.create_element("span")?;
    badge.set_class_name("cart-badge");
    badge.set_id(CART_BADGE_ID);
    badge.set_text(count);
    icon.append_child(&badge);
    Some(badge)
}

/// Temporary label and state of a submit button
struct ButtonTransition<E: Element> {
    button: E,
    /// Label captured when the first outstanding attempt began
    original_label: Option<String>,
}

impl<E: Element> ButtonTransition<E> {
    fn new(button: E) -> Self {
        Self {
            button,
            original_label: None,
        }
    }

    fn begin(&mut self, loading_label: &str) {
        // A restore may still be owed from an earlier attempt; keep its label
        if self.original_label.is_none() {
            self.original_label = Some(self.button.inner_html());
        }
        self.button.set_inner_html(loading_label);
        self.button.set_disabled(true);
    }

    fn confirm(&self, label: &str, styles: [&str; 3]) {
        self.button.set_inner_html(label);
        for (property, value) in CONFIRM_STYLES.iter().zip(styles) {
            self.button.set_style(property, value);
        }
    }

    fn restore(&mut self) {
        if let Some(label) = self.original_label.take() {
            self.button.set_inner_html(&label);
        }
        self.button.set_disabled(false);
        for property in CONFIRM_STYLES {
            self.button.set_style(property, "");
        }
    }
}

/// One bound add-to-cart form
struct CartForm<P: Page> {
    ctx: StorefrontContext<P>,
    form: P::Element,
    button: RefCell<ButtonTransition<P::Element>>,
    restore: TimerSlot<P>,
}

impl<P: Page> CartForm<P> {
    fn submit(self: &Rc<Self>) {
        self.restore.cancel();
        self.button.borrow_mut().begin(&self.ctx.settings.loading_label);

        let request = CartRequest {
            action: self.form.form_action(),
            fields: self.form.form_fields(),
        };
        log::info!("Adding to cart via {}", request.action);

        let form = Rc::clone(self);
        let api = Rc::clone(&self.ctx.api);
        self.ctx.page.spawn(Box::pin(async move {
            let outcome = api.add_to_cart(request).await;
            form.settle(outcome);
        }));
    }

    fn settle(self: &Rc<Self>, outcome: Result<CartResponse, SubmitError>) {
        match outcome {
            Ok(response) if response.success => self.confirm(&response),
            Ok(response) => self.reject(&response),
            Err(e) => self.fall_back(&e),
        }
    }

    fn confirm(self: &Rc<Self>, response: &CartResponse) {
        let settings = &self.ctx.settings;

        self.button.borrow().confirm(
            &settings.added_label,
            [
                &settings.added_background,
                &settings.added_color,
                &settings.added_border_color,
            ],
        );

        if let Some(count) = response.cart_count_text() {
            update_cart_badge(&self.ctx.page, &count);
        }

        let message = response.message().unwrap_or(&settings.added_message);
        show_toast(&self.ctx.page, settings, message, ToastKind::Success);

        let form = Rc::clone(self);
        self.restore.schedule(&self.ctx.page, settings.confirm_window_ms, move || {
            form.button.borrow_mut().restore();
        });
    }

    fn reject(&self, response: &CartResponse) {
        let settings = &self.ctx.settings;
        let message = response.message().unwrap_or(&settings.rejected_message);
        log::info!("Shop refused add to cart: {}", message);

        self.button.borrow_mut().restore();
        show_toast(&self.ctx.page, settings, message, ToastKind::Error);
    }

    fn fall_back(&self, error: &SubmitError) {
        log::warn!("Add to cart failed, submitting form normally: {}", error);

        self.button.borrow_mut().restore();
        self.form.submit_natively();
    }
}

/// Intercept every add-to-cart form that has a submit button.
///
/// Forms without a button are left alone and submit normally. Returns the
/// number of forms bound.
pub fn bind_add_to_cart_forms<P: Page>(ctx: &StorefrontContext<P>) -> usize {
    let mut bound = 0;

    for form in ctx.page.query_all(ADD_TO_CART_FORM_SELECTOR) {
        let Some(button) = form.query("button") else {
            log::debug!("Add-to-cart form without a button, leaving it native");
            continue;
        };

        let cart_form = Rc::new(CartForm {
            ctx: ctx.clone(),
            form: form.clone(),
            button: RefCell::new(ButtonTransition::new(button)),
            restore: TimerSlot::new(),
        });
        form.on_submit(Box::new(move || cart_form.submit()));
        bound += 1;
    }

    bound
}
