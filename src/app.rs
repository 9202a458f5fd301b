use crate::components::{
    bind_add_to_cart_forms, bind_flash_messages, bind_mobile_toggle, bind_payment_options,
    bind_scroll_styling,
};
use crate::context::StorefrontContext;
use crate::page::Page;

/// What the initializer found on the page
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Bindings {
    pub mobile_toggle: bool,
    pub flash_messages: usize,
    pub cart_forms: usize,
    pub payment_options: usize,
}

/// Wire every storefront behavior to the current page.
///
/// Call once the document is parsed. Missing elements are skipped.
pub fn initialize<P: Page>(ctx: &StorefrontContext<P>) -> Bindings {
    let page = &ctx.page;
    let settings = &ctx.settings;

    let bindings = Bindings {
        mobile_toggle: bind_mobile_toggle(page),
        flash_messages: bind_flash_messages(page, settings),
        cart_forms: bind_add_to_cart_forms(ctx),
        payment_options: bind_payment_options(page),
    };
    bind_scroll_styling(page, settings.scroll_threshold);

    log::info!(
        "Storefront ready: mobile menu {}, {} flash messages, {} cart forms, {} payment options",
        if bindings.mobile_toggle { "bound" } else { "absent" },
        bindings.flash_messages,
        bindings.cart_forms,
        bindings.payment_options
    );

    bindings
}
