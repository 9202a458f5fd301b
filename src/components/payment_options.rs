use crate::page::{Element, Page};

pub const PAYMENT_OPTION_SELECTOR: &str = ".payment-option";

/// Make payment options behave like one radio group.
///
/// Clicking an option clears `selected` from every option on the page, marks
/// the clicked one and checks its input. Inputs of the other options are
/// unchecked too, so the group holds even when they are not radios sharing a
/// name. Returns the number of options bound.
pub fn bind_payment_options<P: Page>(page: &P) -> usize {
    let options = page.query_all(PAYMENT_OPTION_SELECTOR);

    for option in &options {
        let handle = page.clone();
        let clicked = option.clone();
        option.on_click(Box::new(move || {
            for other in handle.query_all(PAYMENT_OPTION_SELECTOR) {
                other.set_class("selected", false);
                if let Some(input) = other.query("input") {
                    input.set_checked(false);
                }
            }
            clicked.set_class("selected", true);
            if let Some(input) = clicked.query("input") {
                input.set_checked(true);
            }
        }));
    }

    options.len()
}
