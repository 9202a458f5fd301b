use crate::page::{Element, Page, Timer};
use crate::stores::StorefrontSettings;

/// Server-rendered one-time notifications
pub const FLASH_MESSAGE_SELECTOR: &str = ".message";

/// Slide-out applied while a message fades
const FADE_TRANSFORM: &str = "translateX(30px)";

/// Start the fade-out transition on a message element
pub fn fade_out<E: Element>(message: &E) {
    message.set_style("opacity", "0");
    message.set_style("transform", FADE_TRANSFORM);
}

/// Schedule auto-dismissal of the flash messages present right now.
///
/// Messages added later (toasts) are not affected. Returns how many were
/// scheduled.
pub fn bind_flash_messages<P: Page>(page: &P, settings: &StorefrontSettings) -> usize {
    let messages = page.query_all(FLASH_MESSAGE_SELECTOR);
    let fade_ms = settings.fade_out_ms;

    for message in &messages {
        let page_for_removal = page.clone();
        let message = message.clone();

        page.set_timeout(
            settings.flash_visible_ms,
            Box::new(move || {
                fade_out(&message);
                page_for_removal
                    .set_timeout(fade_ms, Box::new(move || message.remove()))
                    .forget();
            }),
        )
        .forget();
    }

    messages.len()
}
