use std::cell::RefCell;
use std::rc::Rc;

use crate::components::flash_messages::fade_out;
use crate::page::{Element, Page};
use crate::stores::StorefrontSettings;
use crate::utils::TimerSlot;

/// Holder for flash messages and toasts; at most one per page
pub const TOAST_CONTAINER_CLASS: &str = "messages-container";

const CLOSE_ICON: &str = r#"<i class="fas fa-times"></i>"#;

/// Visual style of a toast
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    pub fn class_name(&self) -> &'static str {
        match self {
            ToastKind::Success => "message message-success",
            ToastKind::Error => "message message-error",
        }
    }
}

/// Find the page's toast container, creating it under `body` if missing
fn toast_container<P: Page>(page: &P) -> Option<P::Element> {
    if let Some(container) = page.query(&format!(".{}", TOAST_CONTAINER_CLASS)) {
        return Some(container);
    }

    let container = page.create_element("div")?;
    container.set_class_name(TOAST_CONTAINER_CLASS);
    page.body()?.append_child(&container);
    Some(container)
}

/// Show a self-dismissing notification.
///
/// The toast fades after `toast_visible_ms` and leaves the page
/// `fade_out_ms` later. Its close button removes it at once and cancels
/// both timers. The close listener is detached whichever way the toast
/// leaves. Every call appends a new toast.
pub fn show_toast<P: Page>(
    page: &P,
    settings: &StorefrontSettings,
    message: &str,
    kind: ToastKind,
) -> Option<P::Element> {
    let Some(container) = toast_container(page) else {
        log::debug!("No place to show toast: {}", message);
        return None;
    };

    let toast = page.create_element("div")?;
    toast.set_class_name(kind.class_name());

    let text = page.create_element("span")?;
    text.set_text(message);
    toast.append_child(&text);

    let close = page.create_element("button")?;
    close.set_class_name("message-close");
    close.set_inner_html(CLOSE_ICON);
    toast.append_child(&close);

    container.append_child(&toast);
    log::debug!("Showing toast: {}", message);

    let fade = TimerSlot::<P>::new();
    let removal = TimerSlot::<P>::new();
    let close_listener: Rc<RefCell<Option<<P::Element as Element>::Listener>>> =
        Rc::new(RefCell::new(None));

    {
        let toast = toast.clone();
        let fade = fade.clone();
        let removal = removal.clone();
        let close_listener_slot = Rc::clone(&close_listener);
        let listener = close.listen_click(Box::new(move || {
            fade.cancel();
            removal.cancel();
            toast.remove();
            let detached = close_listener_slot.borrow_mut().take();
            drop(detached);
        }));
        *close_listener.borrow_mut() = Some(listener);
    }

    let page_for_removal = page.clone();
    let fading = toast.clone();
    let fade_ms = settings.fade_out_ms;
    fade.schedule(page, settings.toast_visible_ms, move || {
        fade_out(&fading);
        removal.schedule(&page_for_removal, fade_ms, move || {
            fading.remove();
            let detached = close_listener.borrow_mut().take();
            drop(detached);
        });
    });

    Some(toast)
}
