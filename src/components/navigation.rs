use crate::page::{Element, Page};

pub const MOBILE_TOGGLE_ID: &str = "mobileToggle";
pub const NAV_LINKS_ID: &str = "navLinks";
pub const NAVBAR_ID: &str = "navbar";

/// Open the mobile menu: toggle `active` on the burger button and the links
/// panel together. Returns false when either element is missing.
pub fn bind_mobile_toggle<P: Page>(page: &P) -> bool {
    let (Some(toggle), Some(links)) = (
        page.element_by_id(MOBILE_TOGGLE_ID),
        page.element_by_id(NAV_LINKS_ID),
    ) else {
        return false;
    };

    let button = toggle.clone();
    toggle.on_click(Box::new(move || {
        links.toggle_class("active");
        button.toggle_class("active");
    }));
    true
}

/// Mark the navbar `scrolled` once the window scrolls past `threshold`.
///
/// Runs on every scroll event; the navbar is looked up each time so a
/// navbar rendered later is still picked up.
pub fn bind_scroll_styling<P: Page>(page: &P, threshold: f64) {
    let handle = page.clone();
    page.on_scroll(Box::new(move || {
        if let Some(navbar) = handle.element_by_id(NAVBAR_ID) {
            navbar.set_class("scrolled", handle.scroll_y() > threshold);
        }
    }));
}
