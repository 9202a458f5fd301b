use serde::Deserialize;

use crate::page::{Element, Page};

/// Id of the optional `<script type="application/json">` element the server
/// renders to override settings
pub const SETTINGS_ELEMENT_ID: &str = "storefrontSettings";

/// Tunables for every storefront behavior.
///
/// The defaults reproduce the shop's stock behavior. Any subset of fields can
/// be overridden from the page; missing fields keep their default.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorefrontSettings {
    /// Navbar gets the `scrolled` class past this vertical offset
    pub scroll_threshold: f64,
    /// How long server-rendered flash messages stay visible
    pub flash_visible_ms: u32,
    /// How long toasts stay visible
    pub toast_visible_ms: u32,
    /// Fade transition before a message is removed from the page
    pub fade_out_ms: u32,
    /// How long the "Added!" confirmation stays on the button
    pub confirm_window_ms: u32,

    pub loading_label: String,
    pub added_label: String,
    pub added_background: String,
    pub added_color: String,
    pub added_border_color: String,

    /// Toast text when the server confirms without a message
    pub added_message: String,
    /// Toast text when the server refuses without a message
    pub rejected_message: String,

    /// Header marking the submission as programmatic so the server answers
    /// with JSON instead of a redirect
    pub request_header: String,
    pub request_header_value: String,

    pub log_level: String,
}

impl Default for StorefrontSettings {
    fn default() -> Self {
        Self {
            scroll_threshold: 50.0,
            flash_visible_ms: 4000,
            toast_visible_ms: 3000,
            fade_out_ms: 300,
            confirm_window_ms: 2000,
            loading_label: r#"<i class="fas fa-spinner fa-spin"></i> Adding..."#.to_string(),
            added_label: r#"<i class="fas fa-check"></i> Added!"#.to_string(),
            added_background: "#4ade80".to_string(),
            added_color: "#0a0a0a".to_string(),
            added_border_color: "#4ade80".to_string(),
            added_message: "Added to cart!".to_string(),
            rejected_message: "Could not add this item to your cart.".to_string(),
            request_header: "X-Requested-With".to_string(),
            request_header_value: "XMLHttpRequest".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl StorefrontSettings {
    /// Parse settings from JSON, keeping defaults for absent fields
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from the page's settings element, if any
    pub fn from_page<P: Page>(page: &P) -> Self {
        let Some(element) = page.element_by_id(SETTINGS_ELEMENT_ID) else {
            log::debug!("No settings element, using defaults");
            return Self::default();
        };

        match Self::from_json(element.text().trim()) {
            Ok(settings) => {
                log::info!("Loaded storefront settings from page");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring invalid storefront settings: {}", e);
                Self::default()
            }
        }
    }

    /// Configured log level, `Info` if unrecognized
    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}
