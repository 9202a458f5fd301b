// Behaviors are only wired up in the browser build
#![cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]

mod app;
mod components;
mod context;
mod page;
mod services;
mod stores;
mod utils;

fn main() {
    #[cfg(target_arch = "wasm32")]
    {
        // Initialize panic hook for better error messages in browser console
        console_error_panic_hook::set_once();
        // Accept everything here; the configured level is applied once
        // settings are read from the page
        wasm_logger::init(wasm_logger::Config::new(log::Level::Trace));

        start();
    }

    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("luxwatch-storefront runs in the browser; build it for wasm32-unknown-unknown");
}

#[cfg(target_arch = "wasm32")]
fn start() {
    use std::rc::Rc;

    use context::StorefrontContext;
    use page::web::WebPage;
    use services::HttpCartApi;
    use stores::StorefrontSettings;

    let Some(page) = WebPage::new() else {
        log::error!("No window or document, storefront disabled");
        return;
    };

    page.when_ready(|page| {
        let settings = StorefrontSettings::from_page(&page);
        log::set_max_level(settings.log_level().to_level_filter());
        log::info!("Starting LuxWatch storefront");

        let api = Rc::new(HttpCartApi::new(&settings));
        let ctx = StorefrontContext::new(page, settings, api);
        app::initialize(&ctx);
    });
}
