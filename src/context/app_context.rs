//! Storefront Context
//!
//! Bundles what every behavior needs: the page it works on, the settings and
//! the cart API. Handlers receive it by injection rather than through globals.

use std::rc::Rc;

use crate::page::Page;
use crate::services::CartApi;
use crate::stores::StorefrontSettings;

pub struct StorefrontContext<P: Page> {
    pub page: P,
    pub settings: Rc<StorefrontSettings>,
    pub api: Rc<dyn CartApi>,
}

impl<P: Page> StorefrontContext<P> {
    pub fn new(page: P, settings: StorefrontSettings, api: Rc<dyn CartApi>) -> Self {
        Self {
            page,
            settings: Rc::new(settings),
            api,
        }
    }
}

impl<P: Page> Clone for StorefrontContext<P> {
    fn clone(&self) -> Self {
        Self {
            page: self.page.clone(),
            settings: Rc::clone(&self.settings),
            api: Rc::clone(&self.api),
        }
    }
}
