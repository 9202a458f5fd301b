// Storefront behaviors
// Each module binds one interactive affordance to server-rendered markup

pub mod add_to_cart;
pub mod flash_messages;
pub mod navigation;
pub mod payment_options;
pub mod toast;

pub use add_to_cart::bind_add_to_cart_forms;
pub use flash_messages::bind_flash_messages;
pub use navigation::{bind_mobile_toggle, bind_scroll_styling};
pub use payment_options::bind_payment_options;
