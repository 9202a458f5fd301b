// Services talking to the shop backend

pub mod cart_api;

pub use cart_api::{CartApi, CartRequest, CartResponse, SubmitError};

#[cfg(target_arch = "wasm32")]
pub use cart_api::HttpCartApi;

#[cfg(test)]
pub use cart_api::mock;
