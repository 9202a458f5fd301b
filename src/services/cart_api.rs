//! Add-to-cart HTTP client
//!
//! The storefront posts add-to-cart forms in the background and expects a
//! small JSON document back. Every way that can fail without a usable answer
//! is a [`SubmitError`]; a refusal from the shop is a normal
//! [`CartResponse`] with `success: false`.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::page::FormFields;

/// One add-to-cart submission, captured when the form is submitted
#[derive(Clone, Debug, PartialEq)]
pub struct CartRequest {
    /// Form `action` URL
    pub action: String,
    /// Form fields, sent as multipart form data
    pub fields: FormFields,
}

/// JSON answer of the cart endpoints.
///
/// Unknown fields (the update endpoint also sends totals) are ignored.
/// `success` follows JavaScript truthiness, so `1` or `"yes"` count as
/// success; a `message` that is not a string is treated as absent.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CartResponse {
    #[serde(default, deserialize_with = "truthy")]
    pub success: bool,
    #[serde(default)]
    pub cart_count: Option<Value>,
    #[serde(default, deserialize_with = "string_or_none")]
    pub message: Option<String>,
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

impl CartResponse {
    /// Cart count as badge text.
    ///
    /// Numbers render without a trailing `.0`, strings verbatim. `None` when
    /// the count is missing or not a scalar.
    pub fn cart_count_text(&self) -> Option<String> {
        match self.cart_count.as_ref()? {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(i.to_string())
                } else if let Some(u) = n.as_u64() {
                    Some(u.to_string())
                } else {
                    n.as_f64().map(|f| {
                        if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                            (f as i64).to_string()
                        } else {
                            f.to_string()
                        }
                    })
                }
            }
            Value::String(s) => Some(s.clone()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Server message, if it sent a non-empty one
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

/// Why a submission produced no usable answer
#[derive(Clone, Debug, PartialEq)]
pub enum SubmitError {
    /// The request could not be built
    Request(String),
    /// Transport failure: offline, DNS, CORS, aborted
    Network(String),
    /// Non-2xx HTTP status
    Status(u16),
    /// Body is not the expected JSON
    Malformed(String),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(e) => write!(f, "Failed to build request: {}", e),
            Self::Network(e) => write!(f, "Network error: {}", e),
            Self::Status(code) => write!(f, "HTTP error: {}", code),
            Self::Malformed(e) => write!(f, "Failed to parse response: {}", e),
        }
    }
}

impl std::error::Error for SubmitError {}

/// Parse a response body
pub fn parse_response(body: &str) -> Result<CartResponse, SubmitError> {
    serde_json::from_str(body).map_err(|e| SubmitError::Malformed(e.to_string()))
}

#[async_trait(?Send)]
pub trait CartApi {
    async fn add_to_cart(&self, request: CartRequest) -> Result<CartResponse, SubmitError>;
}

/// Browser client: `fetch` with a `FormData` body
#[cfg(target_arch = "wasm32")]
pub struct HttpCartApi {
    header: String,
    header_value: String,
}

#[cfg(target_arch = "wasm32")]
impl HttpCartApi {
    pub fn new(settings: &crate::stores::StorefrontSettings) -> Self {
        Self {
            header: settings.request_header.clone(),
            header_value: settings.request_header_value.clone(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl CartApi for HttpCartApi {
    async fn add_to_cart(&self, request: CartRequest) -> Result<CartResponse, SubmitError> {
        use web_sys::FormData;

        // Post the form's own FormData when there is one so file entries survive
        let form_data = match request.fields.form_data {
            Some(form_data) => form_data,
            None => {
                let form_data = FormData::new().map_err(|e| SubmitError::Request(format!("{:?}", e)))?;
                for (name, value) in &request.fields.entries {
                    form_data
                        .append_with_str(name, value)
                        .map_err(|e| SubmitError::Request(format!("{:?}", e)))?;
                }
                form_data
            }
        };

        let response = gloo_net::http::Request::post(&request.action)
            .header(&self.header, &self.header_value)
            .body(form_data)
            .map_err(|e| SubmitError::Request(e.to_string()))?
            .send()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        if !response.ok() {
            return Err(SubmitError::Status(response.status()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SubmitError::Network(e.to_string()))?;

        parse_response(&body)
    }
}
