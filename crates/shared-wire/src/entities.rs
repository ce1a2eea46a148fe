//! # Domain Data Objects
//!
//! The request/response value objects carried across the bus.
//!
//! Every field is `#[serde(default)]` so decoding is total over the declared
//! field set: a wire value missing a field yields the default, a wire value
//! carrying extra fields is accepted and the extras dropped.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// String multimap used for headers, query params, and form attributes.
///
/// `BTreeMap` keeps encoding deterministic, which keeps logs and test
/// fixtures stable.
pub type Fields = BTreeMap<String, String>;

/// An HTTP-shaped request forwarded to a remote service.
///
/// Opaque to the proxy machinery: created by the caller immediately before
/// send, encoded once, and discarded after the send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientRequest {
    /// Request path, e.g. `/content/page.html`.
    pub path: String,

    /// HTTP method name. Defaults to `GET`.
    pub method: String,

    /// Request headers.
    pub headers: Fields,

    /// Query parameters.
    pub params: Fields,

    /// Form attributes (POST bodies of form submissions).
    pub form_attributes: Fields,
}

impl Default for ClientRequest {
    fn default() -> Self {
        Self {
            path: String::new(),
            method: "GET".to_string(),
            headers: Fields::new(),
            params: Fields::new(),
            form_attributes: Fields::new(),
        }
    }
}

impl ClientRequest {
    /// Convenience constructor for a GET request to `path`.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

/// The response a remote service produces for a [`ClientRequest`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientResponse {
    /// HTTP status code. `0` means "not set".
    pub status_code: u16,

    /// Response headers.
    pub headers: Fields,

    /// Response body.
    pub body: String,
}

impl ClientResponse {
    /// Convenience constructor for a bodied response with a status code.
    #[must_use]
    pub fn with_status(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            headers: Fields::new(),
            body: body.into(),
        }
    }
}
