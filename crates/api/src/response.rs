//! Shared response envelope types for API handlers.
//!
//! Success envelopes vary by endpoint family; the fixed shapes live here.
//! Entity-keyed payloads (`{"success": true, "project": ...}`) are built with
//! `serde_json::json!` at the call site because the key tracks the resource.

use serde::Serialize;

/// `{ "message": ... }` envelope for 201 Created acknowledgements.
#[derive(Debug, Serialize)]
pub struct CreatedMessage {
    pub message: &'static str,
}

/// `{ "success": ..., "message": ... }` acknowledgement envelope.
#[derive(Debug, Serialize)]
pub struct Acknowledgement {
    pub success: bool,
    pub message: &'static str,
}

/// `{ "token": ... }` envelope returned by login.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
