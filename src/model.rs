//! Data models for the URL shortener
//!
//! This module defines the persisted `Link` record and the request/response
//! shapes exchanged with HTTP clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A short code mapped to its target URL, plus usage counters
///
/// `code` and `target` never change after creation. Only `clicks` and
/// `last_clicked` move, and only through a redirect.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Short code as the creator typed it (6-8 alphanumeric characters)
    pub code: String,

    /// Absolute http(s) URL visitors are redirected to
    pub target: String,

    /// Timestamp when this link was created
    pub created_at: DateTime<Utc>,

    /// Number of successful redirects through this link
    /// Defaults to 0 if not present during deserialization
    #[serde(default)]
    pub clicks: u64,

    /// Time of the most recent redirect, `null` until the first one
    #[serde(default)]
    pub last_clicked: Option<DateTime<Utc>>,
}

/// Request payload for creating a new short link
///
/// # Example
/// ```json
/// {
///   "target": "https://example.com/very/long/url",
///   "code": "abc123"  // Optional
/// }
/// ```
#[derive(Deserialize, Debug, Default)]
pub struct CreateRequest {
    /// The URL to shorten. Missing and empty are both rejected.
    #[serde(default)]
    pub target: Option<String>,

    /// Optional custom code; a random one is allocated when absent or empty
    #[serde(default)]
    pub code: Option<String>,
}

/// Query parameters for listing links
///
/// # Example
/// Query string: `?q=example&sort=clicks_desc`
#[derive(Deserialize, Debug, Default)]
pub struct ListParams {
    /// Case-insensitive substring matched against code or target
    pub q: Option<String>,

    /// One of `created_desc` (default), `created_asc`, `clicks_desc`, `clicks_asc`
    pub sort: Option<String>,
}

/// Envelope for a single link
#[derive(Serialize)]
pub struct LinkResponse {
    pub ok: bool,
    pub link: Link,
}

/// Envelope for a list of links
#[derive(Serialize)]
pub struct LinksResponse {
    pub ok: bool,
    pub links: Vec<Link>,
}

/// Liveness report served at `/healthz`
#[derive(Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub time: DateTime<Utc>,
}
