//! Request extractors.
//!
//! [`ClientId`] scopes rate limiting. It is taken from proxy headers first,
//! then the peer address, and is never validated: a spoofed header only
//! spends the spoofer's own budget under a different key.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

/// Client identifier used when nothing better is available.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Opaque identifier for the calling client.
///
/// Resolution order: `X-Forwarded-For`, `X-Real-IP`, the peer IP from
/// [`ConnectInfo`], then [`UNKNOWN_CLIENT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(pub String);

impl ClientId {
    /// Resolve the identifier from request parts.
    #[must_use]
    pub fn from_parts(parts: &Parts) -> Self {
        let id = header_value(parts, "x-forwarded-for")
            .or_else(|| header_value(parts, "x-real-ip"))
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            })
            .unwrap_or_else(|| UNKNOWN_CLIENT.to_owned());

        Self(id)
    }
}

impl<S> FromRequestParts<S> for ClientId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(parts))
    }
}

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}
