//! Client network address resolution.
//!
//! The server always sits behind at least one proxy, so the peer socket
//! address is useless for attribution; the address comes from forwarding
//! headers instead. Single-value headers win over `X-Forwarded-For`,
//! which can carry a whole chain.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;

/// Headers that carry exactly one client address, in priority order.
const PRIMARY_HEADERS: [&str; 4] = [
    "x-nf-client-connection-ip",
    "x-real-ip",
    "true-client-ip",
    "x-client-ip",
];

/// Placeholder identity when no forwarding header is present. Guests
/// behind it share one quota bucket.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// The client's network address, used as the guest quota identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

/// Resolve the client address from forwarding headers.
pub fn resolve_client_ip(headers: &HeaderMap) -> String {
    for header in PRIMARY_HEADERS {
        if let Some(value) = headers.get(header).and_then(|v| v.to_str().ok()) {
            if let Some(first) = value.split(',').next().map(str::trim) {
                if !first.is_empty() {
                    return first.to_string();
                }
            }
        }
    }

    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next().map(str::trim) {
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    UNKNOWN_CLIENT.to_string()
}

impl<S: Send + Sync> FromRequestParts<S> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientIp(resolve_client_ip(&parts.headers)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                axum::http::HeaderName::try_from(*name).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn platform_header_wins_over_forwarded_chain() {
        let map = headers(&[
            ("x-forwarded-for", "10.0.0.1, 10.0.0.2"),
            ("x-nf-client-connection-ip", "203.0.113.7"),
        ]);
        assert_eq!(resolve_client_ip(&map), "203.0.113.7");
    }

    #[test]
    fn forwarded_for_takes_first_entry() {
        let map = headers(&[("x-forwarded-for", " 203.0.113.7 , 10.0.0.2")]);
        assert_eq!(resolve_client_ip(&map), "203.0.113.7");
    }

    #[test]
    fn real_ip_beats_forwarded_for() {
        let map = headers(&[
            ("x-real-ip", "198.51.100.4"),
            ("x-forwarded-for", "10.0.0.1"),
        ]);
        assert_eq!(resolve_client_ip(&map), "198.51.100.4");
    }

    #[test]
    fn no_headers_is_unknown() {
        assert_eq!(resolve_client_ip(&HeaderMap::new()), UNKNOWN_CLIENT);
    }
}
