//! Custom Axum extractors

use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::{ConnectInfo, FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::{ApiError, RecordApiError};
use super::server::AppState;

/// Query string for record routes; decode failures answer `{"error": ...}`
pub struct RecordQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for RecordQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = RecordApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(params))
    }
}

/// `{key}` path segment; decode failures answer `{"status": "error", ...}`
pub struct KeyPath(pub String);

impl<S> FromRequestParts<S> for KeyPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(key) = Path::<String>::from_request_parts(parts, state).await?;
        Ok(Self(key))
    }
}

/// JSON body that never rejects.
///
/// A missing, non-JSON or malformed body yields `T::default()`, so handlers
/// report the missing fields in their own error format.
pub struct LenientJson<T>(pub T);

impl<T, S> FromRequest<S> for LenientJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(%rejection, "unusable JSON body, treating as empty");
                Ok(Self(T::default()))
            }
        }
    }
}

/// Client address, honoring `X-Forwarded-For` when proxies are trusted
pub struct ClientIp(pub Option<IpAddr>);

impl FromRequestParts<Arc<AppState>> for ClientIp {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if state.trust_proxy {
            if let Some(ip) = forwarded_for(&parts.headers) {
                return Ok(Self(Some(ip)));
            }
        }

        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| canonical(addr.ip()));

        Ok(Self(peer))
    }
}

/// Left-most parseable address of `X-Forwarded-For`.
fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    let header = headers.get("x-forwarded-for")?.to_str().ok()?;
    header
        .split(',')
        .next()
        .and_then(|first| first.trim().parse::<IpAddr>().ok())
        .map(canonical)
}

/// IPv4-mapped IPv6 addresses are reported as plain IPv4.
fn canonical(ip: IpAddr) -> IpAddr {
    match ip {
        IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4).unwrap_or(ip),
        v4 => v4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert("x-forwarded-for", HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn takes_left_most_forwarded_address() {
        let ip = forwarded_for(&headers("203.0.113.7, 10.0.0.1")).unwrap();
        assert_eq!(ip.to_string(), "203.0.113.7");
    }

    #[test]
    fn ignores_garbage_header() {
        assert!(forwarded_for(&headers("unknown")).is_none());
        assert!(forwarded_for(&HeaderMap::new()).is_none());
    }

    #[test]
    fn unmaps_ipv4_mapped_ipv6() {
        let ip: IpAddr = "::ffff:192.0.2.1".parse().unwrap();
        assert_eq!(canonical(ip).to_string(), "192.0.2.1");
        let ip: IpAddr = "2001:db8::1".parse().unwrap();
        assert_eq!(canonical(ip), ip);
    }
}
