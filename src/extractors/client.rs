//! Client details used to attribute blog views when the body leaves them out.

use async_trait::async_trait;
use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use std::net::SocketAddr;

pub const FORWARDED_FOR_HEADER: &str = "X-Forwarded-For";

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClientInfo {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

fn header_str(headers: &HeaderMap, name: impl header::AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl ClientInfo {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        // first hop is the client
        let ip_address = header_str(headers, FORWARDED_FOR_HEADER)
            .and_then(|v| v.split(',').next().map(|s| s.trim().to_string()))
            .filter(|s| !s.is_empty())
            .or_else(|| header_str(headers, "X-Real-IP"));
        ClientInfo {
            ip_address,
            user_agent: header_str(headers, header::USER_AGENT),
            referrer: header_str(headers, header::REFERER),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let mut info = ClientInfo::from_headers(&parts.headers);
        if info.ip_address.is_none() {
            // no proxy in front: the socket peer is the client
            info.ip_address = parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string());
        }
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request};

    async fn extract(req: Request<()>) -> ClientInfo {
        let (mut parts, _) = req.into_parts();
        ClientInfo::from_request_parts(&mut parts, &()).await.unwrap()
    }

    #[test]
    fn reads_forwarded_client_and_agent() {
        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_FOR_HEADER, HeaderValue::from_static("203.0.113.9, 10.0.0.1"));
        headers.insert(header::USER_AGENT, HeaderValue::from_static("curl/8.0"));
        let info = ClientInfo::from_headers(&headers);
        assert_eq!(info.ip_address.as_deref(), Some("203.0.113.9"));
        assert_eq!(info.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(info.referrer, None);
    }

    #[test]
    fn falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Real-IP", HeaderValue::from_static("198.51.100.4"));
        assert_eq!(ClientInfo::from_headers(&headers).ip_address.as_deref(), Some("198.51.100.4"));
        assert_eq!(ClientInfo::from_headers(&HeaderMap::new()), ClientInfo::default());
    }

    #[tokio::test]
    async fn uses_peer_address_without_proxy_headers() {
        let peer: SocketAddr = "192.0.2.7:51234".parse().unwrap();
        let mut req = Request::builder().uri("/").body(()).unwrap();
        req.extensions_mut().insert(ConnectInfo(peer));
        assert_eq!(extract(req).await.ip_address.as_deref(), Some("192.0.2.7"));
    }

    #[tokio::test]
    async fn proxy_headers_win_over_peer_address() {
        let peer: SocketAddr = "10.0.0.1:443".parse().unwrap();
        let mut req = Request::builder()
            .uri("/")
            .header(FORWARDED_FOR_HEADER, "203.0.113.9")
            .body(())
            .unwrap();
        req.extensions_mut().insert(ConnectInfo(peer));
        assert_eq!(extract(req).await.ip_address.as_deref(), Some("203.0.113.9"));

        let bare = Request::builder().uri("/").body(()).unwrap();
        assert_eq!(extract(bare).await.ip_address, None);
    }
}
