use crate::models::responses::HealthResponse;
use axum::{
    extract::ConnectInfo,
    http::HeaderMap,
    response::Json,
};
use std::net::SocketAddr;

/// Prefers the first `X-Forwarded-For` hop so proxied callers see their own
/// address rather than the proxy's.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn health_check(
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
) -> Json<HealthResponse> {
    let peer = connect_info.map(|ConnectInfo(addr)| addr);

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        client_ip: client_ip(&headers, peer),
    })
}
