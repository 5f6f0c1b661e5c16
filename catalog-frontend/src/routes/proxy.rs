use crate::error::ClientError;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

/// Relays `/api/Catalog/Filter_Book` to the catalog API so browser code can
/// use a same-origin relative path.
pub async fn filter_book_proxy(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ClientError> {
    let upstream = state.api.forward_filter(body.to_vec()).await?;

    let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    let mut response = (status, upstream.body).into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, content_type);
    Ok(response)
}
