//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect},
};
use tokio::sync::mpsc::error::TrySendError;
use tracing::warn;

use crate::domain::entities::RequestHeaders;
use crate::domain::storage::StorageBackend;
use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Visit Tracking
///
/// When stats are enabled, the request headers are queued for the background
/// visit worker. A full or closed queue drops the visit; the redirect is
/// never delayed or failed by it.
///
/// # Errors
///
/// Returns 404 Not Found if the code is malformed or unknown.
pub async fn redirect_handler<B: StorageBackend>(
    Path(code): Path<String>,
    State(state): State<AppState<B>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let link = state.link_service.resolve(&code).await?;

    if let Some(sender) = &state.visit_sender {
        let event = VisitEvent::new(link.code(), link.owner, request_headers(&headers));

        match sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => warn!(code = %code, "Visit queue full, dropping visit"),
            Err(TrySendError::Closed(_)) => {
                warn!(code = %code, "Visit queue closed, dropping visit")
            }
        }
    }

    Ok(Redirect::temporary(&link.long_url))
}

/// Copies request headers into the multi-valued map stored with a visit.
///
/// Names are lowercase; values that are not visible ASCII are skipped.
pub fn request_headers(headers: &HeaderMap) -> RequestHeaders {
    let mut out = RequestHeaders::new();
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            out.entry(name.as_str().to_string())
                .or_default()
                .push(value.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use axum::http::header::{ACCEPT, USER_AGENT};

    #[test]
    fn test_request_headers_keeps_repeated_values() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("curl/8.0"));
        headers.append(ACCEPT, HeaderValue::from_static("text/html"));
        headers.append(ACCEPT, HeaderValue::from_static("*/*"));

        let map = request_headers(&headers);

        assert_eq!(map["user-agent"], vec!["curl/8.0"]);
        assert_eq!(map["accept"], vec!["text/html", "*/*"]);
    }

    #[test]
    fn test_request_headers_skips_opaque_values() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_bytes(b"\xffbot").unwrap());

        assert!(request_headers(&headers).is_empty());
    }
}
