use axum::{
    body::Bytes,
    extract::State,
    http::{Method, Uri, header},
    response::IntoResponse,
};
use tracing::info;

use crate::router::WebhookState;

pub const TWIML_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// GET|POST /twiml -> the fixed call-control document.
pub async fn twiml_handler(
    State(state): State<WebhookState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> impl IntoResponse {
    // POST callbacks carry the call parameters in a form body, GET in the query.
    let params: &[u8] = if method == Method::POST {
        &body
    } else {
        uri.query().unwrap_or_default().as_bytes()
    };
    let (call_sid, call_status) = callback_fields(params);
    info!(
        %method,
        call_sid = call_sid.as_deref().unwrap_or("<none>"),
        call_status = call_status.as_deref().unwrap_or("<none>"),
        "serving call-control document"
    );

    (
        [(header::CONTENT_TYPE, TWIML_CONTENT_TYPE)],
        state.document.to_string(),
    )
}

fn callback_fields(params: &[u8]) -> (Option<String>, Option<String>) {
    let mut sid = None;
    let mut status = None;
    for (k, v) in url::form_urlencoded::parse(params) {
        match k.as_ref() {
            "CallSid" => sid = Some(v.into_owned()),
            "CallStatus" => status = Some(v.into_owned()),
            _ => {}
        }
    }
    (sid, status)
}
