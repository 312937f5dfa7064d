use crate::config::Credentials;
use crate::error::CallError;
use crate::types::{CallResource, CreateCall, ProviderErrorBody};
use axum::http::StatusCode;
use tracing::{debug, warn};
use url::Url;

/// Provider error codes that reject the destination number.
const INVALID_DESTINATION_CODES: [u32; 5] = [21211, 21214, 21215, 21216, 21217];

/// Stateless Twilio REST endpoints.
pub struct TwilioApi;

impl TwilioApi {
    /// Create a call resource. No retry: one request, one typed outcome.
    pub async fn create_call(
        client: &reqwest::Client,
        endpoint: &Url,
        credentials: &Credentials,
        params: &CreateCall<'_>,
    ) -> Result<CallResource, CallError> {
        let resp = client
            .post(endpoint.clone())
            .basic_auth(&credentials.account_sid, Some(&credentials.auth_token))
            .header("Accept", "application/json")
            .form(params)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        debug!(%status, body_len = body.len(), "call creation response received");

        if !status.is_success() {
            return Err(classify_failure(status, &body));
        }

        serde_json::from_str::<CallResource>(&body).map_err(|e| CallError::Provider {
            status,
            code: None,
            message: format!("malformed call resource: {e}"),
        })
    }
}

/// Map a non-success response to a `CallError`.
pub fn classify_failure(status: StatusCode, body: &str) -> CallError {
    let parsed = serde_json::from_str::<ProviderErrorBody>(body).ok();
    let code = parsed.as_ref().and_then(|b| b.code);
    warn!(
        %status,
        code = ?code,
        reported_status = ?parsed.as_ref().and_then(|b| b.status),
        more_info = parsed
            .as_ref()
            .and_then(|b| b.more_info.as_deref())
            .unwrap_or("<none>"),
        "provider rejected call creation"
    );
    let message = parsed
        .and_then(|b| b.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected provider response")
                .to_string()
        });

    match (status, code) {
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => {
            CallError::Authentication { status, message }
        }
        (_, Some(code)) if INVALID_DESTINATION_CODES.contains(&code) => {
            CallError::InvalidDestination { code, message }
        }
        _ => CallError::Provider {
            status,
            code,
            message,
        },
    }
}
