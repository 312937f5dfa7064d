use axum::{Router, routing::get};
use std::sync::Arc;

use crate::config::WEBHOOK_PATH;
use crate::handlers::twiml::twiml_handler;
use crate::types::DialSip;

#[derive(Clone)]
pub struct WebhookState {
    /// Rendered once; every request gets the same bytes.
    pub document: Arc<str>,
}

impl WebhookState {
    pub fn new(doc: &DialSip) -> Self {
        Self {
            document: Arc::from(doc.to_string()),
        }
    }
}

pub fn webhook_router(state: WebhookState) -> Router {
    Router::new()
        .route(WEBHOOK_PATH, get(twiml_handler).post(twiml_handler))
        .with_state(state)
}
