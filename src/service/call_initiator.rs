use crate::api::TwilioApi;
use crate::config::{BridgeConfig, CallbackMethod, Credentials};
use crate::error::{BridgeError, CallError};
use crate::types::{CallResource, CreateCall};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

const USER_AGENT: &str = concat!("sip-dial-bridge/", env!("CARGO_PKG_VERSION"));

/// Places the single outbound call of a session.
pub struct CallInitiator {
    client: reqwest::Client,
    endpoint: Url,
    credentials: Credentials,
    to: String,
    from: String,
    callback_url: Url,
    callback_method: CallbackMethod,
}

impl CallInitiator {
    pub fn new(cfg: &BridgeConfig) -> Result<Self, BridgeError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15));
        if let Some(proxy_url) = cfg.proxy.as_ref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            endpoint: cfg.calls_endpoint.clone(),
            credentials: cfg.credentials.clone(),
            to: cfg.to_number.clone(),
            from: cfg.from_number.clone(),
            callback_url: cfg.webhook_url.clone(),
            callback_method: cfg.callback_method,
        })
    }

    pub async fn place_call(&self) -> Result<CallResource, CallError> {
        let params = CreateCall {
            to: &self.to,
            from: &self.from,
            url: self.callback_url.as_str(),
            method: self.callback_method.as_str(),
        };
        info!(
            to = %self.to,
            from = %self.from,
            callback = %self.callback_url,
            method = self.callback_method.as_str(),
            "creating outbound call"
        );

        let result =
            TwilioApi::create_call(&self.client, &self.endpoint, &self.credentials, &params).await;
        match &result {
            Ok(call) => info!(
                sid = %call.sid,
                status = %call.status,
                to = call.to.as_deref().unwrap_or("<unknown>"),
                from = call.from.as_deref().unwrap_or("<unknown>"),
                direction = call.direction.as_deref().unwrap_or("<unknown>"),
                "call created"
            ),
            Err(e) => warn!(kind = e.kind(), error = %e, "call creation failed"),
        }
        result
    }
}
