use crate::error::BridgeError;
use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use url::Url;

pub const TWILIO_API_BASE: &str = "https://api.twilio.com";
pub const TWILIO_API_VERSION: &str = "2010-04-01";
pub const WEBHOOK_PATH: &str = "/twiml";

/// Environment keys that must be non-empty before anything starts.
pub const REQUIRED_KEYS: [&str; 3] = [
    "TWILIO_ACCOUNT_SID",
    "TWILIO_AUTH_TOKEN",
    "TWILIO_PHONE_NUMBER",
];

/// Keys taken verbatim as strings.
const STRING_KEYS: [&str; 6] = [
    "twilio_account_sid",
    "twilio_auth_token",
    "twilio_phone_number",
    "to_phone_number",
    "sip_server_url",
    "loglevel",
];

/// Keys parsed by figment's env provider.
const TYPED_KEYS: [&str; 7] = [
    "webhook_url",
    "webhook_bind",
    "webhook_port",
    "callback_method",
    "startup_delay_secs",
    "twilio_api_base",
    "proxy",
];

/// HTTP method the provider uses when fetching the webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CallbackMethod {
    #[serde(alias = "get", alias = "Get")]
    Get,
    #[default]
    #[serde(alias = "post", alias = "Post")]
    Post,
}

impl CallbackMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackMethod::Get => "GET",
            CallbackMethod::Post => "POST",
        }
    }
}

/// Raw settings as extracted from the environment, before validation.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_phone_number: String,
    pub to_phone_number: String,
    pub sip_server_url: String,
    pub webhook_url: Url,
    pub webhook_bind: IpAddr,
    pub webhook_port: u16,
    pub callback_method: CallbackMethod,
    pub startup_delay_secs: u64,
    pub twilio_api_base: Url,
    pub proxy: Option<Url>,
    pub loglevel: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            twilio_account_sid: String::new(),
            twilio_auth_token: String::new(),
            twilio_phone_number: String::new(),
            to_phone_number: "+1234567890".to_string(),
            sip_server_url: "sip:test@localhost:5060".to_string(),
            webhook_url: Url::parse("http://your-server.ngrok.io/twiml")
                .expect("static webhook url is valid"),
            webhook_bind: IpAddr::V4(Ipv4Addr::LOCALHOST),
            webhook_port: 5000,
            callback_method: CallbackMethod::Post,
            startup_delay_secs: 2,
            twilio_api_base: Url::parse(TWILIO_API_BASE).expect("static api base is valid"),
            proxy: None,
            loglevel: "info".to_string(),
        }
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("twilio_account_sid", &self.twilio_account_sid)
            .field("twilio_auth_token", &redact(&self.twilio_auth_token))
            .field("twilio_phone_number", &self.twilio_phone_number)
            .field("to_phone_number", &self.to_phone_number)
            .field("sip_server_url", &self.sip_server_url)
            .field("webhook_url", &self.webhook_url.as_str())
            .field("webhook_bind", &self.webhook_bind)
            .field("webhook_port", &self.webhook_port)
            .field("callback_method", &self.callback_method)
            .field("startup_delay_secs", &self.startup_delay_secs)
            .field("twilio_api_base", &self.twilio_api_base.as_str())
            .field("proxy", &self.proxy.as_ref().map(Url::as_str))
            .field("loglevel", &self.loglevel)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "<unset>" } else { "<redacted>" }
}

impl Settings {
    /// Defaults merged with the known environment variables.
    pub fn figment() -> Figment {
        // Env values like `+15550001111` would otherwise be parsed as integers.
        let verbatim: BTreeMap<&str, String> = STRING_KEYS
            .iter()
            .filter_map(|key| {
                std::env::var(key.to_ascii_uppercase())
                    .ok()
                    .map(|value| (*key, value))
            })
            .collect();

        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Env::raw().only(&TYPED_KEYS))
            .merge(Serialized::defaults(verbatim))
    }

    pub fn load() -> Result<Self, BridgeError> {
        Ok(Self::figment().extract()?)
    }

    /// Names of required keys whose values are empty or whitespace.
    pub fn missing_required(&self) -> Vec<&'static str> {
        [
            &self.twilio_account_sid,
            &self.twilio_auth_token,
            &self.twilio_phone_number,
        ]
        .into_iter()
        .zip(REQUIRED_KEYS)
        .filter(|(value, _)| value.trim().is_empty())
        .map(|(_, key)| key)
        .collect()
    }
}

/// Account credentials for the provider's REST API.
#[derive(Clone)]
pub struct Credentials {
    pub account_sid: String,
    pub auth_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &redact(&self.auth_token))
            .finish()
    }
}

/// Validated, immutable configuration shared by the responder and the initiator.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub credentials: Credentials,
    pub from_number: String,
    pub to_number: String,
    pub sip_url: String,
    pub webhook_url: Url,
    pub callback_method: CallbackMethod,
    pub listen_addr: SocketAddr,
    pub startup_delay: Duration,
    pub calls_endpoint: Url,
    pub proxy: Option<Url>,
}

impl BridgeConfig {
    pub fn from_settings(settings: Settings) -> Result<Self, BridgeError> {
        let missing = settings.missing_required();
        if !missing.is_empty() {
            return Err(BridgeError::MissingConfig(missing));
        }

        let account_sid = settings.twilio_account_sid.trim().to_string();
        let calls_endpoint = calls_endpoint(&settings.twilio_api_base, &account_sid)?;

        Ok(Self {
            credentials: Credentials {
                account_sid,
                auth_token: settings.twilio_auth_token.trim().to_string(),
            },
            from_number: settings.twilio_phone_number.trim().to_string(),
            to_number: settings.to_phone_number,
            sip_url: settings.sip_server_url,
            webhook_url: settings.webhook_url,
            callback_method: settings.callback_method,
            listen_addr: SocketAddr::new(settings.webhook_bind, settings.webhook_port),
            startup_delay: Duration::from_secs(settings.startup_delay_secs),
            calls_endpoint,
            proxy: settings.proxy,
        })
    }
}

/// `{base}/2010-04-01/Accounts/{sid}/Calls.json`, with the sid percent-encoded.
pub fn calls_endpoint(base: &Url, account_sid: &str) -> Result<Url, BridgeError> {
    if !matches!(base.scheme(), "http" | "https") {
        return Err(BridgeError::InvalidApiBase(base.to_string()));
    }
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| BridgeError::InvalidApiBase(base.to_string()))?
        .pop_if_empty()
        .extend([TWILIO_API_VERSION, "Accounts", account_sid, "Calls.json"]);
    Ok(url)
}
