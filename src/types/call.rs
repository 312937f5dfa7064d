use serde::{Deserialize, Serialize};

/// Form parameters of a call-creation request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateCall<'a> {
    #[serde(rename = "To")]
    pub to: &'a str,
    #[serde(rename = "From")]
    pub from: &'a str,
    #[serde(rename = "Url")]
    pub url: &'a str,
    #[serde(rename = "Method")]
    pub method: &'a str,
}

/// Call resource returned by the provider on success. Only the fields we report are kept.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CallResource {
    pub sid: String,
    pub status: String,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
}

/// Provider error payload, e.g. `{"code": 21211, "message": "...", "status": 400}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderErrorBody {
    #[serde(default)]
    pub code: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub more_info: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
}
