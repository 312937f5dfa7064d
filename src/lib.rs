pub mod api;
pub mod config;
pub mod console;
pub mod error;
pub mod handlers;
pub mod router;
pub mod service;
pub mod types;

pub use config::{BridgeConfig, Settings};
pub use error::{BridgeError, CallError};
pub use service::{SessionReport, WebhookServer};
