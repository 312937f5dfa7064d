pub mod call;
pub mod twiml;

pub use call::{CallResource, CreateCall, ProviderErrorBody};
pub use twiml::DialSip;
