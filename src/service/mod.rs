pub mod call_initiator;
pub mod sequencer;
pub mod webhook_server;

pub use call_initiator::CallInitiator;
pub use sequencer::{SessionReport, print_banner, run_session};
pub use webhook_server::WebhookServer;
