pub mod twilio_api;

pub use twilio_api::TwilioApi;
