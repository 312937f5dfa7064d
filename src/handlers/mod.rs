pub mod twiml;
