use crate::config::{BridgeConfig, Settings, WEBHOOK_PATH};
use crate::console::{Confirmation, Console};
use crate::error::{BridgeError, CallError};
use crate::router::WebhookState;
use crate::service::{CallInitiator, WebhookServer};
use crate::types::{CallResource, DialSip};
use std::io::{self, Write};
use std::net::SocketAddr;
use tokio::io::AsyncBufRead;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub const CALL_PROMPT: &str = "Press Enter to make the outbound call...";
pub const STOP_PROMPT: &str = "Press Enter to stop the webhook server...";

/// What happened during one session.
#[derive(Debug)]
pub struct SessionReport {
    /// `None` when the operator never confirmed the call.
    pub call: Option<Result<CallResource, CallError>>,
    pub interrupted: bool,
}

impl SessionReport {
    pub fn summary(&self) -> &'static str {
        match (&self.call, self.interrupted) {
            (Some(Ok(_)), _) => "call placed",
            (Some(Err(_)), _) => "call failed",
            (None, true) => "interrupted before the call",
            (None, false) => "call not attempted",
        }
    }
}

/// Banner printed before configuration is validated.
pub fn print_banner(out: &mut impl Write, settings: &Settings) -> io::Result<()> {
    writeln!(out, "Twilio SIP Call Test")?;
    writeln!(out, "====================")?;
    writeln!(out, "SIP Server URL: {}", settings.sip_server_url)?;
    writeln!(out, "Webhook URL: {}", settings.webhook_url)?;
    writeln!(out, "Calling: {}", settings.to_phone_number)?;
    writeln!(out)?;
    out.flush()
}

/// Start the responder, wait for the operator, place the call, then shut down.
///
/// A failed call is reported, not propagated. Errors here are the ones that
/// abort the session, such as the listener failing to bind.
pub async fn run_session<R, W>(
    cfg: &BridgeConfig,
    console: &mut Console<R, W>,
    cancel: CancellationToken,
) -> Result<SessionReport, BridgeError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let initiator = CallInitiator::new(cfg)?;
    let state = WebhookState::new(&DialSip::new(cfg.sip_url.as_str()));
    let server = WebhookServer::start(cfg.listen_addr, state).await?;

    let outcome = drive(cfg, console, &initiator, server.local_addr(), &cancel).await;
    let stopped = server.shutdown().await;
    let report = outcome?;
    stopped?;
    Ok(report)
}

async fn drive<R, W>(
    cfg: &BridgeConfig,
    console: &mut Console<R, W>,
    initiator: &CallInitiator,
    listening: SocketAddr,
    cancel: &CancellationToken,
) -> Result<SessionReport, BridgeError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    console.line(format_args!(
        "Webhook server started on http://{listening}{WEBHOOK_PATH}"
    ))?;

    let mut report = SessionReport {
        call: None,
        interrupted: false,
    };

    // Crude readiness wait for the provider-facing side; kept as configured.
    tokio::select! {
        biased;
        _ = cancel.cancelled() => report.interrupted = true,
        _ = tokio::time::sleep(cfg.startup_delay) => {}
    }

    if !report.interrupted {
        match console.confirm(CALL_PROMPT, cancel).await? {
            Confirmation::Confirmed => {
                let outcome = initiator.place_call().await;
                match &outcome {
                    Ok(call) => {
                        console.line(format_args!("Call initiated! Call SID: {}", call.sid))?;
                        console.line(format_args!("Status: {}", call.status))?;
                    }
                    Err(e) => console.line(format_args!("Error making call: {e}"))?,
                }
                report.call = Some(outcome);
            }
            Confirmation::Closed => {
                warn!("operator input closed before confirmation; call skipped");
                console.line("No confirmation received; skipping the outbound call.")?;
            }
            Confirmation::Interrupted => report.interrupted = true,
        }
    }

    if !report.interrupted
        && console.confirm(STOP_PROMPT, cancel).await? == Confirmation::Interrupted
    {
        report.interrupted = true;
    }

    if report.interrupted {
        info!("session interrupted; stopping webhook server");
    }
    Ok(report)
}
