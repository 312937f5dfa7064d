use mimalloc::MiMalloc;
use sip_dial_bridge::config::REQUIRED_KEYS;
use sip_dial_bridge::console::Console;
use sip_dial_bridge::service::{print_banner, run_session};
use sip_dial_bridge::{BridgeConfig, BridgeError, Settings};
use std::process::ExitCode;
use std::time::Duration;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let settings = match Settings::load() {
        Ok(s) => s,
        Err(e) => {
            let _ = print_banner(&mut std::io::stdout(), &Settings::default());
            println!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_level(true)
                .with_target(false),
        )
        .init();

    if let Err(e) = print_banner(&mut std::io::stdout(), &settings) {
        error!(error = %e, "failed to write banner");
    }

    // Nothing is spawned until the configuration is known to be complete.
    let cfg = match BridgeConfig::from_settings(settings) {
        Ok(cfg) => cfg,
        Err(BridgeError::MissingConfig(missing)) => {
            error!(?missing, "required configuration missing");
            println!(
                "Error: Please set {}, {}, and {} environment variables",
                REQUIRED_KEYS[0], REQUIRED_KEYS[1], REQUIRED_KEYS[2]
            );
            return ExitCode::FAILURE;
        }
        Err(e) => {
            println!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        account_sid = %cfg.credentials.account_sid,
        listen = %cfg.listen_addr,
        endpoint = %cfg.calls_endpoint,
        proxy = %cfg.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        "configuration loaded"
    );

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            println!("Error: failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };
    let code = runtime.block_on(serve(cfg));
    // A pending stdin read must not hold the process open.
    runtime.shutdown_timeout(Duration::from_millis(250));
    code
}

async fn serve(cfg: BridgeConfig) -> ExitCode {
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("interrupt received");
                cancel.cancel();
            }
        }
    });

    let mut console = Console::new(BufReader::new(tokio::io::stdin()), std::io::stdout());
    match run_session(&cfg, &mut console, cancel).await {
        Ok(report) => {
            let outcome = report.summary();
            match &report.call {
                Some(Ok(call)) => info!(
                    outcome,
                    interrupted = report.interrupted,
                    sid = %call.sid,
                    status = %call.status,
                    "session finished"
                ),
                Some(Err(e)) => info!(
                    outcome,
                    interrupted = report.interrupted,
                    kind = e.kind(),
                    "session finished"
                ),
                None if report.interrupted => warn!(outcome, "session interrupted"),
                None => info!(outcome, "session finished"),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "session aborted");
            println!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
