use clap::Parser;
use dotenvy::dotenv;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "subscription-service", version, about = "Subscription bookkeeping HTTP service")]
struct Args {
    /// Configuration file; defaults to `CONFIG_PATH`, then `config.toml`
    #[arg(long)]
    config: Option<String>,
}

fn main() -> std::process::ExitCode {
    let args = Args::parse();
    // .env first, so RUST_LOG and DATABASE_URL apply
    dotenv().ok();

    let cfg = match configs::AppConfig::load_or_default(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            common::utils::logging::init_logging_default();
            error!(service = "subscription-service", event = "config_invalid", error = %e, "cannot load configuration");
            return std::process::ExitCode::FAILURE;
        }
    };
    common::utils::logging::init_logging(&cfg.log.env);

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "subscription-service",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = cfg.server.worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "subscription-service", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "subscription-service",
        event = "start",
        %service_id,
        pid,
        version,
        log_env = %cfg.log.env,
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "subscription service starting"
    );

    rt.block_on(async move {
        let shutdown = CancellationToken::new();
        let on_signal = shutdown.clone();
        tokio::spawn(async move {
            server::startup::shutdown_signal().await;
            info!(service = "subscription-service", event = "shutdown_signal", %service_id, pid, "shutting down");
            on_signal.cancel();
        });

        match server::run(cfg, shutdown).await {
            Ok(()) => {
                info!(service = "subscription-service", event = "stop", %service_id, pid, "server stopped normally");
                std::process::ExitCode::SUCCESS
            }
            Err(e) => {
                error!(service = "subscription-service", event = "run_failed", error = %e, "server::run returned error");
                std::process::ExitCode::FAILURE
            }
        }
    })
}
