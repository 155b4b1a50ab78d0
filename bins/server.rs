use std::process::ExitCode;

use configs::{AppConfig, ServerConfig};
use tracing::{error, info};
use uuid::Uuid;

const SERVICE: &str = "certhub";

fn build_runtime(server: &ServerConfig) -> std::io::Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = server.worker_threads {
        builder.worker_threads(w);
    }
    builder.build()
}

fn main() -> ExitCode {
    // .env 需在日志初始化前加载，RUST_LOG / LOG_FORMAT 才能生效
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let instance = Uuid::new_v4();
    let pid = std::process::id();

    std::panic::set_hook(Box::new(move |info| {
        error!(service = SERVICE, event = "panic", %instance, pid, message = %info, "unhandled panic");
    }));

    let cfg = match AppConfig::load_or_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = SERVICE, event = "config_invalid", error = %e, "configuration rejected");
            return ExitCode::FAILURE;
        }
    };

    let rt = match build_runtime(&cfg.server) {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = SERVICE, event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = SERVICE,
        event = "start",
        %instance,
        pid,
        version = env!("CARGO_PKG_VERSION"),
        workers = ?cfg.server.worker_threads,
        "certhub starting"
    );

    // 停机信号在 server::run 内部处理
    if let Err(e) = rt.block_on(server::run(cfg)) {
        error!(service = SERVICE, event = "run_failed", error = %e, "server exited with error");
        return ExitCode::FAILURE;
    }
    info!(service = SERVICE, event = "stop", %instance, pid, "certhub stopped");
    ExitCode::SUCCESS
}
