use std::process::ExitCode;

use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{error, info};

fn build_runtime(worker_threads: Option<usize>) -> std::io::Result<tokio::runtime::Runtime> {
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads {
        builder.worker_threads(w);
    }
    builder.build()
}

fn main() -> ExitCode {
    // 先加载 .env，使 RUST_LOG / LOG_FORMAT / CONFIG_PATH 生效
    dotenv().ok();
    common::utils::logging::init_logging_from_env();

    std::panic::set_hook(Box::new(|info| {
        error!(service = "docstore", event = "panic", message = %info, "unhandled panic occurred");
    }));

    // 配置只加载一次，之后整体交给 server::run
    let cfg = match AppConfig::load_or_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = "docstore", event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let rt = match build_runtime(cfg.server.worker_threads) {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "docstore", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = "docstore",
        event = "start",
        pid = std::process::id(),
        version = env!("CARGO_PKG_VERSION"),
        bind = %cfg.server.bind_addr(),
        threads = cfg.server.worker_threads.unwrap_or_default(),
        "docstore starting"
    );

    // run 在收到停机信号且请求全部结束后返回
    match rt.block_on(server::run(cfg)) {
        Ok(()) => {
            info!(service = "docstore", event = "stop", "docstore stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "docstore", event = "run_failed", error = %e, "server::run returned error");
            ExitCode::FAILURE
        }
    }
}
