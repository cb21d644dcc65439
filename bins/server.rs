use std::process::ExitCode;

use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

fn main() -> ExitCode {
    // .env 先于日志初始化加载，保证 RUST_LOG 等变量生效
    dotenv().ok();
    common::utils::logging::init_logging_default();

    // 启动上下文：实例 id 随机生成，仅用于日志关联
    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    info!(
        service = "maintenance-api",
        event = "start",
        %service_id,
        pid,
        version = env!("CARGO_PKG_VERSION"),
        "maintenance api starting"
    );

    // 未捕获的 panic 也要落日志，方便事后定位
    std::panic::set_hook(Box::new(move |panic_info| {
        error!(
            service = "maintenance-api",
            event = "panic",
            %service_id,
            message = %panic_info,
            "unhandled panic occurred"
        );
    }));

    // 线程数取自 config.toml，配置缺失时退回 TOKIO_WORKER_THREADS
    let worker_threads = configs::AppConfig::load_and_validate()
        .map(|cfg| cfg.server.worker_threads)
        .unwrap_or_else(|_| {
            std::env::var("TOKIO_WORKER_THREADS")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
        });

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(threads) = worker_threads {
        builder.worker_threads(threads);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "maintenance-api", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    // 服务主循环与 Ctrl+C 二选一；每次成功的变更在响应前已落盘，
    // 直接退出不会丢数据
    rt.block_on(async {
        tokio::select! {
            res = server::run() => match res {
                Ok(()) => {
                    info!(service = "maintenance-api", event = "stop", %service_id, "server stopped normally");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    error!(service = "maintenance-api", event = "run_failed", error = %e, "server::run returned error");
                    ExitCode::FAILURE
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!(service = "maintenance-api", event = "shutdown_signal", %service_id, "received Ctrl+C, shutting down");
                ExitCode::SUCCESS
            }
        }
    })
}
