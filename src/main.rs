use anyhow::Context;
use std::time::Duration;
use tokio::{net::TcpListener, signal};
use tracing::{info, warn};

use tensports_admin::{
    build_router,
    infrastructure::{
        config::{find_config_file, load_config},
        http_client::BackendClient, logger::Logger,
        session_store::SessionStore,
    },
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let source = find_config_file();
    let config = load_config(source).context("加载配置失败")?;
    let _log_guard = Logger::init(&config.logging);

    info!("启动 Ten Sports Race 管理控制台...");
    match source {
        Some(path) => info!("从配置文件加载: {}", path),
        None => warn!("未找到配置文件，使用默认配置"),
    }
    info!("REST 后端: {}", config.backend.base_url);

    let session = SessionStore::open(&config.session.store_path)
        .context("打开会话存储失败")?;
    info!(
        "会话文件: {} (已登录: {})",
        config.session.store_path.display(),
        session.is_logged_in()
    );

    let client = BackendClient::new(&config.backend, session.clone())?;
    let state = AppState::new(session, client);

    // 控制台请求超时略长于后端请求超时
    let request_timeout = Duration::from_secs(config.backend.timeout_seconds + 5);
    let app = build_router(state, request_timeout);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("无法绑定到 {address}"))?;
    info!("🚀 控制台运行在 http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("服务器运行失败")?;

    info!("控制台已关闭");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("收到 Ctrl+C，正在关闭"),
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("收到终止信号，正在关闭");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
