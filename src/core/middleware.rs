//! 核心中间件模块

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::time::Instant;
use tracing::{debug, info};

use crate::app::{
    navigation::router::{Resolution, SessionRouter},
    state::AppState,
};

/// 请求日志中间件
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string());

    let response = next.run(req).await;
    let status = response.status();
    let duration = start.elapsed();

    info!(
        "{} {} - {} - {}ms - User-Agent: {:?}",
        method,
        uri,
        status,
        duration.as_millis(),
        user_agent
    );

    response
}

/// 会话门禁中间件
///
/// 未登录时只有认证子树可达，其余路径重定向到 /login；
/// 已登录时只有后台子树可达。
pub async fn session_gate_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    // 去掉末尾斜杠后重定向，路由表里只有规范路径
    if path.len() > 1 && path.ends_with('/') {
        let mut target = path.trim_end_matches('/').to_string();
        if target.is_empty() {
            target.push('/');
        }
        if let Some(query) = req.uri().query() {
            target = format!("{target}?{query}");
        }
        return Redirect::to(&target).into_response();
    }

    if SessionRouter::is_public(&path) {
        return next.run(req).await;
    }

    let logged_in = state.session.is_logged_in();
    match SessionRouter::resolve(&path, logged_in) {
        Resolution::Render(_) => next.run(req).await,
        Resolution::Redirect(target) => {
            debug!("路由重定向: {} -> {} (logged_in={})", path, target.path(), logged_in);
            Redirect::to(&target.path()).into_response()
        }
    }
}
