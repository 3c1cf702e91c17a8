//! 页面视图模型：布局外壳 + 页面内容 + 短暂提示

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;

use super::{layout::LayoutShell, router::Route};
use crate::core::{error::CoreError, response::Notification};

#[derive(Debug, Serialize)]
pub struct PageView<C> {
    pub route: Route,
    pub path: String,
    pub title: &'static str,
    pub layout: Option<LayoutShell>,
    pub content: C,
    pub notification: Option<Notification>,
    pub timestamp: String,
}

/// 页面响应
#[derive(Debug)]
pub struct Page<C> {
    status: StatusCode,
    view: PageView<C>,
}

impl<C: Serialize> Page<C> {
    pub fn new(route: Route, content: C) -> Self {
        Self {
            status: StatusCode::OK,
            view: PageView {
                path: route.path(),
                title: route.title(),
                layout: LayoutShell::for_route(&route),
                route,
                content,
                notification: None,
                timestamp: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    pub fn notify(mut self, notification: Notification) -> Self {
        self.view.notification = Some(notification);
        self
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// 失败时留在原页面，保留已有状态，给出错误提示
    pub fn failed(route: Route, content: C, err: &CoreError, fallback: &str) -> Self {
        Self::new(route, content)
            .with_status(err.status_code())
            .notify(err.notification(fallback))
    }

    /// 重复提交
    pub fn busy(route: Route, content: C) -> Self {
        Self::new(route, content)
            .with_status(StatusCode::CONFLICT)
            .notify(Notification::warning("Submission already in progress"))
    }
}

impl<C: Serialize> IntoResponse for Page<C> {
    fn into_response(self) -> Response {
        (self.status, Json(self.view)).into_response()
    }
}
