//! 仪表盘页面处理器

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::warn;

use super::service::InventoryDistribution;
use crate::app::{
    navigation::{page::Page, router::Route},
    state::AppState,
};
use crate::core::response::ApiResponse;

#[derive(Debug, Serialize)]
pub struct DashboardContent {
    pub heading: &'static str,
    pub distribution: InventoryDistribution,
}

pub async fn dashboard(State(state): State<AppState>) -> Page<DashboardContent> {
    let result = state.products.list().await;
    let distribution = InventoryDistribution::from_products(result.as_deref().unwrap_or(&[]));
    let content = DashboardContent {
        heading: "Inventory Distribution",
        distribution,
    };

    match result {
        Ok(_) => state.page(Route::Dashboard, content),
        Err(err) => {
            warn!("加载库存分布失败: {}", err);
            Page::failed(Route::Dashboard, content, &err, "Failed to fetch products")
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Shortcut {
    pub label: &'static str,
    pub href: String,
}

#[derive(Debug, Serialize)]
pub struct EcommerceContent {
    pub heading: &'static str,
    pub shortcuts: Vec<Shortcut>,
}

/// 电商模块入口
pub async fn ecommerce(State(state): State<AppState>) -> Page<EcommerceContent> {
    let shortcuts = [
        ("Product List", Route::ProductList),
        ("Add Product", Route::AddProduct),
        ("Stock Management", Route::StockManagement),
    ];
    let content = EcommerceContent {
        heading: "Ecommerce",
        shortcuts: shortcuts
            .into_iter()
            .map(|(label, route)| Shortcut {
                label,
                href: route.path(),
            })
            .collect(),
    };
    state.page(Route::Ecommerce, content)
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub logged_in: bool,
    /// 当前登录的管理员邮箱
    pub user: Option<String>,
    pub backend: String,
}

pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<Health>> {
    Json(ApiResponse::success(Health {
        status: "ok",
        logged_in: state.session.is_logged_in(),
        user: state.session.email(),
        backend: state.backend_url().to_string(),
    }))
}
