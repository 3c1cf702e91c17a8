//! 会话门禁路由
//!
//! 一个布尔登录标记决定哪棵路由子树可达：未登录只有认证页面，
//! 已登录只有后台页面。

use serde::Serialize;

/// 控制台页面
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "name", content = "id", rename_all = "snake_case")]
pub enum Route {
    Login,
    CreateAccount,
    ForgotPassword,
    Dashboard,
    Ecommerce,
    ProductList,
    AddProduct,
    EditProduct(String),
    StockManagement,
    ParticipantList,
    ParticipantRegistration,
    ParticipantEdit(String),
}

/// 页面所属的导航分区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Auth,
    Dashboard,
    Ecommerce,
    Participants,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Redirect(Route),
}

impl Route {
    /// 把请求路径解析为页面，动作子路径归属到它所在的页面
    pub fn parse(path: &str) -> Option<Route> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let route = match segments.as_slice() {
            ["login"] => Route::Login,
            ["create-account"] => Route::CreateAccount,
            ["forgot-password"] => Route::ForgotPassword,
            ["dashboard"] => Route::Dashboard,
            ["dashboard", "ecommerce", ..] => Route::Ecommerce,
            ["productlist"] | ["productlist", _, "stock" | "variants"] => Route::ProductList,
            ["addproduct"] | ["addproduct", "image"] => Route::AddProduct,
            ["editproduct", id] | ["editproduct", id, "delete"] => {
                Route::EditProduct((*id).to_string())
            }
            ["stock"] | ["stock", _] => Route::StockManagement,
            ["participants"] | ["participants", _, "delete"] => Route::ParticipantList,
            ["participantregistration"] => Route::ParticipantRegistration,
            ["participantedit", id] => Route::ParticipantEdit((*id).to_string()),
            _ => return None,
        };

        Some(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::CreateAccount => "/create-account".to_string(),
            Route::ForgotPassword => "/forgot-password".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Ecommerce => "/dashboard/ecommerce".to_string(),
            Route::ProductList => "/productlist".to_string(),
            Route::AddProduct => "/addproduct".to_string(),
            Route::EditProduct(id) => format!("/editproduct/{id}"),
            Route::StockManagement => "/stock".to_string(),
            Route::ParticipantList => "/participants".to_string(),
            Route::ParticipantRegistration => "/participantregistration".to_string(),
            Route::ParticipantEdit(id) => format!("/participantedit/{id}"),
        }
    }

    pub fn section(&self) -> Section {
        match self {
            Route::Login | Route::CreateAccount | Route::ForgotPassword => Section::Auth,
            Route::Dashboard => Section::Dashboard,
            Route::Ecommerce
            | Route::ProductList
            | Route::AddProduct
            | Route::EditProduct(_)
            | Route::StockManagement => Section::Ecommerce,
            Route::ParticipantList
            | Route::ParticipantRegistration
            | Route::ParticipantEdit(_) => Section::Participants,
        }
    }

    pub fn is_auth_page(&self) -> bool {
        self.section() == Section::Auth
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Sign in",
            Route::CreateAccount => "Create Account",
            Route::ForgotPassword => "Forgot Password",
            Route::Dashboard => "Dashboard",
            Route::Ecommerce => "Ecommerce",
            Route::ProductList => "Product List",
            Route::AddProduct => "Add New Product",
            Route::EditProduct(_) => "Edit Product",
            Route::StockManagement => "Stock Management",
            Route::ParticipantList => "Participants",
            Route::ParticipantRegistration => "Participant Registration",
            Route::ParticipantEdit(_) => "Edit Participant",
        }
    }
}

/// 登录标记驱动的路由选择
pub struct SessionRouter;

impl SessionRouter {
    /// 不受登录状态约束的路径
    pub fn is_public(path: &str) -> bool {
        matches!(path.trim_end_matches('/'), "/health" | "/logout")
    }

    pub fn resolve(path: &str, logged_in: bool) -> Resolution {
        match (Route::parse(path), logged_in) {
            (Some(route), false) if route.is_auth_page() => Resolution::Render(route),
            (_, false) => Resolution::Redirect(Route::Login),
            (Some(route), true) if !route.is_auth_page() => Resolution::Render(route),
            (_, true) => Resolution::Redirect(Route::Dashboard),
        }
    }
}
