//! # Ten Sports Race 管理控制台
//!
//! 面向管理员的控制台服务：维护登录会话、表单与列表状态，
//! 通过 HTTP 客户端调用独立的 REST 后端完成商品与参赛者的增删改查。
//! 页面以 JSON 视图模型输出（布局外壳 + 页面内容 + 短暂提示）。
//!
//! - `app`: 页面路由、处理器与各业务模块
//! - `core`: 错误、响应、表单状态与中间件
//! - `infrastructure`: 配置、日志、会话存储与后端客户端

pub mod app;
pub mod core;
pub mod infrastructure;

pub use crate::app::{routes::build_router, state::AppState};
pub use crate::core::error::CoreError;
