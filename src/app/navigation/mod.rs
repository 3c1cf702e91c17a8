//! 路由与布局

pub mod layout;
pub mod page;
pub mod router;
