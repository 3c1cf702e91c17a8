//! 登录、注册、找回密码

pub mod handler;
pub mod model;
pub mod service;
