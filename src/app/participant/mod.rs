//! 参赛者报名与管理

pub mod handler;
pub mod model;
pub mod service;
