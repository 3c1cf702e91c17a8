//! 基础设施层

pub mod config;
pub mod http_client;
pub mod logger;
pub mod session_store;
