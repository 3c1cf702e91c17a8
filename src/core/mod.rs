//! 核心层：错误、响应、表单状态、中间件

pub mod error;
pub mod form;
pub mod middleware;
pub mod response;
