//! 应用层

pub mod auth;
pub mod dashboard;
pub mod navigation;
pub mod participant;
pub mod product;
pub mod routes;
pub mod state;
