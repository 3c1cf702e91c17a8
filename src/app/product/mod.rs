//! 商品目录与库存

pub mod handler;
pub mod image;
pub mod model;
pub mod service;
pub mod view;
