pub mod catalog_loader;
pub mod config;
pub mod console_adapter;
pub mod render;
