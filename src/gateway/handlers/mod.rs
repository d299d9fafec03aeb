//! HTTP 请求处理器

pub mod generate;
pub mod health;

pub use generate::handle_generate;
pub use health::handle_health;
