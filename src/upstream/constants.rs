//! Gemini API 配置常量

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// API 版本路径段
pub const API_VERSION: &str = "v1beta";

/// 凭证所在的查询参数名
pub const API_KEY_PARAM: &str = "key";
