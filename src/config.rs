// =========================================================
// 运行时配置 (Client Configuration)
// =========================================================

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000/api";
pub const DEFAULT_TOKEN_KEY: &str = "token";
pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_FALLBACK_PATH: &str = "/market";

/// 客户端配置
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// REST API 根地址，不带末尾斜杠
    pub api_base_url: String,
    /// token 在持久化存储中的键名
    pub token_key: String,
    /// 未登录时的重定向目标
    pub login_path: String,
    /// 角色无权访问时的重定向目标（公开页面）
    pub fallback_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_key: DEFAULT_TOKEN_KEY.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            fallback_path: DEFAULT_FALLBACK_PATH.to_string(),
        }
    }
}

impl ClientConfig {
    /// 使用构建时注入的地址；为空或未设置时回落到默认值
    pub fn from_build_env(api_base_url: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(url) = api_base_url.map(str::trim).filter(|u| !u.is_empty()) {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        config
    }
}
