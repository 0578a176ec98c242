use std::fmt;

// =========================================================
// 错误类别枚举
// =========================================================

/// 错误类别
///
/// 前五类来自服务端 HTTP 状态码，其余是客户端自身产生的错误。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 400 / 422: 表单或参数校验失败
    InvalidInput,
    /// 401: 未登录或 token 失效
    Unauthorized,
    /// 403: 角色无权访问（例如农户尚未审核）
    Forbidden,
    /// 404: 资源不存在
    NotFound,
    /// 409: 用户名或邮箱已存在
    Conflict,
    /// 5xx 及其他未归类的状态码
    Server,
    /// 请求未能送达服务端
    Network,
    /// 请求体或响应体 JSON 编解码失败
    Serialization,
    /// bearer token 无法解析
    Token,
    /// 结果所属的会话已经被登出或新的登录取代
    Superseded,
}

impl ApiErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 422 => ApiErrorKind::InvalidInput,
            401 => ApiErrorKind::Unauthorized,
            403 => ApiErrorKind::Forbidden,
            404 => ApiErrorKind::NotFound,
            409 => ApiErrorKind::Conflict,
            _ => ApiErrorKind::Server,
        }
    }

    /// 机器可读的错误代码
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiErrorKind::InvalidInput => "INVALID_INPUT",
            ApiErrorKind::Unauthorized => "UNAUTHORIZED",
            ApiErrorKind::Forbidden => "FORBIDDEN",
            ApiErrorKind::NotFound => "RESOURCE_NOT_FOUND",
            ApiErrorKind::Conflict => "RESOURCE_CONFLICT",
            ApiErrorKind::Server => "SERVER_ERROR",
            ApiErrorKind::Network => "NETWORK_ERROR",
            ApiErrorKind::Serialization => "JSON_PARSE_ERROR",
            ApiErrorKind::Token => "INVALID_TOKEN",
            ApiErrorKind::Superseded => "SUPERSEDED",
        }
    }

    /// token 本身被服务端拒绝（而不是网络或服务端故障）
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            ApiErrorKind::Unauthorized | ApiErrorKind::Token | ApiErrorKind::NotFound
        )
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorSpan {
    /// 操作名称，如 "api.send", "session.login"
    pub operation: String,
    /// 额外的细节信息，如请求路径、用户 id
    pub detail: Option<String>,
}

impl ErrorSpan {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: None,
        }
    }

    pub fn with_detail(operation: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            detail: Some(detail.into()),
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端统一错误
///
/// - kind: 错误类别
/// - message: 面向开发者的描述
/// - server_message: 服务端返回的 `message` 字段（可直接展示给用户）
/// - source: 原始错误（可选）
/// - spans: 操作追踪栈
#[derive(Debug)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
    server_message: Option<String>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    spans: Vec<ErrorSpan>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            server_message: None,
            source: None,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::InvalidInput, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Network, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Serialization, message)
    }

    pub fn token(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Token, message)
    }

    pub fn superseded() -> Self {
        Self::new(ApiErrorKind::Superseded, "session changed while the request was in flight")
    }

    /// 由非 2xx 响应构造错误，尽量提取服务端给出的提示信息
    ///
    /// 服务端有两种错误体：`{"message": "..."}`，以及校验失败时的
    /// `{"field": ["msg", ...]}`。
    pub fn from_response(status: u16, body: &str) -> Self {
        let kind = ApiErrorKind::from_status(status);
        let mut err = Self::new(kind, format!("HTTP {}", status));
        err.server_message = extract_server_message(body);
        err
    }

    // --- Context builders ---

    /// 添加操作追踪（无额外细节）
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::new(operation));
        self
    }

    /// 添加操作追踪（带额外细节）
    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan::with_detail(operation, detail));
        self
    }

    /// 设置原始错误源
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    pub fn server_message(&self) -> Option<&str> {
        self.server_message.as_deref()
    }

    /// 给用户看的提示：优先服务端消息，否则使用调用方给出的默认文案
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }

    pub fn is_superseded(&self) -> bool {
        self.kind == ApiErrorKind::Superseded
    }
}

fn extract_server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let obj = value.as_object()?;

    if let Some(msg) = obj.get("message").and_then(|m| m.as_str()) {
        return Some(msg.to_string());
    }

    // 校验错误：逐字段拼接
    let mut parts = Vec::new();
    for (field, messages) in obj {
        let text = match messages {
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|m| m.as_str())
                .collect::<Vec<_>>()
                .join(" "),
            serde_json::Value::String(s) => s.clone(),
            _ => continue,
        };
        if !text.is_empty() {
            parts.push(format!("{}: {}", field, text));
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}

// =========================================================
// Display & Error trait 实现
// =========================================================

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_code(), self.message)?;
        if let Some(server) = &self.server_message {
            write!(f, " ({})", server)?;
        }

        if !self.spans.is_empty() {
            write!(f, " | trace: ")?;
            for (i, span) in self.spans.iter().enumerate() {
                if i > 0 {
                    write!(f, " -> ")?;
                }
                write!(f, "{}", span.operation)?;
                if let Some(detail) = &span.detail {
                    write!(f, "({})", detail)?;
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::serialization(e.to_string()).with_source(e)
    }
}

impl From<crate::token::TokenError> for ApiError {
    fn from(e: crate::token::TokenError) -> Self {
        ApiError::token(e.to_string()).with_source(e)
    }
}
