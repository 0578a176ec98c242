use crate::error::{ApiError, Result};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

pub use farmlink_shared::protocol::HttpMethod;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 上传的文件
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// multipart 表单中的一个字段
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text { name: String, value: String },
    File { name: String, file: FileUpload },
}

/// 请求体
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(String),
    Multipart(Vec<FormPart>),
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_bearer(self, token: &str) -> Self {
        let value = format!("{}{}", farmlink_shared::BEARER_PREFIX, token);
        self.with_header(farmlink_shared::HEADER_AUTHORIZATION, &value)
    }

    pub fn with_json(mut self, body: String) -> Self {
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self.body = Some(RequestBody::Json(body));
        self
    }

    /// multipart 的 Content-Type（含 boundary）由具体的 HTTP 实现决定
    pub fn with_multipart(mut self, parts: Vec<FormPart>) -> Self {
        self.body = Some(RequestBody::Multipart(parts));
        self
    }

    /// 用于日志和 Mock 匹配，如 `GET http://host/api/produce/`
    pub fn route_key(&self) -> String {
        format!("{} {}", self.method.as_str(), self.url)
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 非 2xx 转为错误；空响应体（如 204）按 JSON `null` 解析
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        if !self.is_success() {
            return Err(ApiError::from_response(self.status, &self.body));
        }
        let body = self.body.trim();
        let body = if body.is_empty() { "null" } else { body };
        Ok(serde_json::from_str(body)?)
    }
}

/// HTTP 客户端特性 (Trait)
/// (?Send) 是因为浏览器环境下 fetch 相关类型不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse>;
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use futures::channel::oneshot;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct MockState {
        /// (METHOD url) -> (Status, Response Body)
        responses: RefCell<HashMap<String, (u16, String)>>,
        /// 被挂起的路由：收到信号后才返回响应
        gates: RefCell<HashMap<String, oneshot::Receiver<()>>>,
        /// 网络层直接失败的路由
        offline: RefCell<Vec<String>>,
        requests: RefCell<Vec<HttpRequest>>,
    }

    /// 克隆后共享同一份状态，测试中可以一边注入 Store 一边检查请求记录
    #[derive(Clone, Default)]
    pub struct MockHttpClient {
        state: Rc<MockState>,
    }

    impl MockHttpClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
            self.mock_raw(method, url, status, &body.to_string());
        }

        pub fn mock_raw(&self, method: HttpMethod, url: &str, status: u16, body: &str) {
            self.state.responses.borrow_mut().insert(
                format!("{} {}", method.as_str(), url),
                (status, body.to_string()),
            );
        }

        pub fn mock_offline(&self, method: HttpMethod, url: &str) {
            self.state
                .offline
                .borrow_mut()
                .push(format!("{} {}", method.as_str(), url));
        }

        /// 挂起某个路由，直到返回的 Sender 发送信号（或被 drop）
        pub fn hold(&self, method: HttpMethod, url: &str) -> oneshot::Sender<()> {
            let (tx, rx) = oneshot::channel();
            self.state
                .gates
                .borrow_mut()
                .insert(format!("{} {}", method.as_str(), url), rx);
            tx
        }

        pub fn requests(&self) -> Vec<HttpRequest> {
            self.state.requests.borrow().clone()
        }

        pub fn request_keys(&self) -> Vec<String> {
            self.state
                .requests
                .borrow()
                .iter()
                .map(|r| r.route_key())
                .collect()
        }
    }

    #[async_trait::async_trait(?Send)]
    impl HttpClient for MockHttpClient {
        async fn send(&self, req: HttpRequest) -> Result<HttpResponse> {
            let key = req.route_key();
            self.state.requests.borrow_mut().push(req);

            let gate = self.state.gates.borrow_mut().remove(&key);
            if let Some(rx) = gate {
                let _ = rx.await;
            }

            if self.state.offline.borrow().contains(&key) {
                return Err(ApiError::network(format!("connection refused: {}", key)));
            }

            let responses = self.state.responses.borrow();
            if let Some((status, body)) = responses.get(&key) {
                Ok(HttpResponse {
                    status: *status,
                    body: body.clone(),
                })
            } else {
                Ok(HttpResponse {
                    status: 404,
                    body: r#"{"message": "Not Found"}"#.to_string(),
                })
            }
        }
    }
}
