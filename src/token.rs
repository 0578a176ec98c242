//! Bearer token 的持久化与解析

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use farmlink_shared::UserId;
use serde::Deserialize;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

/// 持久化 token 的键值存储（浏览器中为 LocalStorage）
pub trait TokenStore {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// 进程内 token 存储，克隆后共享同一个槽位
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        let store = Self::new();
        store.save(token);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.slot.borrow().clone()
    }

    fn save(&self, token: &str) {
        *self.slot.borrow_mut() = Some(token.to_string());
    }

    fn clear(&self) {
        *self.slot.borrow_mut() = None;
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token is not a three-part JWT")]
    Malformed,
    #[error("token payload is not valid base64url: {0}")]
    Encoding(#[from] base64::DecodeError),
    #[error("token payload is not valid JSON: {0}")]
    Claims(#[from] serde_json::Error),
    #[error("token subject is not a user id: {0}")]
    InvalidSubject(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Subject {
    Text(String),
    Number(u64),
}

#[derive(Deserialize)]
struct Claims {
    sub: Subject,
}

/// 读取 JWT 的 `sub` 声明（不校验签名，签名由服务端负责）
pub fn decode_subject(token: &str) -> Result<UserId, TokenError> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::Malformed);
    };

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('='))?;
    let claims: Claims = serde_json::from_slice(&bytes)?;

    match claims.sub {
        Subject::Number(id) => Ok(id),
        Subject::Text(raw) => raw
            .trim()
            .parse::<UserId>()
            .map_err(|_| TokenError::InvalidSubject(raw)),
    }
}

#[cfg(test)]
pub(crate) fn fake_jwt(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.signature", header, payload)
}
