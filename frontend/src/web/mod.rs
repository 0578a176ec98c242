//! 原生 Web API 封装模块
//!
//! 此模块提供对浏览器原生 API 的轻量级封装：fetch、LocalStorage、History。

mod http;
pub mod router;
mod storage;

pub use http::{FetchClient, read_file};
pub use storage::BrowserTokenStore;
