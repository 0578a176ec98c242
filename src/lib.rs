//! FarmLink 客户端核心
//!
//! 与平台无关的部分：HTTP 抽象、API 网关、token 存储、会话状态机、
//! 路由守卫、业务切片以及把它们串起来的 `Store`。
//! 浏览器相关的实现（fetch、LocalStorage、History）在 `farmlink-frontend` 中。

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod notify;
pub mod request;
pub mod route;
pub mod session;
pub mod slices;
pub mod store;
pub mod token;

pub use api::MarketApi;
pub use config::ClientConfig;
pub use error::{ApiError, ApiErrorKind, Result};
pub use guard::{GuardDecision, RouteGuard};
pub use notify::{Alert, AlertLevel, Notifier};
pub use request::{FileUpload, HttpClient, HttpRequest, HttpResponse};
pub use route::{AppRoute, DashboardTab};
pub use session::{SessionState, SessionUser, initial_session};
pub use store::{Action, AppState, Store};
pub use token::TokenStore;
