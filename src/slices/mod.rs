//! 业务切片
//!
//! 每个切片只镜像一类服务端资源：状态 + 动作 + 纯函数 `apply`。
//! 网络请求由 `Store` 发起，切片本身不做 IO。

pub mod admin;
pub mod cart;
pub mod orders;
pub mod produce;

pub use admin::{AdminAction, AdminState};
pub use cart::{CartAction, CartItem, CartState};
pub use orders::{OrdersAction, OrdersState};
pub use produce::{ProduceAction, ProduceState};

/// 单个异步操作的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl RequestStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestStatus::Loading)
    }
}
