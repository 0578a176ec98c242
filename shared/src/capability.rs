//! 角色与能力表
//!
//! 角色是封闭集合；界面和路由只询问 `role.can(capability)`，
//! 不直接比较角色字符串。

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Buyer,
    Farmer,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// 浏览市场挂牌
    BrowseMarket,
    /// 使用购物车
    UseCart,
    /// 下单
    PlaceOrders,
    /// 查看自己的订单
    TrackOrders,
    /// 管理自己的挂牌
    ManageListings,
    /// 处理收到的订单
    ManageIncomingOrders,
    /// 审核用户
    ApproveUsers,
}

const BUYER_CAPABILITIES: &[Capability] = &[
    Capability::BrowseMarket,
    Capability::UseCart,
    Capability::PlaceOrders,
    Capability::TrackOrders,
];

const FARMER_CAPABILITIES: &[Capability] = &[
    Capability::BrowseMarket,
    Capability::UseCart,
    Capability::ManageListings,
    Capability::ManageIncomingOrders,
];

const ADMIN_CAPABILITIES: &[Capability] = &[
    Capability::BrowseMarket,
    Capability::UseCart,
    Capability::ApproveUsers,
];

impl Role {
    pub const ALL: [Role; 3] = [Role::Buyer, Role::Farmer, Role::Admin];

    /// 注册时允许自选的角色（管理员只能由后台创建）
    pub const SELF_SERVICE: [Role; 2] = [Role::Buyer, Role::Farmer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Farmer => "farmer",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == value)
    }

    pub fn capabilities(&self) -> &'static [Capability] {
        match self {
            Role::Buyer => BUYER_CAPABILITIES,
            Role::Farmer => FARMER_CAPABILITIES,
            Role::Admin => ADMIN_CAPABILITIES,
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Capability {
    /// 拥有该能力的全部角色，用作路由守卫的允许列表
    pub fn allowed_roles(&self) -> Vec<Role> {
        Role::ALL.into_iter().filter(|r| r.can(*self)).collect()
    }
}
