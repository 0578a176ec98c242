//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其访问要求。

use farmlink_shared::{Capability, Role};
use std::fmt::Display;

/// 农户面板的子页面
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardTab {
    #[default]
    MyListings,
    Orders,
    AddProduce,
}

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页
    #[default]
    Home,
    Login,
    Register,
    /// 公开市场
    Market,
    Cart,
    /// 买家自己的订单
    MyOrders,
    /// 农户面板
    Dashboard(DashboardTab),
    AdminDashboard,
    /// 页面未找到
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举（忽略查询串和末尾斜杠）
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        match path {
            "/" => Self::Home,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/market" => Self::Market,
            "/cart" => Self::Cart,
            "/orders" => Self::MyOrders,
            "/dashboard" | "/dashboard/my-listings" => Self::Dashboard(DashboardTab::MyListings),
            "/dashboard/orders" => Self::Dashboard(DashboardTab::Orders),
            "/dashboard/add-produce" => Self::Dashboard(DashboardTab::AddProduce),
            "/admin/dashboard" => Self::AdminDashboard,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Market => "/market",
            Self::Cart => "/cart",
            Self::MyOrders => "/orders",
            Self::Dashboard(DashboardTab::MyListings) => "/dashboard/my-listings",
            Self::Dashboard(DashboardTab::Orders) => "/dashboard/orders",
            Self::Dashboard(DashboardTab::AddProduce) => "/dashboard/add-produce",
            Self::AdminDashboard => "/admin/dashboard",
            Self::NotFound => "/404",
        }
    }

    /// **核心守卫逻辑：进入该路由所需的能力**，公开页面返回 None
    pub fn required_capability(&self) -> Option<Capability> {
        match self {
            Self::Cart => Some(Capability::UseCart),
            Self::MyOrders => Some(Capability::TrackOrders),
            Self::Dashboard(_) => Some(Capability::ManageListings),
            Self::AdminDashboard => Some(Capability::ApproveUsers),
            _ => None,
        }
    }

    /// 路由的角色允许列表，由能力表推导
    pub fn allowed_roles(&self) -> Option<Vec<Role>> {
        self.required_capability().map(|c| c.allowed_roles())
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 登录成功后的默认落地页
    pub fn landing_for(role: Option<Role>) -> Self {
        match role {
            Some(Role::Admin) => Self::AdminDashboard,
            Some(Role::Farmer) => Self::Dashboard(DashboardTab::MyListings),
            Some(Role::Buyer) | None => Self::Market,
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
