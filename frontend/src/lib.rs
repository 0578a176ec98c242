//! FarmLink 前端应用
//!
//! 采用 Context-Driven 的架构：
//! - `context`: 把核心库的 `Store` 包装为响应式上下文
//! - `web::router`: 路由服务（History API + 守卫执行）
//! - `web`: fetch / LocalStorage 等浏览器 API 的轻量封装
//! - `components`: UI 组件层

mod components {
    pub mod admin;
    pub mod alerts;
    pub mod cart;
    pub mod dashboard;
    pub mod home;
    pub mod login;
    pub mod marketplace;
    pub mod my_orders;
    pub mod navbar;
    pub mod order_card;
    pub mod register;
}
mod context;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web;

use farmlink::{AppRoute, ClientConfig, RouteGuard};
use leptos::prelude::*;

use crate::components::admin::AdminDashboardPage;
use crate::components::alerts::AlertHost;
use crate::components::cart::CartPage;
use crate::components::dashboard::DashboardPage;
use crate::components::home::HomePage;
use crate::components::login::LoginPage;
use crate::components::marketplace::MarketplacePage;
use crate::components::my_orders::MyOrdersPage;
use crate::components::navbar::Navbar;
use crate::components::register::RegisterPage;
use crate::context::provide_store;
use crate::web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Market => view! { <MarketplacePage /> }.into_any(),
        AppRoute::Cart => view! { <CartPage /> }.into_any(),
        AppRoute::MyOrders => view! { <MyOrdersPage /> }.into_any(),
        AppRoute::Dashboard(tab) => view! { <DashboardPage tab=tab /> }.into_any(),
        AppRoute::AdminDashboard => view! { <AdminDashboardPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-[60vh]">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                    <Link to="/" class="btn btn-primary mt-6">"Back to Home"</Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. API 地址在构建时注入，未设置时使用本地开发地址
    let config = ClientConfig::from_build_env(option_env!("FARMLINK_API_URL"));

    // 2. 创建 Store 上下文，初始会话从 LocalStorage 推导
    let ctx = provide_store(&config);

    // 3. 只有 token 里的用户 id 时，补全用户详情
    Effect::new(move |_| {
        ctx.spawn(|store| async move {
            let _ = store.restore_session().await;
        });
    });

    let guard = RouteGuard::new(&config);

    view! {
        <Router guard=guard>
            <div class="min-h-screen bg-base-200 font-sans">
                <Navbar />
                <main class="max-w-7xl mx-auto p-4 md:p-8">
                    <RouterOutlet matcher=route_matcher />
                </main>
                <AlertHost />
            </div>
        </Router>
    }
}
