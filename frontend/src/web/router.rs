//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 访问控制由核心库的 `RouteGuard` 裁决，这里只负责执行跳转和提示。

use farmlink::{AppRoute, GuardDecision, Notifier, RouteGuard};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use crate::context::{StoreContext, use_store};

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 被守卫拦截时原本要去的地址，登录后返回
    return_to: RwSignal<Option<String>>,
    guard: StoredValue<RouteGuard>,
}

impl RouterService {
    fn new(guard: RouteGuard) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            return_to: RwSignal::new(None),
            guard: StoredValue::new(guard),
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// 导航到指定路径（pushState）
    pub fn navigate(&self, path: &str) {
        let target = AppRoute::from_path(path);
        push_history_state(target.to_path());
        self.set_route.set(target);
    }

    /// 重定向（replaceState，不留历史记录）
    fn redirect(&self, path: &str) {
        let target = AppRoute::from_path(path);
        replace_history_state(target.to_path());
        self.set_route.set(target);
    }

    /// 守卫对某个路由的裁决；公开路由返回 None
    pub fn decide(&self, ctx: StoreContext, route: AppRoute) -> Option<GuardDecision> {
        let allowed = route.allowed_roles()?;
        let guard = self.guard;
        Some(ctx.select(|state| {
            guard.with_value(|g| g.check(&state.session, &allowed, route.to_path()))
        }))
    }

    /// 初始化浏览器后退/前进按钮监听
    ///
    /// 只更新路由，守卫由 `setup_guard` 中的 Effect 统一执行。
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;

        let closure = Closure::<dyn Fn()>::new(move || {
            set_route.set(AppRoute::from_path(&current_path()));
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// **核心方法：守卫**
    ///
    /// 路由或会话变化时重新裁决：
    /// 未登录跳转登录页，角色不符提示后跳转公开页面，
    /// 已登录用户离开登录/注册页。
    fn setup_guard(&self, ctx: StoreContext) {
        let router = *self;

        Effect::new(move |_| {
            let route = router.current_route.get();

            match router.decide(ctx, route) {
                Some(GuardDecision::RedirectToLogin {
                    login_path,
                    return_to,
                }) => {
                    log::info!("[Router] {} requires login, redirecting.", return_to);
                    router.return_to.set(Some(return_to));
                    router.redirect(&login_path);
                }
                Some(GuardDecision::Denied { fallback, notice }) => {
                    log::info!("[Router] Access denied to {}.", route);
                    ctx.alerts.notify(notice);
                    router.redirect(&fallback);
                }
                Some(GuardDecision::Loading) | Some(GuardDecision::Render) => {}
                None => {
                    if !route.should_redirect_when_authenticated() {
                        return;
                    }
                    let role = ctx.select(|s| {
                        s.session.is_authenticated.then(|| s.session.role()).flatten()
                    });
                    // 角色未知时留在原地，等用户详情拉取完成
                    if let Some(role) = role {
                        let target = router
                            .return_to
                            .try_update(Option::take)
                            .flatten()
                            .unwrap_or_else(|| AppRoute::landing_for(Some(role)).to_path().to_string());
                        log::info!("[Router] Authenticated as {}, redirecting to {}.", role, target);
                        router.redirect(&target);
                    }
                }
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(guard: RouteGuard) -> RouterService {
    let router = RouterService::new(guard);

    router.init_popstate_listener();
    router.setup_guard(use_store());

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 StoreContext 之后使用。
#[component]
pub fn Router(
    /// 路由守卫
    guard: RouteGuard,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(guard);

    children()
}

/// 路由出口组件
///
/// 只有守卫放行时才渲染受保护的页面。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();
    let ctx = use_store();

    move || {
        let current = router.current_route().get();
        match router.decide(ctx, current) {
            None | Some(GuardDecision::Render) => matcher(current),
            Some(GuardDecision::Loading) => view! {
                <div class="flex items-center justify-center min-h-[50vh]">
                    <span class="loading loading-spinner loading-lg text-primary"></span>
                    <span class="ml-3">"Loading user details..."</span>
                </div>
            }
            .into_any(),
            // 重定向即将发生
            Some(_) => view! { <div></div> }.into_any(),
        }
    }
}

/// 站内链接：拦截点击，改用 History 导航
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)]
    to: String,
    #[prop(into, optional)] class: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(&target);
    };

    view! {
        <a href=to class=class on:click=on_click>
            {children()}
        </a>
    }
}
