//! 应用状态容器
//!
//! `Store` 持有全部切片状态，并提供异步操作（发请求 → 派发动作 → 提示用户）。
//! 单线程使用：状态放在 `RefCell` 中，任何借用都不会跨越 `.await`。

use crate::api::MarketApi;
use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::notify::{Alert, Notifier};
use crate::request::{FileUpload, HttpClient};
use crate::session::{SessionAction, SessionState, initial_session};
use crate::slices::{
    AdminAction, AdminState, CartAction, CartState, OrdersAction, OrdersState, ProduceAction,
    ProduceState,
};
use crate::token::{TokenStore, decode_subject};
use farmlink_shared::{
    AdminUser, Credentials, NewProduce, Order, OrderId, OrderStatus, Produce, ProduceFilters,
    ProduceId, Registration, ServerMessage, UserDetails, UserId,
};
use std::cell::RefCell;

#[cfg(test)]
mod tests;

const UNKNOWN_ERROR: &str = "An unknown error occurred.";
const DETAILS_AFTER_LOGIN_FAILED: &str = "Failed to fetch user details after login.";

// =========================================================
// 状态与动作
// =========================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub session: SessionState,
    pub produce: ProduceState,
    pub cart: CartState,
    pub orders: OrdersState,
    pub admin: AdminState,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Session(SessionAction),
    Produce(ProduceAction),
    Cart(CartAction),
    Orders(OrdersAction),
    Admin(AdminAction),
}

impl AppState {
    /// 返回动作是否生效（只有会话动作可能因为过期而被丢弃）
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Session(a) => return self.session.apply(a),
            Action::Produce(a) => self.produce.apply(a),
            Action::Cart(a) => self.cart.apply(a),
            Action::Orders(a) => self.orders.apply(a),
            Action::Admin(a) => self.admin.apply(a),
        }
        true
    }
}

/// 读操作失败时记录到切片中的描述
fn describe(e: &ApiError) -> String {
    e.user_message(&e.message)
}

// =========================================================
// Store
// =========================================================

pub struct Store<C: HttpClient, T: TokenStore, N: Notifier> {
    api: MarketApi<C>,
    tokens: T,
    notifier: N,
    state: RefCell<AppState>,
    listeners: RefCell<Vec<Box<dyn Fn()>>>,
}

impl<C: HttpClient, T: TokenStore, N: Notifier> Store<C, T, N> {
    /// 从持久化 token 推导初始会话
    pub fn new(client: C, tokens: T, notifier: N, config: &ClientConfig) -> Self {
        let session = initial_session(&tokens);
        Self::with_initial(client, tokens, notifier, config, session)
    }

    pub fn with_initial(
        client: C,
        tokens: T,
        notifier: N,
        config: &ClientConfig,
        session: SessionState,
    ) -> Self {
        Self {
            api: MarketApi::new(client, &config.api_base_url),
            tokens,
            notifier,
            state: RefCell::new(AppState {
                session,
                ..Default::default()
            }),
            listeners: RefCell::new(Vec::new()),
        }
    }

    // --- 状态访问 ---

    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// 每次状态变化后调用
    pub fn subscribe(&self, listener: impl Fn() + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    pub fn dispatch(&self, action: Action) -> bool {
        let applied = self.state.borrow_mut().apply(action);
        if applied {
            for listener in self.listeners.borrow().iter() {
                listener();
            }
        }
        applied
    }

    fn generation(&self) -> u64 {
        self.state.borrow().session.generation
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// 每个请求都从存储中读取 token
    fn token(&self) -> Option<String> {
        self.tokens.load()
    }

    fn superseded(&self, operation: &str) -> ApiError {
        log::info!("{}: session changed while waiting, result dropped", operation);
        ApiError::superseded().in_op(operation)
    }

    fn fail(&self, title: &str, fallback: &str, e: &ApiError) {
        log::warn!("{}: {}", title, e);
        self.notifier.notify(Alert::error(title, e.user_message(fallback)));
    }

    // =========================================================
    // 会话
    // =========================================================

    /// 登录：换取 token，再拉取完整用户信息；任何一步失败都回到未登录
    pub async fn login(&self, credentials: &Credentials) -> Result<UserDetails> {
        self.dispatch(Action::Session(SessionAction::LoginPending));
        let generation = self.generation();
        log::info!("logging in as {}", credentials.email);

        let token = match self.api.login(credentials).await {
            Ok(resp) => resp.access_token,
            Err(e) => return Err(self.reject_login(generation, e, UNKNOWN_ERROR)),
        };
        if !self.is_current(generation) {
            return Err(self.superseded("session.login"));
        }
        self.tokens.save(&token);

        let details = match decode_subject(&token) {
            Ok(id) => self.api.get_user(id, Some(token.as_str())).await,
            Err(e) => Err(ApiError::from(e)),
        };
        let user = match details {
            Ok(user) => user,
            Err(e) => return Err(self.reject_login(generation, e, DETAILS_AFTER_LOGIN_FAILED)),
        };

        let fulfilled = SessionAction::LoginFulfilled {
            generation,
            token,
            user: user.clone(),
        };
        if !self.dispatch(Action::Session(fulfilled)) {
            return Err(self.superseded("session.login"));
        }

        log::info!("logged in as user {} ({})", user.id, user.role);
        self.notifier.notify(Alert::success(
            "Logged In!",
            format!("Welcome back, {}!", user.username),
        ));
        Ok(user)
    }

    fn reject_login(&self, generation: u64, e: ApiError, fallback: &str) -> ApiError {
        if self.dispatch(Action::Session(SessionAction::LoginRejected { generation })) {
            self.tokens.clear();
            self.fail("Login Failed", fallback, &e);
        }
        e.in_op("session.login")
    }

    /// 启动时为只有 id 的会话补拉用户信息；无需补拉时直接返回
    pub async fn restore_session(&self) -> Result<()> {
        let pending = self.with_state(|s| s.session.needs_details().then(|| s.session.user_id()));
        match pending.flatten() {
            Some(id) => self.fetch_user_details(id).await.map(|_| ()),
            None => Ok(()),
        }
    }

    /// 拉取用户详情；失败视为会话失效
    pub async fn fetch_user_details(&self, id: UserId) -> Result<UserDetails> {
        let generation = self.generation();
        let token = self.token();

        match self.api.get_user(id, token.as_deref()).await {
            Ok(user) => {
                let fulfilled = SessionAction::DetailsFulfilled {
                    generation,
                    user: user.clone(),
                };
                if self.dispatch(Action::Session(fulfilled)) {
                    Ok(user)
                } else {
                    Err(self.superseded("session.details"))
                }
            }
            Err(e) => {
                if self.dispatch(Action::Session(SessionAction::DetailsRejected { generation })) {
                    self.tokens.clear();
                    log::warn!("session for user {} invalidated: {}", id, e);
                    self.notifier
                        .notify(Alert::warning("Session Expired", "Please log in again."));
                }
                Err(e.in_op_with("session.details", id.to_string()))
            }
        }
    }

    /// 无论是否有请求在途，都清除 token 并回到未登录
    pub fn logout(&self) {
        self.tokens.clear();
        self.dispatch(Action::Session(SessionAction::LoggedOut));
        log::info!("logged out");
    }

    pub async fn register(&self, registration: &Registration) -> Result<ServerMessage> {
        match self.api.register(registration).await {
            Ok(msg) => {
                self.notifier
                    .notify(Alert::success("Registration Successful!", "You can now log in."));
                Ok(msg)
            }
            Err(e) => {
                self.fail(
                    "Registration Failed",
                    "An unknown error occurred. Please try again.",
                    &e,
                );
                Err(e.in_op("session.register"))
            }
        }
    }

    // =========================================================
    // 农产品
    // =========================================================

    pub async fn fetch_produce(&self, filters: ProduceFilters) -> Result<()> {
        self.dispatch(Action::Produce(ProduceAction::FetchPending));
        match self.api.list_produce(filters, self.token().as_deref()).await {
            Ok(items) => {
                self.dispatch(Action::Produce(ProduceAction::FetchFulfilled(items)));
                Ok(())
            }
            Err(e) => {
                self.dispatch(Action::Produce(ProduceAction::FetchRejected(describe(&e))));
                Err(e.in_op("produce.fetch"))
            }
        }
    }

    pub async fn fetch_my_produce(&self) -> Result<()> {
        self.dispatch(Action::Produce(ProduceAction::FetchMinePending));
        match self.api.my_listings(self.token().as_deref()).await {
            Ok(items) => {
                self.dispatch(Action::Produce(ProduceAction::FetchMineFulfilled(items)));
                Ok(())
            }
            Err(e) => {
                self.dispatch(Action::Produce(ProduceAction::FetchMineRejected(describe(&e))));
                Err(e.in_op("produce.fetch_mine"))
            }
        }
    }

    pub async fn create_produce(
        &self,
        produce: &NewProduce,
        image: Option<FileUpload>,
    ) -> Result<Produce> {
        self.dispatch(Action::Produce(ProduceAction::MutationPending));
        match self
            .api
            .create_produce(produce, image, self.token().as_deref())
            .await
        {
            Ok(created) => {
                self.dispatch(Action::Produce(ProduceAction::Created(created.clone())));
                self.notifier.notify(Alert::success(
                    "Produce Added!",
                    format!(
                        "{} has been successfully listed on the marketplace.",
                        created.name
                    ),
                ));
                Ok(created)
            }
            Err(e) => {
                self.dispatch(Action::Produce(ProduceAction::MutationRejected));
                self.fail(
                    "Submission Failed",
                    "There was an error listing your produce.",
                    &e,
                );
                Err(e.in_op("produce.create"))
            }
        }
    }

    pub async fn delete_produce(&self, id: ProduceId) -> Result<()> {
        self.dispatch(Action::Produce(ProduceAction::MutationPending));
        match self.api.delete_produce(id, self.token().as_deref()).await {
            Ok(()) => {
                self.dispatch(Action::Produce(ProduceAction::Deleted(id)));
                self.notifier
                    .notify(Alert::success("Deleted!", "Your produce has been deleted."));
                Ok(())
            }
            Err(e) => {
                self.dispatch(Action::Produce(ProduceAction::MutationRejected));
                self.fail("Delete Failed", "Could not delete the listing.", &e);
                Err(e.in_op_with("produce.delete", id.to_string()))
            }
        }
    }

    // =========================================================
    // 购物车
    // =========================================================

    pub fn add_to_cart(&self, produce: Produce) {
        let title = format!("{} added to cart!", produce.name);
        self.dispatch(Action::Cart(CartAction::Add(produce)));
        self.notifier.notify(Alert::success(title, ""));
    }

    pub fn remove_from_cart(&self, id: ProduceId) {
        self.dispatch(Action::Cart(CartAction::Remove(id)));
    }

    /// 调用方保证 `quantity > 0`
    pub fn update_cart_quantity(&self, id: ProduceId, quantity: u32) {
        self.dispatch(Action::Cart(CartAction::UpdateQuantity { id, quantity }));
    }

    pub fn clear_cart(&self) {
        self.dispatch(Action::Cart(CartAction::Clear));
    }

    /// 提交购物车；成功后以单独的动作清空购物车
    pub async fn submit_order(&self) -> Result<Order> {
        let lines = self.with_state(|s| s.cart.order_lines());
        if lines.is_empty() {
            return Err(ApiError::invalid_input("cart is empty").in_op("cart.submit"));
        }

        self.dispatch(Action::Cart(CartAction::SubmitPending));
        match self.api.create_order(lines, self.token().as_deref()).await {
            Ok(order) => {
                let id = order.id;
                self.dispatch(Action::Cart(CartAction::SubmitFulfilled(order.clone())));
                self.dispatch(Action::Cart(CartAction::Clear));
                log::info!("order {} placed", id);
                self.notifier.notify(Alert::success(
                    "Order Placed!",
                    format!("Your order #{} has been successfully submitted.", id),
                ));
                Ok(order)
            }
            Err(e) => {
                self.dispatch(Action::Cart(CartAction::SubmitRejected(describe(&e))));
                self.fail("Order Failed", "An unexpected error occurred.", &e);
                Err(e.in_op("cart.submit"))
            }
        }
    }

    // =========================================================
    // 订单
    // =========================================================

    pub async fn fetch_farmer_orders(&self) -> Result<()> {
        self.dispatch(Action::Orders(OrdersAction::FetchIncomingPending));
        match self.api.farmer_orders(self.token().as_deref()).await {
            Ok(orders) => {
                self.dispatch(Action::Orders(OrdersAction::FetchIncomingFulfilled(orders)));
                Ok(())
            }
            Err(e) => {
                self.dispatch(Action::Orders(OrdersAction::FetchRejected(describe(&e))));
                Err(e.in_op("orders.fetch_incoming"))
            }
        }
    }

    pub async fn fetch_my_orders(&self) -> Result<()> {
        self.dispatch(Action::Orders(OrdersAction::FetchMinePending));
        match self.api.my_orders(self.token().as_deref()).await {
            Ok(orders) => {
                self.dispatch(Action::Orders(OrdersAction::FetchMineFulfilled(orders)));
                Ok(())
            }
            Err(e) => {
                self.dispatch(Action::Orders(OrdersAction::FetchRejected(describe(&e))));
                Err(e.in_op("orders.fetch_mine"))
            }
        }
    }

    pub async fn update_order_status(&self, id: OrderId, status: OrderStatus) -> Result<Order> {
        if !status.is_settable() {
            return Err(ApiError::invalid_input(format!("status {} cannot be set", status))
                .in_op_with("orders.update_status", id.to_string()));
        }

        self.dispatch(Action::Orders(OrdersAction::StatusPending(id)));
        match self
            .api
            .update_order_status(id, status, self.token().as_deref())
            .await
        {
            Ok(order) => {
                self.dispatch(Action::Orders(OrdersAction::StatusUpdated {
                    id: order.id,
                    status: order.status,
                }));
                Ok(order)
            }
            Err(e) => {
                self.dispatch(Action::Orders(OrdersAction::StatusRejected));
                self.fail("Update Failed", "Could not update the order status.", &e);
                Err(e.in_op_with("orders.update_status", id.to_string()))
            }
        }
    }

    // =========================================================
    // 管理员
    // =========================================================

    pub async fn fetch_all_users(&self) -> Result<()> {
        self.dispatch(Action::Admin(AdminAction::FetchPending));
        match self.api.list_users(self.token().as_deref()).await {
            Ok(users) => {
                self.dispatch(Action::Admin(AdminAction::FetchFulfilled(users)));
                Ok(())
            }
            Err(e) => {
                self.dispatch(Action::Admin(AdminAction::FetchRejected(describe(&e))));
                Err(e.in_op("admin.fetch_users"))
            }
        }
    }

    pub async fn approve_user(&self, id: UserId) -> Result<AdminUser> {
        match self.api.set_approval(id, true, self.token().as_deref()).await {
            Ok(user) => {
                self.dispatch(Action::Admin(AdminAction::UserUpdated(user.clone())));
                self.notifier.notify(Alert::success(
                    "Approved!",
                    format!("{} has been approved.", user.username),
                ));
                Ok(user)
            }
            Err(e) => {
                self.fail("Approval Failed", "Could not approve the user.", &e);
                Err(e.in_op_with("admin.approve", id.to_string()))
            }
        }
    }
}
