//! 全局状态上下文
//!
//! 核心库的 `Store` 不是响应式的：这里把它放进 Context，
//! 每次派发动作后递增 `version` 信号，组件通过 `select` 读取状态并建立依赖。

use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use farmlink::{Alert, AppState, ClientConfig, Notifier, Store};
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;
use leptos::task::spawn_local;

use crate::web::{BrowserTokenStore, FetchClient};

pub type AppStore = Store<FetchClient, BrowserTokenStore, AlertNotifier>;

const TOAST_DURATION: Duration = Duration::from_secs(3);

// ============================================================================
// 提示
// ============================================================================

/// 把核心库的提示转为界面状态
///
/// 错误和警告以模态框展示，需要手动关闭；成功提示以 toast 展示，3 秒后自动消失。
#[derive(Clone, Copy)]
pub struct AlertNotifier {
    pub modal: RwSignal<Option<Alert>>,
    pub toasts: RwSignal<Vec<(u64, Alert)>>,
    next_id: StoredValue<u64>,
}

impl AlertNotifier {
    fn new() -> Self {
        Self {
            modal: RwSignal::new(None),
            toasts: RwSignal::new(Vec::new()),
            next_id: StoredValue::new(0),
        }
    }

    pub fn dismiss_modal(&self) {
        self.modal.set(None);
    }
}

impl Notifier for AlertNotifier {
    fn notify(&self, alert: Alert) {
        if alert.is_blocking() {
            self.modal.set(Some(alert));
            return;
        }

        let id = self.next_id.get_value();
        self.next_id.set_value(id + 1);
        self.toasts.update(|list| list.push((id, alert)));

        let toasts = self.toasts;
        set_timeout(
            move || toasts.update(|list| list.retain(|(i, _)| *i != id)),
            TOAST_DURATION,
        );
    }
}

// ============================================================================
// Store 上下文
// ============================================================================

#[derive(Clone, Copy)]
pub struct StoreContext {
    store: StoredValue<Rc<AppStore>, LocalStorage>,
    version: RwSignal<u64>,
    pub alerts: AlertNotifier,
}

impl StoreContext {
    pub fn store(&self) -> Rc<AppStore> {
        self.store.get_value()
    }

    /// 读取状态；在响应式作用域中调用时会随状态变化重新执行
    pub fn select<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        self.version.track();
        self.store.with_value(|store| store.with_state(f))
    }

    /// 在后台执行一个异步操作
    ///
    /// 错误已经由 Store 记录到状态或以提示展示，这里只需要丢弃结果。
    pub fn spawn<F, Fut>(&self, op: F)
    where
        F: FnOnce(Rc<AppStore>) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        spawn_local(op(self.store()));
    }
}

/// 创建 Store 并放入 Context
///
/// 初始会话在这里从 LocalStorage 推导一次。
pub fn provide_store(config: &ClientConfig) -> StoreContext {
    let alerts = AlertNotifier::new();
    let store = Store::new(
        FetchClient,
        BrowserTokenStore::new(&config.token_key),
        alerts,
        config,
    );

    let version = RwSignal::new(0u64);
    store.subscribe(move || version.update(|v| *v += 1));

    let ctx = StoreContext {
        store: StoredValue::new_local(Rc::new(store)),
        version,
        alerts,
    };
    provide_context(ctx);
    ctx
}

/// 从 Context 获取 Store
pub fn use_store() -> StoreContext {
    use_context::<StoreContext>().expect("StoreContext should be provided")
}
