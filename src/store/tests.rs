use super::*;
use crate::error::ApiErrorKind;
use crate::notify::AlertLevel;
use crate::notify::testing::RecordingNotifier;
use crate::request::HttpMethod;
use crate::request::testing::MockHttpClient;
use crate::session::SessionUser;
use crate::token::{MemoryTokenStore, fake_jwt};
use farmlink_shared::{Price, Role, Unit};
use serde_json::{Value, json};

const API: &str = "http://api.test/api";

type TestStore = Store<MockHttpClient, MemoryTokenStore, RecordingNotifier>;

struct Harness {
    client: MockHttpClient,
    tokens: MemoryTokenStore,
    notifier: RecordingNotifier,
    store: TestStore,
}

fn url(path: &str) -> String {
    format!("{}{}", API, path)
}

fn harness_with(tokens: MemoryTokenStore) -> Harness {
    let client = MockHttpClient::new();
    let notifier = RecordingNotifier::new();
    let config = ClientConfig {
        api_base_url: API.to_string(),
        ..Default::default()
    };
    let store = Store::new(client.clone(), tokens.clone(), notifier.clone(), &config);
    Harness {
        client,
        tokens,
        notifier,
        store,
    }
}

fn harness() -> Harness {
    harness_with(MemoryTokenStore::new())
}

/// 已登录（完整用户信息）的 Store
fn logged_in(role: Role) -> Harness {
    let token = fake_jwt(json!({"sub": "1"}));
    let tokens = MemoryTokenStore::with_token(&token);
    let client = MockHttpClient::new();
    let notifier = RecordingNotifier::new();
    let config = ClientConfig {
        api_base_url: API.to_string(),
        ..Default::default()
    };
    let session = SessionState {
        token: Some(token),
        user: Some(SessionUser::Full(UserDetails {
            id: 1,
            username: "me".into(),
            email: None,
            role,
        })),
        is_authenticated: true,
        ..Default::default()
    };
    let store = Store::with_initial(
        client.clone(),
        tokens.clone(),
        notifier.clone(),
        &config,
        session,
    );
    Harness {
        client,
        tokens,
        notifier,
        store,
    }
}

fn credentials() -> Credentials {
    Credentials {
        email: "a@b.com".into(),
        password: "pw".into(),
    }
}

fn produce_json(id: u64, name: &str, price: &str) -> Value {
    json!({
        "id": id, "name": name, "price": price, "quantity": 20,
        "unit": "kg", "is_available": true, "location": "Nakuru", "farmer_id": 1
    })
}

fn produce(id: u64, name: &str, price: f64) -> Produce {
    Produce {
        id,
        name: name.into(),
        description: None,
        price: Price::new(price),
        quantity: 20,
        unit: Unit::Kg,
        image_url: None,
        is_available: true,
        location: Some("Nakuru".into()),
        created_at: None,
        farmer_id: Some(1),
    }
}

fn order_json(id: u64, status: &str) -> Value {
    json!({
        "id": id,
        "buyer_id": 3,
        "status": status,
        "total_price": "160.00",
        "created_at": "2024-05-02T08:30:00",
        "order_items": [
            {"quantity": 2, "price_per_unit": "80.00", "produce": {"id": 4, "name": "Tomatoes", "unit": "crate"}}
        ]
    })
}

fn admin_user_json(id: u64, username: &str, approved: bool) -> Value {
    json!({
        "id": id, "username": username, "email": format!("{}@farm.test", username),
        "phone_number": "0700000000", "role": "farmer", "is_approved": approved
    })
}

// =========================================================
// 会话
// =========================================================

#[tokio::test]
async fn test_stored_token_yields_partial_session_before_any_request() {
    let token = fake_jwt(json!({"sub": "42"}));
    let h = harness_with(MemoryTokenStore::with_token(&token));

    let session = h.store.snapshot().session;
    assert!(session.is_authenticated);
    assert_eq!(session.user, Some(SessionUser::Partial { id: 42 }));
    assert!(h.client.requests().is_empty());
}

#[tokio::test]
async fn test_login_scenario_farmer_42() {
    let h = harness();
    let token = fake_jwt(json!({"sub": "42"}));
    h.client.mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        200,
        json!({"access_token": token, "refresh_token": "r"}),
    );
    h.client.mock_response(
        HttpMethod::Get,
        &url("/users/42"),
        200,
        json!({"id": 42, "username": "a", "email": "a@b.com", "role": "farmer"}),
    );

    let user = h.store.login(&credentials()).await.unwrap();
    assert_eq!(user.role, Role::Farmer);

    let session = h.store.snapshot().session;
    assert!(session.is_authenticated);
    assert!(!session.is_loading);
    let Some(SessionUser::Full(details)) = session.user else {
        panic!("expected full user");
    };
    assert_eq!((details.id, details.username.as_str(), details.role), (42, "a", Role::Farmer));
    assert_eq!(h.tokens.load().as_deref(), Some(token.as_str()));

    // 详情请求带上了新 token
    let sent = h.client.requests();
    assert_eq!(
        sent[1].headers.get("Authorization").cloned(),
        Some(format!("Bearer {}", token))
    );
    assert_eq!(h.notifier.titles(), vec!["Logged In!"]);
    assert_eq!(h.notifier.alerts()[0].text, "Welcome back, a!");
}

#[tokio::test]
async fn test_login_rejected_credentials() {
    let h = harness();
    h.client.mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        401,
        json!({"message": "Invalid credentials"}),
    );

    let err = h.store.login(&credentials()).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Unauthorized);

    let session = h.store.snapshot().session;
    assert!(!session.is_authenticated);
    assert!(!session.is_loading);
    assert_eq!(h.tokens.load(), None);

    let alerts = h.notifier.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level, AlertLevel::Error);
    assert_eq!(alerts[0].title, "Login Failed");
    assert_eq!(alerts[0].text, "Invalid credentials");
}

#[tokio::test]
async fn test_login_network_failure_leaves_no_token() {
    let stale = fake_jwt(json!({"sub": "5"}));
    let h = harness_with(MemoryTokenStore::with_token(&stale));
    h.client.mock_offline(HttpMethod::Post, &url("/auth/login"));

    let err = h.store.login(&credentials()).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Network);
    assert_eq!(h.tokens.load(), None);
    assert!(!h.store.snapshot().session.is_authenticated);
    assert_eq!(h.notifier.alerts()[0].text, "An unknown error occurred.");
}

#[tokio::test]
async fn test_login_detail_failure_erases_saved_token() {
    let h = harness();
    let token = fake_jwt(json!({"sub": "42"}));
    h.client.mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        200,
        json!({"access_token": token}),
    );
    h.client
        .mock_response(HttpMethod::Get, &url("/users/42"), 500, json!({}));

    assert!(h.store.login(&credentials()).await.is_err());
    assert_eq!(h.tokens.load(), None);

    let session = h.store.snapshot().session;
    assert!(!session.is_authenticated);
    assert!(session.user.is_none());
    assert_eq!(
        h.notifier.alerts()[0].text,
        "Failed to fetch user details after login."
    );
}

#[tokio::test]
async fn test_login_with_undecodable_token_fails() {
    let h = harness();
    h.client.mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        200,
        json!({"access_token": "opaque"}),
    );

    let err = h.store.login(&credentials()).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Token);
    assert_eq!(h.tokens.load(), None);
    assert!(!h.store.snapshot().session.is_authenticated);
}

#[tokio::test]
async fn test_restore_session_fills_role() {
    let token = fake_jwt(json!({"sub": 42}));
    let h = harness_with(MemoryTokenStore::with_token(&token));
    h.client.mock_response(
        HttpMethod::Get,
        &url("/users/42"),
        200,
        json!({"id": 42, "username": "a", "role": "buyer"}),
    );

    h.store.restore_session().await.unwrap();
    assert_eq!(h.store.snapshot().session.role(), Some(Role::Buyer));
    // 静默恢复，不弹提示
    assert!(h.notifier.alerts().is_empty());

    // 已有完整信息时不再请求
    h.store.restore_session().await.unwrap();
    assert_eq!(h.client.requests().len(), 1);
}

#[tokio::test]
async fn test_restore_session_failure_logs_out() {
    let token = fake_jwt(json!({"sub": "42"}));
    let h = harness_with(MemoryTokenStore::with_token(&token));
    h.client.mock_response(
        HttpMethod::Get,
        &url("/users/42"),
        401,
        json!({"msg": "Token has expired"}),
    );

    assert!(h.store.restore_session().await.is_err());
    assert!(!h.store.snapshot().session.is_authenticated);
    assert_eq!(h.tokens.load(), None);
    assert_eq!(h.notifier.titles(), vec!["Session Expired"]);
}

#[tokio::test]
async fn test_logout_during_detail_fetch_drops_late_success() {
    let token = fake_jwt(json!({"sub": "42"}));
    let h = harness_with(MemoryTokenStore::with_token(&token));
    h.client.mock_response(
        HttpMethod::Get,
        &url("/users/42"),
        200,
        json!({"id": 42, "username": "a", "role": "farmer"}),
    );
    let release = h.client.hold(HttpMethod::Get, &url("/users/42"));

    let restore = h.store.restore_session();
    let interrupt = async {
        h.store.logout();
        let _ = release.send(());
    };
    let (result, ()) = futures::join!(restore, interrupt);

    assert!(result.unwrap_err().is_superseded());
    let session = h.store.snapshot().session;
    assert!(!session.is_authenticated);
    assert!(session.user.is_none());
    assert_eq!(h.tokens.load(), None);
}

#[tokio::test]
async fn test_late_detail_failure_does_not_touch_new_session() {
    let old = fake_jwt(json!({"sub": "42"}));
    let h = harness_with(MemoryTokenStore::with_token(&old));
    h.client
        .mock_response(HttpMethod::Get, &url("/users/42"), 401, json!({}));
    let release = h.client.hold(HttpMethod::Get, &url("/users/42"));

    let fresh = fake_jwt(json!({"sub": "9"}));
    h.client.mock_response(
        HttpMethod::Post,
        &url("/auth/login"),
        200,
        json!({"access_token": fresh}),
    );
    h.client.mock_response(
        HttpMethod::Get,
        &url("/users/9"),
        200,
        json!({"id": 9, "username": "new", "role": "admin"}),
    );

    let restore = h.store.restore_session();
    let relogin = async {
        h.store.logout();
        let user = h.store.login(&credentials()).await;
        let _ = release.send(());
        user
    };
    let (stale, fresh_user) = futures::join!(restore, relogin);

    assert_eq!(stale.unwrap_err().kind, ApiErrorKind::Unauthorized);
    assert_eq!(fresh_user.unwrap().id, 9);

    // 迟到的 401 既没有登出新会话，也没有擦除新 token
    let session = h.store.snapshot().session;
    assert!(session.is_authenticated);
    assert_eq!(session.role(), Some(Role::Admin));
    assert_eq!(h.tokens.load().as_deref(), Some(fresh.as_str()));
    assert!(!h.notifier.titles().contains(&"Session Expired".to_string()));
}

#[tokio::test]
async fn test_logout_clears_everything() {
    let h = logged_in(Role::Buyer);
    h.store.logout();
    assert_eq!(h.tokens.load(), None);
    let session = h.store.snapshot().session;
    assert!(!session.is_authenticated);
    assert!(session.token.is_none());
}

#[tokio::test]
async fn test_register_success_and_failure() {
    let h = harness();
    h.client.mock_response(
        HttpMethod::Post,
        &url("/auth/register"),
        201,
        json!({"message": "User registered successfully"}),
    );
    let registration = Registration {
        username: "wanjiru".into(),
        email: "w@farm.test".into(),
        phone_number: "0711111111".into(),
        password: "secret1".into(),
        role: Role::Farmer,
    };
    h.store.register(&registration).await.unwrap();
    assert_eq!(h.notifier.titles(), vec!["Registration Successful!"]);

    h.client.mock_response(
        HttpMethod::Post,
        &url("/auth/register"),
        409,
        json!({"message": "Email already exists"}),
    );
    let err = h.store.register(&registration).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Conflict);
    assert_eq!(h.notifier.alerts()[1].text, "Email already exists");
}

// =========================================================
// 农产品
// =========================================================

#[tokio::test]
async fn test_fetch_produce_with_filters() {
    let h = harness();
    h.client.mock_response(
        HttpMethod::Get,
        &url("/produce/?name=kale&max_price=50"),
        200,
        json!([produce_json(1, "Kale", "30.00")]),
    );

    let filters = ProduceFilters {
        name: Some("kale".into()),
        max_price: Some(50.0),
        ..Default::default()
    };
    h.store.fetch_produce(filters).await.unwrap();

    let state = h.store.snapshot().produce;
    assert_eq!(state.items.len(), 1);
    assert_eq!(state.items[0].price, Price::new(30.0));
    assert!(!state.is_loading);
}

#[tokio::test]
async fn test_read_failure_is_recorded_without_alert() {
    let h = logged_in(Role::Farmer);
    h.client.mock_response(
        HttpMethod::Get,
        &url("/produce/my-listings"),
        403,
        json!({"message": "Your account is pending approval."}),
    );

    assert!(h.store.fetch_my_produce().await.is_err());
    let state = h.store.snapshot().produce;
    assert_eq!(state.error.as_deref(), Some("Your account is pending approval."));
    assert!(!state.is_loading);
    assert!(h.notifier.alerts().is_empty());
}

#[tokio::test]
async fn test_delete_removes_from_both_views() {
    let h = logged_in(Role::Farmer);
    h.client.mock_response(
        HttpMethod::Get,
        &url("/produce/"),
        200,
        json!([produce_json(1, "Kale", "30"), produce_json(2, "Maize", "40")]),
    );
    h.client.mock_response(
        HttpMethod::Get,
        &url("/produce/my-listings"),
        200,
        json!([produce_json(2, "Maize", "40")]),
    );
    h.client
        .mock_raw(HttpMethod::Delete, &url("/produce/2"), 204, "");

    h.store.fetch_produce(ProduceFilters::default()).await.unwrap();
    h.store.fetch_my_produce().await.unwrap();
    h.store.delete_produce(2).await.unwrap();

    let state = h.store.snapshot().produce;
    assert_eq!(state.items.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);
    assert!(state.my_items.is_empty());
    assert!(!state.is_mutating);
    assert_eq!(h.notifier.titles(), vec!["Deleted!"]);
}

#[tokio::test]
async fn test_delete_failure_leaves_lists_unchanged() {
    let h = logged_in(Role::Farmer);
    h.client.mock_response(
        HttpMethod::Get,
        &url("/produce/my-listings"),
        200,
        json!([produce_json(2, "Maize", "40")]),
    );
    h.client.mock_response(
        HttpMethod::Delete,
        &url("/produce/2"),
        403,
        json!({"message": "You are not authorized to delete this item"}),
    );

    h.store.fetch_my_produce().await.unwrap();
    assert!(h.store.delete_produce(2).await.is_err());

    let state = h.store.snapshot().produce;
    assert_eq!(state.my_items.len(), 1);
    assert!(state.error.is_none());
    let alert = &h.notifier.alerts()[0];
    assert_eq!(alert.title, "Delete Failed");
    assert_eq!(alert.text, "You are not authorized to delete this item");
}

#[tokio::test]
async fn test_create_produce_appends_to_my_listings() {
    let h = logged_in(Role::Farmer);
    h.client.mock_response(
        HttpMethod::Post,
        &url("/produce/"),
        201,
        produce_json(8, "Kale", "30.00"),
    );

    let new = NewProduce {
        name: "Kale".into(),
        price: Price::new(30.0),
        quantity: 20,
        unit: Unit::Kg,
        location: "Nakuru".into(),
        description: String::new(),
    };
    let created = h.store.create_produce(&new, None).await.unwrap();
    assert_eq!(created.id, 8);

    let state = h.store.snapshot().produce;
    assert_eq!(state.my_items.iter().map(|p| p.id).collect::<Vec<_>>(), vec![8]);
    assert!(state.items.is_empty());
    assert_eq!(
        h.notifier.alerts()[0].text,
        "Kale has been successfully listed on the marketplace."
    );
}

// =========================================================
// 购物车与订单
// =========================================================

#[tokio::test]
async fn test_cart_add_twice_increments() {
    let h = logged_in(Role::Buyer);
    h.store.add_to_cart(produce(4, "Tomatoes", 80.0));
    h.store.add_to_cart(produce(4, "Tomatoes", 80.0));
    h.store.remove_from_cart(99);

    let cart = h.store.snapshot().cart;
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.items[0].cart_quantity, 2);
    assert_eq!(h.notifier.titles()[0], "Tomatoes added to cart!");
}

#[tokio::test]
async fn test_submit_order_clears_cart_as_second_transition() {
    let h = logged_in(Role::Buyer);
    h.client
        .mock_response(HttpMethod::Post, &url("/orders/"), 201, order_json(31, "Pending"));

    h.store.add_to_cart(produce(4, "Tomatoes", 80.0));
    h.store.update_cart_quantity(4, 2);

    let seen = std::rc::Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    h.store.subscribe(move || sink.borrow_mut().push(()));

    let order = h.store.submit_order().await.unwrap();
    assert_eq!(order.id, 31);

    // pending, fulfilled, clear
    assert_eq!(seen.borrow().len(), 3);
    let cart = h.store.snapshot().cart;
    assert!(cart.is_empty());
    assert_eq!(cart.status, crate::slices::RequestStatus::Succeeded);
    assert_eq!(cart.last_order.map(|o| o.id), Some(31));

    let sent = h.client.requests();
    let Some(crate::request::RequestBody::Json(body)) = &sent[0].body else {
        panic!("expected json body");
    };
    assert_eq!(body, r#"{"items":[{"produce_id":4,"quantity":2}]}"#);
    assert_eq!(
        h.notifier.alerts().last().map(|a| a.text.clone()),
        Some("Your order #31 has been successfully submitted.".to_string())
    );
}

#[tokio::test]
async fn test_submit_order_failure_keeps_cart() {
    let h = logged_in(Role::Buyer);
    h.client.mock_response(
        HttpMethod::Post,
        &url("/orders/"),
        400,
        json!({"message": "Not enough stock for Tomatoes"}),
    );
    h.store.add_to_cart(produce(4, "Tomatoes", 80.0));

    assert!(h.store.submit_order().await.is_err());
    let cart = h.store.snapshot().cart;
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.status, crate::slices::RequestStatus::Failed);
    assert_eq!(h.notifier.alerts().last().map(|a| a.title.as_str()), Some("Order Failed"));
}

#[tokio::test]
async fn test_empty_cart_is_not_submitted() {
    let h = logged_in(Role::Buyer);
    let err = h.store.submit_order().await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::InvalidInput);
    assert!(h.client.requests().is_empty());
}

#[tokio::test]
async fn test_update_order_status_patches_status_only() {
    let h = logged_in(Role::Farmer);
    h.client.mock_response(
        HttpMethod::Get,
        &url("/orders/farmer"),
        200,
        json!([order_json(1, "Pending"), order_json(2, "Pending")]),
    );
    h.client
        .mock_response(HttpMethod::Patch, &url("/orders/2"), 200, order_json(2, "Confirmed"));

    h.store.fetch_farmer_orders().await.unwrap();
    h.store
        .update_order_status(2, OrderStatus::Confirmed)
        .await
        .unwrap();

    let orders = h.store.snapshot().orders;
    assert_eq!(orders.incoming[0].status, OrderStatus::Pending);
    assert_eq!(orders.incoming[1].status, OrderStatus::Confirmed);
    assert_eq!(orders.updating, None);

    let sent = h.client.requests();
    let Some(crate::request::RequestBody::Json(body)) = &sent[1].body else {
        panic!("expected json body");
    };
    assert_eq!(body, r#"{"status":"Confirmed"}"#);
}

#[tokio::test]
async fn test_pending_status_cannot_be_set() {
    let h = logged_in(Role::Farmer);
    let err = h
        .store
        .update_order_status(2, OrderStatus::Pending)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::InvalidInput);
    assert!(h.client.requests().is_empty());
}

#[tokio::test]
async fn test_buyer_orders() {
    let h = logged_in(Role::Buyer);
    h.client.mock_response(
        HttpMethod::Get,
        &url("/orders/"),
        200,
        json!([order_json(5, "Delivered")]),
    );
    h.store.fetch_my_orders().await.unwrap();

    let orders = h.store.snapshot().orders;
    assert_eq!(orders.mine.len(), 1);
    assert_eq!(orders.mine[0].order_items[0].produce.name, "Tomatoes");
    assert!(orders.incoming.is_empty());
}

// =========================================================
// 管理员
// =========================================================

#[tokio::test]
async fn test_admin_approves_user_7() {
    let h = logged_in(Role::Admin);
    h.client.mock_response(
        HttpMethod::Get,
        &url("/admin/users"),
        200,
        json!([
            admin_user_json(5, "kamau", false),
            admin_user_json(7, "akinyi", false),
            admin_user_json(9, "otieno", true)
        ]),
    );
    h.client.mock_response(
        HttpMethod::Patch,
        &url("/admin/users/7"),
        200,
        admin_user_json(7, "akinyi", true),
    );

    h.store.fetch_all_users().await.unwrap();
    let before = h.store.snapshot().admin.users;
    h.store.approve_user(7).await.unwrap();
    let after = h.store.snapshot().admin.users;

    assert_eq!(after.len(), 3);
    assert!(after[1].is_approved);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);
    assert_eq!(h.notifier.alerts()[0].text, "akinyi has been approved.");
}

#[tokio::test]
async fn test_approval_failure_alerts() {
    let h = logged_in(Role::Admin);
    h.client
        .mock_response(HttpMethod::Patch, &url("/admin/users/7"), 500, json!({}));

    assert!(h.store.approve_user(7).await.is_err());
    let alert = &h.notifier.alerts()[0];
    assert_eq!(alert.title, "Approval Failed");
    assert_eq!(alert.text, "Could not approve the user.");
}
