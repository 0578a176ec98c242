use crate::error::Result;
use crate::request::{FileUpload, FormPart, HttpClient, HttpMethod, HttpRequest};
use farmlink_shared::protocol::{
    ApiRequest, CREATE_PRODUCE_PATH, CreateOrderRequest, DeleteProduceRequest,
    FarmerOrdersRequest, GetUserRequest, ListProduceRequest, ListUsersRequest, MyListingsRequest,
    MyOrdersRequest, UpdateApprovalRequest, UpdateOrderStatusRequest,
};
use farmlink_shared::{
    AdminUser, Credentials, LoginResponse, NewProduce, Order, OrderId, OrderLine, OrderStatus,
    Produce, ProduceFilters, ProduceId, Registration, ServerMessage, UserDetails, UserId,
};

/// 市场 REST API 网关
///
/// 只负责把请求类型翻译成 HTTP 调用，不持有任何状态；
/// token 由调用方（Store）每次传入，对应浏览器端每次请求都从存储读取 token 的行为。
pub struct MarketApi<C: HttpClient> {
    client: C,
    base_url: String,
}

impl<C: HttpClient> MarketApi<C> {
    pub fn new(client: C, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送任意 `ApiRequest`
    pub async fn send<R: ApiRequest>(&self, req: &R, token: Option<&str>) -> Result<R::Response> {
        let path = req.path();
        let mut http = HttpRequest::new(&self.url(&path), R::METHOD);

        if R::AUTHENTICATED {
            if let Some(token) = token {
                http = http.with_bearer(token);
            }
        }
        if R::METHOD.has_body() {
            http = http.with_json(serde_json::to_string(req)?);
        }

        log::debug!("{} {}", R::METHOD.as_str(), path);
        let resp = self
            .client
            .send(http)
            .await
            .map_err(|e| e.in_op_with("api.send", path.clone()))?;
        resp.decode()
            .map_err(|e| e.in_op_with("api.decode", path))
    }

    // =========================================================
    // 认证
    // =========================================================

    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        self.send(credentials, None).await
    }

    pub async fn register(&self, registration: &Registration) -> Result<ServerMessage> {
        self.send(registration, None).await
    }

    pub async fn get_user(&self, id: UserId, token: Option<&str>) -> Result<UserDetails> {
        self.send(&GetUserRequest { id }, token).await
    }

    // =========================================================
    // 农产品
    // =========================================================

    pub async fn list_produce(
        &self,
        filters: ProduceFilters,
        token: Option<&str>,
    ) -> Result<Vec<Produce>> {
        self.send(&ListProduceRequest { filters }, token).await
    }

    pub async fn my_listings(&self, token: Option<&str>) -> Result<Vec<Produce>> {
        self.send(&MyListingsRequest, token).await
    }

    /// 以 multipart 提交新挂牌，图片可选
    pub async fn create_produce(
        &self,
        produce: &NewProduce,
        image: Option<FileUpload>,
        token: Option<&str>,
    ) -> Result<Produce> {
        let mut parts: Vec<FormPart> = produce
            .form_fields()
            .into_iter()
            .map(|(name, value)| FormPart::Text {
                name: name.to_string(),
                value,
            })
            .collect();
        if let Some(file) = image {
            parts.push(FormPart::File {
                name: "image".to_string(),
                file,
            });
        }

        let mut http =
            HttpRequest::new(&self.url(CREATE_PRODUCE_PATH), HttpMethod::Post).with_multipart(parts);
        if let Some(token) = token {
            http = http.with_bearer(token);
        }

        let resp = self
            .client
            .send(http)
            .await
            .map_err(|e| e.in_op_with("api.send", CREATE_PRODUCE_PATH))?;
        resp.decode()
            .map_err(|e| e.in_op_with("api.decode", CREATE_PRODUCE_PATH))
    }

    pub async fn delete_produce(&self, id: ProduceId, token: Option<&str>) -> Result<()> {
        self.send(&DeleteProduceRequest { id }, token).await
    }

    // =========================================================
    // 订单
    // =========================================================

    pub async fn create_order(&self, items: Vec<OrderLine>, token: Option<&str>) -> Result<Order> {
        self.send(&CreateOrderRequest { items }, token).await
    }

    pub async fn my_orders(&self, token: Option<&str>) -> Result<Vec<Order>> {
        self.send(&MyOrdersRequest, token).await
    }

    pub async fn farmer_orders(&self, token: Option<&str>) -> Result<Vec<Order>> {
        self.send(&FarmerOrdersRequest, token).await
    }

    pub async fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
        token: Option<&str>,
    ) -> Result<Order> {
        self.send(&UpdateOrderStatusRequest { order_id, status }, token)
            .await
    }

    // =========================================================
    // 管理员
    // =========================================================

    pub async fn list_users(&self, token: Option<&str>) -> Result<Vec<AdminUser>> {
        self.send(&ListUsersRequest, token).await
    }

    pub async fn set_approval(
        &self,
        user_id: UserId,
        is_approved: bool,
        token: Option<&str>,
    ) -> Result<AdminUser> {
        self.send(
            &UpdateApprovalRequest {
                user_id,
                is_approved,
            },
            token,
        )
        .await
    }
}
