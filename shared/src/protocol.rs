use crate::{
    AdminUser, Credentials, LoginResponse, Order, OrderId, OrderLine, OrderStatus, Produce,
    ProduceFilters, ProduceId, Registration, ServerMessage, UserDetails, UserId,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// Whether requests with this method carry a JSON body.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// Path parameters live on the request struct as `#[serde(skip)]` fields so that only the
/// remaining fields end up in the JSON body.
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the bearer token must be attached.
    const AUTHENTICATED: bool = true;
    /// The URL path (relative to the API base), including any query string.
    fn path(&self) -> String;
}

// =========================================================
// Authentication
// =========================================================

impl ApiRequest for Credentials {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/auth/login".to_string()
    }
}

impl ApiRequest for Registration {
    type Response = ServerMessage;
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;

    fn path(&self) -> String {
        "/auth/register".to_string()
    }
}

/// Fetch full details of one user
#[derive(Debug, Serialize)]
pub struct GetUserRequest {
    #[serde(skip)]
    pub id: UserId,
}

impl ApiRequest for GetUserRequest {
    type Response = UserDetails;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/users/{}", self.id)
    }
}

// =========================================================
// Produce
// =========================================================

/// List public marketplace produce, optionally filtered
#[derive(Debug, Default, Serialize)]
pub struct ListProduceRequest {
    #[serde(skip)]
    pub filters: ProduceFilters,
}

impl ApiRequest for ListProduceRequest {
    type Response = Vec<Produce>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/produce/{}", self.filters.to_query_string())
    }
}

/// List the current farmer's own listings
#[derive(Debug, Serialize)]
pub struct MyListingsRequest;

impl ApiRequest for MyListingsRequest {
    type Response = Vec<Produce>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/produce/my-listings".to_string()
    }
}

/// Delete one listing (204 No Content)
#[derive(Debug, Serialize)]
pub struct DeleteProduceRequest {
    #[serde(skip)]
    pub id: ProduceId,
}

impl ApiRequest for DeleteProduceRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/produce/{}", self.id)
    }
}

/// Multipart endpoint for new listings; the body is built from `NewProduce::form_fields`.
pub const CREATE_PRODUCE_PATH: &str = "/produce/";

// =========================================================
// Orders
// =========================================================

/// Place an order from the cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderLine>,
}

impl ApiRequest for CreateOrderRequest {
    type Response = Order;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/orders/".to_string()
    }
}

/// Orders placed by the current buyer
#[derive(Debug, Serialize)]
pub struct MyOrdersRequest;

impl ApiRequest for MyOrdersRequest {
    type Response = Vec<Order>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/orders/".to_string()
    }
}

/// Orders containing the current farmer's produce
#[derive(Debug, Serialize)]
pub struct FarmerOrdersRequest;

impl ApiRequest for FarmerOrdersRequest {
    type Response = Vec<Order>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/orders/farmer".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateOrderStatusRequest {
    #[serde(skip)]
    pub order_id: OrderId,
    pub status: OrderStatus,
}

impl ApiRequest for UpdateOrderStatusRequest {
    type Response = Order;
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        format!("/orders/{}", self.order_id)
    }
}

// =========================================================
// Admin
// =========================================================

#[derive(Debug, Serialize)]
pub struct ListUsersRequest;

impl ApiRequest for ListUsersRequest {
    type Response = Vec<AdminUser>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/admin/users".to_string()
    }
}

#[derive(Debug, Serialize)]
pub struct UpdateApprovalRequest {
    #[serde(skip)]
    pub user_id: UserId,
    pub is_approved: bool,
}

impl ApiRequest for UpdateApprovalRequest {
    type Response = AdminUser;
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        format!("/admin/users/{}", self.user_id)
    }
}
