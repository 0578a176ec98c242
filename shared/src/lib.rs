//! FarmLink 前后端共享的数据模型
//!
//! - 领域模型：用户、农产品、订单
//! - `protocol`: 每个 REST 端点的请求/响应定义
//! - `capability`: 角色能力表
//! - `date`: 服务端时间戳解析

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub mod capability;
pub mod date;
pub mod protocol;

pub use capability::{Capability, Role};

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const BEARER_PREFIX: &str = "Bearer ";

// =========================================================
// 用户 (Users)
// =========================================================

pub type UserId = u64;

/// 登录凭据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// 注册表单
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// `GET /users/{id}` 返回的完整用户信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDetails {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
}

/// 管理后台看到的用户记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub is_approved: bool,
}

/// 服务端通用消息体，例如 `{"message": "Invalid credentials"}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerMessage {
    #[serde(default)]
    pub message: String,
}

// =========================================================
// 价格 (Price)
// =========================================================

/// 服务端以十进制字符串（如 `"120.50"`）传输价格，这里兼容字符串和数字两种形式。
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Price(f64);

impl Price {
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Ok(Price(n)),
            Raw::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Price)
                .map_err(|_| serde::de::Error::custom(format!("invalid price: {s}"))),
        }
    }
}

// =========================================================
// 农产品 (Produce)
// =========================================================

pub type ProduceId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    #[default]
    Kg,
    Bunch,
    Crate,
    Item,
}

impl Unit {
    pub const ALL: [Unit; 4] = [Unit::Kg, Unit::Bunch, Unit::Crate, Unit::Item];

    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Kg => "kg",
            Unit::Bunch => "bunch",
            Unit::Crate => "crate",
            Unit::Item => "item",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.as_str() == value)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 农产品挂牌信息（服务端所有）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Produce {
    pub id: ProduceId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    pub quantity: u32,
    pub unit: Unit,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default = "default_available")]
    pub is_available: bool,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub farmer_id: Option<UserId>,
}

fn default_available() -> bool {
    true
}

/// 新建挂牌的表单字段（以 multipart 提交）
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewProduce {
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    pub unit: Unit,
    pub location: String,
    pub description: String,
}

impl NewProduce {
    /// 转换为 multipart 文本字段
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("price", self.price.to_string()),
            ("quantity", self.quantity.to_string()),
            ("unit", self.unit.as_str().to_string()),
            ("location", self.location.clone()),
            ("description", self.description.clone()),
        ]
    }
}

/// 市场筛选条件，空字段不会出现在查询串中
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProduceFilters {
    pub name: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl ProduceFilters {
    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let text = [("name", &self.name), ("location", &self.location)];
        for (key, value) in text {
            if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((key, v.to_string()));
            }
        }
        if let Some(min) = self.min_price {
            pairs.push(("min_price", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("max_price", max.to_string()));
        }
        pairs
    }

    /// 生成 `?name=...&min_price=...` 形式的查询串；无条件时返回空字符串
    pub fn to_query_string(&self) -> String {
        let pairs = self.query_pairs();
        if pairs.is_empty() {
            return String::new();
        }
        let encoded: Vec<String> = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();
        format!("?{}", encoded.join("&"))
    }
}

// =========================================================
// 订单 (Orders)
// =========================================================

pub type OrderId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Delivered,
    Canceled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Delivered,
        OrderStatus::Canceled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Canceled => "Canceled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    /// 农户可以通过 `PATCH /orders/{id}` 设置的状态（不能回到 Pending）
    pub fn is_settable(&self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 订单行中引用的农产品摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedProduce {
    pub id: ProduceId,
    pub name: String,
    pub unit: Unit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub quantity: u32,
    pub price_per_unit: Price,
    pub produce: OrderedProduce,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub buyer_id: Option<UserId>,
    pub status: OrderStatus,
    pub total_price: Price,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
}

/// 下单请求中的一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub produce_id: ProduceId,
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_accepts_string_and_number() {
        let from_str: Price = serde_json::from_str("\"120.50\"").unwrap();
        let from_num: Price = serde_json::from_str("99").unwrap();
        assert_eq!(from_str.value(), 120.5);
        assert_eq!(from_num.value(), 99.0);
        assert_eq!(serde_json::to_string(&from_str).unwrap(), "\"120.50\"");
        assert!(serde_json::from_str::<Price>("\"abc\"").is_err());
    }

    #[test]
    fn test_produce_deserializes_server_payload() {
        let json = r#"{
            "id": 3,
            "name": "Tomatoes",
            "description": null,
            "price": "80.00",
            "quantity": 40,
            "unit": "crate",
            "image_url": null,
            "is_available": true,
            "location": "Nakuru",
            "created_at": "2024-05-01T10:00:00",
            "farmer_id": 9
        }"#;
        let produce: Produce = serde_json::from_str(json).unwrap();
        assert_eq!(produce.unit, Unit::Crate);
        assert_eq!(produce.price, Price::new(80.0));
        assert_eq!(produce.farmer_id, Some(9));
    }

    #[test]
    fn test_filters_skip_blank_fields() {
        let filters = ProduceFilters {
            name: Some("  ".into()),
            location: Some("Nakuru County".into()),
            min_price: Some(10.0),
            max_price: None,
        };
        assert_eq!(
            filters.to_query_string(),
            "?location=Nakuru%20County&min_price=10"
        );
        assert!(ProduceFilters::default().is_empty());
        assert_eq!(ProduceFilters::default().to_query_string(), "");
    }

    #[test]
    fn test_order_status_wire_format() {
        let status: OrderStatus = serde_json::from_str("\"Delivered\"").unwrap();
        assert_eq!(status, OrderStatus::Delivered);
        assert!(!OrderStatus::Pending.is_settable());
        assert_eq!(OrderStatus::parse("Canceled"), Some(OrderStatus::Canceled));
    }
}
