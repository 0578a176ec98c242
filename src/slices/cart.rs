use super::RequestStatus;
use farmlink_shared::{Order, OrderLine, Produce, ProduceId};

/// 购物车中的一行：农产品快照加上购买数量
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub produce: Produce,
    pub cart_quantity: u32,
}

impl CartItem {
    pub fn id(&self) -> ProduceId {
        self.produce.id
    }

    pub fn line_total(&self) -> f64 {
        self.produce.price.value() * f64::from(self.cart_quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CartState {
    /// 按农产品 id 唯一
    pub items: Vec<CartItem>,
    pub status: RequestStatus,
    pub error: Option<String>,
    /// 最近一次成功提交的订单
    pub last_order: Option<Order>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    Add(Produce),
    Remove(ProduceId),
    UpdateQuantity { id: ProduceId, quantity: u32 },
    Clear,
    SubmitPending,
    SubmitFulfilled(Order),
    SubmitRejected(String),
}

impl CartState {
    pub fn apply(&mut self, action: CartAction) {
        match action {
            CartAction::Add(produce) => {
                if let Some(item) = self.items.iter_mut().find(|i| i.id() == produce.id) {
                    item.cart_quantity += 1;
                } else {
                    self.items.push(CartItem {
                        produce,
                        cart_quantity: 1,
                    });
                }
            }
            CartAction::Remove(id) => {
                self.items.retain(|i| i.id() != id);
            }
            // 数量为 0 不会自动移除，由调用方保证 quantity > 0
            CartAction::UpdateQuantity { id, quantity } => {
                if let Some(item) = self.items.iter_mut().find(|i| i.id() == id) {
                    item.cart_quantity = quantity;
                }
            }
            CartAction::Clear => {
                self.items.clear();
            }
            CartAction::SubmitPending => {
                self.status = RequestStatus::Loading;
                self.error = None;
            }
            CartAction::SubmitFulfilled(order) => {
                self.status = RequestStatus::Succeeded;
                self.last_order = Some(order);
            }
            CartAction::SubmitRejected(error) => {
                self.status = RequestStatus::Failed;
                self.error = Some(error);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 购物车内商品总件数（导航栏角标）
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.cart_quantity).sum()
    }

    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// 下单请求体
    pub fn order_lines(&self) -> Vec<OrderLine> {
        self.items
            .iter()
            .map(|i| OrderLine {
                produce_id: i.id(),
                quantity: i.cart_quantity,
            })
            .collect()
    }
}
