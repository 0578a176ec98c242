use farmlink_shared::{Order, OrderId, OrderStatus};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OrdersState {
    /// 农户收到的订单
    pub incoming: Vec<Order>,
    /// 买家自己下的订单
    pub mine: Vec<Order>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// 正在修改状态的订单
    pub updating: Option<OrderId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OrdersAction {
    FetchIncomingPending,
    FetchIncomingFulfilled(Vec<Order>),
    FetchMinePending,
    FetchMineFulfilled(Vec<Order>),
    FetchRejected(String),
    StatusPending(OrderId),
    StatusUpdated { id: OrderId, status: OrderStatus },
    StatusRejected,
}

impl OrdersState {
    pub fn apply(&mut self, action: OrdersAction) {
        match action {
            OrdersAction::FetchIncomingPending | OrdersAction::FetchMinePending => {
                self.is_loading = true;
                self.error = None;
            }
            OrdersAction::FetchIncomingFulfilled(orders) => {
                self.is_loading = false;
                self.incoming = orders;
            }
            OrdersAction::FetchMineFulfilled(orders) => {
                self.is_loading = false;
                self.mine = orders;
            }
            OrdersAction::FetchRejected(error) => {
                self.is_loading = false;
                self.error = Some(error);
            }
            OrdersAction::StatusPending(id) => {
                self.updating = Some(id);
            }
            // 只改状态字段，订单的其余部分仍以拉取结果为准
            OrdersAction::StatusUpdated { id, status } => {
                self.updating = None;
                for order in self.incoming.iter_mut().chain(self.mine.iter_mut()) {
                    if order.id == id {
                        order.status = status;
                    }
                }
            }
            OrdersAction::StatusRejected => {
                self.updating = None;
            }
        }
    }
}
