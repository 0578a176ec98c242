use farmlink_shared::{Produce, ProduceId};

/// 农产品切片
///
/// `items` 是公开市场的列表，`my_items` 是当前农户自己的挂牌，两者独立拉取。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProduceState {
    pub items: Vec<Produce>,
    pub my_items: Vec<Produce>,
    pub is_loading: bool,
    /// 新建/删除进行中，用于禁用表单按钮
    pub is_mutating: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProduceAction {
    FetchPending,
    FetchFulfilled(Vec<Produce>),
    FetchRejected(String),
    FetchMinePending,
    FetchMineFulfilled(Vec<Produce>),
    FetchMineRejected(String),
    MutationPending,
    Created(Produce),
    Deleted(ProduceId),
    /// 失败时集合保持不变，提示由 Store 负责
    MutationRejected,
}

impl ProduceState {
    pub fn apply(&mut self, action: ProduceAction) {
        match action {
            ProduceAction::FetchPending | ProduceAction::FetchMinePending => {
                self.is_loading = true;
                self.error = None;
            }
            ProduceAction::FetchFulfilled(items) => {
                self.is_loading = false;
                self.items = items;
            }
            ProduceAction::FetchMineFulfilled(items) => {
                self.is_loading = false;
                self.my_items = items;
            }
            ProduceAction::FetchRejected(error) | ProduceAction::FetchMineRejected(error) => {
                self.is_loading = false;
                self.error = Some(error);
            }
            ProduceAction::MutationPending => {
                self.is_mutating = true;
            }
            ProduceAction::Created(produce) => {
                self.is_mutating = false;
                self.my_items.push(produce);
            }
            ProduceAction::Deleted(id) => {
                self.is_mutating = false;
                // 两个视图都可能含有这条挂牌
                self.items.retain(|p| p.id != id);
                self.my_items.retain(|p| p.id != id);
            }
            ProduceAction::MutationRejected => {
                self.is_mutating = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farmlink_shared::{Price, Unit};

    fn produce(id: ProduceId, name: &str) -> Produce {
        Produce {
            id,
            name: name.to_string(),
            description: None,
            price: Price::new(10.0),
            quantity: 5,
            unit: Unit::Kg,
            image_url: None,
            is_available: true,
            location: None,
            created_at: None,
            farmer_id: Some(1),
        }
    }

    #[test]
    fn test_delete_filters_both_views() {
        let mut state = ProduceState {
            items: vec![produce(1, "a"), produce(2, "b")],
            my_items: vec![produce(2, "b"), produce(3, "c")],
            ..Default::default()
        };
        state.apply(ProduceAction::Deleted(2));
        assert_eq!(state.items.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(state.my_items.iter().map(|p| p.id).collect::<Vec<_>>(), vec![3]);

        // 只在一个视图中出现时也能删除
        state.apply(ProduceAction::Deleted(3));
        assert!(state.my_items.is_empty());
        assert_eq!(state.items.len(), 1);
    }

    #[test]
    fn test_fetch_phases() {
        let mut state = ProduceState::default();
        state.apply(ProduceAction::FetchRejected("boom".into()));
        state.apply(ProduceAction::FetchPending);
        assert!(state.is_loading);
        assert_eq!(state.error, None);

        state.apply(ProduceAction::FetchFulfilled(vec![produce(1, "a")]));
        assert!(!state.is_loading);
        assert_eq!(state.items.len(), 1);
        assert!(state.my_items.is_empty());
    }

    #[test]
    fn test_create_appends_to_own_listings() {
        let mut state = ProduceState::default();
        state.apply(ProduceAction::MutationPending);
        assert!(state.is_mutating);
        state.apply(ProduceAction::Created(produce(9, "kale")));
        assert!(!state.is_mutating);
        assert_eq!(state.my_items[0].name, "kale");
    }
}
