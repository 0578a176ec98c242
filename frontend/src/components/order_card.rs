//! 订单卡片，买家和农户的订单列表共用

use farmlink_shared::date::display_date;
use farmlink_shared::{Order, OrderStatus};
use leptos::prelude::*;

fn status_badge_class(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "badge badge-warning",
        OrderStatus::Confirmed => "badge badge-info",
        OrderStatus::Delivered => "badge badge-success",
        OrderStatus::Canceled => "badge badge-error",
    }
}

#[component]
pub fn OrderCard(
    order: Order,
    /// 卡片底部的操作区（例如农户的状态选择框）
    #[prop(optional)]
    children: Option<Children>,
) -> impl IntoView {
    let date = order
        .created_at
        .as_deref()
        .map(display_date)
        .unwrap_or_else(|| "-".to_string());

    view! {
        <div class="card bg-base-100 shadow">
            <div class="card-body">
                <div class="flex items-center justify-between">
                    <h3 class="card-title">{format!("Order #{}", order.id)}</h3>
                    <span class=status_badge_class(order.status)>{order.status.as_str()}</span>
                </div>
                <p class="text-sm text-base-content/70">"Date: " {date}</p>
                <p class="font-semibold">{format!("Total Price: KES {}", order.total_price)}</p>
                <ul class="list-disc list-inside text-sm">
                    {order
                        .order_items
                        .into_iter()
                        .map(|item| {
                            view! {
                                <li>
                                    {format!(
                                        "{} {} of {}",
                                        item.quantity,
                                        item.produce.unit,
                                        item.produce.name,
                                    )}
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
                {children.map(|c| view! { <div class="card-actions justify-end">{c()}</div> })}
            </div>
        </div>
    }
}
