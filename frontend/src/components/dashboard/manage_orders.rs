use farmlink_shared::{Order, OrderStatus};
use leptos::prelude::*;

use crate::components::order_card::OrderCard;
use crate::context::use_store;

#[component]
pub fn ManageOrders() -> impl IntoView {
    let ctx = use_store();

    Effect::new(move |_| {
        ctx.spawn(|store| async move {
            let _ = store.fetch_farmer_orders().await;
        });
    });

    let orders = move || ctx.select(|s| s.orders.incoming.clone());
    let is_loading = move || ctx.select(|s| s.orders.is_loading);
    let error = move || ctx.select(|s| s.orders.error.clone());

    view! {
        <div class="space-y-4">
            <h2 class="text-2xl font-bold">"Incoming Orders"</h2>
            {move || error().map(|e| view! { <div role="alert" class="alert alert-error">{e}</div> })}
            <Show
                when=move || !is_loading()
                fallback=|| view! {
                    <div class="flex justify-center py-8">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
            >
                <Show
                    when=move || !orders().is_empty()
                    fallback=|| view! {
                        <p class="text-center py-8 text-base-content/50">
                            "You have no incoming orders at the moment."
                        </p>
                    }
                >
                    <div class="grid gap-4">
                        <For
                            each=orders
                            key=|o| (o.id, o.status)
                            children=|order| view! { <IncomingOrder order=order /> }
                        />
                    </div>
                </Show>
            </Show>
        </div>
    }
}

/// 农户只能把订单推进到可设置的状态；当前状态一并列出以便显示
fn status_options(current: OrderStatus) -> Vec<OrderStatus> {
    OrderStatus::ALL
        .into_iter()
        .filter(|s| s.is_settable() || *s == current)
        .collect()
}

#[component]
fn IncomingOrder(order: Order) -> impl IntoView {
    let ctx = use_store();
    let id = order.id;
    let current = order.status;

    let is_updating = move || ctx.select(|s| s.orders.updating == Some(id));

    let on_change = move |ev: leptos::ev::Event| {
        let Some(status) = OrderStatus::parse(&event_target_value(&ev)) else {
            return;
        };
        if status == current {
            return;
        }
        ctx.spawn(|store| async move {
            let _ = store.update_order_status(id, status).await;
        });
    };

    view! {
        <OrderCard order=order>
            <label class="label gap-2">
                <span class="label-text">"Update status"</span>
                <select
                    class="select select-bordered select-sm"
                    disabled=is_updating
                    on:change=on_change
                    prop:value=current.as_str()
                >
                    {status_options(current)
                        .into_iter()
                        .map(|s| view! { <option value=s.as_str() disabled=!s.is_settable()>{s.as_str()}</option> })
                        .collect_view()}
                </select>
            </label>
        </OrderCard>
    }
}
