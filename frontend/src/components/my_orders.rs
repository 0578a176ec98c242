use leptos::prelude::*;

use crate::components::order_card::OrderCard;
use crate::context::use_store;

#[component]
pub fn MyOrdersPage() -> impl IntoView {
    let ctx = use_store();

    Effect::new(move |_| {
        ctx.spawn(|store| async move {
            let _ = store.fetch_my_orders().await;
        });
    });

    let orders = move || ctx.select(|s| s.orders.mine.clone());
    let is_loading = move || ctx.select(|s| s.orders.is_loading);
    let error = move || ctx.select(|s| s.orders.error.clone());

    view! {
        <div class="space-y-6">
            <h1 class="text-3xl font-bold">"My Orders"</h1>
            {move || error().map(|e| view! { <div role="alert" class="alert alert-error">{e}</div> })}
            <Show
                when=move || !is_loading()
                fallback=|| view! {
                    <div class="flex justify-center py-16">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
            >
                <Show
                    when=move || !orders().is_empty()
                    fallback=|| view! {
                        <p class="text-center py-16 text-base-content/50">"You have not placed any orders yet."</p>
                    }
                >
                    <div class="grid gap-4">
                        <For
                            each=orders
                            key=|o| (o.id, o.status)
                            children=|order| view! { <OrderCard order=order /> }
                        />
                    </div>
                </Show>
            </Show>
        </div>
    }
}
