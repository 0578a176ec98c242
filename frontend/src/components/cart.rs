use farmlink::slices::CartItem;
use leptos::prelude::*;

use crate::components::alerts::confirm;
use crate::context::use_store;
use crate::web::router::{Link, use_router};

#[component]
pub fn CartPage() -> impl IntoView {
    let ctx = use_store();
    let router = use_router();

    let items = move || ctx.select(|s| s.cart.items.clone());
    let is_empty = move || ctx.select(|s| s.cart.is_empty());
    let subtotal = move || ctx.select(|s| s.cart.subtotal());
    let is_submitting = move || ctx.select(|s| s.cart.status.is_loading());

    let on_checkout = move |_| {
        if !confirm("Are you sure you want to place this order?") {
            return;
        }
        ctx.spawn(|store| async move {
            if store.submit_order().await.is_ok() {
                router.navigate("/market");
            }
        });
    };

    view! {
        <div class="space-y-6">
            <h1 class="text-3xl font-bold">"Your Shopping Cart"</h1>
            <Show
                when=move || !is_empty()
                fallback=|| view! {
                    <div class="card bg-base-100 shadow">
                        <div class="card-body items-center text-center">
                            <p class="text-base-content/70">"Your cart is currently empty."</p>
                            <Link to="/market" class="btn btn-primary mt-4">"Browse Produce"</Link>
                        </div>
                    </div>
                }
            >
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body p-0 overflow-x-auto">
                        <table class="table w-full">
                            <thead>
                                <tr>
                                    <th>"Product"</th>
                                    <th>"Price"</th>
                                    <th>"Quantity"</th>
                                    <th>"Total"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <For
                                    each=items
                                    key=|item| (item.id(), item.cart_quantity)
                                    children=|item| view! { <CartRow item=item /> }
                                />
                            </tbody>
                        </table>
                    </div>
                </div>

                <div class="flex flex-col items-end gap-4">
                    <p class="text-xl">
                        "Subtotal: "
                        <span class="font-bold">{move || format!("KES {:.2}", subtotal())}</span>
                    </p>
                    <button class="btn btn-primary" disabled=is_submitting on:click=on_checkout>
                        {move || if is_submitting() { "Placing Order..." } else { "Proceed to Checkout" }}
                    </button>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn CartRow(item: CartItem) -> impl IntoView {
    let ctx = use_store();
    let id = item.id();

    // 只接受正整数，其余输入忽略
    let on_quantity = move |ev: leptos::ev::Event| {
        if let Ok(quantity) = event_target_value(&ev).trim().parse::<u32>() {
            if quantity > 0 {
                ctx.store().update_cart_quantity(id, quantity);
            }
        }
    };

    view! {
        <tr>
            <td class="font-semibold">{item.produce.name.clone()}</td>
            <td>{format!("KES {} / {}", item.produce.price, item.produce.unit)}</td>
            <td>
                <input
                    type="number"
                    min="1"
                    class="input input-bordered input-sm w-20"
                    prop:value=item.cart_quantity.to_string()
                    on:change=on_quantity
                />
            </td>
            <td>{format!("KES {:.2}", item.line_total())}</td>
            <td>
                <button class="btn btn-ghost btn-sm text-error" on:click=move |_| ctx.store().remove_from_cart(id)>
                    "Remove"
                </button>
            </td>
        </tr>
    }
}
