use farmlink_shared::Produce;
use leptos::prelude::*;

use crate::components::alerts::confirm;
use crate::context::use_store;
use crate::web::router::Link;

#[component]
pub fn MyListings() -> impl IntoView {
    let ctx = use_store();

    Effect::new(move |_| {
        ctx.spawn(|store| async move {
            let _ = store.fetch_my_produce().await;
        });
    });

    let items = move || ctx.select(|s| s.produce.my_items.clone());
    let is_loading = move || ctx.select(|s| s.produce.is_loading);
    let error = move || ctx.select(|s| s.produce.error.clone());

    view! {
        <div class="space-y-4">
            <div class="flex items-center justify-between">
                <h2 class="text-2xl font-bold">"My Produce Listings"</h2>
                <Link to="/dashboard/add-produce" class="btn btn-primary btn-sm">"+ Add New Produce"</Link>
            </div>
            {move || error().map(|e| view! { <div role="alert" class="alert alert-error">{e}</div> })}
            <Show
                when=move || !is_loading()
                fallback=|| view! { <p class="py-8 text-center">"Loading your listings..."</p> }
            >
                <div class="card bg-base-100 shadow-xl">
                    <div class="card-body p-0 overflow-x-auto">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"Name"</th>
                                    <th>"Price"</th>
                                    <th>"Quantity"</th>
                                    <th>"Location"</th>
                                    <th>"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || items().is_empty()>
                                    <tr>
                                        <td colspan="5" class="text-center py-8 text-base-content/50">
                                            "You have not listed any produce yet."
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=items
                                    key=|p| p.id
                                    children=|produce| view! { <ListingRow produce=produce /> }
                                />
                            </tbody>
                        </table>
                    </div>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn ListingRow(produce: Produce) -> impl IntoView {
    let ctx = use_store();
    let id = produce.id;
    let prompt = format!(
        "You are about to delete \"{}\". You won't be able to revert this!",
        produce.name
    );

    let on_delete = move |_| {
        if !confirm(&prompt) {
            return;
        }
        ctx.spawn(|store| async move {
            let _ = store.delete_produce(id).await;
        });
    };

    let is_busy = move || ctx.select(|s| s.produce.is_mutating);

    view! {
        <tr>
            <td class="font-semibold">{produce.name}</td>
            <td>{format!("KES {} / {}", produce.price, produce.unit)}</td>
            <td>{format!("{} {}", produce.quantity, produce.unit)}</td>
            <td>{produce.location.unwrap_or_default()}</td>
            <td>
                <button class="btn btn-error btn-outline btn-sm" disabled=is_busy on:click=on_delete>
                    "Delete"
                </button>
            </td>
        </tr>
    }
}
