//! 市场页：筛选 + 挂牌卡片

use farmlink_shared::{Capability, Produce, ProduceFilters};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;

use crate::context::use_store;
use crate::web::router::Link;

/// 空白或无法解析的价格视为未设置
fn parse_price(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| *v >= 0.0)
}

fn non_blank(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[component]
pub fn MarketplacePage() -> impl IntoView {
    let ctx = use_store();

    let (name, set_name) = signal(String::new());
    let (location, set_location) = signal(String::new());
    let (min_price, set_min_price) = signal(String::new());
    let (max_price, set_max_price) = signal(String::new());

    let load = move |filters: ProduceFilters| {
        ctx.spawn(|store| async move {
            let _ = store.fetch_produce(filters).await;
        });
    };

    // 初始加载
    Effect::new(move |_| load(ProduceFilters::default()));

    let on_filter = move |ev: SubmitEvent| {
        ev.prevent_default();
        load(ProduceFilters {
            name: non_blank(name.get()),
            location: non_blank(location.get()),
            min_price: parse_price(&min_price.get()),
            max_price: parse_price(&max_price.get()),
        });
    };

    let is_loading = move || ctx.select(|s| s.produce.is_loading);
    let error = move || ctx.select(|s| s.produce.error.clone());
    let items = move || ctx.select(|s| s.produce.items.clone());

    view! {
        <div class="space-y-6">
            <h1 class="text-3xl font-bold">"Marketplace"</h1>

            <form class="card bg-base-100 shadow" on:submit=on_filter>
                <div class="card-body grid grid-cols-1 md:grid-cols-5 gap-3 items-end">
                    <input
                        type="text"
                        placeholder="Search by name..."
                        class="input input-bordered"
                        on:input=move |ev| set_name.set(event_target_value(&ev))
                        prop:value=name
                    />
                    <input
                        type="text"
                        placeholder="Location"
                        class="input input-bordered"
                        on:input=move |ev| set_location.set(event_target_value(&ev))
                        prop:value=location
                    />
                    <input
                        type="number"
                        min="0"
                        placeholder="Min price"
                        class="input input-bordered"
                        on:input=move |ev| set_min_price.set(event_target_value(&ev))
                        prop:value=min_price
                    />
                    <input
                        type="number"
                        min="0"
                        placeholder="Max price"
                        class="input input-bordered"
                        on:input=move |ev| set_max_price.set(event_target_value(&ev))
                        prop:value=max_price
                    />
                    <button class="btn btn-primary" type="submit">"Apply Filters"</button>
                </div>
            </form>

            <Show when=move || error().is_some()>
                <div role="alert" class="alert alert-error">
                    <span>{move || error().unwrap_or_default()}</span>
                </div>
            </Show>

            <Show
                when=move || !is_loading()
                fallback=|| view! {
                    <div class="flex items-center justify-center py-16">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                        <span class="ml-3">"Loading produce..."</span>
                    </div>
                }
            >
                <Show
                    when=move || !items().is_empty()
                    fallback=|| view! {
                        <p class="text-center py-16 text-base-content/50">
                            "No produce found matching your criteria."
                        </p>
                    }
                >
                    <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-6">
                        <For
                            each=items
                            key=|p| p.id
                            children=|produce| view! { <ProduceCard produce=produce /> }
                        />
                    </div>
                </Show>
            </Show>
        </div>
    }
}

#[component]
fn ProduceCard(produce: Produce) -> impl IntoView {
    let ctx = use_store();
    let can_buy = move || ctx.select(|s| s.session.can(Capability::UseCart));

    let image = produce.image_url.clone();
    let details = format!(
        "{} {} available{}",
        produce.quantity,
        produce.unit,
        produce
            .location
            .as_deref()
            .map(|l| format!(" in {}", l))
            .unwrap_or_default()
    );
    let price = format!("KES {} / {}", produce.price, produce.unit);
    let name = produce.name.clone();
    let description = produce.description.clone().unwrap_or_default();

    let on_add = move |_: leptos::ev::MouseEvent| ctx.store().add_to_cart(produce.clone());

    view! {
        <div class="card bg-base-100 shadow-xl">
            {image.map(|src| view! {
                <figure class="h-48 overflow-hidden">
                    <img src=src alt=name.clone() class="object-cover w-full" />
                </figure>
            })}
            <div class="card-body">
                <h2 class="card-title">{name.clone()}</h2>
                <p class="text-sm text-base-content/70">{description}</p>
                <p class="text-sm">{details}</p>
                <p class="text-lg font-semibold text-primary">{price}</p>
                <div class="card-actions justify-end">
                    <Show
                        when=can_buy
                        fallback=|| view! {
                            <Link to="/login" class="btn btn-outline btn-sm">"Login to Buy"</Link>
                        }
                    >
                        <button class="btn btn-primary btn-sm" on:click=on_add.clone()>
                            "Add to Cart"
                        </button>
                    </Show>
                </div>
            </div>
        </div>
    }
}
