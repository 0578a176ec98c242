//! 农户工作台：侧边栏 + 三个标签页

mod add_produce;
mod manage_orders;
mod my_listings;

use farmlink::DashboardTab;
use leptos::prelude::*;

use crate::web::router::Link;
use add_produce::AddProduceForm;
use manage_orders::ManageOrders;
use my_listings::MyListings;

fn tab_label(tab: DashboardTab) -> &'static str {
    match tab {
        DashboardTab::MyListings => "My Listings",
        DashboardTab::Orders => "Manage Orders",
        DashboardTab::AddProduce => "Add New Produce",
    }
}

const TABS: [(DashboardTab, &str); 3] = [
    (DashboardTab::MyListings, "/dashboard/my-listings"),
    (DashboardTab::Orders, "/dashboard/orders"),
    (DashboardTab::AddProduce, "/dashboard/add-produce"),
];

#[component]
pub fn DashboardPage(tab: DashboardTab) -> impl IntoView {
    let content = match tab {
        DashboardTab::MyListings => view! { <MyListings /> }.into_any(),
        DashboardTab::Orders => view! { <ManageOrders /> }.into_any(),
        DashboardTab::AddProduce => view! { <AddProduceForm /> }.into_any(),
    };

    view! {
        <div class="flex flex-col md:flex-row gap-6">
            <aside class="md:w-56 shrink-0">
                <ul class="menu bg-base-100 rounded-box shadow">
                    <li class="menu-title">"Farmer Dashboard"</li>
                    {TABS
                        .into_iter()
                        .map(|(t, path)| {
                            let class = if t == tab { "active" } else { "" };
                            view! { <li><Link to=path class=class>{tab_label(t)}</Link></li> }
                        })
                        .collect_view()}
                </ul>
            </aside>
            <section class="flex-1">{content}</section>
        </div>
    }
}
