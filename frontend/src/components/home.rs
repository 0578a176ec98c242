use leptos::prelude::*;

use crate::web::router::Link;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="hero min-h-[60vh] bg-base-100 rounded-box shadow-xl">
            <div class="hero-content text-center">
                <div class="max-w-xl">
                    <h1 class="text-4xl font-bold">"Welcome to the Farmers' Market Link Platform"</h1>
                    <p class="py-6 text-base-content/70">"Connecting Farmers Directly to Buyers"</p>
                    <div class="flex gap-4 justify-center">
                        <Link to="/market" class="btn btn-primary">"Browse Marketplace"</Link>
                        <Link to="/register" class="btn btn-outline">"Join as a Farmer"</Link>
                    </div>
                </div>
            </div>
        </div>
    }
}
