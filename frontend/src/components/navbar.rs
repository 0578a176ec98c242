use farmlink_shared::Capability;
use leptos::prelude::*;

use crate::context::use_store;
use crate::web::router::{Link, use_router};

/// 顶部导航栏
///
/// 链接按当前会话的能力显示，不直接比较角色。
#[component]
pub fn Navbar() -> impl IntoView {
    let ctx = use_store();
    let router = use_router();

    let is_authenticated = move || ctx.select(|s| s.session.is_authenticated);
    let can = move |capability: Capability| ctx.select(|s| s.session.can(capability));
    let cart_count = move || ctx.select(|s| s.cart.item_count());
    let username = move || {
        ctx.select(|s| {
            s.session
                .user
                .as_ref()
                .and_then(|u| u.username().map(str::to_string))
        })
    };

    // 先离开受保护页面，再清除会话，避免守卫弹出无权限提示
    let on_logout = move |_| {
        router.navigate("/login");
        ctx.store().logout();
    };

    view! {
        <div class="navbar bg-base-100 shadow-md px-4">
            <div class="flex-1">
                <Link to="/" class="btn btn-ghost text-xl text-primary font-bold">"FMLP"</Link>
            </div>
            <div class="flex-none gap-2">
                <ul class="menu menu-horizontal px-1 items-center">
                    <li><Link to="/market">"Marketplace"</Link></li>
                    <Show when=move || can(Capability::ManageListings)>
                        <li><Link to="/dashboard">"Dashboard"</Link></li>
                    </Show>
                    <Show when=move || can(Capability::ApproveUsers)>
                        <li><Link to="/admin/dashboard">"Admin"</Link></li>
                    </Show>
                    <Show when=move || can(Capability::TrackOrders)>
                        <li><Link to="/orders">"My Orders"</Link></li>
                    </Show>
                    <Show when=move || can(Capability::UseCart)>
                        <li>
                            <Link to="/cart">
                                "Cart"
                                <span class="badge badge-secondary badge-sm">{cart_count}</span>
                            </Link>
                        </li>
                    </Show>
                </ul>
                <Show
                    when=is_authenticated
                    fallback=|| view! {
                        <Link to="/login" class="btn btn-ghost btn-sm">"Login"</Link>
                        <Link to="/register" class="btn btn-primary btn-sm">"Sign Up"</Link>
                    }
                >
                    <span class="text-sm text-base-content/70 hidden md:inline">{username}</span>
                    <button class="btn btn-outline btn-error btn-sm" on:click=on_logout>
                        "Logout"
                    </button>
                </Show>
            </div>
        </div>
    }
}
