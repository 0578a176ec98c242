use farmlink_shared::{AdminUser, Role};
use leptos::prelude::*;

use crate::components::alerts::confirm;
use crate::context::use_store;

/// 管理后台：用户审核
#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let ctx = use_store();

    Effect::new(move |_| {
        ctx.spawn(|store| async move {
            let _ = store.fetch_all_users().await;
        });
    });

    let users = move || ctx.select(|s| s.admin.users.clone());
    let is_loading = move || ctx.select(|s| s.admin.is_loading);
    let error = move || ctx.select(|s| s.admin.error.clone());
    let pending_count = move || ctx.select(|s| s.admin.pending().count());

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h1 class="text-3xl font-bold">"User Management"</h1>
                <span class="badge badge-warning">{move || format!("{} pending", pending_count())}</span>
            </div>
            {move || error().map(|e| view! { <div role="alert" class="alert alert-error">{e}</div> })}
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0 overflow-x-auto">
                    <table class="table table-zebra w-full">
                        <thead>
                            <tr>
                                <th>"ID"</th>
                                <th>"Username"</th>
                                <th>"Email"</th>
                                <th>"Role"</th>
                                <th>"Status"</th>
                                <th>"Actions"</th>
                            </tr>
                        </thead>
                        <tbody>
                            <Show when=move || is_loading() && users().is_empty()>
                                <tr>
                                    <td colspan="6" class="text-center py-8">
                                        <span class="loading loading-spinner text-primary"></span>
                                    </td>
                                </tr>
                            </Show>
                            <For
                                each=users
                                key=|u| (u.id, u.is_approved)
                                children=|user| view! { <UserRow user=user /> }
                            />
                        </tbody>
                    </table>
                </div>
            </div>
        </div>
    }
}

#[component]
fn UserRow(user: AdminUser) -> impl IntoView {
    let ctx = use_store();
    let id = user.id;
    let needs_approval = user.role == Role::Farmer && !user.is_approved;
    let prompt = format!("Are you sure you want to approve {}?", user.username);

    let on_approve = move |_| {
        if !confirm(&prompt) {
            return;
        }
        ctx.spawn(|store| async move {
            let _ = store.approve_user(id).await;
        });
    };

    let (status, status_class) = if user.is_approved {
        ("Approved", "badge badge-success")
    } else {
        ("Pending", "badge badge-warning")
    };

    view! {
        <tr>
            <td>{user.id}</td>
            <td>{user.username}</td>
            <td>{user.email}</td>
            <td class="capitalize">{user.role.as_str()}</td>
            <td><span class=status_class>{status}</span></td>
            <td>
                {needs_approval.then(|| view! {
                    <button class="btn btn-success btn-sm" on:click=on_approve>"Approve"</button>
                })}
            </td>
        </tr>
    }
}
