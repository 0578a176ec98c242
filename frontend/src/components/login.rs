use farmlink_shared::Credentials;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;

use crate::context::use_store;
use crate::web::router::Link;

/// 登录页
///
/// 登录成功后的跳转由路由守卫完成（返回被拦截的地址或角色首页）。
#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_store();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let is_submitting = move || ctx.select(|s| s.session.is_loading);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if email.get().trim().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("Please fill in all fields!".to_string()));
            return;
        }
        set_error_msg.set(None);

        let credentials = Credentials {
            email: email.get().trim().to_string(),
            password: password.get(),
        };
        ctx.spawn(|store| async move {
            if store.login(&credentials).await.is_err() {
                set_password.set(String::new());
            }
        });
    };

    view! {
        <div class="hero min-h-[70vh]">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Login"</h1>
                    <p class="text-base-content/70">"Sign in to buy or sell fresh produce"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Email"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="you@example.com"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=is_submitting>
                                {move || if is_submitting() {
                                    view! { <span class="loading loading-spinner"></span> "Logging in..." }.into_any()
                                } else {
                                    "Login".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "Don't have an account? "
                            <Link to="/register" class="link link-primary">"Register here"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
