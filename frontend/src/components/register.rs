use farmlink_shared::{Registration, Role};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;

use crate::context::use_store;
use crate::web::router::{Link, use_router};

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Buyer => "Buyer (Hotel, Retailer, etc.)",
        Role::Farmer => "Farmer (Producer)",
        Role::Admin => "Administrator",
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let ctx = use_store();
    let router = use_router();

    let (username, set_username) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (phone, set_phone) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (role, set_role) = signal(Role::Buyer);
    let (is_submitting, set_is_submitting) = signal(false);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let registration = Registration {
            username: username.get().trim().to_string(),
            email: email.get().trim().to_string(),
            phone_number: phone.get().trim().to_string(),
            password: password.get(),
            role: role.get(),
        };

        set_is_submitting.set(true);
        ctx.spawn(|store| async move {
            let result = store.register(&registration).await;
            set_is_submitting.set(false);
            if result.is_ok() {
                router.navigate("/login");
            }
        });
    };

    let text_field = move |id: &'static str,
                           label: &'static str,
                           kind: &'static str,
                           value: ReadSignal<String>,
                           set_value: WriteSignal<String>| {
        view! {
            <div class="form-control">
                <label class="label" for=id>
                    <span class="label-text">{label}</span>
                </label>
                <input
                    id=id
                    type=kind
                    on:input=move |ev| set_value.set(event_target_value(&ev))
                    prop:value=value
                    class="input input-bordered"
                    required
                />
            </div>
        }
    };

    view! {
        <div class="hero min-h-[70vh]">
            <div class="hero-content flex-col w-full max-w-md">
                <h1 class="text-3xl font-bold">"Create an Account"</h1>
                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        {text_field("username", "Username", "text", username, set_username)}
                        {text_field("email", "Email", "email", email, set_email)}
                        {text_field("phone_number", "Phone Number", "tel", phone, set_phone)}
                        {text_field("password", "Password", "password", password, set_password)}
                        <div class="form-control">
                            <label class="label" for="role">
                                <span class="label-text">"I am a..."</span>
                            </label>
                            <select
                                id="role"
                                class="select select-bordered"
                                on:change=move |ev| {
                                    if let Some(r) = Role::parse(&event_target_value(&ev)) {
                                        set_role.set(r);
                                    }
                                }
                                prop:value=move || role.get().as_str()
                            >
                                {Role::SELF_SERVICE
                                    .into_iter()
                                    .map(|r| view! { <option value=r.as_str()>{role_label(r)}</option> })
                                    .collect_view()}
                            </select>
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() { "Registering..." } else { "Register" }}
                            </button>
                        </div>
                        <p class="text-center text-sm mt-2">
                            "Already have an account? "
                            <Link to="/login" class="link link-primary">"Login here"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
