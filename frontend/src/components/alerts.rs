//! 提示展示：阻塞式模态框 + 自动消失的 toast

use farmlink::{Alert, AlertLevel};
use leptos::prelude::*;

use crate::context::use_store;

fn alert_class(level: AlertLevel) -> &'static str {
    match level {
        AlertLevel::Success => "alert alert-success shadow-lg",
        AlertLevel::Warning => "alert alert-warning shadow-lg",
        AlertLevel::Error => "alert alert-error shadow-lg",
    }
}

/// 浏览器原生确认框；无法弹出时视为取消
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[component]
pub fn AlertHost() -> impl IntoView {
    let alerts = use_store().alerts;

    let modal = move || {
        alerts.modal.get().map(|alert: Alert| {
            let title_class = match alert.level {
                AlertLevel::Error => "font-bold text-lg text-error",
                AlertLevel::Warning => "font-bold text-lg text-warning",
                AlertLevel::Success => "font-bold text-lg text-success",
            };
            view! {
                <div class="modal modal-open">
                    <div class="modal-box">
                        <h3 class=title_class>{alert.title}</h3>
                        <p class="py-4">{alert.text}</p>
                        <div class="modal-action">
                            <button class="btn btn-primary" on:click=move |_| alerts.dismiss_modal()>
                                "OK"
                            </button>
                        </div>
                    </div>
                </div>
            }
        })
    };

    view! {
        {modal}
        <div class="toast toast-top toast-end z-50">
            <For
                each=move || alerts.toasts.get()
                key=|(id, _)| *id
                children=move |(_, alert)| {
                    let text = (!alert.text.is_empty()).then_some(alert.text);
                    view! {
                        <div class=alert_class(alert.level)>
                            <span class="font-semibold">{alert.title}</span>
                            {text.map(|t| view! { <span>{t}</span> })}
                        </div>
                    }
                }
            />
        </div>
    }
}
