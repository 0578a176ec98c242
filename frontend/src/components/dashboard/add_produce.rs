use farmlink_shared::{NewProduce, Price, Unit};
use leptos::ev::{Event, SubmitEvent};
use leptos::prelude::*;
use web_sys::HtmlInputElement;

use crate::context::use_store;
use crate::web::read_file;
use crate::web::router::use_router;

fn unit_label(unit: Unit) -> &'static str {
    match unit {
        Unit::Kg => "Per Kg",
        Unit::Bunch => "Per Bunch",
        Unit::Crate => "Per Crate",
        Unit::Item => "Per Item",
    }
}

/// 表单原始输入，提交时才解析数值
#[derive(Clone, Default)]
struct FormState {
    name: String,
    location: String,
    price: String,
    quantity: String,
    unit: Unit,
    description: String,
}

impl FormState {
    fn validate(&self) -> Result<NewProduce, &'static str> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Please enter a produce name.");
        }
        let price = self
            .price
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| *p > 0.0)
            .ok_or("Please enter a valid price.")?;
        let quantity = self
            .quantity
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|q| *q > 0)
            .ok_or("Please enter a valid quantity.")?;

        Ok(NewProduce {
            name: name.to_string(),
            price: Price::new(price),
            quantity,
            unit: self.unit,
            location: self.location.trim().to_string(),
            description: self.description.trim().to_string(),
        })
    }
}

fn text_input(
    form: RwSignal<FormState>,
    label: &'static str,
    kind: &'static str,
    get: fn(&FormState) -> &String,
    set: fn(&mut FormState, String),
) -> impl IntoView {
    view! {
        <div class="form-control">
            <label class="label">
                <span class="label-text">{label}</span>
            </label>
            <input
                type=kind
                class="input input-bordered"
                on:input=move |ev| {
                    let value = event_target_value(&ev);
                    form.update(|f| set(f, value));
                }
                prop:value=move || form.with(|f| get(f).clone())
            />
        </div>
    }
}

#[component]
pub fn AddProduceForm() -> impl IntoView {
    let ctx = use_store();
    let router = use_router();

    let form = RwSignal::new(FormState::default());
    let image = RwSignal::new_local(None::<web_sys::File>);
    let (error_msg, set_error_msg) = signal(Option::<&'static str>::None);

    let is_submitting = move || ctx.select(|s| s.produce.is_mutating);

    let on_file = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        image.set(input.files().and_then(|files| files.get(0)));
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let produce = match form.with(FormState::validate) {
            Ok(p) => p,
            Err(msg) => {
                set_error_msg.set(Some(msg));
                return;
            }
        };
        set_error_msg.set(None);

        let file = image.get_untracked();
        ctx.spawn(|store| async move {
            let upload = match file {
                Some(f) => match read_file(&f).await {
                    Ok(upload) => Some(upload),
                    Err(e) => {
                        log::warn!("failed to read image: {}", e);
                        None
                    }
                },
                None => None,
            };
            if store.create_produce(&produce, upload).await.is_ok() {
                router.navigate("/dashboard/my-listings");
            }
        });
    };

    view! {
        <div class="card bg-base-100 shadow-xl max-w-2xl">
            <form class="card-body" on:submit=on_submit>
                <h2 class="card-title text-2xl">"Add New Produce"</h2>
                <Show when=move || error_msg.get().is_some()>
                    <div role="alert" class="alert alert-error text-sm py-2">
                        <span>{move || error_msg.get().unwrap_or_default()}</span>
                    </div>
                </Show>

                {text_input(form, "Produce Name", "text", |f| &f.name, |f, v| f.name = v)}
                {text_input(form, "Location", "text", |f| &f.location, |f, v| f.location = v)}
                <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                    {text_input(form, "Price (KES)", "number", |f| &f.price, |f, v| f.price = v)}
                    {text_input(form, "Quantity", "number", |f| &f.quantity, |f, v| f.quantity = v)}
                    <div class="form-control">
                        <label class="label">
                            <span class="label-text">"Unit"</span>
                        </label>
                        <select
                            class="select select-bordered"
                            on:change=move |ev| {
                                if let Some(unit) = Unit::parse(&event_target_value(&ev)) {
                                    form.update(|f| f.unit = unit);
                                }
                            }
                            prop:value=move || form.with(|f| f.unit.as_str())
                        >
                            {Unit::ALL
                                .into_iter()
                                .map(|u| view! { <option value=u.as_str()>{unit_label(u)}</option> })
                                .collect_view()}
                        </select>
                    </div>
                </div>
                <div class="form-control">
                    <label class="label">
                        <span class="label-text">"Description"</span>
                    </label>
                    <textarea
                        class="textarea textarea-bordered"
                        rows="3"
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            form.update(|f| f.description = value);
                        }
                        prop:value=move || form.with(|f| f.description.clone())
                    ></textarea>
                </div>
                <div class="form-control">
                    <label class="label">
                        <span class="label-text">"Image"</span>
                    </label>
                    <input
                        type="file"
                        accept="image/*"
                        class="file-input file-input-bordered"
                        on:change=on_file
                    />
                </div>
                <div class="form-control mt-6">
                    <button class="btn btn-primary" disabled=is_submitting>
                        {move || if is_submitting() { "Submitting..." } else { "Add Produce" }}
                    </button>
                </div>
            </form>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> FormState {
        FormState {
            name: " Kale ".into(),
            location: "Limuru".into(),
            price: "45.5".into(),
            quantity: "10".into(),
            unit: Unit::Bunch,
            description: String::new(),
        }
    }

    #[test]
    fn test_valid_form_builds_listing() {
        let produce = filled().validate().unwrap();
        assert_eq!(produce.name, "Kale");
        assert_eq!(produce.price, Price::new(45.5));
        assert_eq!(produce.quantity, 10);
        assert_eq!(produce.unit, Unit::Bunch);
    }

    #[test]
    fn test_rejects_non_positive_numbers() {
        let mut form = filled();
        form.price = "0".into();
        assert!(form.validate().is_err());

        let mut form = filled();
        form.quantity = "abc".into();
        assert_eq!(form.validate().unwrap_err(), "Please enter a valid quantity.");
    }
}
