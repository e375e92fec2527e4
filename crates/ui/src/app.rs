//! Demo application: one button per kind of modal interaction.

use crate::layout::{provide_modal_service, ModalOutlet};
use crate::shared::icons::icon;
use crate::shared::modal::{ModalComponent, ModalContext, ModalRef};
use ds_contracts::modal::{load_default_options, ModalConfig, ModalOptions, ModalSize};
use leptos::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmData {
    pub message: String,
}

/// Yes/no question; closes with `true` or `false`.
pub struct ConfirmDialog {
    ctx: ModalContext<ConfirmData, bool>,
}

impl ModalComponent for ConfirmDialog {
    type Data = ConfirmData;
    type Output = bool;

    fn create(ctx: ModalContext<ConfirmData, bool>) -> Self {
        Self { ctx }
    }

    fn render(self: Arc<Self>) -> AnyView {
        let message = self
            .ctx
            .data()
            .map(|d| d.message.clone())
            .unwrap_or_else(|| "Are you sure?".to_string());
        view! { <p class="confirm-dialog__message">{message}</p> }.into_any()
    }

    fn render_footer(self: Arc<Self>) -> Option<AnyView> {
        let modal_ref = self.ctx.modal_ref().clone();
        let confirm = {
            let modal_ref = modal_ref.clone();
            move |_| modal_ref.close_with(true)
        };
        let cancel = move |_| modal_ref.close_with(false);
        Some(
            view! {
                <button class="button button--secondary" on:click=cancel>"Cancel"</button>
                <button class="button button--primary" on:click=confirm>
                    {icon("check")}
                    "Confirm"
                </button>
            }
            .into_any(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserFormData {
    pub name: String,
    pub email: String,
    pub role: String,
}

/// Edits the injected record; closes with the edited copy, or `None` on cancel.
pub struct UserFormModal {
    ctx: ModalContext<UserFormData, UserFormData>,
    name: ArcRwSignal<String>,
    email: ArcRwSignal<String>,
    role: ArcRwSignal<String>,
}

impl UserFormModal {
    fn snapshot(&self) -> UserFormData {
        UserFormData {
            name: self.name.get_untracked(),
            email: self.email.get_untracked(),
            role: self.role.get_untracked(),
        }
    }
}

impl ModalComponent for UserFormModal {
    type Data = UserFormData;
    type Output = UserFormData;

    fn create(ctx: ModalContext<UserFormData, UserFormData>) -> Self {
        let initial = ctx.data().cloned().unwrap_or_default();
        Self {
            ctx,
            name: ArcRwSignal::new(initial.name),
            email: ArcRwSignal::new(initial.email),
            role: ArcRwSignal::new(initial.role),
        }
    }

    fn render(self: Arc<Self>) -> AnyView {
        let name = self.name.clone();
        let email = self.email.clone();
        let role = self.role.clone();
        let (name_in, email_in, role_in) = (name.clone(), email.clone(), role.clone());

        let save = {
            let this = self.clone();
            move |_| {
                let edited = this.snapshot();
                this.ctx.modal_ref().close_with(edited);
            }
        };
        let cancel = {
            let modal_ref = self.ctx.modal_ref().clone();
            move |_| modal_ref.dismiss()
        };

        view! {
            <div class="data-form-modal">
                <div class="form-group">
                    <label for="user-name">"Name"</label>
                    <input
                        id="user-name"
                        type="text"
                        prop:value=move || name.get()
                        on:input=move |ev| name_in.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-group">
                    <label for="user-email">"Email"</label>
                    <input
                        id="user-email"
                        type="email"
                        prop:value=move || email.get()
                        on:input=move |ev| email_in.set(event_target_value(&ev))
                    />
                </div>
                <div class="form-group">
                    <label for="user-role">"Role"</label>
                    <select
                        id="user-role"
                        prop:value=move || role.get()
                        on:change=move |ev| role_in.set(event_target_value(&ev))
                    >
                        <option value="admin">"Admin"</option>
                        <option value="editor">"Editor"</option>
                        <option value="viewer">"Viewer"</option>
                    </select>
                </div>
                <div class="modal-actions">
                    <button class="button button--secondary" on:click=cancel>"Cancel"</button>
                    <button class="button button--primary" on:click=save>"Save changes"</button>
                </div>
            </div>
        }
        .into_any()
    }
}

/// Counter the opener can watch through the modal's instance link while it
/// is open; closes with the final value.
pub struct LiveCounterModal {
    modal_ref: ModalRef<u32>,
    value: ArcRwSignal<u32>,
}

impl LiveCounterModal {
    pub fn value(&self) -> u32 {
        self.value.get_untracked()
    }
}

impl ModalComponent for LiveCounterModal {
    type Data = u32;
    type Output = u32;

    fn create(ctx: ModalContext<u32, u32>) -> Self {
        Self {
            modal_ref: ctx.modal_ref().clone(),
            value: ArcRwSignal::new(ctx.data().copied().unwrap_or(0)),
        }
    }

    fn render(self: Arc<Self>) -> AnyView {
        let value = self.value.clone();
        let (dec, inc) = (value.clone(), value.clone());
        let complete = {
            let this = self.clone();
            move |_| this.modal_ref.close_with(this.value())
        };

        view! {
            <div class="real-time-modal">
                <div class="counter">{move || value.get()}</div>
                <div class="actions">
                    <button class="button button--icon" on:click=move |_| dec.update(|v| *v = v.saturating_sub(1))>
                        {icon("minus")}
                    </button>
                    <button class="button button--icon" on:click=move |_| inc.update(|v| *v += 1)>
                        {icon("plus")}
                    </button>
                </div>
                <button class="button button--primary" on:click=complete>"Complete"</button>
            </div>
        }
        .into_any()
    }

    fn on_destroy(&self) {
        log::debug!("Live counter destroyed at {}", self.value());
    }
}

#[component]
pub fn App() -> impl IntoView {
    let defaults = load_default_options(None).unwrap_or_else(|err| {
        log::warn!("{}", err);
        ModalOptions::default()
    });
    let modals = provide_modal_service(defaults);

    let last_result = RwSignal::new(String::from("-"));
    let user = RwSignal::new(UserFormData {
        name: "Ada".into(),
        email: "ada@example.com".into(),
        role: "editor".into(),
    });
    let counter_modal = RwSignal::new(None::<ModalRef<u32>>);
    let peeked = RwSignal::new(None::<u32>);

    let open_confirm = {
        let modals = modals.clone();
        move |_| {
            let modal = modals.open::<ConfirmDialog>(
                ModalConfig::new()
                    .title("Confirm")
                    .size(ModalSize::Sm)
                    .show_footer(true)
                    .data(ConfirmData {
                        message: "Delete this record?".into(),
                    }),
            );
            modal.after_closed(move |confirmed| {
                last_result.set(format!("confirm: {:?}", confirmed));
            });
        }
    };

    let open_form = {
        let modals = modals.clone();
        move |_| {
            let modal = modals.open::<UserFormModal>(
                ModalConfig::new()
                    .title("Edit user")
                    .close_on_outside_click(false)
                    .data(user.get_untracked()),
            );
            modal.after_closed(move |edited| match edited {
                Some(edited) => {
                    last_result.set(format!("saved {}", edited.name));
                    user.set(edited);
                }
                None => last_result.set("edit cancelled".to_string()),
            });
        }
    };

    let open_counter = {
        let modals = modals.clone();
        move |_| {
            let modal = modals.open::<LiveCounterModal>(
                ModalConfig::new().title("Live counter").data(5),
            );
            modal.after_closed(move |value| {
                last_result.set(format!("counter: {:?}", value));
                counter_modal.set(None);
            });
            counter_modal.set(Some(modal));
        }
    };

    let peek_counter = move |_| {
        let value = counter_modal
            .get_untracked()
            .and_then(|modal| modal.component_instance::<LiveCounterModal>())
            .map(|counter| counter.value());
        peeked.set(value);
    };

    let open_empty = {
        let modals = modals.clone();
        move |_| {
            modals.open_content(
                crate::shared::modal::ModalContentType::<(), ()>::empty(),
                ModalConfig::new().title("Nothing to show"),
            );
        }
    };

    let close_all = {
        let modals = modals.clone();
        move |_| modals.close_all()
    };

    view! {
        <main class="modal-demo">
            <div class="modal-demo__actions">
                <button class="button" on:click=open_confirm>"Confirm dialog"</button>
                <button class="button" on:click=open_form>"Data form"</button>
                <button class="button" on:click=open_counter>"Live counter"</button>
                <button class="button" on:click=peek_counter>"Peek counter"</button>
                <button class="button" on:click=open_empty>"Empty modal"</button>
                <button class="button" on:click=close_all>"Close all"</button>
            </div>
            <p class="modal-demo__result">"Last result: " {move || last_result.get()}</p>
            <p class="modal-demo__result">
                "Counter while open: "
                {move || peeked.get().map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())}
            </p>
            <p class="modal-demo__result">"User: " {move || user.get().name}</p>
        </main>
        <ModalOutlet />
    }
}
