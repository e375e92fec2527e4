use crate::shared::icons::icon;
use crate::shared::modal::{CloseReason, FocusTrap, ModalContainer, FOCUSABLE_SELECTOR};
use gloo_timers::future::TimeoutFuture;
use leptos::ev;
use leptos::prelude::*;
use std::sync::Arc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, HtmlElement};

/// Dialog chrome around one modal container: backdrop, panel, optional
/// title bar with close button, body and optional footer.
///
/// While mounted it keeps Tab focus inside the panel and, on cleanup,
/// returns focus to whatever had it before if that element is still in the
/// document. Body scrolling is locked once for the whole stack by
/// [`ModalOutlet`](crate::layout::ModalOutlet).
#[component]
pub fn ModalChrome(
    container: Arc<ModalContainer>,
    /// z-index for overlay stacking (default: 1000).
    #[prop(optional, into)]
    z_index: Option<Signal<i32>>,
    /// True while the exit transition plays.
    #[prop(optional)]
    exiting: Option<Signal<bool>>,
) -> impl IntoView {
    let chrome = container.chrome().clone();
    let z_index = z_index.unwrap_or_else(|| Signal::stored(1000));
    let overlay_mouse_down = RwSignal::new(false);
    let panel_ref = NodeRef::<leptos::html::Div>::new();

    let previous_focus = StoredValue::new_local(active_html_element());
    let restore_focus = chrome.restore_focus;
    on_cleanup(move || {
        if restore_focus {
            previous_focus.try_with_value(|element| {
                // May sit inside a modal that is already gone.
                if let Some(element) = element.as_ref().filter(|e| e.is_connected()) {
                    let _ = element.focus();
                }
            });
        }
    });

    // Initial focus: first focusable element, or the panel itself.
    Effect::new(move |_| {
        if let Some(panel) = panel_ref.get() {
            let focusables = focusable_elements(&panel);
            match FocusTrap::new(focusables.len()).initial() {
                Some(index) => {
                    let _ = focusables[index].focus();
                }
                None => {
                    let _ = panel.focus();
                }
            }
        }
    });

    let handle_keydown = move |ev: ev::KeyboardEvent| {
        if ev.key() != "Tab" {
            return;
        }
        let Some(panel) = panel_ref.get_untracked() else {
            return;
        };
        let focusables = focusable_elements(&panel);
        let active = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.active_element());
        let current = active.and_then(|active| {
            focusables.iter().position(|f| {
                let element: &Element = f.as_ref();
                *element == active
            })
        });
        if let Some(target) = FocusTrap::new(focusables.len()).on_tab(current, ev.shift_key()) {
            ev.prevent_default();
            let _ = focusables[target].focus();
        }
    };

    let is_direct_overlay_event = |ev: &ev::MouseEvent| -> bool {
        match (ev.target(), ev.current_target()) {
            (Some(t), Some(ct)) => t == ct,
            _ => false,
        }
    };

    // Close only if both press and release happened on the overlay itself,
    // so a text selection dragged out of the panel does not dismiss it.
    let handle_overlay_mouse_down = move |ev: ev::MouseEvent| {
        overlay_mouse_down.set(is_direct_overlay_event(&ev));
    };

    let handle_overlay_click = {
        let container = container.clone();
        move |ev: ev::MouseEvent| {
            let should_close = overlay_mouse_down.get_untracked() && is_direct_overlay_event(&ev);
            overlay_mouse_down.set(false);
            if should_close {
                // Next tick: the overlay may be removed during its own click dispatch.
                let container = container.clone();
                spawn_local(async move {
                    TimeoutFuture::new(0).await;
                    container.request_close(CloseReason::Backdrop);
                });
            }
        }
    };

    let handle_close_button = {
        let container = container.clone();
        move |_: ev::MouseEvent| {
            container.request_close(CloseReason::CloseButton);
        }
    };

    let stop_propagation = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
    };

    let overlay_class = {
        let base = chrome.overlay_class();
        move || match exiting {
            Some(exiting) if exiting.get() => format!("{base} modal-overlay--closing"),
            _ => base.clone(),
        }
    };

    let header = chrome.has_header().then(|| {
        let title = chrome.title.clone();
        let show_close_button = chrome.show_close_button;
        view! {
            <div class="modal-header">
                <h2 class="modal-title">{title}</h2>
                {show_close_button.then(move || view! {
                    <button
                        type="button"
                        class="button button--icon modal__close"
                        aria-label="Close"
                        on:click=handle_close_button
                    >
                        {icon("x")}
                    </button>
                })}
            </div>
        }
    });

    let footer = if chrome.show_footer {
        container
            .render_footer()
            .map(|actions| view! { <div class="modal-footer">{actions}</div> })
    } else {
        None
    };

    view! {
        <div
            class=overlay_class
            style=move || format!("z-index: {};", z_index.get())
            data-modal-id=container.id().to_string()
            on:mousedown=handle_overlay_mouse_down
            on:click=handle_overlay_click
            on:keydown=handle_keydown
        >
            <div
                node_ref=panel_ref
                class=chrome.panel_class()
                style=chrome.panel_style()
                role="dialog"
                aria-modal="true"
                tabindex="-1"
                on:click=stop_propagation
            >
                {header}
                <div class=chrome.body_class()>
                    {container.render_content()}
                </div>
                {footer}
            </div>
        </div>
    }
}

fn focusable_elements(root: &Element) -> Vec<HtmlElement> {
    let Ok(nodes) = root.query_selector_all(FOCUSABLE_SELECTOR) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

fn active_html_element() -> Option<HtmlElement> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.active_element())
        .and_then(|e| e.dyn_into::<HtmlElement>().ok())
}

fn document_body() -> Option<HtmlElement> {
    web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body())
}

/// What the page looked like before the first modal opened.
pub(crate) struct PageState {
    overflow: String,
    focus: Option<HtmlElement>,
}

/// Remember focus and hide body overflow.
pub(crate) fn capture_page() -> PageState {
    let focus = active_html_element();
    let Some(body) = document_body() else {
        return PageState {
            overflow: String::new(),
            focus,
        };
    };
    let style = body.style();
    let overflow = style.get_property_value("overflow").unwrap_or_default();
    let _ = style.set_property("overflow", "hidden");
    PageState { overflow, focus }
}

/// Put overflow back; refocus the page element if focus was lost with the
/// last modal.
pub(crate) fn restore_page(state: PageState) {
    let body = document_body();
    if let Some(body) = &body {
        let _ = body.style().set_property("overflow", &state.overflow);
    }

    let focus_lost = match active_html_element() {
        None => true,
        Some(active) => body.as_ref() == Some(&active),
    };
    if focus_lost {
        if let Some(element) = state.focus.filter(|e| e.is_connected()) {
            let _ = element.focus();
        }
    }
}
