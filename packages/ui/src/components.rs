//! Small form building blocks shared by the pages.

use dioxus::prelude::*;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Danger,
}

impl ButtonVariant {
    fn class(self) -> &'static str {
        match self {
            ButtonVariant::Primary => "bg-blue-600 text-white hover:bg-blue-700",
            ButtonVariant::Secondary => "bg-white text-neutral-700 border border-neutral-300 hover:bg-neutral-50",
            ButtonVariant::Danger => "bg-red-600 text-white hover:bg-red-700",
        }
    }
}

#[component]
pub fn Button(
    #[props(default)] variant: ButtonVariant,
    #[props(default = "button".to_string())] r#type: String,
    #[props(default)] disabled: bool,
    #[props(default)] class: String,
    onclick: Option<EventHandler<MouseEvent>>,
    children: Element,
) -> Element {
    let variant_class = variant.class();
    rsx! {
        button {
            class: "px-4 py-2 rounded text-sm font-medium transition-colors duration-150 disabled:opacity-50 disabled:cursor-not-allowed {variant_class} {class}",
            r#type: r#type,
            disabled,
            onclick: move |evt| {
                if let Some(handler) = onclick {
                    handler.call(evt);
                }
            },
            {children}
        }
    }
}

/// Labelled input bound to a string signal.
#[component]
pub fn TextField(
    label: String,
    value: String,
    oninput: EventHandler<String>,
    #[props(default = "text".to_string())] r#type: String,
    #[props(default)] placeholder: String,
    #[props(default)] disabled: bool,
) -> Element {
    rsx! {
        label {
            class: "flex flex-col gap-1 text-sm text-neutral-700",
            "{label}"
            input {
                class: "px-3 py-2 border border-neutral-300 rounded text-[0.9375rem] focus:outline-none focus:border-blue-500",
                r#type: r#type,
                placeholder,
                value,
                disabled,
                oninput: move |evt: FormEvent| oninput.call(evt.value()),
            }
        }
    }
}

/// Inline notice, e.g. the context gate warning.
#[component]
pub fn Banner(#[props(default)] warning: bool, children: Element) -> Element {
    let tone = if warning {
        "bg-amber-50 border-amber-200 text-amber-800"
    } else {
        "bg-blue-50 border-blue-200 text-blue-800"
    };
    rsx! {
        div {
            class: "px-3 py-2.5 border rounded text-sm {tone}",
            role: "status",
            {children}
        }
    }
}
