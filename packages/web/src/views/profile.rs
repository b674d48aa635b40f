//! Profile details and the encryption-context controls.

use std::rc::Rc;

use api::{ApiClient, ProfileUpdate};
use dioxus::prelude::*;
use ui::components::{Banner, Button, ButtonVariant, TextField};
use ui::{
    use_api, use_cancel_token, use_session, use_snackbar, ContextGate, GateOutcome, GateState,
    InFlight, Notification, SessionContext, Snackbar, BUSY_MESSAGE,
};

type Gate = Rc<ContextGate<ApiClient>>;

fn settle(outcome: GateOutcome, mut session: SessionContext, snackbar: Snackbar) {
    outcome.apply(&mut *session.write());
    if let Some(notification) = outcome.notification {
        snackbar.show(notification);
    }
}

#[derive(Clone, Default, PartialEq)]
struct ProfileForm {
    full_name: String,
    address: String,
    phone_number: String,
    birthdate: String,
}

fn form_from_session(session: &SessionContext) -> ProfileForm {
    let current = session.peek();
    let Some(user) = current.user() else {
        return ProfileForm::default();
    };
    let profile = user.profile.clone().unwrap_or_default();
    ProfileForm {
        full_name: user.full_name.clone(),
        address: profile.address.unwrap_or_default(),
        phone_number: profile.phone_number.unwrap_or_default(),
        birthdate: profile.birthdate.unwrap_or_default(),
    }
}

#[component]
pub fn Profile() -> Element {
    let mut session = use_session();
    let api = use_api();
    let snackbar = use_snackbar();
    let cancel = use_cancel_token();
    let in_flight = use_hook(InFlight::new);

    let gate_state = use_signal(GateState::default);
    let gate: Gate = use_hook(|| {
        Rc::new(
            ContextGate::new(api.clone(), cancel.clone(), in_flight.clone()).with_observer(
                move |state| {
                    let mut gate_state = gate_state;
                    gate_state.set(state.clone());
                },
            ),
        )
    });

    let mut form = use_signal(|| form_from_session(&session));
    let mut saving = use_signal(|| false);
    let mut mnemonic_input = use_signal(String::new);

    {
        let gate = gate.clone();
        use_effect(move || {
            let gate = gate.clone();
            spawn(async move {
                gate.check_saved_context_key().await;
                let outcome = gate.check_opened_context_key().await;
                settle(outcome, session, snackbar);
            });
        });
    }

    let update_profile = {
        let api = api.clone();
        let cancel = cancel.clone();
        let in_flight = in_flight.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let Some(user_id) = session.peek().user().map(|u| u.id) else {
                return;
            };
            let Some(guard) = in_flight.try_begin() else {
                snackbar.show(Notification::info(BUSY_MESSAGE));
                return;
            };
            let values = form();
            let update = ProfileUpdate {
                user_id,
                full_name: values.full_name.trim().to_string(),
                address: values.address.trim().to_string(),
                phone_number: values.phone_number.trim().to_string(),
                birthdate: values.birthdate,
            };

            let api = api.clone();
            let cancel = cancel.clone();
            spawn(async move {
                let _guard = guard;
                saving.set(true);
                let result = cancel.run(api.update_profile(&update)).await;
                saving.set(false);

                match result {
                    Ok(()) => {
                        session.write().set_user(update.to_patch());
                        snackbar.show(Notification::success("Profile updated"));
                    }
                    Err(err) => snackbar.show_error(&err, "Failed to update profile"),
                }
            });
        }
    };

    let generate = {
        let gate = gate.clone();
        move |_: MouseEvent| {
            let gate = gate.clone();
            spawn(async move {
                let outcome = gate.generate_context_key().await;
                settle(outcome, session, snackbar);
            });
        }
    };

    let open = {
        let gate = gate.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let gate = gate.clone();
            let phrase = mnemonic_input();
            spawn(async move {
                let outcome = gate.open_saved_context_key(&phrase).await;
                if outcome.context_opened {
                    mnemonic_input.set(String::new());
                }
                settle(outcome, session, snackbar);
            });
        }
    };

    let dismiss_mnemonic = {
        let gate = gate.clone();
        move |_: MouseEvent| gate.dismiss_mnemonic()
    };

    let email = session
        .read()
        .user()
        .map(|u| u.email.clone())
        .unwrap_or_default();
    let context_opened = session.read().context_opened();
    let dirty = form() != form_from_session(&session);
    let gate_view = gate_state();
    let busy = gate_view.generating || gate_view.opening || saving();

    rsx! {
        div {
            class: "flex flex-col gap-8 max-w-3xl",

            section {
                h2 { class: "pb-2 mb-4 border-b border-neutral-300 text-lg font-semibold", "User profile" }

                form {
                    class: "grid grid-cols-2 gap-4",
                    novalidate: true,
                    onsubmit: update_profile,

                    TextField {
                        label: "Email",
                        r#type: "email",
                        value: email,
                        disabled: true,
                        oninput: move |_| {},
                    }
                    TextField {
                        label: "Full name",
                        value: form().full_name,
                        oninput: move |v| form.write().full_name = v,
                    }
                    TextField {
                        label: "Address",
                        value: form().address,
                        oninput: move |v| form.write().address = v,
                    }
                    TextField {
                        label: "Phone number",
                        r#type: "tel",
                        value: form().phone_number,
                        oninput: move |v| form.write().phone_number = v,
                    }
                    TextField {
                        label: "Birthdate",
                        r#type: "date",
                        value: form().birthdate,
                        oninput: move |v| form.write().birthdate = v,
                    }

                    div {
                        class: "col-span-2 flex justify-end",
                        Button {
                            r#type: "submit",
                            disabled: !dirty || saving(),
                            if saving() { "Saving..." } else { "Edit" }
                        }
                    }
                }
            }

            section {
                h2 { class: "pb-2 mb-4 border-b border-neutral-300 text-lg font-semibold", "Encryption context key" }

                if let Some(phrase) = gate_view.mnemonic_phrase.clone() {
                    div {
                        class: "flex flex-col gap-3 mb-4 p-4 rounded border border-amber-300 bg-amber-50",
                        p {
                            class: "text-sm text-amber-900",
                            "Write this mnemonic phrase down and keep it safe. It is shown only once and is needed to open your context."
                        }
                        code { class: "p-3 bg-white rounded border font-mono text-sm break-words", "{phrase}" }
                        Button {
                            variant: ButtonVariant::Secondary,
                            class: "self-end",
                            onclick: dismiss_mnemonic,
                            "I have saved it"
                        }
                    }
                }

                if gate_view.checking {
                    div { class: "h-12 rounded bg-neutral-200 animate-pulse" }
                } else if gate_view.has_encryption_context {
                    div {
                        class: "flex flex-col gap-4",
                        Banner { "The encryption context key has already been created." }

                        if context_opened {
                            Banner { "Your encryption context is open." }
                        } else {
                            form {
                                class: "flex items-end gap-3",
                                onsubmit: open,
                                div {
                                    class: "flex-1",
                                    TextField {
                                        label: "Mnemonic phrase",
                                        r#type: "password",
                                        value: mnemonic_input(),
                                        disabled: busy,
                                        oninput: move |v| mnemonic_input.set(v),
                                    }
                                }
                                Button {
                                    r#type: "submit",
                                    disabled: busy,
                                    if gate_view.opening { "Opening..." } else { "Open context" }
                                }
                            }
                        }
                    }
                } else {
                    div {
                        class: "flex flex-col gap-3",
                        Banner { warning: true, "No encryption context key exists yet. Generate one before registering faces." }
                        Button {
                            class: "self-start",
                            disabled: busy,
                            onclick: generate,
                            if gate_view.generating { "Generating..." } else { "Generate context key" }
                        }
                    }
                }
            }
        }
    }
}
