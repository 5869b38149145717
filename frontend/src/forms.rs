use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlElement, HtmlFormElement};

use crate::api;
use crate::dom::{self, LOGIN_FORM_ID, LOGOUT_LINK_ID, UPLOAD_FORM_ID};
use crate::error::RequestError;
use crate::wire::{self, FormReply};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEffect {
    Alert(String),
    ResetForm,
    Navigate(String),
    LogError(String),
}

fn server_message(reply: &FormReply) -> &str {
    reply.message.as_deref().unwrap_or("unknown error")
}

pub fn upload_outcome(outcome: Result<FormReply, RequestError>) -> Vec<FormEffect> {
    match outcome {
        Ok(reply) if reply.success => vec![
            FormEffect::Alert("File uploaded successfully!".to_string()),
            FormEffect::ResetForm,
        ],
        Ok(reply) => vec![FormEffect::Alert(format!(
            "Error uploading file: {}",
            server_message(&reply)
        ))],
        Err(err) => vec![
            FormEffect::LogError(format!("Error: {err}")),
            FormEffect::Alert("An error occurred while uploading the file.".to_string()),
        ],
    }
}

pub fn login_outcome(outcome: Result<FormReply, RequestError>) -> Vec<FormEffect> {
    match outcome {
        Ok(reply) if reply.success => vec![FormEffect::Navigate(wire::HOME_PATH.to_string())],
        Ok(reply) => vec![FormEffect::Alert(format!(
            "Login failed: {}",
            server_message(&reply)
        ))],
        Err(err) => vec![
            FormEffect::LogError(format!("Error: {err}")),
            FormEffect::Alert("An error occurred during login.".to_string()),
        ],
    }
}

pub fn logout_outcome(outcome: Result<FormReply, RequestError>) -> Vec<FormEffect> {
    match outcome {
        Ok(reply) if reply.success => vec![FormEffect::Navigate(wire::LOGIN_PATH.to_string())],
        Ok(_) => vec![FormEffect::Alert(
            "An error occurred during logout.".to_string(),
        )],
        Err(err) => vec![
            FormEffect::LogError(format!("Error: {err}")),
            FormEffect::Alert("An error occurred during logout.".to_string()),
        ],
    }
}

fn apply_form_effects(form: Option<&HtmlFormElement>, effects: Vec<FormEffect>) {
    for effect in effects {
        match effect {
            FormEffect::Alert(message) => dom::alert(&message),
            FormEffect::ResetForm => {
                if let Some(form) = form {
                    form.reset();
                }
            }
            FormEffect::Navigate(href) => dom::navigate(&href),
            FormEffect::LogError(message) => dom::log_error(&message),
        }
    }
}

fn install_form_handler(
    form_id: &str,
    endpoint: &'static str,
    resolve: fn(Result<FormReply, RequestError>) -> Vec<FormEffect>,
) {
    let Some(form) = dom::element_by_id::<HtmlFormElement>(form_id) else {
        return;
    };

    let form_ref = form.clone();
    let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        event.prevent_default();
        let form = form_ref.clone();
        spawn_local(async move {
            let outcome = api::post_form(endpoint, &form).await;
            apply_form_effects(Some(&form), resolve(outcome));
        });
    });
    let _ = form.add_event_listener_with_callback("submit", callback.as_ref().unchecked_ref());
    callback.forget();
}

pub fn init_upload_form() {
    install_form_handler(UPLOAD_FORM_ID, wire::UPLOAD_PATH, upload_outcome);
}

pub fn init_login_form() {
    install_form_handler(LOGIN_FORM_ID, wire::LOGIN_PATH, login_outcome);
}

pub fn init_logout_link() {
    let Some(link) = dom::element_by_id::<HtmlElement>(LOGOUT_LINK_ID) else {
        return;
    };

    let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        event.prevent_default();
        spawn_local(async move {
            let outcome = api::get_form_reply(wire::LOGOUT_PATH).await;
            apply_form_effects(None, logout_outcome(outcome));
        });
    });
    let _ = link.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref());
    callback.forget();
}
