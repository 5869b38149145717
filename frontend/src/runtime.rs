use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlElement, HtmlFormElement};

use crate::api;
use crate::dom::{self, CHAT_FORM_ID, PAGE_TARGET_ATTR, PAGINATION_CONTAINER_ID};
use crate::view::{ChatHistoryView, Effect};

/// Owns the view state and executes the effects it emits.
struct ChatRuntime {
    view: RefCell<ChatHistoryView>,
}

impl ChatRuntime {
    fn new() -> Rc<Self> {
        Rc::new(Self {
            view: RefCell::new(ChatHistoryView::new()),
        })
    }

    fn dispatch(self: &Rc<Self>, update: impl FnOnce(&mut ChatHistoryView) -> Vec<Effect>) {
        let effects = update(&mut *self.view.borrow_mut());
        self.run(effects);
    }

    fn run(self: &Rc<Self>, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::AppendMessage(line) => dom::append_message(&line),
                Effect::ReplaceMessages(lines) => dom::replace_messages(&lines),
                Effect::RenderControls(controls) => dom::render_page_controls(&controls),
                Effect::ClearInput => dom::clear_input(),
                Effect::LogError(message) => dom::log_error(&message),
                Effect::PostQuery { ticket, request } => {
                    let runtime = self.clone();
                    spawn_local(async move {
                        let outcome = api::post_query(&request).await;
                        runtime.dispatch(|view| view.query_settled(ticket, outcome));
                    });
                }
                Effect::FetchHistory { ticket, page } => {
                    let runtime = self.clone();
                    spawn_local(async move {
                        let outcome = api::fetch_history_page(page).await;
                        runtime.dispatch(|view| view.history_settled(ticket, outcome));
                    });
                }
            }
        }
    }
}

fn install_chat_form(runtime: &Rc<ChatRuntime>, form: &HtmlFormElement) {
    let runtime = runtime.clone();
    let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        event.prevent_default();
        let input = dom::input_value();
        runtime.dispatch(|view| view.submit_query(&input));
    });
    let _ = form.add_event_listener_with_callback("submit", callback.as_ref().unchecked_ref());
    callback.forget();
}

fn install_pagination_clicks(runtime: &Rc<ChatRuntime>) {
    let Some(container) = dom::element_by_id::<HtmlElement>(PAGINATION_CONTAINER_ID) else {
        return;
    };

    let runtime = runtime.clone();
    let callback = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        let Some(target) = event
            .target()
            .and_then(|node| node.dyn_into::<web_sys::Element>().ok())
        else {
            return;
        };
        let Some(page) = target
            .get_attribute(PAGE_TARGET_ATTR)
            .as_deref()
            .and_then(dom::parse_page_target)
        else {
            return;
        };
        event.prevent_default();
        runtime.dispatch(|view| view.activate(page));
    });
    let _ = container.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref());
    callback.forget();
}

pub fn init_chat_view() {
    let Some(form) = dom::element_by_id::<HtmlFormElement>(CHAT_FORM_ID) else {
        return;
    };

    let runtime = ChatRuntime::new();
    install_chat_form(&runtime, &form);
    install_pagination_clicks(&runtime);
    runtime.dispatch(ChatHistoryView::mount);
}
