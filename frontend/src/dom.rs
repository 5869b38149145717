use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlInputElement};

use crate::pagination::PageControl;
use crate::view::MessageLine;

pub const CHAT_FORM_ID: &str = "chat-form";
pub const CHAT_MESSAGES_ID: &str = "chat-messages";
pub const USER_INPUT_ID: &str = "user-input";
pub const PAGINATION_CONTAINER_ID: &str = "pagination-container";
pub const UPLOAD_FORM_ID: &str = "upload-form";
pub const LOGIN_FORM_ID: &str = "login-form";
pub const LOGOUT_LINK_ID: &str = "logout-link";

pub const PAGE_TARGET_ATTR: &str = "data-page";
const CURRENT_PAGE_CLASS: &str = "current-page";

pub fn web_document() -> Option<Document> {
    web_sys::window().and_then(|window| window.document())
}

pub fn element_by_id<T>(id: &str) -> Option<T>
where
    T: JsCast,
{
    web_document()
        .and_then(|doc| doc.get_element_by_id(id))
        .and_then(|node| node.dyn_into::<T>().ok())
}

fn message_element(doc: &Document, line: &MessageLine) -> Option<Element> {
    let node = doc.create_element("p").ok()?;
    node.set_text_content(Some(&line.text));
    if let Some(source) = line.source.as_deref() {
        let _ = node.set_attribute("data-source", source);
    }
    Some(node)
}

fn scroll_to_bottom(container: &Element) {
    container.set_scroll_top(container.scroll_height());
}

pub fn append_message(line: &MessageLine) {
    let Some(doc) = web_document() else {
        return;
    };
    let Some(container) = doc.get_element_by_id(CHAT_MESSAGES_ID) else {
        return;
    };
    if let Some(node) = message_element(&doc, line) {
        let _ = container.append_child(&node);
    }
    scroll_to_bottom(&container);
}

pub fn replace_messages(lines: &[MessageLine]) {
    let Some(doc) = web_document() else {
        return;
    };
    let Some(container) = doc.get_element_by_id(CHAT_MESSAGES_ID) else {
        return;
    };

    container.set_inner_html("");
    for line in lines {
        if let Some(node) = message_element(&doc, line) {
            let _ = container.append_child(&node);
        }
    }
    scroll_to_bottom(&container);
}

/// Rebuilds the pagination strip. Buttons only carry their target page; clicks
/// are handled by a single listener on the container.
pub fn render_page_controls(controls: &[PageControl]) {
    let Some(doc) = web_document() else {
        return;
    };
    let Some(container) = doc.get_element_by_id(PAGINATION_CONTAINER_ID) else {
        return;
    };

    container.set_inner_html("");
    for control in controls {
        let Ok(button) = doc.create_element("button") else {
            continue;
        };
        let _ = button.set_attribute("type", "button");
        let _ = button.set_attribute(PAGE_TARGET_ATTR, &control.target.to_string());
        button.set_text_content(Some(&control.label));
        if control.is_current {
            let _ = button.class_list().add_1(CURRENT_PAGE_CLASS);
        }
        let _ = container.append_child(&button);
    }
}

pub fn input_value() -> String {
    element_by_id::<HtmlInputElement>(USER_INPUT_ID)
        .map(|input| input.value())
        .unwrap_or_default()
}

pub fn clear_input() {
    if let Some(input) = element_by_id::<HtmlInputElement>(USER_INPUT_ID) {
        input.set_value("");
    }
}

pub fn log_error(message: &str) {
    web_sys::console::error_1(&JsValue::from_str(message));
}

pub fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

pub fn navigate(href: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.location().set_href(href);
    }
}

pub fn parse_page_target(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|page| *page >= 1)
}
