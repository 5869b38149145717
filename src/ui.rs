use html_compile::compile::build_component;
use html_compile::types::{Attribute, Child, Component};

const BASE_CSS: &str = include_str!("ui_assets/base.css");

/// Entry module emitted by the frontend build into `/assets`.
pub const FRONTEND_MODULE: &str = "/assets/docchat-frontend.js";

#[derive(Debug, Clone)]
struct UiElement {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    content: UiContent,
}

#[derive(Debug, Clone)]
enum UiContent {
    Empty,
    Text(String),
    Children(Vec<UiElement>),
}

impl UiElement {
    fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            content: UiContent::Empty,
        }
    }

    fn with_attr(mut self, label: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((label, value.into()));
        self
    }

    fn with_text(mut self, text: impl Into<String>) -> Self {
        self.content = UiContent::Text(text.into());
        self
    }

    fn with_children(mut self, children: Vec<UiElement>) -> Self {
        self.content = UiContent::Children(children);
        self
    }

    fn render(&self) -> String {
        let component = self.to_component();
        build_component(&component)
    }

    fn to_component<'a>(&'a self) -> Component<'a> {
        let meta = if self.attrs.is_empty() {
            None
        } else {
            Some(
                self.attrs
                    .iter()
                    .map(|(label, value)| Attribute {
                        label,
                        value: value.as_str(),
                    })
                    .collect(),
            )
        };

        let child = match &self.content {
            UiContent::Empty => Child::NoChild,
            UiContent::Text(value) => Child::Text(value.as_str()),
            UiContent::Children(nodes) => Child::ComponentVec(
                nodes
                    .iter()
                    .map(|node| Box::new(node.to_component()))
                    .collect(),
            ),
        };

        Component {
            tag: self.tag,
            meta,
            child,
        }
    }
}

fn el(tag: &'static str) -> UiElement {
    UiElement::new(tag)
}

fn text_el(tag: &'static str, text: impl Into<String>) -> UiElement {
    UiElement::new(tag).with_text(text)
}

fn input_base(input_type: &str, name: &str, id: &str) -> UiElement {
    el("input")
        .with_attr("type", input_type)
        .with_attr("name", name)
        .with_attr("id", id)
}

fn form_group(label_for: &str, label: &str, control: UiElement) -> UiElement {
    el("div").with_attr("class", "form-group").with_children(vec![
        text_el("label", label).with_attr("for", label_for),
        control,
    ])
}

fn render_nav(title: &str) -> UiElement {
    el("nav").with_children(vec![
        text_el("span", escape_html(title)).with_attr("class", "logo"),
        text_el("a", "Chat").with_attr("href", "/"),
        text_el("a", "Logout")
            .with_attr("href", "/logout")
            .with_attr("id", "logout-link"),
    ])
}

fn render_chat_card() -> UiElement {
    el("div").with_attr("class", "card").with_children(vec![
        text_el("h2", "Chat"),
        el("div")
            .with_attr("id", "chat-messages")
            .with_attr("class", "messages")
            .with_attr("aria-live", "polite"),
        el("div")
            .with_attr("id", "pagination-container")
            .with_attr("class", "pagination"),
        el("form")
            .with_attr("id", "chat-form")
            .with_attr("class", "form-row")
            .with_attr("autocomplete", "off")
            .with_children(vec![
                input_base("text", "user_query", "user-input")
                    .with_attr("placeholder", "Ask about your documents...")
                    .with_attr("autofocus", "autofocus"),
                text_el("button", "Send").with_attr("type", "submit"),
            ]),
    ])
}

fn render_upload_card() -> UiElement {
    el("div").with_attr("class", "card").with_children(vec![
        text_el("h2", "Upload PDF"),
        el("form")
            .with_attr("id", "upload-form")
            .with_attr("enctype", "multipart/form-data")
            .with_children(vec![
                form_group(
                    "upload-file",
                    "File",
                    input_base("file", "file", "upload-file")
                        .with_attr("accept", ".pdf,application/pdf")
                        .with_attr("required", "required"),
                ),
                form_group("upload-title", "Title", input_base("text", "title", "upload-title")),
                form_group(
                    "upload-author",
                    "Author",
                    input_base("text", "author", "upload-author"),
                ),
                text_el("button", "Upload").with_attr("type", "submit"),
            ]),
    ])
}

fn render_login_content(title: &str) -> Vec<UiElement> {
    vec![
        el("div")
            .with_attr("class", "login-container card")
            .with_children(vec![
                text_el("h1", escape_html(title)),
                el("form")
                    .with_attr("id", "login-form")
                    .with_attr("method", "POST")
                    .with_attr("action", "/login")
                    .with_children(vec![
                        form_group(
                            "username",
                            "Username",
                            input_base("text", "username", "username")
                                .with_attr("required", "required")
                                .with_attr("autofocus", "autofocus"),
                        ),
                        form_group(
                            "password",
                            "Password",
                            input_base("password", "password", "password")
                                .with_attr("required", "required"),
                        ),
                        text_el("button", "Sign In").with_attr("type", "submit"),
                    ]),
            ]),
    ]
}

pub fn render_home_page(title: &str) -> String {
    let body_nodes = vec![
        render_nav(title),
        el("main").with_children(vec![render_chat_card(), render_upload_card()]),
    ];
    render_document(title, body_nodes)
}

pub fn render_login_page(title: &str) -> String {
    render_document(&format!("Login - {title}"), render_login_content(title))
}

fn render_document(title: &str, body_nodes: Vec<UiElement>) -> String {
    let head_children = vec![
        el("meta").with_attr("charset", "UTF-8"),
        el("meta")
            .with_attr("name", "viewport")
            .with_attr("content", "width=device-width, initial-scale=1.0"),
        text_el("title", escape_html(title)),
        el("style").with_text(BASE_CSS.to_string()),
    ];

    let mut body_children = vec![el("div").with_attr("id", "leptos-runtime-root")];
    body_children.extend(body_nodes);
    body_children.push(
        el("script")
            .with_attr("type", "module")
            .with_text(frontend_loader()),
    );

    let html = el("html").with_attr("lang", "en").with_children(vec![
        el("head").with_children(head_children),
        el("body").with_children(body_children),
    ]);

    format!("<!DOCTYPE html>\n{}", html.render())
}

fn frontend_loader() -> String {
    format!("import init from \"{FRONTEND_MODULE}\";\ninit();")
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME_ANCHORS: [&str; 6] = [
        "chat-form",
        "chat-messages",
        "user-input",
        "pagination-container",
        "upload-form",
        "logout-link",
    ];

    #[test]
    fn home_page_carries_every_anchor() {
        let html = render_home_page("DocChat");
        for anchor in HOME_ANCHORS {
            assert!(
                html.contains(&format!("id=\"{anchor}\"")),
                "missing anchor {anchor}"
            );
        }
        assert!(!html.contains("id=\"login-form\""));
    }

    #[test]
    fn upload_form_posts_expected_fields() {
        let html = render_home_page("DocChat");
        assert!(html.contains("multipart/form-data"));
        for field in ["name=\"file\"", "name=\"title\"", "name=\"author\""] {
            assert!(html.contains(field), "missing {field}");
        }
    }

    #[test]
    fn login_page_has_only_login_form() {
        let html = render_login_page("DocChat");
        assert!(html.contains("id=\"login-form\""));
        assert!(html.contains("name=\"username\""));
        assert!(html.contains("name=\"password\""));
        assert!(!html.contains("id=\"chat-form\""));
        assert!(html.contains("Login - DocChat"));
    }

    #[test]
    fn pages_load_frontend_module() {
        for html in [render_home_page("DocChat"), render_login_page("DocChat")] {
            assert!(html.starts_with("<!DOCTYPE html>"));
            assert!(html.contains(FRONTEND_MODULE));
            assert!(html.contains("id=\"leptos-runtime-root\""));
        }
    }

    #[test]
    fn title_is_escaped() {
        let html = render_home_page("<Docs & Chat>");
        assert!(html.contains("&lt;Docs &amp; Chat&gt;"));
        assert!(!html.contains("<Docs & Chat>"));
    }
}
