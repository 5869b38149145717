use docchat_frontend::{dom, forms, runtime};
use leptos::*;
use web_sys::HtmlElement;

#[component]
fn App() -> impl IntoView {
    view! {
        <div
            id="leptos-runtime-marker"
            data-runtime="docchat-frontend"
            style="display:none;"
        ></div>
    }
}

fn main() {
    console_error_panic_hook::set_once();

    if let Some(root) = dom::element_by_id::<HtmlElement>("leptos-runtime-root") {
        mount_to(root, || view! { <App /> });
    } else {
        mount_to_body(|| view! { <App /> });
    }

    runtime::init_chat_view();
    forms::init_upload_form();
    forms::init_login_form();
    forms::init_logout_link();
}
