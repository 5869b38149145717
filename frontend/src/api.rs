use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use web_sys::{FormData, HtmlFormElement};

use crate::error::RequestError;
use crate::wire::{self, FormReply, HistoryPage, QueryReply, QueryRequest};

pub async fn post_query(request: &QueryRequest) -> Result<QueryReply, RequestError> {
    let response = Request::post(wire::QUERY_PATH)
        .json(request)?
        .send()
        .await?;
    decode(response).await
}

pub async fn fetch_history_page(page: u32) -> Result<HistoryPage, RequestError> {
    let response = Request::get(&wire::history_url(page)).send().await?;
    decode(response).await
}

/// Submits the form's fields as multipart data, the way a browser would.
pub async fn post_form(path: &str, form: &HtmlFormElement) -> Result<FormReply, RequestError> {
    let data = FormData::new_with_form(form)
        .map_err(|_| RequestError::Transport("form fields unavailable".to_string()))?;
    let response = Request::post(path).body(data)?.send().await?;
    decode(response).await
}

pub async fn get_form_reply(path: &str) -> Result<FormReply, RequestError> {
    let response = Request::get(path).send().await?;
    decode(response).await
}

async fn decode<T>(response: Response) -> Result<T, RequestError>
where
    T: DeserializeOwned,
{
    if !response.ok() {
        return Err(RequestError::Status(response.status()));
    }
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|err| RequestError::Decode(err.to_string()))
}
