use serde::{Deserialize, Serialize};

pub const QUERY_PATH: &str = "/query";
pub const HISTORY_PATH: &str = "/chat_history";
pub const UPLOAD_PATH: &str = "/upload";
pub const LOGIN_PATH: &str = "/login";
pub const LOGOUT_PATH: &str = "/logout";
pub const HOME_PATH: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest {
    pub user_query: String,
    pub chat_history: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueryReply {
    pub response: String,
    #[serde(default)]
    pub source: Option<String>,
}

/// One persisted turn as the history endpoint reports it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryEntry {
    pub user_query: String,
    pub response: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// Entries arrive newest-first.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryPage {
    pub chat_history: Vec<HistoryEntry>,
    pub current_page: u32,
    pub total_pages: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FormReply {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

pub fn history_url(page: u32) -> String {
    format!("{HISTORY_PATH}?page={page}")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn query_request_sends_history_as_pairs() {
        let request = QueryRequest {
            user_query: "next".to_string(),
            chat_history: vec![("hi".to_string(), "hello".to_string())],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({"user_query": "next", "chat_history": [["hi", "hello"]]})
        );
    }

    #[test]
    fn history_page_tolerates_backend_metadata() {
        let raw = json!({
            "chat_history": [
                {"user_query": "q", "response": "r", "timestamp": "2024-05-01T10:00:00", "source": "pdf"},
                {"user_query": "q2", "response": "r2"}
            ],
            "current_page": 2,
            "total_pages": 3
        });
        let page: HistoryPage = serde_json::from_value(raw).unwrap();
        assert_eq!(page.current_page, 2);
        assert_eq!(page.chat_history[0].source.as_deref(), Some("pdf"));
        assert_eq!(page.chat_history[1].timestamp, None);
    }

    #[test]
    fn form_reply_message_is_optional() {
        let reply: FormReply = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(reply.success);
        assert!(reply.message.is_none());
    }

    #[test]
    fn history_url_carries_page_number() {
        assert_eq!(history_url(4), "/chat_history?page=4");
    }
}
