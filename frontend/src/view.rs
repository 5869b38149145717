use std::collections::HashMap;

use crate::error::RequestError;
use crate::pagination::{PageControl, page_controls};
use crate::transcript::{Transcript, Turn};
use crate::wire::{HistoryPage, QueryReply, QueryRequest};

pub const EMPTY_QUERY_MESSAGE: &str = "Bot: Please enter a valid query.";
pub const QUERY_FAILED_MESSAGE: &str = "Bot: Sorry, there was an error processing your request.";

/// Identifies one dispatched request so its outcome can be matched back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// A rendered line in the message container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLine {
    pub text: String,
    pub source: Option<String>,
}

impl MessageLine {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: None,
        }
    }

    fn user(query: &str) -> Self {
        Self::plain(format!("You: {query}"))
    }

    fn bot(response: &str, source: Option<String>) -> Self {
        Self {
            text: format!("Bot: {response}"),
            source,
        }
    }
}

/// Work the host runtime performs on behalf of the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    AppendMessage(MessageLine),
    ReplaceMessages(Vec<MessageLine>),
    RenderControls(Vec<PageControl>),
    ClearInput,
    PostQuery { ticket: Ticket, request: QueryRequest },
    FetchHistory { ticket: Ticket, page: u32 },
    LogError(String),
}

/// Chat transcript plus the paginated persisted history, as a pure state
/// machine. Every operation returns the effects to run; outcomes of network
/// effects come back through the `*_settled` methods.
#[derive(Debug)]
pub struct ChatHistoryView {
    transcript: Transcript,
    pending_queries: HashMap<Ticket, String>,
    current_page: u32,
    total_pages: u32,
    latest_history: Option<Ticket>,
    next_ticket: u64,
    mounted: bool,
}

impl Default for ChatHistoryView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatHistoryView {
    pub fn new() -> Self {
        Self {
            transcript: Transcript::new(),
            pending_queries: HashMap::new(),
            current_page: 1,
            total_pages: 1,
            latest_history: None,
            next_ticket: 0,
            mounted: false,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Page of the most recently accepted history response.
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn pending_queries(&self) -> usize {
        self.pending_queries.len()
    }

    /// Loads the first history page. Only the first call does anything.
    pub fn mount(&mut self) -> Vec<Effect> {
        if self.mounted {
            return Vec::new();
        }
        self.mounted = true;
        self.load_page(1)
    }

    pub fn submit_query(&mut self, input: &str) -> Vec<Effect> {
        let user_query = input.trim();
        if user_query.is_empty() {
            return vec![Effect::AppendMessage(MessageLine::plain(EMPTY_QUERY_MESSAGE))];
        }

        let ticket = self.issue_ticket();
        let request = QueryRequest {
            user_query: user_query.to_string(),
            chat_history: self.transcript.as_pairs(),
        };
        self.pending_queries.insert(ticket, user_query.to_string());

        vec![
            Effect::AppendMessage(MessageLine::user(user_query)),
            Effect::ClearInput,
            Effect::PostQuery { ticket, request },
        ]
    }

    /// The optimistic echo from `submit_query` is never withdrawn; a failed
    /// query only leaves the transcript as it was.
    pub fn query_settled(
        &mut self,
        ticket: Ticket,
        outcome: Result<QueryReply, RequestError>,
    ) -> Vec<Effect> {
        let Some(user_query) = self.pending_queries.remove(&ticket) else {
            return Vec::new();
        };

        match outcome {
            Ok(reply) => {
                let line = MessageLine::bot(&reply.response, reply.source);
                self.transcript.push(Turn::new(user_query, reply.response));
                vec![Effect::AppendMessage(line)]
            }
            Err(err) => vec![
                Effect::LogError(format!("Error: {err}")),
                Effect::AppendMessage(MessageLine::plain(QUERY_FAILED_MESSAGE)),
            ],
        }
    }

    pub fn load_page(&mut self, page: u32) -> Vec<Effect> {
        let ticket = self.issue_ticket();
        self.latest_history = Some(ticket);
        vec![Effect::FetchHistory {
            ticket,
            page: page.max(1),
        }]
    }

    /// Handles a click on a pagination control targeting `page`.
    pub fn activate(&mut self, page: u32) -> Vec<Effect> {
        self.load_page(page)
    }

    /// Applies a history response. Responses to anything but the latest page
    /// load are dropped so a slow earlier page cannot overwrite a later one.
    pub fn history_settled(
        &mut self,
        ticket: Ticket,
        outcome: Result<HistoryPage, RequestError>,
    ) -> Vec<Effect> {
        let page = match outcome {
            Ok(page) => page,
            Err(err) => {
                return vec![Effect::LogError(format!(
                    "Error loading chat history: {err}"
                ))];
            }
        };

        if self.latest_history != Some(ticket) {
            return Vec::new();
        }

        self.current_page = page.current_page;
        self.total_pages = page.total_pages;

        let lines = page
            .chat_history
            .into_iter()
            .rev()
            .flat_map(|entry| {
                [
                    MessageLine::user(&entry.user_query),
                    MessageLine::bot(&entry.response, entry.source),
                ]
            })
            .collect();

        vec![
            Effect::ReplaceMessages(lines),
            Effect::RenderControls(page_controls(self.current_page, self.total_pages)),
        ]
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::HistoryEntry;

    fn reply(text: &str) -> QueryReply {
        QueryReply {
            response: text.to_string(),
            source: None,
        }
    }

    fn entry(query: &str, response: &str) -> HistoryEntry {
        HistoryEntry {
            user_query: query.to_string(),
            response: response.to_string(),
            timestamp: None,
            source: None,
        }
    }

    fn history(entries: Vec<HistoryEntry>, current_page: u32, total_pages: u32) -> HistoryPage {
        HistoryPage {
            chat_history: entries,
            current_page,
            total_pages,
        }
    }

    fn posted_query(effects: &[Effect]) -> (Ticket, QueryRequest) {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::PostQuery { ticket, request } => Some((*ticket, request.clone())),
                _ => None,
            })
            .expect("query request")
    }

    fn fetches(effects: &[Effect]) -> Vec<(Ticket, u32)> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::FetchHistory { ticket, page } => Some((*ticket, *page)),
                _ => None,
            })
            .collect()
    }

    fn appended(effects: &[Effect]) -> Vec<String> {
        effects
            .iter()
            .filter_map(|effect| match effect {
                Effect::AppendMessage(line) => Some(line.text.clone()),
                _ => None,
            })
            .collect()
    }

    fn round_trip(view: &mut ChatHistoryView, query: &str, response: &str) {
        let (ticket, _) = posted_query(&view.submit_query(query));
        view.query_settled(ticket, Ok(reply(response)));
    }

    #[test]
    fn query_carries_transcript_from_before_the_call() {
        let mut view = ChatHistoryView::new();
        round_trip(&mut view, "hi", "hello");

        let effects = view.submit_query("  and now?  ");
        let requests: Vec<_> = effects
            .iter()
            .filter(|e| matches!(e, Effect::PostQuery { .. }))
            .collect();
        assert_eq!(requests.len(), 1);

        let (_, request) = posted_query(&effects);
        assert_eq!(request.user_query, "and now?");
        assert_eq!(
            request.chat_history,
            vec![("hi".to_string(), "hello".to_string())]
        );
    }

    #[test]
    fn blank_input_is_rejected_locally() {
        let mut view = ChatHistoryView::new();
        for input in ["", "   ", "\t\n"] {
            let effects = view.submit_query(input);
            assert_eq!(
                effects,
                vec![Effect::AppendMessage(MessageLine::plain(EMPTY_QUERY_MESSAGE))]
            );
        }
        assert_eq!(view.pending_queries(), 0);
    }

    #[test]
    fn echo_renders_before_reply() {
        let mut view = ChatHistoryView::new();
        let effects = view.submit_query("hi");
        assert_eq!(appended(&effects), vec!["You: hi"]);
        assert!(effects.contains(&Effect::ClearInput));
        assert!(view.transcript().is_empty());
    }

    #[test]
    fn successful_reply_extends_transcript() {
        let mut view = ChatHistoryView::new();
        let submitted = view.submit_query("hi");
        let (ticket, _) = posted_query(&submitted);
        let settled = view.query_settled(ticket, Ok(reply("hello")));

        let mut rendered = appended(&submitted);
        rendered.extend(appended(&settled));
        assert_eq!(rendered, vec!["You: hi", "Bot: hello"]);
        assert_eq!(view.transcript().turns(), &[Turn::new("hi", "hello")]);
    }

    #[test]
    fn failed_reply_keeps_transcript_and_echo() {
        let mut view = ChatHistoryView::new();
        round_trip(&mut view, "first", "one");

        let submitted = view.submit_query("second");
        let (ticket, _) = posted_query(&submitted);
        let settled = view.query_settled(ticket, Err(RequestError::Status(500)));

        assert_eq!(view.transcript().len(), 1);
        assert_eq!(appended(&settled), vec![QUERY_FAILED_MESSAGE]);
        assert!(matches!(settled[0], Effect::LogError(_)));
        assert_eq!(view.pending_queries(), 0);
    }

    #[test]
    fn overlapping_queries_settle_in_arrival_order() {
        let mut view = ChatHistoryView::new();
        let (first, first_request) = posted_query(&view.submit_query("first"));
        let (second, second_request) = posted_query(&view.submit_query("second"));
        assert!(first_request.chat_history.is_empty());
        assert!(second_request.chat_history.is_empty());

        let late = view.query_settled(second, Ok(reply("two")));
        let early = view.query_settled(first, Ok(reply("one")));

        assert_eq!(appended(&late), vec!["Bot: two"]);
        assert_eq!(appended(&early), vec!["Bot: one"]);
        assert_eq!(view.transcript().turns()[0], Turn::new("second", "two"));
        assert_eq!(view.transcript().turns()[1], Turn::new("first", "one"));
    }

    #[test]
    fn reply_source_is_kept_on_the_line() {
        let mut view = ChatHistoryView::new();
        let (ticket, _) = posted_query(&view.submit_query("hi"));
        let settled = view.query_settled(
            ticket,
            Ok(QueryReply {
                response: "hello".to_string(),
                source: Some("pdf".to_string()),
            }),
        );
        assert_eq!(
            settled,
            vec![Effect::AppendMessage(MessageLine {
                text: "Bot: hello".to_string(),
                source: Some("pdf".to_string()),
            })]
        );
    }

    #[test]
    fn mount_loads_first_page_once() {
        let mut view = ChatHistoryView::new();
        let effects = view.mount();
        assert_eq!(fetches(&effects).len(), 1);
        assert_eq!(fetches(&effects)[0].1, 1);
        assert!(view.mount().is_empty());
    }

    #[test]
    fn history_renders_oldest_first() {
        let mut view = ChatHistoryView::new();
        let (ticket, _) = fetches(&view.mount())[0];
        let effects = view.history_settled(
            ticket,
            Ok(history(vec![entry("a", "b"), entry("c", "d")], 1, 1)),
        );

        let Effect::ReplaceMessages(lines) = &effects[0] else {
            panic!("expected message replacement, got {effects:?}");
        };
        let texts: Vec<_> = lines.iter().map(|line| line.text.as_str()).collect();
        assert_eq!(texts, vec!["You: c", "Bot: d", "You: a", "Bot: b"]);
    }

    #[test]
    fn history_rebuilds_controls_from_response() {
        let mut view = ChatHistoryView::new();
        let (ticket, _) = fetches(&view.load_page(3))[0];
        let effects = view.history_settled(ticket, Ok(history(Vec::new(), 3, 5)));

        assert_eq!(view.current_page(), 3);
        assert_eq!(view.total_pages(), 5);
        let Effect::RenderControls(controls) = &effects[1] else {
            panic!("expected controls, got {effects:?}");
        };
        assert_eq!(controls.len(), 7);
    }

    #[test]
    fn activating_a_control_fetches_its_page() {
        let mut view = ChatHistoryView::new();
        let (first, _) = fetches(&view.mount())[0];
        view.history_settled(first, Ok(history(vec![entry("a", "b")], 1, 5)));

        let effects = view.activate(4);
        let requested = fetches(&effects);
        assert_eq!(requested.len(), 1);
        assert_eq!(requested[0].1, 4);
        assert_eq!(view.current_page(), 1);

        view.history_settled(requested[0].0, Ok(history(Vec::new(), 4, 5)));
        assert_eq!(view.current_page(), 4);
    }

    #[test]
    fn failed_history_load_leaves_rendering_alone() {
        let mut view = ChatHistoryView::new();
        let (ticket, _) = fetches(&view.mount())[0];
        let effects = view.history_settled(
            ticket,
            Err(RequestError::Transport("offline".to_string())),
        );

        assert_eq!(effects.len(), 1);
        let Effect::LogError(message) = &effects[0] else {
            panic!("expected a log entry, got {effects:?}");
        };
        assert!(message.starts_with("Error loading chat history"));
        assert_eq!(view.current_page(), 1);
    }

    #[test]
    fn stale_history_response_is_dropped() {
        let mut view = ChatHistoryView::new();
        let (older, _) = fetches(&view.activate(2))[0];
        let (newer, _) = fetches(&view.activate(3))[0];

        let applied = view.history_settled(newer, Ok(history(Vec::new(), 3, 5)));
        let dropped = view.history_settled(older, Ok(history(vec![entry("x", "y")], 2, 5)));

        assert_eq!(applied.len(), 2);
        assert!(dropped.is_empty());
        assert_eq!(view.current_page(), 3);
    }

    #[test]
    fn unknown_query_ticket_is_ignored() {
        let mut view = ChatHistoryView::new();
        let (ticket, _) = fetches(&view.mount())[0];
        assert!(view.query_settled(ticket, Ok(reply("stray"))).is_empty());
        assert!(view.transcript().is_empty());
    }
}
