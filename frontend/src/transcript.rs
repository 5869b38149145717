/// One request/reply pair. Fields are private so a turn cannot change after
/// it is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    user_query: String,
    response: String,
}

impl Turn {
    pub fn new(user_query: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            user_query: user_query.into(),
            response: response.into(),
        }
    }

    pub fn user_query(&self) -> &str {
        &self.user_query
    }

    pub fn response(&self) -> &str {
        &self.response
    }
}

/// Session-scoped, append-only list of completed turns. Sent with every query
/// as conversational context; lost on reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Wire form expected by the query endpoint: `[[query, response], ...]`.
    pub fn as_pairs(&self) -> Vec<(String, String)> {
        self.turns
            .iter()
            .map(|turn| (turn.user_query.clone(), turn.response.clone()))
            .collect()
    }
}
