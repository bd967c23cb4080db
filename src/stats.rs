use serde::{Deserialize, Serialize};

use crate::ordered::OrderedMap;

/// One chat message as it appeared in the export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Display timestamp, kept verbatim.
    pub timestamp: String,
    pub sender: String,
    pub text: String,
}

impl Message {
    pub fn new(
        timestamp: impl Into<String>,
        sender: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            sender: sender.into(),
            text: text.into(),
        }
    }
}

/// Filtered messages plus per-sender counts.
///
/// `messages_by_user` and `users` are in first-seen order, and the counts
/// always sum to `total_messages == messages.len()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub total_messages: usize,
    pub messages_by_user: OrderedMap<usize>,
    pub messages: Vec<Message>,
    pub users: Vec<String>,
}

impl AnalysisResult {
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages sent by `sender`, in transcript order.
    pub fn messages_from<'a>(&'a self, sender: &'a str) -> impl Iterator<Item = &'a Message> {
        self.messages.iter().filter(move |m| m.sender == sender)
    }
}

/// Counts messages per sender in a single pass.
pub fn compute_statistics(messages: Vec<Message>) -> AnalysisResult {
    let mut messages_by_user = OrderedMap::new();
    for message in &messages {
        *messages_by_user.get_or_insert_with(&message.sender, || 0) += 1;
    }

    AnalysisResult {
        total_messages: messages.len(),
        users: messages_by_user.keys().map(str::to_string).collect(),
        messages_by_user,
        messages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Message> {
        vec![
            Message::new("t1", "Bob", "a"),
            Message::new("t2", "Alice", "b"),
            Message::new("t3", "Bob", "c"),
            Message::new("t4", "Carol", "d"),
            Message::new("t5", "Bob", "e"),
        ]
    }

    #[test]
    fn counts_are_conserved() {
        let result = compute_statistics(sample());
        let sum: usize = result.messages_by_user.values().sum();
        assert_eq!(sum, result.total_messages);
        assert_eq!(result.total_messages, result.messages.len());
        assert_eq!(result.total_messages, 5);
    }

    #[test]
    fn users_follow_first_seen_order() {
        let result = compute_statistics(sample());
        assert_eq!(result.users, vec!["Bob", "Alice", "Carol"]);
        assert_eq!(
            result.messages_by_user.iter().collect::<Vec<_>>(),
            vec![("Bob", &3), ("Alice", &1), ("Carol", &1)]
        );
    }

    #[test]
    fn empty_input_is_not_an_error() {
        let result = compute_statistics(Vec::new());
        assert_eq!(result.total_messages, 0);
        assert!(result.messages_by_user.is_empty());
        assert!(result.users.is_empty());
        assert!(result.is_empty());
    }

    #[test]
    fn round_trips_through_json() {
        let result = compute_statistics(sample());
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.starts_with(r#"{"totalMessages":5,"messagesByUser":{"Bob":3,"Alice":1,"Carol":1}"#));
        let back: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn messages_from_filters_by_sender() {
        let result = compute_statistics(sample());
        let texts: Vec<_> = result.messages_from("Bob").map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c", "e"]);
    }
}
