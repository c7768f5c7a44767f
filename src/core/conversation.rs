//! Grouping messages into per-file conversations.
//!
//! A [`Conversation`] is every message sharing one `conversation_id`, sorted
//! by timestamp. The sort is stable, so messages stamped with the same minute
//! keep the order in which they appeared in the file. Grouping always sorts
//! after collecting, so the result does not depend on ingestion order.
//!
//! # Example
//!
//! ```
//! use chatlens::core::conversation::group;
//! use chatlens::message::{Message, Operator};
//! use chrono::NaiveDate;
//!
//! let at = |h, m| NaiveDate::from_ymd_opt(2023, 2, 1).unwrap().and_hms_opt(h, m, 0).unwrap();
//! let messages = vec![
//!     Message::new(at(9, 5), "Shop", "hi there", "a.txt"),
//!     Message::new(at(9, 0), "Alice", "hello", "a.txt"),
//! ];
//!
//! let conversations = group(messages);
//! let convo = &conversations["a.txt"];
//! assert_eq!(convo.messages()[0].sender, "Alice");
//!
//! let operator = Operator::new("Shop");
//! assert_eq!(convo.response_pairs(&operator).count(), 1);
//! ```

use std::collections::BTreeMap;

use crate::message::{Message, Operator, Role};

/// Time-ordered messages from one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    id: String,
    messages: Vec<Message>,
}

impl Conversation {
    /// Builds a conversation, sorting the messages by timestamp.
    ///
    /// Messages are taken as given; callers are expected to pass messages
    /// that share `id`.
    pub fn new(id: impl Into<String>, mut messages: Vec<Message>) -> Self {
        messages.sort_by_key(|m| m.timestamp);
        Self {
            id: id.into(),
            messages,
        }
    }

    /// Source file identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Messages in timestamp order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if the conversation has no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The most recent message.
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// The last `n` messages (fewer if the conversation is shorter).
    pub fn tail(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    /// Bodies of the last `n` messages joined with a single space.
    pub fn tail_text(&self, n: usize) -> String {
        join_bodies(self.tail(n))
    }

    /// Bodies of every message joined with a single space.
    pub fn full_text(&self) -> String {
        join_bodies(&self.messages)
    }

    /// Bodies of the operator's messages joined with a single space.
    pub fn operator_text(&self, operator: &Operator) -> String {
        let bodies: Vec<&str> = self
            .messages
            .iter()
            .filter(|m| operator.is(&m.sender))
            .map(|m| m.body.as_str())
            .collect();
        bodies.join(" ")
    }

    /// Adjacent (customer, operator) message pairs.
    ///
    /// A pair is yielded wherever a customer message is immediately followed
    /// by an operator message in timestamp order.
    pub fn response_pairs<'a>(
        &'a self,
        operator: &'a Operator,
    ) -> impl Iterator<Item = (&'a Message, &'a Message)> + 'a {
        self.messages.windows(2).filter_map(move |pair| {
            let (asked, replied) = (&pair[0], &pair[1]);
            let roles = (operator.role_of(asked), operator.role_of(replied));
            (roles == (Role::Customer, Role::Operator)).then_some((asked, replied))
        })
    }

    /// Returns `true` if the messages are in non-decreasing timestamp order.
    pub fn is_sorted(&self) -> bool {
        self.messages
            .windows(2)
            .all(|w| w[0].timestamp <= w[1].timestamp)
    }
}

fn join_bodies(messages: &[Message]) -> String {
    let bodies: Vec<&str> = messages.iter().map(|m| m.body.as_str()).collect();
    bodies.join(" ")
}

/// Groups messages by `conversation_id` and sorts each group by time.
///
/// Input order within a conversation is kept for equal timestamps.
pub fn group(messages: impl IntoIterator<Item = Message>) -> BTreeMap<String, Conversation> {
    let mut buckets: BTreeMap<String, Vec<Message>> = BTreeMap::new();
    for msg in messages {
        buckets
            .entry(msg.conversation_id.clone())
            .or_default()
            .push(msg);
    }

    buckets
        .into_iter()
        .map(|(id, msgs)| {
            let convo = Conversation::new(id.clone(), msgs);
            (id, convo)
        })
        .collect()
}
