//! Parsed chat records and participant roles.
//!
//! A [`Message`] is one header line of an exported chat that survived parsing:
//! it always carries a minute-precision timestamp, a cleaned sender name, the
//! body text and the file it came from. Messages are never modified after the
//! parser creates them; every later stage only reads them.
//!
//! # Example
//!
//! ```
//! use chatlens::message::{Message, Operator, Role};
//! use chrono::NaiveDate;
//!
//! let ts = NaiveDate::from_ymd_opt(2023, 2, 1)
//!     .unwrap()
//!     .and_hms_opt(9, 0, 0)
//!     .unwrap();
//! let msg = Message::new(ts, "Alice", "hello", "alice.txt");
//!
//! let operator = Operator::new("Nusa Restoria");
//! assert_eq!(operator.role_of(&msg), Role::Customer);
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single timestamped chat record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// When the message was sent (minute precision, no timezone).
    pub timestamp: NaiveDateTime,

    /// Sender name with invisible control characters removed and trimmed.
    pub sender: String,

    /// Message text. May be empty.
    pub body: String,

    /// Identifier of the source file (its file name).
    pub conversation_id: String,
}

impl Message {
    /// Creates a new message.
    pub fn new(
        timestamp: NaiveDateTime,
        sender: impl Into<String>,
        body: impl Into<String>,
        conversation_id: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            sender: sender.into(),
            body: body.into(),
            conversation_id: conversation_id.into(),
        }
    }

    /// Returns the sender name.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the message body.
    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Which side of the conversation a sender is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The seller account.
    Operator,
    /// Anyone else.
    Customer,
}

/// The designated seller identity.
///
/// Role classification is an exact, case-sensitive match on the cleaned
/// sender name. Every component that needs to tell the seller apart from
/// buyers receives an `Operator` instead of comparing string literals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Operator(String);

impl Operator {
    /// Creates an operator identity from a sender name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the operator's sender name.
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `sender` is the operator.
    pub fn is(&self, sender: &str) -> bool {
        self.0 == sender
    }

    /// Classifies a message by its sender.
    pub fn role_of(&self, message: &Message) -> Role {
        if self.is(&message.sender) {
            Role::Operator
        } else {
            Role::Customer
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
