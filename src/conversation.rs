//! Conversation state: the ordered list of turns and the typing flag.

use chrono::{DateTime, Local};
use tracing::debug;

use crate::client::BackendPayload;
use crate::events::Sender;

/// Id reserved for the synthetic typing entry
pub const TYPING_ID: u64 = 0;

/// A single turn in the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: u64,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Local>,
}

/// Sequence number handed out per user submission. Results carrying an
/// older number than the latest are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestSeq(pub u64);

/// Second bot turn, due after the follow-up delay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowUp {
    pub seq: RequestSeq,
    pub content: String,
}

/// One item of the render view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry<'a> {
    Message(&'a Message),
    /// Placeholder shown while awaiting the backend; never stored
    Typing,
}

impl Entry<'_> {
    pub fn id(&self) -> u64 {
        match self {
            Entry::Message(message) => message.id,
            Entry::Typing => TYPING_ID,
        }
    }

    pub fn sender(&self) -> Sender {
        match self {
            Entry::Message(message) => message.sender,
            Entry::Typing => Sender::Bot,
        }
    }
}

/// Owns the append-only message list and the typing flag
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    next_id: u64,
    typing: bool,
    latest_seq: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
            typing: false,
            latest_seq: 0,
        }
    }

    /// Start with a bot greeting, unless `greeting` is blank
    pub fn with_greeting(greeting: &str) -> Self {
        let mut conversation = Self::new();
        if !greeting.trim().is_empty() {
            conversation.push(Sender::Bot, greeting.to_string());
        }
        conversation
    }

    fn push(&mut self, sender: Sender, content: String) -> u64 {
        let id = self.next_id.max(1);
        self.next_id = id + 1;
        self.messages.push(Message {
            id,
            content,
            sender,
            timestamp: Local::now(),
        });
        id
    }

    /// Append the user's turn and mark the conversation as awaiting a reply.
    /// The caller passes non-empty, trimmed text.
    pub fn send_user_message(&mut self, text: impl Into<String>) -> RequestSeq {
        self.push(Sender::User, text.into());
        self.typing = true;
        self.latest_seq += 1;
        RequestSeq(self.latest_seq)
    }

    /// Fold a backend result into the conversation.
    ///
    /// Returns the follow-up the caller should deliver after the delay.
    /// Results for anything but the latest submission are dropped. Empty
    /// `message` or `follow_up` strings count as absent.
    pub fn receive_backend_result(
        &mut self,
        seq: RequestSeq,
        payload: BackendPayload,
    ) -> Option<FollowUp> {
        if !self.is_current(seq) {
            debug!(?seq, latest = self.latest_seq, "discarding stale backend result");
            return None;
        }

        self.typing = false;
        if let Some(message) = payload.message.filter(|m| !m.is_empty()) {
            self.push(Sender::Bot, message);
        }
        payload
            .follow_up
            .filter(|f| !f.is_empty())
            .map(|content| FollowUp { seq, content })
    }

    /// Append a delayed follow-up. Its result was already accepted, so a
    /// newer submission does not cancel it.
    pub fn receive_follow_up(&mut self, follow_up: FollowUp) -> u64 {
        if !self.is_current(follow_up.seq) {
            debug!(seq = ?follow_up.seq, latest = self.latest_seq, "delivering follow-up after a newer submission");
        }
        self.push(Sender::Bot, follow_up.content)
    }

    /// Append a bot turn produced locally (help text and the like)
    pub fn append_bot_message(&mut self, text: impl Into<String>) -> u64 {
        self.push(Sender::Bot, text.into())
    }

    fn is_current(&self, seq: RequestSeq) -> bool {
        seq.0 == self.latest_seq
    }

    /// All messages in insertion order, then the typing entry when active.
    /// The iterator is lazy and can be cloned to walk it again.
    pub fn entries(&self) -> impl Iterator<Item = Entry<'_>> + Clone + '_ {
        self.messages
            .iter()
            .map(Entry::Message)
            .chain(self.typing.then_some(Entry::Typing))
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn latest_seq(&self) -> RequestSeq {
        RequestSeq(self.latest_seq)
    }
}
