//! Thread builder that folds classified records into a message tree.

use std::collections::HashMap;

use serde::Serialize;

use crate::classify::{classify, EmojiChange, ReactionTarget, Record};
use crate::error::{ParseFault, ParseFaultKind};
use crate::helpers::split_header;
use crate::key::{extract_key, reply_body};
use crate::message::Message;

/// How much the builder reports about each record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Only dropped records and parse faults are logged.
    #[default]
    Normal,
    /// Every record is logged with its classification.
    Trace,
}

/// Configuration for the ThreadBuilder.
#[derive(Debug, Clone, Default)]
pub struct ThreadBuilderConfig {
    pub verbosity: Verbosity,
}

/// Counters collected while building threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ThreadStats {
    pub records: usize,
    pub messages: usize,
    pub replies: usize,
    pub reactions: usize,
    pub direct_messages: usize,
    pub dropped: usize,
}

/// The finished threads of one transcript.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ThreadOutput {
    pub messages: Vec<Message>,
    pub faults: Vec<ParseFault>,
    pub stats: ThreadStats,
}

/// Handle to a message owned by the top-level list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MessageRef {
    TopLevel(usize),
    Reply { parent: usize, index: usize },
}

/// Rebuilds reply threads and emoji tallies from records, one at a time.
///
/// Records must be fed in transcript order: bare reactions apply to whatever
/// message was created last.
///
/// Both registries are last-write-wins. When two messages produce the same
/// key, later replies and reactions resolve to the newer one; anything
/// already attached to the older one stays where it is.
pub struct ThreadBuilder {
    config: ThreadBuilderConfig,
    messages: Vec<Message>,
    // Key -> top-level message, for replies
    top_level_by_key: HashMap<String, usize>,
    // Key -> any message, for contextual reactions
    all_by_key: HashMap<String, MessageRef>,
    last_message: Option<MessageRef>,
    faults: Vec<ParseFault>,
    stats: ThreadStats,
}

impl ThreadBuilder {
    pub fn new(config: ThreadBuilderConfig) -> Self {
        Self {
            config,
            messages: Vec::new(),
            top_level_by_key: HashMap::new(),
            all_by_key: HashMap::new(),
            last_message: None,
            faults: Vec::new(),
            stats: ThreadStats::default(),
        }
    }

    /// Top-level messages built so far.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Faults recorded so far.
    pub fn faults(&self) -> &[ParseFault] {
        &self.faults
    }

    /// Apply every record in order.
    pub fn process_records<I, S>(&mut self, records: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for record in records {
            self.process_record(record.as_ref());
        }
    }

    /// Apply one condensed record.
    pub fn process_record(&mut self, record: &str) {
        let position = self.stats.records;
        self.stats.records += 1;

        let record = record.trim();
        let classified = classify(record);
        if self.config.verbosity == Verbosity::Trace {
            tracing::trace!(position, ?classified, record, "classified record");
        }

        match classified {
            Record::DirectMessage => {
                self.stats.direct_messages += 1;
            }
            Record::NewMessage => self.handle_new_message(position, record),
            Record::Reply { key } => self.handle_reply(position, record, key),
            Record::Reaction {
                target,
                emoji,
                change,
            } => self.handle_reaction(position, target, &emoji, change),
            Record::Unreadable(category) => {
                tracing::debug!(position, ?category, record, "could not read reaction");
                self.stats.dropped += 1;
            }
        }
    }

    /// Finish the run and hand back the threads.
    pub fn finish(self) -> ThreadOutput {
        ThreadOutput {
            messages: self.messages,
            faults: self.faults,
            stats: self.stats,
        }
    }

    fn handle_new_message(&mut self, position: usize, record: &str) {
        let header = match split_header(record) {
            Ok(header) => header,
            Err(kind) => return self.record_fault(position, record, kind),
        };

        let key = extract_key(record);
        let index = self.messages.len();
        self.messages
            .push(Message::new(header.timestamp, header.name, header.content));

        self.top_level_by_key.insert(key.clone(), index);
        self.all_by_key.insert(key, MessageRef::TopLevel(index));
        self.last_message = Some(MessageRef::TopLevel(index));
        self.stats.messages += 1;
    }

    fn handle_reply(&mut self, position: usize, record: &str, key: String) {
        let Some(&parent) = self.top_level_by_key.get(&key) else {
            tracing::debug!(position, %key, "reply target not found");
            self.stats.dropped += 1;
            return;
        };

        let header = match split_header(record) {
            Ok(header) => header,
            Err(kind) => return self.record_fault(position, record, kind),
        };
        let Some(body) = reply_body(header.content) else {
            return self.record_fault(position, record, ParseFaultKind::MissingReplyBody);
        };

        let replies = &mut self.messages[parent].replies;
        replies.push(Message::new(header.timestamp, header.name, body));
        let reply = MessageRef::Reply {
            parent,
            index: replies.len() - 1,
        };

        self.all_by_key.insert(extract_key(body), reply);
        self.last_message = Some(reply);
        self.stats.replies += 1;
    }

    fn handle_reaction(
        &mut self,
        position: usize,
        target: ReactionTarget,
        emoji: &str,
        change: EmojiChange,
    ) {
        let resolved = match &target {
            ReactionTarget::Key(key) => self.all_by_key.get(key).copied(),
            ReactionTarget::Last => self.last_message,
        };
        let Some(resolved) = resolved else {
            tracing::debug!(position, ?target, emoji, "reaction target not found");
            self.stats.dropped += 1;
            return;
        };

        let message = self.message_mut(resolved);
        match change {
            EmojiChange::Add => message.emojis.add(emoji),
            EmojiChange::Remove => {
                if !message.emojis.remove(emoji) {
                    tracing::debug!(position, emoji, "no reaction to remove");
                    self.stats.dropped += 1;
                    return;
                }
            }
        }
        self.stats.reactions += 1;
    }

    fn message_mut(&mut self, r: MessageRef) -> &mut Message {
        match r {
            MessageRef::TopLevel(index) => &mut self.messages[index],
            MessageRef::Reply { parent, index } => &mut self.messages[parent].replies[index],
        }
    }

    fn record_fault(&mut self, position: usize, record: &str, kind: ParseFaultKind) {
        let fault = ParseFault {
            position,
            kind,
            record: record.to_string(),
        };
        tracing::warn!(%fault, record, "skipping malformed record");
        self.faults.push(fault);
    }
}

/// Build threads for a whole transcript of condensed records.
pub fn build_threads<I, S>(records: I, config: ThreadBuilderConfig) -> ThreadOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut builder = ThreadBuilder::new(config);
    builder.process_records(records);
    builder.finish()
}
