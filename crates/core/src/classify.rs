//! Classification of condensed records.

use regex::Regex;
use std::sync::LazyLock;

use crate::key::extract_key;

static REACTED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Reacted to "(.*?)" with (.)"#).unwrap());
static REMOVED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"Removed a (.).* reaction from "(.*?)""#).unwrap());
static BARE_REMOVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("{}(.)", BARE_REMOVE_MARKER)).unwrap());
static BARE_ADD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("{}(.)", BARE_ADD_MARKER)).unwrap());

/// Marker for private messages, which take no part in the public threads.
pub const DIRECT_MESSAGE_MARKER: &str = "(Direct Message)";

// Bare reactions are the whole message body, so the marker must follow the
// header's `:` directly. A sender name or a sentence containing "add " does
// not count.
const BARE_REMOVE_MARKER: &str = ": remove ";
const BARE_ADD_MARKER: &str = ": add ";

/// Record categories, in the order they are tested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordCategory {
    DirectMessage,
    ReactionAdd,
    ReactionRemove,
    BareRemove,
    BareAdd,
    Reply,
    NewMessage,
}

impl RecordCategory {
    /// Pick the category of a record; the first matching marker wins.
    pub fn of(record: &str) -> Self {
        if record.contains(DIRECT_MESSAGE_MARKER) {
            Self::DirectMessage
        } else if record.contains("Reacted to ") {
            Self::ReactionAdd
        } else if record.contains("Removed a ") {
            Self::ReactionRemove
        } else if record.contains(BARE_REMOVE_MARKER) {
            Self::BareRemove
        } else if record.contains(BARE_ADD_MARKER) {
            Self::BareAdd
        } else if record.contains("Replying to ") {
            Self::Reply
        } else {
            Self::NewMessage
        }
    }
}

/// Whether a reaction adds or takes away an emoji.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmojiChange {
    Add,
    Remove,
}

/// Which message a reaction applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReactionTarget {
    /// The message registered under this key.
    Key(String),
    /// The most recently created message.
    Last,
}

/// A classified record with everything needed to apply it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    DirectMessage,
    Reaction {
        target: ReactionTarget,
        emoji: String,
        change: EmojiChange,
    },
    Reply {
        key: String,
    },
    NewMessage,
    /// A reaction whose emoji or quote could not be captured.
    Unreadable(RecordCategory),
}

/// Classify a condensed record.
pub fn classify(record: &str) -> Record {
    let category = RecordCategory::of(record);
    let reaction = match category {
        RecordCategory::DirectMessage => return Record::DirectMessage,
        RecordCategory::Reply => {
            return Record::Reply {
                key: extract_key(record),
            }
        }
        RecordCategory::NewMessage => return Record::NewMessage,
        RecordCategory::ReactionAdd => capture(&REACTED_RE, record, 2).map(|emoji| Record::Reaction {
            target: ReactionTarget::Key(extract_key(record)),
            emoji,
            change: EmojiChange::Add,
        }),
        RecordCategory::ReactionRemove => {
            capture(&REMOVED_RE, record, 1).map(|emoji| Record::Reaction {
                target: ReactionTarget::Key(extract_key(record)),
                emoji,
                change: EmojiChange::Remove,
            })
        }
        RecordCategory::BareRemove => capture(&BARE_REMOVE_RE, record, 1).map(|emoji| Record::Reaction {
            target: ReactionTarget::Last,
            emoji,
            change: EmojiChange::Remove,
        }),
        RecordCategory::BareAdd => capture(&BARE_ADD_RE, record, 1).map(|emoji| Record::Reaction {
            target: ReactionTarget::Last,
            emoji,
            change: EmojiChange::Add,
        }),
    };
    reaction.unwrap_or(Record::Unreadable(category))
}

fn capture(re: &Regex, text: &str, group: usize) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(group))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reaction(target: ReactionTarget, emoji: &str, change: EmojiChange) -> Record {
        Record::Reaction {
            target,
            emoji: emoji.to_string(),
            change,
        }
    }

    #[test]
    fn test_direct_message_wins() {
        let record = "10:09:00 From John Doe to Open Mike(Direct Message): Please add me";
        assert_eq!(classify(record), Record::DirectMessage);
    }

    #[test]
    fn test_contextual_reactions() {
        let record = r#"10:04:00 From Charlie to Everyone: Reacted to "Good morning folks" with 👋"#;
        assert_eq!(
            classify(record),
            reaction(ReactionTarget::Key("Good morning folks".into()), "👋", EmojiChange::Add)
        );

        let record = r#"10:06:00 From Alice to Everyone: Removed a 🍪 reaction from "Good morning folks""#;
        assert_eq!(
            classify(record),
            reaction(ReactionTarget::Key("Good morning folks".into()), "🍪", EmojiChange::Remove)
        );
    }

    #[test]
    fn test_bare_reactions() {
        assert_eq!(
            classify("10:05:00 From Evan to Everyone: add 💯"),
            reaction(ReactionTarget::Last, "💯", EmojiChange::Add)
        );
        assert_eq!(
            classify("10:06:00 From Frank to Everyone: remove ☝️"),
            reaction(ReactionTarget::Last, "☝", EmojiChange::Remove)
        );
    }

    #[test]
    fn test_emoji_is_single_scalar() {
        // Skin tone modifiers fold into the base symbol
        assert_eq!(
            classify("10:04:30 From Frank to Everyone: add 👍🏻"),
            reaction(ReactionTarget::Last, "👍", EmojiChange::Add)
        );
    }

    #[test]
    fn test_remove_checked_before_add() {
        assert_eq!(
            RecordCategory::of("10:06:00 From Frank to Everyone: add x: remove 👍"),
            RecordCategory::BareRemove
        );
    }

    #[test]
    fn test_add_in_sender_name_is_a_message() {
        let record = "10:02:00 From Chadd Lee to Everyone: Hello team";
        assert_eq!(RecordCategory::of(record), RecordCategory::NewMessage);
        assert_eq!(classify(record), Record::NewMessage);
    }

    #[test]
    fn test_add_inside_sentence_is_a_message() {
        let record = "10:03:00 From Ann to Everyone: Please add me to the invite";
        assert_eq!(classify(record), Record::NewMessage);

        let record = "10:04:00 From Bob to Everyone: Can you remove the old link?";
        assert_eq!(classify(record), Record::NewMessage);
    }

    #[test]
    fn test_bare_reaction_from_matching_sender() {
        assert_eq!(
            classify("10:05:00 From Chadd Lee to Everyone: add 👍"),
            reaction(ReactionTarget::Last, "👍", EmojiChange::Add)
        );
    }

    #[test]
    fn test_reply_and_new_message() {
        let record = r#"10:02:00 From Alice to Everyone: Replying to "Good morning folks" Hi John"#;
        assert_eq!(
            classify(record),
            Record::Reply {
                key: "Good morning folks".into()
            }
        );
        assert_eq!(
            classify("10:01:00 From John Doe to Everyone: Good morning folks"),
            Record::NewMessage
        );
    }

    #[test]
    fn test_unreadable_reaction() {
        assert_eq!(
            classify(r#"10:04:00 From Charlie to Everyone: Reacted to "Good morning folks""#),
            Record::Unreadable(RecordCategory::ReactionAdd)
        );
    }
}
