//! Reconstructed chat messages.

use serde::{Serialize, Serializer};

/// Emoji counts of a message, kept in the order each emoji was first added.
///
/// Every stored count is at least 1; an emoji whose count drops to zero is
/// removed, and adding it again appends it at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmojiTally {
    entries: Vec<(String, usize)>,
}

impl EmojiTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more use of `emoji`.
    pub fn add(&mut self, emoji: &str) {
        match self.entries.iter_mut().find(|(e, _)| e == emoji) {
            Some((_, count)) => *count += 1,
            None => self.entries.push((emoji.to_string(), 1)),
        }
    }

    /// Take back one use of `emoji`. Returns false if it was not present.
    pub fn remove(&mut self, emoji: &str) -> bool {
        let Some(idx) = self.entries.iter().position(|(e, _)| e == emoji) else {
            return false;
        };
        if self.entries[idx].1 > 1 {
            self.entries[idx].1 -= 1;
        } else {
            self.entries.remove(idx);
        }
        true
    }

    pub fn get(&self, emoji: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|(e, _)| e == emoji)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(e, count)| (e.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Serialized as a JSON object in first-added order.
impl Serialize for EmojiTally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// A top-level message or a reply.
///
/// Replies never carry replies of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub timestamp: String,
    pub name: String,
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replies: Vec<Message>,
    pub emojis: EmojiTally,
}

impl Message {
    pub fn new(
        timestamp: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            name: name.into(),
            content: content.into(),
            replies: Vec::new(),
            emojis: EmojiTally::new(),
        }
    }

    /// Format as `<timestamp> <name>[ [<emoji>x<count>, ...]]: <content>`.
    pub fn format(&self) -> String {
        let emoji_section = if self.emojis.is_empty() {
            String::new()
        } else {
            let counts: Vec<String> = self
                .emojis
                .iter()
                .map(|(emoji, count)| format!("{}x{}", emoji, count))
                .collect();
            format!(" [{}]", counts.join(", "))
        };
        format!(
            "{} {}{}: {}",
            self.timestamp, self.name, emoji_section, self.content
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_add_and_remove() {
        let mut tally = EmojiTally::new();
        tally.add("👍");
        tally.add("👍");
        tally.add("🍪");
        assert_eq!(tally.get("👍"), Some(2));

        assert!(tally.remove("👍"));
        assert_eq!(tally.get("👍"), Some(1));
        assert!(tally.remove("👍"));
        assert_eq!(tally.get("👍"), None);
        assert_eq!(tally.len(), 1);

        // Nothing left to remove
        assert!(!tally.remove("👍"));
        assert!(!tally.remove("💯"));
    }

    #[test]
    fn test_tally_readd_goes_last() {
        let mut tally = EmojiTally::new();
        tally.add("👍");
        tally.add("🍪");
        tally.remove("👍");
        tally.add("👍");
        let order: Vec<(&str, usize)> = tally.iter().collect();
        assert_eq!(order, vec![("🍪", 1), ("👍", 1)]);
    }

    #[test]
    fn test_format() {
        let mut message = Message::new("10:01:00", "John Doe", "Good morning folks");
        assert_eq!(message.format(), "10:01:00 John Doe: Good morning folks");

        message.emojis.add("👋");
        message.emojis.add("👍");
        message.emojis.add("👍");
        assert_eq!(
            message.format(),
            "10:01:00 John Doe [👋x1, 👍x2]: Good morning folks"
        );
    }

    #[test]
    fn test_serialize() {
        let mut message = Message::new("10:01:00", "Ann", "hi");
        message.emojis.add("👍");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["emojis"]["👍"], 1);
        assert!(json.get("replies").is_none());
    }
}
