//! Plain-text rendering of reconstructed threads.

use crate::message::Message;

/// Render a top-level message followed by one indented line per reply.
pub fn render_thread(message: &Message, indent: &str) -> String {
    let mut lines = vec![message.format()];
    lines.extend(
        message
            .replies
            .iter()
            .map(|reply| format!("{}{}", indent, reply.format())),
    );
    lines.join("\n")
}

/// Render every thread of a transcript, one line per message.
pub fn render_messages(messages: &[Message], indent: &str) -> String {
    messages
        .iter()
        .map(|message| render_thread(message, indent))
        .collect::<Vec<_>>()
        .join("\n")
}
