use crate::models::Conversation;

pub(crate) fn position(convs: &[Conversation], id: &str) -> Option<usize> {
    convs.iter().position(|c| c.id == id)
}

/// Unread messages in `conv` that `user_id` did not send.
pub(crate) fn unread_for(conv: &Conversation, user_id: &str) -> usize {
    conv.messages
        .iter()
        .filter(|m| m.sender_id != user_id && !m.read)
        .count()
}
