use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::latency::Op;
use crate::messages::repo;
use crate::models::{generate_id, Ack, Conversation, Message};
use crate::state::AppState;

fn not_found(id: &str) -> ServiceError {
    warn!(conversation_id = %id, "conversation not found");
    ServiceError::not_found("Conversation", id)
}

/// Conversations of `user_id`, most recently active first.
pub async fn get_conversations(st: &AppState, user_id: &str) -> ServiceResult<Vec<Conversation>> {
    st.pause(Op::MessagesList).await;
    let mut convs: Vec<Conversation> = st
        .store
        .conversations
        .read()
        .await
        .iter()
        .filter(|c| c.has_participant(user_id))
        .cloned()
        .collect();
    convs.sort_by(|a, b| b.last_activity().cmp(&a.last_activity()));
    Ok(convs)
}

pub async fn get_conversation(st: &AppState, id: &str) -> ServiceResult<Conversation> {
    st.pause(Op::MessagesGet).await;
    let convs = st.store.conversations.read().await;
    repo::position(&convs, id)
        .map(|i| convs[i].clone())
        .ok_or_else(|| not_found(id))
}

/// Finds the conversation between the pair, in any participant order, or
/// starts an empty one. Both participants must differ.
pub async fn get_or_create_conversation(
    st: &AppState,
    user_a: &str,
    user_b: &str,
) -> ServiceResult<Conversation> {
    st.pause(Op::MessagesGetOrCreate).await;
    if user_a == user_b {
        warn!(user_id = user_a, "conversation with self");
        return Err(ServiceError::InvalidInput(
            "cannot start a conversation with yourself".into(),
        ));
    }
    let mut convs = st.store.conversations.write().await;
    if let Some(existing) = convs.iter().find(|c| c.is_between(user_a, user_b)) {
        debug!(conversation_id = %existing.id, "existing conversation");
        return Ok(existing.clone());
    }
    let conv = Conversation {
        id: generate_id(),
        participants: [user_a.to_string(), user_b.to_string()],
        messages: Vec::new(),
        created_at: OffsetDateTime::now_utc(),
    };
    convs.push(conv.clone());
    info!(conversation_id = %conv.id, user_a, user_b, "conversation started");
    Ok(conv)
}

pub async fn send_message(
    st: &AppState,
    conversation_id: &str,
    sender_id: &str,
    content: &str,
) -> ServiceResult<Message> {
    st.pause(Op::MessagesSend).await;
    let mut convs = st.store.conversations.write().await;
    let i = repo::position(&convs, conversation_id).ok_or_else(|| not_found(conversation_id))?;
    let message = Message {
        id: generate_id(),
        sender_id: sender_id.to_string(),
        content: content.to_string(),
        timestamp: OffsetDateTime::now_utc(),
        read: false,
    };
    convs[i].messages.push(message.clone());
    info!(conversation_id, sender_id, message_id = %message.id, "message sent");
    Ok(message)
}

/// Marks every message not sent by `user_id` as read.
pub async fn mark_as_read(
    st: &AppState,
    conversation_id: &str,
    user_id: &str,
) -> ServiceResult<Ack> {
    st.pause(Op::MessagesMarkRead).await;
    let mut convs = st.store.conversations.write().await;
    let i = repo::position(&convs, conversation_id).ok_or_else(|| not_found(conversation_id))?;
    convs[i]
        .messages
        .iter_mut()
        .filter(|m| m.sender_id != user_id)
        .for_each(|m| m.read = true);
    debug!(conversation_id, user_id, "conversation marked read");
    Ok(Ack::ok())
}

pub async fn get_unread_count(st: &AppState, user_id: &str) -> ServiceResult<usize> {
    st.pause(Op::MessagesUnread).await;
    Ok(st
        .store
        .conversations
        .read()
        .await
        .iter()
        .filter(|c| c.has_participant(user_id))
        .map(|c| repo::unread_for(c, user_id))
        .sum())
}
