use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct StartConversationRequest {
    pub with: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCount {
    pub count: usize,
}
