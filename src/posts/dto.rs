use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub author_id: String,
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Body of `POST /posts`; the author is the session user.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostPatch {
    pub content: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub author_id: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub content: String,
}
