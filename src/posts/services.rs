use time::OffsetDateTime;
use tracing::{info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::latency::Op;
use crate::models::{generate_id, Ack, Comment, Post};
use crate::posts::dto::{NewComment, NewPost, PostPatch};
use crate::posts::repo;
use crate::state::AppState;

fn not_found(id: &str) -> ServiceError {
    warn!(post_id = %id, "post not found");
    ServiceError::not_found("Post", id)
}

pub async fn get_all(st: &AppState) -> ServiceResult<Vec<Post>> {
    st.pause(Op::PostsGetAll).await;
    let mut posts = st.store.posts.read().await.clone();
    repo::sort_newest_first(&mut posts);
    Ok(posts)
}

pub async fn get_by_id(st: &AppState, id: &str) -> ServiceResult<Post> {
    st.pause(Op::PostsGetById).await;
    let posts = st.store.posts.read().await;
    repo::position(&posts, id)
        .map(|i| posts[i].clone())
        .ok_or_else(|| not_found(id))
}

pub async fn get_by_author(st: &AppState, author_id: &str) -> ServiceResult<Vec<Post>> {
    st.pause(Op::PostsByAuthor).await;
    let mut posts: Vec<Post> = st
        .store
        .posts
        .read()
        .await
        .iter()
        .filter(|p| p.author_id == author_id)
        .cloned()
        .collect();
    repo::sort_newest_first(&mut posts);
    Ok(posts)
}

/// New posts go to the front of the collection.
pub async fn create(st: &AppState, new_post: NewPost) -> ServiceResult<Post> {
    st.pause(Op::PostsCreate).await;
    let post = Post {
        id: generate_id(),
        author_id: new_post.author_id,
        content: new_post.content,
        timestamp: OffsetDateTime::now_utc(),
        likes: 0,
        comments: Vec::new(),
        kind: new_post.kind,
    };
    st.store.posts.write().await.insert(0, post.clone());
    info!(post_id = %post.id, author_id = %post.author_id, "post created");
    Ok(post)
}

pub async fn update(st: &AppState, id: &str, patch: PostPatch) -> ServiceResult<Post> {
    st.pause(Op::PostsUpdate).await;
    let mut posts = st.store.posts.write().await;
    let i = repo::position(&posts, id).ok_or_else(|| not_found(id))?;
    let post = &mut posts[i];
    if let Some(content) = patch.content {
        post.content = content;
    }
    if let Some(kind) = patch.kind {
        post.kind = Some(kind);
    }
    info!(post_id = %id, "post updated");
    Ok(post.clone())
}

pub async fn delete(st: &AppState, id: &str) -> ServiceResult<Ack> {
    st.pause(Op::PostsDelete).await;
    let mut posts = st.store.posts.write().await;
    let i = repo::position(&posts, id).ok_or_else(|| not_found(id))?;
    posts.remove(i);
    info!(post_id = %id, "post deleted");
    Ok(Ack::ok())
}

/// Increments the like counter. Repeated calls keep incrementing; `user_id`
/// is recorded in the log only.
pub async fn like_post(st: &AppState, post_id: &str, user_id: &str) -> ServiceResult<Post> {
    st.pause(Op::PostsLike).await;
    let mut posts = st.store.posts.write().await;
    let i = repo::position(&posts, post_id).ok_or_else(|| not_found(post_id))?;
    let post = &mut posts[i];
    post.likes = post.likes.saturating_add(1);
    info!(post_id, user_id, likes = post.likes, "post liked");
    Ok(post.clone())
}

pub async fn add_comment(st: &AppState, post_id: &str, comment: NewComment) -> ServiceResult<Post> {
    st.pause(Op::PostsComment).await;
    let mut posts = st.store.posts.write().await;
    let i = repo::position(&posts, post_id).ok_or_else(|| not_found(post_id))?;
    let post = &mut posts[i];
    post.comments.push(Comment {
        id: generate_id(),
        author_id: comment.author_id,
        content: comment.content,
        timestamp: OffsetDateTime::now_utc(),
    });
    info!(post_id, comments = post.comments.len(), "comment added");
    Ok(post.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Fixtures;

    fn new_post(content: &str) -> NewPost {
        NewPost {
            author_id: "1".into(),
            content: content.into(),
            kind: Some("update".into()),
        }
    }

    #[tokio::test]
    async fn get_all_is_newest_first() {
        let st = AppState::fake();
        let posts = get_all(&st).await.unwrap();
        assert!(posts.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        assert_eq!(posts[0].id, "3");
    }

    #[tokio::test]
    async fn get_by_id_matches_fixture_entry() {
        let st = AppState::fake();
        let fixtures = Fixtures::embedded().unwrap();
        for expected in &fixtures.posts {
            let got = get_by_id(&st, &expected.id).await.unwrap();
            assert_eq!(&got, expected);
        }
        let err = get_by_id(&st, "missing").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "Post", .. }));
    }

    #[tokio::test]
    async fn created_post_comes_first() {
        let st = AppState::fake();
        let before = get_all(&st).await.unwrap();
        let created = create(&st, new_post("hello network")).await.unwrap();
        assert_eq!(created.likes, 0);
        assert!(created.comments.is_empty());

        let after = get_all(&st).await.unwrap();
        assert_eq!(after[0], created);
        assert_eq!(&after[1..], &before[..]);
    }

    #[tokio::test]
    async fn by_author_filters_and_sorts() {
        let st = AppState::fake();
        let mine = get_by_author(&st, "1").await.unwrap();
        let ids: Vec<&str> = mine.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "5"]);
        assert!(get_by_author(&st, "nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn like_twice_increments_by_two() {
        let st = AppState::fake();
        let start = get_by_id(&st, "1").await.unwrap().likes;
        like_post(&st, "1", "1").await.unwrap();
        let post = like_post(&st, "1", "1").await.unwrap();
        assert_eq!(post.likes, start + 2);
        assert!(like_post(&st, "missing", "1").await.is_err());
    }

    #[tokio::test]
    async fn add_comment_appends() {
        let st = AppState::fake();
        let post = add_comment(
            &st,
            "1",
            NewComment {
                author_id: "3".into(),
                content: "Nice!".into(),
            },
        )
        .await
        .unwrap();
        assert_eq!(post.comments.len(), 2);
        let last = post.comments.last().unwrap();
        assert_eq!(last.author_id, "3");
        assert_eq!(last.content, "Nice!");

        let err = add_comment(
            &st,
            "missing",
            NewComment {
                author_id: "3".into(),
                content: "x".into(),
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Post not found");
    }

    #[tokio::test]
    async fn update_and_delete() {
        let st = AppState::fake();
        let patched = update(
            &st,
            "4",
            PostPatch {
                content: Some("Still hiring!".into()),
                kind: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(patched.content, "Still hiring!");
        assert_eq!(patched.likes, 64);

        assert!(delete(&st, "4").await.unwrap().success);
        assert!(get_by_id(&st, "4").await.is_err());
        assert!(delete(&st, "4").await.is_err());
        assert!(update(&st, "4", PostPatch::default()).await.is_err());
    }
}
