//! Client-side view state over the services: loading status plus the
//! optimistic like, comment, connect, accept, reject and send flows.

use std::collections::HashSet;
use std::future::Future;

use time::OffsetDateTime;
use tracing::{debug, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::models::{generate_id, Comment, Connection, Conversation, Message, Post, User};
use crate::optimistic::Optimistic;
use crate::session::Session;
use crate::state::AppState;
use crate::{connections, messages, posts, users};

const SUGGESTION_LIMIT: usize = 5;
const CONNECT_MESSAGE: &str = "I would like to connect with you!";

fn provisional_id() -> String {
    format!("pending-{}", generate_id())
}

#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    Loading,
    Failed(String),
    Empty,
    Ready(T),
}

impl<T> Default for Loadable<T> {
    fn default() -> Self {
        Loadable::Loading
    }
}

impl<T> Loadable<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(v) => Some(v),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Loadable::Ready(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> Loadable<Vec<T>> {
    /// Goes through `Loading`, then lands on `Ready`, `Empty` or `Failed`.
    /// Retrying is calling `load` again.
    pub async fn load<F>(&mut self, fut: F)
    where
        F: Future<Output = ServiceResult<Vec<T>>>,
    {
        *self = Loadable::Loading;
        *self = match fut.await {
            Ok(items) if items.is_empty() => Loadable::Empty,
            Ok(items) => Loadable::Ready(items),
            Err(e) => Loadable::Failed(e.to_string()),
        };
    }

    /// Keeps matching items, dropping to `Empty` when none are left.
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        if let Loadable::Ready(items) = self {
            items.retain(keep);
            if items.is_empty() {
                *self = Loadable::Empty;
            }
        }
    }

    pub fn items(&self) -> &[T] {
        self.ready().map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeedView {
    pub posts: Loadable<Vec<Post>>,
    pub liked: HashSet<String>,
    pub notice: Option<String>,
}

impl FeedView {
    pub async fn refresh(&mut self, st: &AppState) {
        self.posts.load(posts::services::get_all(st)).await;
    }

    fn post_mut<'v>(posts: &'v mut Loadable<Vec<Post>>, id: &str) -> Option<&'v mut Post> {
        posts.ready_mut()?.iter_mut().find(|p| p.id == id)
    }

    /// A post already liked from this view is left alone.
    pub async fn like(
        &mut self,
        st: &AppState,
        session: &Session,
        post_id: &str,
    ) -> ServiceResult<()> {
        if self.liked.contains(post_id) {
            debug!(post_id, "already liked");
            return Ok(());
        }
        let op = Optimistic::begin(self, |v| {
            v.liked.insert(post_id.to_string());
            if let Some(p) = Self::post_mut(&mut v.posts, post_id) {
                p.likes = p.likes.saturating_add(1);
            }
        });
        let outcome = posts::services::like_post(st, post_id, &session.user_id).await;
        let outcome = op.settle(outcome, |v, stored| {
            if let Some(p) = Self::post_mut(&mut v.posts, post_id) {
                p.likes = stored.likes;
            }
        });
        self.finish(outcome)
    }

    pub async fn comment(
        &mut self,
        st: &AppState,
        session: &Session,
        post_id: &str,
        content: &str,
    ) -> ServiceResult<()> {
        let provisional = Comment {
            id: provisional_id(),
            author_id: session.user_id.clone(),
            content: content.to_string(),
            timestamp: OffsetDateTime::now_utc(),
        };
        let op = Optimistic::begin(self, |v| {
            if let Some(p) = Self::post_mut(&mut v.posts, post_id) {
                p.comments.push(provisional);
            }
        });
        let outcome = posts::services::add_comment(
            st,
            post_id,
            posts::dto::NewComment {
                author_id: session.user_id.clone(),
                content: content.to_string(),
            },
        )
        .await;
        let outcome = op.settle(outcome, |v, stored| {
            if let Some(p) = Self::post_mut(&mut v.posts, post_id) {
                *p = stored.clone();
            }
        });
        self.finish(outcome)
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    fn finish<T>(&mut self, outcome: ServiceResult<T>) -> ServiceResult<()> {
        outcome.map(|_| ()).map_err(|e| {
            warn!(error = %e, "feed update rolled back");
            self.notice = Some(e.to_string());
            e
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct NetworkView {
    pub suggestions: Loadable<Vec<User>>,
    pub pending: Loadable<Vec<Connection>>,
    pub notice: Option<String>,
}

impl NetworkView {
    pub async fn refresh(&mut self, st: &AppState, session: &Session) {
        self.suggestions
            .load(users::services::get_suggested(st, &session.user_id, SUGGESTION_LIMIT))
            .await;
        self.pending
            .load(connections::services::get_pending_requests(st, &session.user_id))
            .await;
    }

    /// Sends a request with the standard greeting.
    pub async fn connect(
        &mut self,
        st: &AppState,
        session: &Session,
        to: &str,
    ) -> ServiceResult<()> {
        let op = Optimistic::begin(self, |v| v.suggestions.retain(|u| u.id != to));
        let outcome =
            connections::services::send_request(st, &session.user_id, to, CONNECT_MESSAGE).await;
        let outcome = op.settle(outcome, |_, _| {});
        self.finish(outcome)
    }

    pub async fn accept(
        &mut self,
        st: &AppState,
        session: &Session,
        from: &str,
    ) -> ServiceResult<()> {
        let op = Optimistic::begin(self, |v| v.pending.retain(|c| c.user_id1 != from));
        let outcome = connections::services::accept_request(st, from, &session.user_id).await;
        let outcome = op.settle(outcome, |_, _| {});
        self.finish(outcome)
    }

    pub async fn reject(
        &mut self,
        st: &AppState,
        session: &Session,
        from: &str,
    ) -> ServiceResult<()> {
        let op = Optimistic::begin(self, |v| v.pending.retain(|c| c.user_id1 != from));
        let outcome = connections::services::reject_request(st, from, &session.user_id).await;
        let outcome = op.settle(outcome, |_, _| {});
        self.finish(outcome)
    }

    fn finish<T>(&mut self, outcome: ServiceResult<T>) -> ServiceResult<()> {
        outcome.map(|_| ()).map_err(|e| {
            warn!(error = %e, "network update rolled back");
            self.notice = Some(e.to_string());
            e
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct InboxView {
    pub conversations: Loadable<Vec<Conversation>>,
    pub active: Option<Conversation>,
    pub notice: Option<String>,
}

impl InboxView {
    pub async fn refresh(&mut self, st: &AppState, session: &Session) {
        self.conversations
            .load(messages::services::get_conversations(st, &session.user_id))
            .await;
    }

    /// Loads the thread and marks it read for the session user.
    pub async fn open(&mut self, st: &AppState, session: &Session, id: &str) -> ServiceResult<()> {
        messages::services::mark_as_read(st, id, &session.user_id).await?;
        self.active = Some(messages::services::get_conversation(st, id).await?);
        Ok(())
    }

    pub async fn send(
        &mut self,
        st: &AppState,
        session: &Session,
        content: &str,
    ) -> ServiceResult<()> {
        let conversation_id = match &self.active {
            Some(c) => c.id.clone(),
            None => return Err(ServiceError::not_found("Conversation", "active")),
        };
        let provisional = Message {
            id: provisional_id(),
            sender_id: session.user_id.clone(),
            content: content.to_string(),
            timestamp: OffsetDateTime::now_utc(),
            read: false,
        };
        let pending_id = provisional.id.clone();

        let op = Optimistic::begin(self, |v| {
            if let Some(c) = v.active.as_mut() {
                c.messages.push(provisional);
            }
        });
        let outcome =
            messages::services::send_message(st, &conversation_id, &session.user_id, content).await;
        let outcome = op.settle(outcome, |v, stored| {
            let slot = v
                .active
                .as_mut()
                .and_then(|c| c.messages.iter_mut().find(|m| m.id == pending_id));
            if let Some(m) = slot {
                *m = stored.clone();
            }
        });

        outcome.map(|_| ()).map_err(|e| {
            warn!(error = %e, conversation_id = %conversation_id, "message send rolled back");
            self.notice = Some(e.to_string());
            e
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn likes_of(view: &FeedView, id: &str) -> u32 {
        view.posts.items().iter().find(|p| p.id == id).unwrap().likes
    }

    #[tokio::test]
    async fn loadable_transitions() {
        let st = AppState::fake();
        let mut list: Loadable<Vec<Post>> = Loadable::default();
        assert_eq!(list, Loadable::Loading);

        list.load(posts::services::get_by_author(&st, "nobody")).await;
        assert_eq!(list, Loadable::Empty);

        list.load(async { Err(ServiceError::not_found("Post", "x")) }).await;
        assert_eq!(list, Loadable::Failed("Post not found".into()));

        // retry
        list.load(posts::services::get_by_author(&st, "1")).await;
        assert_eq!(list.items().len(), 2);
    }

    #[tokio::test]
    async fn like_is_optimistic_and_deduplicated_locally() {
        let st = AppState::fake();
        let me = Session::new("2");
        let mut feed = FeedView::default();
        feed.refresh(&st).await;
        let start = likes_of(&feed, "1");

        feed.like(&st, &me, "1").await.unwrap();
        assert_eq!(likes_of(&feed, "1"), start + 1);
        assert!(feed.liked.contains("1"));

        feed.like(&st, &me, "1").await.unwrap();
        assert_eq!(likes_of(&feed, "1"), start + 1);
        assert_eq!(posts::services::get_by_id(&st, "1").await.unwrap().likes, start + 1);
    }

    #[tokio::test]
    async fn like_rolls_back_when_post_is_gone() {
        let st = AppState::fake();
        let me = Session::new("2");
        let mut feed = FeedView::default();
        feed.refresh(&st).await;
        let start = likes_of(&feed, "2");
        posts::services::delete(&st, "2").await.unwrap();

        let err = feed.like(&st, &me, "2").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
        assert_eq!(likes_of(&feed, "2"), start);
        assert!(!feed.liked.contains("2"));
        assert_eq!(feed.notice.as_deref(), Some("Post not found"));

        feed.dismiss_notice();
        assert!(feed.notice.is_none());
    }

    #[tokio::test]
    async fn comment_swaps_in_stored_version() {
        let st = AppState::fake();
        let me = Session::new("3");
        let mut feed = FeedView::default();
        feed.refresh(&st).await;

        feed.comment(&st, &me, "1", "Congrats!").await.unwrap();
        let post = feed.posts.items().iter().find(|p| p.id == "1").unwrap();
        let last = post.comments.last().unwrap();
        assert_eq!(last.content, "Congrats!");
        assert!(!last.id.starts_with("pending-"));
        assert_eq!(post, &posts::services::get_by_id(&st, "1").await.unwrap());
    }

    #[tokio::test]
    async fn connect_rolls_back_on_conflict() {
        let st = AppState::fake();
        let me = Session::new("1");
        let mut net = NetworkView::default();
        net.refresh(&st, &me).await;
        let ids = |n: &NetworkView| {
            n.suggestions
                .items()
                .iter()
                .map(|u| u.id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(&net), vec!["4", "5", "6"]);

        // 4 already sent a pending request to 1
        let err = net.connect(&st, &me, "4").await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        assert_eq!(ids(&net), vec!["4", "5", "6"]);
        assert!(net.notice.is_some());

        net.connect(&st, &me, "6").await.unwrap();
        assert_eq!(ids(&net), vec!["4", "5"]);

        let sent = connections::services::get_all(&st)
            .await
            .unwrap()
            .into_iter()
            .find(|c| c.user_id1 == "1" && c.user_id2 == "6")
            .unwrap();
        assert_eq!(sent.message, "I would like to connect with you!");
    }

    #[tokio::test]
    async fn accept_and_reject_pending() {
        let st = AppState::fake();
        let me = Session::new("1");
        let mut net = NetworkView::default();
        net.refresh(&st, &me).await;
        assert_eq!(net.pending.items().len(), 2);

        net.accept(&st, &me, "4").await.unwrap();
        assert_eq!(net.pending.items().len(), 1);
        net.reject(&st, &me, "5").await.unwrap();
        assert_eq!(net.pending, Loadable::Empty);

        // already handled: rolls back to the empty list and reports
        assert!(net.reject(&st, &me, "5").await.is_err());
        assert_eq!(net.pending, Loadable::Empty);
        assert!(net.notice.is_some());
    }

    #[tokio::test]
    async fn send_replaces_provisional_message() {
        let st = AppState::fake();
        let me = Session::new("1");
        let mut inbox = InboxView::default();
        inbox.refresh(&st, &me).await;
        assert_eq!(inbox.conversations.items().len(), 2);

        inbox.open(&st, &me, "1").await.unwrap();
        inbox.send(&st, &me, "See you Thursday").await.unwrap();
        let active = inbox.active.as_ref().unwrap();
        let last = active.messages.last().unwrap();
        assert_eq!(last.content, "See you Thursday");
        assert!(!last.id.starts_with("pending-"));
        assert_eq!(active, &messages::services::get_conversation(&st, "1").await.unwrap());
    }

    #[tokio::test]
    async fn send_rolls_back_for_unknown_thread() {
        let st = AppState::fake();
        let me = Session::new("1");
        let mut inbox = InboxView::default();
        assert!(inbox.send(&st, &me, "hello").await.is_err());

        let ghost = Conversation {
            id: "ghost".into(),
            participants: ["1".into(), "9".into()],
            messages: Vec::new(),
            created_at: OffsetDateTime::now_utc(),
        };
        inbox.active = Some(ghost.clone());
        assert!(inbox.send(&st, &me, "hello").await.is_err());
        assert_eq!(inbox.active, Some(ghost));
        assert_eq!(inbox.notice.as_deref(), Some("Conversation not found"));
    }
}
