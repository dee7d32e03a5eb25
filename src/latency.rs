use std::time::Duration;

use async_trait::async_trait;
use tracing::trace;

/// Every service operation that waits before touching the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    UsersGetAll,
    UsersGetById,
    UsersCurrent,
    UsersConnections,
    UsersSuggested,
    UsersSearch,
    UsersUpdate,
    JobsGetAll,
    JobsGetById,
    JobsSearch,
    JobsRecommended,
    JobsApply,
    PostsGetAll,
    PostsGetById,
    PostsByAuthor,
    PostsCreate,
    PostsUpdate,
    PostsDelete,
    PostsLike,
    PostsComment,
    ConnectionsGetAll,
    ConnectionsByUser,
    ConnectionsPending,
    ConnectionsSend,
    ConnectionsAccept,
    ConnectionsReject,
    ConnectionsRemove,
    MessagesList,
    MessagesGet,
    MessagesGetOrCreate,
    MessagesSend,
    MessagesMarkRead,
    MessagesUnread,
}

impl Op {
    /// Base simulated latency in milliseconds.
    pub fn base_ms(self) -> u64 {
        use Op::*;
        match self {
            UsersCurrent | PostsLike | MessagesMarkRead => 200,
            UsersGetById | JobsGetById | PostsGetById | ConnectionsByUser | MessagesGet
            | MessagesUnread => 250,
            UsersGetAll | UsersConnections | PostsByAuthor | PostsDelete | PostsComment
            | ConnectionsGetAll | ConnectionsPending | ConnectionsReject | MessagesList
            | MessagesGetOrCreate => 300,
            UsersSuggested | JobsGetAll | ConnectionsAccept | ConnectionsRemove => 350,
            UsersSearch | JobsRecommended | PostsGetAll | PostsUpdate | ConnectionsSend
            | MessagesSend => 400,
            JobsSearch => 450,
            UsersUpdate | JobsApply | PostsCreate => 500,
        }
    }
}

#[async_trait]
pub trait Latency: Send + Sync {
    async fn pause(&self, op: Op);
}

/// Sleeps for the operation's base latency multiplied by `scale`.
#[derive(Debug, Clone)]
pub struct SimulatedLatency {
    scale: f64,
}

impl SimulatedLatency {
    pub fn new(scale: f64) -> Self {
        Self {
            scale: if scale.is_finite() && scale >= 0.0 { scale } else { 1.0 },
        }
    }

    pub fn delay_for(&self, op: Op) -> Duration {
        Duration::from_micros((op.base_ms() as f64 * self.scale * 1000.0).round() as u64)
    }
}

#[async_trait]
impl Latency for SimulatedLatency {
    async fn pause(&self, op: Op) {
        let delay = self.delay_for(op);
        trace!(?op, delay_ms = delay.as_millis() as u64, "simulated latency");
        tokio::time::sleep(delay).await;
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoLatency;

#[async_trait]
impl Latency for NoLatency {
    async fn pause(&self, _op: Op) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_scales_base_latency() {
        let half = SimulatedLatency::new(0.5);
        assert_eq!(half.delay_for(Op::JobsApply), Duration::from_millis(250));
        assert_eq!(half.delay_for(Op::PostsLike), Duration::from_millis(100));
    }

    #[test]
    fn invalid_scale_falls_back_to_one() {
        let l = SimulatedLatency::new(f64::NAN);
        assert_eq!(l.delay_for(Op::JobsSearch), Duration::from_millis(450));
    }

    #[tokio::test]
    async fn simulated_pause_sleeps() {
        let start = tokio::time::Instant::now();
        SimulatedLatency::new(0.02).pause(Op::UsersUpdate).await;
        assert!(start.elapsed() >= Duration::from_millis(10));
    }
}
