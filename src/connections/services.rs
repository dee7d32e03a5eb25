use time::OffsetDateTime;
use tracing::{info, warn};

use crate::connections::repo;
use crate::error::{ServiceError, ServiceResult};
use crate::latency::Op;
use crate::models::{Ack, Connection, ConnectionStatus};
use crate::state::AppState;

pub async fn get_all(st: &AppState) -> ServiceResult<Vec<Connection>> {
    st.pause(Op::ConnectionsGetAll).await;
    Ok(st.store.connections.read().await.clone())
}

/// Accepted connections with `user_id` on either side.
pub async fn get_by_user_id(st: &AppState, user_id: &str) -> ServiceResult<Vec<Connection>> {
    st.pause(Op::ConnectionsByUser).await;
    Ok(st
        .store
        .connections
        .read()
        .await
        .iter()
        .filter(|c| c.status == ConnectionStatus::Accepted && c.involves(user_id))
        .cloned()
        .collect())
}

/// Pending requests addressed to `user_id`.
pub async fn get_pending_requests(st: &AppState, user_id: &str) -> ServiceResult<Vec<Connection>> {
    st.pause(Op::ConnectionsPending).await;
    Ok(st
        .store
        .connections
        .read()
        .await
        .iter()
        .filter(|c| c.status == ConnectionStatus::Pending && c.user_id2 == user_id)
        .cloned()
        .collect())
}

/// Fails with `Conflict` if any record already links the pair. The existence
/// check and the insert share one write guard, so concurrent requests for the
/// same pair cannot both succeed.
pub async fn send_request(
    st: &AppState,
    from: &str,
    to: &str,
    message: &str,
) -> ServiceResult<Connection> {
    st.pause(Op::ConnectionsSend).await;
    if from == to {
        warn!(user_id = from, "connection request to self");
        return Err(ServiceError::InvalidInput(
            "cannot connect with yourself".into(),
        ));
    }
    let mut conns = st.store.connections.write().await;
    if conns.iter().any(|c| c.links(from, to)) {
        warn!(from, to, "connection request already exists");
        return Err(ServiceError::Conflict(
            "Connection request already exists".into(),
        ));
    }
    let conn = Connection {
        user_id1: from.to_string(),
        user_id2: to.to_string(),
        status: ConnectionStatus::Pending,
        requested_at: OffsetDateTime::now_utc(),
        connected_at: None,
        message: message.to_string(),
    };
    conns.push(conn.clone());
    info!(from, to, "connection request sent");
    Ok(conn)
}

pub async fn accept_request(st: &AppState, from: &str, to: &str) -> ServiceResult<Connection> {
    st.pause(Op::ConnectionsAccept).await;
    let mut conns = st.store.connections.write().await;
    let i = repo::pending_position(&conns, from, to).ok_or_else(|| {
        warn!(from, to, "pending request not found");
        ServiceError::not_found("Connection request", format!("{from}->{to}"))
    })?;
    let conn = &mut conns[i];
    conn.status = ConnectionStatus::Accepted;
    conn.connected_at = Some(OffsetDateTime::now_utc());
    info!(from, to, "connection request accepted");
    Ok(conn.clone())
}

pub async fn reject_request(st: &AppState, from: &str, to: &str) -> ServiceResult<Ack> {
    st.pause(Op::ConnectionsReject).await;
    let mut conns = st.store.connections.write().await;
    let i = repo::pending_position(&conns, from, to).ok_or_else(|| {
        warn!(from, to, "pending request not found");
        ServiceError::not_found("Connection request", format!("{from}->{to}"))
    })?;
    conns.remove(i);
    info!(from, to, "connection request rejected");
    Ok(Ack::ok())
}

/// Removes an accepted connection between `a` and `b`, either direction.
pub async fn remove_connection(st: &AppState, a: &str, b: &str) -> ServiceResult<Ack> {
    st.pause(Op::ConnectionsRemove).await;
    let mut conns = st.store.connections.write().await;
    let i = repo::accepted_position(&conns, a, b).ok_or_else(|| {
        warn!(a, b, "connection not found");
        ServiceError::not_found("Connection", format!("{a}<->{b}"))
    })?;
    conns.remove(i);
    info!(a, b, "connection removed");
    Ok(Ack::ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn involves_pair(conns: &[Connection], a: &str, b: &str) -> bool {
        conns.iter().any(|c| c.links(a, b))
    }

    #[tokio::test]
    async fn duplicate_request_conflicts_in_either_direction() {
        let st = AppState::fake();
        send_request(&st, "3", "4", "hi").await.unwrap();
        let err = send_request(&st, "3", "4", "again").await.unwrap_err();
        assert_eq!(
            err,
            ServiceError::Conflict("Connection request already exists".into())
        );
        assert!(send_request(&st, "4", "3", "reverse").await.is_err());
        // accepted fixture pair
        assert!(send_request(&st, "2", "1", "").await.is_err());
    }

    #[tokio::test]
    async fn request_to_self_is_rejected() {
        let st = AppState::fake();
        let err = send_request(&st, "3", "3", "").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert!(!get_all(&st).await.unwrap().iter().any(|c| c.links("3", "3")));
    }

    #[tokio::test]
    async fn accept_moves_pair_from_pending_to_accepted() {
        let st = AppState::fake();
        send_request(&st, "3", "4", "hi").await.unwrap();
        assert!(involves_pair(&get_pending_requests(&st, "4").await.unwrap(), "3", "4"));

        let accepted = accept_request(&st, "3", "4").await.unwrap();
        assert_eq!(accepted.status, ConnectionStatus::Accepted);
        assert!(accepted.connected_at.is_some());

        assert!(involves_pair(&get_by_user_id(&st, "3").await.unwrap(), "3", "4"));
        assert!(involves_pair(&get_by_user_id(&st, "4").await.unwrap(), "3", "4"));
        assert!(!involves_pair(&get_pending_requests(&st, "4").await.unwrap(), "3", "4"));
    }

    #[tokio::test]
    async fn accept_requires_exact_direction() {
        let st = AppState::fake();
        // fixture: 4 -> 1 pending
        let err = accept_request(&st, "1", "4").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
        assert!(accept_request(&st, "4", "1").await.is_ok());
        // no longer pending
        assert!(accept_request(&st, "4", "1").await.is_err());
    }

    #[tokio::test]
    async fn reject_leaves_no_trace() {
        let st = AppState::fake();
        send_request(&st, "3", "5", "").await.unwrap();
        reject_request(&st, "3", "5").await.unwrap();

        assert!(!involves_pair(&get_pending_requests(&st, "5").await.unwrap(), "3", "5"));
        assert!(!involves_pair(&get_by_user_id(&st, "3").await.unwrap(), "3", "5"));
        assert!(!involves_pair(&get_all(&st).await.unwrap(), "3", "5"));
        assert!(reject_request(&st, "3", "5").await.is_err());
        // a fresh request is allowed again
        assert!(send_request(&st, "5", "3", "").await.is_ok());
    }

    #[tokio::test]
    async fn remove_requires_accepted_connection() {
        let st = AppState::fake();
        // pending only
        assert!(remove_connection(&st, "1", "4").await.is_err());
        // accepted fixture stored as 3 -> 1
        remove_connection(&st, "1", "3").await.unwrap();
        assert!(!involves_pair(&get_by_user_id(&st, "1").await.unwrap(), "1", "3"));
        assert!(remove_connection(&st, "1", "3").await.is_err());
    }

    #[tokio::test]
    async fn concurrent_requests_for_same_pair_admit_one() {
        let st = AppState::fake();
        let (a, b) = tokio::join!(
            send_request(&st, "4", "6", "first"),
            send_request(&st, "6", "4", "second")
        );
        assert!(a.is_ok() ^ b.is_ok());
        let count = get_all(&st)
            .await
            .unwrap()
            .iter()
            .filter(|c| c.links("4", "6"))
            .count();
        assert_eq!(count, 1);
    }
}
