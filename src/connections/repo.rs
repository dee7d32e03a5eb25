use crate::models::{Connection, ConnectionStatus};

/// Pending request sent by `from` to `to`, in exactly that direction.
pub(crate) fn pending_position(conns: &[Connection], from: &str, to: &str) -> Option<usize> {
    conns.iter().position(|c| {
        c.user_id1 == from && c.user_id2 == to && c.status == ConnectionStatus::Pending
    })
}

pub(crate) fn accepted_position(conns: &[Connection], a: &str, b: &str) -> Option<usize> {
    conns
        .iter()
        .position(|c| c.links(a, b) && c.status == ConnectionStatus::Accepted)
}
