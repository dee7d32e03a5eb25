use crate::models::User;

pub(crate) fn position(users: &[User], id: &str) -> Option<usize> {
    users.iter().position(|u| u.id == id)
}

/// Case-insensitive match on name, headline or any skill. `needle` must
/// already be lowercase.
pub(crate) fn matches_query(user: &User, needle: &str) -> bool {
    user.name.to_lowercase().contains(needle)
        || user.headline.to_lowercase().contains(needle)
        || user.skills.iter().any(|s| s.to_lowercase().contains(needle))
}
