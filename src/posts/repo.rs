use crate::models::Post;

pub(crate) fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

pub(crate) fn position(posts: &[Post], id: &str) -> Option<usize> {
    posts.iter().position(|p| p.id == id)
}
