use tracing::{debug, info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::latency::Op;
use crate::models::User;
use crate::state::AppState;
use crate::users::{dto::UserPatch, repo};

fn not_found(id: &str) -> ServiceError {
    warn!(user_id = %id, "user not found");
    ServiceError::not_found("User", id)
}

pub async fn get_all(st: &AppState) -> ServiceResult<Vec<User>> {
    st.pause(Op::UsersGetAll).await;
    Ok(st.store.users.read().await.clone())
}

pub async fn get_by_id(st: &AppState, id: &str) -> ServiceResult<User> {
    st.pause(Op::UsersGetById).await;
    let users = st.store.users.read().await;
    repo::position(&users, id)
        .map(|i| users[i].clone())
        .ok_or_else(|| not_found(id))
}

/// The first user in the collection; the fixed demo identity.
pub async fn current_user(st: &AppState) -> ServiceResult<User> {
    st.pause(Op::UsersCurrent).await;
    st.store
        .users
        .read()
        .await
        .first()
        .cloned()
        .ok_or_else(|| not_found("current"))
}

pub async fn get_connections(st: &AppState, user_id: &str) -> ServiceResult<Vec<User>> {
    st.pause(Op::UsersConnections).await;
    let users = st.store.users.read().await;
    let user = &users[repo::position(&users, user_id).ok_or_else(|| not_found(user_id))?];
    Ok(users
        .iter()
        .filter(|u| user.connections.contains(&u.id))
        .cloned()
        .collect())
}

/// Up to `limit` users that are neither `user_id` nor already connected to
/// it, in collection order.
pub async fn get_suggested(st: &AppState, user_id: &str, limit: usize) -> ServiceResult<Vec<User>> {
    st.pause(Op::UsersSuggested).await;
    let users = st.store.users.read().await;
    let user = &users[repo::position(&users, user_id).ok_or_else(|| not_found(user_id))?];
    Ok(users
        .iter()
        .filter(|u| u.id != user.id && !user.connections.contains(&u.id))
        .take(limit)
        .cloned()
        .collect())
}

pub async fn search_users(st: &AppState, query: &str) -> ServiceResult<Vec<User>> {
    st.pause(Op::UsersSearch).await;
    let needle = query.to_lowercase();
    let users = st.store.users.read().await;
    let hits: Vec<User> = users
        .iter()
        .filter(|u| repo::matches_query(u, &needle))
        .cloned()
        .collect();
    debug!(query, hits = hits.len(), "user search");
    Ok(hits)
}

pub async fn update_profile(st: &AppState, user_id: &str, patch: UserPatch) -> ServiceResult<User> {
    st.pause(Op::UsersUpdate).await;
    let mut users = st.store.users.write().await;
    let i = repo::position(&users, user_id).ok_or_else(|| not_found(user_id))?;
    patch.apply_to(&mut users[i]);
    info!(user_id, "profile updated");
    Ok(users[i].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Fixtures;

    #[tokio::test]
    async fn get_by_id_matches_fixture_entry() {
        let st = AppState::fake();
        let fixtures = Fixtures::embedded().unwrap();
        for expected in &fixtures.users {
            let got = get_by_id(&st, &expected.id).await.unwrap();
            assert_eq!(&got, expected);
        }
        let err = get_by_id(&st, "missing").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "User", .. }));
    }

    #[tokio::test]
    async fn current_user_is_first_record() {
        let st = AppState::fake();
        let all = get_all(&st).await.unwrap();
        assert_eq!(current_user(&st).await.unwrap(), all[0]);
    }

    #[tokio::test]
    async fn connections_follow_the_id_list() {
        let st = AppState::fake();
        let ids: Vec<String> = get_connections(&st, "1")
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec!["2", "3"]);
        assert!(get_connections(&st, "nope").await.is_err());
    }

    #[tokio::test]
    async fn suggestions_exclude_self_and_connections() {
        let st = AppState::fake();
        let ids: Vec<String> = get_suggested(&st, "1", 2)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec!["4", "5"]);

        let all = get_suggested(&st, "1", 100).await.unwrap();
        assert!(all.iter().all(|u| !["1", "2", "3"].contains(&u.id.as_str())));
    }

    #[tokio::test]
    async fn search_is_case_insensitive_over_name_headline_skills() {
        let st = AppState::fake();
        let by_skill: Vec<String> = search_users(&st, "rUsT")
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(by_skill, vec!["1", "6"]);

        let by_headline = search_users(&st, "devops").await.unwrap();
        assert_eq!(by_headline.len(), 1);
        assert_eq!(by_headline[0].id, "5");

        assert!(search_users(&st, "zzz-nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_profile_merges_present_fields_only() {
        let st = AppState::fake();
        let before = get_by_id(&st, "3").await.unwrap();
        let patch = UserPatch {
            headline: Some("Staff Data Scientist".into()),
            skills: Some(vec!["Rust".into()]),
            ..Default::default()
        };
        let after = update_profile(&st, "3", patch).await.unwrap();
        assert_eq!(after.headline, "Staff Data Scientist");
        assert_eq!(after.skills, vec!["Rust".to_string()]);
        assert_eq!(after.name, before.name);
        assert_eq!(get_by_id(&st, "3").await.unwrap(), after);

        let err = update_profile(&st, "missing", UserPatch::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User not found");
    }
}
