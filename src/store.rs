use std::path::Path;

use anyhow::Context;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::info;

use crate::models::{Connection, Conversation, Job, Post, User};

/// Immutable seed data, parsed once at start-up.
#[derive(Debug, Clone)]
pub struct Fixtures {
    pub users: Vec<User>,
    pub jobs: Vec<Job>,
    pub posts: Vec<Post>,
    pub connections: Vec<Connection>,
    pub conversations: Vec<Conversation>,
}

impl Fixtures {
    /// Fixtures compiled into the binary.
    pub fn embedded() -> anyhow::Result<Self> {
        Ok(Self {
            users: parse("users.json", include_str!("../fixtures/users.json"))?,
            jobs: parse("jobs.json", include_str!("../fixtures/jobs.json"))?,
            posts: parse("posts.json", include_str!("../fixtures/posts.json"))?,
            connections: parse(
                "connections.json",
                include_str!("../fixtures/connections.json"),
            )?,
            conversations: parse(
                "conversations.json",
                include_str!("../fixtures/conversations.json"),
            )?,
        })
    }

    /// Reads the five collection files from `dir`.
    pub async fn from_dir(dir: &Path) -> anyhow::Result<Self> {
        Ok(Self {
            users: read(dir, "users.json").await?,
            jobs: read(dir, "jobs.json").await?,
            posts: read(dir, "posts.json").await?,
            connections: read(dir, "connections.json").await?,
            conversations: read(dir, "conversations.json").await?,
        })
    }
}

fn parse<T: DeserializeOwned>(name: &str, raw: &str) -> anyhow::Result<Vec<T>> {
    serde_json::from_str(raw).with_context(|| format!("parse fixture {}", name))
}

async fn read<T: DeserializeOwned>(dir: &Path, name: &str) -> anyhow::Result<Vec<T>> {
    let path = dir.join(name);
    let raw = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("read fixture {}", path.display()))?;
    parse(name, &raw)
}

/// Working set of every collection. Services mutate it in place; nothing is
/// written back to the fixtures.
#[derive(Debug)]
pub struct Store {
    pub users: RwLock<Vec<User>>,
    pub jobs: RwLock<Vec<Job>>,
    pub posts: RwLock<Vec<Post>>,
    pub connections: RwLock<Vec<Connection>>,
    pub conversations: RwLock<Vec<Conversation>>,
}

impl Store {
    pub fn new(fixtures: Fixtures) -> Self {
        info!(
            users = fixtures.users.len(),
            jobs = fixtures.jobs.len(),
            posts = fixtures.posts.len(),
            connections = fixtures.connections.len(),
            conversations = fixtures.conversations.len(),
            "store seeded"
        );
        Self {
            users: RwLock::new(fixtures.users),
            jobs: RwLock::new(fixtures.jobs),
            posts: RwLock::new(fixtures.posts),
            connections: RwLock::new(fixtures.connections),
            conversations: RwLock::new(fixtures.conversations),
        }
    }
}
