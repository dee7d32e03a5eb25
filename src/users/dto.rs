use serde::Deserialize;

use crate::models::{Education, Experience, User};

/// Shallow profile patch: every present field replaces the stored one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub name: Option<String>,
    pub headline: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub photo_url: Option<String>,
    pub skills: Option<Vec<String>>,
    pub connections: Option<Vec<String>>,
    pub followers: Option<u32>,
    pub experience: Option<Vec<Experience>>,
    pub education: Option<Vec<Education>>,
}

impl UserPatch {
    pub(crate) fn apply_to(self, user: &mut User) {
        let UserPatch {
            name,
            headline,
            location,
            bio,
            photo_url,
            skills,
            connections,
            followers,
            experience,
            education,
        } = self;
        if let Some(v) = name {
            user.name = v;
        }
        if let Some(v) = headline {
            user.headline = v;
        }
        if let Some(v) = location {
            user.location = v;
        }
        if let Some(v) = bio {
            user.bio = v;
        }
        if let Some(v) = photo_url {
            user.photo_url = v;
        }
        if let Some(v) = skills {
            user.skills = v;
        }
        if let Some(v) = connections {
            user.connections = v;
        }
        if let Some(v) = followers {
            user.followers = v;
        }
        if let Some(v) = experience {
            user.experience = v;
        }
        if let Some(v) = education {
            user.education = v;
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

pub(crate) fn default_limit() -> usize {
    5
}
