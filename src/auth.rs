use async_session::{MemoryStore, Session, SessionStore};
use serde::{Deserialize, Serialize};

pub const COOKIE_NAME: &str = "auth-session";

const PROFILE_KEY: &str = "profile";

/// What the identity provider leaves in the session once a player has signed
/// in. Sessions are created elsewhere; this service only reads them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Profile {
    pub handle: String,
    #[serde(default)]
    pub initial_dist: Option<u64>,
    #[serde(default)]
    pub completed_missions: Vec<String>,
}

impl Profile {
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            initial_dist: None,
            completed_missions: Vec::new(),
        }
    }
}

/// Looks up the profile behind a session cookie. Unknown or expired cookies
/// and sessions without a profile yield `None`.
pub async fn load_profile(store: &MemoryStore, cookie: &str) -> anyhow::Result<Option<Profile>> {
    let session = store.load_session(cookie.to_string()).await?;
    Ok(session.and_then(|session| session.get::<Profile>(PROFILE_KEY)))
}

/// Stores a session for `profile` and returns the cookie value that refers to it.
pub async fn store_profile(store: &MemoryStore, profile: &Profile) -> anyhow::Result<String> {
    let mut session = Session::new();
    session.insert(PROFILE_KEY, profile)?;

    store
        .store_session(session)
        .await?
        .ok_or_else(|| anyhow::anyhow!("cookie string not found"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_profile_through_store() {
        let store = MemoryStore::new();
        let profile = Profile {
            handle: "owocki".into(),
            initial_dist: Some(1_200),
            completed_missions: vec!["use".into()],
        };

        let cookie = store_profile(&store, &profile).await.unwrap();
        assert_eq!(load_profile(&store, &cookie).await.unwrap(), Some(profile));
    }

    #[tokio::test]
    async fn unknown_cookie_is_anonymous() {
        let store = MemoryStore::new();
        assert_eq!(load_profile(&store, "nope").await.unwrap(), None);
    }
}
