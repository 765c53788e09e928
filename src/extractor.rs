use crate::auth::{load_profile, Profile, COOKIE_NAME};
use async_session::MemoryStore;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, TypedHeader},
    http::request::Parts,
    RequestPartsExt,
};
use std::convert::Infallible;

/// The visitor behind a request, signed in or not.
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    profile: Option<Profile>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.profile.is_some()
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Viewer
where
    MemoryStore: FromRef<S>,
    S: Send + Sync,
{
    // Gated pages decide what to do with anonymous visitors themselves.
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let store = MemoryStore::from_ref(state);

        let Ok(TypedHeader(cookies)) = parts.extract::<TypedHeader<headers::Cookie>>().await else {
            return Ok(Viewer::anonymous());
        };
        let Some(session_cookie) = cookies.get(COOKIE_NAME) else {
            return Ok(Viewer::anonymous());
        };

        match load_profile(&store, session_cookie).await {
            Ok(profile) => Ok(Viewer { profile }),
            Err(err) => {
                tracing::warn!("discarding unreadable session cookie: {:#}", err);
                Ok(Viewer::anonymous())
            }
        }
    }
}
