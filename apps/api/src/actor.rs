//! Acting user extractor.
//!
//! Authentication happens upstream; the gateway forwards the signed-in
//! user in `X-Acting-User`. Requests without it are still served and the
//! sale is recorded without a `recordedBy`.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

pub const ACTING_USER_HEADER: &str = "x-acting-user";

/// The user on whose behalf the request runs, if known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Actor(pub Option<String>);

impl Actor {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .headers
            .get(ACTING_USER_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string);
        Ok(Actor(user))
    }
}
