//! Per-request view of who is calling. Handlers never read the session
//! directly; they take a [`Caller`] or a [`SignedIn`].

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use sqlx::SqlitePool;
use tower_sessions::Session;
use tracing::debug;
use uuid::Uuid;

use crate::{AppError, AppResult, db::{self, User}};

pub const USER_ID: &str = "user_id";

/// The session plus the signed-in user, if any. A session pointing at a user
/// that no longer exists counts as signed out.
pub struct Caller {
    pub session: Session,
    pub user: Option<User>,
}

impl Caller {
    pub fn user_id(&self) -> Option<Uuid> {
        self.user.as_ref().map(|user| user.id)
    }

    pub async fn sign_in(&self, user: &User) -> AppResult<()> {
        self.session.cycle_id().await?;
        self.session.insert(USER_ID, user.id).await?;
        debug!("signed in @{}", user.username);
        Ok(())
    }

    pub async fn sign_out(&self) -> AppResult<()> {
        self.session.flush().await?;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for Caller
where
    SqlitePool: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::from(msg))?;

        let user = match session.get::<Uuid>(USER_ID).await? {
            Some(user_id) => db::users::find(&SqlitePool::from_ref(state), user_id).await?,
            None => None,
        };

        Ok(Caller { session, user })
    }
}

/// A caller that must be signed in; anyone else is sent to the login page
/// and brought back to the requested path afterwards.
pub struct SignedIn {
    pub session: Session,
    pub user: User,
}

impl<S> FromRequestParts<S> for SignedIn
where
    SqlitePool: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Caller { session, user } = Caller::from_request_parts(parts, state).await?;

        match user {
            Some(user) => Ok(SignedIn { session, user }),
            None => Err(AppError::Unauthenticated {
                return_url: parts.uri.path().to_owned(),
            }),
        }
    }
}
