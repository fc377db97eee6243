//! Session-mutating profile flows.
//!
//! Each flow dispatches `Begin`, awaits the backend, then dispatches either the
//! success action or `Failed` carrying the error message.

use crate::error::ApiError;
use crate::models::{Listing, ProfileOverlay};
use crate::services::api::ProfileApi;
use crate::services::session_bus::SessionDispatch;
use crate::state::{SessionAction, SessionOp};

/// Returns true when the stored user was replaced.
pub async fn update_profile<A, D>(
    api: &A,
    session: &mut D,
    user_id: &str,
    overlay: &ProfileOverlay,
) -> bool
where
    A: ProfileApi + ?Sized,
    D: SessionDispatch,
{
    log::debug!("updating user {} ({} fields)", user_id, overlay.len());
    session.dispatch(SessionAction::Begin(SessionOp::Update));
    match api.update_user(user_id, overlay).await {
        Ok(user) => {
            session.dispatch(SessionAction::UpdateSucceeded(user));
            true
        }
        Err(err) => {
            fail(session, SessionOp::Update, err);
            false
        }
    }
}

pub async fn delete_account<A, D>(api: &A, session: &mut D, user_id: &str) -> bool
where
    A: ProfileApi + ?Sized,
    D: SessionDispatch,
{
    log::debug!("deleting user {}", user_id);
    session.dispatch(SessionAction::Begin(SessionOp::Delete));
    match api.delete_user(user_id).await {
        Ok(confirmation) => {
            session.dispatch(SessionAction::DeleteSucceeded(confirmation));
            true
        }
        Err(err) => {
            fail(session, SessionOp::Delete, err);
            false
        }
    }
}

pub async fn sign_out<A, D>(api: &A, session: &mut D) -> bool
where
    A: ProfileApi + ?Sized,
    D: SessionDispatch,
{
    log::debug!("signing out");
    session.dispatch(SessionAction::Begin(SessionOp::SignOut));
    match api.sign_out().await {
        Ok(confirmation) => {
            session.dispatch(SessionAction::SignOutSucceeded(confirmation));
            true
        }
        Err(err) => {
            fail(session, SessionOp::SignOut, err);
            false
        }
    }
}

pub async fn fetch_listings<A>(api: &A, user_id: &str) -> Result<Vec<Listing>, ApiError>
where
    A: ProfileApi + ?Sized,
{
    log::debug!("fetching listings of {}", user_id);
    api.user_listings(user_id).await
}

fn fail<D: SessionDispatch>(session: &mut D, op: SessionOp, err: ApiError) {
    log::warn!("{:?} failed: {}", op, err);
    session.dispatch(SessionAction::Failed(op, err.message()));
}
