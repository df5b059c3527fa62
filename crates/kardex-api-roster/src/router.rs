//! Router and state for the roster import API.

use axum::{routing::post, Extension, Router};
use std::sync::Arc;

use kardex_db::RosterStore;

use crate::handlers;
use crate::invite::InviteSender;

/// Shared state for roster routes.
#[derive(Clone)]
pub struct RosterState {
    /// Datastore boundary.
    pub store: Arc<dyn RosterStore>,
    /// Invitation provider boundary.
    pub invite_sender: Arc<dyn InviteSender>,
}

impl RosterState {
    /// Create a new `RosterState`.
    pub fn new(store: Arc<dyn RosterStore>, invite_sender: Arc<dyn InviteSender>) -> Self {
        Self {
            store,
            invite_sender,
        }
    }
}

/// Create the roster router.
///
/// Routes:
/// - POST /admin/students/import — roster upload
pub fn roster_router(state: RosterState) -> Router {
    Router::new()
        .route("/admin/students/import", post(handlers::roster::import_roster))
        .layer(Extension(state.store.clone()))
        .layer(Extension(state.invite_sender.clone()))
}
