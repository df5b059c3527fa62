//! Account invitation boundary.
//!
//! The pipeline consumes the invitation provider through the `InviteSender`
//! trait: one fire-and-forget call per newly committed student with an
//! email address. Metadata travels with the invitation so the provider can
//! link the account back to the student record.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use kardex_db::STUDENT_ROLE_TAG;

/// Metadata attached to an invitation for downstream account linking.
#[derive(Debug, Clone, Serialize)]
pub struct InviteMetadata {
    /// Institutional ID of the invited student.
    pub boleta: String,
    /// Group the student was registered into.
    pub group_id: Uuid,
    /// Role tag for the created account.
    pub role_tag: &'static str,
}

impl InviteMetadata {
    #[must_use]
    pub fn new(boleta: String, group_id: Uuid) -> Self {
        Self {
            boleta,
            group_id,
            role_tag: STUDENT_ROLE_TAG,
        }
    }
}

/// Invitation dispatch errors. Always non-fatal to the batch.
#[derive(Debug, Error)]
pub enum InviteError {
    /// The provider rejected the invitation.
    #[error("Invitation provider error: {0}")]
    Provider(String),

    /// The invitation call never reached the provider.
    #[error("Invitation transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Capability to request one account invitation by email.
#[async_trait]
pub trait InviteSender: Send + Sync {
    /// Request an account invitation for `email`.
    async fn invite(&self, email: &str, metadata: &InviteMetadata) -> Result<(), InviteError>;
}

/// Invitation sender backed by an external account provider's admin API.
///
/// Posts `{ email, data: { boleta, group_id, role_tag } }` with a bearer
/// token; any non-success status is reported as a provider error.
pub struct HttpInviteSender {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HttpInviteSender {
    #[must_use]
    pub fn new(endpoint: String, token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            token,
        }
    }
}

#[derive(Serialize)]
struct InviteBody<'a> {
    email: &'a str,
    data: &'a InviteMetadata,
}

#[async_trait]
impl InviteSender for HttpInviteSender {
    async fn invite(&self, email: &str, metadata: &InviteMetadata) -> Result<(), InviteError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(&InviteBody {
                email,
                data: metadata,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InviteError::Provider(format!(
                "status {status}: {body}"
            )));
        }

        Ok(())
    }
}

/// Development sender that only logs the dispatch.
///
/// Used when no invitation provider is configured, so imports still
/// complete with a visible record of what would have been sent.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogInviteSender;

#[async_trait]
impl InviteSender for LogInviteSender {
    async fn invite(&self, email: &str, metadata: &InviteMetadata) -> Result<(), InviteError> {
        tracing::info!(
            email = %email,
            boleta = %metadata.boleta,
            group_id = %metadata.group_id,
            "Invitation dispatch (log-only sender)"
        );
        Ok(())
    }
}
