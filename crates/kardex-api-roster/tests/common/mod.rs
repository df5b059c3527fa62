//! Test helpers for roster pipeline tests.

use async_trait::async_trait;
use std::sync::Mutex;

use kardex_api_roster::invite::{InviteError, InviteMetadata, InviteSender};

/// Invite sender that records every dispatch and can reject addresses.
#[derive(Default)]
pub struct RecordingInviteSender {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail_for: Vec<String>,
}

impl RecordingInviteSender {
    pub fn failing_for(emails: &[&str]) -> Self {
        Self {
            fail_for: emails.iter().map(std::string::ToString::to_string).collect(),
            ..Default::default()
        }
    }

    /// Emails successfully dispatched, in completion order.
    pub fn sent_emails(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(email, _)| email.clone())
            .collect()
    }
}

#[async_trait]
impl InviteSender for RecordingInviteSender {
    async fn invite(&self, email: &str, metadata: &InviteMetadata) -> Result<(), InviteError> {
        if self.fail_for.iter().any(|f| f == email) {
            return Err(InviteError::Provider("rejected by test".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), metadata.boleta.clone()));
        Ok(())
    }
}
