//! Invitation dispatcher.
//!
//! Fires one account invitation per committed student with an email.
//! Invitations are independent, so the calls run concurrently and
//! unordered; a failure is logged with the offending email and counted,
//! never fatal to the batch.

use futures::future::join_all;

use crate::invite::{InviteMetadata, InviteSender};
use crate::models::InvitationRequest;

/// Attempted/failed counts for one dispatch round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub sent: u32,
    pub failed: u32,
}

/// Dispatch all invitations, returning the counts.
///
/// Must only run after the batch commit confirms success; the committed
/// students stay committed regardless of what happens here.
pub async fn dispatch_invitations(
    sender: &dyn InviteSender,
    invites: &[InvitationRequest],
) -> DispatchStats {
    let calls = invites.iter().map(|invite| async move {
        let metadata = InviteMetadata::new(invite.boleta.clone(), invite.group_id);
        match sender.invite(&invite.email, &metadata).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    email = %invite.email,
                    boleta = %invite.boleta,
                    error = %e,
                    "Failed to send invitation"
                );
                false
            }
        }
    });

    let results = join_all(calls).await;

    let sent = results.iter().filter(|ok| **ok).count() as u32;
    let stats = DispatchStats {
        sent,
        failed: results.len() as u32 - sent,
    };

    if !invites.is_empty() {
        tracing::info!(sent = stats.sent, failed = stats.failed, "Invitations dispatched");
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invite::InviteError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use uuid::Uuid;

    /// Sender that records calls and fails for configured addresses.
    #[derive(Default)]
    struct RecordingSender {
        calls: AtomicU32,
        sent_to: Mutex<Vec<String>>,
        fail_for: Vec<String>,
    }

    #[async_trait]
    impl InviteSender for RecordingSender {
        async fn invite(
            &self,
            email: &str,
            _metadata: &InviteMetadata,
        ) -> Result<(), InviteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_for.iter().any(|f| f == email) {
                return Err(InviteError::Provider("rejected".to_string()));
            }
            self.sent_to.lock().unwrap().push(email.to_string());
            Ok(())
        }
    }

    fn invite(email: &str) -> InvitationRequest {
        InvitationRequest {
            email: email.to_string(),
            boleta: "B001".to_string(),
            group_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn test_dispatch_counts_sent_and_failed() {
        let sender = RecordingSender {
            fail_for: vec!["bad@example.com".to_string()],
            ..Default::default()
        };
        let invites = vec![
            invite("ana@example.com"),
            invite("bad@example.com"),
            invite("luis@example.com"),
        ];

        let stats = dispatch_invitations(&sender, &invites).await;

        assert_eq!(stats, DispatchStats { sent: 2, failed: 1 });
        assert_eq!(sender.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failures_do_not_abort_remaining_dispatches() {
        let sender = RecordingSender {
            fail_for: vec!["a@example.com".to_string(), "b@example.com".to_string()],
            ..Default::default()
        };
        let invites = vec![
            invite("a@example.com"),
            invite("b@example.com"),
            invite("c@example.com"),
        ];

        let stats = dispatch_invitations(&sender, &invites).await;

        assert_eq!(stats.failed, 2);
        assert_eq!(sender.sent_to.lock().unwrap().as_slice(), ["c@example.com"]);
    }

    #[tokio::test]
    async fn test_empty_dispatch_is_a_no_op() {
        let sender = RecordingSender::default();
        let stats = dispatch_invitations(&sender, &[]).await;
        assert_eq!(stats, DispatchStats::default());
        assert_eq!(sender.calls.load(Ordering::SeqCst), 0);
    }
}
