//! Recording billing provider.
//!
//! Captures outbound collection commands instead of calling a real
//! gateway, so tests can assert on the pause/resume traffic.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::Timestamp;
use crate::ports::{BillingProvider, ProviderCallError};

/// One recorded outbound command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    Pause {
        subscription_ref: String,
        resumes_at: Timestamp,
    },
    ExtendPause {
        subscription_ref: String,
        resumes_at: Timestamp,
    },
    Resume {
        subscription_ref: String,
    },
}

#[derive(Default)]
pub struct RecordingBillingProvider {
    commands: RwLock<Vec<ProviderCommand>>,
}

impl RecordingBillingProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn commands(&self) -> Vec<ProviderCommand> {
        self.commands.read().await.clone()
    }
}

#[async_trait]
impl BillingProvider for RecordingBillingProvider {
    async fn pause_collection(
        &self,
        subscription_ref: &str,
        resumes_at: Timestamp,
    ) -> Result<(), ProviderCallError> {
        self.commands.write().await.push(ProviderCommand::Pause {
            subscription_ref: subscription_ref.to_string(),
            resumes_at,
        });
        Ok(())
    }

    async fn extend_pause(
        &self,
        subscription_ref: &str,
        resumes_at: Timestamp,
    ) -> Result<(), ProviderCallError> {
        self.commands
            .write()
            .await
            .push(ProviderCommand::ExtendPause {
                subscription_ref: subscription_ref.to_string(),
                resumes_at,
            });
        Ok(())
    }

    async fn resume_collection(&self, subscription_ref: &str) -> Result<(), ProviderCallError> {
        self.commands.write().await.push(ProviderCommand::Resume {
            subscription_ref: subscription_ref.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_commands_in_order() {
        let provider = RecordingBillingProvider::new();
        let resumes_at = Timestamp::from_unix_secs(1_000);

        provider.pause_collection("sub_1", resumes_at).await.unwrap();
        provider.resume_collection("sub_1").await.unwrap();

        let commands = provider.commands().await;
        assert_eq!(commands.len(), 2);
        assert!(matches!(commands[0], ProviderCommand::Pause { .. }));
        assert!(matches!(commands[1], ProviderCommand::Resume { .. }));
    }
}
