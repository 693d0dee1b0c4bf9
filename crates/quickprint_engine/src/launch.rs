use quickprint_core::AGENT_PRINT_URL;
use quickprint_logging::{payload_summary, qp_info};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchError {
    #[error("refusing to open {0}: not an agent print url")]
    NotAgentUrl(String),
    #[error("could not open the print agent: {0}")]
    Open(String),
}

/// Hands a finished print URL to the native agent.
pub trait AgentLauncher: Send + Sync {
    fn launch(&self, url: &str) -> Result<(), LaunchError>;
}

/// Opens the URL with the platform's registered scheme handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl AgentLauncher for SystemLauncher {
    fn launch(&self, url: &str) -> Result<(), LaunchError> {
        if !url.starts_with(AGENT_PRINT_URL) {
            return Err(LaunchError::NotAgentUrl(payload_summary(url)));
        }
        qp_info!("Opening agent url {}", payload_summary(url));
        open::that(url).map_err(|err| LaunchError::Open(err.to_string()))
    }
}
