//! Runtime error types.

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("scheduler task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
