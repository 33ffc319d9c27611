use thiserror::Error;

/// Error returned by [`StateHandle::apply_code`](crate::StateHandle::apply_code).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    /// Code queue is full (try again later or use async `apply_code`).
    #[error("control code queue full")]
    Full,

    /// Controller channel is closed (controller task stopped).
    #[error("state controller closed")]
    Closed,
}

impl ControlError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ControlError::Full => "control_full",
            ControlError::Closed => "control_closed",
        }
    }
}
