//! Cooperative cancellation checkpoints.

use tokio_util::sync::CancellationToken;

use super::ConvertError;

/// Fail with [`ConvertError::Cancelled`] if the token has been signalled.
pub fn checkpoint(cancel: &CancellationToken) -> Result<(), ConvertError> {
    if cancel.is_cancelled() {
        return Err(ConvertError::Cancelled);
    }
    Ok(())
}
