use std::future::Future;

use tokio::io::AsyncRead;

use crate::framing::{FrameError, read_frame};

/// Feed every frame from `reader` to `on_frame` in arrival order.
///
/// Returns at end of input, or early once `on_frame` yields `false`.
pub async fn listen_frames<R, F, Fut>(mut reader: R, mut on_frame: F) -> Result<(), FrameError>
where
    R: AsyncRead + Unpin,
    F: FnMut(Vec<u8>) -> Fut,
    Fut: Future<Output = bool>,
{
    while let Some(payload) = read_frame(&mut reader).await? {
        tracing::trace!("Frame received: {} bytes", payload.len());
        if !on_frame(payload).await {
            tracing::debug!("Frame listener stopped by handler");
            return Ok(());
        }
    }

    tracing::info!("Input stream closed");
    Ok(())
}
