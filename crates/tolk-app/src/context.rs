use std::sync::Arc;

use kanal::AsyncSender;
use tolk_types::Message;

use crate::state::AppState;

/// Shared handles a request handler needs, cloned into each spawned request task
#[derive(Clone)]
pub struct RequestContext {
    pub state: Arc<AppState>,
    pub message_tx: AsyncSender<Message>,
}

impl RequestContext {
    pub fn new(state: Arc<AppState>, message_tx: AsyncSender<Message>) -> Self {
        Self { state, message_tx }
    }

    pub async fn reply(&self, message: Message) -> anyhow::Result<()> {
        self.message_tx.send(message).await?;
        Ok(())
    }
}
