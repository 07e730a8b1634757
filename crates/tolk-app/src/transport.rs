use async_trait::async_trait;
use kanal::AsyncSender;
use tolk_core::{Progress, SessionKey, Transport};
use tolk_types::Message;

/// Pushes page results to the output writer as protocol messages
pub struct ChannelTransport {
    message_tx: AsyncSender<Message>,
}

impl ChannelTransport {
    pub fn new(message_tx: AsyncSender<Message>) -> Self {
        Self { message_tx }
    }

    async fn send(&self, message: Message) {
        if let Err(e) = self.message_tx.send(message).await {
            tracing::error!("Failed to queue message for the extension: {}", e);
        }
    }
}

#[async_trait]
impl Transport for ChannelTransport {
    async fn apply_chunk(&self, key: &SessionKey, offset: usize, translations: Vec<String>) {
        tracing::debug!("{}: applying {} translations at {}", key, translations.len(), offset);
        self.send(Message::apply_chunk(key, offset, translations)).await;
    }

    async fn show_progress(&self, key: &SessionKey, progress: Progress) {
        self.send(Message::show_progress(key, progress)).await;
    }

    async fn hide_progress(&self, key: &SessionKey) {
        self.send(Message::hide_progress(key)).await;
    }
}
