use async_trait::async_trait;

use crate::session::{Progress, SessionKey};

/// Display surface receiving incremental page results and progress controls
#[async_trait]
pub trait Transport: Send + Sync {
    /// Translations for the fragments starting at absolute position `offset`
    async fn apply_chunk(&self, key: &SessionKey, offset: usize, translations: Vec<String>);

    /// Offer continue/cancel for a paused session
    async fn show_progress(&self, key: &SessionKey, progress: Progress);

    async fn hide_progress(&self, key: &SessionKey);
}
