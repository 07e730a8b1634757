use std::fmt;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tolk_config::pipeline::PipelineConfig;
use uuid::Uuid;

use crate::chunker::chunk;
use crate::resolver::BatchResolver;
use crate::transport::Transport;

/// One page translation job: a tab and the snapshot of its text content
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub tab_id: i64,
    pub snapshot_id: String,
}

impl SessionKey {
    pub fn new(tab_id: i64, snapshot_id: impl Into<String>) -> Self {
        Self {
            tab_id,
            snapshot_id: snapshot_id.into(),
        }
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab {}/{}", self.tab_id, self.snapshot_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLimits {
    pub max_chars: usize,
    pub max_items_per_chunk: usize,
    pub chunks_per_pass: usize,
}

impl PageLimits {
    pub fn from_pipeline(pipeline: &PipelineConfig) -> Self {
        Self {
            max_chars: pipeline.max_chars,
            max_items_per_chunk: pipeline.max_items_per_chunk,
            chunks_per_pass: pipeline.chunks_per_pass,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Pending,
    Paused,
    Completed,
    Canceled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub remaining_chunks: usize,
    pub processed_items: usize,
    pub total_items: usize,
}

/// Resumable state of one page translation
pub struct Session {
    pub key: SessionKey,
    /// Distinguishes this session from a later one started under the same key
    pub run_id: Uuid,
    chunks: Vec<Vec<String>>,
    next_index: usize,
    offset: usize,
    total_items: usize,
    chunks_per_pass: usize,
    canceled: bool,
    resolver: BatchResolver,
}

impl Session {
    pub fn new(
        key: SessionKey,
        fragments: Vec<String>,
        resolver: BatchResolver,
        limits: PageLimits,
    ) -> Self {
        let total_items = fragments.len();
        let chunks = chunk(
            fragments,
            limits.max_chars,
            limits.max_items_per_chunk,
            resolver.options().separator_len(),
        );

        tracing::debug!("{} fragments of {} split into {} chunks", total_items, key, chunks.len());

        Self {
            key,
            run_id: Uuid::new_v4(),
            chunks,
            next_index: 0,
            offset: 0,
            total_items,
            chunks_per_pass: limits.chunks_per_pass.max(1),
            canceled: false,
            resolver,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.canceled {
            SessionState::Canceled
        } else if self.next_index >= self.chunks.len() {
            SessionState::Completed
        } else if self.next_index == 0 {
            SessionState::Pending
        } else {
            SessionState::Paused
        }
    }

    pub fn progress(&self) -> Progress {
        Progress {
            remaining_chunks: self.chunks.len() - self.next_index,
            processed_items: self.offset,
            total_items: self.total_items,
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn mark_canceled(&mut self) {
        self.canceled = true;
    }

    /// Resolve up to `chunks_per_pass` chunks in order, pushing each to the transport.
    ///
    /// Cancellation is checked before each chunk. A chunk already in flight completes, but its
    /// result is dropped once the token has fired so a replaced or canceled session never
    /// writes to the page again.
    pub async fn run_pass(&mut self, cancel: &CancellationToken, transport: &dyn Transport) -> SessionState {
        let delay = self.resolver.options().delay;
        let mut processed = 0;

        while processed < self.chunks_per_pass && self.next_index < self.chunks.len() {
            if cancel.is_cancelled() {
                tracing::info!("{} canceled at chunk {}", self.key, self.next_index);
                self.canceled = true;
                break;
            }

            let translations = self.resolver.resolve(&self.chunks[self.next_index]).await;
            if cancel.is_cancelled() {
                tracing::info!("{} canceled during chunk {}, result dropped", self.key, self.next_index);
                self.canceled = true;
                break;
            }
            let resolved = translations.len();

            transport.apply_chunk(&self.key, self.offset, translations).await;

            self.offset += resolved;
            self.next_index += 1;
            processed += 1;

            let more_this_pass = processed < self.chunks_per_pass && self.next_index < self.chunks.len();
            if more_this_pass && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }

        tracing::debug!(
            "{} pass done: {} chunks, {}/{} items",
            self.key,
            processed,
            self.offset,
            self.total_items
        );

        self.state()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::resolver::ResolverOptions;
    use crate::testing::{EchoTranslator, GateTranslator, RecordingTransport, TransportEvent};

    fn session(fragments: usize, limits: PageLimits) -> Session {
        paced_session(fragments, limits, Duration::ZERO)
    }

    fn paced_session(fragments: usize, limits: PageLimits, delay: Duration) -> Session {
        let resolver = BatchResolver::new(
            Arc::new(EchoTranslator::default()),
            ResolverOptions {
                delay,
                ..Default::default()
            },
        );
        let fragments = (0..fragments).map(|i| format!("item {i}")).collect();
        Session::new(SessionKey::new(7, "snap"), fragments, resolver, limits)
    }

    fn limits(items_per_chunk: usize, chunks_per_pass: usize) -> PageLimits {
        PageLimits {
            max_chars: 10_000,
            max_items_per_chunk: items_per_chunk,
            chunks_per_pass,
        }
    }

    #[tokio::test]
    async fn pass_advances_offsets_in_order() {
        let mut session = session(7, limits(2, 3));
        let transport = RecordingTransport::default();
        assert_eq!(session.state(), SessionState::Pending);
        assert_eq!(session.chunk_count(), 4);

        let state = session.run_pass(&CancellationToken::new(), &transport).await;

        assert_eq!(state, SessionState::Paused);
        assert_eq!(transport.offsets(), vec![0, 2, 4]);
        assert_eq!(
            session.progress(),
            Progress {
                remaining_chunks: 1,
                processed_items: 6,
                total_items: 7
            }
        );

        let state = session.run_pass(&CancellationToken::new(), &transport).await;
        assert_eq!(state, SessionState::Completed);
        assert_eq!(transport.offsets(), vec![0, 2, 4, 6]);

        match transport.events().last() {
            Some(TransportEvent::Apply { translations, .. }) => {
                assert_eq!(translations, &vec!["ITEM 6".to_string()]);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn canceled_token_stops_before_next_chunk() {
        let mut session = session(4, limits(1, 10));
        let transport = RecordingTransport::default();
        let cancel = CancellationToken::new();
        cancel.cancel();

        assert_eq!(session.run_pass(&cancel, &transport).await, SessionState::Canceled);
        assert!(transport.events().is_empty());
    }

    #[tokio::test]
    async fn chunk_canceled_in_flight_is_not_applied() {
        let gate = Arc::new(GateTranslator::default());
        let resolver = BatchResolver::new(
            gate.clone(),
            ResolverOptions {
                delay: Duration::ZERO,
                ..Default::default()
            },
        );
        let mut session = Session::new(SessionKey::new(7, "snap"), vec!["old".to_string()], resolver, limits(1, 5));
        let transport = RecordingTransport::default();
        let cancel = CancellationToken::new();

        let control = async {
            gate.entered.notified().await;
            cancel.cancel();
            gate.release.notify_one();
        };
        let (state, ()) = tokio::join!(session.run_pass(&cancel, &transport), control);

        assert_eq!(state, SessionState::Canceled);
        assert!(transport.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn chunks_in_a_pass_are_paced() {
        let delay = Duration::from_millis(100);
        let mut session = paced_session(3, limits(1, 3), delay);
        let transport = RecordingTransport::default();

        let start = tokio::time::Instant::now();
        session.run_pass(&CancellationToken::new(), &transport).await;

        assert_eq!(transport.offsets(), vec![0, 1, 2]);
        let elapsed = start.elapsed();
        assert!(elapsed >= delay * 2 && elapsed < delay * 3, "elapsed {elapsed:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn no_pause_after_last_chunk_of_pass() {
        let delay = Duration::from_millis(100);
        let mut session = paced_session(4, limits(1, 2), delay);
        let transport = RecordingTransport::default();

        let start = tokio::time::Instant::now();
        assert_eq!(
            session.run_pass(&CancellationToken::new(), &transport).await,
            SessionState::Paused
        );
        let elapsed = start.elapsed();
        assert!(elapsed >= delay && elapsed < delay * 2, "elapsed {elapsed:?}");
    }

    #[tokio::test]
    async fn empty_page_is_complete_immediately() {
        let mut session = session(0, limits(5, 5));
        assert_eq!(session.chunk_count(), 0);
        assert_eq!(session.state(), SessionState::Completed);

        let transport = RecordingTransport::default();
        assert_eq!(
            session.run_pass(&CancellationToken::new(), &transport).await,
            SessionState::Completed
        );
    }

    #[test]
    fn zero_chunks_per_pass_still_progresses() {
        let session = session(3, limits(1, 0));
        assert_eq!(session.chunks_per_pass, 1);
    }
}
