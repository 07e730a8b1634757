use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tolk_config::translator::TranslationSettings;
use uuid::Uuid;

use crate::error::SessionError;
use crate::factory::TranslatorFactory;
use crate::post::translate_post;
use crate::resolver::{BatchResolver, ResolverOptions};
use crate::session::{PageLimits, Progress, Session, SessionKey, SessionState};
use crate::transport::Transport;

/// Result of running (or trying to run) one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// Pass budget used up, the session waits for `resume` or `cancel`
    Paused(Progress),
    Completed { total_items: usize },
    Canceled,
    /// No session under this key; benign for late or duplicate UI signals
    NotFound,
    /// A pass for this key is already in flight
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Canceled,
    NotFound,
}

enum Slot {
    Idle(Box<Session>),
    Running {
        run_id: Uuid,
        cancel: CancellationToken,
    },
}

/// Registry of page sessions and the operations the UI drives them with.
///
/// Taking a session out of the registry is the serialization point: only the caller
/// that swapped an idle session for a running slot may advance it.
pub struct SessionManager {
    factory: Arc<dyn TranslatorFactory>,
    transport: Arc<dyn Transport>,
    options: ResolverOptions,
    sessions: Mutex<HashMap<SessionKey, Slot>>,
}

impl SessionManager {
    pub fn new(
        factory: Arc<dyn TranslatorFactory>,
        transport: Arc<dyn Transport>,
        options: ResolverOptions,
    ) -> Self {
        Self {
            factory,
            transport,
            options,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Create a session and run its first pass.
    ///
    /// An existing session under the same key is canceled and replaced.
    pub async fn start(
        &self,
        key: SessionKey,
        fragments: Vec<String>,
        settings: TranslationSettings,
        limits: PageLimits,
    ) -> Result<PassOutcome, SessionError> {
        let translator = self.factory.build(&settings)?;
        let resolver = BatchResolver::new(translator, self.options.clone());
        let session = Session::new(key.clone(), fragments, resolver, limits);

        tracing::info!(
            "Starting {}: {} chunks, {} per pass",
            key,
            session.chunk_count(),
            limits.chunks_per_pass
        );

        let cancel = CancellationToken::new();
        let previous = {
            let mut sessions = self.sessions.lock().await;
            sessions.insert(
                key.clone(),
                Slot::Running {
                    run_id: session.run_id,
                    cancel: cancel.clone(),
                },
            )
        };

        match previous {
            Some(Slot::Running { cancel, .. }) => {
                tracing::info!("Replacing in-flight session for {}", key);
                cancel.cancel();
            }
            Some(Slot::Idle(_)) => tracing::info!("Replacing paused session for {}", key),
            None => {}
        }

        Ok(self.drive(session, cancel).await)
    }

    /// Run the next pass of a paused session
    pub async fn resume(&self, key: &SessionKey) -> PassOutcome {
        let (session, cancel) = {
            let mut sessions = self.sessions.lock().await;

            let session = match sessions.remove(key) {
                None => {
                    tracing::debug!("Resume for unknown {}", key);
                    return PassOutcome::NotFound;
                }
                Some(running @ Slot::Running { .. }) => {
                    sessions.insert(key.clone(), running);
                    tracing::debug!("Resume for {} ignored, pass in flight", key);
                    return PassOutcome::Busy;
                }
                Some(Slot::Idle(session)) => session,
            };

            let cancel = CancellationToken::new();
            sessions.insert(
                key.clone(),
                Slot::Running {
                    run_id: session.run_id,
                    cancel: cancel.clone(),
                },
            );

            (*session, cancel)
        };

        self.drive(session, cancel).await
    }

    /// Remove a session and stop its in-flight pass at the next chunk boundary
    pub async fn cancel(&self, key: &SessionKey) -> CancelOutcome {
        let removed = self.sessions.lock().await.remove(key);

        match removed {
            None => {
                tracing::debug!("Cancel for unknown {}", key);
                CancelOutcome::NotFound
            }
            Some(slot) => {
                if let Slot::Running { cancel, .. } = slot {
                    cancel.cancel();
                }
                tracing::info!("Canceled {}", key);
                self.transport.hide_progress(key).await;
                CancelOutcome::Canceled
            }
        }
    }

    /// Translate one post's text blocks without keeping a session
    pub async fn translate_post(
        &self,
        blocks: Vec<String>,
        settings: &TranslationSettings,
        limits: PageLimits,
    ) -> Result<Vec<String>, SessionError> {
        let translator = self.factory.build(settings)?;
        let resolver = BatchResolver::new(translator, self.options.clone());
        Ok(translate_post(&resolver, blocks, limits).await)
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.lock().await.len()
    }

    async fn drive(&self, mut session: Session, cancel: CancellationToken) -> PassOutcome {
        let state = session.run_pass(&cancel, self.transport.as_ref()).await;
        let key = session.key.clone();

        let mut sessions = self.sessions.lock().await;

        let still_registered = matches!(
            sessions.get(&key),
            Some(Slot::Running { run_id, .. }) if *run_id == session.run_id
        );

        if !still_registered || state == SessionState::Canceled {
            if still_registered {
                sessions.remove(&key);
            }
            session.mark_canceled();
            tracing::debug!("{} pass ended after cancellation", key);
            return PassOutcome::Canceled;
        }

        if state == SessionState::Completed {
            sessions.remove(&key);
            drop(sessions);

            let total_items = session.progress().total_items;
            tracing::info!("Completed {} ({} items)", key, total_items);
            self.transport.hide_progress(&key).await;
            return PassOutcome::Completed { total_items };
        }

        let progress = session.progress();
        sessions.insert(key.clone(), Slot::Idle(Box::new(session)));
        drop(sessions);

        tracing::info!(
            "Paused {}: {} chunks left, {}/{} items",
            key,
            progress.remaining_chunks,
            progress.processed_items,
            progress.total_items
        );
        self.transport.show_progress(&key, progress).await;
        PassOutcome::Paused(progress)
    }
}
