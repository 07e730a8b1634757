use serde::{Deserialize, Serialize};
use tolk_config::translator::TranslationSettings;
use tolk_core::{CancelOutcome, PageLimits, PassOutcome, Progress, SessionKey};

/// Messages the extension sends to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Request {
    TranslateText {
        id: String,
        text: String,
        #[serde(default)]
        settings: Option<TranslationSettings>,
    },
    TranslatePost {
        id: String,
        blocks: Vec<String>,
        #[serde(default)]
        settings: Option<TranslationSettings>,
    },
    StartPage {
        id: String,
        tab_id: i64,
        snapshot_id: String,
        fragments: Vec<String>,
        #[serde(default)]
        settings: Option<TranslationSettings>,
        #[serde(default)]
        limits: Option<PageLimits>,
    },
    ContinuePage {
        id: String,
        tab_id: i64,
        snapshot_id: String,
    },
    CancelPage {
        id: String,
        tab_id: i64,
        snapshot_id: String,
    },
    Shutdown,
}

impl Request {
    pub fn id(&self) -> Option<&str> {
        match self {
            Request::TranslateText { id, .. }
            | Request::TranslatePost { id, .. }
            | Request::StartPage { id, .. }
            | Request::ContinuePage { id, .. }
            | Request::CancelPage { id, .. } => Some(id),
            Request::Shutdown => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassStatus {
    Paused,
    Completed,
    Canceled,
    NotFound,
    Busy,
}

/// Messages the host sends back to the extension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    Translation {
        id: String,
        text: String,
    },
    PostTranslation {
        id: String,
        translations: Vec<String>,
    },
    ApplyChunk {
        tab_id: i64,
        snapshot_id: String,
        offset: usize,
        translations: Vec<String>,
    },
    ShowProgress {
        tab_id: i64,
        snapshot_id: String,
        remaining_chunks: usize,
        processed_items: usize,
        total_items: usize,
    },
    HideProgress {
        tab_id: i64,
        snapshot_id: String,
    },
    PassResult {
        id: String,
        status: PassStatus,
        #[serde(skip_serializing_if = "Option::is_none")]
        remaining_chunks: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        processed_items: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        total_items: Option<usize>,
    },
    Ack {
        id: String,
    },
    Error {
        id: String,
        message: String,
    },
}

impl Message {
    /// Request id this message answers, if it answers one
    pub fn id(&self) -> Option<&str> {
        match self {
            Message::Translation { id, .. }
            | Message::PostTranslation { id, .. }
            | Message::PassResult { id, .. }
            | Message::Ack { id }
            | Message::Error { id, .. } => Some(id),
            Message::ApplyChunk { .. } | Message::ShowProgress { .. } | Message::HideProgress { .. } => None,
        }
    }

    pub fn apply_chunk(key: &SessionKey, offset: usize, translations: Vec<String>) -> Self {
        Message::ApplyChunk {
            tab_id: key.tab_id,
            snapshot_id: key.snapshot_id.clone(),
            offset,
            translations,
        }
    }

    pub fn show_progress(key: &SessionKey, progress: Progress) -> Self {
        Message::ShowProgress {
            tab_id: key.tab_id,
            snapshot_id: key.snapshot_id.clone(),
            remaining_chunks: progress.remaining_chunks,
            processed_items: progress.processed_items,
            total_items: progress.total_items,
        }
    }

    pub fn hide_progress(key: &SessionKey) -> Self {
        Message::HideProgress {
            tab_id: key.tab_id,
            snapshot_id: key.snapshot_id.clone(),
        }
    }

    pub fn pass_result(id: String, outcome: PassOutcome) -> Self {
        let (status, progress) = match outcome {
            PassOutcome::Paused(progress) => (PassStatus::Paused, Some(progress)),
            PassOutcome::Completed { total_items } => (
                PassStatus::Completed,
                Some(Progress {
                    remaining_chunks: 0,
                    processed_items: total_items,
                    total_items,
                }),
            ),
            PassOutcome::Canceled => (PassStatus::Canceled, None),
            PassOutcome::NotFound => (PassStatus::NotFound, None),
            PassOutcome::Busy => (PassStatus::Busy, None),
        };

        Message::PassResult {
            id,
            status,
            remaining_chunks: progress.map(|p| p.remaining_chunks),
            processed_items: progress.map(|p| p.processed_items),
            total_items: progress.map(|p| p.total_items),
        }
    }

    pub fn cancel_result(id: String, outcome: CancelOutcome) -> Self {
        match outcome {
            CancelOutcome::Canceled => Message::Ack { id },
            CancelOutcome::NotFound => Message::pass_result(id, PassOutcome::NotFound),
        }
    }
}
