//! Stub translators and a recording transport for the pipeline tests

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Notify;
use tolk_config::translator::TranslationSettings;
use tolk_translator::{BatchTranslator, ProviderMetadata, TranslateError, Translator};

use crate::factory::TranslatorFactory;
use crate::session::{Progress, SessionKey};
use crate::transport::Transport;

pub const SEP: &str = "[[[SEP]]]";

fn metadata(name: &str) -> ProviderMetadata {
    ProviderMetadata {
        name: name.to_string(),
        model: "stub".to_string(),
        requires_api_key: false,
    }
}

/// Uppercases its input; the default separator is already uppercase so joined requests split cleanly
#[derive(Default)]
pub struct EchoTranslator {
    pub calls: Mutex<Vec<String>>,
}

impl EchoTranslator {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Translator for EchoTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        self.calls.lock().unwrap().push(text.to_string());
        Ok(text.to_uppercase())
    }

    fn metadata(&self) -> ProviderMetadata {
        metadata("echo")
    }

    fn api_key(&self) -> &str {
        ""
    }
}

/// Drops separators from joined requests and translates single items.
/// Items listed in `failing` raise a provider error.
pub struct SeparatorDroppingTranslator {
    pub failing: Vec<String>,
    pub calls: AtomicUsize,
}

impl SeparatorDroppingTranslator {
    pub fn new(failing: &[&str]) -> Self {
        Self {
            failing: failing.iter().map(|s| s.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl Translator for SeparatorDroppingTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if text.contains(SEP) {
            return Ok(text.replace(SEP, " "));
        }

        if self.failing.iter().any(|f| f == text) {
            return Err(TranslateError::Http {
                status: 500,
                body: "boom".to_string(),
            });
        }

        Ok(format!("t:{text}"))
    }

    fn metadata(&self) -> ProviderMetadata {
        metadata("lossy")
    }

    fn api_key(&self) -> &str {
        ""
    }
}

/// Array-capable translator whose batch result length is scripted
pub struct BatchStub {
    pub batch_len_delta: isize,
    pub batch_calls: AtomicUsize,
    pub echo: EchoTranslator,
}

impl BatchStub {
    pub fn new(batch_len_delta: isize) -> Self {
        Self {
            batch_len_delta,
            batch_calls: AtomicUsize::new(0),
            echo: EchoTranslator::default(),
        }
    }
}

#[async_trait]
impl Translator for BatchStub {
    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        self.echo.translate(text).await
    }

    fn metadata(&self) -> ProviderMetadata {
        metadata("batch")
    }

    fn api_key(&self) -> &str {
        ""
    }

    fn as_batch(&self) -> Option<&dyn BatchTranslator> {
        Some(self)
    }
}

#[async_trait]
impl BatchTranslator for BatchStub {
    async fn translate_batch(&self, texts: &[String]) -> Result<Vec<String>, TranslateError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        let mut out: Vec<String> = texts.iter().map(|t| format!("b:{t}")).collect();
        if self.batch_len_delta < 0 {
            out.truncate(texts.len().saturating_sub(self.batch_len_delta.unsigned_abs()));
        } else {
            for _ in 0..self.batch_len_delta {
                out.push("extra".to_string());
            }
        }
        Ok(out)
    }
}

/// Blocks every call until released, to hold a pass in flight
#[derive(Default)]
pub struct GateTranslator {
    pub entered: Notify,
    pub release: Notify,
}

#[async_trait]
impl Translator for GateTranslator {
    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(format!("gated:{text}"))
    }

    fn metadata(&self) -> ProviderMetadata {
        metadata("gate")
    }

    fn api_key(&self) -> &str {
        ""
    }
}

/// Hands out a fixed translator, rejecting settings without a key
pub struct StubFactory {
    pub translator: Arc<dyn Translator>,
}

impl StubFactory {
    pub fn new(translator: Arc<dyn Translator>) -> Arc<Self> {
        Arc::new(Self { translator })
    }
}

impl TranslatorFactory for StubFactory {
    fn build(&self, settings: &TranslationSettings) -> Result<Arc<dyn Translator>, TranslateError> {
        settings
            .validate()
            .map_err(TranslateError::InvalidConfiguration)?;
        Ok(self.translator.clone())
    }
}

/// Hands out translators in the order given, one per build
pub struct SequenceFactory {
    pub translators: Mutex<VecDeque<Arc<dyn Translator>>>,
}

impl SequenceFactory {
    pub fn new(translators: Vec<Arc<dyn Translator>>) -> Arc<Self> {
        Arc::new(Self {
            translators: Mutex::new(translators.into()),
        })
    }
}

impl TranslatorFactory for SequenceFactory {
    fn build(&self, _settings: &TranslationSettings) -> Result<Arc<dyn Translator>, TranslateError> {
        self.translators
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TranslateError::InvalidConfiguration("no translator left".to_string()))
    }
}

pub fn settings() -> TranslationSettings {
    TranslationSettings {
        api_key: "test-key".to_string(),
        ..Default::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Apply {
        key: SessionKey,
        offset: usize,
        translations: Vec<String>,
    },
    Show {
        key: SessionKey,
        progress: Progress,
    },
    Hide {
        key: SessionKey,
    },
}

#[derive(Default)]
pub struct RecordingTransport {
    pub events: Mutex<Vec<TransportEvent>>,
}

impl RecordingTransport {
    pub fn events(&self) -> Vec<TransportEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn offsets(&self) -> Vec<usize> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                TransportEvent::Apply { offset, .. } => Some(offset),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn apply_chunk(&self, key: &SessionKey, offset: usize, translations: Vec<String>) {
        self.events.lock().unwrap().push(TransportEvent::Apply {
            key: key.clone(),
            offset,
            translations,
        });
    }

    async fn show_progress(&self, key: &SessionKey, progress: Progress) {
        self.events.lock().unwrap().push(TransportEvent::Show {
            key: key.clone(),
            progress,
        });
    }

    async fn hide_progress(&self, key: &SessionKey) {
        self.events
            .lock()
            .unwrap()
            .push(TransportEvent::Hide { key: key.clone() });
    }
}
