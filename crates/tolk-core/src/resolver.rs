use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tolk_config::pipeline::PipelineConfig;
use tolk_translator::Translator;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
pub struct ResolverOptions {
    pub separator: String,
    pub max_depth: usize,
    /// Pause between consecutive provider calls
    pub delay: Duration,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self::from_pipeline(&PipelineConfig::default())
    }
}

impl ResolverOptions {
    pub fn from_pipeline(pipeline: &PipelineConfig) -> Self {
        Self {
            separator: pipeline.separator.clone(),
            max_depth: pipeline.max_depth,
            delay: pipeline.inter_call_delay(),
        }
    }

    pub fn separator_len(&self) -> usize {
        self.separator.chars().count()
    }
}

/// Turns one chunk into exactly as many translations as it has fragments.
///
/// Tries the provider's array mode, then a joined request split on the separator,
/// bisecting on count mismatch and ending in per-item calls. Every translation is
/// trimmed whichever path produced it; failed items keep their original text as is.
#[derive(Clone)]
pub struct BatchResolver {
    translator: Arc<dyn Translator>,
    options: ResolverOptions,
}

impl BatchResolver {
    pub fn new(translator: Arc<dyn Translator>, options: ResolverOptions) -> Self {
        Self {
            translator,
            options,
        }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub async fn resolve(&self, chunk: &[String]) -> Vec<String> {
        if chunk.is_empty() {
            return Vec::new();
        }

        if let Some(batch) = self.translator.as_batch() {
            match batch.translate_batch(chunk).await {
                Ok(items) if items.len() == chunk.len() => {
                    return items.iter().map(|item| item.trim().to_string()).collect();
                }
                Ok(items) => tracing::warn!(
                    "Structured batch returned {} items for {}, using separator protocol",
                    items.len(),
                    chunk.len()
                ),
                Err(e) => tracing::warn!("Structured batch failed: {}, using separator protocol", e),
            }
        }

        self.resolve_joined(chunk, 0).await
    }

    fn resolve_joined<'a>(&'a self, chunk: &'a [String], depth: usize) -> BoxFuture<'a, Vec<String>> {
        Box::pin(async move {
            let separator = self.options.separator.as_str();
            let joined = chunk.join(separator);

            match self.translator.translate(&joined).await {
                Ok(translated) => {
                    let parts: Vec<String> = translated
                        .split(separator)
                        .map(|p| p.trim().to_string())
                        .collect();

                    if parts.len() == chunk.len() {
                        return parts;
                    }

                    tracing::warn!(
                        "Separator integrity failure at depth {}: expected {} parts, got {}",
                        depth,
                        chunk.len(),
                        parts.len()
                    );
                }
                Err(e) => {
                    tracing::warn!("Joined translation of {} items failed: {}", chunk.len(), e);
                }
            }

            if depth >= self.options.max_depth || chunk.len() <= 1 {
                return self.translate_each(chunk).await;
            }

            let (left, right) = chunk.split_at(chunk.len() / 2);

            let mut resolved = self.resolve_joined(left, depth + 1).await;
            self.pause().await;
            resolved.extend(self.resolve_joined(right, depth + 1).await);
            resolved
        })
    }

    async fn translate_each(&self, chunk: &[String]) -> Vec<String> {
        let mut resolved = Vec::with_capacity(chunk.len());

        for (i, fragment) in chunk.iter().enumerate() {
            if i > 0 {
                self.pause().await;
            }

            match self.translator.translate(fragment).await {
                Ok(translated) => resolved.push(translated.trim().to_string()),
                Err(e) => {
                    tracing::warn!("Item translation failed, keeping original: {}", e);
                    resolved.push(fragment.clone());
                }
            }
        }

        resolved
    }

    async fn pause(&self) {
        if !self.options.delay.is_zero() {
            tokio::time::sleep(self.options.delay).await;
        }
    }
}
