use crate::chunker::chunk;
use crate::resolver::BatchResolver;
use crate::session::PageLimits;

/// Translate a post's text blocks in one go; the result lines up with `blocks`
pub async fn translate_post(resolver: &BatchResolver, blocks: Vec<String>, limits: PageLimits) -> Vec<String> {
    let total = blocks.len();
    let delay = resolver.options().delay;
    let chunks = chunk(
        blocks,
        limits.max_chars,
        limits.max_items_per_chunk,
        resolver.options().separator_len(),
    );

    let mut translated = Vec::with_capacity(total);
    for (i, group) in chunks.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        translated.extend(resolver.resolve(group).await);
    }

    tracing::debug!("Post translated: {} blocks in {} chunks", total, chunks.len());
    translated
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::resolver::ResolverOptions;
    use crate::testing::{EchoTranslator, SeparatorDroppingTranslator};

    fn resolver(translator: Arc<dyn tolk_translator::Translator>) -> BatchResolver {
        paced_resolver(translator, Duration::ZERO)
    }

    fn paced_resolver(translator: Arc<dyn tolk_translator::Translator>, delay: Duration) -> BatchResolver {
        BatchResolver::new(
            translator,
            ResolverOptions {
                delay,
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn blocks_come_back_in_order() {
        let echo = Arc::new(EchoTranslator::default());
        let limits = PageLimits {
            max_chars: 10,
            max_items_per_chunk: 50,
            chunks_per_pass: 1,
        };
        let blocks = vec!["hello".to_string(), "there".to_string(), "general".to_string()];

        let translated = translate_post(&resolver(echo.clone()), blocks, limits).await;

        assert_eq!(translated, vec!["HELLO", "THERE", "GENERAL"]);
        assert_eq!(echo.call_count(), 3);
    }

    #[tokio::test]
    async fn degraded_post_keeps_length() {
        let lossy = Arc::new(SeparatorDroppingTranslator::new(&["b"]));
        let limits = PageLimits {
            max_chars: 1000,
            max_items_per_chunk: 50,
            chunks_per_pass: 1,
        };
        let blocks: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();

        let translated = translate_post(&resolver(lossy), blocks, limits).await;
        assert_eq!(translated, vec!["t:a", "b", "t:c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn chunks_are_paced() {
        let delay = Duration::from_millis(100);
        let limits = PageLimits {
            max_chars: 1000,
            max_items_per_chunk: 1,
            chunks_per_pass: 1,
        };
        let blocks: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();

        let resolver = paced_resolver(Arc::new(EchoTranslator::default()), delay);

        let start = tokio::time::Instant::now();
        let translated = translate_post(&resolver, blocks, limits).await;

        assert_eq!(translated, vec!["A", "B", "C"]);
        let elapsed = start.elapsed();
        assert!(elapsed >= delay * 2 && elapsed < delay * 3, "elapsed {elapsed:?}");
    }
}
