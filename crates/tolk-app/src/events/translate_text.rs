use tolk_config::translator::TranslationSettings;
use tolk_types::Message;

use crate::context::RequestContext;
use crate::events::reply_error;

pub async fn handle_translate_text(
    ctx: &RequestContext,
    id: String,
    text: String,
    settings: Option<TranslationSettings>,
) -> anyhow::Result<()> {
    let settings = ctx.state.settings_or_default(settings).await;

    let translator = match ctx.state.factory.build(&settings) {
        Ok(translator) => translator,
        Err(e) => return reply_error(ctx, id, e).await,
    };

    tracing::debug!("Translating {} chars with {}", text.chars().count(), settings.provider);
    let text = tolk_translator::translate_text(translator.as_ref(), &text).await;

    ctx.reply(Message::Translation { id, text }).await
}
