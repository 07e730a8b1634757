use tolk_config::translator::TranslationSettings;
use tolk_types::Message;

use crate::context::RequestContext;
use crate::events::reply_error;

pub async fn handle_translate_post(
    ctx: &RequestContext,
    id: String,
    blocks: Vec<String>,
    settings: Option<TranslationSettings>,
) -> anyhow::Result<()> {
    let settings = ctx.state.settings_or_default(settings).await;
    let limits = ctx.state.limits_or_default(None).await;

    match ctx.state.sessions.translate_post(blocks, &settings, limits).await {
        Ok(translations) => ctx.reply(Message::PostTranslation { id, translations }).await,
        Err(e) => reply_error(ctx, id, e).await,
    }
}
