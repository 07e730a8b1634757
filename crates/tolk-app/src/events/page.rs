use tolk_config::translator::TranslationSettings;
use tolk_core::{PageLimits, SessionKey};
use tolk_types::Message;

use crate::context::RequestContext;
use crate::events::reply_error;

pub async fn handle_start_page(
    ctx: &RequestContext,
    id: String,
    tab_id: i64,
    snapshot_id: String,
    fragments: Vec<String>,
    settings: Option<TranslationSettings>,
    limits: Option<PageLimits>,
) -> anyhow::Result<()> {
    let settings = ctx.state.settings_or_default(settings).await;
    let limits = ctx.state.limits_or_default(limits).await;
    let key = SessionKey::new(tab_id, snapshot_id);

    tracing::info!("Page translation requested for {}: {} fragments", key, fragments.len());

    match ctx.state.sessions.start(key, fragments, settings, limits).await {
        Ok(outcome) => ctx.reply(Message::pass_result(id, outcome)).await,
        Err(e) => reply_error(ctx, id, e).await,
    }
}

pub async fn handle_continue_page(
    ctx: &RequestContext,
    id: String,
    tab_id: i64,
    snapshot_id: String,
) -> anyhow::Result<()> {
    let key = SessionKey::new(tab_id, snapshot_id);
    let outcome = ctx.state.sessions.resume(&key).await;
    ctx.reply(Message::pass_result(id, outcome)).await
}

pub async fn handle_cancel_page(
    ctx: &RequestContext,
    id: String,
    tab_id: i64,
    snapshot_id: String,
) -> anyhow::Result<()> {
    let key = SessionKey::new(tab_id, snapshot_id);
    let outcome = ctx.state.sessions.cancel(&key).await;
    ctx.reply(Message::cancel_result(id, outcome)).await
}
