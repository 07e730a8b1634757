use kanal::AsyncReceiver;
use tokio_util::sync::CancellationToken;
use tolk_types::{Message, Request};

use crate::context::RequestContext;

pub mod page;
pub mod translate_post;
pub mod translate_text;

use page::{handle_cancel_page, handle_continue_page, handle_start_page};
use translate_post::handle_translate_post;
use translate_text::handle_translate_text;

/// Host's main loop: each request runs in its own task so a cancel can overtake a running pass
pub async fn event_loop(
    ctx: RequestContext,
    request_rx: AsyncReceiver<Request>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    tracing::info!("Event loop started");

    loop {
        let request = tokio::select! {
            request = request_rx.recv() => match request {
                Ok(request) => request,
                Err(_) => {
                    tracing::info!("Request channel closed");
                    break;
                }
            },
            _ = cancel.cancelled() => break,
        };

        if matches!(request, Request::Shutdown) {
            tracing::info!("Shutdown requested by extension");
            cancel.cancel();
            break;
        }

        let ctx = ctx.clone();
        tokio::spawn(async move {
            let id = request.id().map(str::to_string);
            if let Err(e) = handle_request(&ctx, request).await {
                tracing::error!("Request {:?} failed: {}", id, e);
            }
        });
    }

    tracing::info!("Event loop stopping");
    Ok(())
}

async fn handle_request(ctx: &RequestContext, request: Request) -> anyhow::Result<()> {
    match request {
        Request::TranslateText { id, text, settings } => handle_translate_text(ctx, id, text, settings).await,
        Request::TranslatePost { id, blocks, settings } => handle_translate_post(ctx, id, blocks, settings).await,
        Request::StartPage {
            id,
            tab_id,
            snapshot_id,
            fragments,
            settings,
            limits,
        } => handle_start_page(ctx, id, tab_id, snapshot_id, fragments, settings, limits).await,
        Request::ContinuePage { id, tab_id, snapshot_id } => handle_continue_page(ctx, id, tab_id, snapshot_id).await,
        Request::CancelPage { id, tab_id, snapshot_id } => handle_cancel_page(ctx, id, tab_id, snapshot_id).await,
        Request::Shutdown => Ok(()),
    }
}

/// Configuration problems are the only failures the extension sees as errors
pub(crate) async fn reply_error(ctx: &RequestContext, id: String, error: impl std::fmt::Display) -> anyhow::Result<()> {
    tracing::warn!("Request {} rejected: {}", id, error);
    ctx.reply(Message::Error {
        id,
        message: error.to_string(),
    })
    .await
}
