use kanal::AsyncSender;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::sync::CancellationToken;
use tolk_types::{Message, Request};

/// Read framed requests from the extension until end of input or shutdown.
///
/// End of input means the browser closed the port, so the whole host stops.
pub async fn input_loop<R>(reader: R, request_tx: AsyncSender<Request>, cancel: CancellationToken) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
{
    let listener = tolk_io::listen_frames(reader, |payload| {
        let request_tx = request_tx.clone();
        async move {
            let request = match serde_json::from_slice::<Request>(&payload) {
                Ok(request) => request,
                Err(e) => {
                    tracing::warn!("Dropping malformed request: {}", e);
                    return true;
                }
            };

            match request_tx.send(request).await {
                Ok(()) => true,
                Err(e) => {
                    tracing::error!("Failed to forward request: {}", e);
                    false
                }
            }
        }
    });

    let result = tokio::select! {
        result = listener => result,
        _ = cancel.cancelled() => {
            tracing::info!("Input reader stopping");
            return Ok(());
        }
    };

    cancel.cancel();
    result?;
    Ok(())
}

/// Write queued messages to the extension in the order they were produced
pub async fn output_loop<W>(
    mut writer: W,
    message_rx: kanal::AsyncReceiver<Message>,
    cancel: CancellationToken,
) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    loop {
        let message = tokio::select! {
            message = message_rx.recv() => match message {
                Ok(message) => message,
                Err(_) => break,
            },
            _ = cancel.cancelled() => {
                // Flush what was already queued before stopping
                while let Ok(Some(message)) = message_rx.try_recv() {
                    write(&mut writer, message).await?;
                }
                break;
            }
        };

        write(&mut writer, message).await?;
    }

    tracing::info!("Output writer stopping");
    Ok(())
}

async fn write<W>(writer: &mut W, message: Message) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut pending = vec![message];
    while let Some(message) = pending.pop() {
        match tolk_io::write_message(writer, &message).await {
            Ok(()) => {}
            Err(tolk_io::FrameError::TooLarge { len, max }) => {
                tracing::warn!("Message of {} bytes exceeds the {} byte limit", len, max);
                pending.extend(shrink(&message, len, max).into_iter().rev());
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Replacements for a message the browser would refuse.
///
/// Chunks are halved with absolute offsets kept, a lone translation is truncated, and
/// other replies become an error for the same id. Empty means nothing can be sent.
fn shrink(message: &Message, len: usize, max: usize) -> Vec<Message> {
    match message {
        Message::ApplyChunk {
            tab_id,
            snapshot_id,
            offset,
            translations,
        } if translations.len() > 1 => {
            let mid = translations.len() / 2;
            let part = |offset: usize, translations: &[String]| Message::ApplyChunk {
                tab_id: *tab_id,
                snapshot_id: snapshot_id.clone(),
                offset,
                translations: translations.to_vec(),
            };
            vec![
                part(*offset, &translations[..mid]),
                part(offset + mid, &translations[mid..]),
            ]
        }
        Message::ApplyChunk {
            tab_id,
            snapshot_id,
            offset,
            translations,
        } => match translations.first() {
            Some(text) if !text.is_empty() => {
                tracing::warn!("Truncating translation at offset {} for {}", offset, snapshot_id);
                let keep = text.chars().count() / 2;
                vec![Message::ApplyChunk {
                    tab_id: *tab_id,
                    snapshot_id: snapshot_id.clone(),
                    offset: *offset,
                    translations: vec![text.chars().take(keep).collect()],
                }]
            }
            _ => {
                tracing::error!("Chunk at offset {} for {} cannot be sent, dropped", offset, snapshot_id);
                Vec::new()
            }
        },
        Message::Error { id, .. } => {
            tracing::error!("Error reply for {} cannot be sent, dropped", id);
            Vec::new()
        }
        other => match other.id() {
            Some(id) => vec![Message::Error {
                id: id.to_string(),
                message: format!("Reply of {} bytes exceeds the {} byte message limit", len, max),
            }],
            None => {
                tracing::error!("Progress update cannot be sent, dropped");
                Vec::new()
            }
        },
    }
}
