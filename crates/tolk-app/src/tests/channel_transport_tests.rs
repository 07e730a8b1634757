use std::time::Duration;

use tokio::time::timeout;
use tolk_core::{Progress, SessionKey, Transport};
use tolk_types::Message;

use crate::transport::ChannelTransport;

async fn next(rx: &kanal::AsyncReceiver<Message>) -> Message {
    match timeout(Duration::from_secs(2), rx.recv()).await {
        Ok(Ok(message)) => message,
        Ok(Err(e)) => panic!("Channel error: {}", e),
        Err(_) => panic!("Timeout - message never arrived!"),
    }
}

#[tokio::test]
async fn chunks_are_sent_in_offset_order() {
    let (tx, rx) = kanal::bounded_async::<Message>(16);
    let transport = ChannelTransport::new(tx);
    let key = SessionKey::new(4, "snap");

    transport.apply_chunk(&key, 0, vec!["a".to_string(), "b".to_string()]).await;
    transport.apply_chunk(&key, 2, vec!["c".to_string()]).await;

    let mut offsets = Vec::new();
    for _ in 0..2 {
        match next(&rx).await {
            Message::ApplyChunk {
                tab_id,
                snapshot_id,
                offset,
                ..
            } => {
                assert_eq!(tab_id, 4);
                assert_eq!(snapshot_id, "snap");
                offsets.push(offset);
            }
            other => panic!("Wrong message: {other:?}"),
        }
    }
    assert_eq!(offsets, vec![0, 2]);
}

#[tokio::test]
async fn progress_controls_become_messages() {
    let (tx, rx) = kanal::bounded_async::<Message>(16);
    let transport = ChannelTransport::new(tx);
    let key = SessionKey::new(9, "s");

    transport
        .show_progress(
            &key,
            Progress {
                remaining_chunks: 3,
                processed_items: 10,
                total_items: 25,
            },
        )
        .await;
    transport.hide_progress(&key).await;

    assert_eq!(
        next(&rx).await,
        Message::ShowProgress {
            tab_id: 9,
            snapshot_id: "s".to_string(),
            remaining_chunks: 3,
            processed_items: 10,
            total_items: 25,
        }
    );
    assert_eq!(
        next(&rx).await,
        Message::HideProgress {
            tab_id: 9,
            snapshot_id: "s".to_string(),
        }
    );
}

#[tokio::test]
async fn closed_channel_does_not_panic() {
    let (tx, rx) = kanal::bounded_async::<Message>(1);
    drop(rx);

    let transport = ChannelTransport::new(tx);
    transport.hide_progress(&SessionKey::new(1, "gone")).await;
}
