//! Integration coverage for `MessageCodec` over an in-memory duplex stream.
//!
//! Messages written through `FramedWrite` are split into fragments when they
//! exceed the negotiated transfer size; the reading side decodes each
//! fragment and feeds it to a `Reassembler`.

use std::{io, num::NonZeroUsize, time::Duration};

use futures::{SinkExt, StreamExt};
use mbimwire::{
    FragmentationConfig,
    Message,
    MessageCodec,
    MessageType,
    Reassembler,
    StatusError,
};
use rstest::{fixture, rstest};
use tokio::io::{AsyncWriteExt, duplex};
use tokio_util::codec::{FramedRead, FramedWrite};

#[fixture]
fn config() -> FragmentationConfig {
    FragmentationConfig::for_max_control_transfer(
        64,
        NonZeroUsize::new(4096).expect("non-zero"),
        Duration::from_secs(5),
    )
    .expect("valid configuration")
}

#[rstest]
#[tokio::test]
async fn fragmented_messages_reassemble_after_decoding(config: FragmentationConfig) {
    let (client, server) = duplex(256);
    let mut writer = FramedWrite::new(client, MessageCodec::new(config));
    let mut reader = FramedRead::new(server, MessageCodec::new(config));

    let payload: Vec<u8> = (0..500_u16).map(|i| (i % 256) as u8).collect();
    let command = Message::with_payload(MessageType::Command, 17, &payload).expect("command");
    let open = Message::open(16, 64);
    let expected = vec![open.clone(), command.clone(), Message::close(18)];

    let send = async move {
        for message in [open, command, Message::close(18)] {
            writer.send(message).await.expect("send message");
        }
        writer.close().await.expect("close writer");
    };

    let receive = async {
        let mut reassembler = Reassembler::from_config(config);
        let mut received = Vec::new();
        let mut frames = 0;
        while let Some(frame) = reader.next().await {
            let frame = frame.expect("decode frame");
            assert!(frame.len() <= 64, "frame exceeds the transfer size");
            frames += 1;
            if let Some(message) = reassembler.push(frame).expect("reassemble") {
                received.push(message);
            }
        }
        (received, frames)
    };

    let ((), (received, frames)) = tokio::join!(send, receive);
    assert_eq!(received, expected);
    // 500 bytes at 44 per fragment take 12 fragments, plus open and close.
    assert_eq!(frames, 14);
}

#[rstest]
#[tokio::test]
async fn status_responses_cross_the_stream_whole(config: FragmentationConfig) {
    let (client, server) = duplex(64);
    let mut writer = FramedWrite::new(client, MessageCodec::new(config));
    let mut reader = FramedRead::new(server, MessageCodec::new(config));

    writer
        .send(Message::open_done(4, StatusError::NotInitialized))
        .await
        .expect("send open-done");
    drop(writer);

    let done = reader
        .next()
        .await
        .expect("one message")
        .expect("decode open-done");
    assert_eq!(
        done.open_done_status_code(),
        Ok(StatusError::NotInitialized)
    );
    assert!(done.open_done_result().is_err());
    assert!(reader.next().await.is_none(), "stream ends cleanly");
}

#[rstest]
#[tokio::test]
async fn truncated_stream_reports_unexpected_eof(config: FragmentationConfig) {
    let (mut client, server) = duplex(64);
    let mut reader = FramedRead::new(server, MessageCodec::new(config));

    let open = Message::open(1, 4096);
    client
        .write_all(&open.as_bytes()[..10])
        .await
        .expect("write partial header");
    drop(client);

    let err = reader
        .next()
        .await
        .expect("an error item")
        .expect_err("partial message");
    assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
}

#[rstest]
#[tokio::test]
async fn oversized_declared_length_is_rejected(config: FragmentationConfig) {
    let (mut client, server) = duplex(64);
    let mut reader = FramedRead::new(server, MessageCodec::new(config));

    let mut header = Vec::new();
    header.extend_from_slice(&3_u32.to_le_bytes());
    header.extend_from_slice(&8192_u32.to_le_bytes());
    header.extend_from_slice(&1_u32.to_le_bytes());
    client.write_all(&header).await.expect("write header");

    let err = reader
        .next()
        .await
        .expect("an error item")
        .expect_err("length above the cap");
    assert_eq!(err.kind(), io::ErrorKind::InvalidData);
}
