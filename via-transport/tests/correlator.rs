//! Request-correlation semantics, driven through a mock transport.
//!
//! These tests pin down the single-outstanding-request-per-command-id
//! contract: eviction ordering, timeout cleanup, write failures, and
//! disconnect behavior.

use std::sync::Arc;
use std::time::Duration;

use via_transport::protocol::cmd;
use via_transport::{Frame, MockTransport, SessionConfig, ViaError, ViaSession};

fn open(transport: &Arc<MockTransport>) -> Arc<ViaSession> {
    Arc::new(ViaSession::open_default(
        Arc::clone(transport) as Arc<dyn via_transport::Transport>
    ))
}

/// Let the correlator task drain its queues.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn second_request_supersedes_first() {
    let transport = MockTransport::new();
    let session = open(&transport);

    let first = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.query(cmd::DYNAMIC_KEYMAP_GET_KEYCODE, &[0, 0, 0]).await })
    };
    settle().await;

    let second = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.query(cmd::DYNAMIC_KEYMAP_GET_KEYCODE, &[0, 0, 1]).await })
    };
    settle().await;

    // The first must already be resolved with Superseded before the
    // second resolves with its real outcome.
    let first = first.await.unwrap();
    assert!(matches!(first, Err(ViaError::Superseded(c)) if c == cmd::DYNAMIC_KEYMAP_GET_KEYCODE));

    transport.inject(Frame::encode(
        cmd::DYNAMIC_KEYMAP_GET_KEYCODE,
        &[0, 0, 1, 0x00, 0x04],
    ));
    let second = second.await.unwrap().unwrap();
    assert_eq!(second.u16_be(4), 0x0004);

    // Both frames actually went out on the wire.
    assert_eq!(transport.written_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn unanswered_request_times_out_without_leaking() {
    let transport = MockTransport::new();
    let session = open(&transport);

    let result = session.query(cmd::GET_PROTOCOL_VERSION, &[]).await;
    assert!(matches!(result, Err(ViaError::Timeout(c)) if c == cmd::GET_PROTOCOL_VERSION));

    // A late response must be dropped silently, not resolve anything.
    transport.inject(Frame::encode(cmd::GET_PROTOCOL_VERSION, &[0xDE, 0xAD]));
    settle().await;

    // The table no longer holds the stale entry: a fresh request for
    // the same command id resolves with its own response.
    let fresh = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.query(cmd::GET_PROTOCOL_VERSION, &[]).await })
    };
    settle().await;
    transport.inject(Frame::encode(cmd::GET_PROTOCOL_VERSION, &[0x00, 0x0C]));
    let response = fresh.await.unwrap().unwrap();
    assert_eq!(response.u16_be(1), 0x000C);
}

#[tokio::test(start_paused = true)]
async fn custom_timeout_is_honored() {
    let transport = MockTransport::new();
    let session = ViaSession::open(
        Arc::clone(&transport) as Arc<dyn via_transport::Transport>,
        SessionConfig {
            timeout: Duration::from_millis(50),
        },
    );

    let start = tokio::time::Instant::now();
    let result = session.query(cmd::DYNAMIC_KEYMAP_GET_LAYER_COUNT, &[]).await;
    assert!(matches!(result, Err(ViaError::Timeout(_))));
    assert!(start.elapsed() < Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn write_failure_fails_the_request_immediately() {
    let transport = MockTransport::new();
    let session = open(&transport);

    transport.fail_writes(true);
    let result = session.query(cmd::DYNAMIC_KEYMAP_RESET, &[]).await;
    assert!(matches!(result, Err(ViaError::WriteFailed(_))));

    // The failure is not fatal to the session.
    transport.fail_writes(false);
    let fresh = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.query(cmd::DYNAMIC_KEYMAP_RESET, &[]).await })
    };
    settle().await;
    transport.inject(Frame::encode(cmd::DYNAMIC_KEYMAP_RESET, &[]));
    assert!(fresh.await.unwrap().is_ok());
}

#[tokio::test(start_paused = true)]
async fn disconnect_fails_every_pending_request() {
    let transport = MockTransport::new();
    let session = open(&transport);

    let commands = [
        cmd::GET_PROTOCOL_VERSION,
        cmd::DYNAMIC_KEYMAP_GET_LAYER_COUNT,
        cmd::CUSTOM_GET_VALUE,
    ];
    let mut handles = Vec::new();
    for &command in &commands {
        let session = Arc::clone(&session);
        handles.push(tokio::spawn(
            async move { session.query(command, &[]).await },
        ));
    }
    settle().await;
    assert_eq!(transport.written_count(), commands.len());

    session.close().await.unwrap();

    for handle in handles {
        let result = handle.await.unwrap();
        assert!(matches!(result, Err(ViaError::NotConnected)));
    }

    // Fail fast once disconnected: no frame goes out.
    let result = session.query(cmd::GET_PROTOCOL_VERSION, &[]).await;
    assert!(matches!(result, Err(ViaError::NotConnected)));
    assert_eq!(transport.written_count(), commands.len());
}

#[tokio::test(start_paused = true)]
async fn unsolicited_frames_are_dropped() {
    let transport = MockTransport::new();
    let session = open(&transport);

    transport.inject(Frame::encode(0x7F, &[1, 2, 3]));
    settle().await;

    let query = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.query(cmd::DYNAMIC_KEYMAP_GET_LAYER_COUNT, &[]).await })
    };
    settle().await;
    transport.inject(Frame::encode(cmd::DYNAMIC_KEYMAP_GET_LAYER_COUNT, &[4]));
    let response = query.await.unwrap().unwrap();
    assert_eq!(response.byte(1), 4);
}

#[tokio::test(start_paused = true)]
async fn distinct_command_ids_resolve_out_of_order() {
    let transport = MockTransport::new();
    let session = open(&transport);

    let version = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.query(cmd::GET_PROTOCOL_VERSION, &[]).await })
    };
    let layers = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.query(cmd::DYNAMIC_KEYMAP_GET_LAYER_COUNT, &[]).await })
    };
    settle().await;

    // Responses arrive in the reverse order of the requests.
    transport.inject(Frame::encode(cmd::DYNAMIC_KEYMAP_GET_LAYER_COUNT, &[6]));
    transport.inject(Frame::encode(cmd::GET_PROTOCOL_VERSION, &[0x00, 0x0C]));

    assert_eq!(layers.await.unwrap().unwrap().byte(1), 6);
    assert_eq!(version.await.unwrap().unwrap().u16_be(1), 0x000C);
}

#[tokio::test(start_paused = true)]
async fn fire_and_forget_leaves_no_pending_entry() {
    let transport = MockTransport::new();
    let session = open(&transport);

    session
        .send(cmd::CUSTOM_SET_VALUE, &[2, 1, 128])
        .await
        .unwrap();
    assert_eq!(transport.written_count(), 1);

    // Nothing is pending: an awaited request for the same command id
    // afterwards correlates only with its own response.
    let query = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.query(cmd::CUSTOM_SET_VALUE, &[0, 1, 40]).await })
    };
    settle().await;
    transport.inject(Frame::encode(cmd::CUSTOM_SET_VALUE, &[0, 1, 40]));
    assert!(query.await.unwrap().is_ok());
}
