use mirrorlink_client::{
    ConnectionObserver, NegotiationRole, PeerConfig, PeerSession, SessionEnd,
};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::integration::init_tracing;
use crate::utils::{MockTransport, TestRelay};

#[tokio::test]
async fn test_relay_close_ends_session() {
    init_tracing();

    let relay = TestRelay::start().await.expect("Failed to start relay");
    let transport = Arc::new(MockTransport::default());
    let (_events_tx, events) = mpsc::channel(16);
    let session = PeerSession::new(
        PeerConfig::new(format!("{}/", relay.base_url()), "testroom"),
        NegotiationRole::Responder,
        Arc::clone(&transport),
        events,
        ConnectionObserver::log_only(),
    );
    let session = tokio::spawn(session.run(std::future::pending::<()>()));
    relay.wait_for_members("testroom", 1).await.unwrap();

    relay.service.shutdown();

    let end = tokio::time::timeout(std::time::Duration::from_secs(5), session)
        .await
        .expect("Session did not notice the relay closing")
        .unwrap()
        .unwrap();
    assert_eq!(end, SessionEnd::RelayClosed);
    assert!(transport.is_closed());
    assert_eq!(transport.remote_count(), 0);

    relay.stop().await.unwrap();
}
