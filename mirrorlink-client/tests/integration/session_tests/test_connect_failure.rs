use mirrorlink_client::{ClientError, ConnectionObserver, NegotiationRole, PeerConfig, PeerSession};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use crate::integration::init_tracing;
use crate::utils::MockTransport;

#[tokio::test]
async fn test_connect_failure() {
    init_tracing();

    // Reserve a port, then free it so nothing is listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = Arc::new(MockTransport::default());
    let (_events_tx, events) = mpsc::channel(16);
    let session = PeerSession::new(
        PeerConfig::new(format!("ws://{addr}"), "testroom"),
        NegotiationRole::Initiator,
        Arc::clone(&transport),
        events,
        ConnectionObserver::log_only(),
    );

    let err = session.run(std::future::pending::<()>()).await.unwrap_err();
    assert!(matches!(err, ClientError::Connect { .. }));
    assert!(transport.is_closed());
    assert_eq!(transport.offers(), 0);
}
