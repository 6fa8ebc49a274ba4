use tokio_tungstenite::tungstenite::Message;

use crate::integration::init_tracing;
use crate::utils::{TestClient, TestRelay};

#[tokio::test]
async fn test_peer_sends_binary_data() {
    init_tracing();

    let relay = TestRelay::start().await.expect("Failed to start relay");
    let mut a = TestClient::connect(&relay.room_url("bin")).await.unwrap();
    let mut b = TestClient::connect(&relay.room_url("bin")).await.unwrap();
    relay.wait_for_members("bin", 2).await.unwrap();

    let payload: Vec<u8> = (0..=255u8).collect();
    a.send_binary(&payload).await.unwrap();

    match b.recv().await.unwrap() {
        Message::Binary(data) => assert_eq!(data.as_ref(), payload.as_slice()),
        other => panic!("Expected binary frame, got {:?}", other),
    }

    a.close().await.unwrap();
    b.close().await.unwrap();
    relay.stop().await.unwrap();
}
