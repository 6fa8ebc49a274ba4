use crate::integration::init_tracing;
use crate::utils::{TestClient, TestRelay};

#[tokio::test]
async fn test_rapid_message_sending() {
    init_tracing();

    let relay = TestRelay::start().await.expect("Failed to start relay");
    let mut a = TestClient::connect(&relay.room_url("fifo")).await.unwrap();
    let mut b = TestClient::connect(&relay.room_url("fifo")).await.unwrap();
    relay.wait_for_members("fifo", 2).await.unwrap();

    let message_count = 50;
    for i in 0..message_count {
        a.send_text(&format!("Rapid message {}", i)).await.unwrap();
    }

    // Verify order
    for i in 0..message_count {
        let msg = b.recv_text().await.expect("Missing message");
        assert_eq!(msg, format!("Rapid message {}", i), "Message {} out of order", i);
    }

    a.close().await.unwrap();
    b.close().await.unwrap();
    relay.stop().await.unwrap();
}
