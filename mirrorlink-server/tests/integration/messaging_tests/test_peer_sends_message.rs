use mirrorlink_core::SignalMessage;

use crate::integration::init_tracing;
use crate::utils::{TestClient, TestRelay};

#[tokio::test]
async fn test_peer_sends_message() {
    init_tracing();

    let relay = TestRelay::start().await.expect("Failed to start relay");
    let mut a = TestClient::connect(&relay.room_url("testroom")).await.unwrap();
    relay.wait_for_members("testroom", 1).await.unwrap();
    let mut b = TestClient::connect(&relay.room_url("testroom")).await.unwrap();
    relay.wait_for_members("testroom", 2).await.unwrap();

    let offer = SignalMessage::Offer {
        sdp: "v=0\r\na=sendonly\r\na=fmtp:97 apt=96\r\n".to_owned(),
    }
    .to_json()
    .unwrap();
    a.send_text(&offer).await.expect("Failed to send offer");

    // The relay never touches the payload.
    let received = b.recv_text().await.expect("B did not receive offer");
    assert_eq!(received, offer);
    a.expect_silence(200).await.expect("Sender got its own message");

    b.send_text(r#"{"type":"answer","sdp":"v=0"}"#).await.unwrap();
    assert_eq!(
        a.recv_text().await.unwrap(),
        r#"{"type":"answer","sdp":"v=0"}"#
    );

    a.close().await.unwrap();
    b.close().await.unwrap();
    relay.stop().await.unwrap();
}

#[tokio::test]
async fn test_malformed_payload_is_relayed_verbatim() {
    init_tracing();

    let relay = TestRelay::start().await.expect("Failed to start relay");
    let mut a = TestClient::connect(&relay.room_url("r")).await.unwrap();
    let mut b = TestClient::connect(&relay.room_url("r")).await.unwrap();
    relay.wait_for_members("r", 2).await.unwrap();

    a.send_text("definitely not json").await.unwrap();
    assert_eq!(b.recv_text().await.unwrap(), "definitely not json");

    a.close().await.unwrap();
    b.close().await.unwrap();
    relay.stop().await.unwrap();
}
