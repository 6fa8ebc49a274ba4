use mirrorlink_core::RoomId;

use crate::integration::init_tracing;
use crate::utils::{TestClient, TestRelay};

#[tokio::test]
async fn test_three_peers_join() {
    init_tracing();

    let relay = TestRelay::start().await.expect("Failed to start relay");

    let mut a = TestClient::connect(&relay.room_url("testroom")).await.unwrap();
    relay.wait_for_members("testroom", 1).await.unwrap();
    let mut b = TestClient::connect(&relay.room_url("testroom")).await.unwrap();
    relay.wait_for_members("testroom", 2).await.unwrap();
    let mut c = TestClient::connect(&relay.room_url("testroom")).await.unwrap();
    relay.wait_for_members("testroom", 3).await.unwrap();

    a.send_text("hello from A").await.unwrap();
    assert_eq!(b.recv_text().await.unwrap(), "hello from A");
    assert_eq!(c.recv_text().await.unwrap(), "hello from A");

    c.close().await.expect("Failed to close C");
    relay
        .wait_for_members("testroom", 2)
        .await
        .expect("C still registered");

    // A and B keep talking without noticing C left.
    a.send_text("still here").await.unwrap();
    assert_eq!(b.recv_text().await.unwrap(), "still here");
    b.send_text("me too").await.unwrap();
    assert_eq!(a.recv_text().await.unwrap(), "me too");

    assert_eq!(
        relay
            .service
            .registry()
            .member_count(&RoomId::from("testroom")),
        2
    );

    a.close().await.unwrap();
    b.close().await.unwrap();
    relay.stop().await.unwrap();
}
