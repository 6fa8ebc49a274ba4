use crate::integration::init_tracing;
use crate::utils::{TestClient, TestRelay};

#[tokio::test]
async fn test_shutdown_releases_rooms() {
    init_tracing();

    let relay = TestRelay::start().await.expect("Failed to start relay");
    let _a = TestClient::connect(&relay.room_url("one")).await.unwrap();
    let _b = TestClient::connect(&relay.room_url("two")).await.unwrap();
    relay.wait_for_members("one", 1).await.unwrap();
    relay.wait_for_members("two", 1).await.unwrap();

    relay.service.shutdown();

    relay.wait_for_members("one", 0).await.unwrap();
    relay.wait_for_members("two", 0).await.unwrap();
    assert_eq!(relay.service.registry().room_count(), 0);
    assert!(relay.service.is_shutting_down());

    relay.stop().await.unwrap();
}
