use mirrorlink_logging::ShippingLayer;
use tracing_subscriber::layer::SubscriberExt;

use crate::utils::TestAggregator;

#[tokio::test]
async fn test_shipping_layer_delivers() {
    let aggregator = TestAggregator::start().await.expect("Failed to start aggregator");
    let (layer, _shipper) = ShippingLayer::spawn(aggregator.addr.to_string(), "mirror-receiver");
    let subscriber = tracing_subscriber::registry().with(layer);

    tracing::subscriber::with_default(subscriber, || {
        tracing::info!("Received video track screen");
        tracing::warn!(state = "failed", "Connection state changed");
    });

    let lines = aggregator.wait_for_lines(2).await.unwrap();
    assert!(lines[0].ends_with(" [INFO] Received video track screen"));
    assert!(lines[1].ends_with(" [WARNING] Connection state changed state=failed"));

    aggregator.stop().await.unwrap();
}

#[tokio::test]
async fn test_unreachable_aggregator_does_not_block() {
    // Nothing listens on a port we just released.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (layer, shipper) = ShippingLayer::spawn(addr.to_string(), "mirror-sender");
    let subscriber = tracing_subscriber::registry().with(layer);

    let started = std::time::Instant::now();
    tracing::subscriber::with_default(subscriber, || {
        for i in 0..5000 {
            tracing::info!("record {}", i);
        }
    });
    assert!(started.elapsed() < std::time::Duration::from_secs(2));
    shipper.abort();
}
