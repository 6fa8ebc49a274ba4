use mirrorlink_logging::{LogLevel, write_frame};
use tokio::net::TcpStream;

use crate::integration::init_tracing;
use crate::utils::{TestAggregator, record};

#[tokio::test]
async fn test_records_appended() {
    init_tracing();

    let aggregator = TestAggregator::start().await.expect("Failed to start aggregator");

    let mut sender = TcpStream::connect(aggregator.addr).await.unwrap();
    let mut receiver = TcpStream::connect(aggregator.addr).await.unwrap();

    let offer = serde_json::to_vec(&record(LogLevel::Info, "Sent offer (round 1)")).unwrap();
    write_frame(&mut sender, &offer).await.unwrap();
    aggregator.wait_for_lines(1).await.unwrap();

    let answer = serde_json::to_vec(&record(LogLevel::Warning, "Track ended")).unwrap();
    write_frame(&mut receiver, &answer).await.unwrap();
    let lines = aggregator.wait_for_lines(2).await.unwrap();

    assert!(lines[0].ends_with(" [INFO] Sent offer (round 1)"), "{}", lines[0]);
    assert!(lines[1].ends_with(" [WARNING] Track ended"), "{}", lines[1]);
    // "YYYY-MM-DD HH:MM:SS,mmm"
    assert_eq!(lines[0].find(" [INFO]"), Some(23));
    assert_eq!(&lines[0][19..20], ",");

    drop(sender);
    drop(receiver);
    let lines = aggregator.stop().await.unwrap();
    assert_eq!(lines.len(), 2);
}
