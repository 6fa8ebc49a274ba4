use tokio::sync::watch;

/// Resolves once the flag behind `rx` is set. Never resolves if the sender
/// is dropped without setting it.
pub(crate) async fn stopped(rx: &mut watch::Receiver<bool>) {
    loop {
        let stop = *rx.borrow_and_update();
        if stop {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
