use crate::store::StoreSnapshot;
use tokio::sync::watch::Receiver;
use tracing::{debug, instrument};

#[instrument(skip_all)]
pub async fn store_listener(mut rx: Receiver<StoreSnapshot>) {
    while rx.changed().await.is_ok() {
        let snapshot: StoreSnapshot = rx.borrow().clone();
        debug!(
            devices = snapshot.devices.len(),
            values = snapshot.values.len(),
            running_actions = snapshot.running_actions.values().sum::<usize>(),
            "🔵 Store changed"
        );
    }
}
