pub mod relay_tests;

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::Level;

use duet_server::{HubCommand, SessionController};

use crate::utils::{Delivery, MockSignalingOutput};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn create_test_hub() -> (
    mpsc::Sender<HubCommand>,
    mpsc::UnboundedReceiver<Delivery>,
    MockSignalingOutput,
) {
    let (hub_tx, hub_rx) = mpsc::channel::<HubCommand>(100);
    let (output, delivery_rx) = MockSignalingOutput::new();

    let controller = SessionController::new(hub_rx, Arc::new(output.clone()), 64);

    tokio::spawn(async move {
        controller.run().await;
    });

    (hub_tx, delivery_rx, output)
}
