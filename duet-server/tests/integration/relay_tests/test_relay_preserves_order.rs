use duet_core::{ConnectionRole, IceCandidate, SignalMessage};

use crate::integration::{create_test_hub, init_tracing};
use crate::utils::{matched_pair, send_signal, settle};

#[tokio::test]
async fn test_relay_preserves_order() {
    init_tracing();

    let (hub_tx, _deliveries, output) = create_test_hub();
    let (x, y, room_id) = matched_pair(&hub_tx, &output).await.expect("Pairing failed");

    let sent: Vec<SignalMessage> = (0..20)
        .map(|i| SignalMessage::Candidate {
            room_id,
            candidate: IceCandidate {
                candidate: format!("candidate:{i} 1 udp 2122260223 192.168.1.{i} 5000{i} typ host"),
                sdp_mid: Some("0".into()),
                sdp_m_line_index: Some(0),
                username_fragment: None,
            },
            connection_type: ConnectionRole::Sender,
        })
        .collect();

    for msg in &sent {
        send_signal(&hub_tx, x, msg.clone()).await;
    }
    settle(&hub_tx).await.expect("Controller stopped");

    let received = output.deliveries_for(&y).await;
    assert_eq!(&received[1..], sent.as_slice());
}
