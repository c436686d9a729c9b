use crate::integration::init_tracing;
use crate::utils::{EngineHarness, MockBehavior, Outgoing, offer_signal};
use parley_client::{EngineEvent, SessionState};
use parley_core::ParticipantId;
use serde_json::json;

#[tokio::test]
async fn test_malformed_offer_closes_session() {
    init_tracing();

    let mut bob = EngineHarness::spawn("bob", MockBehavior::default());

    bob.deliver_offer("alice", json!({ "type": "offer" }))
        .await
        .unwrap();

    match bob.next_event().await.unwrap() {
        EngineEvent::PeerClosed { peer_id } => assert_eq!(peer_id, ParticipantId::from("alice")),
        other => panic!("Expected close, got {:?}", other),
    }
    assert_eq!(bob.state_of("alice").await.unwrap(), None);
    assert!(bob.signaling.get_signals().await.is_empty());
    assert_eq!(bob.log.close_count(&"alice".into()).await, 1);

    // No automatic retry, but a fresh offer starts over.
    bob.deliver_offer("alice", offer_signal()).await.unwrap();
    assert!(matches!(
        bob.next_description().await.unwrap(),
        Outgoing::Answer { .. }
    ));
    bob.wait_for_state("alice", Some(SessionState::AnswerSent))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_malformed_answer_closes_session() {
    init_tracing();

    let mut alice = EngineHarness::spawn("alice", MockBehavior::default());

    alice.deliver_joined("bob").await.unwrap();
    assert!(matches!(
        alice.next_description().await.unwrap(),
        Outgoing::Offer { .. }
    ));

    alice
        .deliver_answer("bob", json!({ "type": "answer" }))
        .await
        .unwrap();

    match alice.next_event().await.unwrap() {
        EngineEvent::PeerClosed { peer_id } => assert_eq!(peer_id, ParticipantId::from("bob")),
        other => panic!("Expected close, got {:?}", other),
    }
    assert_eq!(alice.state_of("bob").await.unwrap(), None);
    assert_eq!(alice.log.close_count(&"bob".into()).await, 1);
}

#[tokio::test]
async fn test_transport_failure_closes_session() {
    init_tracing();

    let mut alice = EngineHarness::spawn("alice", MockBehavior::default());

    alice.deliver_joined("bob").await.unwrap();
    assert!(matches!(
        alice.next_description().await.unwrap(),
        Outgoing::Offer { .. }
    ));

    let sinks = alice.log.event_sinks(&"bob".into()).await;
    assert_eq!(sinks.len(), 1);
    sinks[0].failed("ice failed");

    match alice.next_event().await.unwrap() {
        EngineEvent::PeerClosed { peer_id } => assert_eq!(peer_id, ParticipantId::from("bob")),
        other => panic!("Expected close, got {:?}", other),
    }
    alice.wait_for_state("bob", None).await.unwrap();
}
