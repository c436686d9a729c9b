use crate::integration::init_tracing;
use crate::utils::{EngineHarness, MockBehavior, Outgoing, answer_signal};
use parley_client::{EngineEvent, SessionState};
use parley_core::ParticipantId;

#[tokio::test]
async fn test_initiator_flow() {
    init_tracing();

    let mut alice = EngineHarness::spawn(
        "alice",
        MockBehavior {
            stream_on_answer: true,
            ..Default::default()
        },
    );

    // Our own join echo never starts a session.
    alice.deliver_joined("alice").await.unwrap();
    alice.deliver_joined("bob").await.unwrap();

    match alice.next_description().await.unwrap() {
        Outgoing::Offer { to, signal } => {
            assert_eq!(to, ParticipantId::from("bob"));
            assert_eq!(signal["type"], "offer");
        }
        other => panic!("Expected offer, got {:?}", other),
    }
    alice
        .wait_for_state("bob", Some(SessionState::OfferSent))
        .await
        .unwrap();
    assert_eq!(alice.state_of("alice").await.unwrap(), None);

    alice.deliver_answer("bob", answer_signal()).await.unwrap();
    alice
        .wait_for_state("bob", Some(SessionState::Connected))
        .await
        .unwrap();

    match alice.next_event().await.unwrap() {
        EngineEvent::PeerStream { peer_id, stream } => {
            assert_eq!(peer_id, ParticipantId::from("bob"));
            assert_eq!(stream, "stream-bob");
        }
        other => panic!("Expected remote stream, got {:?}", other),
    }

    assert_eq!(
        alice.handle.peers().await.unwrap(),
        vec![ParticipantId::from("bob")]
    );
}

#[tokio::test]
async fn test_local_candidates_are_trickled() {
    init_tracing();

    let mut alice = EngineHarness::spawn(
        "alice",
        MockBehavior {
            emit_candidates: true,
            ..Default::default()
        },
    );

    alice.deliver_joined("bob").await.unwrap();

    assert!(matches!(
        alice.next_outgoing().await.unwrap(),
        Outgoing::Offer { .. }
    ));
    match alice.next_outgoing().await.unwrap() {
        Outgoing::Ice { to, candidate } => {
            assert_eq!(to, ParticipantId::from("bob"));
            assert_eq!(candidate["candidate"], "candidate:mock-bob");
        }
        other => panic!("Expected ICE candidate, got {:?}", other),
    }
    assert_eq!(
        alice
            .signaling
            .get_ice_candidates_for(&"bob".into())
            .await
            .len(),
        1
    );
}
