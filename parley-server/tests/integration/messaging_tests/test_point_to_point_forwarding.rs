use crate::integration::{create_test_service, init_tracing};
use crate::utils::{TestParticipant, joined};

#[tokio::test]
async fn test_offer_is_forwarded_verbatim() {
    init_tracing();

    let service = create_test_service();

    let mut a = TestParticipant::join(&service, "A").await.unwrap();
    let mut b = TestParticipant::join(&service, "B").await.unwrap();
    let mut c = TestParticipant::join(&service, "C").await.unwrap();

    for _ in 0..3 {
        a.recv().await.unwrap();
    }
    b.recv().await.unwrap();
    b.recv().await.unwrap();
    assert_eq!(c.recv().await.unwrap(), joined("C"));

    // Key order and whitespace must survive the relay untouched.
    let offer = r#"{"to":"B", "type":"offer","from":"A","signal":{"sdp":"v=0\r\n","type":"offer","z":1,"a":2}}"#;
    a.send_raw(offer).await.unwrap();

    assert_eq!(b.recv_raw().await.unwrap(), offer);
    a.expect_silence().await.unwrap();
    c.expect_silence().await.unwrap();
}

#[tokio::test]
async fn test_answer_and_candidates_keep_per_sender_order() {
    init_tracing();

    let service = create_test_service();

    let mut a = TestParticipant::join(&service, "A").await.unwrap();
    let b = TestParticipant::join(&service, "B").await.unwrap();
    a.recv().await.unwrap();
    a.recv().await.unwrap();

    let frames = [
        r#"{"type":"answer","from":"B","to":"A","signal":{"type":"answer","sdp":"s"}}"#,
        r#"{"type":"ice-candidate","from":"B","to":"A","candidate":{"candidate":"c1"}}"#,
        r#"{"type":"ice-candidate","from":"B","to":"A","candidate":{"candidate":"c2"}}"#,
    ];
    for frame in frames {
        b.send_raw(frame).await.unwrap();
    }

    for frame in frames {
        assert_eq!(a.recv_raw().await.unwrap(), frame);
    }
}
