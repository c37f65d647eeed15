use shopping_guide::core::{InputType, NextTurn};
use shopping_guide::prompt::apply_input;
use shopping_guide::{SessionBuilder, SessionError};
use shopping_guide_model::{ErrorKind, ModelMessage};
use shopping_guide_test_model::{PresetResponse, TestModelProvider};

#[tokio::test]
async fn test_selection_resets_per_question() {
    let mut provider = TestModelProvider::default();
    provider.add_round(PresetResponse::completion(
        r#"{"query":"Which colors?","type":"multiple","choices":["Red","Green","Blue"]}"#,
    ));
    provider.add_round(PresetResponse::completion(
        r#"{"query":"Which size?","type":"single","choices":["S","M","L"]}"#,
    ));
    let mut session =
        SessionBuilder::with_model_provider(provider.clone()).build();

    let turn = session.submit_request("a t-shirt").await.unwrap();
    assert_eq!(turn.input_type, InputType::Multiple);
    assert!(session.selection().is_empty());

    apply_input(session.selection_mut(), &turn, "3, 1").unwrap();
    let next_turn = session.submit_answer().await.unwrap();
    assert_eq!(next_turn.query, "Which size?");
    assert!(session.selection().is_empty());
    assert_eq!(session.current_turn(), Some(&next_turn));

    let requests = provider.requests();
    assert_eq!(
        requests[1].messages.last(),
        Some(&ModelMessage::User("Which colors?: Red, Blue".to_owned()))
    );
}

#[tokio::test]
async fn test_selection_kept_after_failure() {
    let mut provider = TestModelProvider::default();
    provider.add_round(PresetResponse::completion(
        r#"{"query":"Budget?","type":"free-text","choices":[]}"#,
    ));
    provider.add_round(
        PresetResponse::completion("Any brand you like?").with_failures(1),
    );
    let mut session = SessionBuilder::with_model_provider(provider).build();

    let turn = session.submit_request("headphones").await.unwrap();
    apply_input(session.selection_mut(), &turn, "under $200").unwrap();

    let err = session.submit_answer().await.unwrap_err();
    let SessionError::Round(err) = err else {
        panic!("expected a round error");
    };
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(session.selection().answer(), "under $200");
    assert_eq!(session.transcript().len(), 2);

    let next_turn = session.submit_answer().await.unwrap();
    assert_eq!(next_turn, NextTurn::free_text("Any brand you like?"));
    assert_eq!(
        session.transcript().snapshot()[2].content,
        "Budget?: under $200"
    );
}

#[tokio::test]
async fn test_answer_without_question() {
    let provider = TestModelProvider::default();
    let mut session = SessionBuilder::with_model_provider(provider).build();

    let err = session.submit_answer().await.unwrap_err();
    assert!(matches!(err, SessionError::NoQuestion));
    assert!(session.transcript().is_empty());
}

#[tokio::test]
async fn test_new_request_mid_conversation() {
    let mut provider = TestModelProvider::default();
    provider.add_round(PresetResponse::completion(
        r#"{"query":"Which size?","type":"single","choices":["S","M"]}"#,
    ));
    provider.add_round(PresetResponse::completion(
        r#"{"query":"Which genre?","type":"single","choices":["Sci-fi","Crime"]}"#,
    ));
    let mut session =
        SessionBuilder::with_model_provider(provider.clone()).build();

    let turn = session.submit_request("a jacket").await.unwrap();
    apply_input(session.selection_mut(), &turn, "2").unwrap();
    assert!(!session.selection().is_empty());

    let turn = session.submit_request("actually, a book").await.unwrap();
    assert_eq!(turn.query, "Which genre?");
    assert!(session.selection().is_empty());
    assert_eq!(session.transcript().len(), 4);

    let requests = provider.requests();
    assert_eq!(
        requests[1].messages.last(),
        Some(&ModelMessage::User("actually, a book".to_owned()))
    );
}
