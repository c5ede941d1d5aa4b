use crate::common::{self, TestClient, test_data};
use axum::http::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn test_explain_falls_back_to_hint() {
    let state = db_state_or_skip!();
    let subject = test_data::unique_subject("explain");
    let question = common::db::create_question(&state.pool, &subject).await.unwrap();
    let client = TestClient::for_state(state.clone());

    let response = client
        .post_json(
            "/ai/explain",
            &json!({ "question_id": question.id, "user_answer": "1200" }),
        )
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["explanation"], "ヒント: 販売=仕入×1.2。正解は1000円です。");
    assert_eq!(body["is_correct"], false);

    common::db::delete_subject(&state.pool, &subject).await.unwrap();
}

#[tokio::test]
async fn test_explain_unknown_question_is_404() {
    let state = db_state_or_skip!();
    let client = TestClient::for_state(state);

    client
        .post_json("/ai/explain", &json!({ "question_id": 987654321 }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_generate_variant() {
    let state = db_state_or_skip!();
    let subject = test_data::unique_subject("variant");
    let source = common::db::create_question(&state.pool, &subject).await.unwrap();
    let client = TestClient::for_state(state.clone());

    let response = client
        .post_json(
            "/ai/generate-variant",
            &json!({ "question_id": source.id, "difficulty": 2.5 }),
        )
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    let variant = &body["question"];
    assert_ne!(variant["id"], source.id);
    assert_eq!(variant["subject"], subject.as_str());
    assert_eq!(variant["topic"], "割合（類題）");
    assert_eq!(variant["source"], format!("variant:{}", source.id));
    assert_eq!(variant["difficulty"], 2.5);

    // The variant is a regular question
    client
        .get(&format!("/questions/{}", variant["id"]))
        .await
        .assert_status(StatusCode::OK);

    common::db::delete_subject(&state.pool, &subject).await.unwrap();
}

#[tokio::test]
async fn test_generate_variant_unknown_question_is_404() {
    let state = db_state_or_skip!();
    let client = TestClient::for_state(state);

    client
        .post_json("/ai/generate-variant", &json!({ "question_id": 987654321 }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
