use crate::common::{self, TestClient, test_data};
use axum::http::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn test_user_mastery_lists_answered_questions() {
    let state = db_state_or_skip!();
    let subject = test_data::unique_subject("map");
    let first = common::db::create_question(&state.pool, &subject).await.unwrap();
    let second = common::db::create_question(&state.pool, &subject).await.unwrap();
    let user_id = common::db::create_user(&state.pool).await.unwrap();
    let client = TestClient::for_state(state.clone());

    client
        .post_json(
            &format!("/questions/{}/answer", first.id),
            &json!({ "user_id": user_id, "user_answer": "1000" }),
        )
        .await
        .assert_status(StatusCode::OK);
    client
        .post_json(
            &format!("/questions/{}/answer", second.id),
            &json!({ "user_id": user_id, "user_answer": "3" }),
        )
        .await
        .assert_status(StatusCode::OK);

    let response = client.get(&format!("/users/{user_id}/mastery")).await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["user_id"], user_id);
    let rows = body["mastery"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    for row in rows {
        assert_eq!(row["subject"], subject.as_str());
        assert_eq!(row["topic"], "割合");
        assert_eq!(row["attempts"], 1);
    }

    common::db::delete_user(&state.pool, user_id).await.unwrap();
    common::db::delete_subject(&state.pool, &subject).await.unwrap();
}

#[tokio::test]
async fn test_user_mastery_unknown_user_is_404() {
    let state = db_state_or_skip!();
    let client = TestClient::for_state(state);

    client
        .get("/users/987654321/mastery")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
