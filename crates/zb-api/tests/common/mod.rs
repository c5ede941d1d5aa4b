#![allow(dead_code)]

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tower::ServiceExt;
use zb_api::{analysis::WeaknessAnalyzer, router, state::ApiState};
use zb_srs::MasteryPolicy;

/// Address nothing listens on, used for tests that must not reach a database
const UNREACHABLE_DATABASE_URL: &str = "postgres://zb:zb@127.0.0.1:1/zb_offline";

/// Database creation, migrations and seeding run once per test binary
static SCHEMA_READY: OnceCell<()> = OnceCell::const_new();

async fn prepare_database(database_url: &str) -> anyhow::Result<()> {
    zb_db::ensure_database(database_url).await?;
    let pool = zb_db::create_pool(database_url, 1).await?;
    zb_db::run_migrations(&pool).await?;
    zb_db::seed::seed_all(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Test configuration
pub struct TestConfig {
    /// `None` when `TEST_DATABASE_URL` is not set
    pub database_url: Option<String>,
    pub mastery_policy: MasteryPolicy,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            database_url: std::env::var("TEST_DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            mastery_policy: MasteryPolicy::Additive,
        }
    }
}

/// Test state builder for creating ApiState
pub struct TestStateBuilder {
    config: TestConfig,
}

impl TestStateBuilder {
    pub fn new() -> Self {
        Self {
            config: TestConfig::default(),
        }
    }

    pub fn mastery_policy(mut self, policy: MasteryPolicy) -> Self {
        self.config.mastery_policy = policy;
        self
    }

    /// Build a test ApiState with a real, migrated and seeded database.
    ///
    /// Returns `Ok(None)` and prints a notice when `TEST_DATABASE_URL` is unset,
    /// so callers can skip themselves.
    pub async fn build(self) -> anyhow::Result<Option<ApiState>> {
        let Some(database_url) = self.config.database_url else {
            eprintln!("TEST_DATABASE_URL not set, skipping database test");
            return Ok(None);
        };

        SCHEMA_READY
            .get_or_try_init(|| prepare_database(&database_url))
            .await?;
        let pool = zb_db::create_pool(&database_url, 5).await?;

        Ok(Some(ApiState {
            pool,
            mastery_policy: self.config.mastery_policy,
            analyzer: WeaknessAnalyzer::fallback_only(),
        }))
    }

    /// Build a test ApiState whose pool never connects.
    ///
    /// Good for routes that must answer before touching the database.
    pub fn build_offline(self) -> ApiState {
        let pool = zb_db::create_lazy_pool(UNREACHABLE_DATABASE_URL, 1, Duration::from_millis(500))
            .expect("Failed to parse offline database URL");

        ApiState {
            pool,
            mastery_policy: self.config.mastery_policy,
            analyzer: WeaknessAnalyzer::fallback_only(),
        }
    }
}

impl Default for TestStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Database-backed state, or return from the calling test when none is configured
macro_rules! db_state_or_skip {
    () => {
        match $crate::common::TestStateBuilder::new()
            .build()
            .await
            .expect("Failed to create test state")
        {
            Some(state) => state,
            None => return,
        }
    };
}

/// Helper to make requests to the test app
pub struct TestClient {
    router: Router,
}

impl TestClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Client over the full application router
    pub fn for_state(state: ApiState) -> Self {
        Self::new(router::router().with_state(state))
    }

    /// Send a request and get the response
    pub async fn request(&self, mut request: Request<Body>) -> TestResponse {
        // Add ConnectInfo extension for rate limiting to work in tests
        use axum::extract::ConnectInfo;
        use std::net::{IpAddr, Ipv4Addr, SocketAddr};

        let test_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)), 8080);
        request.extensions_mut().insert(ConnectInfo(test_addr));

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to execute request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read response body")
            .to_bytes();

        TestResponse {
            status,
            body: body_bytes.to_vec(),
            headers,
        }
    }

    /// Send a GET request
    pub async fn get(&self, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .header("x-forwarded-for", "127.0.0.1")
            .body(Body::empty())
            .expect("Failed to build request");

        self.request(request).await
    }

    /// Send a POST request with JSON body
    pub async fn post_json<T: serde::Serialize>(&self, uri: &str, body: &T) -> TestResponse {
        let json_body = serde_json::to_string(body).expect("Failed to serialize body");

        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("x-forwarded-for", "127.0.0.1")
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.request(request).await
    }
}

/// Test response wrapper
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub headers: axum::http::HeaderMap,
}

impl TestResponse {
    /// Get response body as string
    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("Response body is not valid UTF-8")
    }

    /// Parse response body as JSON
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Assert status code
    pub fn assert_status(&self, expected: StatusCode) {
        assert_eq!(
            self.status,
            expected,
            "Expected status {}, got {}. Body: {}",
            expected,
            self.status,
            self.text()
        );
    }
}

/// Database test helper functions
pub mod db {
    use sqlx::PgPool;
    use zb_db::{
        models::{NewQuestion, Question, QuestionAnswer},
        repositories::{attempt, mastery, question, topic, user},
    };

    /// Create a child user and return its id
    pub async fn create_user(pool: &PgPool) -> anyhow::Result<i64> {
        Ok(user::create_user(pool, "child", None, Some(6)).await?)
    }

    /// Create a numeric question with answer `1000円` in the given subject
    pub async fn create_question(pool: &PgPool, subject: &str) -> anyhow::Result<Question> {
        let new_question = NewQuestion {
            subject: subject.to_string(),
            topic: "割合".to_string(),
            stem: "仕入れ値に20%の利益で販売価格は1,200円。仕入れ値は？".to_string(),
            choices: None,
            answer: QuestionAnswer {
                value: "1000".to_string(),
                variants: vec!["1,000".to_string()],
                unit: Some("円".to_string()),
            },
            hint: Some("販売=仕入×1.2".to_string()),
            explanation: None,
            difficulty: 1.0,
            source: Some("test".to_string()),
        };

        Ok(question::insert_question(pool, &new_question).await?)
    }

    /// Create a topic in the given subject and return its id
    pub async fn create_topic(pool: &PgPool, subject: &str, name: &str) -> anyhow::Result<i64> {
        Ok(topic::upsert_topic(pool, subject, Some("テスト"), name, "basic").await?)
    }

    pub async fn count_attempts(
        pool: &PgPool,
        user_id: i64,
        question_id: i64,
    ) -> anyhow::Result<usize> {
        Ok(attempt::list_attempts(pool, user_id, question_id).await?.len())
    }

    pub async fn count_mastery(
        pool: &PgPool,
        user_id: i64,
        question_id: i64,
    ) -> anyhow::Result<usize> {
        let row = mastery::get_mastery(pool, user_id, question_id).await?;
        Ok(usize::from(row.is_some()))
    }

    /// Move a mastery row's review date into the past
    pub async fn make_due(pool: &PgPool, user_id: i64, question_id: i64) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE mastery
            SET last_review_at = NOW() - INTERVAL '3 days',
                next_review_at = NOW() - INTERVAL '1 hour'
            WHERE user_id = $1 AND question_id = $2
            "#,
        )
        .bind(user_id)
        .bind(question_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Delete a user (for test cleanup); cascades to attempts, mastery and test results
    pub async fn delete_user(pool: &PgPool, user_id: i64) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            DELETE FROM users WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Delete every question of a subject (for test cleanup)
    pub async fn delete_subject(pool: &PgPool, subject: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            DELETE FROM questions WHERE subject = $1
            "#,
        )
        .bind(subject)
        .execute(pool)
        .await?;
        sqlx::query(
            r#"
            DELETE FROM topics WHERE subject = $1
            "#,
        )
        .bind(subject)
        .execute(pool)
        .await?;

        Ok(())
    }
}

/// Test data helpers
pub mod test_data {
    /// Generate a unique subject name for test isolation
    pub fn unique_subject(base: &str) -> String {
        let uuid = uuid::Uuid::new_v4();
        format!("{}-{}", base, &uuid.to_string()[..8])
    }
}
