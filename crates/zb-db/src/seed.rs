//! Idempotent reference data.
//!
//! Each group is only written when its table is still empty, so the seed can run
//! on every deploy without duplicating rows or overwriting edits made later.

use anyhow::Context;
use sqlx::PgPool;

use crate::{
    models::{NewQuestion, QuestionAnswer},
    repositories::{question, topic},
};

/// Id of the demo student every anonymous request acts as.
pub const DEMO_USER_ID: i64 = 1;

struct TopicSeed {
    subject: &'static str,
    domain: &'static str,
    name: &'static str,
    difficulty: &'static str,
    prerequisites: &'static [&'static str],
}

const TOPICS: &[TopicSeed] = &[
    // 算数
    TopicSeed {
        subject: "算数",
        domain: "数と計算",
        name: "整数・小数・分数",
        difficulty: "basic",
        prerequisites: &[],
    },
    TopicSeed {
        subject: "算数",
        domain: "数と計算",
        name: "四則混合・通分・約分",
        difficulty: "basic",
        prerequisites: &["整数・小数・分数"],
    },
    TopicSeed {
        subject: "算数",
        domain: "変化と関係",
        name: "割合",
        difficulty: "basic",
        prerequisites: &["四則混合・通分・約分"],
    },
    TopicSeed {
        subject: "算数",
        domain: "変化と関係",
        name: "割合（応用）",
        difficulty: "applied",
        prerequisites: &["割合"],
    },
    TopicSeed {
        subject: "算数",
        domain: "変化と関係",
        name: "比",
        difficulty: "applied",
        prerequisites: &["割合"],
    },
    TopicSeed {
        subject: "算数",
        domain: "変化と関係",
        name: "速さ",
        difficulty: "applied",
        prerequisites: &["比"],
    },
    TopicSeed {
        subject: "算数",
        domain: "変化と関係",
        name: "損益・連続増減",
        difficulty: "advanced",
        prerequisites: &["割合（応用）"],
    },
    // 理科
    TopicSeed {
        subject: "理科",
        domain: "物理",
        name: "てこのつり合い",
        difficulty: "basic",
        prerequisites: &[],
    },
    TopicSeed {
        subject: "理科",
        domain: "物理",
        name: "電気回路",
        difficulty: "applied",
        prerequisites: &[],
    },
    TopicSeed {
        subject: "理科",
        domain: "化学",
        name: "気体の性質",
        difficulty: "basic",
        prerequisites: &[],
    },
    TopicSeed {
        subject: "理科",
        domain: "化学",
        name: "水溶液の性質",
        difficulty: "basic",
        prerequisites: &[],
    },
    TopicSeed {
        subject: "理科",
        domain: "化学",
        name: "燃焼",
        difficulty: "applied",
        prerequisites: &["気体の性質"],
    },
    TopicSeed {
        subject: "理科",
        domain: "生物",
        name: "植物のつくり",
        difficulty: "basic",
        prerequisites: &[],
    },
    TopicSeed {
        subject: "理科",
        domain: "地学",
        name: "天体の動き",
        difficulty: "applied",
        prerequisites: &[],
    },
    // 社会
    TopicSeed {
        subject: "社会",
        domain: "地理",
        name: "日本の地形",
        difficulty: "basic",
        prerequisites: &[],
    },
    TopicSeed {
        subject: "社会",
        domain: "地理",
        name: "日本の産業",
        difficulty: "applied",
        prerequisites: &["日本の地形"],
    },
    TopicSeed {
        subject: "社会",
        domain: "歴史",
        name: "江戸時代",
        difficulty: "basic",
        prerequisites: &[],
    },
    TopicSeed {
        subject: "社会",
        domain: "歴史",
        name: "明治維新",
        difficulty: "applied",
        prerequisites: &["江戸時代"],
    },
    TopicSeed {
        subject: "社会",
        domain: "公民",
        name: "日本国憲法",
        difficulty: "basic",
        prerequisites: &[],
    },
    TopicSeed {
        subject: "社会",
        domain: "公民",
        name: "三権分立",
        difficulty: "applied",
        prerequisites: &["日本国憲法"],
    },
];

fn sample_questions() -> Vec<NewQuestion> {
    vec![
        NewQuestion {
            subject: "算数".to_string(),
            topic: "割合".to_string(),
            stem: "仕入れ値に20%の利益で販売価格は1,200円。仕入れ値は？".to_string(),
            choices: None,
            answer: QuestionAnswer {
                value: "1000".to_string(),
                variants: vec!["1,000".to_string()],
                unit: Some("円".to_string()),
            },
            hint: Some("販売=仕入×1.2".to_string()),
            explanation: Some("利益率20%は1.2倍。1200÷1.2=1000。式: 販売=原価×1.2".to_string()),
            difficulty: 1.0,
            source: Some("seed".to_string()),
        },
        NewQuestion {
            subject: "算数".to_string(),
            topic: "割合（応用）".to_string(),
            stem: "原価の25%利益で販売1,250円。原価は？".to_string(),
            choices: None,
            answer: QuestionAnswer {
                value: "1000".to_string(),
                variants: vec!["1,000".to_string()],
                unit: Some("円".to_string()),
            },
            hint: Some("販売=原価×1.25".to_string()),
            explanation: Some("利益率25%は1.25倍。1250÷1.25=1000。式: 販売=原価×1.25".to_string()),
            difficulty: 2.0,
            source: Some("seed".to_string()),
        },
        NewQuestion {
            subject: "国語".to_string(),
            topic: "漢字の読み書き".to_string(),
            stem: "次の漢字の読みをひらがなで書きなさい：『情報』".to_string(),
            choices: None,
            answer: QuestionAnswer {
                value: "じょうほう".to_string(),
                variants: Vec::new(),
                unit: None,
            },
            hint: Some("コンピュータで扱う○○".to_string()),
            explanation: None,
            difficulty: 1.0,
            source: Some("seed".to_string()),
        },
    ]
}

/// Counts of rows written by [`seed_all`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: u64,
    pub questions: u64,
    pub topics: u64,
    pub dependencies: u64,
}

/// Seed every reference group. Safe to call repeatedly.
pub async fn seed_all(pool: &PgPool) -> anyhow::Result<SeedReport> {
    let users = seed_demo_user(pool).await.context("failed to seed demo user")?;
    let questions = seed_questions(pool).await.context("failed to seed questions")?;
    let (topics, dependencies) = seed_topics(pool).await.context("failed to seed topics")?;

    Ok(SeedReport {
        users,
        questions,
        topics,
        dependencies,
    })
}

async fn seed_demo_user(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO users (id, role)
            VALUES ($1, 'child')
            ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(DEMO_USER_ID)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    // Explicit id insert does not advance the sequence
    sqlx::query(
        // language=PostgreSQL
        r#"
            SELECT setval(pg_get_serial_sequence('users', 'id'), (SELECT MAX(id) FROM users))
        "#,
    )
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(inserted)
}

async fn seed_questions(pool: &PgPool) -> Result<u64, sqlx::Error> {
    if question::count_questions(pool).await? > 0 {
        tracing::debug!("Questions already present, skipping question seed");
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut inserted = 0;
    for new_question in sample_questions() {
        question::insert_question(&mut *tx, &new_question).await?;
        inserted += 1;
    }
    tx.commit().await?;

    Ok(inserted)
}

async fn seed_topics(pool: &PgPool) -> Result<(u64, u64), sqlx::Error> {
    let existing: i64 = sqlx::query_scalar(
        // language=PostgreSQL
        r#"
            SELECT COUNT(*) FROM topics
        "#,
    )
    .fetch_one(pool)
    .await?;

    if existing > 0 {
        tracing::debug!("Topics already present, skipping topic seed");
        return Ok((0, 0));
    }

    let mut tx = pool.begin().await?;
    let mut ids = Vec::with_capacity(TOPICS.len());
    for seed in TOPICS {
        let id = topic::upsert_topic(
            &mut *tx,
            seed.subject,
            Some(seed.domain),
            seed.name,
            seed.difficulty,
        )
        .await?;
        ids.push(((seed.subject, seed.name), id));
    }

    let mut dependencies = 0;
    for (seed, (_, topic_id)) in TOPICS.iter().zip(&ids) {
        for prerequisite in seed.prerequisites {
            let Some((_, prerequisite_id)) = ids
                .iter()
                .find(|((subject, name), _)| *subject == seed.subject && name == prerequisite)
            else {
                tracing::warn!(
                    "Unknown prerequisite '{}' for topic '{}', skipping",
                    prerequisite,
                    seed.name
                );
                continue;
            };
            topic::add_dependency(&mut *tx, *topic_id, *prerequisite_id).await?;
            dependencies += 1;
        }
    }
    tx.commit().await?;

    Ok((ids.len() as u64, dependencies))
}
