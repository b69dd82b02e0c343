//! Raw tier: ingested posts, filter verdicts, and promotion handoff.

use anyhow::Result;
use chrono::{DateTime, Utc};
use newswire_common::RawState;
use sqlx::PgPool;

use crate::stages::FilterOutcome;

/// A freshly ingested post awaiting the filter funnel.
#[derive(Debug, Clone)]
pub struct RawPost {
    pub id: i64,
    pub chat: String,
    pub link: String,
    pub content: String,
}

/// A fully filtered post awaiting the raw finisher's verdict.
#[derive(Debug, Clone)]
pub struct ScoredRawPost {
    pub id: i64,
    pub chat: String,
    pub link: String,
    pub content: String,
    pub passed: bool,
    pub essence_score: f32,
    pub essence_explanation: String,
}

/// Entry point for the upstream ingester. `posted_at` is the post's
/// original channel timestamp, not the ingestion time.
pub async fn insert(
    pool: &PgPool,
    chat: &str,
    link: &str,
    content: &str,
    posted_at: DateTime<Utc>,
) -> Result<i64> {
    let (id,) = sqlx::query_as::<_, (i64,)>(
        r#"
        INSERT INTO posts (chat, link, content, posted_at)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(chat)
    .bind(link)
    .bind(content)
    .bind(posted_at)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

pub async fn claim_ingested(pool: &PgPool, limit: i64) -> Result<Vec<RawPost>> {
    let rows = sqlx::query_as::<_, (i64, String, String, String)>(
        r#"
        SELECT id, chat, link, content
        FROM posts
        WHERE state = $1
        ORDER BY id
        LIMIT $2
        "#,
    )
    .bind(RawState::Ingested.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, chat, link, content)| RawPost { id, chat, link, content })
        .collect())
}

/// Persist the funnel verdicts and advance the row to `scored`.
pub async fn store_outcome(pool: &PgPool, id: i64, outcome: &FilterOutcome) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE posts SET
            state = $11,
            initial_passed = $2,
            initial_explanation = $3,
            context_passed = $4,
            context_score = $5,
            context_explanation = $6,
            essence_passed = $7,
            essence_score = $8,
            essence_max = $9,
            essence_explanation = $10
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(outcome.initial_passed)
    .bind(&outcome.initial_explanation)
    .bind(outcome.context_passed)
    .bind(outcome.context_score)
    .bind(&outcome.context_explanation)
    .bind(outcome.essence_passed)
    .bind(outcome.essence_score)
    .bind(outcome.essence_max)
    .bind(&outcome.essence_explanation)
    .bind(RawState::Scored.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn claim_scored(pool: &PgPool, limit: i64) -> Result<Vec<ScoredRawPost>> {
    let rows = sqlx::query_as::<_, (i64, String, String, String, bool, bool, bool, f32, String)>(
        r#"
        SELECT id, chat, link, content,
               initial_passed, context_passed, essence_passed,
               essence_score, essence_explanation
        FROM posts
        WHERE state = $1
        ORDER BY id
        LIMIT $2
        "#,
    )
    .bind(RawState::Scored.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(
            |(id, chat, link, content, initial, context, essence, essence_score, essence_explanation)| {
                ScoredRawPost {
                    id,
                    chat,
                    link,
                    content,
                    passed: initial && context && essence,
                    essence_score,
                    essence_explanation,
                }
            },
        )
        .collect())
}

/// Drive a scored row to its terminal state.
pub async fn finish(pool: &PgPool, id: i64, state: RawState) -> Result<()> {
    sqlx::query("UPDATE posts SET state = $2 WHERE id = $1")
        .bind(id)
        .bind(state.as_str())
        .execute(pool)
        .await?;

    Ok(())
}
