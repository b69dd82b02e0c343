//! Top tier: promoted posts moving through tagging, embedding/novelty,
//! shortening, and final aggregation.

use anyhow::Result;
use newswire_common::{Facets, TopState, FACET_COUNT};
use sqlx::PgPool;

use crate::novelty::{NoveltyScores, PriorVectors};
use crate::stages::shortener::ShortenOutcome;

use super::raw::ScoredRawPost;

#[derive(Debug, Clone)]
pub struct PendingTopPost {
    pub id: i64,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct TaggedTopPost {
    pub id: i64,
    pub facets: Facets,
}

#[derive(Debug, Clone)]
pub struct ScoredTopPost {
    pub id: i64,
    pub content: String,
}

/// Everything the finalizer needs for the final-score formula and the
/// top-top handoff.
#[derive(Debug, Clone)]
pub struct ShortenedTopPost {
    pub id: i64,
    pub chat: String,
    pub link: String,
    pub content: String,
    pub short_text: Option<String>,
    pub essence_score: f32,
    pub coincide: f32,
    pub myth_score: f32,
}

/// Copy an accepted raw post into the top tier in its initial state.
pub async fn promote_from_raw(pool: &PgPool, raw: &ScoredRawPost) -> Result<i64> {
    let (id,) = sqlx::query_as::<_, (i64,)>(
        r#"
        INSERT INTO posts_top (raw_id, chat, link, content, essence_score, essence_explanation)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(raw.id)
    .bind(&raw.chat)
    .bind(&raw.link)
    .bind(&raw.content)
    .bind(raw.essence_score)
    .bind(&raw.essence_explanation)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

pub async fn claim_pending(pool: &PgPool, limit: i64) -> Result<Vec<PendingTopPost>> {
    let rows = sqlx::query_as::<_, (i64, String)>(
        r#"
        SELECT id, content
        FROM posts_top
        WHERE state = $1
        ORDER BY id
        LIMIT $2
        "#,
    )
    .bind(TopState::Pending.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, content)| PendingTopPost { id, content })
        .collect())
}

pub async fn store_facets(pool: &PgPool, id: i64, facets: &Facets) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE posts_top SET
            state = $7,
            subject = $2,
            action = $3,
            time_place = $4,
            reason = $5,
            source = $6
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&facets.subject)
    .bind(&facets.action)
    .bind(&facets.time_place)
    .bind(&facets.reason)
    .bind(&facets.source)
    .bind(TopState::Tagged.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn claim_tagged(pool: &PgPool, limit: i64) -> Result<Vec<TaggedTopPost>> {
    type Row = (
        i64,
        Option<String>,
        Option<String>,
        Option<String>,
        Option<String>,
        Option<String>,
    );
    let rows = sqlx::query_as::<_, Row>(
        r#"
        SELECT id, subject, action, time_place, reason, source
        FROM posts_top
        WHERE state = $1
        ORDER BY id
        LIMIT $2
        "#,
    )
    .bind(TopState::Tagged.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, subject, action, time_place, reason, source)| TaggedTopPost {
            id,
            facets: Facets { subject, action, time_place, reason, source },
        })
        .collect())
}

/// The novelty lookback window: the most recent accepted rows older than
/// the current one, with all five vectors present.
pub async fn fetch_prior_vectors(
    pool: &PgPool,
    before_id: i64,
    window: i64,
) -> Result<Vec<PriorVectors>> {
    type Row = (i64, Vec<f32>, Vec<f32>, Vec<f32>, Vec<f32>, Vec<f32>);
    let rows = sqlx::query_as::<_, Row>(
        r#"
        SELECT id, vector1, vector2, vector3, vector4, vector5
        FROM posts_top
        WHERE id < $1
          AND state = $3
          AND vector1 IS NOT NULL
          AND vector2 IS NOT NULL
          AND vector3 IS NOT NULL
          AND vector4 IS NOT NULL
          AND vector5 IS NOT NULL
        ORDER BY id DESC
        LIMIT $2
        "#,
    )
    .bind(before_id)
    .bind(window)
    .bind(TopState::Accepted.as_str())
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, v1, v2, v3, v4, v5)| PriorVectors {
            id,
            vectors: [v1, v2, v3, v4, v5],
        })
        .collect())
}

/// Persist the facet vectors and novelty scores, advance to `scored`.
pub async fn store_novelty(
    pool: &PgPool,
    id: i64,
    vectors: &[Vec<f32>; FACET_COUNT],
    scores: &NoveltyScores,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE posts_top SET
            state = $13,
            vector1 = $2, vector2 = $3, vector3 = $4, vector4 = $5, vector5 = $6,
            facet_score1 = $7, facet_score2 = $8, facet_score3 = $9,
            facet_score4 = $10, facet_score5 = $11,
            coincide = $12
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&vectors[0])
    .bind(&vectors[1])
    .bind(&vectors[2])
    .bind(&vectors[3])
    .bind(&vectors[4])
    .bind(scores.facet_scores[0])
    .bind(scores.facet_scores[1])
    .bind(scores.facet_scores[2])
    .bind(scores.facet_scores[3])
    .bind(scores.facet_scores[4])
    .bind(scores.coincide)
    .bind(TopState::Scored.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn claim_scored(pool: &PgPool, limit: i64) -> Result<Vec<ScoredTopPost>> {
    let rows = sqlx::query_as::<_, (i64, String)>(
        r#"
        SELECT id, content
        FROM posts_top
        WHERE state = $1
        ORDER BY id
        LIMIT $2
        "#,
    )
    .bind(TopState::Scored.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, content)| ScoredTopPost { id, content })
        .collect())
}

pub async fn store_short(pool: &PgPool, id: i64, outcome: &ShortenOutcome) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE posts_top SET
            state = $5,
            short_text = $2,
            myth_score = $3,
            myth_explanation = $4
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&outcome.short_text)
    .bind(outcome.myth_score)
    .bind(&outcome.myth_explanation)
    .bind(TopState::Shortened.as_str())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn claim_shortened(pool: &PgPool, limit: i64) -> Result<Vec<ShortenedTopPost>> {
    type Row = (i64, String, String, String, Option<String>, f32, Option<f32>, Option<f32>);
    let rows = sqlx::query_as::<_, Row>(
        r#"
        SELECT id, chat, link, content, short_text, essence_score, coincide, myth_score
        FROM posts_top
        WHERE state = $1
        ORDER BY id
        LIMIT $2
        "#,
    )
    .bind(TopState::Shortened.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(
            |(id, chat, link, content, short_text, essence_score, coincide, myth_score)| {
                ShortenedTopPost {
                    id,
                    chat,
                    link,
                    content,
                    short_text,
                    essence_score,
                    coincide: coincide.unwrap_or(0.0),
                    myth_score: myth_score.unwrap_or(0.0),
                }
            },
        )
        .collect())
}

/// Record the final score and drive the row to its terminal state.
pub async fn finalize(pool: &PgPool, id: i64, final_score: f32, state: TopState) -> Result<()> {
    sqlx::query("UPDATE posts_top SET state = $2, final_score = $3 WHERE id = $1")
        .bind(id)
        .bind(state.as_str())
        .bind(final_score)
        .execute(pool)
        .await?;

    Ok(())
}
