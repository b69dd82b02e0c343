//! Top-top tier: accepted posts awaiting commentary.

use anyhow::Result;
use newswire_common::{CommentaryCandidate, TopTopState};
use sqlx::PgPool;

use super::top::ShortenedTopPost;

#[derive(Debug, Clone)]
pub struct PendingTopTopPost {
    pub id: i64,
    pub content: String,
    pub final_score: f32,
}

/// Copy an accepted top post into the top-top tier. The short text falls
/// back to the full content when the shortener failed for the row.
pub async fn insert_from_top(
    pool: &PgPool,
    top: &ShortenedTopPost,
    final_score: f32,
) -> Result<i64> {
    let short_text = top.short_text.as_deref().unwrap_or(&top.content);

    let (id,) = sqlx::query_as::<_, (i64,)>(
        r#"
        INSERT INTO posts_top_top (top_id, chat, link, content, short_text, final_score)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id
        "#,
    )
    .bind(top.id)
    .bind(&top.chat)
    .bind(&top.link)
    .bind(&top.content)
    .bind(short_text)
    .bind(final_score)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

pub async fn claim_pending(pool: &PgPool, limit: i64) -> Result<Vec<PendingTopTopPost>> {
    let rows = sqlx::query_as::<_, (i64, String, f32)>(
        r#"
        SELECT id, content, final_score
        FROM posts_top_top
        WHERE state = $1
        ORDER BY id
        LIMIT $2
        "#,
    )
    .bind(TopTopState::Pending.as_str())
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(id, content, final_score)| PendingTopTopPost { id, content, final_score })
        .collect())
}

/// Persist the winning candidate and drive the row terminal.
pub async fn store_commentary(
    pool: &PgPool,
    id: i64,
    best: &CommentaryCandidate,
    total_score: f32,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE posts_top_top SET
            state = $6,
            comment_author = $2,
            comment_text = $3,
            comment_score = $4,
            total_score = $5
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&best.author)
    .bind(&best.text)
    .bind(best.score)
    .bind(total_score)
    .bind(TopTopState::Commented.as_str())
    .execute(pool)
    .await?;

    Ok(())
}
