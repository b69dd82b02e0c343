//! Idempotent table bootstrap, run once at binary startup. Retention and
//! cleanup are external jobs and never touch these statements.

use anyhow::Result;
use sqlx::PgPool;
use tracing::info;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS posts (
        id                  BIGSERIAL PRIMARY KEY,
        chat                TEXT NOT NULL,
        link                TEXT NOT NULL DEFAULT '',
        content             TEXT NOT NULL,
        posted_at           TIMESTAMPTZ NOT NULL DEFAULT now(),
        state               TEXT NOT NULL DEFAULT 'ingested',
        initial_passed      BOOLEAN,
        initial_explanation TEXT,
        context_passed      BOOLEAN,
        context_score       REAL,
        context_explanation TEXT,
        essence_passed      BOOLEAN,
        essence_score       REAL,
        essence_max         REAL,
        essence_explanation TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS posts_top (
        id                  BIGSERIAL PRIMARY KEY,
        raw_id              BIGINT NOT NULL,
        chat                TEXT NOT NULL,
        link                TEXT NOT NULL DEFAULT '',
        content             TEXT NOT NULL,
        posted_at           TIMESTAMPTZ NOT NULL DEFAULT now(),
        state               TEXT NOT NULL DEFAULT 'pending',
        essence_score       REAL NOT NULL,
        essence_explanation TEXT,
        subject             TEXT,
        action              TEXT,
        time_place          TEXT,
        reason              TEXT,
        source              TEXT,
        vector1             REAL[],
        vector2             REAL[],
        vector3             REAL[],
        vector4             REAL[],
        vector5             REAL[],
        facet_score1        REAL,
        facet_score2        REAL,
        facet_score3        REAL,
        facet_score4        REAL,
        facet_score5        REAL,
        coincide            REAL,
        short_text          TEXT,
        myth_score          REAL,
        myth_explanation    TEXT,
        final_score         REAL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS posts_top_top (
        id             BIGSERIAL PRIMARY KEY,
        top_id         BIGINT NOT NULL,
        chat           TEXT NOT NULL,
        link           TEXT NOT NULL DEFAULT '',
        content        TEXT NOT NULL,
        short_text     TEXT NOT NULL,
        posted_at      TIMESTAMPTZ NOT NULL DEFAULT now(),
        state          TEXT NOT NULL DEFAULT 'pending',
        final_score    REAL NOT NULL,
        comment_author TEXT,
        comment_text   TEXT,
        comment_score  REAL,
        total_score    REAL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS posts_state_idx ON posts (state)",
    "CREATE INDEX IF NOT EXISTS posts_top_state_idx ON posts_top (state)",
    "CREATE INDEX IF NOT EXISTS posts_top_top_state_idx ON posts_top_top (state)",
];

pub async fn run(pool: &PgPool) -> Result<()> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("table bootstrap complete");
    Ok(())
}
