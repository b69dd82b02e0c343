use serde::{Deserialize, Serialize};

use crate::error::NewswireError;

/// Dimension of the facet embedding vectors. The all-zero vector of this
/// length is the sentinel for "nothing to embed" and is excluded from
/// similarity comparisons.
pub const EMBEDDING_DIM: usize = 384;

/// Number of semantic facets extracted per post.
pub const FACET_COUNT: usize = 5;

// --- Row lifecycle states ---
//
// One explicit state per row replaces the original's independent
// analyzed/finished/taged/final booleans. Terminal states are entered
// exactly once and never left; claim queries only select non-terminal
// states, so a crashed batch is simply re-polled.

/// Raw tier: ingested posts awaiting the stage filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawState {
    /// Inserted by the ingester, not yet filtered.
    Ingested,
    /// All three stage filters recorded.
    Scored,
    /// Passed every filter; copied into the top tier. Terminal.
    Promoted,
    /// Failed a filter (or scoring failed). Terminal.
    Rejected,
}

impl RawState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RawState::Ingested => "ingested",
            RawState::Scored => "scored",
            RawState::Promoted => "promoted",
            RawState::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Result<Self, NewswireError> {
        match s {
            "ingested" => Ok(RawState::Ingested),
            "scored" => Ok(RawState::Scored),
            "promoted" => Ok(RawState::Promoted),
            "rejected" => Ok(RawState::Rejected),
            other => Err(NewswireError::InvalidState(other.to_string())),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RawState::Promoted | RawState::Rejected)
    }
}

/// Top tier: promoted posts moving through tagging, novelty scoring,
/// shortening, and final aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopState {
    Pending,
    /// Facets extracted.
    Tagged,
    /// Vectors, per-facet similarities, and the coincidence score recorded.
    Scored,
    /// Short text and myth score recorded.
    Shortened,
    /// Cleared the final threshold; copied into the top-top tier. Terminal.
    Accepted,
    /// Below the final threshold (or a stage failed). Terminal.
    Rejected,
}

impl TopState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopState::Pending => "pending",
            TopState::Tagged => "tagged",
            TopState::Scored => "scored",
            TopState::Shortened => "shortened",
            TopState::Accepted => "accepted",
            TopState::Rejected => "rejected",
        }
    }

    pub fn parse(s: &str) -> Result<Self, NewswireError> {
        match s {
            "pending" => Ok(TopState::Pending),
            "tagged" => Ok(TopState::Tagged),
            "scored" => Ok(TopState::Scored),
            "shortened" => Ok(TopState::Shortened),
            "accepted" => Ok(TopState::Accepted),
            "rejected" => Ok(TopState::Rejected),
            other => Err(NewswireError::InvalidState(other.to_string())),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TopState::Accepted | TopState::Rejected)
    }
}

/// Top-top tier: accepted posts awaiting commentary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopTopState {
    Pending,
    /// Candidates generated and the best one selected. Terminal.
    Commented,
}

impl TopTopState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopTopState::Pending => "pending",
            TopTopState::Commented => "commented",
        }
    }

    pub fn parse(s: &str) -> Result<Self, NewswireError> {
        match s {
            "pending" => Ok(TopTopState::Pending),
            "commented" => Ok(TopTopState::Commented),
            other => Err(NewswireError::InvalidState(other.to_string())),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TopTopState::Commented)
    }
}

// --- Facets ---

/// Up to five short semantic facets of a post. An absent facet (the model
/// found no information) maps to the zero vector downstream, never to a
/// real embedding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Facets {
    pub subject: Option<String>,
    pub action: Option<String>,
    pub time_place: Option<String>,
    pub reason: Option<String>,
    pub source: Option<String>,
}

impl Facets {
    pub fn as_array(&self) -> [Option<&str>; FACET_COUNT] {
        [
            self.subject.as_deref(),
            self.action.as_deref(),
            self.time_place.as_deref(),
            self.reason.as_deref(),
            self.source.as_deref(),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.as_array().iter().all(|f| f.is_none())
    }
}

// --- Commentary ---

/// One candidate commentary from the four-step generation chain.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentaryCandidate {
    pub author: String,
    pub text: String,
    pub score: f32,
}

impl CommentaryCandidate {
    /// The sentinel recorded when any chain step fails for a candidate.
    pub fn failed() -> Self {
        Self {
            author: "none".to_string(),
            text: String::new(),
            score: 0.0,
        }
    }

    /// Whether this is the failure sentinel rather than a generated draft.
    /// A successful chain pass always carries draft text; the author name
    /// alone is not a marker (a persona may be called anything).
    pub fn is_failed(&self) -> bool {
        self.text.is_empty()
    }
}
