//! Facet extraction: one gateway call producing up to five short tags.

use newswire_common::Facets;

use super::{StageScorer, TagSet};

/// Longest facet string persisted; the model occasionally rambles.
const MAX_TAG_LEN: usize = 100;

/// Extract facets for one post. A failed gateway call yields empty facets;
/// the caller still advances the row so one bad post cannot stall the tier.
pub async fn extract_facets(scorer: &dyn StageScorer, text: &str) -> Facets {
    match scorer.tags(text).await {
        Some(tags) => sanitize(tags),
        None => Facets::default(),
    }
}

fn sanitize(tags: TagSet) -> Facets {
    Facets {
        subject: clean_tag(tags.subject),
        action: clean_tag(tags.action),
        time_place: clean_tag(tags.time_place),
        reason: clean_tag(tags.reason),
        source: clean_tag(tags.source),
    }
}

/// Trim, drop empties, cap length at a char boundary.
fn clean_tag(tag: Option<String>) -> Option<String> {
    let tag = tag?;
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_TAG_LEN).collect())
}
