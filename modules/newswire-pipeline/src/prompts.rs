//! System prompts and call parameters for every scoring stage.
//!
//! Thresholds live in config, not here; a prompt spec only fixes the
//! instructions, sampling temperature, and token budget for one stage.

/// Instructions, temperature, and token budget for one gateway call.
#[derive(Debug, Clone, Copy)]
pub struct PromptSpec {
    pub system: &'static str,
    pub temperature: f32,
    pub max_tokens: u32,
}

pub const INITIAL_FILTER: PromptSpec = PromptSpec {
    system: "You are the admission filter of a news curation pipeline. \
Decide whether the message is a substantive news item at all: reject \
advertising, giveaways, job postings, personal chatter, reposted memes, \
and bare link dumps. Report a boolean verdict and one short sentence \
explaining it.",
    temperature: 0.3,
    max_tokens: 500,
};

pub const CONTEXT_FILTER: PromptSpec = PromptSpec {
    system: "You score how relevant a news message is to the feed's \
editorial context: current public events with identifiable actors and \
consequences. Score from 0 (off-topic) to 10 (squarely relevant) and \
explain the score in one or two sentences.",
    temperature: 0.3,
    max_tokens: 500,
};

pub const ESSENCE_FILTER: PromptSpec = PromptSpec {
    system: "You assess the substance of a news message. Report two scores \
from 0 to 10: `score`, the overall newsworthiness of the item, and \
`max_score`, the strength of its single strongest newsworthy element. \
Explain briefly what drives both numbers.",
    temperature: 0.3,
    max_tokens: 700,
};

pub const TAG_EXTRACTION: PromptSpec = PromptSpec {
    system: "Extract up to five short semantic facets from the news \
message: subject (who or what), action (what happened), time_place (when \
and where), reason (why), and source (who reports it). Each facet is a \
phrase of a few words. Omit a facet entirely when the text carries no \
information for it; never invent one.",
    temperature: 0.2,
    max_tokens: 500,
};

pub const SHORTEN: PromptSpec = PromptSpec {
    system: "Rewrite the news message as a compact display text of at most \
three sentences, keeping the concrete facts and dropping everything \
else.",
    temperature: 0.1,
    max_tokens: 500,
};

pub const MYTH: PromptSpec = PromptSpec {
    system: "Score the viral potential of this short news text from 0 to \
10: how strongly it resembles a story people retell: conflict, irony, a \
vivid protagonist, an unexpected turn. Explain the score in one \
sentence.",
    temperature: 0.1,
    max_tokens: 2000,
};
