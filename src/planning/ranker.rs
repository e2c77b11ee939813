//! Candidate discovery and ranking
//!
//! Runs the seed searches, scores every hit against mining keywords and
//! merges the hits into one deduplicated, deterministically ordered list.

use std::cmp::Reverse;
use std::collections::HashMap;

use futures::future::join_all;
use tracing::{debug, warn};

use super::types::{Candidate, GatherFailure};
use crate::wiki::{build_wiki_url, SearchHit, WikiApi};

/// Searches that bootstrap candidate discovery, in encounter order.
pub const SEED_QUERIES: [&str; 7] = [
    "EVE University mining guide",
    "Venture",
    "Mining frigates",
    "Career Agents mining",
    "Highsec mining safety",
    "Ore and mining mechanics",
    "Fitting ships for mining",
];

/// Hits requested per seed search.
pub const SEARCH_LIMIT: usize = 8;

/// Substring keywords and the points each is worth.
pub const RELEVANCE_KEYWORDS: [(&str, u32); 12] = [
    ("mining", 8),
    ("venture", 8),
    ("ore", 5),
    ("asteroid", 4),
    ("highsec", 4),
    ("safety", 4),
    ("career", 3),
    ("agent", 3),
    ("fit", 3),
    ("fitting", 3),
    ("barge", 2),
    ("alpha", 2),
];

/// Relevance of a page to new-player mining.
///
/// Keyword weights plus one point per query token found in the page's
/// title and description.
pub fn score_candidate(title: &str, description: &str, query: &str) -> u32 {
    let text = format!("{} {}", title, description).to_lowercase();

    let keyword_score: u32 = RELEVANCE_KEYWORDS
        .iter()
        .filter(|(keyword, _)| text.contains(keyword))
        .map(|(_, weight)| weight)
        .sum();

    let query = query.to_lowercase();
    let token_score = query
        .split_whitespace()
        .filter(|token| text.contains(token))
        .count() as u32;

    keyword_score + token_score
}

/// Candidates keyed by lowercased title.
#[derive(Debug, Default)]
pub struct CandidateSet {
    by_key: HashMap<String, Candidate>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one observation. A repeat title replaces the stored entry only
    /// when it scores strictly higher, so the first sighting wins ties.
    pub fn observe(&mut self, candidate: Candidate) {
        match self.by_key.get_mut(&candidate.key()) {
            None => {
                self.by_key.insert(candidate.key(), candidate);
            }
            Some(existing) if candidate.score > existing.score => {
                existing.score = candidate.score;
                existing.description = candidate.description;
                existing.url = candidate.url;
            }
            Some(_) => {}
        }
    }

    /// Score a search hit from `query` and merge it.
    pub fn observe_hit(&mut self, hit: SearchHit, query: &str) {
        let score = score_candidate(&hit.title, &hit.description, query);
        let url = if hit.url.is_empty() {
            build_wiki_url(&hit.title)
        } else {
            hit.url
        };
        self.observe(Candidate {
            title: hit.title,
            description: hit.description,
            url,
            score,
        });
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Score descending, then lowercased title ascending. Falls back to the
    /// overview page so the result is never empty.
    pub fn into_ranked(self) -> Vec<Candidate> {
        let mut ranked: Vec<(String, Candidate)> = self.by_key.into_iter().collect();
        ranked.sort_by(|(a_key, a), (b_key, b)| {
            (Reverse(a.score), a_key).cmp(&(Reverse(b.score), b_key))
        });

        let ranked: Vec<Candidate> = ranked.into_iter().map(|(_, c)| c).collect();
        if ranked.is_empty() {
            return vec![Candidate::overview()];
        }
        ranked
    }
}

/// Run every seed search and return the ranked candidates.
///
/// Searches are independent so they go out together; results are merged in
/// seed order. A failed search is tagged in `errors` and skipped.
pub async fn rank_candidates(api: &dyn WikiApi, errors: &mut Vec<GatherFailure>) -> Vec<Candidate> {
    let searches = SEED_QUERIES
        .iter()
        .map(|query| api.search(query, SEARCH_LIMIT));
    let results = join_all(searches).await;

    let mut set = CandidateSet::new();
    for (query, result) in SEED_QUERIES.iter().zip(results) {
        match result {
            Ok(hits) => {
                debug!("Seed search '{}' returned {} hit(s)", query, hits.len());
                for hit in hits {
                    set.observe_hit(hit, query);
                }
            }
            Err(e) => {
                warn!("Seed search '{}' failed: {}", query, e);
                errors.push(GatherFailure::Search(query.to_string()));
            }
        }
    }

    debug!("Ranking {} unique candidate(s)", set.len());
    set.into_ranked()
}
