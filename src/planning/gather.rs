//! Wiki context gathering for the mining plan
//!
//! Phases run strictly in order (rank, summarize, snippet, cite). Calls
//! inside a phase are independent and go out concurrently. No failure is
//! fatal: each one is tagged and the phase carries on with what it has.

use std::collections::BTreeMap;

use futures::future::join_all;
use tracing::{debug, info, warn};

use super::ranker::rank_candidates;
use super::types::{Candidate, GatherFailure, GatheredContext, PlanSection};
use crate::wiki::html::html_to_plain_text;
use crate::wiki::{Extract, WikiApi, WikiError};

/// Candidates whose intro extract is fetched.
pub const SUMMARY_COUNT: usize = 8;
/// Candidates eligible for a full-page snippet.
pub const SNIPPET_COUNT: usize = 3;
/// Summaries shorter than this trigger a full-page fetch.
pub const THIN_SUMMARY_CHARS: usize = 180;
pub const SNIPPET_MAX_CHARS: usize = 600;

/// Retrieve, rank and summarize the mining pages for one plan.
pub async fn gather_mining_context(api: &dyn WikiApi) -> GatheredContext {
    let mut errors = Vec::new();

    let ranked_candidates = rank_candidates(api, &mut errors).await;
    let summaries = fetch_summaries(api, &ranked_candidates, &mut errors).await;
    let page_snippets = fetch_snippets(api, &ranked_candidates, &summaries, &mut errors).await;
    let section_citations = assign_citations(&ranked_candidates);

    if errors.is_empty() {
        info!(
            "Gathered {} candidate(s), {} summaries, {} snippet(s)",
            ranked_candidates.len(),
            summaries.len(),
            page_snippets.len()
        );
    } else {
        warn!(
            "Gathered partial context with {} failure(s): {}",
            errors.len(),
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    GatheredContext {
        ranked_candidates,
        summaries,
        page_snippets,
        errors,
        section_citations,
    }
}

async fn fetch_summaries(
    api: &dyn WikiApi,
    ranked: &[Candidate],
    errors: &mut Vec<GatherFailure>,
) -> BTreeMap<String, String> {
    let top = &ranked[..ranked.len().min(SUMMARY_COUNT)];
    let results = join_all(top.iter().map(|c| api.get_extract(&c.title))).await;

    let mut summaries = BTreeMap::new();
    for (candidate, result) in top.iter().zip(results) {
        match result {
            Ok(Extract::Found {
                extract: Some(text),
                ..
            }) => {
                let text = text.trim();
                if !text.is_empty() {
                    summaries.insert(candidate.title.clone(), text.to_string());
                }
            }
            Ok(_) => debug!("No extract for '{}'", candidate.title),
            Err(e) => {
                warn!("Summary fetch for '{}' failed: {}", candidate.title, e);
                errors.push(GatherFailure::Summary(candidate.title.clone()));
            }
        }
    }
    summaries
}

async fn fetch_snippets(
    api: &dyn WikiApi,
    ranked: &[Candidate],
    summaries: &BTreeMap<String, String>,
    errors: &mut Vec<GatherFailure>,
) -> BTreeMap<String, String> {
    let thin: Vec<&Candidate> = ranked
        .iter()
        .take(SNIPPET_COUNT)
        .filter(|c| {
            summaries
                .get(&c.title)
                .map_or(true, |s| s.chars().count() < THIN_SUMMARY_CHARS)
        })
        .collect();

    let results = join_all(thin.iter().map(|c| api.get_rendered_page(&c.title))).await;

    let mut snippets = BTreeMap::new();
    for (candidate, result) in thin.into_iter().zip(results) {
        match result {
            Ok(page) => {
                let text = html_to_plain_text(&page.html);
                let snippet: String = text.trim().chars().take(SNIPPET_MAX_CHARS).collect();
                snippets.insert(candidate.title.clone(), snippet);
            }
            Err(WikiError::Parse(reason)) => {
                warn!("Page '{}' came back malformed: {}", candidate.title, reason);
                errors.push(GatherFailure::PageParse(candidate.title.clone()));
            }
            Err(e) => {
                warn!("Page fetch for '{}' failed: {}", candidate.title, e);
                errors.push(GatherFailure::Page(candidate.title.clone()));
            }
        }
    }
    snippets
}

/// One citation rule: the first candidate matching any keyword wins.
struct CitationRule {
    section: PlanSection,
    keywords: &'static [&'static str],
}

fn citation_rules() -> impl Iterator<Item = CitationRule> {
    PlanSection::ALL
        .into_iter()
        .filter(PlanSection::is_cited)
        .map(|section| CitationRule {
            section,
            keywords: section.citation_keywords(),
        })
}

/// Pick a citation URL for every cited section, in rank order, falling back
/// to the top candidate.
pub fn assign_citations(ranked: &[Candidate]) -> BTreeMap<PlanSection, String> {
    let fallback = ranked.first().map(|c| c.url.clone()).unwrap_or_default();
    let haystacks: Vec<(String, &str)> = ranked
        .iter()
        .map(|c| (c.haystack(), c.url.as_str()))
        .collect();

    citation_rules()
        .map(|rule| {
            let url = haystacks
                .iter()
                .find(|(haystack, _)| rule.keywords.iter().any(|k| haystack.contains(k)))
                .map(|(_, url)| url.to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| fallback.clone());
            (rule.section, url)
        })
        .collect()
}
