//! Types shared by the mining plan pipeline

use std::collections::BTreeMap;
use std::fmt;

use crate::wiki::build_wiki_url;

/// A wiki page considered relevant to the plan, with its relevance score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub description: String,
    pub url: String,
    pub score: u32,
}

impl Candidate {
    /// Dedup key: titles are unique case-insensitively.
    pub fn key(&self) -> String {
        self.title.to_lowercase()
    }

    /// Lowercased `title description`, the text keywords are matched against.
    pub fn haystack(&self) -> String {
        format!("{} {}", self.title, self.description).to_lowercase()
    }

    /// The generic overview page used whenever nothing better is known.
    pub fn overview() -> Self {
        Self {
            title: OVERVIEW_TITLE.to_string(),
            description: "General mining overview".to_string(),
            url: build_wiki_url(OVERVIEW_TITLE),
            score: 1,
        }
    }
}

pub const OVERVIEW_TITLE: &str = "Mining";

/// Opaque tag for one upstream call that failed during gathering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatherFailure {
    Search(String),
    Summary(String),
    Page(String),
    PageParse(String),
}

impl fmt::Display for GatherFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatherFailure::Search(query) => write!(f, "search:{}", query),
            GatherFailure::Summary(title) => write!(f, "summary:{}", title),
            GatherFailure::Page(title) => write!(f, "page:{}", title),
            GatherFailure::PageParse(title) => write!(f, "page-parse:{}", title),
        }
    }
}

/// Sections of the rendered plan, in rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlanSection {
    Profile,
    Day1,
    Week1,
    ShoppingList,
    SkillPriorities,
    Safety,
    IfThingsGoWrong,
    CheckIn,
    Sources,
}

impl PlanSection {
    pub const ALL: [PlanSection; 9] = [
        PlanSection::Profile,
        PlanSection::Day1,
        PlanSection::Week1,
        PlanSection::ShoppingList,
        PlanSection::SkillPriorities,
        PlanSection::Safety,
        PlanSection::IfThingsGoWrong,
        PlanSection::CheckIn,
        PlanSection::Sources,
    ];

    pub fn heading(&self) -> &'static str {
        match self {
            PlanSection::Profile => "Profile + Assumptions",
            PlanSection::Day1 => "Day 1 Plan",
            PlanSection::Week1 => "Week 1 Plan",
            PlanSection::ShoppingList => "Shopping List",
            PlanSection::SkillPriorities => "Skill Priorities (Alpha-safe)",
            PlanSection::Safety => "Safety and Loss Prevention",
            PlanSection::IfThingsGoWrong => "If Things Go Wrong",
            PlanSection::CheckIn => "Next Session Check-in Questions",
            PlanSection::Sources => "Sources",
        }
    }

    /// Keywords that make a candidate a fitting citation for this section.
    /// The Sources section lists pages itself and carries no citation.
    pub fn citation_keywords(&self) -> &'static [&'static str] {
        match self {
            PlanSection::Profile => &["mining", "career", "venture"],
            PlanSection::Day1 => &["career", "venture", "mining"],
            PlanSection::Week1 => &["mining", "ore", "venture"],
            PlanSection::ShoppingList => &["venture", "fitting", "mining"],
            PlanSection::SkillPriorities => &["skills", "mining", "alpha"],
            PlanSection::Safety => &["safety", "highsec", "gank"],
            PlanSection::IfThingsGoWrong => &["safety", "venture", "mining"],
            PlanSection::CheckIn => &["mining", "career"],
            PlanSection::Sources => &[],
        }
    }

    pub fn is_cited(&self) -> bool {
        !self.citation_keywords().is_empty()
    }
}

impl fmt::Display for PlanSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

/// Everything the composer needs from the wiki for one plan.
///
/// Built fresh for every request and dropped once the plan is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatheredContext {
    /// Score descending, then lowercased title ascending. Never empty after
    /// gathering.
    pub ranked_candidates: Vec<Candidate>,
    pub summaries: BTreeMap<String, String>,
    /// At most 600 characters each.
    pub page_snippets: BTreeMap<String, String>,
    pub errors: Vec<GatherFailure>,
    pub section_citations: BTreeMap<PlanSection, String>,
}

impl GatheredContext {
    /// True when any upstream call failed while gathering.
    pub fn partial(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Citation URL for a section, falling back to the overview page.
    pub fn citation(&self, section: PlanSection) -> String {
        self.section_citations
            .get(&section)
            .filter(|url| !url.is_empty())
            .cloned()
            .unwrap_or_else(|| build_wiki_url(OVERVIEW_TITLE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_tags() {
        assert_eq!(GatherFailure::Search("Venture".into()).to_string(), "search:Venture");
        assert_eq!(
            GatherFailure::PageParse("Ore".into()).to_string(),
            "page-parse:Ore"
        );
    }

    #[test]
    fn test_section_order_and_citations() {
        let headings: Vec<_> = PlanSection::ALL.iter().map(|s| s.heading()).collect();
        assert_eq!(headings.first(), Some(&"Profile + Assumptions"));
        assert_eq!(headings.last(), Some(&"Sources"));
        assert_eq!(PlanSection::ALL.iter().filter(|s| s.is_cited()).count(), 8);
    }

    #[test]
    fn test_citation_falls_back_to_overview() {
        let mut ctx = GatheredContext::default();
        ctx.section_citations
            .insert(PlanSection::Day1, String::new());
        assert_eq!(
            ctx.citation(PlanSection::Day1),
            "https://wiki.eveuniversity.org/wiki/Mining"
        );
        assert!(!ctx.partial());
    }
}
