//! Markdown rendering of the mining plan
//!
//! Pure and deterministic: the same profile and context always render the
//! same bytes. Every section is always emitted, whatever the context holds.

use super::profile::PlannerProfile;
use super::types::{GatheredContext, PlanSection, OVERVIEW_TITLE};
use crate::wiki::build_wiki_url;

pub const PLAN_TITLE: &str = "# Newbro Mining Copilot Plan";

pub const NORMAL_CONFIDENCE: &str =
    "Normal confidence: Wiki retrieval completed for core mining pages.";
pub const REDUCED_CONFIDENCE: &str = "Reduced confidence: some wiki pages timed out or failed; plan uses partial context and conservative defaults.";
pub const RETRY_NOTE: &str =
    "Note: Some wiki requests failed during planning. Retry for fresher/complete citations.";

/// Starting ISK at which the shopping list assumes a full starter fit.
pub const HIGH_CAPITAL_ISK: u64 = 2_000_000;
const MAX_SOURCES: usize = 10;

const LOSS_KEYWORDS: [&str; 5] = ["lost", "killed", "ganked", "destroyed", "death"];
const LOW_ISK_KEYWORDS: [&str; 4] = ["broke", "low isk", "no isk", "can't afford"];
const CONFUSION_KEYWORDS: [&str; 6] = [
    "stuck",
    "confused",
    "overwhelmed",
    "not sure",
    "dont know",
    "don't know",
];

const DAY1_TASKS: [&str; 5] = [
    "Complete the mining-focused Career Agent steps and accept all tutorial rewards.",
    "Acquire or verify access to a Venture hull and fit basic mining modules.",
    "Run a short high-sec mining session and record ISK earned, cargo cycles, and travel time.",
    "Create one bookmark for station tether/dock and one for your preferred belt entry.",
    "Set overview and d-scan habits before undocking again.",
];

const SIMPLIFIED_WEEK1_GOAL: &str =
    "Keep each session to three goals: undock safely, fill hold once, dock safely.";

/// What the player said about their last session, reduced to flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeSignals {
    pub recovery: bool,
    pub low_isk: bool,
    pub confusion: bool,
}

impl OutcomeSignals {
    pub fn from_outcome(recent_outcome: &str) -> Self {
        let outcome = recent_outcome.to_lowercase();
        let mentions = |keywords: &[&str]| keywords.iter().any(|k| outcome.contains(k));
        Self {
            recovery: mentions(&LOSS_KEYWORDS),
            low_isk: mentions(&LOW_ISK_KEYWORDS),
            confusion: mentions(&CONFUSION_KEYWORDS),
        }
    }
}

/// One fallback branch. Rules are tried in order and the first match wins.
pub struct FallbackRule {
    pub applies: fn(&OutcomeSignals) -> bool,
    pub guidance: &'static str,
}

fn after_loss(s: &OutcomeSignals) -> bool {
    s.recovery
}

fn after_low_isk(s: &OutcomeSignals) -> bool {
    s.low_isk
}

fn after_confusion(s: &OutcomeSignals) -> bool {
    s.confusion
}

fn always(_: &OutcomeSignals) -> bool {
    true
}

pub const FALLBACK_RULES: [FallbackRule; 4] = [
    FallbackRule {
        applies: after_loss,
        guidance: "You reported a ship loss. Switch to a safer high-sec loop for the next 2 sessions.",
    },
    FallbackRule {
        applies: after_low_isk,
        guidance: "You reported low ISK pressure. Run a low-capital recovery loop before upgrades.",
    },
    FallbackRule {
        applies: after_confusion,
        guidance: "You reported confusion/stall. Use a simplified 3-task session to regain momentum.",
    },
    FallbackRule {
        applies: always,
        guidance: "If progress stalls, fall back to a short high-sec routine and reassess after one session.",
    },
];

pub fn fallback_guidance(signals: &OutcomeSignals) -> &'static str {
    FALLBACK_RULES
        .iter()
        .find(|rule| (rule.applies)(signals))
        .map(|rule| rule.guidance)
        .unwrap_or(FALLBACK_RULES[FALLBACK_RULES.len() - 1].guidance)
}

/// Day 1 task count grows with session length.
pub fn day1_task_count(hours_per_session: f64) -> usize {
    if hours_per_session <= 1.0 {
        3
    } else if hours_per_session <= 2.5 {
        4
    } else {
        5
    }
}

pub fn week1_session_target(sessions_per_week: u8) -> u8 {
    sessions_per_week.min(7)
}

pub fn shopping_header(starting_isk: u64) -> &'static str {
    if starting_isk >= HIGH_CAPITAL_ISK {
        "Front-load a complete starter fit: a full Venture fitting plus spare replacements."
    } else if starting_isk == 0 {
        "Start with low-capital purchases only."
    } else {
        "Use your starting ISK to front-load survivability."
    }
}

pub fn confidence_line(context: &GatheredContext) -> &'static str {
    if context.partial() {
        REDUCED_CONFIDENCE
    } else {
        NORMAL_CONFIDENCE
    }
}

fn week1_items(profile: &PlannerProfile, signals: &OutcomeSignals) -> Vec<String> {
    let mut items = vec![
        format!(
            "Run {} mining sessions in high-sec with a short pre-undock safety check.",
            week1_session_target(profile.sessions_per_week)
        ),
        "After each session, review: ISK/hour, number of interruptions, and risk events."
            .to_string(),
        "Upgrade fitting only when you can afford replacement of your current ship and modules."
            .to_string(),
        "Practice route discipline: avoid predictable belts when local activity spikes."
            .to_string(),
        "At end of week, choose one improvement goal: cycle uptime, hauling efficiency, or survival habits."
            .to_string(),
    ];
    if signals.confusion {
        items[1] = SIMPLIFIED_WEEK1_GOAL.to_string();
    }
    items
}

/// Render the full plan.
pub fn compose_plan(profile: &PlannerProfile, context: &GatheredContext) -> String {
    let signals = OutcomeSignals::from_outcome(&profile.recent_outcome);
    let assets = match profile.current_assets.trim() {
        "" => "No assets provided",
        assets => assets,
    };
    let player_questions = profile.questions.trim();

    let mut doc = PlanDocument::new(context);
    doc.line(PLAN_TITLE);
    doc.blank();

    doc.section(PlanSection::Profile);
    doc.line(format!("- Experience level: {}", profile.experience_level.as_str()));
    doc.line(format!("- Risk preference: {}", profile.risk_preference.as_str()));
    doc.line(format!(
        "- Time budget: {:.1}h/session, {} sessions/week",
        profile.hours_per_session, profile.sessions_per_week
    ));
    doc.line(format!("- Starting ISK: {}", group_thousands(profile.starting_isk)));
    doc.line(format!("- Current assets: {}", assets));
    doc.line(format!("- Confidence: {}", confidence_line(context)));
    doc.cite(PlanSection::Profile);

    doc.section(PlanSection::Day1);
    doc.numbered(DAY1_TASKS.iter().take(day1_task_count(profile.hours_per_session)));
    doc.line("Completion criteria: one safe undock-to-dock mining run with notes captured.");
    doc.cite(PlanSection::Day1);

    doc.section(PlanSection::Week1);
    doc.numbered(week1_items(profile, &signals));
    doc.line("Completion criteria: at least 3 logged sessions and one deliberate fitting/behavior improvement.");
    doc.cite(PlanSection::Week1);

    doc.section(PlanSection::ShoppingList);
    doc.line(format!("- {}", shopping_header(profile.starting_isk)));
    doc.line("- Venture hull (or replacement hull if already owned).");
    doc.line("- Basic mining lasers and low-cost tank modules before yield upgrades.");
    doc.line("- Mobile reserve: keep enough ISK for one full replacement before risky upgrades.");
    doc.cite(PlanSection::ShoppingList);

    doc.section(PlanSection::SkillPriorities);
    doc.numbered([
        "Core fitting/powergrid/capacitor support to stabilize your fit.",
        "Mining throughput and mining frigate support skills.",
        "Basic navigation and survivability skills before yield-only specialization.",
        "Queue short skills first for immediate quality-of-life gains.",
    ]);
    doc.cite(PlanSection::SkillPriorities);

    doc.section(PlanSection::Safety);
    doc.numbered([
        "Mine in high-sec systems with manageable local traffic and clear docking options.",
        "Treat every undock as disposable: never fly what you cannot replace.",
        "Pre-align and monitor local/d-scan; dock immediately on suspicious spikes.",
        "Avoid autopilot hauling of ore value you cannot lose.",
    ]);
    doc.cite(PlanSection::Safety);

    doc.section(PlanSection::IfThingsGoWrong);
    doc.line(format!("- {}", fallback_guidance(&signals)));
    doc.line("- Recovery loop: one short safe run, sell ore, refill replacement fund, reassess fit.");
    doc.line("- If two losses happen in a row, downgrade risk and focus on safety drills only.");
    doc.cite(PlanSection::IfThingsGoWrong);

    doc.section(PlanSection::CheckIn);
    let mut questions = vec![
        "Did you complete a safe undock -> mine -> dock cycle?".to_string(),
        "What blocked you most: travel, fitting, safety pressure, or income?".to_string(),
        "Do you currently have replacement ISK for your active ship?".to_string(),
        "Which single change should the next plan optimize first?".to_string(),
    ];
    if !player_questions.is_empty() {
        questions.push(format!(
            "Player focus question to address next: {}",
            player_questions
        ));
    }
    doc.numbered(questions);
    doc.cite(PlanSection::CheckIn);

    doc.section(PlanSection::Sources);
    doc.sources();

    if context.partial() {
        doc.blank();
        doc.line(RETRY_NOTE);
    }

    doc.finish()
}

/// Line buffer with the plan's recurring shapes.
struct PlanDocument<'a> {
    context: &'a GatheredContext,
    lines: Vec<String>,
}

impl<'a> PlanDocument<'a> {
    fn new(context: &'a GatheredContext) -> Self {
        Self {
            context,
            lines: Vec::new(),
        }
    }

    fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn section(&mut self, section: PlanSection) {
        self.line(format!("## {}", section.heading()));
    }

    fn numbered<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for (idx, item) in items.into_iter().enumerate() {
            self.line(format!("{}. {}", idx + 1, item.as_ref()));
        }
    }

    /// Closing `Source:` line plus the blank separator.
    fn cite(&mut self, section: PlanSection) {
        self.line(format!("Source: {}", self.context.citation(section)));
        self.blank();
    }

    fn sources(&mut self) {
        let context = self.context;
        let mut seen: Vec<&str> = Vec::new();
        for candidate in context.ranked_candidates.iter().take(MAX_SOURCES) {
            let url = candidate.url.as_str();
            if url.is_empty() || seen.contains(&url) {
                continue;
            }
            seen.push(url);
            self.lines.push(format!("- {}: {}", candidate.title, url));
        }

        if seen.is_empty() {
            self.lines.push(format!(
                "- {}: {}",
                OVERVIEW_TITLE,
                build_wiki_url(OVERVIEW_TITLE)
            ));
        }
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}

/// `1234567` -> `1,234,567`
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
