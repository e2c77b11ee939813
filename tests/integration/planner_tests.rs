use eve_wiki_mcp::planning::{generate_plan, generate_plan_with_context, GatherFailure};
use eve_wiki_mcp::tools::{ToolContext, ToolRegistry};
use serde_json::json;

use crate::common::{FailureMode, FakeWiki, SEARCH_TITLES};

const SECTIONS: [&str; 9] = [
    "## Profile + Assumptions",
    "## Day 1 Plan",
    "## Week 1 Plan",
    "## Shopping List",
    "## Skill Priorities (Alpha-safe)",
    "## Safety and Loss Prevention",
    "## If Things Go Wrong",
    "## Next Session Check-in Questions",
    "## Sources",
];

async fn plan_tool(wiki: &FakeWiki, args: serde_json::Value) -> String {
    ToolRegistry::new()
        .execute("generate_newbro_mining_plan", args, &ToolContext::new(wiki))
        .await
        .unwrap()
}

fn numbered_items_after(plan: &str, heading: &str) -> usize {
    plan.lines()
        .skip_while(|line| *line != heading)
        .skip(1)
        .take_while(|line| !line.starts_with("## "))
        .filter(|line| line.chars().next().is_some_and(|c| c.is_ascii_digit()))
        .count()
}

#[tokio::test]
async fn test_happy_path_has_every_section_in_order() {
    let wiki = FakeWiki::new();
    let plan = plan_tool(&wiki, json!({})).await;

    assert!(plan.starts_with("# Newbro Mining Copilot Plan"));
    let mut last = 0;
    for section in SECTIONS {
        let pos = plan.find(section).unwrap_or_else(|| panic!("missing {}", section));
        assert!(pos >= last, "{} out of order", section);
        last = pos;
    }
    assert!(plan.contains("Normal confidence"));
    assert!(!plan.contains("Some wiki requests failed during planning"));
}

#[tokio::test]
async fn test_every_cited_section_has_a_wiki_source() {
    let wiki = FakeWiki::new();
    let plan = plan_tool(&wiki, json!({})).await;

    assert!(plan.matches("Source: https://wiki.eveuniversity.org/wiki/").count() >= 8);
}

#[tokio::test]
async fn test_sources_list_each_page_once() {
    let wiki = FakeWiki::new();
    let plan = plan_tool(&wiki, json!({})).await;

    let sources: Vec<&str> = plan
        .lines()
        .skip_while(|line| *line != "## Sources")
        .skip(1)
        .take_while(|line| line.starts_with("- "))
        .collect();
    assert_eq!(sources.len(), SEARCH_TITLES.len());
    for title in SEARCH_TITLES {
        assert_eq!(
            sources.iter().filter(|l| l.starts_with(&format!("- {}:", title))).count(),
            1
        );
    }
}

#[tokio::test]
async fn test_validation_messages() {
    let wiki = FakeWiki::new();

    let text = plan_tool(&wiki, json!({"hours_per_session": 0.1})).await;
    assert!(text.contains("hours_per_session must be between 0.5 and 8.0"));

    let text = plan_tool(&wiki, json!({"sessions_per_week": 20})).await;
    assert!(text.contains("sessions_per_week must be between 1 and 14"));

    let text = plan_tool(&wiki, json!({"experience_level": "returning"})).await;
    assert!(text.contains("experience_level must be one of: brand_new"));

    let text = plan_tool(&wiki, json!("not an object")).await;
    assert_eq!(text, "❌ arguments must be an object");

    // Rejected before any wiki traffic
    assert_eq!(wiki.calls(), 0);
}

#[tokio::test]
async fn test_low_capital_ship_loss_branch() {
    let wiki = FakeWiki::new();
    let plan = plan_tool(
        &wiki,
        json!({
            "starting_isk": 0,
            "recent_outcome": "I got ganked and my ship was destroyed."
        }),
    )
    .await
    .to_lowercase();

    assert!(plan.contains("low-capital"));
    assert!(plan.contains("ship loss"));
}

#[tokio::test]
async fn test_timeout_gives_degraded_plan() {
    let wiki = FakeWiki::with_mode(FailureMode::HighsecTimeout);
    let (plan, context) = generate_plan_with_context(&wiki, &json!({})).await.unwrap();

    assert!(plan.contains("## Day 1 Plan"));
    assert!(plan.contains("Reduced confidence"));
    assert!(plan.contains("Some wiki requests failed during planning"));
    assert_eq!(
        context.errors,
        vec![GatherFailure::Search("Highsec mining safety".to_string())]
    );
}

#[tokio::test]
async fn test_total_outage_still_renders() {
    let wiki = FakeWiki::with_mode(FailureMode::Everything);
    let (plan, context) = generate_plan_with_context(&wiki, &json!({})).await.unwrap();

    for section in SECTIONS {
        assert!(plan.contains(section));
    }
    assert_eq!(context.ranked_candidates.len(), 1);
    assert_eq!(context.ranked_candidates[0].title, "Mining");
    assert!(context.summaries.is_empty());
    assert!(context.page_snippets.is_empty());
    assert!(plan.contains("- Mining: https://wiki.eveuniversity.org/wiki/Mining"));
    assert!(context.errors.contains(&GatherFailure::Summary("Mining".to_string())));
    assert!(context.errors.contains(&GatherFailure::Page("Mining".to_string())));
    assert!(plan.ends_with("Retry for fresher/complete citations."));
}

#[tokio::test]
async fn test_player_question_adds_check_in_item() {
    let wiki = FakeWiki::new();
    let heading = "## Next Session Check-in Questions";

    let plan = plan_tool(&wiki, json!({})).await;
    assert_eq!(numbered_items_after(&plan, heading), 4);

    let plan = plan_tool(&wiki, json!({"questions": "Where do I sell ore?"})).await;
    assert_eq!(numbered_items_after(&plan, heading), 5);
    assert!(plan.contains("Player focus question to address next: Where do I sell ore?"));
}

#[tokio::test]
async fn test_same_inputs_same_plan() {
    let args = json!({"hours_per_session": 2.5, "sessions_per_week": 3, "starting_isk": 2500000});
    let first = generate_plan(&FakeWiki::new(), &args).await.unwrap();
    let second = generate_plan(&FakeWiki::new(), &args).await.unwrap();
    assert_eq!(first, second);
    assert!(first.contains("- Starting ISK: 2,500,000"));
}

#[tokio::test]
async fn test_snippets_are_gathered_for_thin_summaries() {
    let wiki = FakeWiki::new();
    let (_, context) = generate_plan_with_context(&wiki, &json!({})).await.unwrap();

    assert_eq!(context.summaries.len(), SEARCH_TITLES.len());
    assert_eq!(context.page_snippets.len(), 3);
    for snippet in context.page_snippets.values() {
        assert_eq!(
            snippet,
            "Detailed mining page content including fitting and safety notes."
        );
    }
}
