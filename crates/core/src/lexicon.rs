use crate::models::NewsItem;

/// Disruption-indicating keywords used to flag news as relevant to the plan.
pub const IMPACT_KEYWORDS: &[&str] = &[
    "cancellation",
    "delayed",
    "closed",
    "strike",
    "disruption",
    "postponed",
    "weather",
    "accident",
    "traffic",
    "storm",
    "roadblock",
];

pub const NO_RELEVANT_NEWS: &str = "No relevant news found that might affect your plans.";

/// Case-insensitive substring match over the concatenated title and summary.
pub fn is_disruptive(item: &NewsItem) -> bool {
    let haystack = format!("{}{}", item.title, item.summary).to_lowercase();
    IMPACT_KEYWORDS
        .iter()
        .any(|keyword| haystack.contains(keyword))
}

pub fn filter_disruptive(items: &[NewsItem]) -> Vec<&NewsItem> {
    items.iter().filter(|item| is_disruptive(item)).collect()
}

/// Renders the risk block: one bullet per matching article in fetch order,
/// or the fixed no-news sentence when nothing matches.
pub fn render_advisories(items: &[NewsItem]) -> String {
    let matched = filter_disruptive(items);
    if matched.is_empty() {
        return NO_RELEVANT_NEWS.to_string();
    }

    matched
        .iter()
        .map(|item| format!("- **{}**: {}", item.title, item.summary))
        .collect::<Vec<_>>()
        .join("\n")
}
