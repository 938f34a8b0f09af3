use crate::models::AppEntry;

/// Normalize a label or query for matching: lowercase, ASCII letters and
/// digits only. Both sides of every comparison go through this.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Rank the app list against a query.
///
/// Single linear pass, two tiers: labels starting with the normalized query
/// come first, labels merely containing it follow. Within each tier the
/// authoritative list order is preserved; there is no score-based sorting.
/// An empty query returns the full list unchanged.
pub fn filter(query: &str, apps: &[AppEntry]) -> Vec<AppEntry> {
    if query.is_empty() {
        return apps.to_vec();
    }
    let needle = normalize(query);
    if needle.is_empty() {
        return apps.to_vec();
    }

    let mut primary = Vec::new();
    let mut secondary = Vec::new();
    for app in apps {
        let label = normalize(&app.label);
        if label.starts_with(&needle) {
            primary.push(app.clone());
        } else if label.contains(&needle) {
            secondary.push(app.clone());
        }
    }
    primary.extend(secondary);
    primary
}
