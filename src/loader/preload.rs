//! Curated icon lists warmed at start-up so first renders skip the placeholder.

use std::collections::BTreeSet;

use super::{ComponentLibrary, ComponentLoader, PreloadReport};

pub const COGNITIVE_HUB_ICONS: &[&str] = &[
    // navigation
    "ChevronLeft",
    "ChevronRight",
    "List",
    // chat actions
    "Send",
    "Trash",
    "Edit",
    "Copy",
    "RotateCcw",
    "Check",
    "X",
    // message states
    "Loader2",
    "AlertCircle",
    // sidebar
    "Plus",
    "Pin",
    "Archive",
    "MoreVertical",
    "Search",
    // empty state
    "MessageSquare",
    "Sparkles",
    "Target",
    "Calendar",
    "Lightbulb",
    "TrendingUp",
    "Users",
    "FileText",
    "BarChart",
    "Heart",
    "Brain",
    "Zap",
];

pub const COMMON_ICONS: &[&str] = &["Home", "Settings", "User", "LogOut", "Menu", "Bell", "HelpCircle"];

/// Icons for one hub; unknown hubs get an empty list.
#[must_use]
pub fn hub_icons(hub: &str) -> &'static [&'static str] {
    match hub {
        "cognitive" => COGNITIVE_HUB_ICONS,
        "marketing" => &["TrendingUp", "Share2", "Image", "Calendar", "BarChart"],
        "sales" => &["DollarSign", "Users", "Phone", "Mail", "FileText"],
        "finance" => &["DollarSign", "TrendingUp", "PieChart", "Receipt", "Wallet"],
        "ops" => &["Settings", "Workflow", "CheckSquare", "List", "GitBranch"],
        "hr" => &["Users", "UserPlus", "Award", "FileText", "Calendar"],
        "legal" => &["Scale", "FileText", "Shield", "AlertTriangle", "CheckCircle"],
        _ => &[],
    }
}

/// De-duplicated union of the cognitive-hub and common lists.
#[must_use]
pub fn common_icon_names() -> Vec<&'static str> {
    let unique: BTreeSet<&'static str> = COGNITIVE_HUB_ICONS.iter().chain(COMMON_ICONS).copied().collect();
    unique.into_iter().collect()
}

pub async fn preload_common<L: ComponentLibrary>(loader: &ComponentLoader<L>) -> PreloadReport {
    let names = common_icon_names();
    let report = loader.preload(names.as_slice()).await;
    if report.failed.is_empty() {
        tracing::info!(count = report.loaded, "preloaded common icons");
    } else {
        tracing::warn!(failed = ?report.failed, "some icons failed to preload");
    }
    report
}

pub async fn preload_hub<L: ComponentLibrary>(loader: &ComponentLoader<L>, hub: &str) -> PreloadReport {
    let names = hub_icons(hub);
    if names.is_empty() {
        tracing::debug!(hub, "no icon list for hub");
    }
    loader.preload(names).await
}

#[cfg(test)]
#[path = "preload_test.rs"]
mod tests;
