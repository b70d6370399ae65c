use super::*;
use crate::loader::test_helpers::MockLibrary;

#[test]
fn common_names_are_unique_and_cover_both_lists() {
    let names = common_icon_names();
    assert_eq!(names.len(), COGNITIVE_HUB_ICONS.len() + COMMON_ICONS.len());
    assert!(names.contains(&"Send"));
    assert!(names.contains(&"HelpCircle"));
}

#[test]
fn hub_lists_match_known_hubs() {
    assert_eq!(hub_icons("cognitive").len(), COGNITIVE_HUB_ICONS.len());
    assert!(hub_icons("finance").contains(&"Wallet"));
    assert!(hub_icons("payroll").is_empty());
}

#[test]
fn every_curated_name_is_a_valid_export() {
    for hub in ["cognitive", "marketing", "sales", "finance", "ops", "hr", "legal"] {
        for name in hub_icons(hub) {
            assert!(crate::loader::library::is_export_name(name), "{hub}: {name}");
        }
    }
}

#[tokio::test]
async fn preload_hub_caches_available_icons() {
    let loader = ComponentLoader::new(MockLibrary::new(&["Scale", "FileText", "Shield"]));

    let report = preload_hub(&loader, "legal").await;

    assert_eq!(report.requested, 5);
    assert_eq!(report.loaded, 3);
    assert_eq!(report.failed, vec!["AlertTriangle".to_string(), "CheckCircle".to_string()]);
    assert!(loader.is_cached("Shield"));
}

#[tokio::test]
async fn preload_common_requests_every_unique_name() {
    let loader = ComponentLoader::new(MockLibrary::new(&["Send", "Home"]));

    let report = preload_common(&loader).await;

    assert_eq!(report.requested, common_icon_names().len());
    assert_eq!(report.loaded, 2);
    assert_eq!(loader.library().calls(), report.requested);
}

#[tokio::test]
async fn unknown_hub_preloads_nothing() {
    let loader = ComponentLoader::new(MockLibrary::new(&[]));

    let report = preload_hub(&loader, "payroll").await;

    assert_eq!(report, PreloadReport::default());
}
