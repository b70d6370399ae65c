use super::*;

const DOT: &str = r#"<svg width="24" height="24"><circle r="1"/></svg>"#;

fn icon_dir(icons: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for stem in icons {
        std::fs::write(dir.path().join(format!("{stem}.svg")), DOT).unwrap();
    }
    dir
}

#[tokio::test]
async fn missing_fallback_is_skipped() {
    let dir = icon_dir(&[]);
    let loader = ComponentLoader::new(SvgIconLibrary::new(dir.path()));

    let options = fallback_options(&loader, Some("HelpCircle")).await;

    assert!(options.fallback.is_none());
}

#[tokio::test]
async fn available_fallback_is_attached() {
    let dir = icon_dir(&["help-circle"]);
    let loader = ComponentLoader::new(SvgIconLibrary::new(dir.path()));

    let options = fallback_options(&loader, Some("HelpCircle")).await;

    assert_eq!(options.fallback.map(|icon| icon.name.clone()).as_deref(), Some("HelpCircle"));
}

#[tokio::test]
async fn render_degrades_to_placeholder_when_fallback_is_missing() {
    let dir = icon_dir(&[]);
    let loader = ComponentLoader::new(SvgIconLibrary::new(dir.path()));

    let options = fallback_options(&loader, Some("HelpCircle")).await;
    let mut view = IconView::mount(&loader, "Send", IconProps::sized(16), options);
    view.settled().await;

    assert!(view.to_html().starts_with("<span"));
}
