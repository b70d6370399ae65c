use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
    move |key| map.get(key).cloned()
}

#[test]
fn from_lookup_defaults_when_empty() {
    let cfg = SkillsConfig::from_lookup(lookup_from(&[]));
    assert_eq!(cfg.base_url, None);
    assert_eq!(cfg.access_key, None);
    assert_eq!(cfg.timeouts, SkillsTimeouts::default());
    assert!(!cfg.is_configured());
    assert_eq!(cfg.missing(), vec!["base URL", "access key"]);
}

#[test]
fn from_lookup_prefers_skills_vars_and_trims_trailing_slash() {
    let cfg = SkillsConfig::from_lookup(lookup_from(&[
        ("SKILLS_BASE_URL", "https://skills.example.test/"),
        ("SUPABASE_URL", "https://ignored.example.test"),
        ("SKILLS_ACCESS_KEY", "key-1"),
        ("SKILLS_REQUEST_TIMEOUT_SECS", "42"),
        ("SKILLS_CONNECT_TIMEOUT_SECS", "7"),
    ]));
    assert_eq!(cfg.base_url.as_deref(), Some("https://skills.example.test"));
    assert_eq!(cfg.access_key.as_deref(), Some("key-1"));
    assert_eq!(cfg.timeouts, SkillsTimeouts { request_secs: 42, connect_secs: 7 });
}

#[test]
fn from_lookup_falls_back_to_supabase_vars() {
    let cfg = SkillsConfig::from_lookup(lookup_from(&[
        ("SUPABASE_URL", "https://proj.supabase.test"),
        ("SUPABASE_ANON_KEY", "anon"),
    ]));
    assert!(cfg.is_configured());
    assert_eq!(cfg.access_key.as_deref(), Some("anon"));
}

#[test]
fn blank_values_count_as_missing() {
    let cfg = SkillsConfig::from_lookup(lookup_from(&[("SKILLS_BASE_URL", "https://x.test"), ("SKILLS_ACCESS_KEY", "   ")]));
    assert!(!cfg.is_configured());
    assert_eq!(cfg.missing(), vec!["access key"]);
}

#[test]
fn invalid_timeouts_use_defaults() {
    let cfg = SkillsConfig::from_lookup(lookup_from(&[("SKILLS_REQUEST_TIMEOUT_SECS", "soon")]));
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_SKILLS_REQUEST_TIMEOUT_SECS);
}

#[test]
fn endpoint_builds_function_url() {
    let cfg = SkillsConfig::new("https://proj.test/", "k");
    let endpoint = cfg.endpoint().unwrap();
    assert_eq!(endpoint.url_for("ops-skills/task-extractor"), "https://proj.test/functions/v1/ops-skills/task-extractor");
    assert_eq!(endpoint.url_for("/ops-skills/scheduler"), "https://proj.test/functions/v1/ops-skills/scheduler");
}
