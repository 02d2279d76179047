//! Catalog loading from a translation root on disk

mod helpers;

use std::collections::HashSet;

use assert_matches::assert_matches;
use helpers::*;
use vernacular::{CatalogLoader, TranslationStore, VernacularError};

#[tokio::test]
async fn test_load_without_compile_is_empty() {
    let root = TranslationRoot::new();
    let store = root.load(false).await;
    assert!(store.is_empty());
    assert!(store.domains().is_empty());
}

#[tokio::test]
async fn test_load_with_compile() {
    let root = TranslationRoot::new();
    let store = root.load(true).await;

    assert_eq!(store.domains(), vec!["test"]);
    assert_eq!(store.languages("test"), vec!["fr"]);
    let regions: HashSet<Option<&str>> = store.regions("test", "fr").into_iter().collect();
    assert_eq!(regions, HashSet::from([None, Some("CA")]));

    assert!(root.path().join("fr/LC_MESSAGES/test.mo").exists());
    assert!(root.path().join("fr_CA/LC_MESSAGES/test.mo").exists());
}

#[tokio::test]
async fn test_compiled_catalogs_are_reused_without_compile() {
    let root = TranslationRoot::new();
    root.load(true).await;

    let store = root.load(false).await;
    let catalog = store.get("test", "fr", Some("CA")).unwrap().unwrap();
    assert_eq!(catalog.gettext("tap"), Some("champlure"));
}

#[tokio::test]
async fn test_fuzzy_entries_are_not_compiled() {
    let root = TranslationRoot::new();
    let store = root.load(true).await;
    let catalog = store.get("test", "fr", None).unwrap().unwrap();
    assert_eq!(catalog.gettext("lady"), None);
    assert_eq!(catalog.gettext("sir"), Some("monsieur"));
}

#[tokio::test]
async fn test_store_stats() {
    let root = TranslationRoot::new();
    let stats = root.load(true).await.stats();

    assert_eq!(stats.total_catalogs, 2);
    let locales: Vec<&str> = stats.domains.iter().map(|c| c.locale.as_str()).collect();
    assert_eq!(locales, vec!["fr", "fr_CA"]);
    assert_eq!(stats.domains[0].messages, 5);
    assert_eq!(stats.domains[1].messages, 2);
    assert_eq!(stats.total_messages, 7);

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["total_catalogs"], 2);
}

#[tokio::test]
async fn test_later_root_overrides_earlier() {
    let first = TranslationRoot::new();
    let second = TranslationRoot::new();
    second.add("fr", "test", "msgid \"tap\"\nmsgstr \"robinet du second\"\n");

    let store = CatalogLoader::new([first.path(), second.path()])
        .compile(true)
        .load()
        .await
        .unwrap();
    let catalog = store.get("test", "fr", None).unwrap().unwrap();
    assert_eq!(catalog.gettext("tap"), Some("robinet du second"));
}

#[tokio::test]
async fn test_malformed_source_aborts_load() {
    let root = TranslationRoot::new();
    root.add("de", "test", "msgid \"tap\"\nmsgstr \"Hahn\n");

    let result = CatalogLoader::new([root.path()]).compile(true).load().await;
    assert_matches!(result, Err(VernacularError::PoSyntax { .. }));
}
