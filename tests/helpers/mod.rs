//! Test helpers
//!
//! Stages the fixture catalogs from `tests/data/locales` into a temporary
//! translation root so tests can compile them without touching the tree.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};

use tempfile::TempDir;
use vernacular::{CatalogLoader, CatalogStore, Translator};

static INIT: Once = Once::new();

const FIXTURES: &[(&str, &str, &str)] = &[
    ("fr", "test", include_str!("../data/locales/fr/LC_MESSAGES/test.po")),
    ("fr_CA", "test", include_str!("../data/locales/fr_CA/LC_MESSAGES/test.po")),
];

/// Initialize logging for tests (called once)
pub fn init_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init();
    });
}

/// A temporary translation root holding the fixture `.po` files
pub struct TranslationRoot {
    dir: TempDir,
}

impl TranslationRoot {
    pub fn new() -> Self {
        init_test_logging();
        let dir = TempDir::new().expect("Failed to create temp dir");
        for (locale, domain, body) in FIXTURES {
            write_po(dir.path(), locale, domain, body);
        }
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add another `.po` file under this root
    pub fn add(&self, locale: &str, domain: &str, body: &str) -> PathBuf {
        write_po(self.path(), locale, domain, body)
    }

    pub async fn load(&self, compile: bool) -> CatalogStore {
        CatalogLoader::new([self.path()])
            .compile(compile)
            .load()
            .await
            .expect("Failed to load fixture catalogs")
    }

    pub async fn translator(&self) -> Translator {
        Translator::new(Arc::new(self.load(true).await), "test")
    }
}

fn write_po(root: &Path, locale: &str, domain: &str, body: &str) -> PathBuf {
    let dir = root.join(locale).join("LC_MESSAGES");
    std::fs::create_dir_all(&dir).expect("Failed to create LC_MESSAGES");
    let path = dir.join(format!("{}.po", domain));
    std::fs::write(&path, body).expect("Failed to write fixture");
    path
}
