//! Catalog discovery, compilation and loading
//!
//! Sources follow the classic gettext layout:
//! `{root}/{locale}/LC_MESSAGES/{domain}.po`, with the compiled catalog
//! next to it as `{domain}.mo`. Only compiled catalogs are loaded; when
//! compilation is enabled, stale `.mo` files are rebuilt first.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tokio::fs;
use tracing::{debug, info, warn};

use super::message_catalog::MessageCatalog;
use super::store::CatalogStore;
use super::{mo, po};
use crate::config::TranslationsConfig;
use crate::i18n::locale::LocaleKey;
use crate::utils::errors::Result;
use crate::utils::logging::{log_catalog_loaded, log_source_skipped};

const MESSAGES_DIR: &str = "LC_MESSAGES";

/// A `.po` file found under a translation root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationSource {
    pub locale: String,
    pub domain: String,
    pub path: PathBuf,
}

impl TranslationSource {
    /// Where the compiled catalog lives
    pub fn compiled_path(&self) -> PathBuf {
        self.path.with_extension("mo")
    }
}

/// List every `.po` file under `{root}/{locale}/LC_MESSAGES/`, sorted
pub async fn iter_translation_sources(root: &Path) -> Result<Vec<TranslationSource>> {
    let mut sources = Vec::new();
    let mut locales = fs::read_dir(root).await?;

    while let Some(locale_dir) = locales.next_entry().await? {
        // Follows symlinks
        match fs::metadata(locale_dir.path()).await {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => continue,
            Err(e) => {
                log_source_skipped(&locale_dir.path(), &e.to_string());
                continue;
            }
        }
        let Some(locale) = locale_dir.file_name().to_str().map(str::to_string) else {
            log_source_skipped(&locale_dir.path(), "locale directory name is not UTF-8");
            continue;
        };

        let messages_dir = locale_dir.path().join(MESSAGES_DIR);
        let mut files = match fs::read_dir(&messages_dir).await {
            Ok(files) => files,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(locale = %locale, "No {} directory", MESSAGES_DIR);
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        while let Some(file) = files.next_entry().await? {
            let path = file.path();
            if path.extension().and_then(|e| e.to_str()) != Some("po") {
                continue;
            }
            let Some(domain) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                log_source_skipped(&path, "domain name is not UTF-8");
                continue;
            };
            sources.push(TranslationSource {
                locale: locale.clone(),
                domain,
                path,
            });
        }
    }

    sources.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(sources)
}

async fn modified(path: &Path) -> std::io::Result<SystemTime> {
    fs::metadata(path).await?.modified()
}

/// Create or refresh `mo_path` from `po_path` when the source is newer.
///
/// Returns `None` when file times cannot be read. Parse and write
/// failures are returned as errors.
pub async fn compile_if_stale(po_path: &Path, mo_path: &Path) -> Result<Option<PathBuf>> {
    let po_mtime = match modified(po_path).await {
        Ok(mtime) => mtime,
        Err(e) => {
            log_source_skipped(po_path, &e.to_string());
            return Ok(None);
        }
    };

    let mo_mtime = match fs::try_exists(mo_path).await? {
        true => match modified(mo_path).await {
            Ok(mtime) => mtime,
            Err(e) => {
                log_source_skipped(mo_path, &e.to_string());
                return Ok(None);
            }
        },
        false => SystemTime::UNIX_EPOCH,
    };

    if po_mtime > mo_mtime {
        let catalog = po::read(po_path).await?;
        if let Err(e) = fs::write(mo_path, mo::to_bytes(&catalog)).await {
            warn!(po = %po_path.display(), mo = %mo_path.display(), error = %e, "Error while compiling catalog");
            return Err(e.into());
        }
        debug!(po = %po_path.display(), mo = %mo_path.display(), "Compiled catalog");
    }

    Ok(Some(mo_path.to_path_buf()))
}

fn domain_allowed(restrict: Option<&[String]>, domain: &str) -> bool {
    match restrict {
        Some(domains) => domains.iter().any(|d| d == domain),
        None => true,
    }
}

/// List compiled catalogs under a root, compiling first when asked.
///
/// Sources outside `restrict` are dropped before anything is compiled.
pub async fn iter_translation_files(
    root: &Path,
    compile: bool,
    restrict: Option<&[String]>,
) -> Result<Vec<(TranslationSource, PathBuf)>> {
    let mut files = Vec::new();

    for source in iter_translation_sources(root).await? {
        if !domain_allowed(restrict, &source.domain) {
            debug!(domain = %source.domain, path = %source.path.display(), "Domain not requested, skipping");
            continue;
        }
        let mo_path = source.compiled_path();
        if compile {
            if let Some(compiled) = compile_if_stale(&source.path, &mo_path).await? {
                files.push((source, compiled));
            }
        } else if fs::try_exists(&mo_path).await? {
            files.push((source, mo_path));
        } else {
            warn!("File {} does not have a compiled version.", source.path.display());
        }
    }

    Ok(files)
}

/// Builds a [`CatalogStore`] from translation roots
#[derive(Debug, Clone, Default)]
pub struct CatalogLoader {
    sources: Vec<PathBuf>,
    compile: bool,
    restrict: Option<Vec<String>>,
}

impl CatalogLoader {
    /// Create a loader over the given roots
    pub fn new<P: Into<PathBuf>>(sources: impl IntoIterator<Item = P>) -> Self {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            compile: false,
            restrict: None,
        }
    }

    /// Create a loader from configuration
    pub fn from_config(config: &TranslationsConfig) -> Self {
        Self {
            sources: config.sources.iter().map(PathBuf::from).collect(),
            compile: config.compile,
            restrict: config.restrict.clone(),
        }
    }

    /// Compile stale `.po` files before loading
    pub fn compile(mut self, compile: bool) -> Self {
        self.compile = compile;
        self
    }

    /// Only load the named domains
    pub fn restrict<S: Into<String>>(mut self, domains: impl IntoIterator<Item = S>) -> Self {
        self.restrict = Some(domains.into_iter().map(Into::into).collect());
        self
    }

    /// Load every compiled catalog into a fresh store.
    ///
    /// Missing roots and uncompiled sources are skipped with a warning.
    /// Malformed catalogs abort the load. A later root overrides an
    /// earlier one for the same domain and locale.
    pub async fn load(&self) -> Result<CatalogStore<MessageCatalog>> {
        let mut store = CatalogStore::new();
        let mut loaded = 0usize;

        for root in &self.sources {
            if !fs::try_exists(root).await? {
                log_source_skipped(root, "translation root not found");
                continue;
            }

            for (source, mo_path) in iter_translation_files(root, self.compile, self.restrict.as_deref()).await? {
                let catalog = mo::read(&mo_path).await?;
                log_catalog_loaded(&source.domain, &source.locale, &mo_path, catalog.len());

                let locale = LocaleKey::parse(&source.locale);
                if store.insert(&source.domain, locale, catalog).is_some() {
                    warn!(domain = %source.domain, locale = %source.locale,
                          path = %mo_path.display(), "Catalog overrides an earlier source");
                }
                loaded += 1;
            }
        }

        info!(catalogs = loaded, domains = store.domains().len(), "Translation store loaded");
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn write_po(root: &Path, locale: &str, domain: &str, body: &str) -> PathBuf {
        let dir = root.join(locale).join(MESSAGES_DIR);
        fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join(format!("{}.po", domain));
        fs::write(&path, body).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_sources_follow_gettext_layout() {
        let tmp = TempDir::new().unwrap();
        write_po(tmp.path(), "fr", "test", "").await;
        write_po(tmp.path(), "fr_CA", "test", "").await;
        fs::write(tmp.path().join("README"), "not a locale").await.unwrap();
        fs::create_dir_all(tmp.path().join("de")).await.unwrap();
        fs::write(tmp.path().join("fr").join(MESSAGES_DIR).join("notes.txt"), "").await.unwrap();

        let sources = iter_translation_sources(tmp.path()).await.unwrap();
        let found: Vec<(&str, &str)> = sources
            .iter()
            .map(|s| (s.locale.as_str(), s.domain.as_str()))
            .collect();
        assert_eq!(found, vec![("fr", "test"), ("fr_CA", "test")]);
        assert!(sources[0].compiled_path().ends_with("fr/LC_MESSAGES/test.mo"));
    }

    #[tokio::test]
    async fn test_compile_writes_then_reuses() {
        let tmp = TempDir::new().unwrap();
        let po_path = write_po(tmp.path(), "fr", "test", "msgid \"tap\"\nmsgstr \"robinet\"\n").await;
        let mo_path = po_path.with_extension("mo");

        let compiled = compile_if_stale(&po_path, &mo_path).await.unwrap();
        assert_eq!(compiled.as_deref(), Some(mo_path.as_path()));
        let catalog = mo::read(&mo_path).await.unwrap();
        assert_eq!(catalog.gettext("tap"), Some("robinet"));

        // Up to date: a second call leaves the file alone.
        let before = modified(&mo_path).await.unwrap();
        compile_if_stale(&po_path, &mo_path).await.unwrap();
        assert_eq!(modified(&mo_path).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_compile_missing_source_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let po_path = tmp.path().join("missing.po");
        let compiled = compile_if_stale(&po_path, &po_path.with_extension("mo")).await.unwrap();
        assert!(compiled.is_none());
    }

    #[tokio::test]
    async fn test_uncompiled_sources_are_not_loaded() {
        let tmp = TempDir::new().unwrap();
        write_po(tmp.path(), "fr", "test", "msgid \"tap\"\nmsgstr \"robinet\"\n").await;

        let store = CatalogLoader::new([tmp.path()]).load().await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_restrict_filters_domains() {
        let tmp = TempDir::new().unwrap();
        write_po(tmp.path(), "fr", "test", "msgid \"tap\"\nmsgstr \"robinet\"\n").await;
        write_po(tmp.path(), "fr", "other", "msgid \"tap\"\nmsgstr \"robinet\"\n").await;

        let store = CatalogLoader::new([tmp.path()])
            .compile(true)
            .restrict(["test"])
            .load()
            .await
            .unwrap();
        assert_eq!(store.domains(), vec!["test"]);
    }

    #[tokio::test]
    async fn test_restricted_out_domains_are_not_compiled() {
        let tmp = TempDir::new().unwrap();
        write_po(tmp.path(), "fr", "test", "msgid \"tap\"\nmsgstr \"robinet\"\n").await;
        let broken = write_po(tmp.path(), "fr", "other", "msgid \"tap\"\nmsgstr \"broken\n").await;

        let store = CatalogLoader::new([tmp.path()])
            .compile(true)
            .restrict(["test"])
            .load()
            .await
            .unwrap();
        assert_eq!(store.domains(), vec!["test"]);
        assert!(!broken.with_extension("mo").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_locale_directories_are_followed() {
        let tmp = TempDir::new().unwrap();
        let real = TempDir::new().unwrap();
        write_po(real.path(), "fr", "test", "").await;
        std::os::unix::fs::symlink(real.path().join("fr"), tmp.path().join("fr")).unwrap();

        let sources = iter_translation_sources(tmp.path()).await.unwrap();
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].locale, "fr");
        assert_eq!(sources[0].domain, "test");

        std::os::unix::fs::symlink(tmp.path().join("gone"), tmp.path().join("de")).unwrap();
        let sources = iter_translation_sources(tmp.path()).await.unwrap();
        assert_eq!(sources.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_root_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let store = CatalogLoader::new([tmp.path().join("nowhere")])
            .compile(true)
            .load()
            .await
            .unwrap();
        assert!(store.is_empty());
    }
}
