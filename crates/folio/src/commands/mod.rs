//! CLI command implementations.

pub(crate) mod inventory;
pub(crate) mod resolve;
pub(crate) mod urls;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use folio_config::{CliSettings, Config};
use folio_site::{Language, LanguageSet, PageId, Request, Site, SiteOptions};
use folio_storage::FsStorage;

use crate::error::CliError;

pub(crate) use inventory::InventoryArgs;
pub(crate) use resolve::ResolveArgs;
pub(crate) use urls::UrlsArgs;

/// Arguments shared by every command.
#[derive(Args)]
pub(crate) struct SiteArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Content directory (overrides config).
    #[arg(long, global = true)]
    content_dir: Option<PathBuf>,

    /// Site base URL (overrides config).
    #[arg(long, global = true, env = "FOLIO_URL")]
    url: Option<String>,
}

impl SiteArgs {
    /// Load configuration and open the site it describes.
    pub(crate) fn open(&self) -> Result<Site, CliError> {
        let cli_settings = CliSettings {
            content_dir: self.content_dir.clone(),
            url: self.url.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        open_site(&config)
    }
}

/// Build a site over the configured content directory.
pub(crate) fn open_site(config: &Config) -> Result<Site, CliError> {
    let languages = config
        .languages
        .iter()
        .map(|l| {
            let language = Language::new(&l.code, &l.name, &l.locale, l.default);
            match &l.url {
                Some(url) => language.with_url_template(url),
                None => language,
            }
        })
        .collect();
    let languages = LanguageSet::new(languages, &config.site.url)?;

    let options = SiteOptions {
        content_suffix: config.content_resolved.suffix.clone(),
        home: config.site.home.clone(),
        error: config.site.error.clone(),
        remember_language: config.site.remember_language,
    };

    tracing::info!(
        content_dir = %config.content_resolved.dir.display(),
        languages = languages.languages().len(),
        "Opened site"
    );

    let storage = Arc::new(FsStorage::new(config.content_resolved.dir.clone()));
    Ok(Site::new(storage, languages, options))
}

/// Find a page by uid path; an empty path is the site root.
pub(crate) fn find_page(request: &Request<'_>, path: &str) -> Result<PageId, CliError> {
    if path.trim_matches('/').is_empty() {
        return Ok(PageId::ROOT);
    }
    request
        .find(path)
        .ok_or_else(|| CliError::PageNotFound(path.to_owned()))
}
