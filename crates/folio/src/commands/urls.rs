//! `folio urls` command implementation.

use clap::Args;
use folio_site::{PageId, Request};
use serde::Serialize;

use super::{SiteArgs, find_page};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the urls command.
#[derive(Args)]
pub(crate) struct UrlsArgs {
    /// Page path by uid (e.g. `blog/first-post`).
    page: String,
}

/// Addresses of one page in one language.
#[derive(Debug, Serialize)]
struct LanguageUrls {
    code: String,
    slug: String,
    uri: String,
    url: String,
}

impl UrlsArgs {
    /// Execute the urls command.
    pub(crate) fn execute(self, site_args: &SiteArgs, output: &Output) -> Result<(), CliError> {
        let site = site_args.open()?;
        let request = site.request();
        let page = find_page(&request, &self.page)?;

        output.json(&urls(&request, page))
    }
}

fn urls(request: &Request<'_>, page: PageId) -> Vec<LanguageUrls> {
    request
        .site()
        .languages()
        .codes()
        .map(|code| LanguageUrls {
            code: code.to_owned(),
            slug: request.slug(page, Some(code)),
            uri: request.uri(page, Some(code)),
            url: request.url(page, Some(code)),
        })
        .collect()
}
