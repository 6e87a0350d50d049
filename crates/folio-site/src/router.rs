//! Language-aware routing.
//!
//! [`Request::route`] runs once per request: it selects the request language
//! from an optional leading language segment, then resolves the rest of the
//! path to a page:
//!
//! 1. Empty rest: the home page.
//! 2. Default language: exact lookup by directory uids. A match wins even if
//!    another page translates its slug to the same path.
//! 3. Lookup by translated slugs of the request language. A segment matches
//!    a slug as written or in its slugified form, so URLs generated for
//!    another language route back too.
//! 4. The error page.
//!
//! Lookups start at the site root and, failing that, at the home page, whose
//! segment is left out of generated URLs.

use serde::Serialize;

use crate::request::Request;
use crate::session::LANGUAGE_SESSION_KEY;
use crate::translator::slugify;
use crate::tree::PageId;

/// How a route was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    /// Empty path, resolved to the home page.
    Home,
    /// Default-language path matched directory uids.
    Exact,
    /// Path matched translated slugs.
    Translated,
    /// Nothing matched, resolved to the error page.
    Error,
}

/// Result of routing a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Route {
    /// Target page; `None` only if the home or error page doesn't exist.
    pub page: Option<PageId>,
    pub kind: RouteKind,
}

impl<'s> Request<'s> {
    /// Route a request path such as `de/baender` or `blog/first-post`.
    ///
    /// Sets the request language and current page.
    pub fn route(&self, path: &str) -> Route {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let languages = self.site().languages();
        let options = self.site().options();

        let prefixed = segments.first().and_then(|s| languages.find(s));
        let (language, rest) = match prefixed {
            Some(language) => (language, &segments[1..]),
            None => {
                let remembered = if options.remember_language {
                    self.remembered_language()
                } else {
                    None
                };
                (
                    remembered.unwrap_or_else(|| languages.default_language()),
                    &segments[..],
                )
            }
        };

        self.set_language(&language.code);
        self.session_set(LANGUAGE_SESSION_KEY, &language.code);

        let route = self.resolve_route(rest);
        tracing::debug!(
            path = %path,
            language = %language.code,
            kind = ?route.kind,
            "Routed request"
        );

        self.set_current_page(route.page);
        route
    }

    fn resolve_route(&self, rest: &[&str]) -> Route {
        let options = self.site().options();

        if rest.is_empty() {
            return Route {
                page: self.find(&options.home),
                kind: RouteKind::Home,
            };
        }

        if self.language().is_default
            && let Some(page) = self.lookup(rest, |child, segment| self.uid(child) == segment)
        {
            return Route {
                page: Some(page),
                kind: RouteKind::Exact,
            };
        }

        if let Some(page) = self.lookup(rest, |child, segment| {
            let slug = self.slug(child, None);
            slug == segment || slugify(&slug) == segment
        }) {
            return Route {
                page: Some(page),
                kind: RouteKind::Translated,
            };
        }

        Route {
            page: self.find(&options.error),
            kind: RouteKind::Error,
        }
    }

    /// Walk from the site root, then from the home page.
    fn lookup(
        &self,
        segments: &[&str],
        matches: impl Fn(PageId, &str) -> bool,
    ) -> Option<PageId> {
        self.walk(PageId::ROOT, segments, &matches).or_else(|| {
            let home = self.find(&self.site().options().home)?;
            self.walk(home, segments, &matches)
        })
    }
}
