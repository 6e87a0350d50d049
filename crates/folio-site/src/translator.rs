//! Language-aware slugs, URIs and URLs.
//!
//! The default language always uses directory uids. Other languages may
//! translate a page's slug with a `url_key` field in their content file;
//! pages without one keep their uid. The request language uses the
//! `url_key` as written, while slugs asked for in another language are
//! slugified. None of these lookups fail.

use crate::language::Language;
use crate::request::Request;
use crate::tree::PageId;

/// Field holding a translated slug.
pub const URL_KEY_FIELD: &str = "url_key";

/// Convert text to a URL-safe slug.
///
/// Transliterates to ASCII, lower-cases it and collapses every run of other
/// characters into a single `-`.
#[must_use]
pub fn slugify(text: &str) -> String {
    let ascii = deunicode::deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_dash = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

impl<'s> Request<'s> {
    /// Last URL segment of a page.
    ///
    /// Without a language (or with the request language, or an unknown
    /// code) the request language is used and default-language slugs are
    /// cached. The default language always yields the uid. The site root
    /// has an empty slug.
    #[must_use]
    pub fn slug(&self, page: PageId, language: Option<&str>) -> String {
        if page.is_root() {
            return String::new();
        }

        match self.explicit_language(language) {
            Some(explicit) if explicit.code != self.language().code => {
                if explicit.is_default {
                    self.uid(page)
                } else {
                    self.translated_slug(page, &explicit.code)
                }
            }
            _ => self.current_slug(page),
        }
    }

    fn current_slug(&self, page: PageId) -> String {
        let current = self.language();
        if let Some(slug) = self.with_cache(page, |c| c.slug.get(&current.code).cloned()) {
            return slug;
        }

        if current.is_default {
            let uid = self.uid(page);
            self.with_cache(page, |c| c.slug.insert(current.code.clone(), uid.clone()));
            return uid;
        }

        let key = self.content(page, None).value(URL_KEY_FIELD).to_owned();
        if key.is_empty() { self.uid(page) } else { key }
    }

    /// Slugified `url_key` of another language, or the uid.
    fn translated_slug(&self, page: PageId, code: &str) -> String {
        let key = slugify(self.content(page, Some(code)).value(URL_KEY_FIELD));
        if key.is_empty() { self.uid(page) } else { key }
    }

    /// Slugs of the page and its ancestors joined by `/`.
    ///
    /// The site root has an empty URI.
    #[must_use]
    pub fn uri(&self, page: PageId, language: Option<&str>) -> String {
        self.chain(page)
            .into_iter()
            .map(|id| self.slug(id, language))
            .filter(|slug| !slug.is_empty())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Absolute URL of a page.
    ///
    /// Starts from the language's base URL. The home page maps to the base
    /// URL itself and its segment never appears in the URLs of its
    /// descendants.
    #[must_use]
    pub fn url(&self, page: PageId, language: Option<&str>) -> String {
        let target: &Language = self.explicit_language(language).unwrap_or(self.language());
        let base = self.site().languages().url_for(target);

        let mut url = base.to_owned();
        for id in self.chain(page) {
            if self.is_home(id) {
                base.clone_into(&mut url);
                continue;
            }
            url.push('/');
            url.push_str(&self.slug(id, language));
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("baender"), "baender");
        assert_eq!(slugify("Über uns"), "uber-uns");
        assert_eq!(slugify("  Hello,   World!  "), "hello-world");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
        assert_eq!(slugify("---"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_translated_slug_scenario() {
        let (_, site) = testing::site();
        let request = site.request();
        let blog = request.find("blog").unwrap();

        assert_eq!(request.slug(blog, Some("de")), "baender");
        assert_eq!(request.slug(blog, Some("en")), "blog");
    }

    #[test]
    fn test_default_slug_is_uid() {
        let (_, site) = testing::site();
        let request = site.request();
        request.set_language("de");

        for path in ["blog", "home", "home/about", "blog/first-post", "blog/drafts", "error"] {
            let page = request.find(path).unwrap();
            assert_eq!(request.slug(page, Some("en")), request.uid(page), "{path}");
        }
    }

    #[test]
    fn test_default_url_key_ignored() {
        let (_, site) = testing::site();
        let request = site.request();
        let news = request.find("news").unwrap();

        assert_eq!(request.slug(news, None), "news");
        assert_eq!(request.slug(news, Some("en")), "news");
    }

    #[test]
    fn test_slug_in_request_language() {
        let (_, site) = testing::site();
        let request = site.request();
        let blog = request.find("blog").unwrap();
        let post = request.find("blog/second-post").unwrap();

        assert_eq!(request.slug(blog, None), "blog");
        request.set_language("de");
        assert_eq!(request.slug(blog, None), "baender");
        assert_eq!(request.slug(blog, Some("de")), "baender");
        assert_eq!(request.slug(blog, Some("xx")), "baender");
        assert_eq!(request.slug(post, None), "second-post");
    }

    #[test]
    fn test_url_key_as_written_in_request_language() {
        let (_, site) = testing::site();
        let request = site.request();
        let about = request.find("home/about").unwrap();
        let post = request.find("blog/first-post").unwrap();

        request.set_language("de");

        assert_eq!(request.slug(about, None), "Über uns");
        assert_eq!(request.slug(about, Some("de")), "Über uns");
        assert_eq!(request.slug(post, None), "Erster Beitrag");
    }

    #[test]
    fn test_url_key_slugified_for_other_language() {
        let (_, site) = testing::site();
        let request = site.request();
        let about = request.find("home/about").unwrap();

        assert_eq!(request.slug(about, Some("de")), "uber-uns");
    }

    #[test]
    fn test_translated_slug_not_cached() {
        let (storage, site) = testing::site();
        let request = site.request();
        let blog = request.find("blog").unwrap();
        request.set_language("de");

        assert_eq!(request.slug(blog, None), "baender");

        assert_eq!(request.with_cache(blog, |c| c.slug.get("de").cloned()), None);
        let reads = storage.read_calls();
        assert_eq!(request.slug(blog, None), "baender");
        assert_eq!(storage.read_calls(), reads);
    }

    #[test]
    fn test_default_slug_cached() {
        let (_, site) = testing::site();
        let request = site.request();
        let blog = request.find("blog").unwrap();

        let _ = request.slug(blog, None);

        assert_eq!(
            request.with_cache(blog, |c| c.slug.get("en").cloned()),
            Some("blog".to_owned())
        );
    }

    #[test]
    fn test_root_identifiers() {
        let (_, site) = testing::site();
        let request = site.request();

        assert_eq!(request.slug(PageId::ROOT, None), "");
        assert_eq!(request.uri(PageId::ROOT, Some("de")), "");
        assert_eq!(request.url(PageId::ROOT, None), "https://example.com");
        assert_eq!(request.url(PageId::ROOT, Some("de")), "https://example.com/de");
    }

    #[test]
    fn test_uri_joins_parent_and_slug() {
        let (_, site) = testing::site();
        let request = site.request();

        for language in [None, Some("en"), Some("de")] {
            for path in ["blog", "blog/first-post", "home/about", "news"] {
                let page = request.find(path).unwrap();
                let parent_uri = request
                    .parent(page)
                    .map(|p| request.uri(p, language))
                    .unwrap_or_default();
                let slug = request.slug(page, language);
                let expected = if parent_uri.is_empty() {
                    slug
                } else {
                    format!("{parent_uri}/{slug}")
                };

                assert_eq!(request.uri(page, language), expected);
            }
        }
    }

    #[test]
    fn test_translated_uri() {
        let (_, site) = testing::site();
        let request = site.request();
        let post = request.find("blog/first-post").unwrap();

        assert_eq!(request.uri(post, None), "blog/first-post");
        assert_eq!(request.uri(post, Some("de")), "baender/erster-beitrag");
    }

    #[test]
    fn test_home_url_scenario() {
        let (_, site) = testing::site();
        let request = site.request();
        let home = request.find("home").unwrap();
        let about = request.find("home/about").unwrap();

        assert_eq!(request.parent(home), None);
        assert_eq!(request.url(home, Some("en")), "https://example.com");
        assert_eq!(request.url(about, Some("en")), "https://example.com/about");
        assert_eq!(request.url(home, Some("de")), "https://example.com/de");
        assert_eq!(request.url(about, Some("de")), "https://example.com/de/uber-uns");
    }

    #[test]
    fn test_regular_urls() {
        let (_, site) = testing::site();
        let request = site.request();
        let post = request.find("blog/first-post").unwrap();

        assert_eq!(request.url(post, None), "https://example.com/blog/first-post");
        assert_eq!(
            request.url(post, Some("de")),
            "https://example.com/de/baender/erster-beitrag"
        );
        request.set_language("de");
        assert_eq!(
            request.url(post, None),
            "https://example.com/de/baender/Erster Beitrag"
        );
    }
}
