//! Language registry.
//!
//! [`LanguageSet`] holds the configured languages in configuration order and
//! resolves each language's base URL once, at construction time. It is
//! read-only afterwards and shared by every request of a [`Site`](crate::Site).

use std::collections::HashMap;

use serde::Serialize;

/// Placeholder substituted with the site base URL in language URL templates.
pub const SITE_BASE_PLACEHOLDER: &str = "{site.base}";

/// A configured content language.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Language {
    /// Short identifier used in file names and URL prefixes (e.g. "en").
    pub code: String,
    /// Human readable name (e.g. "English").
    pub name: String,
    /// Locale identifier (e.g. "en_US").
    pub locale: String,
    /// True for the language whose files carry no language tag.
    pub is_default: bool,
    /// URL template, `{site.base}` is replaced by the site base URL.
    ///
    /// `None` selects `{site.base}` for the default language and
    /// `{site.base}/<code>` for every other language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_template: Option<String>,
}

impl Language {
    /// Create a language without a URL template.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        locale: impl Into<String>,
        is_default: bool,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            locale: locale.into(),
            is_default,
            url_template: None,
        }
    }

    /// Set the URL template.
    #[must_use]
    pub fn with_url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = Some(template.into());
        self
    }

    /// Resolve this language's base URL for a site base URL.
    fn resolve_url(&self, site_base: &str) -> String {
        let site_base = site_base.trim_end_matches('/');
        let url = match &self.url_template {
            Some(template) => template.replace(SITE_BASE_PLACEHOLDER, site_base),
            None if self.is_default => site_base.to_owned(),
            None => format!("{site_base}/{}", self.code),
        };
        url.trim_end_matches('/').to_owned()
    }
}

/// Error returned when a language set cannot be built.
///
/// All variants are fatal configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum LanguageError {
    /// No languages configured.
    #[error("no languages configured")]
    Empty,
    /// No language is marked as default.
    #[error("no default language configured")]
    NoDefault,
    /// More than one language is marked as default.
    #[error("multiple default languages configured: {0} and {1}")]
    MultipleDefaults(String, String),
    /// The same code is configured twice.
    #[error("duplicate language code: {0}")]
    DuplicateCode(String),
}

/// Ordered set of configured languages, keyed by code.
#[derive(Debug)]
pub struct LanguageSet {
    languages: Vec<Language>,
    urls: Vec<String>,
    index: HashMap<String, usize>,
    default: usize,
}

impl LanguageSet {
    /// Build the registry and resolve every language URL against `site_base`.
    ///
    /// # Errors
    ///
    /// Returns [`LanguageError`] if the set is empty, has no or several
    /// default languages, or repeats a code.
    pub fn new(languages: Vec<Language>, site_base: &str) -> Result<Self, LanguageError> {
        if languages.is_empty() {
            return Err(LanguageError::Empty);
        }

        let mut index = HashMap::with_capacity(languages.len());
        let mut default: Option<usize> = None;

        for (i, language) in languages.iter().enumerate() {
            if index.insert(language.code.clone(), i).is_some() {
                return Err(LanguageError::DuplicateCode(language.code.clone()));
            }
            if language.is_default {
                if let Some(first) = default {
                    return Err(LanguageError::MultipleDefaults(
                        languages[first].code.clone(),
                        language.code.clone(),
                    ));
                }
                default = Some(i);
            }
        }

        let default = default.ok_or(LanguageError::NoDefault)?;
        let urls = languages.iter().map(|l| l.resolve_url(site_base)).collect();

        Ok(Self {
            languages,
            urls,
            index,
            default,
        })
    }

    /// Look up a language by code.
    #[must_use]
    pub fn find(&self, code: &str) -> Option<&Language> {
        self.index.get(code).map(|&i| &self.languages[i])
    }

    /// Language codes in configuration order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.languages.iter().map(|l| l.code.as_str())
    }

    /// All languages in configuration order.
    #[must_use]
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    /// The default language.
    #[must_use]
    pub fn default_language(&self) -> &Language {
        &self.languages[self.default]
    }

    /// True if `code` is the default language.
    #[must_use]
    pub fn is_default(&self, code: &str) -> bool {
        self.default_language().code == code
    }

    /// Base URL of a language.
    ///
    /// Languages that don't belong to this set resolve to the default
    /// language's URL.
    #[must_use]
    pub fn url_for(&self, language: &Language) -> &str {
        let i = self.index.get(&language.code).copied().unwrap_or(self.default);
        &self.urls[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn en_de() -> Vec<Language> {
        vec![
            Language::new("en", "English", "en_US", true),
            Language::new("de", "Deutsch", "de_DE", false),
        ]
    }

    #[test]
    fn test_find_and_codes() {
        let set = LanguageSet::new(en_de(), "https://example.com").unwrap();

        assert_eq!(set.find("de").unwrap().name, "Deutsch");
        assert!(set.find("fr").is_none());
        assert_eq!(set.codes().collect::<Vec<_>>(), vec!["en", "de"]);
    }

    #[test]
    fn test_default_language() {
        let set = LanguageSet::new(en_de(), "https://example.com").unwrap();

        assert_eq!(set.default_language().code, "en");
        assert!(set.is_default("en"));
        assert!(!set.is_default("de"));
    }

    #[test]
    fn test_default_urls_without_templates() {
        let set = LanguageSet::new(en_de(), "https://example.com/").unwrap();

        assert_eq!(set.url_for(set.find("en").unwrap()), "https://example.com");
        assert_eq!(
            set.url_for(set.find("de").unwrap()),
            "https://example.com/de"
        );
    }

    #[test]
    fn test_url_template_substitution() {
        let languages = vec![
            Language::new("en", "English", "en_US", true).with_url_template("{site.base}/"),
            Language::new("de", "Deutsch", "de_DE", false)
                .with_url_template("https://example.de{site.base}"),
        ];
        let set = LanguageSet::new(languages, "").unwrap();

        assert_eq!(set.url_for(set.find("en").unwrap()), "");
        assert_eq!(set.url_for(set.find("de").unwrap()), "https://example.de");
    }

    #[test]
    fn test_url_for_foreign_language_uses_default() {
        let set = LanguageSet::new(en_de(), "https://example.com").unwrap();
        let foreign = Language::new("fr", "Français", "fr_FR", false);

        assert_eq!(set.url_for(&foreign), "https://example.com");
    }

    #[test]
    fn test_empty_set_rejected() {
        assert_eq!(
            LanguageSet::new(Vec::new(), "").unwrap_err(),
            LanguageError::Empty
        );
    }

    #[test]
    fn test_missing_default_rejected() {
        let languages = vec![Language::new("en", "English", "en_US", false)];

        assert_eq!(
            LanguageSet::new(languages, "").unwrap_err(),
            LanguageError::NoDefault
        );
    }

    #[test]
    fn test_multiple_defaults_rejected() {
        let languages = vec![
            Language::new("en", "English", "en_US", true),
            Language::new("de", "Deutsch", "de_DE", true),
        ];

        assert_eq!(
            LanguageSet::new(languages, "").unwrap_err(),
            LanguageError::MultipleDefaults("en".to_owned(), "de".to_owned())
        );
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let languages = vec![
            Language::new("en", "English", "en_US", true),
            Language::new("en", "English (UK)", "en_GB", false),
        ];

        assert_eq!(
            LanguageSet::new(languages, "").unwrap_err(),
            LanguageError::DuplicateCode("en".to_owned())
        );
    }
}
