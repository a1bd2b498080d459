//! Localization seam.
//!
//! Rules and the validator deal only in stable message keys; turning a key
//! into display text for a locale is a collaborator concern.

/// Translates message keys for a locale.
pub trait Localizer: Send + Sync {
    /// Returns the display text for `key` in `locale`. Implementations
    /// decide how to handle unknown keys (typically by echoing the key).
    fn translate(&self, key: &str, locale: &str) -> String;
}

#[cfg(feature = "mocks")]
pub use catalog::StaticCatalog;

#[cfg(feature = "mocks")]
mod catalog {
    use std::collections::HashMap;

    use super::Localizer;

    /// A fixed in-memory catalog keyed by (locale, message key). Unknown
    /// keys echo back, so tests can still assert on them.
    #[derive(Debug, Clone, Default)]
    pub struct StaticCatalog {
        entries: HashMap<(String, String), String>,
    }

    impl StaticCatalog {
        pub fn new() -> Self {
            Self::default()
        }

        /// Adds a translation for the given locale.
        pub fn with_entry(mut self, locale: &str, key: &str, text: &str) -> Self {
            self.entries
                .insert((locale.to_owned(), key.to_owned()), text.to_owned());
            self
        }
    }

    impl Localizer for StaticCatalog {
        fn translate(&self, key: &str, locale: &str) -> String {
            self.entries
                .get(&(locale.to_owned(), key.to_owned()))
                .cloned()
                .unwrap_or_else(|| key.to_owned())
        }
    }

}
