//! Locale buckets and their per-platform directory naming.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use unic_langid::LanguageIdentifier;

use crate::error::GenerateError;

/// Locale tag that denotes the default (unlocalised) values.
pub const BASE_TAG: &str = "base";

/// Localisation bucket a value belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageType {
    /// Default values used when no better match exists.
    Base,
    /// Values for a specific language, optionally region-qualified.
    Locale(LanguageIdentifier),
}

impl LanguageType {
    /// Parses a locale tag, treating `base` (any case) as [`Self::Base`].
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::InvalidLocale`] when the tag is not a valid
    /// BCP-47 language identifier.
    pub fn parse(tag: &str) -> Result<Self, GenerateError> {
        if tag.eq_ignore_ascii_case(BASE_TAG) {
            return Ok(Self::Base);
        }
        LanguageIdentifier::from_str(tag)
            .map(Self::Locale)
            .map_err(|err| GenerateError::InvalidLocale {
                value: tag.to_owned(),
                message: err.to_string(),
            })
    }

    /// Returns `true` for the base bucket.
    #[must_use]
    pub const fn is_base(&self) -> bool {
        matches!(self, Self::Base)
    }

    /// Apple `.lproj` directory name.
    #[must_use]
    pub fn apple_resources_dir(&self) -> String {
        match self {
            Self::Base => "Base.lproj".to_owned(),
            Self::Locale(id) => format!("{id}.lproj"),
        }
    }

    /// Android `values` directory name (`values`, `values-ru`, `values-en-rGB`).
    #[must_use]
    pub fn android_values_dir(&self) -> String {
        match self {
            Self::Base => "values".to_owned(),
            Self::Locale(id) => match id.region.as_ref() {
                Some(region) => format!("values-{}-r{}", id.language, region),
                None => format!("values-{}", id.language),
            },
        }
    }

    /// Suffix appended to JVM resource bundle names (`""`, `_ru`, `_en_GB`).
    #[must_use]
    pub fn jvm_bundle_suffix(&self) -> String {
        match self {
            Self::Base => String::new(),
            Self::Locale(id) => match id.region.as_ref() {
                Some(region) => format!("_{}_{}", id.language, region),
                None => format!("_{}", id.language),
            },
        }
    }

    /// Suffix appended to JS localisation file names (`""`, `_ru`, `_en-GB`).
    #[must_use]
    pub fn js_file_suffix(&self) -> String {
        match self {
            Self::Base => String::new(),
            Self::Locale(id) => format!("_{id}"),
        }
    }
}

impl fmt::Display for LanguageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => f.write_str(BASE_TAG),
            Self::Locale(id) => write!(f, "{id}"),
        }
    }
}

/// Rows of one locale table: resource key and its localised value.
pub type LocaleRows<'a, T> = Vec<(&'a str, &'a T)>;

/// Canonical spelling of `tag`, so `en-gb` and `Base` key the same bucket as
/// `en-GB` and `base`. Unparseable tags come back unchanged.
#[must_use]
pub fn canonical_tag(tag: &str) -> String {
    LanguageType::parse(tag).map_or_else(|_| tag.to_owned(), |language| language.to_string())
}

/// Regroups per-resource locale maps into per-locale tables.
///
/// Tags are grouped by their canonical form. Locales come out in canonical
/// tag order; within a locale, rows keep the order of `entries`.
///
/// # Errors
///
/// Returns [`GenerateError::InvalidLocale`] for an unparseable tag, or when
/// one resource spells the same locale twice.
pub fn group_by_locale<'a, T, I>(
    entries: I,
) -> Result<Vec<(LanguageType, LocaleRows<'a, T>)>, GenerateError>
where
    I: IntoIterator<Item = (&'a str, &'a BTreeMap<String, T>)>,
    T: 'a,
{
    let mut grouped: BTreeMap<String, (LanguageType, LocaleRows<'a, T>)> = BTreeMap::new();
    for (key, values) in entries {
        let mut seen = BTreeSet::new();
        for (tag, value) in values {
            let language = LanguageType::parse(tag)?;
            let canonical = language.to_string();
            if !seen.insert(canonical.clone()) {
                return Err(GenerateError::InvalidLocale {
                    value: tag.clone(),
                    message: format!("'{key}' already declares locale '{canonical}'"),
                });
            }
            grouped
                .entry(canonical)
                .or_insert_with(|| (language, Vec::new()))
                .1
                .push((key, value));
        }
    }
    Ok(grouped.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("base", "Base.lproj", "values", "", "")]
    #[case("ru", "ru.lproj", "values-ru", "_ru", "_ru")]
    #[case("en-GB", "en-GB.lproj", "values-en-rGB", "_en_GB", "_en-GB")]
    fn maps_locale_directories(
        #[case] tag: &str,
        #[case] apple: &str,
        #[case] android: &str,
        #[case] jvm: &str,
        #[case] js: &str,
    ) {
        let language = LanguageType::parse(tag).expect("valid tag");
        assert_eq!(language.apple_resources_dir(), apple);
        assert_eq!(language.android_values_dir(), android);
        assert_eq!(language.jvm_bundle_suffix(), jvm);
        assert_eq!(language.js_file_suffix(), js);
    }

    #[rstest]
    fn rejects_invalid_tags() {
        let err = LanguageType::parse("not_a locale").expect_err("tag should be rejected");
        assert!(matches!(err, GenerateError::InvalidLocale { .. }));
    }

    #[rstest]
    fn groups_rows_per_locale_in_entry_order() {
        let first = BTreeMap::from([
            ("base".to_owned(), "Hello".to_owned()),
            ("ru".to_owned(), "Privet".to_owned()),
        ]);
        let second = BTreeMap::from([("base".to_owned(), "Bye".to_owned())]);
        let grouped =
            group_by_locale([("hello", &first), ("bye", &second)]).expect("group locales");

        let summary: Vec<(String, Vec<&str>)> = grouped
            .iter()
            .map(|(language, rows)| {
                (
                    language.to_string(),
                    rows.iter().map(|(key, _)| *key).collect(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("base".to_owned(), vec!["hello", "bye"]),
                ("ru".to_owned(), vec!["hello"]),
            ]
        );
    }

    #[rstest]
    fn groups_differently_cased_tags_into_one_locale() {
        let first = BTreeMap::from([("en-GB".to_owned(), "Colour".to_owned())]);
        let second = BTreeMap::from([("en-gb".to_owned(), "Flavour".to_owned())]);
        let third = BTreeMap::from([("base".to_owned(), "Color".to_owned())]);
        let fourth = BTreeMap::from([("Base".to_owned(), "Flavor".to_owned())]);
        let grouped = group_by_locale([
            ("a", &first),
            ("b", &second),
            ("c", &third),
            ("d", &fourth),
        ])
        .expect("group locales");

        let summary: Vec<(String, Vec<&str>)> = grouped
            .iter()
            .map(|(language, rows)| {
                (
                    language.to_string(),
                    rows.iter().map(|(key, _)| *key).collect(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            vec![
                ("base".to_owned(), vec!["c", "d"]),
                ("en-GB".to_owned(), vec!["a", "b"]),
            ]
        );
    }

    #[rstest]
    fn rejects_one_resource_spelling_a_locale_twice() {
        let values = BTreeMap::from([
            ("en-GB".to_owned(), "Colour".to_owned()),
            ("en-gb".to_owned(), "Color".to_owned()),
        ]);
        let err = group_by_locale([("title", &values)]).expect_err("duplicate locale");
        assert!(matches!(err, GenerateError::InvalidLocale { .. }));
    }

    #[rstest]
    #[case("en-gb", "en-GB")]
    #[case("BASE", "base")]
    #[case("not_a locale", "not_a locale")]
    fn canonicalises_tags(#[case] tag: &str, #[case] expected: &str) {
        assert_eq!(canonical_tag(tag), expected);
    }
}
