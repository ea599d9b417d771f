//! Symptom catalog and localized name tables.
//!
//! The canonical order of the catalog is the contract between the feature
//! encoder and the classifier: position `i` of every feature vector means
//! canonical symptom `i`. Each supported language carries a display-name
//! table aligned 1:1 with that order.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Languages the checklist is offered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Swahili,
}

impl Language {
    /// Every supported language, in tab order.
    pub const ALL: [Language; 2] = [Language::English, Language::Swahili];

    /// ISO 639-1 code, also used as the encyclopedia subdomain.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Swahili => "sw",
        }
    }

    /// Name of the language in that language.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Swahili => "Kiswahili",
        }
    }

    /// The "none of these" entry offered next to the symptoms.
    ///
    /// It never contributes to the feature vector; selecting it opens the
    /// free-text report instead.
    #[must_use]
    pub fn sentinel(&self) -> &'static str {
        match self {
            Self::English => "Others",
            Self::Swahili => "Mengineyo",
        }
    }

    /// Parse an ISO code (`en`, `sw`) or a language name.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_lowercase().as_str() {
            "en" | "eng" | "english" => Some(Self::English),
            "sw" | "swa" | "swahili" | "kiswahili" => Some(Self::Swahili),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Language {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| CatalogError::UnknownLanguage(s.to_string()))
    }
}

/// Errors raised while building or querying a catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Unknown symptom '{name}' for {language}")]
    UnknownSymptom { name: String, language: Language },

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Catalog has no symptoms")]
    Empty,

    #[error("Missing name table for {0}")]
    MissingTable(Language),

    #[error("{language} name table has {actual} entries, catalog has {expected}")]
    TableLength {
        language: Language,
        expected: usize,
        actual: usize,
    },

    #[error("Duplicate name '{name}' in {language} table")]
    DuplicateName { name: String, language: Language },

    #[error("'{name}' collides with the {language} sentinel entry")]
    SentinelCollision { name: String, language: Language },
}

/// Ordered canonical symptoms plus one aligned display table per language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymptomCatalog {
    canonical: Vec<String>,
    tables: BTreeMap<Language, Vec<String>>,
}

impl SymptomCatalog {
    /// Build a catalog, validating table alignment.
    ///
    /// Every language in [`Language::ALL`] must have a table of exactly the
    /// canonical length. Names must be unique within a table and must not
    /// shadow the sentinel entry.
    ///
    /// # Errors
    /// Returns the first alignment problem found.
    pub fn new<I>(canonical: Vec<String>, tables: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (Language, Vec<String>)>,
    {
        if canonical.is_empty() {
            return Err(CatalogError::Empty);
        }

        let tables: BTreeMap<Language, Vec<String>> = tables.into_iter().collect();

        for language in Language::ALL {
            let names = tables
                .get(&language)
                .ok_or(CatalogError::MissingTable(language))?;

            if names.len() != canonical.len() {
                return Err(CatalogError::TableLength {
                    language,
                    expected: canonical.len(),
                    actual: names.len(),
                });
            }

            let mut seen = HashSet::with_capacity(names.len());
            for name in names {
                if name == language.sentinel() {
                    return Err(CatalogError::SentinelCollision {
                        name: name.clone(),
                        language,
                    });
                }
                if !seen.insert(name.as_str()) {
                    return Err(CatalogError::DuplicateName {
                        name: name.clone(),
                        language,
                    });
                }
            }
        }

        Ok(Self { canonical, tables })
    }

    /// Build a catalog from `(canonical, english, swahili)` rows.
    ///
    /// # Errors
    /// See [`SymptomCatalog::new`].
    pub fn from_rows(rows: &[(&str, &str, &str)]) -> Result<Self, CatalogError> {
        let canonical = rows.iter().map(|(id, _, _)| (*id).to_string()).collect();
        let english: Vec<String> = rows.iter().map(|(_, en, _)| (*en).to_string()).collect();
        let swahili: Vec<String> = rows.iter().map(|(_, _, sw)| (*sw).to_string()).collect();
        Self::new(
            canonical,
            [(Language::English, english), (Language::Swahili, swahili)],
        )
    }

    /// Number of symptoms (the feature width).
    #[must_use]
    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    /// Canonical identifiers in feature order.
    #[must_use]
    pub fn canonical(&self) -> &[String] {
        &self.canonical
    }

    /// Display names for `language`, aligned with [`SymptomCatalog::canonical`].
    #[must_use]
    pub fn names(&self, language: Language) -> &[String] {
        self.tables
            .get(&language)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Resolve a localized display name to its canonical position.
    ///
    /// # Errors
    /// Returns `CatalogError::UnknownSymptom` if the name is not in the
    /// language's table.
    pub fn canonical_index(&self, display_name: &str, language: Language) -> Result<usize, CatalogError> {
        self.names(language)
            .iter()
            .position(|n| n == display_name)
            .ok_or_else(|| CatalogError::UnknownSymptom {
                name: display_name.to_string(),
                language,
            })
    }

    /// Display name of the symptom at `position`.
    #[must_use]
    pub fn display_name(&self, position: usize, language: Language) -> Option<&str> {
        self.names(language).get(position).map(String::as_str)
    }

    /// Whether `name` is the free-text sentinel of `language`.
    #[must_use]
    pub fn is_sentinel(&self, name: &str, language: Language) -> bool {
        name == language.sentinel()
    }

    /// Checklist options as shown to the user: symptoms then the sentinel.
    #[must_use]
    pub fn options(&self, language: Language) -> Vec<&str> {
        self.names(language)
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(language.sentinel()))
            .collect()
    }
}

/// 11-symptom table used by the first malaria model.
pub(crate) const MALARIA_V1_SYMPTOMS: [(&str, &str, &str); 11] = [
    ("fever", "Fever", "Homa"),
    ("vomiting", "Vomiting", "Kutapika"),
    ("convulsions", "Convulsions", "Degedege"),
    ("cough", "Cough", "Kikohozi"),
    ("yellow_eyes", "Yellow Eyes", "Macho ya njano"),
    ("diarrhoea", "Diarrhoea", "Kuhara"),
    ("headache", "Headache", "Maumivu ya kichwa"),
    ("body_pain", "Body Pain", "Maumivu ya mwili"),
    ("abdominal_pain", "Abdominal Pain", "Maumivu ya tumbo"),
    ("loss_of_appetite", "Loss of Appetite", "Kukosa hamu ya kula"),
    ("body_weakness", "Body Weakness", "Udhaifu wa mwili"),
];

/// 23-symptom table used by the second malaria model.
pub(crate) const MALARIA_V2_SYMPTOMS: [(&str, &str, &str); 23] = [
    ("fever", "Fever", "Homa"),
    ("vomiting", "Vomiting", "Kutapika"),
    ("convulsions", "Convulsions", "Degedege"),
    ("cough", "Cough", "Kikohozi"),
    ("yellow_eyes", "Yellow Eyes", "Macho ya njano"),
    ("diarrhoea", "Diarrhoea", "Kuhara"),
    ("headache", "Headache", "Maumivu ya kichwa"),
    ("body_pain", "Body Pain", "Maumivu ya mwili"),
    ("abdominal_pain", "Abdominal Pain", "Maumivu ya tumbo"),
    ("loss_of_appetite", "Loss of Appetite", "Kukosa hamu ya kula"),
    ("body_weakness", "Body Weakness", "Udhaifu wa mwili"),
    ("chills", "Chills", "Kutetemeka kwa baridi"),
    ("sweating", "Sweating", "Kutokwa na jasho"),
    ("nausea", "Nausea", "Kichefuchefu"),
    ("joint_pain", "Joint Pain", "Maumivu ya viungo"),
    ("muscle_pain", "Muscle Pain", "Maumivu ya misuli"),
    ("fatigue", "Fatigue", "Uchovu"),
    ("dizziness", "Dizziness", "Kizunguzungu"),
    ("pale_skin", "Pale Skin", "Ngozi iliyopauka"),
    ("dark_urine", "Dark Urine", "Mkojo mweusi"),
    ("rapid_breathing", "Rapid Breathing", "Kupumua haraka"),
    ("rapid_heartbeat", "Rapid Heartbeat", "Mapigo ya moyo ya haraka"),
    ("confusion", "Confusion", "Kuchanganyikiwa"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn v1() -> SymptomCatalog {
        SymptomCatalog::from_rows(&MALARIA_V1_SYMPTOMS).expect("v1 table is aligned")
    }

    #[test]
    fn test_builtin_tables_are_aligned() {
        assert_eq!(v1().len(), 11);
        let v2 = SymptomCatalog::from_rows(&MALARIA_V2_SYMPTOMS).expect("v2 table is aligned");
        assert_eq!(v2.len(), 23);
    }

    #[test]
    fn test_canonical_index_per_language() {
        let catalog = v1();
        assert_eq!(catalog.canonical_index("Fever", Language::English), Ok(0));
        assert_eq!(catalog.canonical_index("Homa", Language::Swahili), Ok(0));
        assert_eq!(catalog.canonical_index("Body Pain", Language::English), Ok(7));
        assert_eq!(
            catalog.canonical_index("Maumivu ya mwili", Language::Swahili),
            Ok(7)
        );
    }

    #[test]
    fn test_unknown_symptom() {
        let catalog = v1();
        // English name looked up in the Swahili table.
        let err = catalog
            .canonical_index("Fever", Language::Swahili)
            .expect_err("should not resolve");
        assert!(matches!(err, CatalogError::UnknownSymptom { .. }));
    }

    #[test]
    fn test_partial_translation_rejected() {
        let canonical = vec!["fever".to_string(), "cough".to_string()];
        let err = SymptomCatalog::new(
            canonical,
            [
                (Language::English, vec!["Fever".into(), "Cough".into()]),
                (Language::Swahili, vec!["Homa".into()]),
            ],
        )
        .expect_err("short table");

        assert_eq!(
            err,
            CatalogError::TableLength {
                language: Language::Swahili,
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn test_missing_table_rejected() {
        let err = SymptomCatalog::new(
            vec!["fever".to_string()],
            [(Language::English, vec!["Fever".to_string()])],
        )
        .expect_err("no swahili table");
        assert_eq!(err, CatalogError::MissingTable(Language::Swahili));
    }

    #[test]
    fn test_duplicates_and_sentinel_rejected() {
        let dup = SymptomCatalog::from_rows(&[("a", "Fever", "Homa"), ("b", "Fever", "Kikohozi")]);
        assert!(matches!(dup, Err(CatalogError::DuplicateName { .. })));

        let sentinel = SymptomCatalog::from_rows(&[("a", "Others", "Homa")]);
        assert!(matches!(sentinel, Err(CatalogError::SentinelCollision { .. })));
    }

    #[test]
    fn test_options_end_with_sentinel() {
        let catalog = v1();
        let options = catalog.options(Language::Swahili);
        assert_eq!(options.len(), 12);
        assert_eq!(options.last(), Some(&"Mengineyo"));
        assert!(catalog.is_sentinel("Mengineyo", Language::Swahili));
        assert!(!catalog.is_sentinel("Others", Language::Swahili));
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("sw".parse::<Language>(), Ok(Language::Swahili));
        assert_eq!(Language::from_code("EN"), Some(Language::English));
        assert!("fr".parse::<Language>().is_err());
    }
}
