//! Feature encoding: symptom selections to fixed-width binary vectors.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::catalog::{CatalogError, Language, SymptomCatalog};

/// Fixed-width 0/1 vector in canonical catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: Vec<u8>,
}

impl FeatureVector {
    /// All-zero vector of the given width.
    #[must_use]
    pub fn zeros(width: usize) -> Self {
        Self {
            values: vec![0; width],
        }
    }

    /// Vector with ones at `positions`. Out-of-range positions are ignored.
    #[must_use]
    pub fn from_positions<I>(width: usize, positions: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut v = Self::zeros(width);
        for p in positions {
            if let Some(slot) = v.values.get_mut(p) {
                *slot = 1;
            }
        }
        v
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }

    /// Values as model input.
    #[must_use]
    pub fn to_f64(&self) -> Vec<f64> {
        self.values.iter().map(|&v| f64::from(v)).collect()
    }

    /// Canonical positions set to 1 (the inverse of encoding).
    #[must_use]
    pub fn selected_positions(&self) -> BTreeSet<usize> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == 1)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of selected symptoms.
    #[must_use]
    pub fn count_selected(&self) -> usize {
        self.values.iter().filter(|&&v| v == 1).count()
    }
}

/// Encode selected display names into a feature vector.
///
/// The sentinel entry of `language` is skipped; everything else must be a
/// name from that language's table. Duplicates and ordering have no effect.
///
/// # Errors
/// Returns `CatalogError::UnknownSymptom` for any name outside the table.
pub fn encode<'a, I>(
    catalog: &SymptomCatalog,
    selections: I,
    language: Language,
) -> Result<FeatureVector, CatalogError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut vector = FeatureVector::zeros(catalog.len());
    for name in selections {
        if catalog.is_sentinel(name, language) {
            continue;
        }
        let position = catalog.canonical_index(name, language)?;
        vector.values[position] = 1;
    }
    Ok(vector)
}

/// Raw checklist choices split into symptoms and the free-text request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    language: Language,
    symptoms: BTreeSet<String>,
    wants_free_text: bool,
}

impl Selection {
    /// Split the user's choices for `language`.
    #[must_use]
    pub fn from_choices<I, S>(choices: I, language: Language) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut symptoms = BTreeSet::new();
        let mut wants_free_text = false;
        for choice in choices {
            let choice = choice.into();
            if choice == language.sentinel() {
                wants_free_text = true;
            } else {
                symptoms.insert(choice);
            }
        }

        Self {
            language,
            symptoms,
            wants_free_text,
        }
    }

    #[must_use]
    pub fn language(&self) -> Language {
        self.language
    }

    /// Symptom names without the sentinel.
    pub fn symptoms(&self) -> impl Iterator<Item = &str> {
        self.symptoms.iter().map(String::as_str)
    }

    /// Whether the sentinel was picked.
    #[must_use]
    pub fn wants_free_text(&self) -> bool {
        self.wants_free_text
    }

    /// Encode the symptom part of this selection.
    ///
    /// # Errors
    /// See [`encode`].
    pub fn encode(&self, catalog: &SymptomCatalog) -> Result<FeatureVector, CatalogError> {
        encode(catalog, self.symptoms(), self.language())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::MALARIA_V1_SYMPTOMS;

    fn catalog() -> SymptomCatalog {
        SymptomCatalog::from_rows(&MALARIA_V1_SYMPTOMS).expect("aligned")
    }

    #[test]
    fn test_empty_selection_is_all_zero() {
        let v = encode(&catalog(), std::iter::empty(), Language::English).expect("encode");
        assert_eq!(v, FeatureVector::zeros(11));
        assert_eq!(v.count_selected(), 0);
    }

    #[test]
    fn test_fever_and_body_pain() {
        let v = encode(&catalog(), ["Fever", "Body Pain"], Language::English).expect("encode");
        assert_eq!(v.as_slice(), &[1, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0]);
    }

    #[test]
    fn test_order_and_duplicates_do_not_matter() {
        let c = catalog();
        let a = encode(&c, ["Cough", "Headache", "Fever"], Language::English).expect("encode");
        let b = encode(&c, ["Fever", "Cough", "Headache", "Cough"], Language::English)
            .expect("encode");
        assert_eq!(a, b);
    }

    #[test]
    fn test_sentinel_is_ignored() {
        let c = catalog();
        let with = encode(&c, ["Homa", "Mengineyo"], Language::Swahili).expect("encode");
        let without = encode(&c, ["Homa"], Language::Swahili).expect("encode");
        assert_eq!(with, without);
    }

    #[test]
    fn test_unknown_name_fails() {
        let err = encode(&catalog(), ["Fever", "Sneezing"], Language::English)
            .expect_err("unknown symptom");
        assert!(matches!(err, CatalogError::UnknownSymptom { ref name, .. } if name == "Sneezing"));
    }

    #[test]
    fn test_round_trip_every_subset() {
        let c = catalog();
        let n = c.len();
        for mask in 0u32..(1 << n) {
            let chosen: BTreeSet<usize> = (0..n).filter(|i| mask & (1 << i) != 0).collect();
            let names: Vec<&str> = chosen
                .iter()
                .filter_map(|&i| c.display_name(i, Language::English))
                .collect();
            let v = encode(&c, names, Language::English).expect("encode");
            assert_eq!(v.selected_positions(), chosen);
        }
    }

    #[test]
    fn test_cross_language_equivalence() {
        let c = catalog();
        for i in 0..c.len() {
            let en = c.display_name(i, Language::English).expect("en");
            let sw = c.display_name(i, Language::Swahili).expect("sw");
            assert_eq!(
                encode(&c, [en], Language::English).expect("en"),
                encode(&c, [sw], Language::Swahili).expect("sw"),
            );
        }
    }

    #[test]
    fn test_selection_splits_sentinel() {
        let s = Selection::from_choices(["Fever", "Others"], Language::English);
        assert!(s.wants_free_text());
        assert_eq!(s.symptoms().collect::<Vec<_>>(), vec!["Fever"]);
        let v = s.encode(&catalog()).expect("encode");
        assert_eq!(v.selected_positions(), BTreeSet::from([0]));
    }
}
