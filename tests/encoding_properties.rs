//! Properties of the symptom encoding over both built-in catalogs.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use diagai::domain::{encode, Language, ModelBundle, SymptomCatalog};

fn catalog(name: &str) -> SymptomCatalog {
    ModelBundle::builtin(name).expect("bundle").catalog().clone()
}

#[test]
fn random_subsets_round_trip_in_23_symptom_catalog() {
    let c = catalog("malaria-v2");
    let mut rng = ChaCha20Rng::seed_from_u64(0x5eed);

    for _ in 0..2_000 {
        let chosen: BTreeSet<usize> = (0..c.len()).filter(|_| rng.gen_bool(0.3)).collect();
        let language = if rng.gen_bool(0.5) {
            Language::English
        } else {
            Language::Swahili
        };

        let mut names: Vec<&str> = chosen
            .iter()
            .filter_map(|&i| c.display_name(i, language))
            .collect();
        names.shuffle(&mut rng);

        let v = encode(&c, names, language).expect("encode");
        assert_eq!(v.len(), 23);
        assert_eq!(v.selected_positions(), chosen);
    }
}

#[test]
fn empty_selection_is_all_zero_in_every_catalog() {
    for name in diagai::domain::BUILTIN_BUNDLES {
        let c = catalog(name);
        for language in Language::ALL {
            let v = encode(&c, std::iter::empty(), language).expect("encode");
            assert_eq!(v.len(), c.len());
            assert!(v.as_slice().iter().all(|&x| x == 0));
        }
    }
}

#[test]
fn every_position_is_equivalent_across_languages() {
    for name in diagai::domain::BUILTIN_BUNDLES {
        let c = catalog(name);
        for i in 0..c.len() {
            let en = c.display_name(i, Language::English).expect("en");
            let sw = c.display_name(i, Language::Swahili).expect("sw");
            assert_eq!(
                c.canonical_index(en, Language::English),
                c.canonical_index(sw, Language::Swahili)
            );
        }
    }
}

#[test]
fn names_from_the_other_language_are_unknown() {
    let c = catalog("malaria-v1");
    assert!(encode(&c, ["Homa"], Language::English).is_err());
    assert!(encode(&c, ["Fever"], Language::Swahili).is_err());
    // Sentinels are per language too.
    assert!(encode(&c, ["Others"], Language::Swahili).is_err());
}
