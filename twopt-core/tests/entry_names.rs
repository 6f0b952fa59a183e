//! Property tests for compound-identifier extraction.

use proptest::prelude::*;

use twopt_core::{extract_entry, EntryKind};

fn token() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,7}".prop_filter("tag tokens are reserved", |t| {
        t != "bld" && t != "reg" && t != "prov"
    })
}

proptest! {
    /// Composing `<prefix>_<tag>_<suffix>` and extracting the tag's entry
    /// returns `<tag>_<suffix>` for every valid prefix/suffix.
    #[test]
    fn extract_entry_round_trips(
        prefix in proptest::collection::vec(token(), 0..3),
        suffix in proptest::collection::vec(token(), 1..4),
        kind in prop_oneof![
            Just(EntryKind::Building),
            Just(EntryKind::Region),
            Just(EntryKind::Province),
        ],
    ) {
        let mut tokens = prefix;
        tokens.push(kind.tag().to_string());
        let expected = {
            let mut entry = vec![kind.tag().to_string()];
            entry.extend(suffix.iter().cloned());
            entry.join("_")
        };
        tokens.extend(suffix);
        let full = tokens.join("_");

        prop_assert_eq!(extract_entry(&full, kind).unwrap(), expected);
    }

    /// Identifiers without the tag always fail with `EntryNotFound`.
    #[test]
    fn extract_entry_missing_tag_errors(tokens in proptest::collection::vec(token(), 1..5)) {
        let full = tokens.join("_");
        for kind in EntryKind::ALL {
            prop_assert!(extract_entry(&full, kind).is_err());
        }
    }
}

#[test]
fn test_extraction_stops_at_the_next_tag() {
    let full = "att_prov_thracia_reg_thracia_constantinopolis_bld_city_major_4";
    assert_eq!(
        extract_entry(full, EntryKind::Province).unwrap(),
        "prov_thracia"
    );
    assert_eq!(
        extract_entry(full, EntryKind::Region).unwrap(),
        "reg_thracia_constantinopolis"
    );
    assert_eq!(
        extract_entry(full, EntryKind::Building).unwrap(),
        "bld_city_major_4"
    );
}
