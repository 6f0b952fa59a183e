//! Building→effect junction table.
//!
//! Each row attaches one effect to one building at one scope:
//! `(building, effect, scope, amount, _, _)`. The trailing two fields are
//! ignored here but counted, so the older four-field export is rejected.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::tsv;

/// Target scope of an effect, parsed once at the data boundary.
///
/// The raw tokens look like `faction_to_faction_own`,
/// `building_to_building_own` and so on; only the prefix carries meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Scope {
    Faction,
    Province,
    Region,
    Building,
}

impl Scope {
    pub const ALL: [Scope; 4] = [Scope::Faction, Scope::Province, Scope::Region, Scope::Building];

    /// Classifies a raw scope token by prefix. Returns `None` for tokens
    /// outside the four known scopes.
    pub fn parse(token: &str) -> Option<Scope> {
        if token.starts_with("faction") {
            Some(Scope::Faction)
        } else if token.starts_with("province") {
            Some(Scope::Province)
        } else if token.starts_with("region") {
            Some(Scope::Region)
        } else if token.starts_with("building") {
            Some(Scope::Building)
        } else {
            None
        }
    }
}

/// One effect attached to one building.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectRow {
    pub building: String,
    pub effect: String,
    pub scope: Scope,
    pub amount: f64,
}

/// Loads the junction table, keeping only rows whose building name starts
/// with the active campaign's short tag.
///
/// A building with an effect at an unrecognized scope is dropped entirely:
/// its effect bag would be incomplete, so it must not reach the optimizer.
pub fn load_building_effects(path: &Path, short_tag: &str) -> Result<Vec<EffectRow>, DataError> {
    let table = tsv::table_name(path);
    let raw = tsv::read_rows(path)?;

    let mut rows = Vec::new();
    let mut poisoned: HashSet<String> = HashSet::new();
    for (line, fields) in raw {
        tsv::expect_arity(&table, line, &fields, 6)?;
        let building = &fields[0];
        if !building.starts_with(short_tag) {
            continue;
        }
        let Some(scope) = Scope::parse(&fields[2]) else {
            log::warn!(
                "{table} line {line}: unsupported scope {:?} for {building}, dropping building",
                fields[2]
            );
            poisoned.insert(building.clone());
            continue;
        };
        let amount: f64 = fields[3]
            .trim()
            .parse()
            .map_err(|_| DataError::BadAmount {
                table: table.clone(),
                line,
                value: fields[3].clone(),
            })?;
        rows.push(EffectRow {
            building: building.clone(),
            effect: fields[1].clone(),
            scope,
            amount,
        });
    }

    if !poisoned.is_empty() {
        rows.retain(|r| !poisoned.contains(&r.building));
    }
    log::info!(
        "Loaded {} effect rows from {table} ({} buildings dropped for unknown scopes)",
        rows.len(),
        poisoned.len()
    );
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_table(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("building_effects_junction_table.tsv");
        let mut f = File::create(&path).unwrap();
        write!(f, "{content}").unwrap();
        (dir, path)
    }

    #[test]
    fn test_scope_parse_prefixes() {
        assert_eq!(Scope::parse("faction_to_faction_own"), Some(Scope::Faction));
        assert_eq!(Scope::parse("province_to_region_own"), Some(Scope::Province));
        assert_eq!(Scope::parse("region_to_region_own"), Some(Scope::Region));
        assert_eq!(Scope::parse("building_to_building_own"), Some(Scope::Building));
        assert_eq!(Scope::parse("garrison_to_building"), None);
    }

    #[test]
    fn test_load_filters_by_campaign_tag() {
        let (_dir, path) = write_table(
            "att_bld_a\teff_gdp\tbuilding_to_building_own\t100.0\tx\ty\n\
             rom_bld_b\teff_gdp\tbuilding_to_building_own\t50.0\tx\ty\n",
        );
        let rows = load_building_effects(&path, "att").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].building, "att_bld_a");
        assert_eq!(rows[0].amount, 100.0);
    }

    #[test]
    fn test_unknown_scope_drops_whole_building() {
        let (_dir, path) = write_table(
            "att_bld_a\teff_gdp\tbuilding_to_building_own\t100.0\tx\ty\n\
             att_bld_a\teff_other\tgarrison_weirdness\t5.0\tx\ty\n\
             att_bld_b\teff_gdp\tregion_to_region_own\t10.0\tx\ty\n",
        );
        let rows = load_building_effects(&path, "att").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].building, "att_bld_b");
    }

    #[test]
    fn test_four_field_export_is_rejected() {
        let (_dir, path) = write_table("att_bld_a\teff_gdp\tbuilding_to_building_own\t100.0\n");
        let err = load_building_effects(&path, "att").unwrap_err();
        assert!(matches!(err, DataError::Schema { expected: 6, got: 4, .. }));
    }

    #[test]
    fn test_bad_amount_is_an_error() {
        let (_dir, path) =
            write_table("att_bld_a\teff_gdp\tbuilding_to_building_own\tlots\tx\ty\n");
        let err = load_building_effects(&path, "att").unwrap_err();
        assert!(matches!(err, DataError::BadAmount { .. }));
    }
}
