//! Faction, culture and building-variant tables.
//!
//! These three tables decide which buildings a faction may construct at all
//! and supply human-readable building names. They only exist for Attila;
//! Rome II admission works purely on name tokens.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::tsv;

/// One building variant: which culture/subculture/faction may build it,
/// plus its display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CultureVariantRow {
    pub building: String,
    pub culture: String,
    pub subculture: String,
    pub faction: String,
    pub print_name: String,
}

/// One faction with its subculture, resolved to a culture via
/// [`load_subcultures`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactionRow {
    pub id: String,
    pub name: String,
    pub subculture: String,
}

/// Loads the building culture variants table for one campaign.
pub fn load_culture_variants(
    path: &Path,
    short_tag: &str,
) -> Result<Vec<CultureVariantRow>, DataError> {
    let table = tsv::table_name(path);
    let raw = tsv::read_rows(path)?;

    let mut rows = Vec::new();
    for (line, fields) in raw {
        tsv::expect_arity(&table, line, &fields, 5)?;
        if !fields[0].starts_with(short_tag) {
            continue;
        }
        rows.push(CultureVariantRow {
            building: fields[0].clone(),
            culture: fields[1].clone(),
            subculture: fields[2].clone(),
            faction: fields[3].clone(),
            print_name: fields[4].clone(),
        });
    }
    log::info!("Loaded {} culture variant rows from {table}", rows.len());
    Ok(rows)
}

/// Loads the factions table: faction id, display name, subculture.
pub fn load_factions(path: &Path) -> Result<Vec<FactionRow>, DataError> {
    let table = tsv::table_name(path);
    let raw = tsv::read_rows(path)?;

    let mut rows = Vec::new();
    for (line, fields) in raw {
        tsv::expect_arity(&table, line, &fields, 5)?;
        rows.push(FactionRow {
            id: fields[0].clone(),
            subculture: fields[2].clone(),
            name: fields[4].clone(),
        });
    }
    Ok(rows)
}

/// Loads the subculture→culture mapping.
pub fn load_subcultures(path: &Path) -> Result<HashMap<String, String>, DataError> {
    let table = tsv::table_name(path);
    let raw = tsv::read_rows(path)?;

    let mut map = HashMap::new();
    for (line, fields) in raw {
        tsv::expect_arity(&table, line, &fields, 2)?;
        map.insert(fields[0].clone(), fields[1].clone());
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_culture_variants_keep_print_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("building_culture_variants_table.tsv");
        let mut f = File::create(&path).unwrap();
        write!(
            f,
            "att_bld_roman_east_city_major_1\trom\trom_east\t\tImperial City\n\
             cha_bld_city_minor_1\tfrank\t\t\tVillage\n"
        )
        .unwrap();

        let rows = load_culture_variants(&path, "att").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].print_name, "Imperial City");
        assert_eq!(rows[0].faction, "");
    }

    #[test]
    fn test_factions_resolve_via_subcultures() {
        let dir = tempdir().unwrap();
        let factions = dir.path().join("factions_table.tsv");
        let mut f = File::create(&factions).unwrap();
        write!(
            f,
            "att_fact_eastern_roman_empire\tx\tsc_rom_east\tx\tEastern Roman Empire\n"
        )
        .unwrap();

        let subcultures = dir.path().join("cultures_subcultures_table.tsv");
        let mut f = File::create(&subcultures).unwrap();
        write!(f, "sc_rom_east\tc_roman\n").unwrap();

        let rows = load_factions(&factions).unwrap();
        let map = load_subcultures(&subcultures).unwrap();
        assert_eq!(rows[0].subculture, "sc_rom_east");
        assert_eq!(map.get("sc_rom_east").unwrap(), "c_roman");
    }
}
