//! Region→province junctions and start-pos slot templates.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::tsv;

/// One `(full_province_name, full_region_name)` junction row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvinceRegionRow {
    pub province: String,
    pub region: String,
}

/// What a start-pos slot establishes for its region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotKind {
    /// The capital slot: decides major/minor and the base slot count.
    Primary,
    /// A special slot carrying a resource (or a legendary church).
    Secondary,
    /// A coastal slot.
    Port,
}

impl SlotKind {
    pub fn parse(token: &str) -> Option<SlotKind> {
        match token {
            "primary" => Some(SlotKind::Primary),
            "secondary" => Some(SlotKind::Secondary),
            "port" => Some(SlotKind::Port),
            _ => None,
        }
    }
}

/// One start-pos template row: `(_, game, full_region, slot_kind, building)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotRow {
    pub region: String,
    pub slot: SlotKind,
    pub building: String,
}

/// Loads the region→province junction table, keeping rows of the active
/// campaign.
pub fn load_region_junctions(
    path: &Path,
    short_tag: &str,
) -> Result<Vec<ProvinceRegionRow>, DataError> {
    let table = tsv::table_name(path);
    let raw = tsv::read_rows(path)?;

    let mut rows = Vec::new();
    for (line, fields) in raw {
        tsv::expect_arity(&table, line, &fields, 2)?;
        if !fields[0].contains(short_tag) {
            continue;
        }
        rows.push(ProvinceRegionRow {
            province: fields[0].clone(),
            region: fields[1].clone(),
        });
    }
    log::info!("Loaded {} region→province junctions from {table}", rows.len());
    Ok(rows)
}

/// Loads the start-pos slot template table for one campaign.
///
/// Rows belonging to other campaigns (by region tag or by the game token
/// column) are skipped; rows with an unknown slot kind are warned about and
/// skipped, since later exports added slot kinds this optimizer does not
/// model.
pub fn load_slot_templates(
    path: &Path,
    campaign_token: &str,
    short_tag: &str,
) -> Result<Vec<SlotRow>, DataError> {
    let table = tsv::table_name(path);
    let raw = tsv::read_rows(path)?;

    let mut rows = Vec::new();
    for (line, fields) in raw {
        tsv::expect_arity(&table, line, &fields, 5)?;
        let (game, region, kind, building) = (&fields[1], &fields[2], &fields[3], &fields[4]);
        if !region.contains(short_tag) || !game.contains(campaign_token) {
            continue;
        }
        let Some(slot) = SlotKind::parse(kind) else {
            log::warn!("{table} line {line}: unknown slot kind {kind:?}, skipping");
            continue;
        };
        rows.push(SlotRow {
            region: region.clone(),
            slot,
            building: building.clone(),
        });
    }
    log::info!("Loaded {} slot template rows from {table}", rows.len());
    Ok(rows)
}
