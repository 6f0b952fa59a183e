//! Builds the campaign catalog and the province tree from loaded tables.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::building::{Building, BuildingId};
use crate::bundle::{GameContext, Religion};
use crate::classifier::{extract_entry, EntryKind};
use crate::error::CoreError;
use crate::province::Province;
use crate::region::{Region, RegionKind, RegionPort, Resource};
use twopt_data::{CultureVariantRow, EffectRow, FactionRow, ProvinceRegionRow, SlotKind, SlotRow};

/// The Attila-only admission tables.
pub struct VariantTables {
    pub variants: Vec<CultureVariantRow>,
    pub factions: Vec<FactionRow>,
    /// subculture → culture
    pub subcultures: std::collections::HashMap<String, String>,
}

/// Everything one campaign needs, as loaded by `twopt-data`.
pub struct CampaignTables {
    pub effects: Vec<EffectRow>,
    pub junctions: Vec<ProvinceRegionRow>,
    pub slots: Vec<SlotRow>,
    /// `None` for Rome II, which has no culture-variant filtering.
    pub variants: Option<VariantTables>,
}

/// The parsed campaign: buildings, provinces, and print-name tables keyed by
/// entry name (`bld_…`, `reg_…`).
pub struct Catalog {
    pub buildings: BTreeMap<BuildingId, Building>,
    pub provinces: Vec<Province>,
    pub building_print_names: FxHashMap<String, String>,
    pub region_print_names: FxHashMap<String, String>,
}

/// Which buildings the active faction may construct, with their display
/// names, per the culture variants table.
fn admitted_buildings(
    ctx: &GameContext,
    tables: &VariantTables,
) -> Result<FxHashMap<String, String>, CoreError> {
    let faction_id = ctx.bundle.faction_id();
    let faction = tables
        .factions
        .iter()
        .find(|f| f.id == faction_id)
        .ok_or_else(|| CoreError::UnknownFaction(faction_id.to_string()))?;
    let culture = tables
        .subcultures
        .get(&faction.subculture)
        .cloned()
        .unwrap_or_default();
    let religion = ctx.bundle.religion().unwrap_or(Religion::Any);

    let mut admitted = FxHashMap::default();
    for row in &tables.variants {
        let of_faction = row.faction == faction_id
            || (row.faction.is_empty() && row.subculture == faction.subculture)
            || (row.faction.is_empty() && row.subculture.is_empty() && row.culture == culture)
            || (row.faction.is_empty() && row.subculture.is_empty() && row.culture.is_empty());
        let of_religion = row.building.contains("religion")
            && (religion == Religion::Any || row.building.contains(religion.token()));
        if of_faction || of_religion {
            admitted
                .entry(row.building.clone())
                .or_insert_with(|| row.print_name.clone());
        }
    }
    Ok(admitted)
}

/// Assembles the catalog for the context's campaign.
pub fn build_catalog(ctx: &GameContext, tables: &CampaignTables) -> Result<Catalog, CoreError> {
    let admitted = match &tables.variants {
        Some(v) => Some(admitted_buildings(ctx, v)?),
        None => None,
    };

    // Buildings with their effect bags.
    let mut buildings: BTreeMap<BuildingId, Building> = BTreeMap::new();
    for row in &tables.effects {
        let print_name = match &admitted {
            Some(map) => match map.get(&row.building) {
                Some(print) => Some(print.as_str()),
                None => continue,
            },
            None => None,
        };
        buildings
            .entry(BuildingId::new(row.building.clone()))
            .or_insert_with(|| Building::new(row.building.clone(), print_name))
            .add_effect(row.scope, &row.effect, row.amount);
    }

    let mut building_print_names = FxHashMap::default();
    for (id, building) in &buildings {
        if let Ok(entry) = extract_entry(id.as_str(), EntryKind::Building) {
            building_print_names.insert(entry, crate::entity::Named::print_name(building).to_string());
        }
    }

    // Region → province mapping from the junction table.
    let mut region_to_province: FxHashMap<String, String> = FxHashMap::default();
    for row in &tables.junctions {
        let province = extract_entry(&row.province, EntryKind::Province)?;
        let region = extract_entry(&row.region, EntryKind::Region)?;
        region_to_province.insert(region, province);
    }

    // Group slot rows per region, keeping first-appearance order.
    let mut region_order: Vec<String> = Vec::new();
    let mut slots_by_region: FxHashMap<String, Vec<&SlotRow>> = FxHashMap::default();
    for row in &tables.slots {
        let region = extract_entry(&row.region, EntryKind::Region)?;
        slots_by_region
            .entry(region.clone())
            .or_insert_with(|| {
                region_order.push(region.clone());
                Vec::new()
            })
            .push(row);
    }

    // The church a secondary city slot stands for follows the bundle's
    // religion.
    let church = match ctx.bundle.religion() {
        Some(Religion::Catholic) => Resource::ChurchCatholic,
        _ => Resource::ChurchOrthodox,
    };

    let mut provinces: Vec<Province> = Vec::new();
    let mut province_index: FxHashMap<String, usize> = FxHashMap::default();
    let mut region_print_names = FxHashMap::default();

    for region_name in &region_order {
        let Some(province_name) = region_to_province.get(region_name) else {
            log::warn!("region {region_name} has no province mapping, skipping");
            continue;
        };
        let rows = &slots_by_region[region_name];

        let primary = rows.iter().find(|r| r.slot == SlotKind::Primary);
        let (kind, slot_count) = match primary {
            Some(row) if row.building.contains("major") => (RegionKind::Major, 5),
            Some(_) => (RegionKind::Minor, 3),
            None => {
                log::warn!("region {region_name} has no primary slot, assuming minor");
                (RegionKind::Minor, 3)
            }
        };

        let mut region = Region::new(
            region_name.clone(),
            None,
            kind,
            RegionPort::NoPort,
            Resource::None,
            slot_count,
        );
        for row in rows {
            match row.slot {
                SlotKind::Primary => {}
                SlotKind::Port => {
                    if row.building.contains("spice") {
                        region.resource = Resource::Spice;
                    } else {
                        region.port = RegionPort::Port;
                    }
                }
                SlotKind::Secondary => {
                    if row.building.contains("city") {
                        region.resource = church;
                    } else if let Some(resource) = Resource::from_building_token(&row.building) {
                        region.resource = resource;
                    }
                }
            }
        }

        region_print_names.insert(region_name.clone(), region_name.clone());
        let idx = *province_index.entry(province_name.clone()).or_insert_with(|| {
            provinces.push(Province::new(province_name.clone(), None));
            provinces.len() - 1
        });
        provinces[idx].add_region(region);
    }

    log::info!(
        "Catalog: {} buildings, {} provinces, {} regions",
        buildings.len(),
        provinces.len(),
        region_order.len()
    );

    Ok(Catalog {
        buildings,
        provinces,
        building_print_names,
        region_print_names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{AttilaCampaign, AttilaFaction, GameBundle, Religion};
    use twopt_data::Scope;

    fn ctx() -> GameContext {
        GameContext::new(GameBundle::attila(
            AttilaCampaign::Attila,
            AttilaFaction::RomanEast,
            Religion::Orthodox,
        ))
    }

    fn effect(building: &str, effect: &str, scope: Scope, amount: f64) -> EffectRow {
        EffectRow {
            building: building.to_string(),
            effect: effect.to_string(),
            scope,
            amount,
        }
    }

    fn tables() -> CampaignTables {
        CampaignTables {
            effects: vec![
                effect(
                    "att_bld_roman_east_city_major_1",
                    "att_effect_economy_gdp_trade_local",
                    Scope::Building,
                    200.0,
                ),
                effect(
                    "att_bld_roman_east_city_major_1",
                    "att_effect_region_food_consumption",
                    Scope::Region,
                    4.0,
                ),
            ],
            junctions: vec![ProvinceRegionRow {
                province: "att_prov_thracia".to_string(),
                region: "att_reg_thracia_constantinopolis".to_string(),
            }],
            slots: vec![
                SlotRow {
                    region: "att_reg_thracia_constantinopolis".to_string(),
                    slot: SlotKind::Primary,
                    building: "att_bld_roman_east_city_major_4".to_string(),
                },
                SlotRow {
                    region: "att_reg_thracia_constantinopolis".to_string(),
                    slot: SlotKind::Port,
                    building: "att_bld_roman_east_port_fish_1".to_string(),
                },
                SlotRow {
                    region: "att_reg_thracia_constantinopolis".to_string(),
                    slot: SlotKind::Secondary,
                    building: "att_bld_roman_east_city_church_1".to_string(),
                },
            ],
            variants: None,
        }
    }

    #[test]
    fn test_build_catalog_assembles_tree() {
        let catalog = build_catalog(&ctx(), &tables()).unwrap();
        assert_eq!(catalog.buildings.len(), 1);
        assert_eq!(catalog.provinces.len(), 1);

        let province = &catalog.provinces[0];
        assert_eq!(crate::entity::Named::name(province), "prov_thracia");
        let region = &province.regions[0];
        assert_eq!(region.kind, RegionKind::Major);
        assert_eq!(region.slot_count, 5);
        assert_eq!(region.port, RegionPort::Port);
        assert_eq!(region.resource, Resource::ChurchOrthodox);
    }

    #[test]
    fn test_orphan_region_is_skipped() {
        let mut t = tables();
        t.junctions.clear();
        let catalog = build_catalog(&ctx(), &t).unwrap();
        assert!(catalog.provinces.is_empty());
    }

    #[test]
    fn test_variant_admission_filters_buildings() {
        let mut t = tables();
        t.effects.push(effect(
            "att_bld_roman_west_city_major_1",
            "att_effect_economy_gdp_trade_local",
            Scope::Building,
            150.0,
        ));
        t.variants = Some(VariantTables {
            variants: vec![CultureVariantRow {
                building: "att_bld_roman_east_city_major_1".to_string(),
                culture: String::new(),
                subculture: "sc_rom_east".to_string(),
                faction: String::new(),
                print_name: "Imperial City".to_string(),
            }],
            factions: vec![FactionRow {
                id: "att_fact_eastern_roman_empire".to_string(),
                name: "Eastern Roman Empire".to_string(),
                subculture: "sc_rom_east".to_string(),
            }],
            subcultures: [("sc_rom_east".to_string(), "c_roman".to_string())]
                .into_iter()
                .collect(),
        });

        let catalog = build_catalog(&ctx(), &t).unwrap();
        assert_eq!(catalog.buildings.len(), 1);
        let (id, building) = catalog.buildings.iter().next().unwrap();
        assert_eq!(id.as_str(), "att_bld_roman_east_city_major_1");
        assert_eq!(crate::entity::Named::print_name(building), "Imperial City");
        assert_eq!(
            catalog
                .building_print_names
                .get("bld_roman_east_city_major_1")
                .unwrap(),
            "Imperial City"
        );
    }

    #[test]
    fn test_unknown_faction_errors() {
        let mut t = tables();
        t.variants = Some(VariantTables {
            variants: vec![],
            factions: vec![],
            subcultures: Default::default(),
        });
        assert!(matches!(
            build_catalog(&ctx(), &t),
            Err(CoreError::UnknownFaction(_))
        ));
    }
}
