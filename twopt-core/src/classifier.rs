//! Name-driven building classification.
//!
//! The campaign tables encode a building's semantics in its identifier
//! (`att_bld_roman_east_city_major_4`). The classifier is the single place
//! where those tokens are interpreted; one implementation per game, because
//! the token vocabulary drifts between titles.

use crate::bundle::{AttilaCampaign, AttilaFaction, RomeCampaign, RomeFaction};
use crate::error::CoreError;

/// Kinds of entry a compound identifier may embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Building,
    Region,
    Province,
}

impl EntryKind {
    pub const ALL: [EntryKind; 3] = [EntryKind::Building, EntryKind::Region, EntryKind::Province];

    pub fn tag(self) -> &'static str {
        match self {
            EntryKind::Building => "bld",
            EntryKind::Region => "reg",
            EntryKind::Province => "prov",
        }
    }
}

/// Extracts the sub-name of one kind from a compound identifier:
/// `att_bld_roman_west_city_major_1` → `bld_roman_west_city_major_1`.
///
/// The slice starts at the kind's tag token and runs to the next tag token
/// of another kind, or the end of the identifier.
pub fn extract_entry(name: &str, kind: EntryKind) -> Result<String, CoreError> {
    let tokens: Vec<&str> = name.split('_').collect();
    let tag = kind.tag();
    let start = tokens
        .iter()
        .position(|t| *t == tag)
        .ok_or_else(|| CoreError::EntryNotFound {
            name: name.to_string(),
            tag,
        })?;

    let other_tags: Vec<&str> = EntryKind::ALL
        .iter()
        .filter(|k| **k != kind)
        .map(|k| k.tag())
        .collect();
    let mut end = start + 1;
    while end < tokens.len() && !other_tags.contains(&tokens[end]) {
        end += 1;
    }
    Ok(tokens[start..end].join("_"))
}

/// Token rules shared by the Total War titles, with per-game overrides for
/// faction and campaign admission.
///
/// Predicates are pure containment tests; when several fire for one
/// building, the problem builder applies them in a fixed order (type, then
/// resource, then port).
pub trait BuildingClassifier {
    /// Buildings only a major settlement may hold.
    fn is_major(&self, name: &str) -> bool {
        ["major", "civic", "military_upgrade", "aqueducts", "sewers"]
            .iter()
            .any(|t| name.contains(t))
    }

    /// Buildings only a minor settlement may hold.
    fn is_minor(&self, name: &str) -> bool {
        ["minor", "agriculture", "livestock"]
            .iter()
            .any(|t| name.contains(t))
    }

    fn is_major_city(&self, name: &str) -> bool {
        name.contains("city_major")
    }

    fn is_minor_city(&self, name: &str) -> bool {
        name.contains("city_minor")
    }

    /// Resource-slot buildings. Spice chains count even though they sit in
    /// port slots.
    fn is_resource(&self, name: &str) -> bool {
        (name.contains("resource") && !name.contains("port")) || name.contains("spice")
    }

    fn is_port(&self, name: &str) -> bool {
        name.contains("port") && !name.contains("spice")
    }

    /// Attila ships both `port_fish_1` and `port_resource_fish_1`; the
    /// non-resource spelling is the redundant one.
    fn is_duplicate(&self, name: &str) -> bool {
        name.contains("port") && !name.contains("resource")
    }

    /// Whether the building belongs to the active campaign.
    fn is_of_campaign(&self, name: &str) -> bool;

    /// Whether the active faction may construct this building.
    fn is_of_faction(&self, name: &str) -> bool;

    /// Whether an effect contributes to GDP. `include_fertility` selects the
    /// fertility-scaled half of the split sum.
    fn effect_is_gdp(&self, effect: &str, include_fertility: bool) -> bool {
        effect.contains("gdp")
            && !effect.contains("mod")
            && effect.contains("fertility") == include_fertility
    }
}

fn has_all_token(name: &str) -> bool {
    name.split('_').any(|t| t == "all")
}

/// Classifier for Total War: Attila and its DLC campaigns.
#[derive(Debug, Clone, Copy)]
pub struct AttilaClassifier {
    campaign: AttilaCampaign,
    faction: AttilaFaction,
}

impl AttilaClassifier {
    pub fn new(campaign: AttilaCampaign, faction: AttilaFaction) -> Self {
        Self { campaign, faction }
    }
}

impl BuildingClassifier for AttilaClassifier {
    fn is_of_campaign(&self, name: &str) -> bool {
        name.starts_with(self.campaign.short_tag())
    }

    fn is_of_faction(&self, name: &str) -> bool {
        // Shared buildings carry an `all` token, with livestock carve-outs
        // per culture: camels stay eastern, cows stay Sassanid, pigs are
        // never shared.
        let shared = |excluded: &[&str]| {
            has_all_token(name) && !excluded.iter().any(|t| name.contains(t))
        };
        match self.faction {
            AttilaFaction::RomanEast => {
                (name.contains("roman") && !name.contains("west"))
                    || name.contains("orthodox")
                    || shared(&["camel", "pigs"])
            }
            AttilaFaction::RomanWest => {
                (name.contains("roman") && !name.contains("east"))
                    || name.contains("catholic")
                    || shared(&["camel", "pigs"])
            }
            AttilaFaction::Franks => {
                name.contains("barbarian") || name.contains("catholic") || shared(&["camel", "pigs"])
            }
            AttilaFaction::Sassanids => {
                name.contains("eastern") || name.contains("zoro") || shared(&["cows", "pigs"])
            }
            // Factions without a rule set have no admissible buildings.
            _ => false,
        }
    }
}

/// Classifier for Total War: Rome II.
///
/// Rome II admits buildings purely by campaign tag; there is no culture
/// variant table to narrow by faction.
#[derive(Debug, Clone, Copy)]
pub struct RomeClassifier {
    campaign: RomeCampaign,
    #[allow(dead_code)]
    faction: RomeFaction,
}

impl RomeClassifier {
    pub fn new(campaign: RomeCampaign, faction: RomeFaction) -> Self {
        Self { campaign, faction }
    }
}

impl BuildingClassifier for RomeClassifier {
    fn is_of_campaign(&self, name: &str) -> bool {
        name.starts_with(self.campaign.short_tag())
    }

    fn is_of_faction(&self, _name: &str) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn east() -> AttilaClassifier {
        AttilaClassifier::new(AttilaCampaign::Attila, AttilaFaction::RomanEast)
    }

    #[test]
    fn test_extract_entry_building() {
        assert_eq!(
            extract_entry("att_bld_roman_west_city_major_1", EntryKind::Building).unwrap(),
            "bld_roman_west_city_major_1"
        );
    }

    #[test]
    fn test_extract_entry_stops_at_next_tag() {
        let compound = "reg_thracia_constantinopolis_att_bld_roman_east_port_3";
        assert_eq!(
            extract_entry(compound, EntryKind::Building).unwrap(),
            "bld_roman_east_port_3"
        );
        // The region slice runs until the `bld` tag.
        assert_eq!(
            extract_entry(compound, EntryKind::Region).unwrap(),
            "reg_thracia_constantinopolis_att"
        );
    }

    #[test]
    fn test_extract_entry_missing_tag() {
        let err = extract_entry("att_fact_eastern_roman_empire", EntryKind::Province).unwrap_err();
        assert!(matches!(err, CoreError::EntryNotFound { tag: "prov", .. }));
    }

    #[test]
    fn test_major_minor_tokens() {
        let c = east();
        assert!(c.is_major("att_bld_all_aqueducts_2"));
        assert!(c.is_major("att_bld_roman_east_civic_3"));
        assert!(c.is_minor("att_bld_all_agriculture_herd_cows_1"));
        assert!(!c.is_minor("att_bld_roman_east_city_major_1"));
        assert!(c.is_major_city("att_bld_roman_east_city_major_1"));
        assert!(c.is_minor_city("att_bld_roman_east_city_minor_2"));
    }

    #[test]
    fn test_resource_port_duplicate_rules() {
        let c = east();
        assert!(c.is_resource("att_bld_all_resource_wine_2"));
        assert!(!c.is_resource("att_bld_roman_east_port_resource_fish_2"));
        assert!(c.is_resource("att_bld_roman_east_port_spice_3"));
        assert!(c.is_port("att_bld_roman_east_port_fish_2"));
        assert!(!c.is_port("att_bld_roman_east_port_spice_3"));
        assert!(c.is_duplicate("att_bld_roman_east_port_fish_2"));
        assert!(!c.is_duplicate("att_bld_roman_east_port_resource_fish_2"));
    }

    #[test]
    fn test_faction_admission_east_rome() {
        let c = east();
        assert!(c.is_of_faction("att_bld_roman_east_city_major_4"));
        assert!(!c.is_of_faction("att_bld_roman_west_city_major_4"));
        assert!(c.is_of_faction("att_bld_religion_orthodox_legendary_1"));
        assert!(c.is_of_faction("att_bld_all_agriculture_herd_cows_1"));
        assert!(!c.is_of_faction("att_bld_all_agriculture_herd_camel_1"));
        assert!(!c.is_of_faction("att_bld_all_agriculture_herd_pigs_1"));
        // `all` must be a whole token, not a substring.
        assert!(!c.is_of_faction("att_bld_wallachia_fort_1"));
    }

    #[test]
    fn test_faction_admission_sassanids() {
        let c = AttilaClassifier::new(AttilaCampaign::Attila, AttilaFaction::Sassanids);
        assert!(c.is_of_faction("att_bld_eastern_city_major_2"));
        assert!(c.is_of_faction("att_bld_zoro_temple_2"));
        assert!(c.is_of_faction("att_bld_all_agriculture_herd_cows_1"));
        assert!(!c.is_of_faction("att_bld_all_agriculture_herd_pigs_1"));
        assert!(!c.is_of_faction("att_bld_roman_east_city_major_2"));
    }

    #[test]
    fn test_campaign_tag_check() {
        let c = east();
        assert!(c.is_of_campaign("att_bld_roman_east_city_major_1"));
        assert!(!c.is_of_campaign("bel_bld_roman_city_major_1"));

        let r = RomeClassifier::new(RomeCampaign::Rome, RomeFaction::Rome);
        assert!(r.is_of_campaign("rom_bld_city_major_1"));
        assert!(!r.is_of_campaign("att_bld_roman_east_city_major_1"));
    }

    #[test]
    fn test_effect_is_gdp_split() {
        let c = east();
        assert!(c.effect_is_gdp("att_effect_economy_gdp_trade_local", false));
        assert!(!c.effect_is_gdp("att_effect_economy_gdp_trade_local", true));
        assert!(c.effect_is_gdp("att_effect_economy_gdp_agriculture_fertility", true));
        assert!(!c.effect_is_gdp("att_effect_economy_gdp_mod_industry", false));
        assert!(!c.effect_is_gdp("att_effect_public_order_base", false));
    }
}
