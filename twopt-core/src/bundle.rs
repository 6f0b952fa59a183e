//! The active game: campaign, faction, religion and classifier, carried as
//! one explicit value.
//!
//! The original tooling kept this in process-wide globals; here a
//! [`GameContext`] is threaded by reference through catalog construction and
//! the problem builder. Two provinces sharing a context must not be built
//! concurrently, since the classifier and fertility are read throughout.

use crate::classifier::{AttilaClassifier, BuildingClassifier, RomeClassifier};
use crate::entity::NameMode;

/// Attila campaigns, with their `(full_token, short_tag)` pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttilaCampaign {
    Attila,
    LastRoman,
    Charlemagne,
}

impl AttilaCampaign {
    pub fn full_token(self) -> &'static str {
        match self {
            AttilaCampaign::Attila => "main_attila",
            AttilaCampaign::LastRoman => "bel_attila",
            AttilaCampaign::Charlemagne => "cha_attila",
        }
    }

    pub fn short_tag(self) -> &'static str {
        match self {
            AttilaCampaign::Attila => "att",
            AttilaCampaign::LastRoman => "bel",
            AttilaCampaign::Charlemagne => "cha",
        }
    }
}

/// Rome II campaigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomeCampaign {
    Rome,
    Hannibal,
    EmpireDivided,
    ImperatorAugustus,
    RiseOfTheRepublic,
    Gauls,
    Sparta,
}

impl RomeCampaign {
    pub fn full_token(self) -> &'static str {
        match self {
            RomeCampaign::Rome => "main_rome",
            RomeCampaign::Hannibal => "main_punic",
            RomeCampaign::EmpireDivided => "main_3c",
            // Same campaign map as Empire Divided.
            RomeCampaign::ImperatorAugustus => "main_emperor",
            RomeCampaign::RiseOfTheRepublic => "main_invasion",
            RomeCampaign::Gauls => "main_gaul",
            RomeCampaign::Sparta => "main_greek",
        }
    }

    pub fn short_tag(self) -> &'static str {
        match self {
            RomeCampaign::Rome => "rom",
            RomeCampaign::Hannibal => "pun",
            RomeCampaign::EmpireDivided | RomeCampaign::ImperatorAugustus => "emp",
            RomeCampaign::RiseOfTheRepublic => "inv",
            RomeCampaign::Gauls => "gaul",
            RomeCampaign::Sparta => "pel",
        }
    }
}

/// Playable Attila factions. Only the first four carry building-admission
/// rules; the rest are placeholders for completeness of the start-pos data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttilaFaction {
    RomanEast,
    RomanWest,
    Franks,
    Sassanids,
    Vandals,
    Visigoths,
    Ostrogoths,
    Saxons,
    Huns,
    Alans,
}

impl AttilaFaction {
    /// Faction id as it appears in the factions table.
    pub fn id(self) -> &'static str {
        match self {
            AttilaFaction::RomanEast => "att_fact_eastern_roman_empire",
            AttilaFaction::RomanWest => "att_fact_western_roman_empire",
            AttilaFaction::Franks => "att_fact_franci",
            AttilaFaction::Sassanids => "att_fact_sassanid_empire",
            AttilaFaction::Vandals => "att_fact_vandali",
            AttilaFaction::Visigoths => "att_fact_visigothi",
            AttilaFaction::Ostrogoths => "att_fact_ostrogothi",
            AttilaFaction::Saxons => "att_fact_saxones",
            AttilaFaction::Huns => "att_fact_hunni",
            AttilaFaction::Alans => "att_fact_alani",
        }
    }
}

/// A representative set of Rome II factions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomeFaction {
    Rome,
    Carthage,
    Athens,
    Sparta,
    Macedon,
    Egypt,
    Parthia,
    Iceni,
}

impl RomeFaction {
    pub fn id(self) -> &'static str {
        match self {
            RomeFaction::Rome => "rom_rome",
            RomeFaction::Carthage => "rom_carthage",
            RomeFaction::Athens => "rom_athens",
            RomeFaction::Sparta => "rom_sparta",
            RomeFaction::Macedon => "rom_macedon",
            RomeFaction::Egypt => "rom_ptolemaics",
            RomeFaction::Parthia => "rom_parthia",
            RomeFaction::Iceni => "rom_iceni",
        }
    }
}

/// Religions of the Attila era. The token is matched against building
/// identifiers (`religion_orthodox_legendary` and friends).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Religion {
    Any,
    Catholic,
    Arian,
    Orthodox,
    Eastern,
    Germanic,
    Celtic,
    GrecoRoman,
    Manichaeist,
    Zoroastrian,
    Judaism,
    Islam,
    Tengrism,
    Other,
}

impl Religion {
    pub fn token(self) -> &'static str {
        match self {
            Religion::Any => "any",
            Religion::Catholic => "catholic",
            Religion::Arian => "arian",
            Religion::Orthodox => "orthodox",
            Religion::Eastern => "eastern",
            Religion::Germanic => "germanic",
            Religion::Celtic => "celtic",
            Religion::GrecoRoman => "grecoroman",
            Religion::Manichaeist => "manichaeist",
            Religion::Zoroastrian => "zoroastrian",
            Religion::Judaism => "judaism",
            Religion::Islam => "islam",
            Religion::Tengrism => "tengris",
            Religion::Other => "other",
        }
    }
}

enum GameKind {
    Attila {
        campaign: AttilaCampaign,
        faction: AttilaFaction,
        religion: Religion,
    },
    Rome {
        campaign: RomeCampaign,
        faction: RomeFaction,
    },
}

/// The single polymorphic handle every cross-component query routes through.
pub struct GameBundle {
    game: GameKind,
    classifier: Box<dyn BuildingClassifier>,
}

impl GameBundle {
    pub fn attila(campaign: AttilaCampaign, faction: AttilaFaction, religion: Religion) -> Self {
        Self {
            game: GameKind::Attila {
                campaign,
                faction,
                religion,
            },
            classifier: Box::new(AttilaClassifier::new(campaign, faction)),
        }
    }

    pub fn rome(campaign: RomeCampaign, faction: RomeFaction) -> Self {
        Self {
            game: GameKind::Rome { campaign, faction },
            classifier: Box::new(RomeClassifier::new(campaign, faction)),
        }
    }

    pub fn classifier(&self) -> &dyn BuildingClassifier {
        self.classifier.as_ref()
    }

    pub fn short_tag(&self) -> &'static str {
        match self.game {
            GameKind::Attila { campaign, .. } => campaign.short_tag(),
            GameKind::Rome { campaign, .. } => campaign.short_tag(),
        }
    }

    pub fn campaign_token(&self) -> &'static str {
        match self.game {
            GameKind::Attila { campaign, .. } => campaign.full_token(),
            GameKind::Rome { campaign, .. } => campaign.full_token(),
        }
    }

    pub fn faction_id(&self) -> &'static str {
        match self.game {
            GameKind::Attila { faction, .. } => faction.id(),
            GameKind::Rome { faction, .. } => faction.id(),
        }
    }

    /// Religion only exists for Attila-era campaigns.
    pub fn religion(&self) -> Option<Religion> {
        match self.game {
            GameKind::Attila { religion, .. } => Some(religion),
            GameKind::Rome { .. } => None,
        }
    }

    /// Rome II grants a port an extra effective building slot.
    pub fn port_grants_slot(&self) -> bool {
        matches!(self.game, GameKind::Rome { .. })
    }
}

/// Everything the effect algebra and builders read while compiling one
/// province.
pub struct GameContext {
    pub bundle: GameBundle,
    /// Province-wide multiplier for fertility-scaled effects.
    pub fertility: f64,
    /// Name form used for solver variables and constraint labels.
    pub name_mode: NameMode,
}

impl GameContext {
    pub fn new(bundle: GameBundle) -> Self {
        Self {
            bundle,
            fertility: 5.0,
            name_mode: NameMode::Name,
        }
    }

    pub fn with_fertility(mut self, fertility: f64) -> Self {
        self.fertility = fertility;
        self
    }

    pub fn classifier(&self) -> &dyn BuildingClassifier {
        self.bundle.classifier()
    }
}
