//! Regions: candidate materialization, filtering, and the per-region
//! constraint generators.

use std::collections::BTreeMap;

use crate::building::{Building, BuildingId};
use crate::bundle::GameContext;
use crate::entity::{next_hash_name, HashFamily, Named};
use crate::error::CoreError;
use twopt_solver::{LinExpr, LpBackend, Relation, VarId, VarKind};

/// Whether the region's capital slot is a major or minor settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Major,
    Minor,
}

/// Coastal slot presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionPort {
    NoPort,
    Port,
}

/// The special-slot resource a region carries, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    None,
    Furs,
    Iron,
    Wine,
    Wood,
    Gold,
    Marble,
    Gems,
    Silk,
    Spice,
    Salt,
    Lead,
    Olives,
    ChurchCatholic,
    ChurchOrthodox,
}

impl Resource {
    /// Every resource except `None`, in table order.
    pub const ALL: [Resource; 14] = [
        Resource::Furs,
        Resource::Iron,
        Resource::Wine,
        Resource::Wood,
        Resource::Gold,
        Resource::Marble,
        Resource::Gems,
        Resource::Silk,
        Resource::Spice,
        Resource::Salt,
        Resource::Lead,
        Resource::Olives,
        Resource::ChurchCatholic,
        Resource::ChurchOrthodox,
    ];

    /// The token this resource matches inside building identifiers.
    pub fn token(self) -> Option<&'static str> {
        match self {
            Resource::None => None,
            Resource::Furs => Some("furs"),
            Resource::Iron => Some("iron"),
            Resource::Wine => Some("wine"),
            Resource::Wood => Some("wood"),
            Resource::Gold => Some("gold"),
            Resource::Marble => Some("marble"),
            Resource::Gems => Some("gems"),
            Resource::Silk => Some("silk"),
            Resource::Spice => Some("spice"),
            Resource::Salt => Some("salt"),
            Resource::Lead => Some("lead"),
            Resource::Olives => Some("olives"),
            Resource::ChurchCatholic => Some("religion_catholic_legendary"),
            Resource::ChurchOrthodox => Some("religion_orthodox_legendary"),
        }
    }

    /// Spice sits in a port slot and the legendary churches are unique, so
    /// those three must be built; every other resource chain is optional.
    pub fn is_mandatory(self) -> bool {
        matches!(
            self,
            Resource::Spice | Resource::ChurchCatholic | Resource::ChurchOrthodox
        )
    }

    pub fn is_religion(self) -> bool {
        matches!(self, Resource::ChurchCatholic | Resource::ChurchOrthodox)
    }

    /// Constraint-label form of the token (first letter upper-cased).
    pub fn label(self) -> Option<&'static str> {
        match self {
            Resource::None => None,
            Resource::Furs => Some("Furs"),
            Resource::Iron => Some("Iron"),
            Resource::Wine => Some("Wine"),
            Resource::Wood => Some("Wood"),
            Resource::Gold => Some("Gold"),
            Resource::Marble => Some("Marble"),
            Resource::Gems => Some("Gems"),
            Resource::Silk => Some("Silk"),
            Resource::Spice => Some("Spice"),
            Resource::Salt => Some("Salt"),
            Resource::Lead => Some("Lead"),
            Resource::Olives => Some("Olives"),
            Resource::ChurchCatholic => Some("Religion_catholic_legendary"),
            Resource::ChurchOrthodox => Some("Religion_orthodox_legendary"),
        }
    }

    /// Finds the resource named inside a start-pos slot building entry.
    pub fn from_building_token(building: &str) -> Option<Resource> {
        Resource::ALL
            .iter()
            .copied()
            .find(|r| r.token().is_some_and(|t| building.contains(t)))
    }
}

/// Attila regions whose effective slot count stays at the base value
/// instead of gaining the usual extra slot.
const SLOT_COUNT_EXCEPTIONS: [&str; 3] = [
    "reg_thracia_constantinopolis",
    "reg_italia_roma",
    "reg_aegyptus_alexandria",
];

/// A settlement cluster member: metadata plus (between materialization and
/// `clean`) its candidate buildings.
#[derive(Debug, Clone)]
pub struct Region {
    name: String,
    print_name: String,
    hash_name: String,
    pub kind: RegionKind,
    pub port: RegionPort,
    pub resource: Resource,
    /// Base building slots from the start-pos template.
    pub slot_count: u8,
    /// Region-scoped candidate copies, only alive while the province is
    /// being compiled.
    pub buildings: Vec<Building>,
}

impl Region {
    pub fn new(
        name: impl Into<String>,
        print_name: Option<&str>,
        kind: RegionKind,
        port: RegionPort,
        resource: Resource,
        slot_count: u8,
    ) -> Self {
        let name = name.into();
        let print_name = print_name.unwrap_or(&name).to_string();
        Self {
            name,
            print_name,
            hash_name: next_hash_name(HashFamily::Region),
            kind,
            port,
            resource,
            slot_count,
            buildings: Vec::new(),
        }
    }

    /// Slots actually available to the optimizer: base + 1, except for the
    /// hard-coded capitals, plus the Rome II port bonus.
    pub fn effective_slot_count(&self, ctx: &GameContext) -> u8 {
        let mut slots = self.slot_count;
        if !SLOT_COUNT_EXCEPTIONS.contains(&self.name.as_str()) {
            slots += 1;
        }
        if self.port == RegionPort::Port && ctx.bundle.port_grants_slot() {
            slots += 1;
        }
        slots
    }

    /// Materializes region-scoped candidates from the campaign catalog and
    /// binds a binary variable to each, then runs the structural filters
    /// (type first, then resource, then port).
    pub fn add_buildings(
        &mut self,
        ctx: &GameContext,
        catalog: &BTreeMap<BuildingId, Building>,
        solver: &mut dyn LpBackend,
    ) -> Result<(), CoreError> {
        let rules = ctx.classifier();
        for (id, building) in catalog {
            let name = id.as_str();
            if !rules.is_of_campaign(name) || !rules.is_of_faction(name) {
                continue;
            }
            if self.kind == RegionKind::Major && rules.is_minor(name) {
                continue;
            }
            if self.kind == RegionKind::Minor && rules.is_major(name) {
                continue;
            }
            if name.contains("ruin") {
                continue;
            }
            let mut copy = building.clone_for_region(&*self);
            let var = solver.add_variable(copy.display_name(ctx.name_mode), VarKind::Binary)?;
            copy.variable = Some(var);
            self.buildings.push(copy);
        }

        self.filter_type(ctx);
        self.filter_resource(ctx);
        self.filter_port(ctx);
        log::debug!(
            "{}: {} candidate buildings after structural filters",
            self.name,
            self.buildings.len()
        );
        Ok(())
    }

    fn filter_type(&mut self, ctx: &GameContext) {
        let rules = ctx.classifier();
        let kind = self.kind;
        self.buildings.retain(|b| match kind {
            RegionKind::Major => !rules.is_minor(b.name()),
            RegionKind::Minor => !rules.is_major(b.name()),
        });
    }

    fn filter_resource(&mut self, ctx: &GameContext) {
        let rules = ctx.classifier();
        let resource = self.resource;
        self.buildings.retain(|b| {
            let name = b.name();
            // Legendary churches only exist where the region slot asks for
            // that exact church.
            if resource != Resource::ChurchCatholic && name.contains("religion_catholic_legendary")
            {
                return false;
            }
            if resource != Resource::ChurchOrthodox && name.contains("religion_orthodox_legendary")
            {
                return false;
            }
            match resource.token() {
                None => !rules.is_resource(name),
                Some(token) => {
                    let wrong_resource = name.contains("resource")
                        && !name.contains(token)
                        && !name.contains("port");
                    let wrong_spice = name.contains("spice") && token != "spice";
                    !(wrong_resource || wrong_spice)
                }
            }
        });
    }

    fn filter_port(&mut self, ctx: &GameContext) {
        let rules = ctx.classifier();
        if self.port == RegionPort::NoPort {
            self.buildings.retain(|b| !rules.is_port(b.name()));
        }
        self.buildings.retain(|b| !rules.is_duplicate(b.name()));
    }

    /// Drops city chains below `level`, forcing the type constraint onto a
    /// specific city tier.
    pub fn filter_city_level(&mut self, level: u32) {
        self.buildings.retain(|b| {
            let name = b.name();
            if !name.contains("_city_") {
                return true;
            }
            match name.rsplit('_').next().and_then(|t| t.parse::<f64>().ok()) {
                Some(tier) => tier >= level as f64,
                None => {
                    log::warn!("city building {name} has no numeric tier, keeping");
                    true
                }
            }
        });
    }

    /// Drops every building whose trailing numeric component is below
    /// `level`. Buildings without one are kept with a warning.
    pub fn filter_building_level(&mut self, level: u32) {
        self.buildings.retain(|b| {
            let name = b.name();
            let tier = name
                .split('_')
                .rev()
                .find_map(|t| t.parse::<f64>().ok());
            match tier {
                Some(tier) => tier >= level as f64,
                None => {
                    log::warn!("building {name} has no level suffix, keeping");
                    true
                }
            }
        });
    }

    /// Drops military buildings. They never carry GDP and only consume
    /// slots.
    pub fn filter_military(&mut self) {
        self.buildings.retain(|b| !b.name().contains("military"));
    }

    fn var_of(&self, building: &Building) -> Result<VarId, CoreError> {
        building
            .variable
            .ok_or_else(|| CoreError::UnboundVariable(building.name().to_string()))
    }

    fn sum_matching<F: Fn(&str) -> bool>(&self, pred: F) -> Result<LinExpr, CoreError> {
        let mut expr = LinExpr::new();
        for b in &self.buildings {
            if pred(b.name()) {
                expr.add_term(self.var_of(b)?, 1.0);
            }
        }
        Ok(expr)
    }

    /// All five regional constraints, in pipeline order.
    pub fn add_constraints(
        &self,
        ctx: &GameContext,
        solver: &mut dyn LpBackend,
    ) -> Result<(), CoreError> {
        self.add_type_constraint(ctx, solver)?;
        self.add_resource_constraint(ctx, solver)?;
        self.add_port_constraint(ctx, solver)?;
        self.add_chain_constraint(ctx, solver)?;
        self.add_slot_constraint(ctx, solver)?;
        Ok(())
    }

    /// Exactly one city building of the region's kind.
    pub fn add_type_constraint(
        &self,
        ctx: &GameContext,
        solver: &mut dyn LpBackend,
    ) -> Result<(), CoreError> {
        let rules = ctx.classifier();
        let (expr, label) = match self.kind {
            RegionKind::Major => (
                self.sum_matching(|n| rules.is_major_city(n))?,
                format!("{}_Major_Constraint", self.display_name(ctx.name_mode)),
            ),
            RegionKind::Minor => (
                self.sum_matching(|n| rules.is_minor_city(n))?,
                format!("{}_Minor_Constraint", self.display_name(ctx.name_mode)),
            ),
        };
        solver.add_constraint(&label, expr, Relation::Eq, 1.0)?;
        Ok(())
    }

    /// One building of the region's resource chain: mandatory (`== 1`) for
    /// spice and the legendary churches, optional (`≤ 1`) otherwise.
    pub fn add_resource_constraint(
        &self,
        ctx: &GameContext,
        solver: &mut dyn LpBackend,
    ) -> Result<(), CoreError> {
        let resource = self.resource;
        let (Some(token), Some(label)) = (resource.token(), resource.label()) else {
            return Ok(());
        };
        let expr = self.sum_matching(|n| {
            n.contains(token) && (n.contains("resource") || resource.is_religion())
        })?;
        let label = format!(
            "{}_{label}_Resource_Constraint",
            self.display_name(ctx.name_mode)
        );
        let relation = if resource.is_mandatory() {
            Relation::Eq
        } else {
            Relation::Le
        };
        solver.add_constraint(&label, expr, relation, 1.0)?;
        Ok(())
    }

    /// Exactly one (non-spice) port building where the region has a port.
    pub fn add_port_constraint(
        &self,
        ctx: &GameContext,
        solver: &mut dyn LpBackend,
    ) -> Result<(), CoreError> {
        if self.port != RegionPort::Port {
            return Ok(());
        }
        let rules = ctx.classifier();
        let expr = self.sum_matching(|n| rules.is_port(n))?;
        let label = format!("{}_Port_Constraint", self.display_name(ctx.name_mode));
        solver.add_constraint(&label, expr, Relation::Eq, 1.0)?;
        Ok(())
    }

    /// At most one tier per upgrade chain (buildings sharing the name up to
    /// the trailing `_N`).
    pub fn add_chain_constraint(
        &self,
        ctx: &GameContext,
        solver: &mut dyn LpBackend,
    ) -> Result<(), CoreError> {
        let mut chains: BTreeMap<String, LinExpr> = BTreeMap::new();
        for b in &self.buildings {
            let key = match b.name().rsplit_once('_') {
                Some((head, _)) => head.to_string(),
                None => String::new(),
            };
            chains
                .entry(key)
                .or_default()
                .add_term(self.var_of(b)?, 1.0);
        }
        for (chain, expr) in chains {
            let label = format!(
                "{}_Chain_Constraint_{chain}",
                self.display_name(ctx.name_mode)
            );
            solver.add_constraint(&label, expr, Relation::Le, 1.0)?;
        }
        Ok(())
    }

    /// No more selections than the region has effective slots.
    pub fn add_slot_constraint(
        &self,
        ctx: &GameContext,
        solver: &mut dyn LpBackend,
    ) -> Result<(), CoreError> {
        let expr = self.sum_matching(|_| true)?;
        let label = format!("Max_Buildings_{}", self.display_name(ctx.name_mode));
        solver.add_constraint(
            &label,
            expr,
            Relation::Le,
            f64::from(self.effective_slot_count(ctx)),
        )?;
        Ok(())
    }
}

impl Named for Region {
    fn name(&self) -> &str {
        &self.name
    }

    fn print_name(&self) -> &str {
        &self.print_name
    }

    fn hash_name(&self) -> &str {
        &self.hash_name
    }
}
