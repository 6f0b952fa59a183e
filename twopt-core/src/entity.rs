//! Naming shared by buildings, regions and provinces.
//!
//! Every entity carries three name forms. The canonical `name` is unique
//! across the whole catalog; the `print_name` is for humans and may collide;
//! the `hash_name` is a short process-unique label for solver output. Hash
//! names are monotonic and opaque: nothing may parse them for meaning.

use std::sync::atomic::{AtomicU64, Ordering};

/// Which name form to use when formatting solver variables and constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameMode {
    #[default]
    Name,
    PrintName,
    HashName,
}

static BUILDING_COUNTER: AtomicU64 = AtomicU64::new(1);
static REGION_COUNTER: AtomicU64 = AtomicU64::new(1);
static PROVINCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Hash-name families, one counter each.
#[derive(Debug, Clone, Copy)]
pub(crate) enum HashFamily {
    Building,
    Region,
    Province,
}

/// Produces the next hash name of a family: `B1`, `B2`, ... `R1`, ... `P1`.
pub(crate) fn next_hash_name(family: HashFamily) -> String {
    let (prefix, counter) = match family {
        HashFamily::Building => ('B', &BUILDING_COUNTER),
        HashFamily::Region => ('R', &REGION_COUNTER),
        HashFamily::Province => ('P', &PROVINCE_COUNTER),
    };
    let n = counter.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}{n}")
}

/// Anything with the three name forms.
pub trait Named {
    fn name(&self) -> &str;
    fn print_name(&self) -> &str;
    fn hash_name(&self) -> &str;

    fn display_name(&self, mode: NameMode) -> &str {
        match mode {
            NameMode::Name => self.name(),
            NameMode::PrintName => self.print_name(),
            NameMode::HashName => self.hash_name(),
        }
    }
}
