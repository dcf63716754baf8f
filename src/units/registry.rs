//! Symbol registry over the static catalogue plus per-parse custom units.
//!
//! The registry is instance-owned: every interpreter builds its own and
//! clones it into child interpreters for file imports, so custom units never
//! leak across parses.

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::{DpmlError, Result};
use crate::units::tables::{ARBITRARY_UNITS, BASE_UNITS, DERIVED_UNITS, PREFIXES};
use crate::units::unit::{DECIMAL_SLOT, NUM_SLOTS, Unit};

#[derive(Debug, Clone)]
pub struct UnitRegistry {
    base: FxHashMap<SmolStr, Unit>,
    prefixes: FxHashMap<SmolStr, Unit>,
    derived: FxHashMap<SmolStr, Unit>,
    arbitrary: FxHashMap<SmolStr, Unit>,
    custom: FxHashMap<SmolStr, Unit>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        let mut base = FxHashMap::default();
        for &(magnitude, vector, symbol, name) in BASE_UNITS {
            let mut unit = Unit::new(magnitude, vector);
            unit.symbol = Some(symbol.into());
            unit.name = Some(name.into());
            base.insert(symbol.into(), unit);
        }
        let mut prefixes = FxHashMap::default();
        for &(exponent, symbol, name) in PREFIXES {
            let mut vector = [0; NUM_SLOTS];
            vector[DECIMAL_SLOT] = exponent;
            let mut unit = Unit::new(1.0, vector);
            unit.symbol = Some(symbol.into());
            unit.name = Some(name.into());
            prefixes.insert(symbol.into(), unit);
        }
        let mut derived = FxHashMap::default();
        for &(magnitude, vector, symbol, definition, name) in DERIVED_UNITS {
            let mut unit = Unit::new(magnitude, vector);
            unit.symbol = Some(symbol.into());
            unit.definition = definition.map(Into::into);
            unit.name = Some(name.into());
            derived.insert(symbol.into(), unit);
        }
        let mut arbitrary = FxHashMap::default();
        for &(vector, symbol, name, scale) in ARBITRARY_UNITS {
            let mut unit = Unit::new(1.0, vector);
            unit.symbol = Some(symbol.into());
            unit.name = Some(name.into());
            unit.arbitrary = Some(scale);
            arbitrary.insert(symbol.into(), unit);
        }
        Self {
            base,
            prefixes,
            derived,
            arbitrary,
            custom: FxHashMap::default(),
        }
    }

    /// Exact symbol lookup; custom units shadow the static catalogue.
    pub fn lookup(&self, symbol: &str) -> Option<&Unit> {
        self.custom
            .get(symbol)
            .or_else(|| self.arbitrary.get(symbol))
            .or_else(|| self.derived.get(symbol))
            .or_else(|| self.base.get(symbol))
    }

    pub fn prefix(&self, symbol: &str) -> Option<&Unit> {
        self.prefixes.get(symbol)
    }

    /// Whether any registered symbol ends with `suffix`; drives the
    /// right-to-left token recognizer.
    pub fn any_symbol_has_suffix(&self, suffix: &str) -> bool {
        self.custom
            .keys()
            .chain(self.arbitrary.keys())
            .chain(self.derived.keys())
            .chain(self.base.keys())
            .any(|key| key.ends_with(suffix))
    }

    /// Register a custom unit for this parse.
    pub fn register(&mut self, unit: Unit) -> Result<()> {
        let symbol = unit
            .symbol
            .clone()
            .unwrap_or_else(|| SmolStr::new_static("?"));
        if self.lookup(&symbol).is_some() {
            return Err(DpmlError::DuplicateUnit {
                symbol: symbol.to_string(),
            });
        }
        tracing::debug!(symbol = %symbol, "registering custom unit");
        self.custom.insert(symbol, unit);
        Ok(())
    }

    pub fn base_units(&self) -> impl Iterator<Item = &Unit> {
        self.base.values()
    }

    pub fn derived_units(&self) -> impl Iterator<Item = &Unit> {
        self.derived.values()
    }

    pub fn custom_units(&self) -> impl Iterator<Item = &Unit> {
        self.custom.values()
    }
}

impl Default for UnitRegistry {
    fn default() -> Self {
        Self::new()
    }
}
