use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// The reference tables an item can draw its emission factor from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    Material,
    Steel,
    Concrete,
    /// Preset values offered for a paint item's own factor.
    Paint,
    /// Preset values offered for a reinforced concrete item's rebar factor.
    Rebar,
    Manufacturing,
    Energy,
    Implementation,
    Transport,
    HelicopterPayload,
}

/// One named emission factor (kg CO2e per unit).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionFactorEntry {
    /// Stable identifier stored on line items.
    pub id: String,
    /// Display label, written to spreadsheets.
    pub name: String,
    pub factor: f64,
    pub unit: String,
}

impl EmissionFactorEntry {
    pub fn new(id: &str, name: &str, factor: f64, unit: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            factor,
            unit: unit.to_string(),
        }
    }
}

/// Immutable emission factor lookups, keyed by identifier and by label.
#[derive(Debug, Clone, Default)]
pub struct FactorTable {
    entries: BTreeMap<FactorKind, Vec<EmissionFactorEntry>>,
    by_id: HashMap<(FactorKind, String), usize>,
    by_label: HashMap<(FactorKind, String), usize>,
}

impl FactorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide default table, built on first use.
    pub fn builtin() -> &'static FactorTable {
        static BUILTIN: OnceLock<FactorTable> = OnceLock::new();
        BUILTIN.get_or_init(builtin_table)
    }

    /// Add an entry. A later entry with the same id replaces the earlier one.
    pub fn with_entry(mut self, kind: FactorKind, entry: EmissionFactorEntry) -> Self {
        self.insert(kind, entry);
        self
    }

    fn insert(&mut self, kind: FactorKind, entry: EmissionFactorEntry) {
        let list = self.entries.entry(kind).or_default();
        let idx = match self.by_id.get(&(kind, entry.id.clone())) {
            Some(&idx) => {
                self.by_label.remove(&(kind, list[idx].name.clone()));
                list[idx] = entry;
                idx
            }
            None => {
                list.push(entry);
                list.len() - 1
            }
        };
        let entry = &list[idx];
        self.by_id.insert((kind, entry.id.clone()), idx);
        self.by_label.insert((kind, entry.name.clone()), idx);
    }

    /// Parse a table from JSON: an object mapping each kind (`"steel"`,
    /// `"helicopter_payload"`, ...) to a list of entries.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: BTreeMap<FactorKind, Vec<EmissionFactorEntry>> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for (kind, entries) in file {
            for entry in entries {
                table.insert(kind, entry);
            }
        }
        Ok(table)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    pub fn get(&self, kind: FactorKind, id: &str) -> Option<&EmissionFactorEntry> {
        let idx = *self.by_id.get(&(kind, id.to_string()))?;
        self.entries.get(&kind).map(|list| &list[idx])
    }

    /// Factor for `id`, or 0 when the table has no such entry.
    pub fn factor(&self, kind: FactorKind, id: &str) -> f64 {
        self.get(kind, id).map(|e| e.factor).unwrap_or(0.0)
    }

    pub fn by_label(&self, kind: FactorKind, name: &str) -> Option<&EmissionFactorEntry> {
        let idx = *self.by_label.get(&(kind, name.to_string()))?;
        self.entries.get(&kind).map(|list| &list[idx])
    }

    /// Display label for `id`; unknown ids are shown as-is.
    pub fn label<'a>(&'a self, kind: FactorKind, id: &'a str) -> &'a str {
        self.get(kind, id).map(|e| e.name.as_str()).unwrap_or(id)
    }

    /// Identifier for a display label; unknown labels are kept verbatim so
    /// they survive an import/export cycle.
    pub fn id_for_label(&self, kind: FactorKind, name: &str) -> String {
        self.by_label(kind, name)
            .map(|e| e.id.clone())
            .unwrap_or_else(|| name.to_string())
    }

    pub fn entries(&self, kind: FactorKind) -> &[EmissionFactorEntry] {
        self.entries.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn builtin_table() -> FactorTable {
    use FactorKind::*;

    let rows: &[(FactorKind, &str, &str, f64, &str)] = &[
        // Generic materials
        (Material, "aluminium", "Aluminium", 8.6, "kg CO2e/kg"),
        (Material, "bois_massif", "Bois massif", 0.11, "kg CO2e/kg"),
        (Material, "verre", "Verre", 1.2, "kg CO2e/kg"),
        (Material, "mortier", "Mortier", 250.0, "kg CO2e/m³"),
        (Material, "enrobe", "Enrobé bitumineux", 0.07, "kg CO2e/kg"),
        (Material, "membrane_bitume", "Membrane bitumineuse", 5.3, "kg CO2e/m²"),
        (Material, "gravier", "Gravier", 0.005, "kg CO2e/kg"),
        // Steel grades
        (Steel, "s235", "S235", 1.8, "kg CO2e/kg"),
        (Steel, "s275", "S275", 1.9, "kg CO2e/kg"),
        (Steel, "s355", "S355", 2.1, "kg CO2e/kg"),
        (Steel, "s355_recycle", "S355 recyclé", 0.9, "kg CO2e/kg"),
        (Steel, "inox_304", "Inox 304", 4.4, "kg CO2e/kg"),
        // Concrete grades, factor per kg of cement
        (Concrete, "c20_25", "C20/25", 0.82, "kg CO2e/kg"),
        (Concrete, "c25_30", "C25/30", 0.8, "kg CO2e/kg"),
        (Concrete, "c30_37", "C30/37", 0.78, "kg CO2e/kg"),
        (Concrete, "c25_30_bas_carbone", "C25/30 bas carbone", 0.45, "kg CO2e/kg"),
        // Paint presets, per m²
        (Paint, "acrylique", "Peinture acrylique", 0.35, "kg CO2e/m²"),
        (Paint, "glycero", "Peinture glycérophtalique", 0.62, "kg CO2e/m²"),
        (Paint, "epoxy", "Peinture époxy", 0.95, "kg CO2e/m²"),
        // Rebar presets, per kg of rebar
        (Rebar, "ha_standard", "Armature HA standard", 1.9, "kg CO2e/kg"),
        (Rebar, "ha_recyclee", "Armature HA recyclée", 0.7, "kg CO2e/kg"),
        // Manufacturing
        (Manufacturing, "decoupe_laser", "Découpe laser", 6.5, "kg CO2e/hr"),
        (Manufacturing, "soudure", "Soudure", 3.2, "kg CO2e/hr"),
        (Manufacturing, "pliage", "Pliage", 0.05, "kg CO2e/kg"),
        (Manufacturing, "galvanisation", "Galvanisation", 0.42, "kg CO2e/kg"),
        (Manufacturing, "thermolaquage", "Thermolaquage", 0.25, "kg CO2e/kg"),
        // Energy, per hour of use
        (Energy, "groupe_20kva", "Groupe électrogène 20 kVA", 14.1, "kg CO2e/hr"),
        (Energy, "groupe_60kva", "Groupe électrogène 60 kVA", 35.8, "kg CO2e/hr"),
        (Energy, "compresseur", "Compresseur", 9.4, "kg CO2e/hr"),
        (Energy, "reseau", "Raccordement réseau", 0.9, "kg CO2e/hr"),
        (Energy, "batterie", "Batterie de chantier", 0.4, "kg CO2e/hr"),
        // Implementation
        (Implementation, "grue_mobile", "Grue mobile", 42.0, "kg CO2e/hr"),
        (Implementation, "nacelle", "Nacelle élévatrice", 8.7, "kg CO2e/hr"),
        (Implementation, "mini_pelle", "Mini-pelle", 11.5, "kg CO2e/hr"),
        (Implementation, "pompe_beton", "Pompe à béton", 29.0, "kg CO2e/hr"),
        (Implementation, "scellement", "Mortier de scellement", 0.21, "kg CO2e/kg"),
        // Transport, per tonne-kilometre
        (Transport, "porteur", "Camion porteur", 0.11, "kg CO2e/t.km"),
        (Transport, "semi", "Semi-remorque", 0.08, "kg CO2e/t.km"),
        (Transport, "fourgon", "Fourgon", 0.25, "kg CO2e/t.km"),
        (Transport, "train", "Train de fret", 0.02, "kg CO2e/t.km"),
        (Transport, "barge", "Barge fluviale", 0.015, "kg CO2e/t.km"),
        // Helicopter payload classes, per tonne-kilometre
        (HelicopterPayload, "leger", "Hélicoptère léger (< 1 t)", 3.4, "kg CO2e/t.km"),
        (HelicopterPayload, "moyen", "Hélicoptère moyen (1-3 t)", 2.6, "kg CO2e/t.km"),
        (HelicopterPayload, "lourd", "Hélicoptère lourd (> 3 t)", 2.0, "kg CO2e/t.km"),
    ];

    rows.iter()
        .fold(FactorTable::new(), |table, &(kind, id, name, factor, unit)| {
            table.with_entry(kind, EmissionFactorEntry::new(id, name, factor, unit))
        })
}
