//! Emission calculator.
//!
//! Maps a scenario's line items to a CO2e figure per item, per category and
//! overall. Every lookup that misses contributes a factor of 0, so the
//! calculation cannot fail.

use serde::Serialize;

use crate::factors::{FactorKind, FactorTable};
use crate::model::{Category, LineItem, Material, Scenario, TransportMode};
use crate::schema::{marker, unit};

/// Unit of an item's quantity driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QuantityUnit {
    Kilogram,
    CubicMetre,
    SquareMetre,
    Hour,
    Kilometre,
}

impl QuantityUnit {
    /// Symbol written to the `Unité` column.
    pub fn symbol(self) -> &'static str {
        match self {
            QuantityUnit::Kilogram => unit::KILOGRAM,
            QuantityUnit::CubicMetre => unit::CUBIC_METRE,
            QuantityUnit::SquareMetre => unit::SQUARE_METRE,
            QuantityUnit::Hour => unit::HOUR,
            QuantityUnit::Kilometre => unit::KILOMETRE,
        }
    }

    /// Label of the quantity input field.
    pub fn input_label(self) -> &'static str {
        match self {
            QuantityUnit::Kilogram => "Quantité (kg)",
            QuantityUnit::CubicMetre => "Quantité (m³)",
            QuantityUnit::SquareMetre => "Surface (m²)",
            QuantityUnit::Hour => "Durée (heures)",
            QuantityUnit::Kilometre => "Distance (km)",
        }
    }

    /// Parse the per-unit part of a factor unit such as `kg CO2e/m³`.
    fn from_factor_unit(factor_unit: &str) -> Option<QuantityUnit> {
        let per = factor_unit.split('/').nth(1)?.trim();
        match per {
            "kg" => Some(QuantityUnit::Kilogram),
            "m³" | "m3" => Some(QuantityUnit::CubicMetre),
            "m²" | "m2" => Some(QuantityUnit::SquareMetre),
            "hr" | "h" => Some(QuantityUnit::Hour),
            "km" => Some(QuantityUnit::Kilometre),
            _ => None,
        }
    }
}

/// Unit of an item's quantity, shared by detail rows and spreadsheet export.
pub fn quantity_unit(item: &LineItem, table: &FactorTable) -> QuantityUnit {
    match item {
        LineItem::RawMaterial(rm) => match &rm.material {
            Some(Material::Steel) => QuantityUnit::Kilogram,
            Some(Material::Concrete) => QuantityUnit::CubicMetre,
            Some(Material::Paint) => QuantityUnit::SquareMetre,
            Some(Material::Named(id)) => table
                .get(FactorKind::Material, id)
                .and_then(|e| QuantityUnit::from_factor_unit(&e.unit))
                .unwrap_or(QuantityUnit::Kilogram),
            None => QuantityUnit::Kilogram,
        },
        LineItem::Manufacturing(p) => process_unit(table, FactorKind::Manufacturing, &p.process),
        LineItem::Implementation(p) => {
            process_unit(table, FactorKind::Implementation, &p.process)
        }
        LineItem::Energy(_) => QuantityUnit::Hour,
        LineItem::Transport(_) => QuantityUnit::Kilometre,
    }
}

fn process_unit(table: &FactorTable, kind: FactorKind, process: &Option<String>) -> QuantityUnit {
    let time_based = process
        .as_deref()
        .and_then(|id| table.get(kind, id))
        .is_some_and(|e| e.unit.ends_with(unit::PER_HOUR_SUFFIX));
    if time_based {
        QuantityUnit::Hour
    } else {
        QuantityUnit::Kilogram
    }
}

/// Emission factor applied to an item's quantity, 0 when unresolved.
///
/// Concrete returns the cement factor only; the rebar term carries its own
/// factor on the item.
pub fn emission_factor(item: &LineItem, table: &FactorTable) -> f64 {
    let lookup = |kind, id: &Option<String>| {
        id.as_deref()
            .map(|id| table.factor(kind, id))
            .unwrap_or(0.0)
    };
    match item {
        LineItem::RawMaterial(rm) => match &rm.material {
            Some(Material::Steel) => lookup(FactorKind::Steel, &rm.steel_type),
            Some(Material::Concrete) => lookup(FactorKind::Concrete, &rm.concrete_type),
            Some(Material::Paint) => rm.paint_factor.unwrap_or(0.0),
            Some(Material::Named(id)) => table.factor(FactorKind::Material, id),
            None => 0.0,
        },
        LineItem::Manufacturing(p) => lookup(FactorKind::Manufacturing, &p.process),
        LineItem::Implementation(p) => lookup(FactorKind::Implementation, &p.process),
        LineItem::Energy(e) => lookup(FactorKind::Energy, &e.source),
        LineItem::Transport(t) => match &t.mode {
            Some(TransportMode::Helicopter) => {
                lookup(FactorKind::HelicopterPayload, &t.helicopter_payload)
            }
            Some(TransportMode::Named(id)) => table.factor(FactorKind::Transport, id),
            None => 0.0,
        },
    }
}

/// Display name of an item: the label that distinguishes its variant.
pub fn method_label(item: &LineItem, table: &FactorTable) -> String {
    let named = |kind, id: &Option<String>, fallback: &str| {
        id.as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| table.label(kind, id).to_string())
            .unwrap_or_else(|| fallback.to_string())
    };
    match item {
        LineItem::RawMaterial(rm) => match &rm.material {
            Some(Material::Steel) => named(FactorKind::Steel, &rm.steel_type, marker::STEEL),
            Some(Material::Concrete) => {
                let mut name = named(FactorKind::Concrete, &rm.concrete_type, marker::CONCRETE);
                if rm.is_reinforced == Some(true) {
                    name.push_str(marker::REINFORCED_SUFFIX);
                }
                name
            }
            Some(Material::Paint) => marker::PAINT.to_string(),
            Some(Material::Named(id)) => table.label(FactorKind::Material, id).to_string(),
            None => marker::UNKNOWN.to_string(),
        },
        LineItem::Manufacturing(p) => named(FactorKind::Manufacturing, &p.process, marker::UNKNOWN),
        LineItem::Implementation(p) => {
            named(FactorKind::Implementation, &p.process, marker::UNKNOWN)
        }
        LineItem::Energy(e) => named(FactorKind::Energy, &e.source, marker::UNKNOWN),
        LineItem::Transport(t) => match &t.mode {
            Some(TransportMode::Helicopter) => named(
                FactorKind::HelicopterPayload,
                &t.helicopter_payload,
                marker::HELICOPTER,
            ),
            Some(TransportMode::Named(id)) => table.label(FactorKind::Transport, id).to_string(),
            None => marker::UNKNOWN.to_string(),
        },
    }
}

/// Calculated figures for one line item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDetail {
    pub category: Category,
    pub name: String,
    pub co2e: f64,
    pub quantity: f64,
    pub unit: QuantityUnit,
    /// Transported tonnes, transport items only.
    pub weight: Option<f64>,
}

/// CO2e of a single item.
pub fn item_emission(item: &LineItem, table: &FactorTable) -> ItemDetail {
    let quantity = item.quantity();
    let factor = emission_factor(item, table);

    let (co2e, weight) = match item {
        LineItem::RawMaterial(rm) if rm.material == Some(Material::Concrete) => {
            let cement = quantity * rm.cement_mass.unwrap_or(0.0) * factor;
            let rebar = if rm.is_reinforced == Some(true) {
                quantity * rm.rebar_mass.unwrap_or(0.0) * rm.rebar_factor.unwrap_or(0.0)
            } else {
                0.0
            };
            (cement + rebar, None)
        }
        LineItem::Transport(t) => {
            let weight = t.weight.unwrap_or(0.0);
            (quantity * weight * factor, Some(weight))
        }
        _ => (quantity * factor, None),
    };

    ItemDetail {
        category: item.category(),
        name: method_label(item, table),
        co2e,
        quantity,
        unit: quantity_unit(item, table),
        weight,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub raw_materials: f64,
    pub manufacturing: f64,
    pub energy: f64,
    pub implementation: f64,
    pub transport: f64,
    pub grand_total: f64,
}

impl CategoryTotals {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::RawMaterials => self.raw_materials,
            Category::Manufacturing => self.manufacturing,
            Category::Energy => self.energy,
            Category::Implementation => self.implementation,
            Category::Transport => self.transport,
        }
    }

    fn slot(&mut self, category: Category) -> &mut f64 {
        match category {
            Category::RawMaterials => &mut self.raw_materials,
            Category::Manufacturing => &mut self.manufacturing,
            Category::Energy => &mut self.energy,
            Category::Implementation => &mut self.implementation,
            Category::Transport => &mut self.transport,
        }
    }
}

/// Per-category detail rows with a strictly positive CO2e.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryDetails {
    pub raw_materials: Vec<ItemDetail>,
    pub manufacturing: Vec<ItemDetail>,
    pub energy: Vec<ItemDetail>,
    pub implementation: Vec<ItemDetail>,
    pub transport: Vec<ItemDetail>,
}

impl CategoryDetails {
    pub fn get(&self, category: Category) -> &[ItemDetail] {
        match category {
            Category::RawMaterials => &self.raw_materials,
            Category::Manufacturing => &self.manufacturing,
            Category::Energy => &self.energy,
            Category::Implementation => &self.implementation,
            Category::Transport => &self.transport,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut Vec<ItemDetail> {
        match category {
            Category::RawMaterials => &mut self.raw_materials,
            Category::Manufacturing => &mut self.manufacturing,
            Category::Energy => &mut self.energy,
            Category::Implementation => &mut self.implementation,
            Category::Transport => &mut self.transport,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmissionReport {
    pub totals: CategoryTotals,
    pub details: CategoryDetails,
}

/// Calculate every item of a scenario.
///
/// Category totals include every item; the detail lists only keep items
/// whose CO2e is strictly positive.
pub fn calculate(scenario: &Scenario, table: &FactorTable) -> EmissionReport {
    let mut report = EmissionReport::default();

    for category in Category::ALL {
        for item in scenario.items_in(category) {
            let detail = item_emission(&item, table);
            *report.totals.slot(category) += detail.co2e;
            if detail.co2e > 0.0 {
                report.details.get_mut(category).push(detail);
            }
        }
    }

    report.totals.grand_total = Category::ALL
        .iter()
        .map(|c| report.totals.get(*c))
        .sum();
    report
}
