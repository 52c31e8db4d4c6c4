//! Spreadsheet codec.
//!
//! A scenario becomes one sheet with a fixed header row (see
//! [`crate::schema::column`]), one row per non-empty item and a trailing
//! total row. Decoding reads columns by header name and recovers each item's
//! variant from its `Méthodes` label.

use polars::prelude::*;
use tracing::{debug, warn};

use crate::calculator::{self, emission_factor, item_emission, method_label, quantity_unit};
use crate::error::{CarbonError, Result};
use crate::factors::{FactorKind, FactorTable};
use crate::model::{
    Category, ComparisonModel, EnergyItem, LineItem, Material, ProcessItem, RawMaterialItem,
    Scenario, ScenarioKind, TransportItem, TransportMode,
};
use crate::schema::{category, column, marker};

/// A named sheet: header texts are the frame's column names.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub frame: DataFrame,
}

/// An ordered set of named sheets.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet, replacing any sheet with the same name.
    pub fn add_sheet(&mut self, name: impl Into<String>, frame: DataFrame) {
        let name = name.into();
        match self.sheets.iter_mut().find(|s| s.name == name) {
            Some(sheet) => sheet.frame = frame,
            None => self.sheets.push(Sheet { name, frame }),
        }
    }

    pub fn sheet(&self, name: &str) -> Option<&DataFrame> {
        self.sheets.iter().find(|s| s.name == name).map(|s| &s.frame)
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

// ── Encoding ────────────────────────────────────────────────────────────────

#[derive(Default)]
struct SheetBuilder {
    category: Vec<Option<String>>,
    method: Vec<Option<String>>,
    unit: Vec<Option<String>>,
    quantity: Vec<Option<f64>>,
    factor: Vec<Option<f64>>,
    cement_mass: Vec<Option<f64>>,
    rebar_factor: Vec<Option<f64>>,
    rebar_mass: Vec<Option<f64>>,
    weight: Vec<Option<f64>>,
    co2e: Vec<Option<f64>>,
    comment: Vec<Option<String>>,
}

impl SheetBuilder {
    fn push_item(&mut self, item: &LineItem, table: &FactorTable) {
        let detail = item_emission(item, table);

        let (mut cement_mass, mut rebar_factor, mut rebar_mass, mut weight) =
            (None, None, None, None);
        match item {
            LineItem::RawMaterial(rm) if rm.material == Some(Material::Concrete) => {
                cement_mass = non_zero(rm.cement_mass);
                if rm.is_reinforced == Some(true) {
                    rebar_factor = non_zero(rm.rebar_factor);
                    rebar_mass = non_zero(rm.rebar_mass);
                }
            }
            LineItem::Transport(t) => weight = non_zero(t.weight),
            _ => {}
        }

        self.category
            .push(Some(item.category().sheet_label().to_string()));
        self.method
            .push(has_selection(item).then(|| method_label(item, table)));
        self.unit
            .push(Some(quantity_unit(item, table).symbol().to_string()));
        self.quantity.push(Some(item.quantity()));
        self.factor.push(Some(emission_factor(item, table)));
        self.cement_mass.push(cement_mass);
        self.rebar_factor.push(rebar_factor);
        self.rebar_mass.push(rebar_mass);
        self.weight.push(weight);
        self.co2e.push(Some(round2(detail.co2e)));
        self.comment
            .push(item.comment().filter(|c| !c.is_empty()).map(str::to_string));
    }

    fn push_total(&mut self, grand_total: f64) {
        self.category.push(Some(category::TOTAL.to_string()));
        self.method.push(None);
        self.unit.push(None);
        self.quantity.push(None);
        self.factor.push(None);
        self.cement_mass.push(None);
        self.rebar_factor.push(None);
        self.rebar_mass.push(None);
        self.weight.push(None);
        self.co2e.push(Some(round2(grand_total)));
        self.comment.push(None);
    }

    fn finish(self) -> Result<DataFrame> {
        let df = DataFrame::new(vec![
            Column::new(column::CATEGORY.into(), &self.category),
            Column::new(column::METHOD.into(), &self.method),
            Column::new(column::UNIT.into(), &self.unit),
            Column::new(column::QUANTITY.into(), &self.quantity),
            Column::new(column::EMISSION_FACTOR.into(), &self.factor),
            Column::new(column::CEMENT_MASS.into(), &self.cement_mass),
            Column::new(column::REBAR_FACTOR.into(), &self.rebar_factor),
            Column::new(column::REBAR_MASS.into(), &self.rebar_mass),
            Column::new(column::WEIGHT.into(), &self.weight),
            Column::new(column::CO2E.into(), &self.co2e),
            Column::new(column::COMMENT.into(), &self.comment),
        ])?;
        Ok(df)
    }
}

/// Whether the item's category selector (material, process, source or
/// mode) is set. Rows without one carry no method label and are skipped on
/// import.
fn has_selection(item: &LineItem) -> bool {
    let set = |s: &Option<String>| s.as_deref().is_some_and(|s| !s.is_empty());
    match item {
        LineItem::RawMaterial(rm) => rm.material.is_some(),
        LineItem::Manufacturing(p) | LineItem::Implementation(p) => set(&p.process),
        LineItem::Energy(e) => set(&e.source),
        LineItem::Transport(t) => t.mode.is_some(),
    }
}

fn non_zero(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && v.is_finite())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Build the sheet of one scenario: a row per non-empty item, then the total.
pub fn encode_scenario(scenario: &Scenario, table: &FactorTable) -> Result<DataFrame> {
    let report = calculator::calculate(scenario, table);
    let mut builder = SheetBuilder::default();

    for item in scenario.items() {
        if item.is_empty() {
            continue;
        }
        builder.push_item(&item, table);
    }
    builder.push_total(report.totals.grand_total);
    builder.finish()
}

/// Build both scenario sheets.
pub fn encode(model: &ComparisonModel, table: &FactorTable) -> Result<Workbook> {
    let mut workbook = Workbook::new();
    for kind in ScenarioKind::ALL {
        let frame = encode_scenario(model.scenario(kind), table)?;
        workbook.add_sheet(kind.sheet_name(), frame);
    }
    Ok(workbook)
}

// ── Decoding ────────────────────────────────────────────────────────────────

/// Result of decoding a workbook: the model plus any problems met on the way.
#[derive(Debug, Clone, Default)]
pub struct Decoded {
    pub model: ComparisonModel,
    pub warnings: Vec<String>,
}

/// Cells of one sheet, materialised per header name.
struct SheetCells {
    height: usize,
    category: Vec<Option<String>>,
    method: Vec<Option<String>>,
    quantity: Vec<Option<f64>>,
    factor: Vec<Option<f64>>,
    cement_mass: Vec<Option<f64>>,
    rebar_factor: Vec<Option<f64>>,
    rebar_mass: Vec<Option<f64>>,
    weight: Vec<Option<f64>>,
    comment: Vec<Option<String>>,
}

impl SheetCells {
    fn read(df: &DataFrame) -> Result<Self> {
        Ok(Self {
            height: df.height(),
            category: text_cells(df, column::CATEGORY)?,
            method: text_cells(df, column::METHOD)?,
            quantity: number_cells(df, column::QUANTITY)?,
            factor: number_cells(df, column::EMISSION_FACTOR)?,
            cement_mass: number_cells(df, column::CEMENT_MASS)?,
            rebar_factor: number_cells(df, column::REBAR_FACTOR)?,
            rebar_mass: number_cells(df, column::REBAR_MASS)?,
            weight: number_cells(df, column::WEIGHT)?,
            comment: text_cells(df, column::COMMENT)?,
        })
    }
}

/// Trimmed, non-blank text of a column; a missing column reads as all blank.
fn text_cells(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let Ok(col) = df.column(name) else {
        return Ok(vec![None; df.height()]);
    };
    let col = col.cast(&DataType::String)?;
    let cells = col
        .str()?
        .into_iter()
        .map(|v| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .collect();
    Ok(cells)
}

/// Numeric cells of a column. Blank, non-numeric and zero cells read as
/// absent.
fn number_cells(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let cells = text_cells(df, name)?
        .into_iter()
        .map(|v| v.and_then(|s| s.parse::<f64>().ok()).and_then(|f| non_zero(Some(f))))
        .collect();
    Ok(cells)
}

fn is_total_row(category_cell: Option<&str>, method_cell: Option<&str>) -> bool {
    match category_cell {
        Some(c) => c == category::TOTAL,
        None => method_cell == Some(category::TOTAL),
    }
}

/// Rebuild a scenario from its sheet.
pub fn decode_scenario(df: &DataFrame, table: &FactorTable) -> Result<Scenario> {
    let cells = SheetCells::read(df)?;
    let mut scenario = Scenario::new();

    for i in 0..cells.height {
        let section = cells.category[i].as_deref();
        let method = cells.method[i].as_deref();

        if is_total_row(section, method) {
            debug!(row = i + 1, "skipping total row");
            continue;
        }
        let (Some(section), Some(method)) = (section, method) else {
            debug!(row = i + 1, "skipping row without category or method");
            continue;
        };
        let Some(category) = Category::from_sheet_label(section) else {
            debug!(row = i + 1, section, "skipping row with unknown category");
            continue;
        };

        let quantity = cells.quantity[i];
        let comment = cells.comment[i].clone();

        let item = match category {
            Category::RawMaterials => {
                let mut item = classify_material(method, table);
                if item.material == Some(Material::Paint) {
                    item.paint_factor = cells.factor[i];
                }
                item.quantity = quantity;
                item.comment = comment;
                item.cement_mass = cells.cement_mass[i];
                item.rebar_mass = cells.rebar_mass[i];
                item.rebar_factor = cells.rebar_factor[i];
                LineItem::RawMaterial(item)
            }
            Category::Manufacturing => LineItem::Manufacturing(ProcessItem {
                process: Some(table.id_for_label(FactorKind::Manufacturing, method)),
                value: quantity,
                comment,
            }),
            Category::Energy => LineItem::Energy(EnergyItem {
                source: Some(table.id_for_label(FactorKind::Energy, method)),
                consumption: quantity,
                comment,
            }),
            Category::Implementation => LineItem::Implementation(ProcessItem {
                process: Some(table.id_for_label(FactorKind::Implementation, method)),
                value: quantity,
                comment,
            }),
            Category::Transport => {
                let (mode, helicopter_payload) = classify_transport(method, table);
                LineItem::Transport(TransportItem {
                    mode: Some(mode),
                    distance: quantity,
                    weight: cells.weight[i],
                    helicopter_payload,
                    comment,
                })
            }
        };
        scenario.push(item);
    }

    Ok(scenario)
}

/// Recover a raw material's variant from its method label.
///
/// Tried in order: steel grade, concrete grade (with or without the
/// reinforced suffix), paint, then a generic material.
fn classify_material(label: &str, table: &FactorTable) -> RawMaterialItem {
    let mut item = RawMaterialItem::default();

    if let Some(steel) = table.by_label(FactorKind::Steel, label) {
        item.material = Some(Material::Steel);
        item.steel_type = Some(steel.id.clone());
        return item;
    }

    let reinforced = label.ends_with(marker::REINFORCED_SUFFIX);
    let base = label
        .strip_suffix(marker::REINFORCED_SUFFIX)
        .unwrap_or(label);
    if let Some(concrete) = table.by_label(FactorKind::Concrete, base) {
        item.material = Some(Material::Concrete);
        item.concrete_type = Some(concrete.id.clone());
        item.is_reinforced = Some(reinforced);
        return item;
    }

    match label {
        marker::PAINT => item.material = Some(Material::Paint),
        marker::STEEL => item.material = Some(Material::Steel),
        _ if base == marker::CONCRETE => {
            item.material = Some(Material::Concrete);
            item.is_reinforced = Some(reinforced);
        }
        _ => {
            item.material = Some(Material::Named(
                table.id_for_label(FactorKind::Material, label),
            ))
        }
    }
    item
}

fn classify_transport(label: &str, table: &FactorTable) -> (TransportMode, Option<String>) {
    if let Some(payload) = table.by_label(FactorKind::HelicopterPayload, label) {
        return (TransportMode::Helicopter, Some(payload.id.clone()));
    }
    if label == marker::HELICOPTER {
        return (TransportMode::Helicopter, None);
    }
    (
        TransportMode::Named(table.id_for_label(FactorKind::Transport, label)),
        None,
    )
}

/// Rebuild both scenarios. A missing sheet leaves its scenario empty and is
/// reported in [`Decoded::warnings`]; a workbook with neither sheet is an
/// error.
pub fn decode(workbook: &Workbook, table: &FactorTable) -> Result<Decoded> {
    if ScenarioKind::ALL
        .iter()
        .all(|kind| workbook.sheet(kind.sheet_name()).is_none())
    {
        return Err(CarbonError::MissingSheet(format!(
            "{} / {}",
            ScenarioKind::Classic.sheet_name(),
            ScenarioKind::Optimized.sheet_name()
        )));
    }

    let mut decoded = Decoded::default();

    for kind in ScenarioKind::ALL {
        let name = kind.sheet_name();
        match workbook.sheet(name) {
            Some(df) => *decoded.model.scenario_mut(kind) = decode_scenario(df, table)?,
            None => {
                warn!(sheet = name, "sheet missing from workbook");
                decoded.warnings.push(format!("Feuille introuvable : {name}"));
            }
        }
    }

    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concrete(label_id: &str, reinforced: bool) -> LineItem {
        LineItem::RawMaterial(RawMaterialItem {
            material: Some(Material::Concrete),
            concrete_type: Some(label_id.into()),
            quantity: Some(10.0),
            cement_mass: Some(300.0),
            is_reinforced: Some(reinforced),
            rebar_mass: Some(100.0),
            rebar_factor: Some(1.2),
            ..Default::default()
        })
    }

    fn sample_scenario() -> Scenario {
        Scenario::new()
            .with_item(LineItem::RawMaterial(RawMaterialItem {
                material: Some(Material::Steel),
                steel_type: Some("s355".into()),
                quantity: Some(250.0),
                comment: Some("Charpente".into()),
                ..Default::default()
            }))
            .with_item(concrete("c25_30", true))
            .with_item(LineItem::RawMaterial(RawMaterialItem {
                material: Some(Material::Paint),
                quantity: Some(40.0),
                paint_factor: Some(0.35),
                ..Default::default()
            }))
            .with_item(LineItem::RawMaterial(RawMaterialItem::default()))
            .with_item(LineItem::Manufacturing(ProcessItem {
                process: Some("soudure".into()),
                value: Some(6.0),
                comment: None,
            }))
            .with_item(LineItem::Energy(EnergyItem {
                source: Some("compresseur".into()),
                consumption: Some(3.0),
                comment: None,
            }))
            .with_item(LineItem::Transport(TransportItem {
                mode: Some(TransportMode::Helicopter),
                helicopter_payload: Some("lourd".into()),
                distance: Some(12.0),
                weight: Some(4.0),
                comment: None,
            }))
    }

    fn text(df: &DataFrame, name: &str, row: usize) -> Option<String> {
        df.column(name)
            .unwrap()
            .str()
            .unwrap()
            .get(row)
            .map(str::to_string)
    }

    fn number(df: &DataFrame, name: &str, row: usize) -> Option<f64> {
        df.column(name).unwrap().f64().unwrap().get(row)
    }

    #[test]
    fn test_encode_layout() {
        let table = FactorTable::builtin();
        let df = encode_scenario(&sample_scenario(), table).unwrap();

        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, column::ALL.map(str::to_string).to_vec());

        // Six items (the empty one is dropped) plus the total row.
        assert_eq!(df.height(), 7);
        assert_eq!(text(&df, column::METHOD, 0).as_deref(), Some("S355"));
        assert_eq!(text(&df, column::UNIT, 0).as_deref(), Some("kg"));
        assert_eq!(text(&df, column::COMMENT, 0).as_deref(), Some("Charpente"));

        assert_eq!(text(&df, column::METHOD, 1).as_deref(), Some("C25/30 armé"));
        assert_eq!(text(&df, column::UNIT, 1).as_deref(), Some("m³"));
        assert_eq!(number(&df, column::CEMENT_MASS, 1), Some(300.0));
        assert_eq!(number(&df, column::REBAR_MASS, 1), Some(100.0));
        assert_eq!(number(&df, column::REBAR_FACTOR, 1), Some(1.2));

        assert_eq!(text(&df, column::METHOD, 2).as_deref(), Some("Peinture"));
        assert_eq!(number(&df, column::EMISSION_FACTOR, 2), Some(0.35));
        assert_eq!(text(&df, column::UNIT, 3).as_deref(), Some("H"));

        assert_eq!(
            text(&df, column::METHOD, 5).as_deref(),
            Some("Hélicoptère lourd (> 3 t)")
        );
        assert_eq!(text(&df, column::CATEGORY, 5).as_deref(), Some("Transport"));
        assert_eq!(number(&df, column::WEIGHT, 5), Some(4.0));
        assert_eq!(number(&df, column::QUANTITY, 5), Some(12.0));

        let total = calculator::calculate(&sample_scenario(), table).totals.grand_total;
        assert_eq!(text(&df, column::CATEGORY, 6).as_deref(), Some("Total"));
        assert_eq!(text(&df, column::METHOD, 6), None);
        assert_eq!(number(&df, column::CO2E, 6), Some(round2(total)));
    }

    #[test]
    fn test_round_trip_keeps_variants() {
        let table = FactorTable::builtin();
        let model = ComparisonModel {
            classic: sample_scenario(),
            optimized: Scenario::new().with_item(concrete("c25_30_bas_carbone", false)),
        };
        let workbook = encode(&model, table).unwrap();
        assert_eq!(workbook.sheet_names(), vec!["Bilan Classique", "Bilan Optimisé"]);

        let decoded = decode(&workbook, table).unwrap();
        assert!(decoded.warnings.is_empty());
        let classic = &decoded.model.classic;

        assert_eq!(classic.raw_materials.len(), 3);
        assert_eq!(classic.raw_materials[0].material, Some(Material::Steel));
        assert_eq!(classic.raw_materials[0].steel_type.as_deref(), Some("s355"));
        assert_eq!(classic.raw_materials[0].quantity, Some(250.0));
        assert_eq!(classic.raw_materials[1].material, Some(Material::Concrete));
        assert_eq!(classic.raw_materials[1].concrete_type.as_deref(), Some("c25_30"));
        assert_eq!(classic.raw_materials[1].is_reinforced, Some(true));
        assert_eq!(classic.raw_materials[2].material, Some(Material::Paint));
        assert_eq!(classic.raw_materials[2].paint_factor, Some(0.35));

        assert_eq!(classic.manufacturing[0].process.as_deref(), Some("soudure"));
        assert_eq!(classic.manufacturing[0].value, Some(6.0));
        assert_eq!(classic.energy[0].consumption, Some(3.0));
        assert_eq!(classic.transport[0].mode, Some(TransportMode::Helicopter));
        assert_eq!(classic.transport[0].helicopter_payload.as_deref(), Some("lourd"));

        let optimized = &decoded.model.optimized.raw_materials;
        assert_eq!(optimized.len(), 1);
        assert_eq!(optimized[0].is_reinforced, Some(false));
        assert_eq!(optimized[0].rebar_mass, None);

        let before = calculator::calculate(&model.classic, table).totals.grand_total;
        let after = calculator::calculate(classic, table).totals.grand_total;
        assert!((before - after).abs() < 1e-9);
    }

    #[test]
    fn test_decode_by_header_name_with_reordered_columns() {
        let df = DataFrame::new(vec![
            Column::new(column::QUANTITY.into(), &["100", "", "7"]),
            Column::new(column::CO2E.into(), &["180.00", "", "0"]),
            Column::new(column::METHOD.into(), &["S235", "", "Camion porteur"]),
            Column::new(column::CATEGORY.into(), &["Matériaux", "Total", "Transport"]),
        ])
        .unwrap();
        let scenario = decode_scenario(&df, FactorTable::builtin()).unwrap();

        assert_eq!(scenario.raw_materials.len(), 1);
        assert_eq!(scenario.raw_materials[0].steel_type.as_deref(), Some("s235"));
        assert_eq!(scenario.raw_materials[0].quantity, Some(100.0));
        assert_eq!(scenario.transport.len(), 1);
        assert_eq!(
            scenario.transport[0].mode,
            Some(TransportMode::Named("porteur".into()))
        );
        assert_eq!(scenario.transport[0].weight, None);
    }

    #[test]
    fn test_rows_after_total_are_not_lost() {
        let df = DataFrame::new(vec![
            Column::new(column::CATEGORY.into(), &["Energie", "Total", "Energie"]),
            Column::new(
                column::METHOD.into(),
                &["Compresseur", "", "Raccordement réseau"],
            ),
            Column::new(column::QUANTITY.into(), &["2", "", "5"]),
        ])
        .unwrap();
        let scenario = decode_scenario(&df, FactorTable::builtin()).unwrap();
        assert_eq!(scenario.energy.len(), 2);
        assert_eq!(scenario.energy[1].source.as_deref(), Some("reseau"));
    }

    #[test]
    fn test_sheet_without_total_row_keeps_last_item() {
        let df = DataFrame::new(vec![
            Column::new(column::CATEGORY.into(), &["Fabrication"]),
            Column::new(column::METHOD.into(), &["Pliage"]),
            Column::new(column::QUANTITY.into(), &["30"]),
        ])
        .unwrap();
        let scenario = decode_scenario(&df, FactorTable::builtin()).unwrap();
        assert_eq!(scenario.manufacturing.len(), 1);
        assert_eq!(scenario.manufacturing[0].process.as_deref(), Some("pliage"));
    }

    #[test]
    fn test_unknown_labels_survive() {
        let df = DataFrame::new(vec![
            Column::new(column::CATEGORY.into(), &["Matériaux", "Transport", "Matériaux"]),
            Column::new(column::METHOD.into(), &["Chanvre", "Hélicoptère", "Béton armé"]),
        ])
        .unwrap();
        let scenario = decode_scenario(&df, FactorTable::builtin()).unwrap();

        assert_eq!(
            scenario.raw_materials[0].material,
            Some(Material::Named("Chanvre".into()))
        );
        assert_eq!(scenario.transport[0].mode, Some(TransportMode::Helicopter));
        assert_eq!(scenario.transport[0].helicopter_payload, None);
        assert_eq!(scenario.raw_materials[1].material, Some(Material::Concrete));
        assert_eq!(scenario.raw_materials[1].concrete_type, None);
        assert_eq!(scenario.raw_materials[1].is_reinforced, Some(true));
    }

    #[test]
    fn test_missing_sheet_is_soft() {
        let table = FactorTable::builtin();
        let mut workbook = Workbook::new();
        workbook.add_sheet(
            ScenarioKind::Classic.sheet_name(),
            encode_scenario(&sample_scenario(), table).unwrap(),
        );

        let decoded = decode(&workbook, table).unwrap();
        assert!(!decoded.model.classic.is_empty());
        assert!(decoded.model.optimized.is_empty());
        assert_eq!(decoded.warnings.len(), 1);
    }

    #[test]
    fn test_workbook_without_scenario_sheets_is_an_error() {
        let mut workbook = Workbook::new();
        let df = DataFrame::new(vec![Column::new("A".into(), &["1", "2"])]).unwrap();
        workbook.add_sheet("Feuil1", df);

        let err = decode(&workbook, FactorTable::builtin()).unwrap_err();
        assert!(matches!(err, CarbonError::MissingSheet(_)));
        assert!(decode(&Workbook::new(), FactorTable::builtin()).is_err());
    }

    #[test]
    fn test_item_without_selector_is_not_read_back() {
        let table = FactorTable::builtin();
        let scenario = Scenario::new()
            .with_item(LineItem::RawMaterial(RawMaterialItem {
                quantity: Some(12.0),
                comment: Some("Sans matériau".into()),
                ..Default::default()
            }))
            .with_item(LineItem::Energy(EnergyItem {
                source: Some("compresseur".into()),
                consumption: Some(3.0),
                comment: None,
            }));
        let df = encode_scenario(&scenario, table).unwrap();

        // The row is written, but with a blank method label.
        assert_eq!(df.height(), 3);
        assert_eq!(text(&df, column::CATEGORY, 0).as_deref(), Some("Matériaux"));
        assert_eq!(text(&df, column::METHOD, 0), None);
        assert_eq!(number(&df, column::QUANTITY, 0), Some(12.0));

        let decoded = decode_scenario(&df, table).unwrap();
        assert!(decoded.raw_materials.is_empty());
        assert_eq!(decoded.energy.len(), 1);
    }

    #[test]
    fn test_non_finite_numbers_read_as_absent() {
        let df = DataFrame::new(vec![
            Column::new(column::CATEGORY.into(), &["Energie", "Energie", "Energie"]),
            Column::new(column::METHOD.into(), &["Compresseur", "Compresseur", "Compresseur"]),
            Column::new(column::QUANTITY.into(), &["inf", "-infinity", "NaN"]),
        ])
        .unwrap();
        let scenario = decode_scenario(&df, FactorTable::builtin()).unwrap();
        assert_eq!(scenario.energy.len(), 3);
        assert!(scenario.energy.iter().all(|e| e.consumption.is_none()));

        let report = calculator::calculate(&scenario, FactorTable::builtin());
        assert_eq!(report.totals.grand_total, 0.0);
    }

    #[test]
    fn test_missing_optional_columns() {
        let df = DataFrame::new(vec![
            Column::new(column::CATEGORY.into(), &["Mise en œuvre"]),
            Column::new(column::METHOD.into(), &["Grue mobile"]),
        ])
        .unwrap();
        let scenario = decode_scenario(&df, FactorTable::builtin()).unwrap();
        assert_eq!(scenario.implementation[0].value, None);
        assert_eq!(scenario.implementation[0].comment, None);
    }
}
