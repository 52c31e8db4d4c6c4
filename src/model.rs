use serde::{Deserialize, Serialize};

use crate::schema::category;

/// The five emission categories of a bill of quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    RawMaterials,
    Manufacturing,
    Energy,
    Implementation,
    Transport,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::RawMaterials,
        Category::Manufacturing,
        Category::Energy,
        Category::Implementation,
        Category::Transport,
    ];

    /// Label used in the `Rubriques` column.
    pub fn sheet_label(self) -> &'static str {
        match self {
            Category::RawMaterials => category::RAW_MATERIALS,
            Category::Manufacturing => category::MANUFACTURING,
            Category::Energy => category::ENERGY,
            Category::Implementation => category::IMPLEMENTATION,
            Category::Transport => category::TRANSPORT,
        }
    }

    pub fn from_sheet_label(label: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.sheet_label() == label)
    }

    /// Section title shown in comparison views.
    pub fn title(self) -> &'static str {
        match self {
            Category::Energy => "Énergie",
            other => other.sheet_label(),
        }
    }
}

/// Material selection of a raw-material item. Decides which sub-fields apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Steel,
    Concrete,
    Paint,
    /// Generic material, by factor-table id.
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    /// Factor comes from the helicopter payload table.
    Helicopter,
    /// Generic transport mode, by factor-table id.
    Named(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMaterialItem {
    pub material: Option<Material>,
    pub quantity: Option<f64>,
    pub comment: Option<String>,
    pub steel_type: Option<String>,
    pub concrete_type: Option<String>,
    pub cement_mass: Option<f64>,
    pub is_reinforced: Option<bool>,
    pub rebar_mass: Option<f64>,
    pub rebar_factor: Option<f64>,
    pub paint_factor: Option<f64>,
}

/// Manufacturing or implementation step: a quantity or a duration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessItem {
    pub process: Option<String>,
    pub value: Option<f64>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnergyItem {
    pub source: Option<String>,
    /// Hours of use.
    pub consumption: Option<f64>,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransportItem {
    pub mode: Option<TransportMode>,
    /// Kilometres.
    pub distance: Option<f64>,
    /// Tonnes.
    pub weight: Option<f64>,
    pub helicopter_payload: Option<String>,
    pub comment: Option<String>,
}

/// A line item tagged with its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum LineItem {
    RawMaterial(RawMaterialItem),
    Manufacturing(ProcessItem),
    Energy(EnergyItem),
    Implementation(ProcessItem),
    Transport(TransportItem),
}

impl LineItem {
    pub fn category(&self) -> Category {
        match self {
            LineItem::RawMaterial(_) => Category::RawMaterials,
            LineItem::Manufacturing(_) => Category::Manufacturing,
            LineItem::Energy(_) => Category::Energy,
            LineItem::Implementation(_) => Category::Implementation,
            LineItem::Transport(_) => Category::Transport,
        }
    }

    /// The field that drives this category's quantity, 0 when absent.
    pub fn quantity(&self) -> f64 {
        match self {
            LineItem::RawMaterial(item) => item.quantity,
            LineItem::Manufacturing(item) | LineItem::Implementation(item) => item.value,
            LineItem::Energy(item) => item.consumption,
            LineItem::Transport(item) => item.distance,
        }
        .unwrap_or(0.0)
    }

    pub fn comment(&self) -> Option<&str> {
        match self {
            LineItem::RawMaterial(item) => item.comment.as_deref(),
            LineItem::Manufacturing(item) | LineItem::Implementation(item) => {
                item.comment.as_deref()
            }
            LineItem::Energy(item) => item.comment.as_deref(),
            LineItem::Transport(item) => item.comment.as_deref(),
        }
    }

    /// True when no field holds a non-zero, non-blank, non-false value.
    pub fn is_empty(&self) -> bool {
        match self {
            LineItem::RawMaterial(item) => {
                item.material.is_none()
                    && !has_number(item.quantity)
                    && !has_text(&item.comment)
                    && !has_text(&item.steel_type)
                    && !has_text(&item.concrete_type)
                    && !has_number(item.cement_mass)
                    && item.is_reinforced != Some(true)
                    && !has_number(item.rebar_mass)
                    && !has_number(item.rebar_factor)
                    && !has_number(item.paint_factor)
            }
            LineItem::Manufacturing(item) | LineItem::Implementation(item) => {
                !has_text(&item.process) && !has_number(item.value) && !has_text(&item.comment)
            }
            LineItem::Energy(item) => {
                !has_text(&item.source)
                    && !has_number(item.consumption)
                    && !has_text(&item.comment)
            }
            LineItem::Transport(item) => {
                item.mode.is_none()
                    && !has_number(item.distance)
                    && !has_number(item.weight)
                    && !has_text(&item.helicopter_payload)
                    && !has_text(&item.comment)
            }
        }
    }
}

fn has_number(value: Option<f64>) -> bool {
    value.is_some_and(|v| v != 0.0 && !v.is_nan())
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|s| !s.is_empty())
}

/// One offer: five ordered item lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub raw_materials: Vec<RawMaterialItem>,
    pub manufacturing: Vec<ProcessItem>,
    pub energy: Vec<EnergyItem>,
    pub implementation: Vec<ProcessItem>,
    pub transport: Vec<TransportItem>,
}

impl Scenario {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item to the list of its category.
    pub fn push(&mut self, item: LineItem) {
        match item {
            LineItem::RawMaterial(i) => self.raw_materials.push(i),
            LineItem::Manufacturing(i) => self.manufacturing.push(i),
            LineItem::Energy(i) => self.energy.push(i),
            LineItem::Implementation(i) => self.implementation.push(i),
            LineItem::Transport(i) => self.transport.push(i),
        }
    }

    pub fn with_item(mut self, item: LineItem) -> Self {
        self.push(item);
        self
    }

    /// Items of one category, in insertion order.
    pub fn items_in(&self, category: Category) -> Vec<LineItem> {
        match category {
            Category::RawMaterials => self
                .raw_materials
                .iter()
                .cloned()
                .map(LineItem::RawMaterial)
                .collect(),
            Category::Manufacturing => self
                .manufacturing
                .iter()
                .cloned()
                .map(LineItem::Manufacturing)
                .collect(),
            Category::Energy => self.energy.iter().cloned().map(LineItem::Energy).collect(),
            Category::Implementation => self
                .implementation
                .iter()
                .cloned()
                .map(LineItem::Implementation)
                .collect(),
            Category::Transport => self
                .transport
                .iter()
                .cloned()
                .map(LineItem::Transport)
                .collect(),
        }
    }

    /// All items, category by category.
    pub fn items(&self) -> Vec<LineItem> {
        Category::ALL
            .into_iter()
            .flat_map(|c| self.items_in(c))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.raw_materials.len()
            + self.manufacturing.len()
            + self.energy.len()
            + self.implementation.len()
            + self.transport.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    Classic,
    Optimized,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 2] = [ScenarioKind::Classic, ScenarioKind::Optimized];

    pub fn sheet_name(self) -> &'static str {
        match self {
            ScenarioKind::Classic => crate::schema::sheet::CLASSIC,
            ScenarioKind::Optimized => crate::schema::sheet::OPTIMIZED,
        }
    }
}

/// The two offers being compared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonModel {
    pub classic: Scenario,
    pub optimized: Scenario,
}

impl ComparisonModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scenario(&self, kind: ScenarioKind) -> &Scenario {
        match kind {
            ScenarioKind::Classic => &self.classic,
            ScenarioKind::Optimized => &self.optimized,
        }
    }

    pub fn scenario_mut(&mut self, kind: ScenarioKind) -> &mut Scenario {
        match kind {
            ScenarioKind::Classic => &mut self.classic,
            ScenarioKind::Optimized => &mut self.optimized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_routes_by_category() {
        let scenario = Scenario::new()
            .with_item(LineItem::Energy(EnergyItem::default()))
            .with_item(LineItem::Implementation(ProcessItem::default()))
            .with_item(LineItem::Manufacturing(ProcessItem {
                process: Some("soudure".into()),
                ..Default::default()
            }));
        assert_eq!(scenario.energy.len(), 1);
        assert_eq!(scenario.implementation.len(), 1);
        assert_eq!(scenario.manufacturing.len(), 1);
        assert_eq!(scenario.len(), 3);

        let categories: Vec<Category> = scenario.items().iter().map(LineItem::category).collect();
        assert_eq!(
            categories,
            vec![
                Category::Manufacturing,
                Category::Energy,
                Category::Implementation
            ]
        );
    }

    #[test]
    fn test_quantity_is_polymorphic() {
        let transport = LineItem::Transport(TransportItem {
            distance: Some(120.0),
            weight: Some(3.0),
            ..Default::default()
        });
        assert_eq!(transport.quantity(), 120.0);

        let energy = LineItem::Energy(EnergyItem {
            consumption: Some(8.0),
            ..Default::default()
        });
        assert_eq!(energy.quantity(), 8.0);
        assert_eq!(LineItem::Manufacturing(ProcessItem::default()).quantity(), 0.0);
    }

    #[test]
    fn test_empty_items() {
        assert!(LineItem::RawMaterial(RawMaterialItem::default()).is_empty());
        assert!(LineItem::RawMaterial(RawMaterialItem {
            quantity: Some(0.0),
            comment: Some(String::new()),
            is_reinforced: Some(false),
            ..Default::default()
        })
        .is_empty());
        assert!(!LineItem::Transport(TransportItem {
            comment: Some("livraison".into()),
            ..Default::default()
        })
        .is_empty());
    }

    #[test]
    fn test_category_labels() {
        for category in Category::ALL {
            assert_eq!(Category::from_sheet_label(category.sheet_label()), Some(category));
        }
        assert_eq!(Category::from_sheet_label("Total"), None);
        assert_eq!(Category::Energy.title(), "Énergie");
    }

    #[test]
    fn test_line_item_serde_tag() {
        let item = LineItem::Energy(EnergyItem {
            source: Some("compresseur".into()),
            consumption: Some(4.0),
            comment: None,
        });
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"category\":\"energy\""));
        let back: LineItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
