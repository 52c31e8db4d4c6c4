//! Classic versus optimized comparison.
//!
//! Produces the figures the detailed comparison table and the synthesis view
//! display: per-category rows joined on item name, and the overall gain.

use serde::Serialize;

use crate::calculator::{calculate, EmissionReport};
use crate::factors::FactorTable;
use crate::model::{Category, ComparisonModel};

/// Differences smaller than this are shown as no change.
pub const NEUTRAL_THRESHOLD: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Trend {
    /// The optimized offer emits less.
    Gain,
    /// The optimized offer emits more.
    Increase,
    Neutral,
}

impl Trend {
    pub fn of(diff: f64) -> Trend {
        if diff.abs() < NEUTRAL_THRESHOLD {
            Trend::Neutral
        } else if diff < 0.0 {
            Trend::Gain
        } else {
            Trend::Increase
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub name: String,
    pub classic_co2e: f64,
    pub optimized_co2e: f64,
    /// `optimized - classic`.
    pub diff: f64,
}

impl ComparisonRow {
    pub fn trend(&self) -> Trend {
        Trend::of(self.diff)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionComparison {
    pub category: Category,
    pub title: &'static str,
    pub rows: Vec<ComparisonRow>,
    pub total_classic: f64,
    pub total_optimized: f64,
    pub total_diff: f64,
}

/// One bar pair of the per-category chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryBar {
    pub category: Category,
    pub classic: f64,
    pub optimized: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Synthesis {
    pub total_classic: f64,
    pub total_optimized: f64,
    /// `classic - optimized`; positive when the optimized offer is better.
    pub total_gain: f64,
    /// Gain as a percentage of the classic total, 0 when that total is 0.
    pub percentage_gain: f64,
    pub by_category: Vec<CategoryBar>,
}

impl Synthesis {
    pub fn has_data(&self) -> bool {
        self.total_classic > 0.0 || self.total_optimized > 0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub classic: EmissionReport,
    pub optimized: EmissionReport,
    pub sections: Vec<SectionComparison>,
    pub synthesis: Synthesis,
}

impl Comparison {
    /// Sections with at least one row to show.
    pub fn visible_sections(&self) -> impl Iterator<Item = &SectionComparison> {
        self.sections.iter().filter(|s| !s.rows.is_empty())
    }
}

fn section(category: Category, classic: &EmissionReport, optimized: &EmissionReport) -> SectionComparison {
    let mut rows: Vec<ComparisonRow> = Vec::new();

    for (detail, is_classic) in classic
        .details
        .get(category)
        .iter()
        .map(|d| (d, true))
        .chain(optimized.details.get(category).iter().map(|d| (d, false)))
    {
        let idx = match rows.iter().position(|r| r.name == detail.name) {
            Some(idx) => idx,
            None => {
                rows.push(ComparisonRow {
                    name: detail.name.clone(),
                    classic_co2e: 0.0,
                    optimized_co2e: 0.0,
                    diff: 0.0,
                });
                rows.len() - 1
            }
        };
        let row = &mut rows[idx];
        if is_classic {
            row.classic_co2e += detail.co2e;
        } else {
            row.optimized_co2e += detail.co2e;
        }
    }
    for row in &mut rows {
        row.diff = row.optimized_co2e - row.classic_co2e;
    }

    let total_classic = classic.totals.get(category);
    let total_optimized = optimized.totals.get(category);
    SectionComparison {
        category,
        title: category.title(),
        rows,
        total_classic,
        total_optimized,
        total_diff: total_optimized - total_classic,
    }
}

/// Calculate both offers and compare them category by category.
pub fn compare(model: &ComparisonModel, table: &FactorTable) -> Comparison {
    let classic = calculate(&model.classic, table);
    let optimized = calculate(&model.optimized, table);

    let sections = Category::ALL
        .into_iter()
        .map(|c| section(c, &classic, &optimized))
        .collect();

    let total_classic = classic.totals.grand_total;
    let total_optimized = optimized.totals.grand_total;
    let total_gain = total_classic - total_optimized;
    let percentage_gain = if total_classic > 0.0 {
        total_gain / total_classic * 100.0
    } else {
        0.0
    };
    let by_category = Category::ALL
        .into_iter()
        .map(|category| CategoryBar {
            category,
            classic: classic.totals.get(category),
            optimized: optimized.totals.get(category),
        })
        .collect();

    Comparison {
        synthesis: Synthesis {
            total_classic,
            total_optimized,
            total_gain,
            percentage_gain,
            by_category,
        },
        classic,
        optimized,
        sections,
    }
}
