use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyModule;
use pyo3_polars::PyDataFrame;

use crate::codec;
use crate::comparison;
use crate::error::CarbonError;
use crate::factors::FactorTable;
use crate::model::{ComparisonModel, Scenario, ScenarioKind};
use crate::schema;
use crate::xlsx;

fn parse_model(model_json: &str) -> PyResult<ComparisonModel> {
    serde_json::from_str(model_json)
        .map_err(|e| PyValueError::new_err(format!("Invalid comparison model: {e}")))
}

fn to_json<T: serde::Serialize>(value: &T) -> PyResult<String> {
    serde_json::to_string(value).map_err(|e| CarbonError::from(e).into())
}

fn parse_scenario_kind(scenario: &str) -> PyResult<ScenarioKind> {
    match scenario {
        "classic" => Ok(ScenarioKind::Classic),
        "optimized" => Ok(ScenarioKind::Optimized),
        _ => Err(PyValueError::new_err(format!(
            "Invalid scenario: '{}'. Must be 'classic' or 'optimized'",
            scenario
        ))),
    }
}

/// Emission report of one scenario, as JSON.
#[pyfunction]
fn calculate(scenario_json: &str) -> PyResult<String> {
    let scenario: Scenario = serde_json::from_str(scenario_json)
        .map_err(|e| PyValueError::new_err(format!("Invalid scenario: {e}")))?;
    to_json(&crate::calculator::calculate(&scenario, FactorTable::builtin()))
}

/// Full classic/optimized comparison, as JSON.
#[pyfunction]
fn compare(model_json: &str) -> PyResult<String> {
    let model = parse_model(model_json)?;
    to_json(&comparison::compare(&model, FactorTable::builtin()))
}

/// The export sheet of one scenario as a Polars DataFrame.
#[pyfunction]
fn scenario_frame(model_json: &str, scenario: &str) -> PyResult<PyDataFrame> {
    let model = parse_model(model_json)?;
    let kind = parse_scenario_kind(scenario)?;
    let df = codec::encode_scenario(model.scenario(kind), FactorTable::builtin())?;
    Ok(PyDataFrame(df))
}

#[pyfunction]
fn export_xlsx(model_json: &str, path: &str) -> PyResult<()> {
    let model = parse_model(model_json)?;
    let workbook = codec::encode(&model, FactorTable::builtin())?;
    xlsx::write_workbook(&workbook, path)?;
    Ok(())
}

/// Read a workbook and return the decoded model as JSON.
#[pyfunction]
fn import_xlsx(path: &str) -> PyResult<String> {
    let workbook = xlsx::read_workbook(path)?;
    let decoded = codec::decode(&workbook, FactorTable::builtin())?;
    to_json(&decoded.model)
}

#[pyfunction]
fn export_file_name(label: &str) -> String {
    xlsx::export_file_name(label)
}

/// Export schema constants as Python submodules
fn add_schema_exports(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Sheets
    let sheet = PyModule::new(m.py(), "sheet")?;
    sheet.add("CLASSIC", schema::sheet::CLASSIC)?;
    sheet.add("OPTIMIZED", schema::sheet::OPTIMIZED)?;
    m.add_submodule(&sheet)?;

    // Columns
    let column = PyModule::new(m.py(), "column")?;
    column.add("CATEGORY", schema::column::CATEGORY)?;
    column.add("METHOD", schema::column::METHOD)?;
    column.add("UNIT", schema::column::UNIT)?;
    column.add("QUANTITY", schema::column::QUANTITY)?;
    column.add("EMISSION_FACTOR", schema::column::EMISSION_FACTOR)?;
    column.add("CEMENT_MASS", schema::column::CEMENT_MASS)?;
    column.add("REBAR_FACTOR", schema::column::REBAR_FACTOR)?;
    column.add("REBAR_MASS", schema::column::REBAR_MASS)?;
    column.add("WEIGHT", schema::column::WEIGHT)?;
    column.add("CO2E", schema::column::CO2E)?;
    column.add("COMMENT", schema::column::COMMENT)?;
    m.add_submodule(&column)?;

    // Categories
    let category = PyModule::new(m.py(), "category")?;
    category.add("RAW_MATERIALS", schema::category::RAW_MATERIALS)?;
    category.add("MANUFACTURING", schema::category::MANUFACTURING)?;
    category.add("ENERGY", schema::category::ENERGY)?;
    category.add("IMPLEMENTATION", schema::category::IMPLEMENTATION)?;
    category.add("TRANSPORT", schema::category::TRANSPORT)?;
    category.add("TOTAL", schema::category::TOTAL)?;
    m.add_submodule(&category)?;

    Ok(())
}

#[pymodule]
fn carbon_comparator(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(calculate, m)?)?;
    m.add_function(wrap_pyfunction!(compare, m)?)?;
    m.add_function(wrap_pyfunction!(scenario_frame, m)?)?;
    m.add_function(wrap_pyfunction!(export_xlsx, m)?)?;
    m.add_function(wrap_pyfunction!(import_xlsx, m)?)?;
    m.add_function(wrap_pyfunction!(export_file_name, m)?)?;
    add_schema_exports(m)?;
    Ok(())
}
