//! Editing session: owns the comparison model and runs import/export.
//!
//! Every operation catches its own failure, logs it and hands back a
//! [`Notice`] for the user. A failed import never touches the model.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::codec::{self, Decoded};
use crate::comparison::{compare, Comparison};
use crate::error::Result;
use crate::factors::FactorTable;
use crate::model::ComparisonModel;
use crate::xlsx;

/// Session settings.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Consultation name, used in the export file name.
    pub consultation_label: String,
    /// Directory exports are written to (current directory when empty).
    pub output_dir: PathBuf,
    /// JSON factor table replacing the built-in one.
    pub factor_table: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    Success,
    Failure,
}

/// Transient, user-visible outcome of an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    fn success(title: &str, description: &str) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    fn failure(title: &str, description: &str) -> Self {
        Self {
            level: NoticeLevel::Failure,
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.level == NoticeLevel::Success
    }
}

pub struct Session {
    config: SessionConfig,
    table: Cow<'static, FactorTable>,
    model: ComparisonModel,
}

impl Session {
    /// Start an empty session. Fails only when a configured factor table
    /// cannot be loaded.
    pub fn new(config: SessionConfig) -> Result<Self> {
        let table = match &config.factor_table {
            Some(path) => {
                info!(path = %path.display(), "loading factor table");
                Cow::Owned(FactorTable::from_json_path(path)?)
            }
            None => Cow::Borrowed(FactorTable::builtin()),
        };
        Ok(Self {
            config,
            table,
            model: ComparisonModel::new(),
        })
    }

    pub fn with_table(config: SessionConfig, table: FactorTable) -> Self {
        Self {
            config,
            table: Cow::Owned(table),
            model: ComparisonModel::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn table(&self) -> &FactorTable {
        &self.table
    }

    pub fn model(&self) -> &ComparisonModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut ComparisonModel {
        &mut self.model
    }

    pub fn set_consultation_label(&mut self, label: impl Into<String>) {
        self.config.consultation_label = label.into();
    }

    /// Recalculate both offers from the current model.
    pub fn comparison(&self) -> Comparison {
        compare(&self.model, &self.table)
    }

    /// Target path of [`Session::export_xlsx`].
    pub fn export_path(&self) -> PathBuf {
        self.config
            .output_dir
            .join(xlsx::export_file_name(&self.config.consultation_label))
    }

    fn try_export(&self, path: &Path) -> Result<()> {
        let workbook = codec::encode(&self.model, &self.table)?;
        xlsx::write_workbook(&workbook, path)
    }

    /// Write both offers to the export workbook.
    pub fn export_xlsx(&self) -> Notice {
        let path = self.export_path();
        match self.try_export(&path) {
            Ok(()) => {
                info!(path = %path.display(), "export done");
                Notice::success(
                    "Exportation réussie",
                    "Le fichier Excel contenant les deux bilans a été téléchargé.",
                )
            }
            Err(e) => {
                error!(error = %e, "excel export failed");
                Notice::failure(
                    "Échec de l'exportation",
                    "Une erreur est survenue lors de la génération du fichier Excel.",
                )
            }
        }
    }

    /// Both offers as `.xlsx` bytes.
    pub fn export_xlsx_bytes(&self) -> Result<Vec<u8>> {
        let workbook = codec::encode(&self.model, &self.table)?;
        xlsx::workbook_to_bytes(&workbook)
    }

    /// Replace the model with the offers read from a workbook file.
    pub fn import_xlsx(&mut self, path: impl AsRef<Path>) -> Notice {
        let decoded = xlsx::read_workbook(path.as_ref())
            .and_then(|wb| codec::decode(&wb, &self.table));
        self.apply_import(decoded)
    }

    /// Replace the model with the offers read from in-memory workbook bytes.
    pub fn import_xlsx_bytes(&mut self, bytes: &[u8]) -> Notice {
        let decoded =
            xlsx::read_workbook_from_bytes(bytes).and_then(|wb| codec::decode(&wb, &self.table));
        self.apply_import(decoded)
    }

    fn apply_import(&mut self, decoded: Result<Decoded>) -> Notice {
        match decoded {
            Ok(Decoded { model, warnings }) => {
                self.model = model;
                if warnings.is_empty() {
                    return Notice::success(
                        "Importation réussie",
                        "Les données des bilans classique et optimisé ont été chargées.",
                    );
                }
                for w in &warnings {
                    warn!(warning = %w, "import incomplete");
                }
                Notice::success(
                    "Importation réussie",
                    &format!("Import partiel : {}", warnings.join(" ; ")),
                )
            }
            Err(e) => {
                error!(error = %e, "excel import failed");
                Notice::failure(
                    "Échec de l'importation",
                    "Le fichier est peut-être corrompu ou son format est incorrect.",
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Workbook;
    use crate::model::{LineItem, Material, RawMaterialItem, Scenario, ScenarioKind};
    use polars::prelude::*;

    fn populated() -> ComparisonModel {
        ComparisonModel {
            classic: Scenario::new().with_item(LineItem::RawMaterial(RawMaterialItem {
                material: Some(Material::Steel),
                steel_type: Some("s235".into()),
                quantity: Some(100.0),
                ..Default::default()
            })),
            optimized: Scenario::new(),
        }
    }

    #[test]
    fn test_failed_import_keeps_model() {
        let mut session = Session::new(SessionConfig::default()).unwrap();
        *session.model_mut() = populated();

        let notice = session.import_xlsx_bytes(b"not a spreadsheet");
        assert_eq!(notice.level, NoticeLevel::Failure);
        assert_eq!(notice.title, "Échec de l'importation");
        assert_eq!(session.model(), &populated());
    }

    #[test]
    fn test_import_without_scenario_sheets_keeps_model() {
        let mut workbook = Workbook::new();
        let df = DataFrame::new(vec![Column::new("A".into(), &["Devis", "Lot 2"])]).unwrap();
        workbook.add_sheet("Feuil1", df);
        let bytes = xlsx::workbook_to_bytes(&workbook).unwrap();

        let mut session = Session::new(SessionConfig::default()).unwrap();
        *session.model_mut() = populated();

        let notice = session.import_xlsx_bytes(&bytes);
        assert_eq!(notice.level, NoticeLevel::Failure);
        assert_eq!(notice.title, "Échec de l'importation");
        assert_eq!(session.model(), &populated());
    }

    #[test]
    fn test_partial_import_names_missing_sheet() {
        let source = Session::new(SessionConfig::default()).unwrap();
        let mut workbook = Workbook::new();
        workbook.add_sheet(
            ScenarioKind::Classic.sheet_name(),
            codec::encode_scenario(&populated().classic, source.table()).unwrap(),
        );
        let bytes = xlsx::workbook_to_bytes(&workbook).unwrap();

        let mut session = Session::new(SessionConfig::default()).unwrap();
        let notice = session.import_xlsx_bytes(&bytes);
        assert!(notice.is_success());
        assert!(notice.description.starts_with("Import partiel"));
        assert!(notice.description.contains("Bilan Optimisé"));
        assert_eq!(session.model().classic, populated().classic);
        assert!(session.model().optimized.is_empty());
    }

    #[test]
    fn test_bytes_round_trip_replaces_model() {
        let mut source = Session::new(SessionConfig::default()).unwrap();
        *source.model_mut() = populated();
        let bytes = source.export_xlsx_bytes().unwrap();

        let mut target = Session::new(SessionConfig::default()).unwrap();
        let notice = target.import_xlsx_bytes(&bytes);
        assert!(notice.is_success());
        assert_eq!(target.model().classic.raw_materials.len(), 1);
        assert!((target.comparison().synthesis.total_classic - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_export_path_uses_label() {
        let mut session = Session::new(SessionConfig {
            output_dir: PathBuf::from("/tmp/exports"),
            ..Default::default()
        })
        .unwrap();
        session.set_consultation_label("Lot 3");
        assert_eq!(
            session.export_path(),
            PathBuf::from("/tmp/exports/bilan_carbone_Lot_3.xlsx")
        );
    }

    #[test]
    fn test_missing_factor_table_file() {
        let config = SessionConfig {
            factor_table: Some(PathBuf::from("/nonexistent/factors.json")),
            ..Default::default()
        };
        assert!(Session::new(config).is_err());
    }
}
