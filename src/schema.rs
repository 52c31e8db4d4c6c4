/// Spreadsheet and label constants for the carbon comparator.
/// Single source of truth - the header texts are part of the on-disk format.

// ── Sheet names ─────────────────────────────────────────────────────────────
pub mod sheet {
    pub const CLASSIC: &str = "Bilan Classique";
    pub const OPTIMIZED: &str = "Bilan Optimisé";
}

// ── Report columns ──────────────────────────────────────────────────────────
pub mod column {
    pub const CATEGORY: &str = "Rubriques";
    pub const METHOD: &str = "Méthodes";
    pub const UNIT: &str = "Unité";
    pub const QUANTITY: &str = "Quantité";
    pub const EMISSION_FACTOR: &str = "Facteur d'émission (kg CO²e)";
    pub const CEMENT_MASS: &str = "Masse ciment (kg/m³)";
    pub const REBAR_FACTOR: &str = "Facteur d'émission armature (kg CO²e)";
    pub const REBAR_MASS: &str = "Masse de ferraillage (kg/m³)";
    pub const WEIGHT: &str = "Poids (tonnes)";
    pub const CO2E: &str = "Kg CO²e";
    pub const COMMENT: &str = "Commentaires explicatifs";

    /// Header row, in on-disk order.
    pub const ALL: [&str; 11] = [
        CATEGORY,
        METHOD,
        UNIT,
        QUANTITY,
        EMISSION_FACTOR,
        CEMENT_MASS,
        REBAR_FACTOR,
        REBAR_MASS,
        WEIGHT,
        CO2E,
        COMMENT,
    ];

    /// Columns written as numeric cells.
    pub const NUMERIC: [&str; 7] = [
        QUANTITY,
        EMISSION_FACTOR,
        CEMENT_MASS,
        REBAR_FACTOR,
        REBAR_MASS,
        WEIGHT,
        CO2E,
    ];
}

// ── Category labels ─────────────────────────────────────────────────────────
pub mod category {
    pub const RAW_MATERIALS: &str = "Matériaux";
    pub const MANUFACTURING: &str = "Fabrication";
    pub const ENERGY: &str = "Energie";
    pub const IMPLEMENTATION: &str = "Mise en œuvre";
    pub const TRANSPORT: &str = "Transport";
    pub const TOTAL: &str = "Total";
}

// ── Method label markers ────────────────────────────────────────────────────
pub mod marker {
    pub const STEEL: &str = "Acier";
    pub const CONCRETE: &str = "Béton";
    pub const PAINT: &str = "Peinture";
    pub const HELICOPTER: &str = "Hélicoptère";
    pub const REINFORCED_SUFFIX: &str = " armé";
    pub const UNKNOWN: &str = "Inconnu";
}

// ── Unit symbols ────────────────────────────────────────────────────────────
pub mod unit {
    pub const KILOGRAM: &str = "kg";
    pub const CUBIC_METRE: &str = "m³";
    pub const SQUARE_METRE: &str = "m²";
    pub const HOUR: &str = "H";
    pub const KILOMETRE: &str = "km";
    /// Factor unit suffix marking a time-based process.
    pub const PER_HOUR_SUFFIX: &str = "/hr";
}

// ── Output file names ───────────────────────────────────────────────────────
pub mod file {
    pub const EXPORT_PREFIX: &str = "bilan_carbone";
    pub const DEFAULT_LABEL: &str = "comparaison";
    pub const REPORT_PDF: &str = "synthese_carbone.pdf";
}
