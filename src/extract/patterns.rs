use once_cell::sync::Lazy;
use super::{FieldPattern, FieldSet};

pub const TOTAL_ENERGY: &str = "Total Energy (Eh)";
pub const GRADIENT_NORM: &str = "Gradient Norm (Eh/α)";
pub const HOMO_LUMO_GAP: &str = "HOMO-LUMO Gap (eV)";
pub const TOTAL_ENTHALPY: &str = "Total Enthalpy (Eh)";
pub const TOTAL_FREE_ENERGY: &str = "Total Free Energy (Eh)";
pub const ZERO_POINT_ENERGY: &str = "Zero Point Energy (Eh)";
pub const G_RRHO_WITHOUT_ZPVE: &str = "G(RRHO) w/o ZPVE (Eh)";
pub const G_RRHO_CONTRIB: &str = "G(RRHO) contrib. (Eh)";

// Keywords are matched as whole words separated by whitespace, so
// "TOTAL ENERGY" cannot match inside "TOTAL FREE ENERGY".
const OPTIMIZATION: &[(&str, &str)] = &[
    (TOTAL_ENERGY, r"TOTAL\s+ENERGY\s+(-?\d+\.\d+)\s*Eh"),
    (GRADIENT_NORM, r"GRADIENT\s+NORM\s+(-?\d+\.\d+)\s*Eh/α"),
    (HOMO_LUMO_GAP, r"HOMO-LUMO\s+GAP\s+(-?\d+\.\d+)\s*eV"),
];

const THERMOCHEMISTRY: &[(&str, &str)] = &[
    (TOTAL_ENERGY, r"TOTAL\s+ENERGY\s+(-?\d+\.\d+)\s+Eh"),
    (TOTAL_ENTHALPY, r"TOTAL\s+ENTHALPY\s+(-?\d+\.\d+)\s+Eh"),
    (TOTAL_FREE_ENERGY, r"TOTAL\s+FREE\s+ENERGY\s+(-?\d+\.\d+)\s+Eh"),
    (GRADIENT_NORM, r"GRADIENT\s+NORM\s+(-?\d+\.\d+)\s+Eh/α"),
    (HOMO_LUMO_GAP, r"HOMO-LUMO\s+GAP\s+(-?\d+\.\d+)\s+eV"),
    (ZERO_POINT_ENERGY, r"(?i)zero\s+point\s+energy\s+(-?\d+\.\d+)\s+Eh"),
    (G_RRHO_WITHOUT_ZPVE, r"(?i)G\(RRHO\)\s+w/o\s+ZPVE\s+(-?\d+\.\d+)\s+Eh"),
    (G_RRHO_CONTRIB, r"(?i)G\(RRHO\)\s+contrib\.\s+(-?\d+\.\d+)\s+Eh"),
];

fn build(table: &[(&str, &str)]) -> FieldSet {
    FieldSet::new(
        table
            .iter()
            .map(|(label, pattern)| FieldPattern::new(*label, pattern).unwrap())
            .collect(),
    )
}

static OPTIMIZATION_FIELDS: Lazy<FieldSet> = Lazy::new(|| build(OPTIMIZATION));

static THERMOCHEMISTRY_FIELDS: Lazy<FieldSet> = Lazy::new(|| build(THERMOCHEMISTRY));

/// Energy, gradient and gap from a geometry optimisation.
pub fn optimization_fields() -> FieldSet {
    OPTIMIZATION_FIELDS.clone()
}

/// Optimisation values plus the thermochemistry block of a Hessian run.
pub fn thermochemistry_fields() -> FieldSet {
    THERMOCHEMISTRY_FIELDS.clone()
}
