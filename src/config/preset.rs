use std::fmt;
use std::path::{Path, PathBuf};
use clap::ValueEnum;
use serde::Deserialize;
use crate::aggregate::{FILE_COLUMN, RELATIVE_PATH_COLUMN};
use crate::decode::EncodingKind;
use crate::extract::patterns::{self, *};
use crate::extract::FieldSet;
use crate::metadata::{LabelRule, MetadataInferencer, Position, Predicate};
use crate::scanner::FileFilter;

pub const TOP_FOLDER: &str = "Top Folder";
pub const TETRAMER: &str = "Tetramer";
pub const OPTIMIZATION_FOLDER: &str = "Optimization Folder";
pub const MACROCYCLE: &str = "Macrocycle";
pub const CONFORMATION: &str = "Conformation";
pub const BINDING: &str = "Binding";

/// Folder conventions the tool knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Geometry optimisations laid out as Macrocycle/Orientation/Tetramer/.../run.xtb.log
    #[default]
    Opt,
    /// Optimisation + Hessian runs, labels found by folder name content
    Thermo,
}

impl Preset {
    pub fn all() -> [Preset; 2] {
        [Preset::Opt, Preset::Thermo]
    }

    pub fn profile(self) -> ScanProfile {
        match self {
            Preset::Opt => ScanProfile {
                name: "opt".to_string(),
                filter: common_filter(".xtb.log"),
                fields: patterns::optimization_fields(),
                metadata: MetadataInferencer::new(vec![
                    LabelRule::positional(TOP_FOLDER, Position::FromStart(0)),
                    LabelRule::positional(TETRAMER, Position::FromStart(1)),
                    LabelRule::positional(OPTIMIZATION_FOLDER, Position::FromEnd(0)),
                ]),
                columns: to_strings(&[
                    TOP_FOLDER,
                    TETRAMER,
                    OPTIMIZATION_FOLDER,
                    FILE_COLUMN,
                    RELATIVE_PATH_COLUMN,
                    TOTAL_ENERGY,
                    GRADIENT_NORM,
                    HOMO_LUMO_GAP,
                ]),
                encoding: EncodingKind::NullSniff,
                output: OutputLocation::BesideRoot,
            },
            Preset::Thermo => ScanProfile {
                name: "thermo".to_string(),
                filter: common_filter("xtbopt.xtb.log"),
                fields: patterns::thermochemistry_fields(),
                metadata: MetadataInferencer::new(vec![
                    LabelRule::first_match(MACROCYCLE, Predicate::StartsWith("Au".to_string()))
                        .including_root(),
                    LabelRule::first_match(TETRAMER, Predicate::Alphabetic(4)).including_root(),
                    LabelRule::first_match(CONFORMATION, Predicate::one_of(["up", "down"]))
                        .including_root(),
                    LabelRule::first_match(BINDING, Predicate::one_of(["bound", "unbound"]))
                        .including_root(),
                ]),
                columns: to_strings(&[
                    FILE_COLUMN,
                    TOTAL_ENERGY,
                    TOTAL_ENTHALPY,
                    TOTAL_FREE_ENERGY,
                    GRADIENT_NORM,
                    HOMO_LUMO_GAP,
                    ZERO_POINT_ENERGY,
                    G_RRHO_WITHOUT_ZPVE,
                    G_RRHO_CONTRIB,
                    MACROCYCLE,
                    TETRAMER,
                    CONFORMATION,
                    BINDING,
                    RELATIVE_PATH_COLUMN,
                ]),
                encoding: EncodingKind::Statistical,
                output: OutputLocation::InsideRoot,
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Preset::Opt => write!(f, "opt"),
            Preset::Thermo => write!(f, "thermo"),
        }
    }
}

// Error logs and the optimisation trajectory are never result files
fn common_filter(suffix: &str) -> FileFilter {
    FileFilter::new(suffix)
        .exclude_substring(".err.log")
        .exclude_name("xtbopt.log")
        .exclude_name("traj.xtb.log")
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Where the summary CSV is written relative to the scanned folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLocation {
    /// `<base>/<name>.csv`, next to the extraction folder
    BesideRoot,
    /// `<base>/<folder>/<name>.csv`
    InsideRoot,
}

/// Everything that decides how one folder convention is scanned.
#[derive(Debug, Clone)]
pub struct ScanProfile {
    pub name: String,
    pub filter: FileFilter,
    pub fields: FieldSet,
    pub metadata: MetadataInferencer,
    /// Preferred column order; columns missing from the output are skipped.
    pub columns: Vec<String>,
    pub encoding: EncodingKind,
    pub output: OutputLocation,
}

impl ScanProfile {
    pub fn default_output_name(&self, folder: &str) -> String {
        match self.output {
            OutputLocation::BesideRoot => format!("xtb_summary_{}", folder),
            OutputLocation::InsideRoot => format!("xtb_{}_summary", self.name),
        }
    }

    pub fn output_path(&self, base: &Path, folder: &str, name: &str) -> PathBuf {
        let file = if name.ends_with(".csv") {
            name.to_string()
        } else {
            format!("{}.csv", name)
        };

        match self.output {
            OutputLocation::BesideRoot => base.join(file),
            OutputLocation::InsideRoot => base.join(folder).join(file),
        }
    }

    /// Make sure a column is written, after the preferred ones.
    pub fn ensure_column(&mut self, label: &str) {
        if !self.columns.iter().any(|c| c == label) {
            self.columns.push(label.to_string());
        }
    }
}
