pub mod preset;

use std::fs;
use std::path::{Path, PathBuf};
use serde::Deserialize;
use crate::aggregate::{FILE_COLUMN, RELATIVE_PATH_COLUMN};
use crate::decode::EncodingKind;
use crate::error::{Result, ScanError};
use crate::extract::FieldPattern;

pub use preset::{OutputLocation, Preset, ScanProfile};

/// Everything a run needs; built by the CLI, never read from the terminal by
/// the pipeline itself.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub root: PathBuf,
    pub output_path: PathBuf,
    pub profile: ScanProfile,
    pub show_progress: bool,
}

impl ScanConfig {
    pub fn new(root: impl Into<PathBuf>, output_path: impl Into<PathBuf>, profile: ScanProfile) -> Self {
        Self {
            root: root.into(),
            output_path: output_path.into(),
            profile,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Name of the scanned folder itself, used by rules that look at the root.
    pub fn root_name(&self) -> Option<String> {
        let name = |p: &Path| p.file_name().map(|n| n.to_string_lossy().into_owned());
        self.root
            .canonicalize()
            .ok()
            .and_then(|p| name(&p))
            .or_else(|| name(&self.root))
    }
}

/// Optional TOML file mirroring the command-line options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub preset: Option<Preset>,
    pub base: Option<PathBuf>,
    pub folder: Option<String>,
    pub output_name: Option<String>,
    pub encoding: Option<EncodingKind>,
    pub filter: FilterOverrides,
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterOverrides {
    pub suffix: Option<String>,
    pub exclude_substrings: Option<Vec<String>>,
    pub exclude_names: Option<Vec<String>>,
}

/// An extra field declared in the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
    pub label: String,
    pub pattern: String,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScanError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|source| ScanError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Layer the file's overrides on top of a preset profile.
    pub fn apply(&self, profile: &mut ScanProfile) -> Result<()> {
        if let Some(encoding) = self.encoding {
            profile.encoding = encoding;
        }

        if let Some(suffix) = &self.filter.suffix {
            if suffix.is_empty() {
                return Err(ScanError::Config("filter.suffix must not be empty".to_string()));
            }
            profile.filter.suffix = suffix.clone();
        }
        if let Some(substrings) = &self.filter.exclude_substrings {
            profile.filter.exclude_substrings = substrings.clone();
        }
        if let Some(names) = &self.filter.exclude_names {
            profile.filter.exclude_names = names.clone();
        }

        for spec in &self.fields {
            let reserved = [FILE_COLUMN, RELATIVE_PATH_COLUMN].contains(&spec.label.as_str())
                || profile.metadata.labels().any(|l| l == spec.label);
            if reserved {
                return Err(ScanError::Config(format!(
                    "field label '{}' is already used by a file or folder column",
                    spec.label
                )));
            }
            profile.fields.push(FieldPattern::new(spec.label.as_str(), &spec.pattern)?);
            profile.ensure_column(&spec.label);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
preset = "thermo"
base = "/data/runs"
folder = "AuMacroPr_d"
output_name = "thermo"
encoding = "null-sniff"

[filter]
suffix = ".xtb.log"
exclude_names = []

[[fields]]
label = "Dispersion (Eh)"
pattern = 'DISPERSION\s+(-?\d+\.\d+)\s+Eh'
"#;

    #[test]
    fn test_parse_full_file() {
        let file: ConfigFile = toml::from_str(SAMPLE).unwrap();

        assert_eq!(file.preset, Some(Preset::Thermo));
        assert_eq!(file.base, Some(PathBuf::from("/data/runs")));
        assert_eq!(file.folder.as_deref(), Some("AuMacroPr_d"));
        assert_eq!(file.encoding, Some(EncodingKind::NullSniff));
        assert_eq!(file.fields.len(), 1);
    }

    #[test]
    fn test_apply_overrides() {
        let file: ConfigFile = toml::from_str(SAMPLE).unwrap();
        let mut profile = Preset::Thermo.profile();

        file.apply(&mut profile).unwrap();

        assert_eq!(profile.encoding, EncodingKind::NullSniff);
        assert_eq!(profile.filter.suffix, ".xtb.log");
        assert!(profile.filter.exclude_names.is_empty());
        assert_eq!(profile.filter.exclude_substrings, vec![".err.log".to_string()]);
        assert_eq!(profile.fields.len(), 9);
        assert_eq!(profile.columns.last().map(String::as_str), Some("Dispersion (Eh)"));
    }

    #[test]
    fn test_bad_pattern_is_config_error() {
        let file: ConfigFile = toml::from_str(
            "[[fields]]\nlabel = \"Broken\"\npattern = 'NO GROUP'\n",
        ).unwrap();

        let err = file.apply(&mut Preset::Opt.profile()).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("Broken"));
    }

    #[test]
    fn test_field_labels_cannot_shadow_fixed_columns() {
        for (preset, label) in [
            (Preset::Opt, "File"),
            (Preset::Opt, "Relative Path"),
            (Preset::Opt, "Tetramer"),
            (Preset::Thermo, "Macrocycle"),
        ] {
            let file: ConfigFile = toml::from_str(&format!(
                "[[fields]]\nlabel = \"{}\"\npattern = 'FILE\\s+(\\d+\\.\\d+)'\n",
                label
            )).unwrap();

            let err = file.apply(&mut preset.profile()).unwrap_err();
            assert!(matches!(err, ScanError::Config(_)), "{} was accepted", label);
            assert!(err.to_string().contains(label));
        }
    }

    #[test]
    fn test_field_label_may_replace_builtin_field() {
        let file: ConfigFile = toml::from_str(
            "[[fields]]\nlabel = \"Total Energy (Eh)\"\npattern = 'E=\\s*(-?\\d+\\.\\d+)'\n",
        ).unwrap();
        let mut profile = Preset::Opt.profile();

        file.apply(&mut profile).unwrap();

        assert_eq!(profile.fields.len(), 3);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(toml::from_str::<ConfigFile>("colour = \"blue\"\n").is_err());
    }
}
