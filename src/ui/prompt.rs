use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Input};

/// Terminal prompts for the values the command line did not provide.
pub struct Prompter {
    theme: ColorfulTheme,
    enabled: bool,
}

impl Prompter {
    pub fn new(enabled: bool) -> Self {
        Self {
            theme: ColorfulTheme::default(),
            enabled,
        }
    }

    /// Ask for a value, or fail when prompting is disabled.
    pub fn ask(&self, prompt: &str, flag: &str, default: Option<String>, allow_empty: bool) -> Result<String> {
        if !self.enabled {
            anyhow::bail!("Missing value for {} (prompting disabled by --no-input)", flag);
        }

        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(allow_empty);

        if let Some(default) = default {
            input = input.default(default);
        }

        let value = input.interact_text()
            .with_context(|| format!("Failed to read {}", flag))?;

        Ok(value.trim().to_string())
    }
}
