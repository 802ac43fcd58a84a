//! Configuration surface consumed by the resolver and the emitter.
//!
//! Options come from three layers, lowest precedence first: the defaults,
//! an `inject.toml` file with an `[options]` table, and `key=value` processor
//! options (the form build tools pass to annotation processors).

use std::path::Path;

use serde::Deserialize;

/// Prefix for processor option keys, e.g. `inject.enableJavaxAnnotations`.
pub const OPTION_PREFIX: &str = "inject.";

/// Processing options for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Options {
    /// Recognize `javax.inject` qualifier, scope and inject annotations
    /// alongside the native ones.
    pub enable_javax_annotations: bool,
    /// Attach generated `create` functions to the component's companion
    /// object instead of its class reference.
    pub generate_companion_extensions: bool,
}

/// A parsed inject.toml file.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    options: Options,
}

impl Options {
    /// Read options from an inject.toml file.
    pub fn from_file(path: &Path) -> Result<Options, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        Self::from_toml(&content)
    }

    /// Parse options from inject.toml contents.
    pub fn from_toml(content: &str) -> Result<Options, String> {
        let config: ConfigFile =
            toml::from_str(content).map_err(|e| format!("Failed to parse config: {}", e))?;
        Ok(config.options)
    }

    /// Overlay processor options on top of `self`.
    ///
    /// Keys may be given with or without the `inject.` prefix. Unknown keys
    /// are ignored so that options meant for other processors pass through.
    pub fn with_processor_options<'a, I>(mut self, options: I) -> Options
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in options {
            let key = key.strip_prefix(OPTION_PREFIX).unwrap_or(key);
            match key {
                "enableJavaxAnnotations" => self.enable_javax_annotations = parse_flag(value),
                "generateCompanionExtensions" => {
                    self.generate_companion_extensions = parse_flag(value)
                }
                _ => {}
            }
        }
        self
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}
