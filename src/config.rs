use std::collections::BTreeMap;
use std::path::Path;

use crate::error::Error;
use crate::external::SymbolLinkMappings;

/// File name looked up in the project root.
pub const CONFIG_FILE: &str = ".doclink.toml";

/// Project configuration loaded from `.doclink.toml`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Package → symbol path → URL table for the built-in external resolver.
    pub external_symbol_link_mappings: BTreeMap<String, BTreeMap<String, String>>,
    /// Report links that fail to resolve.
    pub invalid_link_warnings: bool,
    /// Keep the author's link text instead of replacing it with the target's name.
    pub preserve_link_text: bool,
}

/// Options consumed by the link integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkOptions {
    /// Keep the author's link text instead of replacing it with the target's name.
    pub preserve_link_text: bool,
    /// Log a warning for every unresolved link.
    pub warn_on_invalid_link: bool,
}

impl Default for LinkOptions {
    fn default() -> Self {
        return Self {
            preserve_link_text: true,
            warn_on_invalid_link: true,
        };
    }
}

/// Raw TOML structure for `.doclink.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct DoclinkTomlConfig {
    /// Package → symbol path → URL.
    #[serde(default)]
    external_symbol_link_mappings: BTreeMap<String, BTreeMap<String, String>>,
    /// Keep author link text.
    #[serde(default = "default_true")]
    preserve_link_text: bool,
    /// `[validation]` table.
    #[serde(default)]
    validation: ValidationToml,
}

/// Raw `[validation]` table.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ValidationToml {
    /// Warn about unresolved links.
    #[serde(default = "default_true")]
    invalid_link: bool,
}

impl Default for ValidationToml {
    fn default() -> Self {
        return Self { invalid_link: true };
    }
}

/// Serde default for flags that are on unless disabled.
const fn default_true() -> bool {
    return true;
}

impl Default for Config {
    fn default() -> Self {
        return Self {
            external_symbol_link_mappings: BTreeMap::new(),
            invalid_link_warnings: true,
            preserve_link_text: true,
        };
    }
}

impl Config {
    /// Load config from `.doclink.toml` in the given root directory.
    /// Returns the defaults if the file doesn't exist.
    /// Returns an error if the file exists but is malformed — never silently
    /// falls back to defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(Error::Io(e)),
        };
        return Self::parse(&content);
    }

    /// Load config from an explicit file path, which must exist.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigNotFound` if the file doesn't exist,
    /// `Error::Io` for other read failures, or `Error::TomlDe` if malformed.
    pub fn load_file(path: &Path) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound { path: path.to_path_buf() });
            },
            Err(e) => return Err(Error::Io(e)),
        };
        return Self::parse(&content);
    }

    /// Parse config from TOML content.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed or has unknown keys.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: DoclinkTomlConfig = toml::from_str(content)?;
        return Ok(Self {
            external_symbol_link_mappings: raw.external_symbol_link_mappings,
            invalid_link_warnings: raw.validation.invalid_link,
            preserve_link_text: raw.preserve_link_text,
        });
    }

    /// Integrator options derived from this config.
    pub const fn link_options(&self) -> LinkOptions {
        return LinkOptions {
            preserve_link_text: self.preserve_link_text,
            warn_on_invalid_link: self.invalid_link_warnings,
        };
    }

    /// The built-in external resolver configured by this file.
    pub fn symbol_link_mappings(&self) -> SymbolLinkMappings {
        return SymbolLinkMappings::new(self.external_symbol_link_mappings.clone());
    }
}
