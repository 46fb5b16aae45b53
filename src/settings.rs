//! Layered settings for hosts and the command-line tool
//!
//! `defaults/docx-fill.default.toml` is embedded, so every key always has a
//! value. User files and single-key overrides are layered on top through
//! [`Loader`] before deserializing into [`Settings`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

use crate::options::{Delimiters, Options, SiblingPolicy, Vocabulary};

const DEFAULT_TOML: &str = include_str!("../defaults/docx-fill.default.toml");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub delimiters: Delimiters,
    pub vocabulary: Vocabulary,
    pub parser: ParserSettings,
    pub walker: WalkerSettings,
    pub resolver: ResolverSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParserSettings {
    pub lookahead: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WalkerSettings {
    pub sibling_policy: SiblingPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResolverSettings {
    pub cache_capacity: usize,
}

impl Settings {
    pub fn to_options(&self) -> Options {
        Options::new()
            .with_delimiters(self.delimiters.clone())
            .with_vocabulary(self.vocabulary.clone())
            .with_sibling_policy(self.walker.sibling_policy)
            .with_lookahead(self.parser.lookahead)
    }
}

/// Builder layering files and overrides over the embedded defaults
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a TOML file that must exist
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a TOML file, ignored when absent
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply one dotted-key override, e.g. `walker.sibling_policy`
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<Settings, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<Settings, ConfigError> {
    Loader::new().build()
}
