//! Configuration file support.
//!
//! Loaded from `--config <file>` or `<config dir>/hookguard/config.toml`.

use crate::analyzers::ast::{AstAnalyzerConfig, Language};
use crate::error::{Error, Result};
use crate::scanner::ScanConfig;
use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Smallest accepted per-snippet parse budget.
pub const MIN_PARSE_TIMEOUT_MS: u64 = 1;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scanner: ScannerSection,
    /// Category weight overrides, keyed by category name.
    pub weights: BTreeMap<String, u32>,
    pub discovery: DiscoverySection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerSection {
    pub enable_syntax: bool,
    pub default_language: Option<String>,
    pub parse_timeout_ms: u64,
    pub max_syntax_bytes: usize,
}

impl Default for ScannerSection {
    fn default() -> Self {
        let ast = AstAnalyzerConfig::default();
        Self {
            enable_syntax: true,
            default_language: ast.default_language.map(|l| l.to_string()),
            parse_timeout_ms: ast.parse_timeout_micros / 1000,
            max_syntax_bytes: ast.max_file_size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    /// Glob patterns (relative to the scanned directory) to skip.
    pub ignore: Vec<String>,
}

impl Default for DiscoverySection {
    fn default() -> Self {
        Self {
            ignore: vec!["**/node_modules/**".to_string(), "**/.git/**".to_string()],
        }
    }
}

impl Config {
    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        // Surface bad category or language names at load time
        config.to_scan_config()?;
        Ok(config)
    }

    /// Load the default config file, falling back to built-in defaults.
    pub fn load_default() -> Self {
        let Some(path) = default_config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::load(&path) {
            Ok(config) => {
                tracing::debug!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Parsed weight overrides.
    pub fn weight_overrides(&self) -> Result<HashMap<Category, u32>> {
        self.weights
            .iter()
            .map(|(name, weight)| {
                name.parse::<Category>()
                    .map(|category| (category, *weight))
                    .map_err(|_| Error::UnknownCategory(name.clone()))
            })
            .collect()
    }

    /// Build the scanner configuration.
    pub fn to_scan_config(&self) -> Result<ScanConfig> {
        let default_language = self
            .scanner
            .default_language
            .as_deref()
            .map(|name| {
                name.parse::<Language>()
                    .map_err(|_| Error::UnknownLanguage(name.to_string()))
            })
            .transpose()?;

        // tree-sitter reads a zero timeout as "no limit"
        let parse_timeout_ms = if self.scanner.parse_timeout_ms < MIN_PARSE_TIMEOUT_MS {
            tracing::warn!(
                "parse_timeout_ms = {} is below the minimum, using {}",
                self.scanner.parse_timeout_ms,
                MIN_PARSE_TIMEOUT_MS
            );
            MIN_PARSE_TIMEOUT_MS
        } else {
            self.scanner.parse_timeout_ms
        };

        let ast_config = AstAnalyzerConfig {
            parse_timeout_micros: parse_timeout_ms.saturating_mul(1000),
            max_file_size: self.scanner.max_syntax_bytes,
            default_language,
            ..AstAnalyzerConfig::default()
        };

        Ok(ScanConfig {
            enable_syntax: self.scanner.enable_syntax,
            ast_config,
            weight_overrides: self.weight_overrides()?,
        })
    }
}

/// `<config dir>/hookguard/config.toml`, if a config dir exists.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hookguard").join("config.toml"))
}

/// Contents written by `hookguard init`.
pub fn generate_default_config() -> String {
    r#"# hookguard configuration

[scanner]
# Run syntax-aware detectors in addition to pattern matching
enable_syntax = true
# Language assumed for inline snippets without a hint
default_language = "javascript"
# Time budget for parsing one hook
parse_timeout_ms = 250
# Larger hooks are scanned with patterns only
max_syntax_bytes = 1048576

[weights]
# Points added when a category is detected (0-100)
# "destructive-file-op" = 20
# "file-write" = 20
# "system-modification" = 20
# "network-call" = 15
# "process-execution" = 25
# "dangerous-import" = 10
# "credential-access" = 30
# "environment-access" = 5
# "database-access" = 10
# "crypto-use" = 5

[discovery]
# Paths skipped when scanning a directory
ignore = ["**/node_modules/**", "**/.git/**"]
"#
    .to_string()
}
