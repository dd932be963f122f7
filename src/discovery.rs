//! Finding hook scripts and settings files on disk.

use crate::error::{Error, Result};
use crate::hooks::HookDescriptor;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde_json::Value;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Extensions treated as hook scripts.
pub const HOOK_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "ts", "tsx", "py", "sh", "bash", "zsh"];

/// File names treated as settings documents.
pub const SETTINGS_FILE_NAMES: &[&str] = &["settings.json", "settings.local.json"];

/// A parsed settings document.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    pub path: PathBuf,
    /// Display label, relative to the scanned root when possible.
    pub label: String,
    pub tree: Value,
}

impl SettingsFile {
    pub fn load(path: &Path, label: impl Into<String>) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tree = serde_json::from_str(&content).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            label: label.into(),
            tree,
        })
    }
}

/// Everything found under a scan target.
#[derive(Debug, Default)]
pub struct Discovered {
    pub hooks: Vec<HookDescriptor>,
    pub settings: Vec<SettingsFile>,
}

impl Discovered {
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty() && self.settings.is_empty()
    }
}

/// Walks a path for hooks, skipping ignored paths.
pub struct Discovery {
    ignore: GlobSet,
}

impl Discovery {
    pub fn new(ignore_patterns: &[String]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in ignore_patterns {
            let glob = Glob::new(pattern).map_err(|source| Error::Glob {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let ignore = builder.build().map_err(|source| Error::Glob {
            pattern: ignore_patterns.join(", "),
            source,
        })?;
        Ok(Self { ignore })
    }

    /// Discover hooks at `path`.
    ///
    /// A file is taken as-is (settings documents by name or `.json` extension,
    /// anything else as a hook script). Errors reading an explicitly named file
    /// are returned; unreadable files found while walking are logged and skipped.
    pub fn discover(&self, path: &Path) -> Result<Discovered> {
        let mut found = Discovered::default();

        if path.is_file() {
            let label = file_label(path);
            if is_settings_file(path) || has_extension(path, "json") {
                found.settings.push(SettingsFile::load(path, label)?);
            } else {
                found.hooks.push(HookDescriptor::from_file(path)?);
            }
            return Ok(found);
        }

        if !path.exists() {
            return Err(Error::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "path does not exist"),
            });
        }

        for entry in WalkDir::new(path)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let file = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = file.strip_prefix(path).unwrap_or(file);
            if self.ignore.is_match(relative) {
                tracing::trace!("Ignoring {}", relative.display());
                continue;
            }

            if is_settings_file(file) {
                match SettingsFile::load(file, relative.display().to_string()) {
                    Ok(settings) => found.settings.push(settings),
                    Err(e) => tracing::warn!("Skipping {}", e),
                }
            } else if is_hook_file(file) {
                match HookDescriptor::from_file(file) {
                    Ok(hook) => found.hooks.push(hook),
                    Err(e) => tracing::warn!("Skipping {}", e),
                }
            }
        }

        tracing::debug!(
            "Discovered {} hook file(s) and {} settings file(s) in {}",
            found.hooks.len(),
            found.settings.len(),
            path.display()
        );

        Ok(found)
    }
}

impl Default for Discovery {
    fn default() -> Self {
        Self {
            ignore: GlobSet::empty(),
        }
    }
}

pub fn is_hook_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| HOOK_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

pub fn is_settings_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| SETTINGS_FILE_NAMES.contains(&name))
        .unwrap_or(false)
}

fn has_extension(path: &Path, wanted: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(wanted))
        .unwrap_or(false)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}
