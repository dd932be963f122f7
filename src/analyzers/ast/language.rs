//! Source language resolution for the syntax analyzer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Languages a hook may be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    TypeScript,
    Tsx,
    Python,
    Shell,
}

impl Language {
    /// Map a file extension (without the dot) to a language.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "js" | "mjs" | "cjs" | "jsx" => Some(Language::JavaScript),
            "ts" | "mts" | "cts" => Some(Language::TypeScript),
            "tsx" => Some(Language::Tsx),
            "py" | "pyw" => Some(Language::Python),
            "sh" | "bash" | "zsh" => Some(Language::Shell),
            _ => None,
        }
    }

    /// Map a file name or path to a language using its extension.
    pub fn from_filename(name: &str) -> Option<Self> {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Detect the interpreter named on a `#!` line.
    pub fn from_shebang(source: &str) -> Option<Self> {
        let first = source.lines().next()?;
        let interpreter = first.strip_prefix("#!")?;
        if interpreter.contains("python") {
            Some(Language::Python)
        } else if interpreter.contains("ts-node") || interpreter.contains("tsx") {
            Some(Language::TypeScript)
        } else if interpreter.contains("node") || interpreter.contains("deno") || interpreter.contains("bun") {
            Some(Language::JavaScript)
        } else if interpreter.contains("sh") {
            Some(Language::Shell)
        } else {
            None
        }
    }

    /// Resolve the language of a hook.
    ///
    /// Explicit language first, then the filename extension, then the shebang,
    /// then the fallback.
    pub fn resolve(
        explicit: Option<Language>,
        filename: Option<&str>,
        source: &str,
        fallback: Option<Language>,
    ) -> Option<Self> {
        explicit
            .or_else(|| filename.and_then(Self::from_filename))
            .or_else(|| Self::from_shebang(source))
            .or(fallback)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Tsx => "tsx",
            Language::Python => "python",
            Language::Shell => "shell",
        }
    }

    /// Whether the language uses the JavaScript family of node kinds.
    pub fn is_javascript_family(&self) -> bool {
        matches!(self, Language::JavaScript | Language::TypeScript | Language::Tsx)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "javascript" | "js" | "node" => Ok(Language::JavaScript),
            "typescript" | "ts" => Ok(Language::TypeScript),
            "tsx" => Ok(Language::Tsx),
            "python" | "py" => Ok(Language::Python),
            "shell" | "sh" | "bash" | "zsh" => Ok(Language::Shell),
            _ => Err(format!("Unknown language: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_filename() {
        assert_eq!(Language::from_filename("hooks/pre-tool.mjs"), Some(Language::JavaScript));
        assert_eq!(Language::from_filename("guard.TS"), Some(Language::TypeScript));
        assert_eq!(Language::from_filename("check.py"), Some(Language::Python));
        assert_eq!(Language::from_filename("run.sh"), Some(Language::Shell));
        assert_eq!(Language::from_filename("README"), None);
    }

    #[test]
    fn test_from_shebang() {
        assert_eq!(Language::from_shebang("#!/usr/bin/env python3\nprint(1)"), Some(Language::Python));
        assert_eq!(Language::from_shebang("#!/usr/bin/env node\n"), Some(Language::JavaScript));
        assert_eq!(Language::from_shebang("#!/bin/bash\n"), Some(Language::Shell));
        assert_eq!(Language::from_shebang("console.log(1)"), None);
    }

    #[test]
    fn test_resolution_order() {
        let src = "#!/usr/bin/env python3\n";
        assert_eq!(
            Language::resolve(Some(Language::Tsx), Some("a.py"), src, None),
            Some(Language::Tsx)
        );
        assert_eq!(
            Language::resolve(None, Some("a.js"), src, None),
            Some(Language::JavaScript)
        );
        assert_eq!(Language::resolve(None, None, src, None), Some(Language::Python));
        assert_eq!(
            Language::resolve(None, None, "x()", Some(Language::JavaScript)),
            Some(Language::JavaScript)
        );
        assert_eq!(Language::resolve(None, None, "x()", None), None);
    }
}
