//! Project configuration from `tsconfig.json`
//!
//! The tsconfig is read, never written. It decides two things:
//! 1. Which files under the target directory belong to the project
//!    (`files`, `include`, `exclude`, `compilerOptions.allowJs`)
//! 2. How they are parsed (`compilerOptions.jsx`, `experimentalDecorators`)
//!
//! tsconfig files are JSON with comments and trailing commas, so both are
//! stripped before handing the text to `serde_json`. `extends` is not followed.

use crate::error::RunError;
use crate::parser::ParseOptions;
use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config file name, resolved against the working directory
pub const DEFAULT_CONFIG_FILE: &str = "tsconfig.json";

/// Include pattern used when neither `include` nor `files` is given
const DEFAULT_INCLUDE: &[&str] = &["**/*"];

/// Exclude patterns used when `exclude` is not given (plus `outDir`)
const DEFAULT_EXCLUDES: &[&str] = &[
    "node_modules/**",
    "**/node_modules/**",
    "bower_components",
    "jspm_packages",
];

/// The subset of `tsconfig.json` this tool reads; other keys are ignored
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsConfig {
    #[serde(default)]
    pub files: Option<Vec<String>>,

    #[serde(default)]
    pub include: Option<Vec<String>>,

    #[serde(default)]
    pub exclude: Option<Vec<String>>,

    #[serde(default)]
    pub compiler_options: CompilerOptions,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    #[serde(default)]
    pub allow_js: Option<bool>,

    /// Any value (`preserve`, `react-jsx`, ...) turns JSX on for `.js` files
    #[serde(default)]
    pub jsx: Option<String>,

    #[serde(default)]
    pub experimental_decorators: Option<bool>,

    #[serde(default)]
    pub out_dir: Option<String>,
}

/// Project membership and parse settings, with compiled globs
#[derive(Debug)]
pub struct ResolvedProject {
    /// Directory containing the tsconfig; patterns are relative to it
    pub root: PathBuf,
    /// Path the config was loaded from
    pub config_path: PathBuf,
    pub allow_js: bool,
    pub parse_options: ParseOptions,
    /// Explicit `files` entries, normalized relative to `root`
    files: Vec<String>,
    include: GlobSet,
    exclude: GlobSet,
}

impl TsConfig {
    /// Parse tsconfig text (JSON with comments)
    pub fn from_jsonc(content: &str) -> Result<Self> {
        let json = strip_trailing_commas(&strip_comments(content));
        serde_json::from_str(&json).context("invalid tsconfig JSON")
    }

    /// Compile patterns into a project rooted at `root`
    pub fn resolve(&self, root: &Path, config_path: &Path) -> Result<ResolvedProject> {
        let files: Vec<String> = self
            .files
            .iter()
            .flatten()
            .map(|f| normalize_pattern(f))
            .collect();

        let include_patterns: Vec<String> = match (&self.include, &self.files) {
            (Some(include), _) => include.clone(),
            (None, Some(_)) => Vec::new(),
            (None, None) => DEFAULT_INCLUDE.iter().map(|p| p.to_string()).collect(),
        };

        let exclude_patterns: Vec<String> = match &self.exclude {
            Some(exclude) => exclude.clone(),
            None => {
                let mut defaults: Vec<String> =
                    DEFAULT_EXCLUDES.iter().map(|p| p.to_string()).collect();
                if let Some(out_dir) = &self.compiler_options.out_dir {
                    defaults.push(out_dir.clone());
                }
                defaults
            }
        };

        let include = compile_patterns(&include_patterns)
            .with_context(|| format!("invalid include pattern in {}", config_path.display()))?;
        let exclude = compile_patterns(&exclude_patterns)
            .with_context(|| format!("invalid exclude pattern in {}", config_path.display()))?;

        let allow_js = self.compiler_options.allow_js.unwrap_or(false);

        Ok(ResolvedProject {
            root: root.to_path_buf(),
            config_path: config_path.to_path_buf(),
            allow_js,
            parse_options: ParseOptions {
                decorators: self.compiler_options.experimental_decorators.unwrap_or(false),
                jsx_in_js: allow_js && self.compiler_options.jsx.is_some(),
            },
            files,
            include,
            exclude,
        })
    }
}

impl ResolvedProject {
    /// Check whether a path belongs to the project
    ///
    /// `path` must be absolute in the same form as `root` (both canonical).
    /// Files outside the root are never members.
    pub fn contains(&self, path: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(&self.root) else {
            return false;
        };
        let relative = relative.to_string_lossy().replace('\\', "/");

        if self.files.iter().any(|f| *f == relative) {
            return true;
        }

        self.include.is_match(&relative) && !self.exclude.is_match(&relative)
    }
}

/// Load and resolve the tsconfig at `config_path`
///
/// A missing file is [`RunError::ProjectConfigNotFound`].
pub fn load_project(config_path: &Path) -> Result<ResolvedProject> {
    if !config_path.is_file() {
        return Err(RunError::ProjectConfigNotFound(config_path.to_path_buf()).into());
    }

    let config_path = config_path
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", config_path.display()))?;

    let content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("failed to read config file: {}", config_path.display()))?;

    let config = TsConfig::from_jsonc(&content)
        .with_context(|| format!("failed to parse config file: {}", config_path.display()))?;

    let root = config_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("config file has no parent directory"))?;

    log::debug!("Loaded project configuration from {}", config_path.display());

    config.resolve(root, &config_path)
}

/// `./src/` -> `src`
fn normalize_pattern(pattern: &str) -> String {
    let pattern = pattern.replace('\\', "/");
    let pattern = pattern.strip_prefix("./").unwrap_or(&pattern);
    pattern.trim_end_matches('/').to_string()
}

/// Compile tsconfig patterns
///
/// A pattern without wildcards names a file or a directory, so it also
/// matches everything below it.
fn compile_patterns(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for raw in patterns {
        let pattern = normalize_pattern(raw);
        let has_wildcard = pattern.contains(['*', '?']);
        let mut add = |p: &str| -> Result<()> {
            let glob = GlobBuilder::new(p)
                .literal_separator(true)
                .build()
                .with_context(|| format!("invalid pattern: {}", raw))?;
            builder.add(glob);
            Ok(())
        };
        add(&pattern)?;
        if !has_wildcard {
            add(&format!("{}/**", pattern))?;
        }
    }
    Ok(builder.build()?)
}

/// Remove `//` and `/* */` comments outside string literals
fn strip_comments(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars().peekable();
    let mut in_string = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (c, chars.peek()) {
            ('"', _) => {
                in_string = true;
                out.push(c);
            }
            ('/', Some('/')) => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        out.push('\n');
                        break;
                    }
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for skipped in chars.by_ref() {
                    if prev == '*' && skipped == '/' {
                        break;
                    }
                    prev = skipped;
                }
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    out
}

/// Remove commas that directly precede `}` or `]` (ignoring whitespace)
fn strip_trailing_commas(src: &str) -> String {
    let chars: Vec<char> = src.chars().collect();
    let mut out = String::with_capacity(src.len());
    let mut in_string = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' {
                if let Some(&escaped) = chars.get(i + 1) {
                    out.push(escaped);
                    i += 1;
                }
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
            out.push(c);
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if !matches!(next, Some('}') | Some(']')) {
                out.push(c);
            }
        } else {
            out.push(c);
        }
        i += 1;
    }

    out
}
