use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::editor::EditorConfig;
use crate::indent::{DEFAULT_INDENT_WIDTH, MAX_INDENT_WIDTH};

/// Default base URL of the analysis service.
pub const DEFAULT_ANALYSIS_URL: &str = "http://localhost:8000";

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMode {
    Auto,
    Light,
    Dark,
}

/// Settings that can come from the command line or an rc file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub read_only: bool,
    pub indent_width: Option<usize>,
    pub placeholder: Option<String>,
    pub theme: Option<ThemeMode>,
    pub analysis_url: Option<String>,
    pub debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    /// Merge `other` over `self`: switches are OR-ed, options from `other`
    /// win when set.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            read_only: self.read_only || other.read_only,
            indent_width: other.indent_width.or(self.indent_width),
            placeholder: other
                .placeholder
                .clone()
                .or_else(|| self.placeholder.clone()),
            theme: other.theme.or(self.theme),
            analysis_url: other
                .analysis_url
                .clone()
                .or_else(|| self.analysis_url.clone()),
            debug_log: other.debug_log.clone().or_else(|| self.debug_log.clone()),
        }
    }

    pub fn editor_config(&self) -> EditorConfig {
        let defaults = EditorConfig::default();
        EditorConfig {
            indent_width: self.indent_width.unwrap_or(DEFAULT_INDENT_WIDTH),
            read_only: self.read_only,
            placeholder: self.placeholder.clone().unwrap_or(defaults.placeholder),
        }
    }

    pub fn analysis_url(&self) -> &str {
        self.analysis_url.as_deref().unwrap_or(DEFAULT_ANALYSIS_URL)
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("pseudopad").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("pseudopad")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("pseudopad").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("pseudopad")
                .join("config");
        }
    }

    local_override_path()
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".pseudopadrc")
}

/// Read flags from an rc file. A missing file yields the defaults.
///
/// One flag per line; `#` starts a comment line. `--placeholder` takes
/// the rest of its line verbatim so the text may contain spaces.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let mut tokens = Vec::new();
    for line in content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
    {
        if let Some(rest) = line.strip_prefix("--placeholder")
            && (rest.starts_with(' ') || rest.starts_with('='))
        {
            tokens.push("--placeholder".to_string());
            tokens.push(rest[1..].trim_start().to_string());
        } else {
            tokens.extend(line.split_whitespace().map(ToOwned::to_owned));
        }
    }
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = vec!["# pseudopad defaults (saved with --save)".to_string()];
    if flags.read_only {
        lines.push("--read-only".to_string());
    }
    if let Some(width) = flags.indent_width {
        lines.push(format!("--indent-width {width}"));
    }
    if let Some(placeholder) = &flags.placeholder {
        lines.push(format!("--placeholder {placeholder}"));
    }
    if let Some(theme) = flags.theme {
        let theme_str = match theme {
            ThemeMode::Auto => "auto",
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        };
        lines.push(format!("--theme {theme_str}"));
    }
    if let Some(url) = &flags.analysis_url {
        lines.push(format!("--analysis-url {url}"));
    }
    if let Some(path) = &flags.debug_log {
        lines.push(format!("--debug-log {}", path.display()));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the known flags out of a token list. Unknown tokens, including the
/// program name and file path, are skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (token, None),
        };
        let takes_value = matches!(
            name,
            "--indent-width" | "--placeholder" | "--theme" | "--analysis-url" | "--debug-log"
        );
        let value = if takes_value && inline.is_none() {
            let next = tokens.get(i + 1).map(String::as_str);
            if next.is_some() {
                i += 1;
            }
            next
        } else {
            inline
        };

        match (name, value) {
            ("--read-only", _) => flags.read_only = true,
            ("--indent-width", Some(v)) => {
                flags.indent_width = v
                    .parse::<usize>()
                    .ok()
                    .filter(|w| (1..=MAX_INDENT_WIDTH).contains(w));
            }
            ("--placeholder", Some(v)) => flags.placeholder = Some(v.to_string()),
            ("--theme", Some(v)) => flags.theme = parse_theme(v),
            ("--analysis-url", Some(v)) => flags.analysis_url = Some(v.to_string()),
            ("--debug-log", Some(v)) => flags.debug_log = Some(PathBuf::from(v)),
            _ => {}
        }
        i += 1;
    }
    flags
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s {
        "auto" => Some(ThemeMode::Auto),
        "light" => Some(ThemeMode::Light),
        "dark" => Some(ThemeMode::Dark),
        _ => None,
    }
}
