//! Pseudopad - A terminal editor for algorithm pseudocode.
//!
//! # Usage
//!
//! ```bash
//! pseudopad insertion-sort.txt
//! pseudopad --indent-width 2 --read-only lecture.txt
//! pseudopad --format draft.txt > clean.txt
//! ```

use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use clap::builder::RangedU64ValueParser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};

use pseudopad::app::App;
use pseudopad::config::{
    clear_config_flags, global_config_path, load_config_flags, local_override_path,
    parse_flag_tokens, save_config_flags, ConfigFlags, ThemeMode,
};
use pseudopad::format::format_pseudocode;
use pseudopad::highlight::{set_background_mode, to_markup, HighlightBackground};
use pseudopad::indent::{IndentUnit, MAX_INDENT_WIDTH};
use pseudopad::logging;

/// A terminal editor for textbook-style pseudocode
#[derive(Parser, Debug)]
#[command(name = "pseudopad", version, about, long_about = None)]
struct Cli {
    /// Pseudocode file to edit (created on first save if missing)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Spaces per indentation level (1-16)
    #[arg(
        long,
        value_name = "N",
        value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_INDENT_WIDTH as u64)
    )]
    indent_width: Option<usize>,

    /// Open the buffer without allowing edits
    #[arg(long)]
    read_only: bool,

    /// Text shown while the buffer is empty
    #[arg(long, value_name = "TEXT")]
    placeholder: Option<String>,

    /// Force highlight palette background (light or dark)
    #[arg(long, value_enum, default_value = "auto")]
    theme: ThemeMode,

    /// Base URL of the analysis service
    #[arg(long, value_name = "URL")]
    analysis_url: Option<String>,

    /// Write debug events to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,

    /// Print the highlighted markup for FILE (or stdin) and exit
    #[arg(long, conflicts_with = "format")]
    markup: bool,

    /// Print FILE (or stdin) with normalized indentation and exit
    #[arg(long)]
    format: bool,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

// Query the terminal background using OSC 11.
// We talk to /dev/tty so the terminal responds even when stdout is piped.
// On non-Unix platforms we skip the query entirely because the fallback
// (stdin/stdout) leaves an orphaned reader thread that blocks the console
// input buffer, preventing crossterm from receiving any keyboard events.
#[cfg(not(unix))]
fn query_terminal_background() -> std::io::Result<Option<(u8, u8, u8)>> {
    Ok(None)
}

#[cfg(unix)]
fn query_terminal_background() -> std::io::Result<Option<(u8, u8, u8)>> {
    use std::io::Write;
    use std::sync::mpsc;

    let (tx, rx) = mpsc::channel();

    let mut io = std::fs::OpenOptions::new()
        .read(true)
        .write(true)
        .open("/dev/tty")?;
    let reader = io.try_clone()?;

    // OSC 11 query: ESC ] 11 ; ? BEL
    io.write_all(b"\x1b]11;?\x07")?;
    io.flush()?;

    std::thread::spawn(move || {
        let mut reader = reader;
        let mut buf = [0u8; 256];
        let mut collected: Vec<u8> = Vec::new();
        loop {
            match reader.read(&mut buf) {
                Ok(0) => continue,
                Ok(n) => {
                    collected.extend_from_slice(&buf[..n]);
                    if collected.contains(&b'\x07') || collected.windows(2).any(|w| w == b"\x1b\\")
                    {
                        let _ = tx.send(collected);
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });

    let collected = rx
        .recv_timeout(Duration::from_millis(75))
        .unwrap_or_default();
    let text = String::from_utf8_lossy(&collected);
    Ok(parse_osc11_reply(&text))
}

fn theme_from_rgb(r: u8, g: u8, b: u8) -> HighlightBackground {
    let luma = 0.0722f32.mul_add(
        f32::from(b),
        0.2126f32.mul_add(f32::from(r), 0.7152 * f32::from(g)),
    );
    if luma >= 140.0 {
        HighlightBackground::Light
    } else {
        HighlightBackground::Dark
    }
}

fn detect_theme() -> Option<HighlightBackground> {
    let _raw = enable_raw_mode();
    let result = query_terminal_background();
    let _ = disable_raw_mode();
    result.ok().flatten().map(|(r, g, b)| theme_from_rgb(r, g, b))
}

fn parse_osc11_reply(reply: &str) -> Option<(u8, u8, u8)> {
    // Expect: ESC ] 11 ; rgb:RRRR/GGGG/BBBB BEL or ST
    let start = reply.find("rgb:")?;
    let data = &reply[start + 4..];
    let mut parts = data.split(['/', '\x07', '\x1b']);
    let r = parts.next()?;
    let g = parts.next()?;
    let b = parts.next()?;
    Some((
        parse_osc_component(r)?,
        parse_osc_component(g)?,
        parse_osc_component(b)?,
    ))
}

fn parse_osc_component(s: &str) -> Option<u8> {
    let hex = s.trim();
    if hex.len() >= 4 {
        let v = u16::from_str_radix(hex.get(..4)?, 16).ok()?;
        u8::try_from(v >> 8).ok()
    } else if hex.len() == 2 {
        u8::from_str_radix(hex, 16).ok()
    } else {
        None
    }
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    let interactive = !(cli.markup || cli.format);
    logging::init(effective.debug_log.as_deref(), interactive)?;
    tracing::debug!(?effective, "config.loaded");

    if cli.markup || cli.format {
        let text = read_input(cli.file.as_deref())?;
        if cli.markup {
            print!("{}", to_markup(&text));
        } else {
            let unit = IndentUnit::new(effective.editor_config().indent_width);
            print!("{}", format_pseudocode(&text, &unit));
        }
        return Ok(());
    }

    match effective.theme.unwrap_or(ThemeMode::Auto) {
        ThemeMode::Auto => set_background_mode(detect_theme()),
        ThemeMode::Light => set_background_mode(Some(HighlightBackground::Light)),
        ThemeMode::Dark => set_background_mode(Some(HighlightBackground::Dark)),
    }

    let mut app = App::new(cli.file)
        .with_editor_config(effective.editor_config())
        .with_analysis_url(effective.analysis_url())
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    app.run().context("Application error")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_osc11_reply_with_bel() {
        let reply = "\x1b]11;rgb:ffff/ffff/ffff\x07";
        assert_eq!(parse_osc11_reply(reply), Some((255, 255, 255)));
    }

    #[test]
    fn test_parse_osc11_reply_with_short_components() {
        let reply = "\x1b]11;rgb:1e/1e/2e\x1b\\";
        assert_eq!(parse_osc11_reply(reply), Some((0x1e, 0x1e, 0x2e)));
    }

    #[test]
    fn test_parse_osc11_reply_without_rgb() {
        assert_eq!(parse_osc11_reply(""), None);
    }

    #[test]
    fn test_theme_from_rgb() {
        assert_eq!(theme_from_rgb(255, 255, 255), HighlightBackground::Light);
        assert_eq!(theme_from_rgb(30, 30, 46), HighlightBackground::Dark);
    }

    #[test]
    fn test_cli_accepts_optional_file() {
        let cli = Cli::try_parse_from(["pseudopad"]).unwrap();
        assert!(cli.file.is_none());
        let cli = Cli::try_parse_from(["pseudopad", "--indent-width", "2", "sort.txt"]).unwrap();
        assert_eq!(cli.indent_width, Some(2));
        assert_eq!(cli.file, Some(PathBuf::from("sort.txt")));
    }

    #[test]
    fn test_cli_rejects_out_of_range_indent_width() {
        assert!(Cli::try_parse_from(["pseudopad", "--indent-width", "100000"]).is_err());
        assert!(Cli::try_parse_from(["pseudopad", "--indent-width", "0"]).is_err());
    }

    #[test]
    fn test_cli_rejects_markup_with_format() {
        assert!(Cli::try_parse_from(["pseudopad", "--markup", "--format"]).is_err());
    }
}
