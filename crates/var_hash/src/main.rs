//! `var-hash`: append a hash suffix to the custom properties of a stylesheet.
//!
//! Reads CSS from a file or stdin and writes the renamed stylesheet to a file or stdout.
//! Options come from an optional JSON config file, with command line flags taking precedence.

use std::fs;
use std::io::{self, Read as _, Write as _};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Parser;
use css_orchestrator::{Options, hash_css};
use log::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "var-hash", version, about)]
struct Cli {
    /// Stylesheet to read. Reads stdin when omitted or `-`.
    input: Option<PathBuf>,

    /// Where to write the result. Writes stdout when omitted or `-`.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON options file (`hash`, `staticHash`, `delimiter`, `maxLength`, `ignorePrefixes`,
    /// `includePrefixes`).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Hash appended to every custom property name. Nothing is renamed without one.
    #[arg(long)]
    hash: Option<String>,

    /// Separator between the name and the hash.
    #[arg(long)]
    delimiter: Option<String>,

    /// Maximum number of hash characters kept. 0 removes a cap set in the config file.
    #[arg(long)]
    max_length: Option<usize>,

    /// Leave names starting with this prefix (without `--`) alone. Repeatable.
    #[arg(long = "ignore-prefix", value_name = "PREFIX")]
    ignore_prefixes: Vec<String>,

    /// Only rename names starting with this prefix (without `--`). Repeatable.
    #[arg(long = "include-prefix", value_name = "PREFIX")]
    include_prefixes: Vec<String>,
}

impl Cli {
    /// Options from the config file, overridden by flags.
    fn options(&self) -> Result<Options> {
        let base = match &self.config {
            Some(path) => Options::load(path)?,
            None => Options::default(),
        };
        let flags = Options {
            hash: self.hash.clone(),
            static_hash: None,
            delimiter: self.delimiter.clone(),
            max_length: self.max_length,
            ignore_prefixes: self.ignore_prefixes.clone(),
            include_prefixes: self.include_prefixes.clone(),
        };
        let mut options = base.merged_with(flags);
        options.max_length = options.max_length.filter(|&limit| limit > 0);
        Ok(options)
    }
}

/// `None` and `-` both mean the standard stream.
fn named_path(path: Option<&Path>) -> Option<&Path> {
    path.filter(|candidate| candidate.as_os_str() != "-")
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match named_path(path) {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read stylesheet {}", path.display())),
        None => {
            let mut css = String::new();
            io::stdin()
                .read_to_string(&mut css)
                .context("Failed to read stylesheet from stdin")?;
            Ok(css)
        }
    }
}

fn write_output(path: Option<&Path>, css: &str) -> Result<()> {
    match named_path(path) {
        Some(path) => fs::write(path, css)
            .with_context(|| format!("Failed to write stylesheet {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(css.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Failed to write stylesheet to stdout")
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let options = cli.options()?;
    if options.effective_hash().is_none() {
        warn!("no hash given, custom properties are left unchanged");
    }

    let css = read_input(cli.input.as_deref())?;
    let hashed = hash_css(&css, &options);
    info!("processed {} bytes of CSS", css.len());
    write_output(cli.output.as_deref(), &hashed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("options.json");
        fs::write(&config, r#"{"hash":"file","delimiter":"_","ignorePrefixes":["tw-"]}"#)
            .unwrap();
        let cli = Cli::parse_from([
            "var-hash",
            "--config",
            config.to_str().unwrap(),
            "--hash",
            "flag",
            "--include-prefix",
            "ui",
            "--include-prefix",
            "brand",
        ]);
        let options = cli.options().unwrap();
        assert_eq!(options.hash.as_deref(), Some("flag"));
        assert_eq!(options.delimiter.as_deref(), Some("_"));
        assert_eq!(options.ignore_prefixes, ["tw-"]);
        assert_eq!(options.include_prefixes, ["ui", "brand"]);
    }

    #[test]
    fn zero_max_length_lifts_the_configured_cap() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("options.json");
        fs::write(&config, r#"{"hash":"abcdef","maxLength":2}"#).unwrap();
        let path = config.to_str().unwrap();

        let capped = Cli::parse_from(["var-hash", "--config", path]).options().unwrap();
        assert_eq!(capped.max_length, Some(2));

        let lifted = Cli::parse_from(["var-hash", "--config", path, "--max-length", "0"])
            .options()
            .unwrap();
        assert_eq!(lifted.max_length, None);
        assert_eq!(hash_css(":root{--x:1}", &lifted), ":root{--x-abcdef:1}");
    }

    #[test]
    fn files_in_files_out() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.css");
        let output = dir.path().join("out.css");
        fs::write(&input, "a{ color: var(--fg); }").unwrap();

        let cli = Cli::parse_from([
            "var-hash",
            input.to_str().unwrap(),
            "-o",
            output.to_str().unwrap(),
            "--hash",
            "abcdef",
            "--max-length",
            "3",
        ]);
        let css = read_input(cli.input.as_deref()).unwrap();
        write_output(cli.output.as_deref(), &hash_css(&css, &cli.options().unwrap())).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), "a{ color: var(--fg-abc); }");
    }

    #[test]
    fn dash_means_standard_streams() {
        assert!(named_path(Some(Path::new("-"))).is_none());
        assert!(named_path(None).is_none());
        assert_eq!(named_path(Some(Path::new("a.css"))), Some(Path::new("a.css")));
    }
}
