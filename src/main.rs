//! Command-line front end for the fingerprint rewriter.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use fingerprint_rewriter::maps::{load_map_file, load_referenced_map, sibling_map_path, to_json_string};
use fingerprint_rewriter::{
    AssetManifest, FileRewriter, RewriteMode, RewriteOptions, read_file_text,
};

/// Rewrite asset references in a text file to their fingerprinted paths.
#[derive(Debug, Parser)]
#[command(name = "fingerprint-rewriter", version, about)]
struct Cli {
    /// File to rewrite.
    input: PathBuf,

    /// Manifest JSON mapping original paths to fingerprinted ones.
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// Output path; defaults to rewriting the input in place.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Options file to load; defaults to `fingerprint.config.json` in the
    /// working directory when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// String prepended to every replacement.
    #[arg(long)]
    prefix: Option<String>,

    /// Path prefix stripped from candidates before the final lookup attempt.
    #[arg(long)]
    base: Option<String>,

    /// Path prefix removed from replacement values.
    #[arg(long)]
    strip: Option<String>,

    /// Matching strategy.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,

    /// Custom reference-matching pattern (pattern mode only).
    #[arg(long)]
    pattern: Option<String>,

    /// Report found and replaced references.
    #[arg(short, long)]
    verbose: bool,
}

/// CLI surface for the matching strategy.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Regex-driven matching.
    Pattern,
    /// Manifest-driven literal scanning.
    Literal,
}

impl From<ModeArg> for RewriteMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Pattern => RewriteMode::Pattern,
            ModeArg::Literal => RewriteMode::Literal,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let options = merge_options(&cli)?;
    let manifest_path = options
        .manifest
        .clone()
        .context("no manifest supplied; pass --manifest or set it in the options file")?;
    let manifest = AssetManifest::load_from_path(&manifest_path)
        .with_context(|| format!("failed to load manifest from {}", manifest_path.display()))?;
    let config = options.into_config().context("invalid rewrite options")?;

    let source = read_file_text(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let upstream = discover_upstream_map(&cli.input, &source)?;

    let file_name = cli
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cli.input.display().to_string());
    let rewriter = FileRewriter::new(&config, &manifest);
    let result = rewriter.rewrite(&file_name, &source, upstream.as_ref());

    let output = cli.output.unwrap_or_else(|| cli.input.clone());
    fs::write(&output, &result.text)
        .with_context(|| format!("failed to write {}", output.display()))?;

    if let Some(map) = &result.map {
        let map_path = sibling_map_path(&output);
        let json = to_json_string(map)?;
        fs::write(&map_path, json)
            .with_context(|| format!("failed to write {}", map_path.display()))?;
    }

    Ok(())
}

/// Combine options from the options file with CLI flag overrides.
fn merge_options(cli: &Cli) -> Result<RewriteOptions> {
    let mut options = match &cli.config {
        Some(path) => RewriteOptions::from_path(path)
            .with_context(|| format!("failed to load options from {}", path.display()))?,
        None => RewriteOptions::discover(Path::new(".")),
    };

    if let Some(manifest) = &cli.manifest {
        options.manifest = Some(manifest.clone());
    }
    if let Some(prefix) = &cli.prefix {
        options.prefix = prefix.clone();
    }
    if let Some(base) = &cli.base {
        options.base = base.clone();
    }
    if let Some(strip) = &cli.strip {
        options.strip = strip.clone();
    }
    if let Some(mode) = cli.mode {
        options.mode = mode.into();
    }
    if cli.pattern.is_some() {
        options.pattern = cli.pattern.clone();
    }
    if cli.verbose {
        options.verbose = true;
    }

    Ok(options)
}

/// Find the positional map attached to the input, if any.
///
/// A `sourceMappingURL` comment in the text wins; otherwise a sibling
/// `<input>.map` file is probed.
fn discover_upstream_map(
    input: &Path,
    source: &str,
) -> Result<Option<sourcemap::SourceMap>> {
    let dir = input.parent().unwrap_or_else(|| Path::new("."));
    if let Some(map) = load_referenced_map(source, dir)? {
        return Ok(Some(map));
    }

    let sibling = sibling_map_path(input);
    if sibling.exists() {
        return Ok(Some(load_map_file(&sibling)?));
    }
    Ok(None)
}
