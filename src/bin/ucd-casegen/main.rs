// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::path::PathBuf;

use anyhow::{Context, bail};
use tracing_subscriber::EnvFilter;
use ucd_casegen::artifacts::{self, Inputs};
use ucd_casegen::ucd::{self, UnicodeProperties};

const HELP: &str = "\
Usage: ucd-casegen [options...] <ucd-dir>
  -h, --help            Prints help information
  --out=<dir>           Root of the source tree to generate into (default: .)
  --nerd-fonts=<file>   Extra glyph names as `code category name` lines
  --diacritics=<file>   Generate the row/column diacritic tables from this list
  --dry-run             Render and validate everything, but don't write any files

<ucd-dir> must contain ReadMe.txt, UnicodeData.txt, PropList.txt,
EastAsianWidth.txt and emoji-sequences.txt. They can be downloaded at:
  https://www.unicode.org/Public/UCD/latest/ucd/
  https://www.unicode.org/Public/emoji/latest/

Set RUST_LOG=debug for per-layer codepoint counts.
";

fn main() -> anyhow::Result<()> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        eprint!("{HELP}");
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let arg_out: PathBuf = args.opt_value_from_str("--out")?.unwrap_or_else(|| PathBuf::from("."));
    let arg_nerd_fonts: Option<PathBuf> = args.opt_value_from_str("--nerd-fonts")?;
    let arg_diacritics: Option<PathBuf> = args.opt_value_from_str("--diacritics")?;
    let arg_dry_run = args.contains("--dry-run");
    let arg_input = args.free_from_os_str(|s| -> Result<PathBuf, &'static str> { Ok(s.into()) })?;
    let arg_remaining = args.finish();
    if !arg_remaining.is_empty() {
        bail!("unrecognized arguments: {:?}", arg_remaining);
    }
    if !arg_input.is_dir() {
        bail!("not a directory: {}", arg_input.display());
    }

    let props = UnicodeProperties::load(&arg_input, arg_nerd_fonts.as_deref())
        .with_context(|| format!("failed to load the UCD from {}", arg_input.display()))?;

    let diacritics = arg_diacritics
        .as_deref()
        .map(|path| ucd::read(path).and_then(|text| ucd::parse_diacritics(&text)))
        .transpose()
        .context("failed to load the row/column diacritics")?;

    let header_path = arg_out.join(artifacts::UNICODE_DATA_H);
    let unicode_data_h = ucd::read(&header_path)
        .with_context(|| format!("{} must exist to patch the known marks into", header_path.display()))?;

    let out = artifacts::render(&Inputs {
        props: &props,
        unicode_data_h: &unicode_data_h,
        diacritics: diacritics.as_deref(),
    })?;

    if arg_dry_run {
        for artifact in out.iter() {
            println!("{}\t{}", artifact.path.display(), artifact.text.len());
        }
        return Ok(());
    }

    out.write_all(&arg_out).with_context(|| format!("failed to write into {}", arg_out.display()))?;
    tracing::info!(files = out.len(), out = %arg_out.display(), "done");
    Ok(())
}
