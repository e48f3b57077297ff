//! Build a raw packet from a template file.
//!
//! Usage:
//!   packet_build [OPTIONS] TEMPLATE
//!
//! Options:
//!   --set, -s NAME=VALUE   Assign a field (repeatable); VALUE uses template numeral syntax
//!   --format, -f FORMAT    raw | hex | layout (default: hex)
//!   --output, -o PATH      Write to PATH instead of stdout
//!   --verbose, -v          Debug logging (RUST_LOG takes precedence)
//!
//! Exit code 1 if the template is malformed or fields remain unset (except with `layout`).

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use fieldpack::{format_layout, hex_dump, Builder, FieldValue};
use log::{debug, info};
use std::io::Write;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Raw,
    Hex,
    Layout,
}

#[derive(Parser)]
#[command(name = "packet_build")]
#[command(about = "Build a raw packet from a field template")]
#[command(version)]
struct Cli {
    /// Template file (name[size]=default, comma separated)
    template: PathBuf,

    /// Assign a field value: NAME=VALUE (0x.., 0b.. or decimal)
    #[arg(short, long = "set", value_name = "NAME=VALUE")]
    set: Vec<String>,

    #[arg(short, long, value_enum, default_value = "hex")]
    format: OutputFormat,

    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn parse_assignment(s: &str) -> anyhow::Result<(&str, FieldValue)> {
    let (name, value) = s
        .split_once('=')
        .with_context(|| format!("expected NAME=VALUE, got `{}`", s))?;
    let value: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    let value = FieldValue::parse_numeral(&value)
        .with_context(|| format!("invalid value for `{}`: `{}`", name, value))?;
    Ok((name.trim(), value))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let mut builder = Builder::from_file(&cli.template)
        .with_context(|| format!("{}", cli.template.display()))?;
    info!("{}: {} field(s)", cli.template.display(), builder.count());

    for assignment in &cli.set {
        let (name, value) = parse_assignment(assignment)?;
        debug!("set {} = {}", name, value);
        builder.set_value(name, value)?;
    }

    let output = match cli.format {
        OutputFormat::Layout => format_layout(&builder).into_bytes(),
        format => {
            if !builder.is_correct() {
                bail!("unset field(s): {}", builder.unset_fields().join(", "));
            }
            let raw = builder.encode()?;
            match format {
                OutputFormat::Raw => raw,
                _ => hex_dump(&raw, 16).into_bytes(),
            }
        }
    };

    match &cli.output {
        Some(path) => std::fs::write(path, &output)
            .with_context(|| format!("write failed: {}", path.display()))?,
        None => std::io::stdout().write_all(&output)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_parses_numeral() {
        let (name, value) = parse_assignment("xid=0x3903 f326").expect("parse");
        assert_eq!(name, "xid");
        assert_eq!(value.as_u64(), Some(0x3903f326));
    }

    #[test]
    fn assignment_requires_equals() {
        assert!(parse_assignment("xid").is_err());
        assert!(parse_assignment("xid=0xzz").is_err());
    }
}
