use std::path::PathBuf;

use crate::config::OutputFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    Root,
    Check,
    Placeholders,
}

#[derive(Debug, Clone)]
pub enum Command {
    Help(HelpTopic),
    Check(CheckArgs),
    Placeholders(PlaceholdersArgs),
}

#[derive(Debug, Clone)]
pub struct CheckArgs {
    pub config: PathBuf,
    /// Overrides `check.format` from the config file.
    pub format: Option<OutputFormat>,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct PlaceholdersArgs {
    pub format: OutputFormat,
    pub queries: Vec<String>,
}

pub fn parse_args(args: &[String]) -> anyhow::Result<Command> {
    let mut it = args.iter().skip(1);
    let Some(first) = it.next() else {
        return Ok(Command::Help(HelpTopic::Root));
    };

    match first.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help(HelpTopic::Root)),
        "check" => parse_check(it.map(|s| s.as_str())),
        "placeholders" => parse_placeholders(it.map(|s| s.as_str())),
        _ => anyhow::bail!("unknown command: {first}"),
    }
}

fn parse_format(v: &str) -> anyhow::Result<OutputFormat> {
    match v {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => anyhow::bail!("unknown format: {other} (expected `text` or `json`)"),
    }
}

fn parse_check<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut config = PathBuf::from("sqlargs.toml");
    let mut format: Option<OutputFormat> = None;
    let mut files: Vec<PathBuf> = Vec::new();

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Check)),
            "--config" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--config requires a value");
                };
                config = PathBuf::from(v);
            }
            _ if token.starts_with("--config=") => {
                config = PathBuf::from(token.trim_start_matches("--config="));
            }
            "--format" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--format requires a value");
                };
                format = Some(parse_format(v)?);
            }
            _ if token.starts_with("--format=") => {
                format = Some(parse_format(token.trim_start_matches("--format="))?);
            }
            "-" => files.push(PathBuf::from("-")),
            other if other.starts_with('-') => anyhow::bail!("unknown argument: {other}"),
            other => files.push(PathBuf::from(other)),
        }
    }

    Ok(Command::Check(CheckArgs {
        config,
        format,
        files,
    }))
}

fn parse_placeholders<'a>(mut it: impl Iterator<Item = &'a str>) -> anyhow::Result<Command> {
    let mut format = OutputFormat::Text;
    let mut queries: Vec<String> = Vec::new();

    while let Some(token) = it.next() {
        match token {
            "-h" | "--help" => return Ok(Command::Help(HelpTopic::Placeholders)),
            "--format" => {
                let Some(v) = it.next() else {
                    anyhow::bail!("--format requires a value");
                };
                format = parse_format(v)?;
            }
            _ if token.starts_with("--format=") => {
                format = parse_format(token.trim_start_matches("--format="))?;
            }
            // Everything after `--` is SQL, even when it starts with a dash.
            "--" => queries.extend(it.by_ref().map(|s| s.to_string())),
            other if other.starts_with("--") => anyhow::bail!("unknown argument: {other}"),
            other => queries.push(other.to_string()),
        }
    }

    Ok(Command::Placeholders(PlaceholdersArgs { format, queries }))
}

pub fn print_help(topic: HelpTopic) {
    match topic {
        HelpTopic::Root => {
            println!(
                "\
sqlargs - check SQL placeholder counts against bind arguments

USAGE:
  sqlargs <COMMAND> [OPTIONS]

COMMANDS:
  check         Analyze package fact files and report mismatches
  placeholders  Show the placeholders found in SQL text

Run `sqlargs <command> --help` for more.
Set SQLARGS_LOG (e.g. SQLARGS_LOG=debug) to enable logging."
            );
        }
        HelpTopic::Check => {
            println!(
                "\
USAGE:
  sqlargs check [OPTIONS] [FACTS...]

Reads package fact files (JSON) produced by a frontend. Without FACTS,
uses check.facts from the config file; without either, reads one package
from stdin (`-` reads stdin explicitly).

OPTIONS:
  --config <FILE>       Config file path (default: sqlargs.toml)
  --format <FORMAT>     Output format: text or json (default: text)
  -h, --help            Print help"
            );
        }
        HelpTopic::Placeholders => {
            println!(
                "\
USAGE:
  sqlargs placeholders [OPTIONS] [SQL...]

Prints the placeholders found in each SQL argument, or in stdin when no
SQL is given. Use `--` before SQL that starts with a dash.

OPTIONS:
  --format <FORMAT>     Output format: text or json (default: text)
  -h, --help            Print help"
            );
        }
    }
}
