use clap::Parser;
use flagconv::{Tag, ValueType, decode, encode};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Parser)]
#[command(name = "flagconv")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert option text to its canonical form for a given type", long_about = None)]
#[command(after_help = "\x1b[1;4mExamples:\x1b[0m
  Normalize a hexadecimal integer:
    \x1b[1mflagconv\x1b[0m --type i32 --tag base=16 -- -16BF

  Normalize a map with a custom key-value delimiter:
    \x1b[1mflagconv\x1b[0m --type 'HashMap<String, String>' --tag key-value-delimiter== key=value

  Use a struct-tag literal:
    \x1b[1mflagconv\x1b[0m --type 'Vec<u8>' --tag-literal 'long:\"mask\" base:\"2\"' '[101, 11]'

  Print a JSON record:
    \x1b[1mflagconv\x1b[0m --type Duration --json 90m")]
struct Cli {
    /// Type of the option, e.g. `u16`, `Vec<i32>` or `IndexMap<String, f64>`
    #[arg(short = 't', long = "type")]
    value_type: ValueType,

    /// A tag entry as KEY=VALUE; may be repeated
    #[arg(long = "tag", value_name = "KEY=VALUE", value_parser = parse_tag_entry)]
    tags: Vec<(String, String)>,

    /// A struct-tag literal such as `long:"mask" base:"16"`
    #[arg(long, value_name = "LITERAL")]
    tag_literal: Option<Tag>,

    /// A YAML file mapping tag keys to values
    #[arg(long, value_name = "PATH")]
    tags_file: Option<PathBuf>,

    /// Print a JSON record instead of the bare canonical text
    #[arg(long)]
    json: bool,

    /// Name reported in error messages
    #[arg(long, default_value = "value")]
    name: String,

    #[arg(help = "Option text to convert")]
    input: String,
}

#[derive(Serialize)]
struct Record<'a> {
    #[serde(rename = "type")]
    value_type: String,
    input: &'a str,
    canonical: String,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = process(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn parse_tag_entry(entry: &str) -> Result<(String, String), String> {
    let (key, value) = entry
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, found {entry:?}"))?;
    if key.is_empty() {
        return Err(format!("empty tag key in {entry:?}"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn read_tags_file(path: &Path) -> Result<Tag, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let raw: IndexMap<String, serde_yaml::Value> = serde_yaml::from_str(&content)?;

    let mut tag = Tag::new();
    for (key, value) in raw {
        let text = match value {
            serde_yaml::Value::String(s) => s,
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::Bool(b) => b.to_string(),
            serde_yaml::Value::Null => String::new(),
            _ => {
                return Err(format!(
                    "tag {key:?} in {} must be a scalar",
                    path.display()
                )
                .into());
            }
        };
        tag = tag.with(key, text);
    }
    Ok(tag)
}

fn build_tag(cli: &Cli) -> Result<Tag, Box<dyn std::error::Error>> {
    let mut tag = match &cli.tags_file {
        Some(path) => read_tags_file(path)?,
        None => Tag::new(),
    };
    if let Some(literal) = &cli.tag_literal {
        tag.extend(literal.iter().map(|(k, v)| (k.to_string(), v.to_string())));
    }
    tag.extend(cli.tags.iter().cloned());
    Ok(tag)
}

fn process(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let tag = build_tag(cli)?;
    tracing::debug!(value_type = %cli.value_type, tag = %tag, "converting");

    let mut value = cli.value_type.instantiate();
    decode(&cli.input, &mut value, &tag).map_err(|e| e.with_option(&cli.name))?;
    let canonical = encode(&value, &tag).map_err(|e| e.with_option(&cli.name))?;

    if cli.json {
        let record = Record {
            value_type: cli.value_type.to_string(),
            input: &cli.input,
            canonical,
        };
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("{}", canonical);
    }

    Ok(())
}
