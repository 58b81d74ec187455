//! Minimal CLI: encode (schema doc + JSON inputs) | render (decode errors)
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, info};

use schemable::doc::Document;
use schemable::jq_exec::JqFilter;
use schemable::{path_de, DecodeError};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// encode JSON through a schema document, or render decode errors as trees
#[derive(Parser, Debug)]
#[command(name = "schemable", version)]
pub struct CommandLineInterface {
    /// log at debug level (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// encode every input document with the encoder built from a schema document
    Encode(EncodeOut),
    /// render serialized decode errors as indented trees
    Render(RenderOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct EncodeOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// schema document (.json)
    #[arg(long, short)]
    schema: PathBuf,

    /// definition to encode with (the document root if omitted)
    #[arg(long)]
    root: Option<String>,

    /// pretty-print each encoded document
    #[arg(long)]
    pretty: bool,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct RenderOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// colour the rendered trees
    #[arg(long)]
    color: bool,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load(&self) -> Result<Vec<Value>> {
        let filter = self.jq_expr.as_deref().map(JqFilter::compile).transpose()?;
        let mut docs = Vec::new();
        for source_path in resolve_file_path_patterns(&self.input)? {
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read {}", source_path.display()))?;
            for json_value in self.parse_source(&source, &source_path)? {
                match &filter {
                    None => docs.push(json_value),
                    Some(filter) => {
                        let outputs = filter.apply(&json_value).with_context(|| {
                            format!("failed to apply jq expression to {}", source_path.display())
                        })?;
                        docs.extend(outputs);
                    }
                }
            }
        }
        debug!(documents = docs.len(), "loaded inputs");
        Ok(docs)
    }

    fn parse_source(&self, source: &str, path: &Path) -> Result<Vec<Value>> {
        if !self.ndjson {
            let v = serde_json::from_str::<Value>(source)
                .with_context(|| format!("failed to parse JSON source file {}", path.display()))?;
            return Ok(vec![v]);
        }
        source
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str::<Value>(line)
                    .with_context(|| format!("{}:{}: invalid JSON line", path.display(), i + 1))
            })
            .collect()
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Encode(target) => {
                let source = std::fs::read_to_string(&target.schema)
                    .with_context(|| format!("failed to read schema {}", target.schema.display()))?;
                let document: Document = path_de::from_str_with_path(&source)
                    .with_context(|| format!("invalid schema document {}", target.schema.display()))?;
                let encoder = document.encoder(target.root.as_deref())?;

                let docs = target.input_settings.load()?;
                let encoded: Vec<Value> = docs.par_iter().map(|v| encoder.encode(v)).collect();
                info!(documents = encoded.len(), "encoded");

                let lines = encoded
                    .iter()
                    .map(|v| {
                        if target.pretty { serde_json::to_string_pretty(v) } else { serde_json::to_string(v) }
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                emit(target.out.as_deref(), &lines.join("\n"))
            }
            Command::Render(target) => {
                if target.color {
                    colored::control::set_override(true);
                }
                let docs = target.input_settings.load()?;
                let rendered = docs
                    .into_iter()
                    .map(|v| {
                        let error: DecodeError = path_de::from_value_with_path(v)?;
                        let text = schemable::draw(&error);
                        Ok(if target.color { colorize(&text) } else { text })
                    })
                    .collect::<Result<Vec<_>>>()?;
                emit(target.out.as_deref(), &rendered.join("\n\n"))
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn emit(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(out, text).with_context(|| format!("failed to write {}", out.display()))
        }
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

/// Root labels in red, tree glyphs dimmed.
fn colorize(text: &str) -> String {
    text.lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                return line.red().bold().to_string();
            }
            match line.find("─ ") {
                Some(at) => {
                    let (glyphs, label) = line.split_at(at + "─ ".len());
                    format!("{}{}", glyphs.dimmed(), label)
                }
                None => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
