use anyhow::{Context, Result, bail};
use log::{debug, info};
use std::{
    env,
    io::{Write, stdout},
    path::{Path, PathBuf},
    process,
};
use textmarkup_config::{Config, GrammarSettings};
use textmarkup_engine::{GrammarOptions, MarkdownGrammar, ParsedBuffer, snapshot};
use textmarkup_syntax::{Grammar, ParseError};

const USAGE: &str = "Usage:
  textmarkup parse <file>
  textmarkup tree <file> [--toml]
  textmarkup locate <file> <offset>
  textmarkup check [notes-folder-path]";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Parse { file: PathBuf },
    Tree { file: PathBuf, toml: bool },
    Locate { file: PathBuf, offset: usize },
    Check { notes_path: Option<PathBuf> },
}

impl Command {
    fn from_args(args: &[String]) -> Result<Self> {
        let rest: Vec<&str> = args.iter().skip(1).map(String::as_str).collect();
        let command = match rest.as_slice() {
            ["parse", file] => Command::Parse { file: file.into() },
            ["tree", file] => Command::Tree {
                file: file.into(),
                toml: false,
            },
            ["tree", file, "--toml"] | ["tree", "--toml", file] => Command::Tree {
                file: file.into(),
                toml: true,
            },
            ["locate", file, offset] => Command::Locate {
                file: file.into(),
                offset: offset
                    .parse()
                    .with_context(|| format!("offset '{offset}' is not a number"))?,
            },
            ["check"] => Command::Check { notes_path: None },
            ["check", dir] => Command::Check {
                notes_path: Some(dir.into()),
            },
            _ => bail!("{USAGE}"),
        };
        Ok(command)
    }
}

fn grammar_options(settings: &GrammarSettings) -> GrammarOptions {
    GrammarOptions {
        max_heading_level: settings.max_heading_level,
        memoize_inline: settings.memoize_inline,
    }
}

/// The config file, if there is one.
fn load_config() -> Result<Option<Config>> {
    let config = Config::load()
        .with_context(|| format!("Failed to load config file {}", Config::config_path().display()))?;
    if config.is_none() {
        debug!("no config file at {}", Config::config_path().display());
    }
    Ok(config)
}

fn build_grammar(settings: &GrammarSettings) -> Result<MarkdownGrammar> {
    MarkdownGrammar::build(&grammar_options(settings)).context("Invalid grammar settings")
}

fn open(file: &Path, grammar: &std::sync::Arc<Grammar>) -> Result<ParsedBuffer> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    Ok(ParsedBuffer::new(&text, grammar.clone()))
}

/// One line describing whether the parse covered the file.
fn status(doc: &ParsedBuffer) -> String {
    match doc.result() {
        Ok(_) => "complete".to_string(),
        Err(ParseError::Incomplete {
            consumed, length, ..
        }) => format!("incomplete: parsed {consumed} of {length} code units"),
        Err(ParseError::NoMatch { examined_length }) => {
            format!("no match: start rule failed after {examined_length} code units")
        }
    }
}

fn parse_file(file: &Path, grammar: &MarkdownGrammar, out: &mut impl Write) -> Result<bool> {
    let doc = open(file, grammar.grammar())?;
    if let Some(root) = doc.partial_tree() {
        writeln!(out, "{}", root.compact_structure())?;
    }
    writeln!(out, "{}", status(&doc))?;
    Ok(doc.tree().is_some())
}

fn print_tree(file: &Path, grammar: &MarkdownGrammar, as_toml: bool, out: &mut impl Write) -> Result<bool> {
    let doc = open(file, grammar.grammar())?;
    let Some(root) = doc.partial_tree() else {
        writeln!(out, "{}", status(&doc))?;
        return Ok(false);
    };
    if as_toml {
        let snap = snapshot::normalize(doc.buffer(), root);
        write!(out, "{}", toml::to_string_pretty(&snap)?)?;
    } else {
        write!(out, "{}", root.debug_tree(doc.buffer()))?;
    }
    Ok(doc.tree().is_some())
}

fn locate(file: &Path, offset: usize, grammar: &MarkdownGrammar, out: &mut impl Write) -> Result<bool> {
    let doc = open(file, grammar.grammar())?;
    if offset > doc.len() {
        bail!("offset {offset} is past the end of {} ({} code units)", file.display(), doc.len());
    }
    for (depth, node) in doc.path_to_location(offset).iter().enumerate() {
        let range = node.range();
        writeln!(
            out,
            "{}{}@{}..{}",
            "  ".repeat(depth),
            node.node_type(),
            range.start,
            range.end
        )?;
    }
    Ok(true)
}

fn check(config: &Config, root: &Path, grammar: &MarkdownGrammar, out: &mut impl Write) -> Result<bool> {
    let files = config.matching_files(root)?;
    info!("checking {} files under {}", files.len(), root.display());
    let mut failures = 0;
    for file in &files {
        let doc = open(file, grammar.grammar())?;
        let relative = file.strip_prefix(root).unwrap_or(file);
        if doc.tree().is_some() {
            writeln!(out, "ok {}", relative.display())?;
        } else {
            failures += 1;
            writeln!(out, "FAIL {}: {}", relative.display(), status(&doc))?;
        }
    }
    writeln!(out, "{} files, {failures} incomplete", files.len())?;
    Ok(failures == 0)
}

fn run(command: Command, config: Option<Config>, out: &mut impl Write) -> Result<bool> {
    let settings = config.as_ref().map(|c| c.grammar.clone()).unwrap_or_default();
    let grammar = build_grammar(&settings)?;
    match command {
        Command::Parse { file } => parse_file(&file, &grammar, out),
        Command::Tree { file, toml } => print_tree(&file, &grammar, toml, out),
        Command::Locate { file, offset } => locate(&file, offset, &grammar, out),
        Command::Check { notes_path } => {
            let config = match (notes_path, config) {
                (Some(path), Some(config)) => Config {
                    notes_path: path,
                    ..config
                },
                (Some(path), None) => Config::new(path),
                (None, Some(config)) => config,
                (None, None) => bail!(
                    "No notes path provided and no config file found\nOr create a config file at {}",
                    Config::config_path().display()
                ),
            };
            if !config.notes_path.is_dir() {
                bail!("Notes path '{}' is not a directory", config.notes_path.display());
            }
            check(&config, &config.notes_path, &grammar, out)
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let command = match Command::from_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}");
            process::exit(2);
        }
    };

    let config = load_config()?;
    let mut stdout = stdout().lock();
    let success = run(command, config, &mut stdout)?;
    stdout.flush()?;
    if !success {
        process::exit(1);
    }
    Ok(())
}
