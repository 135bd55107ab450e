//! Tokenize a file and dump the tokens as JSON lines.
//!
//! Useful for eyeballing what a lexer produces: one object per token with
//! its kind, effective value, and mark offsets.

use std::path::PathBuf;
use std::process::ExitCode;
use std::{fs, io};

use clap::Parser;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use beck::lexer::Lexer;
use beck::{Source, TokenValue};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File to tokenize; reads stdin when omitted
    path: Option<PathBuf>,

    /// Stock lexer to use (script, arithmetic)
    #[arg(long, default_value = "script")]
    lexer: String,
}

#[derive(Serialize)]
struct MarkRecord {
    start: usize,
    end: usize,
    main: Option<usize>,
}

#[derive(Serialize)]
struct TokenRecord<'a> {
    kind: &'a str,
    value: TokenValue,
    mark: MarkRecord,
}

fn run(cli: &Cli) -> Result<(), String> {
    let lexer: &Lexer = match cli.lexer.as_str() {
        "script" => beck::lexers::script(),
        "arithmetic" => beck::lexers::arithmetic(),
        other => return Err(format!("unknown lexer {other:?} (script, arithmetic)")),
    };

    let source = match &cli.path {
        Some(path) => {
            let data = fs::read_to_string(path)
                .map_err(|error| format!("{}: {error}", path.display()))?;
            Source::new(path.display().to_string(), data)
        }
        None => {
            let data = io::read_to_string(io::stdin()).map_err(|error| error.to_string())?;
            Source::new("<stdin>", data)
        }
    };
    debug!(path = %source.path, bytes = source.data.len(), "tokenizing");

    let tokens = lexer.lex(source).map_err(|error| error.to_string())?;
    for token in &tokens {
        let record = TokenRecord {
            kind: &token.kind,
            value: token.value(),
            mark: MarkRecord {
                start: token.mark.start,
                end: token.mark.end,
                main: token.mark.main,
            },
        };
        let line = serde_json::to_string(&record).map_err(|error| error.to_string())?;
        println!("{line}");
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}
