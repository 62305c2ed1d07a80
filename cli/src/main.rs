use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sentrank_core::persist::{load_engine, save_engine, IndexPaths};
use sentrank_core::{AnswerOptions, Engine, FILE_MATCHES, SENTENCE_MATCHES};
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "questions")]
#[command(about = "Answer a question with the best matching sentence from a text corpus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Answer one query against a directory of .txt files or a built snapshot
    Ask {
        /// Corpus directory (plain .txt files or the output of `build`)
        corpus: String,
        /// Query text; read from stdin when omitted
        #[arg(long, short)]
        query: Option<String>,
        /// Number of documents to extract sentences from
        #[arg(long, short, default_value_t = FILE_MATCHES)]
        files: usize,
        /// Number of sentences to print
        #[arg(long, short, default_value_t = SENTENCE_MATCHES)]
        sentences: usize,
    },
    /// Tokenize a corpus once and save it with its IDF table
    Build {
        /// Directory of .txt files
        corpus: String,
        /// Output snapshot directory
        #[arg(long)]
        output: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Ask { corpus, query, files, sentences } => {
            ask(&corpus, query, AnswerOptions { files, sentences })
        }
        Commands::Build { corpus, output } => build(&corpus, &output),
    }
}

fn open_engine(corpus: &str) -> Result<Engine> {
    let paths = IndexPaths::new(corpus);
    if paths.exists() {
        return load_engine(&paths);
    }
    Engine::from_directory(Path::new(corpus)).with_context(|| format!("indexing corpus {corpus}"))
}

fn ask(corpus: &str, query: Option<String>, options: AnswerOptions) -> Result<()> {
    let engine = open_engine(corpus)?;
    let query = match query {
        Some(q) => q,
        None => prompt("Query: ")?,
    };

    let answer = engine.answer(&query, options)?;
    tracing::info!(terms = ?answer.terms, files = answer.files.len(), "answered query");
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for sentence in answer.sentence_texts() {
        writeln!(out, "{sentence}")?;
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "{label}")?;
    stdout.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("reading query from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn build(corpus: &str, output: &str) -> Result<()> {
    let engine = Engine::from_directory(Path::new(corpus)).with_context(|| format!("indexing corpus {corpus}"))?;
    let meta = save_engine(&IndexPaths::new(output), &engine)?;
    tracing::info!(output, num_docs = meta.num_docs, num_terms = meta.num_terms, "snapshot build complete");
    Ok(())
}
