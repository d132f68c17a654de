//! pdfchunk CLI - extract provenance-carrying chunks from PDFs

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use colored::Colorize;

use pdfchunk::{ChunkAssembler, ChunkOptions, ExtractOptions, PageExtractor};

#[derive(Parser)]
#[command(name = "pdfchunk")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract retrieval-ready text chunks with page/bbox provenance", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and chunk a PDF, printing chunk records as JSON
    Chunks {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Target chunk size in characters
        #[arg(long, default_value = "500")]
        chunk_size: usize,

        /// Overlap between consecutive chunks in characters
        #[arg(long, default_value = "50")]
        chunk_overlap: usize,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        /// Disable header/footer filtering
        #[arg(long)]
        no_filter: bool,

        /// Header region height in page units
        #[arg(long, default_value = "50")]
        header_margin: f32,

        /// Footer region height in page units
        #[arg(long, default_value = "50")]
        footer_margin: f32,
    },

    /// Print the filtered full text of a PDF
    Text {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Disable header/footer filtering
        #[arg(long)]
        no_filter: bool,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Chunks {
            input,
            output,
            chunk_size,
            chunk_overlap,
            compact,
            no_filter,
            header_margin,
            footer_margin,
        } => {
            let extractor = PageExtractor::with_options(
                ExtractOptions::new()
                    .with_header_footer_filter(!no_filter)
                    .with_header_margin(header_margin)
                    .with_footer_margin(footer_margin),
            );
            let assembler = ChunkAssembler::with_options(
                ChunkOptions::new()
                    .with_chunk_size(chunk_size)
                    .with_chunk_overlap(chunk_overlap),
            );

            let document = extractor.parse(&input)?;
            let chunks = assembler.chunk(&document)?;

            let json = if compact {
                serde_json::to_string(&chunks)?
            } else {
                serde_json::to_string_pretty(&chunks)?
            };

            write_output(output.as_deref(), &json)?;
            eprintln!(
                "{} {} chunks from {} pages",
                "ok:".green().bold(),
                chunks.len(),
                document.page_count
            );
        }

        Commands::Text {
            input,
            output,
            no_filter,
        } => {
            let extractor = PageExtractor::with_options(
                ExtractOptions::new().with_header_footer_filter(!no_filter),
            );
            let document = extractor.parse(&input)?;
            write_output(output.as_deref(), &document.all_text())?;
        }

        Commands::Info { input } => {
            let document = PageExtractor::new().parse(&input)?;

            println!("{}", "Document".bold());
            println!("  pages:  {}", document.page_count);
            println!("  blocks: {}", document.block_count());
            if document.is_empty() {
                println!("  {}", "no text blocks survived filtering".yellow());
            }

            if !document.metadata.is_empty() {
                println!("{}", "Metadata".bold());
                let mut keys: Vec<_> = document.metadata.keys().collect();
                keys.sort();
                for key in keys {
                    println!("  {}: {}", key, document.metadata[key]);
                }
            }
        }
    }

    Ok(())
}

fn write_output(path: Option<&std::path::Path>, content: &str) -> std::io::Result<()> {
    match path {
        Some(path) => fs::write(path, content),
        None => {
            println!("{content}");
            Ok(())
        }
    }
}
