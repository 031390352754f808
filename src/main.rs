use std::fs;
use std::path::PathBuf;

use clap::Parser;
use mdtree::Config;

#[derive(Parser)]
#[command(name = "mdtree")]
#[command(about = "Convert Markdown files to tagged XML node trees")]
struct Cli {
    /// Input Markdown file
    input: PathBuf,

    /// Output XML file (defaults to input name with .xml extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the raw token stream instead of converted nodes
    #[arg(long)]
    tokens: bool,

    /// TOML config file (defaults to the bundled config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let config = match &cli.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => Config::compiled_default(),
    };

    // Read input file
    let markdown = match fs::read_to_string(&cli.input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading {}: {}", cli.input.display(), e);
            std::process::exit(1);
        }
    };

    let result = if cli.tokens {
        let tokens = mdtree::tokenize_with_config(&markdown, &config);
        mdtree::tokens_to_xml(&tokens, &config.output)
    } else {
        let conversion = mdtree::markdown_to_nodes(&markdown, &config);
        if !conversion.skipped.is_empty() {
            log::info!(
                "{} token(s) had no node mapping and were skipped",
                conversion.skipped.len()
            );
        }
        mdtree::nodes_to_xml(&conversion.nodes, &config.output)
    };

    let xml = match result {
        Ok(xml) => xml,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Determine output path
    let output = cli
        .output
        .unwrap_or_else(|| cli.input.with_extension("xml"));

    // Write XML
    if let Err(e) = fs::write(&output, xml) {
        eprintln!("Error writing {}: {}", output.display(), e);
        std::process::exit(1);
    }

    println!("Created {}", output.display());
}
