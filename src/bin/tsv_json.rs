use anyhow::Context;
use clap::Parser;
use rotation_etl::core::curated::{convert_directory, CuratedOptions};
use rotation_etl::utils::logger;
use rotation_etl::LocalStorage;
use std::path::Path;

#[derive(Parser)]
#[command(name = "tsv-json")]
#[command(about = "Convert curated TSV files into JSON row arrays")]
struct Args {
    /// Directory holding the curated *.tsv files
    #[arg(long, default_value = "./tsv")]
    input: String,

    /// Directory receiving <stem>.json files
    #[arg(long, default_value = "./dist")]
    output: String,

    /// Column that must hold ISO dates (YYYY-MM-DD)
    #[arg(long)]
    date_field: Option<String>,

    /// Column to stable-sort rows by
    #[arg(long)]
    sort_by: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let options = CuratedOptions {
        date_field: args.date_field,
        sort_by: args.sort_by,
    };

    let input = LocalStorage::new(args.input.clone());
    let output = LocalStorage::new(args.output.clone());

    let written = convert_directory(&input, &output, Path::new(&args.input), &options)
        .await
        .with_context(|| format!("converting TSV files in {}", args.input))?;

    for name in &written {
        println!("Converting -> {}/{}", args.output, name);
    }
    println!("Done. {} file(s) written.", written.len());

    Ok(())
}
