//! Process command: run the extraction engine over report text files.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use credex_core::{AcquisitionMetadata, PageText, ReportExtraction, ReportParser};

#[derive(Args)]
pub struct ProcessArgs {
    /// Report text file(s) to process
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Acquisition metadata JSON file from the upstream pipeline
    #[arg(short, long)]
    pub metadata: Option<PathBuf>,

    /// Treat the input files as consecutive pages of one report
    #[arg(long)]
    pub multi_page: bool,

    /// Emit compact JSON instead of pretty-printed
    #[arg(long)]
    pub compact: bool,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let metadata = args
        .metadata
        .as_deref()
        .map(|path| -> anyhow::Result<AcquisitionMetadata> {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read metadata file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("invalid acquisition metadata in {}", path.display()))
        })
        .transpose()?;

    let parser = ReportParser::new();

    if args.multi_page {
        let mut pages = Vec::new();
        for (index, path) in args.files.iter().enumerate() {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            pages.push(PageText {
                number: index as u32 + 1,
                text,
            });
        }
        info!(pages = pages.len(), "processing multi-page report");
        let extraction = parser.parse_pages(&pages, metadata.as_ref());
        print_extraction(&extraction, args.compact)?;
        return Ok(());
    }

    for path in &args.files {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        info!(file = %path.display(), "processing report");
        let extraction = parser.parse_with_metadata(&text, metadata.as_ref());
        print_extraction(&extraction, args.compact)?;
    }

    Ok(())
}

fn print_extraction(extraction: &ReportExtraction, compact: bool) -> anyhow::Result<()> {
    let json = if compact {
        serde_json::to_string(extraction)?
    } else {
        serde_json::to_string_pretty(extraction)?
    };
    println!("{json}");
    Ok(())
}
