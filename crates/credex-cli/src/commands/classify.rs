//! Classify command: document-type check without field extraction.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use credex_core::{classify, preprocess_text};

#[derive(Args)]
pub struct ClassifyArgs {
    /// Text file(s) to classify
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Skip OCR-artifact repair before classification
    #[arg(long)]
    pub raw: bool,
}

pub fn run(args: ClassifyArgs) -> anyhow::Result<()> {
    for path in &args.files {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let text = if args.raw {
            text
        } else {
            preprocess_text(&text)
        };

        let result = classify(&text);
        println!(
            "{}: {}",
            path.display(),
            serde_json::to_string_pretty(&result)?
        );
    }

    Ok(())
}
