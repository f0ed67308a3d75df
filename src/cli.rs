use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "autocase")]
#[command(about = "🧪 AUTOCASE - AI Test Case Generator")]
#[command(long_about = "AUTOCASE converts natural-language software requirements into structured, categorized test cases.

QUICK START:
  autocase generate requirements.csv                    # Generate test cases from a CSV dataset
  autocase generate requirements.docx --report          # DOCX input with a markdown report
  autocase convert requirements.docx                    # DOCX -> CSV conversion only
  autocase config --show                                # Inspect the stored configuration

EXAMPLES:
  autocase generate requirements.xlsx --output ./outputs --seed 7
  autocase generate --dir ./requirements
  autocase config --seed 1234")]
#[command(version = "1.0.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Generate test cases from a requirements dataset")]
    #[command(long_about = "Run the full pipeline: entity extraction, intent classification and test case synthesis.

INPUT OPTIONS (choose one):
  <INPUT>    Single requirements file (.csv, .xlsx, .xls, .docx)
  --dir      Directory containing multiple requirement datasets

OUTPUT OPTIONS:
  --output   Directory for generated artifacts (default from config)
  --report   Also write a markdown report next to the CSV
  --json     Also write the test cases as a JSON array
  --seed     Override the phrasing-selection seed for this run

EXAMPLES:
  autocase generate requirements.csv
  autocase generate requirements.docx --report
  autocase generate --dir ./datasets --output ./outputs")]
    Generate {
        #[arg(help = "Requirements file to process (.csv, .xlsx, .xls, .docx)")]
        input: Option<PathBuf>,

        #[arg(short, long, help = "Directory to process (all supported files)")]
        dir: Option<PathBuf>,

        #[arg(short, long, help = "Output directory for generated artifacts")]
        output: Option<PathBuf>,

        #[arg(long, help = "Seed for phrasing selection (overrides config)")]
        seed: Option<u64>,

        #[arg(long, help = "Write a markdown report in addition to the CSV")]
        report: bool,

        #[arg(long, help = "Write the test cases as JSON in addition to the CSV")]
        json: bool,
    },

    #[command(about = "Convert a DOCX requirements document to CSV")]
    #[command(long_about = "Extract paragraphs matching the 'R<number>: text' pattern from a DOCX file and write them as a CSV dataset.

EXAMPLES:
  autocase convert requirements.docx
  autocase convert requirements.docx --output converted.csv")]
    Convert {
        #[arg(help = "DOCX file to convert")]
        input: PathBuf,

        #[arg(short, long, help = "Output CSV path (default: converted_requirements.csv)")]
        output: Option<PathBuf>,
    },

    #[command(about = "Inspect and manage the stored configuration")]
    #[command(long_about = "Manage ~/.autocase/config.yml.

EXAMPLES:
  autocase config --show
  autocase config --seed 1234
  autocase config --output-dir ./outputs")]
    Config {
        #[arg(long, help = "Display current configuration values")]
        show: bool,

        #[arg(long, help = "Set the default phrasing-selection seed")]
        seed: Option<u64>,

        #[arg(long, help = "Set the default output directory")]
        output_dir: Option<PathBuf>,
    },
}
