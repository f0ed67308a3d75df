use anyhow::Result;
use clap::{CommandFactory, Parser};

use autocase::cli::{Cli, Commands};
use autocase::config::Config;
use autocase::ingest::RequirementsLoader;
use autocase::pipeline::{Pipeline, RunOptions};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Generate { input, dir, output, seed, report, json }) => {
            let mut config = Config::load()?;
            if let Some(seed) = seed {
                config.set_seed(seed);
            }
            if let Some(output) = output {
                config.set_output_dir(output);
            }

            println!("🧪 AUTOCASE - AI Test Case Generator");
            println!("====================================");

            let pipeline = Pipeline::new(config)?;
            let options = RunOptions { report, json };
            let result = match (input, dir) {
                (Some(input), _) => pipeline.run_file(&input, options)?,
                (None, Some(dir)) => pipeline.run_directory(&dir, options)?,
                (None, None) => {
                    anyhow::bail!("No input provided. Pass a requirements file or --dir.")
                }
            };

            println!("\n✅ Test Case Generation Completed Successfully.");
            println!("Output File: {}", result.output_file.display());
            println!("Total Test Cases: {}", result.metrics.total_test_cases);
            println!("Requirements Coverage: {:.1}%", result.metrics.requirements_coverage);
        }
        Some(Commands::Convert { input, output }) => {
            let loader = RequirementsLoader::new()?;
            let output = output.unwrap_or_else(|| "converted_requirements.csv".into());
            println!("📄 Converting DOCX → CSV...");
            loader.convert_docx_to_csv(&input, &output)?;
            println!("✅ DOCX converted successfully → {}", output.display());
        }
        Some(Commands::Config { show, seed, output_dir }) => {
            let mut config = Config::load()?;

            if let Some(seed) = seed {
                config.set_seed(seed);
                config.save()?;
                println!("✅ Default seed set to {}", seed);
            }
            if let Some(dir) = output_dir {
                config.set_output_dir(dir.clone());
                config.save()?;
                println!("✅ Default output directory set to {}", dir.display());
            }
            if show {
                println!("\n⚙️  Configuration ({})", Config::config_path()?.display());
                println!("   seed: {}", config.generation.seed);
                println!("   output_dir: {}", config.generation.output_dir.display());
            }
        }
        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
