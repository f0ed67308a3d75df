use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::classifier::IntentClassifier;
use crate::config::Config;
use crate::errors::GeneratorError;
use crate::extractor::EntityExtractor;
use crate::ingest::{clean_requirements, RequirementRecord, RequirementsLoader};
use crate::labeler::build_training_data;
use crate::metrics::{calculate_metrics, Metrics};
use crate::report;
use crate::scenario::generate_scenario_set;
use crate::testcase::{TestCase, TestCaseSynthesizer};

/// Optional artifacts to write next to the CSV output.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Also render the markdown report.
    pub report: bool,
    /// Also write the test cases as a JSON array.
    pub json: bool,
}

#[derive(Debug)]
pub struct RunOutput {
    pub output_file: PathBuf,
    pub report_file: Option<PathBuf>,
    pub json_file: Option<PathBuf>,
    pub metrics: Metrics,
}

/// End-to-end batch run: ingest, extract, weak-label, train, synthesize,
/// aggregate, write.
pub struct Pipeline {
    config: Config,
    loader: RequirementsLoader,
    extractor: EntityExtractor,
}

impl Pipeline {
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            loader: RequirementsLoader::new()?,
            extractor: EntityExtractor::new()?,
            config,
        })
    }

    pub fn run_file(&self, input: &Path, options: RunOptions) -> Result<RunOutput> {
        let records = self.loader.load(input)?;
        self.run_records(&records, options)
    }

    pub fn run_directory(&self, dir: &Path, options: RunOptions) -> Result<RunOutput> {
        let records = self.loader.load_directory(dir)?;
        self.run_records(&records, options)
    }

    pub fn run_records(&self, records: &[RequirementRecord], options: RunOptions) -> Result<RunOutput> {
        println!("🚀 Starting Test Case Generation");
        println!("{}", "=".repeat(60));

        let requirements = clean_requirements(records);
        if requirements.is_empty() {
            return Err(GeneratorError::EmptyCorpus.into());
        }

        // Per-requirement extraction and weak labeling are independent;
        // training must see the whole labeled corpus before any prediction.
        let entities: Vec<_> = requirements
            .iter()
            .map(|r| self.extractor.extract(&r.normalized_text))
            .collect();
        println!("✅ Loaded {} requirements and extracted entities", requirements.len());

        let texts: Vec<String> = requirements.iter().map(|r| r.normalized_text.clone()).collect();
        let training_data = build_training_data(&texts);

        let mut classifier = IntentClassifier::new();
        classifier.train(&training_data)?;

        let scenario_sets: Vec<_> = requirements
            .iter()
            .zip(&entities)
            .map(|(requirement, entities)| {
                let classification = classifier.predict(&requirement.normalized_text)?;
                Ok(generate_scenario_set(&requirement.normalized_text, &classification, entities))
            })
            .collect::<Result<Vec<_>>>()?;
        println!("✅ Generated scenarios for {} requirements", scenario_sets.len());

        let synthesizer = TestCaseSynthesizer::new(self.config.generation.seed);
        let test_cases: Vec<TestCase> = synthesizer.generate(&scenario_sets);
        let metrics = calculate_metrics(&test_cases, requirements.len());

        let output_dir = &self.config.generation.output_dir;
        let output_file = report::write_test_cases_csv(&test_cases, output_dir)?;
        let report_file = if options.report {
            Some(report::write_markdown_report(&test_cases, &metrics, output_dir)?)
        } else {
            None
        };
        let json_file = if options.json {
            Some(report::write_test_cases_json(&test_cases, output_dir)?)
        } else {
            None
        };

        report::print_summary(&metrics);
        println!("\n📊 Test cases saved to {}", output_file.display());
        if let Some(path) = &report_file {
            println!("📄 Report saved to {}", path.display());
        }
        if let Some(path) = &json_file {
            println!("📄 JSON saved to {}", path.display());
        }

        Ok(RunOutput { output_file, report_file, json_file, metrics })
    }
}
