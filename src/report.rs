use anyhow::Result;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

use crate::metrics::Metrics;
use crate::testcase::TestCase;

/// Write the generated test cases as a CSV dataset and return its path.
pub fn write_test_cases_csv(test_cases: &[TestCase], output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let output_path = output_dir.join("generated_test_cases.csv");

    let mut writer = csv::Writer::from_path(&output_path)?;
    for case in test_cases {
        writer.serialize(case)?;
    }
    writer.flush()?;

    Ok(output_path)
}

/// Write the generated test cases as a pretty-printed JSON array and return
/// its path. Same records as the CSV, for consumers that want structured
/// fields instead of flattened strings.
pub fn write_test_cases_json(test_cases: &[TestCase], output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let output_path = output_dir.join("generated_test_cases.json");

    let file = fs::File::create(&output_path)?;
    serde_json::to_writer_pretty(file, test_cases)?;

    Ok(output_path)
}

/// Print the coverage summary in the run log.
pub fn print_summary(metrics: &Metrics) {
    println!("{}", "=".repeat(60));
    println!("📈 COVERAGE SUMMARY");
    println!("{}", "=".repeat(60));
    println!("Requirements Coverage: {:.1}%", metrics.requirements_coverage);
    println!("Total Test Cases: {}", metrics.total_test_cases);

    if !metrics.category_distribution.is_empty() {
        println!("\nTest Category Distribution:");
        for (category, count) in &metrics.category_distribution {
            println!(" - {}: {}", category, count);
        }
    }
}

/// Render a markdown report with the summary table and a sample of the
/// generated cases.
pub fn format_markdown_report(test_cases: &[TestCase], metrics: &Metrics) -> String {
    let mut output = String::new();

    output.push_str("# 🧪 Test Case Generation Report\n\n");
    output.push_str(&format!("*Generated on: {}*\n\n", Local::now().format("%Y-%m-%d %H:%M:%S")));

    output.push_str("## 📈 Coverage Summary\n\n");
    output.push_str(&format!(
        "- **Requirements Coverage:** {:.1}%\n",
        metrics.requirements_coverage
    ));
    output.push_str(&format!("- **Total Test Cases:** {}\n\n", metrics.total_test_cases));

    if !metrics.category_distribution.is_empty() {
        output.push_str("## 📊 Category Distribution\n\n");
        output.push_str("| Category | Test Cases |\n");
        output.push_str("|----------|------------|\n");
        for (category, count) in &metrics.category_distribution {
            output.push_str(&format!("| {} | {} |\n", category, count));
        }
        output.push('\n');
    }

    if !test_cases.is_empty() {
        output.push_str("## 📝 Generated Test Cases\n\n");
        for case in test_cases {
            output.push_str(&format!("### {} — {}\n\n", case.test_id, case.test_name));
            output.push_str(&format!("**Requirement:** {}\n\n", case.requirement_id));
            output.push_str(&format!("**Description:** {}\n\n", case.test_description));
            output.push_str(&format!(
                "**Category:** {} | **Priority:** {} | **Confidence:** {:.2}\n\n",
                case.test_category, case.priority, case.confidence_score
            ));
            output.push_str("**Preconditions:**\n\n");
            output.push_str(&format!("```\n{}\n```\n\n", case.preconditions));
            output.push_str("**Steps:**\n\n");
            output.push_str(&format!("```\n{}\n```\n\n", case.test_steps));
            output.push_str(&format!("**Expected Result:** {}\n\n", case.expected_result));
        }
    }

    output
}

pub fn write_markdown_report(
    test_cases: &[TestCase],
    metrics: &Metrics,
    output_dir: &Path,
) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let output_path = output_dir.join("test_case_report.md");
    fs::write(&output_path, format_markdown_report(test_cases, metrics))?;
    Ok(output_path)
}
