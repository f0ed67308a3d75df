use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::labeler::Category;
use crate::testcase::TestCase;

/// Run-level coverage summary, recomputed from the full test-case set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metrics {
    /// Percentage of requirements that produced at least one test case.
    pub requirements_coverage: f64,
    pub total_test_cases: usize,
    pub category_distribution: BTreeMap<Category, usize>,
}

pub fn calculate_metrics(test_cases: &[TestCase], total_requirements: usize) -> Metrics {
    if total_requirements == 0 {
        return Metrics {
            requirements_coverage: 0.0,
            total_test_cases: 0,
            category_distribution: BTreeMap::new(),
        };
    }

    let covered: HashSet<&str> = test_cases.iter().map(|tc| tc.requirement_id.as_str()).collect();
    let coverage = covered.len() as f64 / total_requirements as f64 * 100.0;

    let mut category_distribution = BTreeMap::new();
    for case in test_cases {
        *category_distribution.entry(case.test_category).or_insert(0) += 1;
    }

    Metrics {
        requirements_coverage: coverage,
        total_test_cases: test_cases.len(),
        category_distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::ExtractedEntities;
    use crate::scenario::ScenarioSet;
    use crate::testcase::TestCaseSynthesizer;

    fn cases_for(categories: &[Category]) -> Vec<TestCase> {
        let sets: Vec<ScenarioSet> = categories
            .iter()
            .map(|&category| ScenarioSet {
                requirement: "req".to_string(),
                category,
                confidence: 0.9,
                entities: ExtractedEntities::default(),
                scenarios: vec!["scenario one".to_string(), "scenario two".to_string()],
            })
            .collect();
        TestCaseSynthesizer::new(0).generate(&sets)
    }

    #[test]
    fn test_distribution_sums_to_total() {
        let cases = cases_for(&[Category::Functional, Category::Security, Category::Security]);
        let metrics = calculate_metrics(&cases, 3);

        let sum: usize = metrics.category_distribution.values().sum();
        assert_eq!(sum, metrics.total_test_cases);
        assert_eq!(metrics.total_test_cases, 6);
    }

    #[test]
    fn test_full_coverage() {
        let cases = cases_for(&[Category::Functional, Category::Negative]);
        let metrics = calculate_metrics(&cases, 2);
        assert!((metrics.requirements_coverage - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_coverage_stays_in_range() {
        let cases = cases_for(&[Category::Functional]);
        let metrics = calculate_metrics(&cases, 4);

        assert!((metrics.requirements_coverage - 25.0).abs() < f64::EPSILON);
        assert!(metrics.requirements_coverage >= 0.0 && metrics.requirements_coverage <= 100.0);
    }

    #[test]
    fn test_empty_collection_yields_zero() {
        let metrics = calculate_metrics(&[], 0);
        assert_eq!(metrics.requirements_coverage, 0.0);
        assert_eq!(metrics.total_test_cases, 0);
        assert!(metrics.category_distribution.is_empty());

        let metrics = calculate_metrics(&[], 5);
        assert_eq!(metrics.requirements_coverage, 0.0);
    }
}
