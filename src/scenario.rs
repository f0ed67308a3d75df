use serde::{Deserialize, Serialize};

use crate::classifier::ClassificationResult;
use crate::extractor::ExtractedEntities;
use crate::labeler::Category;

pub const DEFAULT_ACTOR: &str = "The user";
pub const DEFAULT_ACTION: &str = "perform the action";
pub const DEFAULT_OBJECT: &str = "the feature";

/// At most 5 scenario sentences survive per requirement.
pub const MAX_SCENARIOS: usize = 5;

/// One requirement's classified category, confidence, entities and the
/// ordered scenario sentences derived from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioSet {
    pub requirement: String,
    pub category: Category,
    pub confidence: f64,
    pub entities: ExtractedEntities,
    pub scenarios: Vec<String>,
}

/// Expand (category, entities) into the ordered scenario list.
///
/// Each category owns 5 fixed templates. A conditional-logic sentence is
/// appended when any condition keyword was detected, after which the list is
/// truncated to the first 5 in template order. Because the base lists already
/// hold 5 entries, the conditional sentence is dropped by truncation; that
/// exact behavior is preserved deliberately and pinned by a test.
pub fn generate_scenario_set(
    requirement: &str,
    classification: &ClassificationResult,
    entities: &ExtractedEntities,
) -> ScenarioSet {
    let scenarios = generate_scenarios(classification.category, entities);
    ScenarioSet {
        requirement: requirement.to_string(),
        category: classification.category,
        confidence: classification.confidence,
        entities: entities.clone(),
        scenarios,
    }
}

pub fn generate_scenarios(category: Category, entities: &ExtractedEntities) -> Vec<String> {
    let actor = entities.actor_or(DEFAULT_ACTOR);
    let action = entities.action_or(DEFAULT_ACTION);
    let object = entities.object_or(DEFAULT_OBJECT);

    let mut scenarios: Vec<String> = match category {
        Category::Functional => vec![
            format!("Verify that the {actor} can successfully {action} the {object}."),
            format!("Test the primary workflow for {action} the {object}."),
            format!("Check that the correct output is displayed after the {actor} completes {action}."),
            format!("Verify all UI elements related to {object} are present and functional."),
            format!("Test alternative paths for the {actor} to {action} the {object}."),
        ],
        Category::Negative => vec![
            format!("Test what happens if the {actor} tries to {action} with an invalid {object}."),
            format!("Verify error message when {actor} provides missing data for {action}."),
            format!("Test system behavior if the {actor} cancels the {action} mid-workflow."),
            format!("Test submitting malformed data when {actor} tries to {action} the {object}."),
            format!("Verify that the {actor} cannot {action} the {object} without proper permissions."),
        ],
        Category::Boundary => vec![
            format!("Test {action} with the minimum allowed value for {object}."),
            format!("Test {action} with the maximum allowed value for {object}."),
            format!("Test {action} with a value just below the minimum for {object}."),
            format!("Test {action} with a value just above the maximum for {object}."),
            format!("Test {action} with a typical or average value for {object}."),
        ],
        Category::Security => vec![
            format!("Verify that an unauthorized {actor} cannot {action} the {object}."),
            format!("Test for SQL injection vulnerabilities in input fields related to {object}."),
            format!("Verify {action} requires proper authentication."),
            format!("Test session management when the {actor} performs {action}."),
            format!("Check that sensitive data related to {object} is masked or encrypted."),
        ],
        Category::Performance => vec![
            format!("Measure the response time for the {actor} to {action} the {object} under normal load."),
            format!("Test system load when 100 concurrent {actor}s try to {action} the {object}."),
            format!("Verify that the {action} completes within the 3-second performance SLA."),
            format!("Measure system resource (CPU, memory) usage during the {action}."),
            format!("Test how the system handles sustained load while {actor}s repeatedly {action} the {object}."),
        ],
    };

    if let Some(condition) = entities.condition() {
        scenarios.push(format!(
            "Test conditional logic: Verify {action} {condition} the condition is met."
        ));
    }
    scenarios.truncate(MAX_SCENARIOS);
    scenarios
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::ExtractedEntities;

    #[test]
    fn test_scenario_count_never_exceeds_five() {
        for category in Category::ALL {
            let scenarios = generate_scenarios(category, &ExtractedEntities::default());
            assert!(scenarios.len() <= MAX_SCENARIOS);
        }
    }

    #[test]
    fn test_defaults_fill_missing_roles() {
        let scenarios = generate_scenarios(Category::Functional, &ExtractedEntities::default());
        assert!(scenarios[0].contains(DEFAULT_ACTOR));
        assert!(scenarios[0].contains(DEFAULT_ACTION));
        assert!(scenarios[0].contains(DEFAULT_OBJECT));
    }

    #[test]
    fn test_conditional_sentence_dropped_by_truncation() {
        // Documented edge case: the base lists already number 5, so the
        // conditional sentence lands in slot 6 and is removed by truncation.
        let mut entities = ExtractedEntities::default();
        entities.conditions.insert("when".to_string());
        let scenarios = generate_scenarios(Category::Functional, &entities);

        assert_eq!(scenarios.len(), MAX_SCENARIOS);
        assert!(!scenarios.iter().any(|s| s.contains("conditional logic")));
    }

    #[test]
    fn test_extracted_roles_are_substituted() {
        let mut entities = ExtractedEntities::default();
        entities.actors.insert("admin".to_string());
        entities.actions.insert("delete".to_string());
        entities.objects.insert("account".to_string());

        let scenarios = generate_scenarios(Category::Security, &entities);
        assert!(scenarios[0].contains("admin"));
        assert!(scenarios[0].contains("delete"));
        assert!(scenarios[0].contains("account"));
    }
}
