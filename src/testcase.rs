use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::labeler::Category;
use crate::scenario::ScenarioSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

/// Priority is a pure step function of the confidence score.
pub fn priority_for(confidence: f64) -> Priority {
    if confidence >= 0.8 {
        Priority::High
    } else if confidence >= 0.6 {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// A fully synthesized test case, one per scenario sentence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    pub test_id: String,
    pub requirement_id: String,
    pub test_name: String,
    pub test_description: String,
    pub test_category: Category,
    pub priority: Priority,
    pub preconditions: String,
    pub test_steps: String,
    pub expected_result: String,
    pub confidence_score: f64,
}

/// Keyword-detected activity bucket used to pick specialized step phrasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ActivityContext {
    Upload,
    Search,
    Login,
    Form,
}

const CONTEXT_BUCKETS: &[(&[&str], ActivityContext)] = &[
    (&["upload", "attach", "file", "image", "document"], ActivityContext::Upload),
    (&["search", "find", "query", "filter", "sort"], ActivityContext::Search),
    (&["login", "log in", "sign in", "auth"], ActivityContext::Login),
    (&["submit", "fill", "enter", "form", "create", "update"], ActivityContext::Form),
];

/// Scan the scenario text and the action term for a context bucket,
/// first match wins in bucket order.
///
/// Single-word keywords must match at a word start: "auth" catches
/// "authenticate" and "authorization" but not "unauthorized", and "form"
/// catches "forms" but not "performance". Multi-word keywords ("log in")
/// stay plain substrings.
fn detect_context(scenario: &str, action: &str) -> Option<ActivityContext> {
    let haystack = format!("{} {}", scenario.to_lowercase(), action.to_lowercase());
    for (keywords, context) in CONTEXT_BUCKETS {
        let matched = keywords.iter().any(|kw| {
            if kw.contains(' ') {
                haystack.contains(kw)
            } else {
                haystack
                    .split(|c: char| !c.is_ascii_alphanumeric())
                    .any(|token| token.starts_with(kw))
            }
        });
        if matched {
            return Some(*context);
        }
    }
    None
}

/// Equivalent opening phrasings; one is picked per test case.
const SETUP_PHRASINGS: [&str; 3] = [
    "Open the application and navigate to the {object}.",
    "Launch the system and go to the {object}.",
    "Start from the landing page and locate the {object}.",
];

/// Equivalent closing phrasings referencing the literal scenario.
const CLOSING_PHRASINGS: [&str; 3] = [
    "Verify that the system behaves as described in the scenario: '{scenario}'",
    "Confirm that the observed behavior matches the scenario: '{scenario}'",
    "Check the final outcome against the scenario: '{scenario}'",
];

pub struct TestCaseSynthesizer {
    base_seed: u64,
}

impl TestCaseSynthesizer {
    pub fn new(base_seed: u64) -> Self {
        Self { base_seed }
    }

    /// Expand every scenario of every requirement into a flat test-case list,
    /// in (requirement, scenario) order.
    ///
    /// `requirement_id` is synthetic (`REQ_<n>` by position) and independent
    /// of any identifier the input dataset carried.
    pub fn generate(&self, scenario_sets: &[ScenarioSet]) -> Vec<TestCase> {
        let mut cases = Vec::new();
        for (i, set) in scenario_sets.iter().enumerate() {
            for (j, scenario) in set.scenarios.iter().enumerate() {
                cases.push(self.build_case(set, scenario, i, j));
            }
        }
        cases
    }

    fn build_case(
        &self,
        set: &ScenarioSet,
        scenario: &str,
        req_index: usize,
        scenario_index: usize,
    ) -> TestCase {
        // Independent random stream per test case, keyed by position, so
        // output is identical under a fixed seed regardless of execution
        // order.
        let mut rng = StdRng::seed_from_u64(
            self.base_seed ^ ((req_index as u64) << 16) ^ scenario_index as u64,
        );

        let confidence = round2(set.confidence);
        TestCase {
            test_id: format!("TC_{}_{}", req_index + 1, scenario_index + 1),
            requirement_id: format!("REQ_{}", req_index + 1),
            test_name: format!("{} Test {}", set.category.display_name(), scenario_index + 1),
            test_description: scenario.to_string(),
            test_category: set.category,
            priority: priority_for(confidence),
            preconditions: generate_preconditions(set),
            test_steps: generate_test_steps(set, scenario, &mut rng),
            expected_result: generate_expected_result(set),
            confidence_score: confidence,
        }
    }
}

/// Category-specific precondition list. The performance category swaps the
/// generic "system operational" entries for environment, load-tool and
/// monitoring readiness. A condition line is appended when the requirement
/// carried a condition keyword.
fn generate_preconditions(set: &ScenarioSet) -> String {
    let actor = set.entities.actor_or("user");
    let action = set.entities.action_or("action");
    let object = set.entities.object_or("feature");

    let mut lines: Vec<String> = match set.category {
        Category::Functional => vec![
            "The system is operational and reachable.".to_string(),
            format!("The {actor} has a valid account with access to the {object}."),
            format!("Valid test data required to {action} is available."),
        ],
        Category::Negative => vec![
            "The system is operational and reachable.".to_string(),
            format!("The {actor} is signed in and can reach the {object}."),
            format!("Invalid, malformed and incomplete input samples for the {action} are prepared."),
        ],
        Category::Boundary => vec![
            "The system is operational and reachable.".to_string(),
            format!("The documented minimum and maximum values for the {object} are known."),
            format!("The {actor} can reach the input field exercised by the {action}."),
        ],
        Category::Security => vec![
            "The system is operational and reachable.".to_string(),
            format!("An account without permission to {action} the {object} is available."),
            "Security and audit logging are enabled.".to_string(),
        ],
        Category::Performance => vec![
            "The performance test environment mirrors the production configuration.".to_string(),
            format!("The load-generation tool is installed and scripted for the {action}."),
            "Resource monitoring (CPU, memory, response time) is active.".to_string(),
        ],
    };

    if let Some(condition) = set.entities.condition() {
        lines.push(format!("The triggering condition ('{condition}') holds before execution."));
    }

    number_lines(&lines)
}

/// Assemble the step sequence: one setup line, 2-6 action lines branched on
/// category and activity context, one closing verification line. All lines
/// are renumbered sequentially after assembly.
fn generate_test_steps(set: &ScenarioSet, scenario: &str, rng: &mut StdRng) -> String {
    let actor = set.entities.actor_or("user");
    let action = set.entities.action_or("action");
    let object = set.entities.object_or("page/feature");

    let mut lines = Vec::new();

    let setup = SETUP_PHRASINGS[rng.gen_range(0..SETUP_PHRASINGS.len())];
    lines.push(setup.replace("{object}", object));

    let context = detect_context(scenario, action);
    lines.extend(action_lines(set.category, context, actor, action, object, scenario));

    let closing = CLOSING_PHRASINGS[rng.gen_range(0..CLOSING_PHRASINGS.len())];
    lines.push(closing.replace("{scenario}", scenario));

    number_lines(&lines)
}

fn action_lines(
    category: Category,
    context: Option<ActivityContext>,
    actor: &str,
    action: &str,
    object: &str,
    scenario: &str,
) -> Vec<String> {
    match context {
        Some(ActivityContext::Upload) => vec![
            format!("Prepare a representative test file for the {object}."),
            format!("As a(n) {actor}, attach the file and start the {action}."),
            "Wait for the transfer to finish and note any progress feedback.".to_string(),
            format!("Exercise the variation described in the scenario: '{scenario}'"),
        ],
        Some(ActivityContext::Search) => vec![
            format!("As a(n) {actor}, enter the search terms relevant to the {object}."),
            format!("Apply the {action} and any available filters or sort orders."),
            format!("Exercise the variation described in the scenario: '{scenario}'"),
            "Inspect the result list for completeness and ordering.".to_string(),
        ],
        Some(ActivityContext::Login) => vec![
            format!("As a(n) {actor}, open the sign-in form for the {object}."),
            format!("Enter the credentials called for by the scenario and {action}."),
            format!("Exercise the variation described in the scenario: '{scenario}'"),
            "Note the session state and any message shown after the attempt.".to_string(),
        ],
        Some(ActivityContext::Form) => vec![
            format!("As a(n) {actor}, fill in the form fields of the {object}."),
            format!("Provide the data called for by the scenario and initiate the {action}."),
            format!("Exercise the variation described in the scenario: '{scenario}'"),
            "Observe validation feedback on each field before and after submission.".to_string(),
        ],
        None => generic_lines(category, actor, action, scenario),
    }
}

/// Generic per-category step bodies used when no activity context matches.
fn generic_lines(category: Category, actor: &str, action: &str, scenario: &str) -> Vec<String> {
    match category {
        Category::Functional => vec![
            format!("As a(n) {actor}, provide all necessary valid data to perform the {action}."),
            format!("Initiate the {action} (e.g., click 'Submit', 'Save', or 'Run')."),
            "Observe the system's response.".to_string(),
        ],
        Category::Negative => vec![
            format!("As a(n) {actor}, attempt the {action} using invalid, malformed, or incomplete data."),
            format!("For example: {scenario}"),
            format!("Initiate the {action} and observe the system's response."),
            "Confirm the system remains stable and responsive.".to_string(),
        ],
        Category::Boundary => vec![
            format!("As a(n) {actor}, enter the specific boundary value described in the scenario."),
            format!("For example: {scenario}"),
            format!("Attempt to {action} with this value and observe the response."),
        ],
        Category::Security => vec![
            format!("As a(n) {actor} without the required privileges, attempt the {action}."),
            format!("For example: {scenario}"),
            "Observe all system responses, including UI messages and network responses.".to_string(),
            "Check system logs to confirm the attempt was recorded.".to_string(),
        ],
        Category::Performance => vec![
            format!("Begin with a single {actor} to establish a baseline response time for the {action}."),
            format!("Gradually increase the load to the level described in the scenario."),
            "Measure response time, throughput and resource (CPU, memory) usage.".to_string(),
            "Hold the target load long enough to expose degradation over time.".to_string(),
        ],
    }
}

/// One sentence per category family referencing the extracted roles.
fn generate_expected_result(set: &ScenarioSet) -> String {
    let actor = set.entities.actor_or("user");
    let action = set.entities.action_or("action");
    let object = set.entities.object_or("feature");

    match set.category {
        Category::Negative => format!(
            "The system should prevent the {actor} from completing the {action} and display a clear, user-friendly error message."
        ),
        Category::Security => format!(
            "The system should block the unauthorized {action} and log the security attempt. The {actor} should not gain access to {object}."
        ),
        Category::Performance => format!(
            "The {action} should complete within the defined performance SLA (e.g., under 3 seconds) and the system should remain stable."
        ),
        Category::Functional | Category::Boundary => format!(
            "The {actor} should be able to complete the {action} successfully. The state of the {object} should be updated correctly as described in the requirement."
        ),
    }
}

fn number_lines(lines: &[String]) -> String {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{}. {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::ExtractedEntities;
    use crate::scenario::ScenarioSet;

    fn scenario_set(category: Category, confidence: f64) -> ScenarioSet {
        ScenarioSet {
            requirement: "The user can upload a document".to_string(),
            category,
            confidence,
            entities: ExtractedEntities::default(),
            scenarios: vec!["Verify that the user can upload a document.".to_string()],
        }
    }

    #[test]
    fn test_priority_thresholds() {
        assert_eq!(priority_for(0.80), Priority::High);
        assert_eq!(priority_for(0.79), Priority::Medium);
        assert_eq!(priority_for(0.60), Priority::Medium);
        assert_eq!(priority_for(0.59), Priority::Low);
        assert_eq!(priority_for(0.0), Priority::Low);
        assert_eq!(priority_for(1.0), Priority::High);
    }

    #[test]
    fn test_fixed_seed_is_idempotent() {
        let set = scenario_set(Category::Functional, 0.9);
        let first = TestCaseSynthesizer::new(1234).generate(std::slice::from_ref(&set));
        let second = TestCaseSynthesizer::new(1234).generate(std::slice::from_ref(&set));

        assert_eq!(first[0].test_steps, second[0].test_steps);
        assert_eq!(first[0].preconditions, second[0].preconditions);
    }

    #[test]
    fn test_upload_context_is_detected() {
        assert_eq!(
            detect_context("Verify that the user can upload a document.", "action"),
            Some(ActivityContext::Upload)
        );
        assert_eq!(
            detect_context("Verify the report", "search"),
            Some(ActivityContext::Search)
        );
        assert_eq!(detect_context("Verify the report totals", "review"), None);
    }

    #[test]
    fn test_context_keywords_match_at_word_starts() {
        assert_eq!(
            detect_context("Verify that an unauthorized user cannot delete the record.", "delete"),
            None
        );
        assert_eq!(
            detect_context("Verify delete requires proper authentication.", "delete"),
            Some(ActivityContext::Login)
        );
        assert_eq!(
            detect_context("Verify performance while performing the action.", "review"),
            None
        );
    }

    #[test]
    fn test_unauthorized_security_scenario_keeps_security_steps() {
        let mut set = scenario_set(Category::Security, 0.9);
        set.scenarios =
            vec!["Verify that an unauthorized user cannot delete the record.".to_string()];
        let cases = TestCaseSynthesizer::new(0).generate(std::slice::from_ref(&set));

        assert!(cases[0].test_steps.contains("without the required privileges"));
        assert!(!cases[0].test_steps.contains("sign-in form"));
    }

    #[test]
    fn test_steps_are_sequentially_numbered() {
        let set = scenario_set(Category::Negative, 0.7);
        let cases = TestCaseSynthesizer::new(0).generate(std::slice::from_ref(&set));
        let steps: Vec<&str> = cases[0].test_steps.lines().collect();

        assert!(steps.len() >= 4 && steps.len() <= 8);
        for (i, line) in steps.iter().enumerate() {
            assert!(line.starts_with(&format!("{}. ", i + 1)));
        }
        // Closing line carries the literal scenario text.
        assert!(steps.last().unwrap().contains("Verify that the user can upload a document."));
    }

    #[test]
    fn test_performance_preconditions_replace_operational_steps() {
        let set = scenario_set(Category::Performance, 0.9);
        let cases = TestCaseSynthesizer::new(0).generate(std::slice::from_ref(&set));

        assert!(!cases[0].preconditions.contains("operational"));
        assert!(cases[0].preconditions.contains("load-generation tool"));
        assert!(cases[0].preconditions.contains("monitoring"));
    }

    #[test]
    fn test_condition_line_appended_to_preconditions() {
        let mut set = scenario_set(Category::Functional, 0.9);
        set.entities.conditions.insert("when".to_string());
        let cases = TestCaseSynthesizer::new(0).generate(std::slice::from_ref(&set));

        assert!(cases[0].preconditions.contains("triggering condition ('when')"));
    }

    #[test]
    fn test_missing_roles_use_defaults_without_crashing() {
        let set = scenario_set(Category::Functional, 0.5);
        let cases = TestCaseSynthesizer::new(0).generate(std::slice::from_ref(&set));

        assert!(cases[0].test_steps.contains("user"));
        assert!(!cases[0].test_steps.contains("{object}"));
        assert!(!cases[0].expected_result.is_empty());
    }

    #[test]
    fn test_confidence_rounded_to_two_decimals() {
        let set = scenario_set(Category::Functional, 0.8349);
        let cases = TestCaseSynthesizer::new(0).generate(std::slice::from_ref(&set));
        assert_eq!(cases[0].confidence_score, 0.83);
    }

    #[test]
    fn test_ids_follow_position() {
        let sets = vec![
            scenario_set(Category::Functional, 0.9),
            scenario_set(Category::Security, 0.9),
        ];
        let cases = TestCaseSynthesizer::new(0).generate(&sets);

        assert_eq!(cases[0].test_id, "TC_1_1");
        assert_eq!(cases[0].requirement_id, "REQ_1");
        assert_eq!(cases[1].test_id, "TC_2_1");
        assert_eq!(cases[1].requirement_id, "REQ_2");
        assert_eq!(cases[1].test_name, "Security Test 1");
    }
}
