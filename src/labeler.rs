use serde::{Deserialize, Serialize};

/// Closed set of test-intent categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "functional_test")]
    Functional,
    #[serde(rename = "boundary_test")]
    Boundary,
    #[serde(rename = "negative_test")]
    Negative,
    #[serde(rename = "performance_test")]
    Performance,
    #[serde(rename = "security_test")]
    Security,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Functional,
        Category::Boundary,
        Category::Negative,
        Category::Performance,
        Category::Security,
    ];

    /// Dataset label, e.g. "security_test".
    pub fn label(&self) -> &'static str {
        match self {
            Category::Functional => "functional_test",
            Category::Boundary => "boundary_test",
            Category::Negative => "negative_test",
            Category::Performance => "performance_test",
            Category::Security => "security_test",
        }
    }

    /// Human-readable name used in generated test names, e.g. "Security".
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Functional => "Functional",
            Category::Boundary => "Boundary",
            Category::Negative => "Negative",
            Category::Performance => "Performance",
            Category::Security => "Security",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A weak-supervision training pair. Owned by the classifier during training
/// and discarded afterwards.
#[derive(Debug, Clone)]
pub struct LabeledExample {
    pub text: String,
    pub category: Category,
}

/// Ordered keyword cascade, first match wins. The order is significant:
/// "unauthorized login fails" must label as security, not negative.
const CATEGORY_RULES: &[(&[&str], Category)] = &[
    (
        &["login", "authenticate", "password", "permission", "unauthorized"],
        Category::Security,
    ),
    (
        &["performance", "speed", "load", "concurrent", "response time"],
        Category::Performance,
    ),
    (
        &["invalid", "error", "exception", "fail", "wrong"],
        Category::Negative,
    ),
    (
        &["maximum", "minimum", "limit", "boundary", "range"],
        Category::Boundary,
    ),
];

/// Assign a heuristic category to a requirement text.
///
/// This bootstraps training labels only; the intent classifier is trained to
/// generalize beyond these exact keywords. Matching is case-insensitive
/// substring membership.
pub fn weak_label(text: &str) -> Category {
    let lower = text.to_lowercase();
    for (keywords, category) in CATEGORY_RULES {
        if keywords.iter().any(|kw| lower.contains(kw)) {
            return *category;
        }
    }
    Category::Functional
}

/// Build the weak-supervision training set for a cleaned corpus.
pub fn build_training_data(texts: &[String]) -> Vec<LabeledExample> {
    texts
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| LabeledExample {
            text: t.clone(),
            category: weak_label(t),
        })
        .collect()
}
