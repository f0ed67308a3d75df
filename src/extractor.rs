use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Linguistic roles pulled out of one normalized requirement sentence.
///
/// All four collections are deduplicated sets with no meaningful order.
/// Consumers that need a single representative value must use the `*_or`
/// accessors, which pick the lexicographically smallest member, never
/// "first inserted".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractedEntities {
    pub actors: BTreeSet<String>,
    pub actions: BTreeSet<String>,
    pub objects: BTreeSet<String>,
    pub conditions: BTreeSet<String>,
}

impl ExtractedEntities {
    pub fn actor_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.actors.iter().next().map(String::as_str).unwrap_or(default)
    }

    pub fn action_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.actions.iter().next().map(String::as_str).unwrap_or(default)
    }

    pub fn object_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.objects.iter().next().map(String::as_str).unwrap_or(default)
    }

    pub fn condition(&self) -> Option<&str> {
        self.conditions.iter().next().map(String::as_str)
    }
}

/// Condition-trigger vocabulary. Matched as lowercase substring membership,
/// so "specified" deliberately triggers "if".
const CONDITION_KEYWORDS: [&str; 6] = ["if", "when", "while", "unless", "provided", "given"];

/// Nouns that take the subject role in requirement sentences.
const ACTOR_NOUNS: [&str; 22] = [
    "user", "users", "admin", "admins", "administrator", "administrators", "customer",
    "customers", "client", "clients", "operator", "operators", "manager", "managers",
    "visitor", "visitors", "member", "members", "tester", "developer", "system", "application",
];

/// Modal auxiliaries and the "be able to" chain skipped between subject and
/// main verb.
const AUXILIARIES: [&str; 13] = [
    "should", "must", "shall", "will", "would", "can", "could", "may", "might", "be", "able",
    "to", "not",
];

/// Adverbs commonly wedged between the auxiliary chain and the verb.
const ADVERBS: [&str; 8] = [
    "quickly", "easily", "successfully", "automatically", "securely", "correctly", "always",
    "only",
];

/// Main-verb vocabulary (lemma forms) for requirement sentences.
const VERB_LEMMAS: [&str; 48] = [
    "access", "add", "approve", "attach", "cancel", "click", "complete", "configure", "create",
    "delete", "display", "download", "edit", "enter", "export", "fill", "filter", "generate",
    "handle", "import", "load", "log", "login", "manage", "modify", "navigate", "perform",
    "print", "process", "receive", "register", "reject", "remove", "reset", "respond",
    "retrieve", "save", "search", "select", "send", "show", "sort", "store", "submit",
    "update", "upload", "validate", "view",
];

/// Function words excluded from the object role.
const OBJECT_STOPWORDS: [&str; 30] = [
    "the", "a", "an", "any", "all", "this", "that", "these", "those", "its", "their", "his",
    "her", "with", "within", "without", "of", "for", "in", "on", "at", "by", "and", "or", "it",
    "them", "so", "as", "again", "then",
];

pub struct EntityExtractor {
    word_pattern: Regex,
}

impl EntityExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            word_pattern: Regex::new(r"[A-Za-z][A-Za-z'\-]*")?,
        })
    }

    /// Extract actors, actions, objects and conditions from one normalized
    /// requirement. Extraction never fails: a role with no detectable token
    /// simply stays empty and downstream code supplies its own default.
    pub fn extract(&self, text: &str) -> ExtractedEntities {
        let mut entities = ExtractedEntities::default();
        let tokens: Vec<&str> = self.word_pattern.find_iter(text).map(|m| m.as_str()).collect();

        // 1. Grammatical pattern pass: actor [aux*] action [det*] object,
        //    covering both "user uploads file" and the modal variant
        //    "user should be able to upload a file".
        if let Some((actor, action, object)) = self.match_actor_action_object(&tokens) {
            entities.actors.insert(actor);
            entities.actions.insert(action);
            entities.objects.insert(object);
        }

        // 2. Whole-sentence fallback, independently per role. A role already
        //    populated by the pattern pass is left alone.
        if entities.actors.is_empty() {
            for token in &tokens {
                if is_actor_noun(token) {
                    entities.actors.insert((*token).to_string());
                }
            }
        }
        if entities.actions.is_empty() {
            for token in &tokens {
                let lemma = lemmatize(token);
                if VERB_LEMMAS.contains(&lemma.as_str()) {
                    entities.actions.insert(lemma);
                }
            }
        }
        if entities.objects.is_empty() {
            for candidate in self.object_candidates(&tokens) {
                entities.objects.insert(candidate);
            }
        }

        // 3. Fixed condition vocabulary scan.
        let lower = text.to_lowercase();
        for keyword in CONDITION_KEYWORDS {
            if lower.contains(keyword) {
                entities.conditions.insert(keyword.to_string());
            }
        }

        entities
    }

    /// Scan the token stream for the subject -> (auxiliaries) -> verb ->
    /// (determiners) -> noun shape. Returns (actor, action lemma, object).
    fn match_actor_action_object(&self, tokens: &[&str]) -> Option<(String, String, String)> {
        let subject_idx = tokens.iter().position(|t| is_actor_noun(t))?;

        // Skip the auxiliary/modal chain and interleaved adverbs after the
        // subject until a main verb shows up.
        let mut idx = subject_idx + 1;
        while idx < tokens.len() {
            let lower = tokens[idx].to_lowercase();
            if AUXILIARIES.contains(&lower.as_str()) || ADVERBS.contains(&lower.as_str()) {
                idx += 1;
                continue;
            }
            break;
        }
        let verb_idx = idx;
        if verb_idx >= tokens.len() {
            return None;
        }
        let lemma = lemmatize(tokens[verb_idx]);
        if !VERB_LEMMAS.contains(&lemma.as_str()) {
            return None;
        }

        // First content noun after the verb is the direct object.
        let object = tokens[verb_idx + 1..]
            .iter()
            .find(|t| is_object_noun(t))?
            .to_string();

        Some((tokens[subject_idx].to_string(), lemma, object))
    }

    /// Fallback object-role candidates: content nouns that directly follow a
    /// determiner or a verb, the closest approximation of the direct-object
    /// position without a full parse.
    fn object_candidates(&self, tokens: &[&str]) -> Vec<String> {
        let mut candidates = Vec::new();
        for window in tokens.windows(2) {
            let prev = window[0].to_lowercase();
            let current = window[1];
            let prev_is_anchor = matches!(prev.as_str(), "the" | "a" | "an")
                || VERB_LEMMAS.contains(&lemmatize(&prev).as_str());
            if prev_is_anchor && is_object_noun(current) {
                candidates.push(current.to_string());
            }
        }
        candidates
    }
}

fn is_actor_noun(token: &str) -> bool {
    ACTOR_NOUNS.contains(&token.to_lowercase().as_str())
}

fn is_object_noun(token: &str) -> bool {
    let lower = token.to_lowercase();
    !OBJECT_STOPWORDS.contains(&lower.as_str())
        && !AUXILIARIES.contains(&lower.as_str())
        && !ADVERBS.contains(&lower.as_str())
        && !is_actor_noun(token)
        && !VERB_LEMMAS.contains(&lemmatize(token).as_str())
        && !CONDITION_KEYWORDS.contains(&lower.as_str())
}

/// Reduce an inflected verb form to its lemma: a small irregular table plus
/// conventional suffix stripping. Only needs to cover the verb vocabulary
/// above, not general English.
pub fn lemmatize(token: &str) -> String {
    let lower = token.to_lowercase();
    match lower.as_str() {
        "is" | "are" | "was" | "were" | "been" => return "be".to_string(),
        "has" | "have" | "had" => return "have".to_string(),
        "does" | "did" | "done" => return "do".to_string(),
        "sent" => return "send".to_string(),
        "shown" => return "show".to_string(),
        _ => {}
    }

    if let Some(stem) = lower.strip_suffix("ies") {
        if stem.len() >= 2 {
            return format!("{}y", stem);
        }
    }
    for suffix in ["ing", "ed", "es", "s"] {
        if let Some(stem) = lower.strip_suffix(suffix) {
            if stem.len() < 3 {
                continue;
            }
            // "submitting" -> "submitt" -> "submit"
            let stem = stem.to_string();
            let bytes = stem.as_bytes();
            if (suffix == "ing" || suffix == "ed")
                && bytes.len() >= 2
                && bytes[bytes.len() - 1] == bytes[bytes.len() - 2]
                && !matches!(bytes[bytes.len() - 1], b'l' | b's')
            {
                return stem[..stem.len() - 1].to_string();
            }
            // "creating" -> "creat" -> "create"
            if suffix == "ing" || suffix == "ed" {
                let restored = format!("{}e", stem);
                if VERB_LEMMAS.contains(&restored.as_str()) {
                    return restored;
                }
            }
            return stem;
        }
    }
    lower
}
