use anyhow::Result;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::GeneratorError;
use crate::labeler::{Category, LabeledExample};

const VOCABULARY_LIMIT: usize = 1000;
const TEST_FRACTION: f64 = 0.3;
const SPLIT_SEED: u64 = 42;

/// Closed-class English stop words removed before vectorization.
const STOP_WORDS: [&str; 60] = [
    "a", "an", "the", "and", "or", "but", "if", "then", "else", "when", "while", "of", "at",
    "by", "for", "with", "about", "to", "from", "in", "on", "off", "over", "under", "again",
    "once", "here", "there", "all", "any", "both", "each", "few", "more", "most", "other",
    "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than", "too", "very",
    "is", "are", "was", "were", "be", "been", "being", "it", "its", "this", "that", "as",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    /// Maximum predicted class probability; 1.0 for the constant model.
    pub confidence: f64,
}

/// Term-frequency vectorizer with a capped vocabulary.
#[derive(Debug, Clone)]
pub struct TfVectorizer {
    vocabulary: Vec<String>,
    index: HashMap<String, usize>,
}

impl TfVectorizer {
    /// Build the vocabulary from the training texts: stop words removed,
    /// capped at the most frequent 1000 terms. Frequency ties break on the
    /// term itself so the vocabulary is deterministic.
    pub fn fit(texts: &[&str]) -> Self {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for text in texts {
            for term in tokenize(text) {
                *counts.entry(term).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(VOCABULARY_LIMIT);

        let mut vocabulary: Vec<String> = ranked.into_iter().map(|(term, _)| term).collect();
        vocabulary.sort();

        let index = vocabulary
            .iter()
            .enumerate()
            .map(|(i, term)| (term.clone(), i))
            .collect();

        Self { vocabulary, index }
    }

    pub fn transform(&self, text: &str) -> Vec<f64> {
        let mut vector = vec![0.0; self.vocabulary.len()];
        for term in tokenize(text) {
            if let Some(&i) = self.index.get(&term) {
                vector[i] += 1.0;
            }
        }
        vector
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 1)
        .map(|w| w.to_lowercase())
        .filter(|w| !STOP_WORDS.contains(&w.as_str()))
        .collect()
}

/// Multinomial naive Bayes with Laplace smoothing over TF vectors.
#[derive(Debug, Clone)]
pub struct NaiveBayesModel {
    classes: Vec<Category>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
}

impl NaiveBayesModel {
    pub fn fit(vectors: &[Vec<f64>], labels: &[Category]) -> Self {
        let mut classes: Vec<Category> = labels.to_vec();
        classes.sort();
        classes.dedup();

        let n_features = vectors.first().map(Vec::len).unwrap_or(0);
        let n_samples = vectors.len() as f64;

        let mut class_log_prior = Vec::with_capacity(classes.len());
        let mut feature_log_prob = Vec::with_capacity(classes.len());

        for class in &classes {
            let member_vectors: Vec<&Vec<f64>> = vectors
                .iter()
                .zip(labels)
                .filter(|(_, label)| *label == class)
                .map(|(v, _)| v)
                .collect();

            class_log_prior.push((member_vectors.len() as f64 / n_samples).ln());

            let mut term_counts = vec![0.0; n_features];
            for vector in &member_vectors {
                for (i, value) in vector.iter().enumerate() {
                    term_counts[i] += value;
                }
            }
            let total: f64 = term_counts.iter().sum::<f64>() + n_features as f64;
            feature_log_prob.push(
                term_counts
                    .iter()
                    .map(|count| ((count + 1.0) / total).ln())
                    .collect(),
            );
        }

        Self { classes, class_log_prior, feature_log_prob }
    }

    pub fn predict(&self, vector: &[f64]) -> (Category, f64) {
        let probabilities = self.predict_proba(vector);
        let (best, confidence) = self
            .classes
            .iter()
            .zip(&probabilities)
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(class, p)| (*class, *p))
            .unwrap_or((Category::Functional, 1.0));
        (best, confidence)
    }

    /// Normalized class posteriors, computed in log space for stability.
    pub fn predict_proba(&self, vector: &[f64]) -> Vec<f64> {
        let log_posteriors: Vec<f64> = self
            .classes
            .iter()
            .enumerate()
            .map(|(c, _)| {
                let mut lp = self.class_log_prior[c];
                for (i, value) in vector.iter().enumerate() {
                    if *value > 0.0 {
                        lp += value * self.feature_log_prob[c][i];
                    }
                }
                lp
            })
            .collect();

        let max = log_posteriors.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = log_posteriors.iter().map(|lp| (lp - max).exp()).collect();
        let sum: f64 = exps.iter().sum();
        exps.into_iter().map(|e| e / sum).collect()
    }
}

/// The fitted prediction surface: either a real trained model or the
/// constant fallback installed when the weak labels lack diversity. Both
/// honor the same predict contract.
pub enum IntentModel {
    Trained {
        vectorizer: TfVectorizer,
        model: NaiveBayesModel,
    },
    Constant(Category),
}

impl IntentModel {
    pub fn predict(&self, text: &str) -> ClassificationResult {
        match self {
            IntentModel::Trained { vectorizer, model } => {
                let vector = vectorizer.transform(text);
                let (category, confidence) = model.predict(&vector);
                ClassificationResult { category, confidence }
            }
            // The constant model has no probability surface; confidence is
            // defined as 1.0.
            IntentModel::Constant(category) => ClassificationResult {
                category: *category,
                confidence: 1.0,
            },
        }
    }
}

pub struct IntentClassifier {
    model: Option<IntentModel>,
    split_seed: u64,
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self { model: None, split_seed: SPLIT_SEED }
    }

    #[cfg(test)]
    pub fn with_split_seed(seed: u64) -> Self {
        Self { model: None, split_seed: seed }
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    /// Train on the weak-supervision corpus.
    ///
    /// Single-category corpora fall back to a constant model instead of
    /// failing; an empty corpus is a fatal precondition. The held-out quality
    /// summary is informational only and not consumed downstream.
    pub fn train(&mut self, examples: &[LabeledExample]) -> Result<()> {
        if examples.is_empty() {
            return Err(GeneratorError::EmptyCorpus.into());
        }

        let mut distinct: Vec<Category> = examples.iter().map(|e| e.category).collect();
        distinct.sort();
        distinct.dedup();

        if distinct.len() < 2 {
            let only = distinct[0];
            eprintln!(
                "⚠️  {}",
                GeneratorError::InsufficientLabelDiversity(only)
            );
            eprintln!("   Falling back to a constant classifier ({})", only);
            self.model = Some(IntentModel::Constant(only));
            return Ok(());
        }

        let texts: Vec<&str> = examples.iter().map(|e| e.text.as_str()).collect();
        let vectorizer = TfVectorizer::fit(&texts);
        let vectors: Vec<Vec<f64>> = texts.iter().map(|t| vectorizer.transform(t)).collect();
        let labels: Vec<Category> = examples.iter().map(|e| e.category).collect();

        let (train_idx, test_idx) = self.split(&labels);

        let train_vectors: Vec<Vec<f64>> = train_idx.iter().map(|&i| vectors[i].clone()).collect();
        let train_labels: Vec<Category> = train_idx.iter().map(|&i| labels[i]).collect();
        let model = NaiveBayesModel::fit(&train_vectors, &train_labels);

        if !test_idx.is_empty() {
            let predictions: Vec<Category> = test_idx
                .iter()
                .map(|&i| model.predict(&vectors[i]).0)
                .collect();
            let actual: Vec<Category> = test_idx.iter().map(|&i| labels[i]).collect();
            print_classification_report(&actual, &predictions);
        }

        self.model = Some(IntentModel::Trained { vectorizer, model });
        Ok(())
    }

    /// Predict category and confidence for one requirement text.
    pub fn predict(&self, text: &str) -> Result<ClassificationResult> {
        let model = self.model.as_ref().ok_or(GeneratorError::UntrainedModel)?;
        Ok(model.predict(text))
    }

    /// Hold-out split over example indices. Stratified per class when every
    /// class has at least 2 members; otherwise a plain shuffled split with a
    /// warning naming the thin classes.
    fn split(&self, labels: &[Category]) -> (Vec<usize>, Vec<usize>) {
        let mut by_class: HashMap<Category, Vec<usize>> = HashMap::new();
        for (i, label) in labels.iter().enumerate() {
            by_class.entry(*label).or_default().push(i);
        }

        let mut thin: Vec<Category> = by_class
            .iter()
            .filter(|(_, members)| members.len() < 2)
            .map(|(c, _)| *c)
            .collect();
        thin.sort();

        let mut rng = StdRng::seed_from_u64(self.split_seed);
        let mut train = Vec::new();
        let mut test = Vec::new();

        if thin.is_empty() {
            // Stratified: classes processed in a fixed order so the split is
            // reproducible under the seed.
            let mut classes: Vec<Category> = by_class.keys().copied().collect();
            classes.sort();
            for class in classes {
                let mut members = by_class.remove(&class).unwrap_or_default();
                members.shuffle(&mut rng);
                let mut n_test = (members.len() as f64 * TEST_FRACTION).round() as usize;
                n_test = n_test.clamp(1, members.len() - 1);
                test.extend(members.drain(..n_test));
                train.extend(members);
            }
        } else {
            eprintln!("⚠️  {}", GeneratorError::StratificationInfeasible(thin));
            eprintln!("   Falling back to a non-stratified split");
            let mut indices: Vec<usize> = (0..labels.len()).collect();
            indices.shuffle(&mut rng);
            let mut n_test = (indices.len() as f64 * TEST_FRACTION).round() as usize;
            if indices.len() >= 2 {
                n_test = n_test.clamp(1, indices.len() - 1);
            } else {
                n_test = 0;
            }
            test.extend(indices.drain(..n_test));
            train.extend(indices);
        }

        (train, test)
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-class precision/recall/F1 plus accuracy, printed in the run log.
fn print_classification_report(actual: &[Category], predicted: &[Category]) {
    println!("\n📊 Model Performance Summary:");
    println!("   {:<18} {:>9} {:>7} {:>9} {:>8}", "category", "precision", "recall", "f1-score", "support");

    let mut present: Vec<Category> = actual.to_vec();
    present.extend_from_slice(predicted);
    present.sort();
    present.dedup();

    for class in &present {
        let tp = actual
            .iter()
            .zip(predicted)
            .filter(|(a, p)| **a == *class && **p == *class)
            .count() as f64;
        let predicted_positive = predicted.iter().filter(|p| **p == *class).count() as f64;
        let support = actual.iter().filter(|a| **a == *class).count();

        let precision = if predicted_positive > 0.0 { tp / predicted_positive } else { 0.0 };
        let recall = if support > 0 { tp / support as f64 } else { 0.0 };
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        println!(
            "   {:<18} {:>9.2} {:>7.2} {:>9.2} {:>8}",
            class.label(),
            precision,
            recall,
            f1,
            support
        );
    }

    let correct = actual.iter().zip(predicted).filter(|(a, p)| a == p).count();
    println!("   accuracy: {:.2} ({}/{})", correct as f64 / actual.len() as f64, correct, actual.len());
}
