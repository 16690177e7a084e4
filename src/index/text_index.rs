//! Term-frequency index over node text, used for relevance search and similarity.

use std::collections::{HashMap, HashSet};

/// Sparse term-frequency vector.
pub type TermVector = HashMap<String, f32>;

/// Per-node term vectors plus an inverted term -> names map.
#[derive(Debug)]
pub struct TextIndex {
    vectors: HashMap<String, TermVector>,
    postings: HashMap<String, HashSet<String>>,
}

/// Split text into lowercase alphanumeric terms.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Build a term-frequency vector from text.
pub fn term_vector(text: &str) -> TermVector {
    let mut vector = TermVector::new();
    for term in tokenize(text) {
        *vector.entry(term).or_insert(0.0) += 1.0;
    }
    vector
}

/// Cosine similarity between two sparse vectors. Returns 0.0 if either is empty.
pub fn cosine_similarity(a: &TermVector, b: &TermVector) -> f32 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let mut dot = 0.0f32;
    for (term, weight) in small {
        if let Some(other) = large.get(term) {
            dot += weight * other;
        }
    }
    let norm_a: f32 = a.values().map(|v| v * v).sum();
    let norm_b: f32 = b.values().map(|v| v * v).sum();
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        (dot / denom).clamp(0.0, 1.0)
    }
}

impl TextIndex {
    /// Create a new, empty text index.
    pub fn new() -> Self {
        Self {
            vectors: HashMap::new(),
            postings: HashMap::new(),
        }
    }

    /// Index (or re-index) a node's text.
    pub fn insert(&mut self, name: &str, text: &str) {
        self.remove(name);
        let vector = term_vector(text);
        for term in vector.keys() {
            self.postings
                .entry(term.clone())
                .or_default()
                .insert(name.to_string());
        }
        self.vectors.insert(name.to_string(), vector);
    }

    /// Drop a node from the index.
    pub fn remove(&mut self, name: &str) {
        if let Some(vector) = self.vectors.remove(name) {
            for term in vector.keys() {
                if let Some(names) = self.postings.get_mut(term) {
                    names.remove(name);
                    if names.is_empty() {
                        self.postings.remove(term);
                    }
                }
            }
        }
    }

    /// Relevance of every node matching at least one query term.
    ///
    /// Score = fraction of distinct query terms the node contains, plus 1.0
    /// for an exact (case-insensitive) name match or 0.5 when the name
    /// contains the query. Sorted best first, ties by name.
    pub fn search(&self, query: &str) -> Vec<(String, f32)> {
        let terms: HashSet<String> = tokenize(query).into_iter().collect();
        if terms.is_empty() {
            return Vec::new();
        }

        let mut hits: HashMap<&str, usize> = HashMap::new();
        for term in &terms {
            if let Some(names) = self.postings.get(term) {
                for name in names {
                    *hits.entry(name.as_str()).or_insert(0) += 1;
                }
            }
        }

        let needle = query.trim().to_lowercase();
        let mut scored: Vec<(String, f32)> = hits
            .into_iter()
            .map(|(name, count)| {
                let mut score = count as f32 / terms.len() as f32;
                let lowered = name.to_lowercase();
                if lowered == needle {
                    score += 1.0;
                } else if lowered.contains(&needle) {
                    score += 0.5;
                }
                (name.to_string(), score)
            })
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored
    }

    /// Nodes most similar to `name`, excluding it, best first, ties by name.
    pub fn similar_to(&self, name: &str) -> Vec<(String, f32)> {
        let Some(target) = self.vectors.get(name) else {
            return Vec::new();
        };

        let mut candidates: HashSet<&str> = HashSet::new();
        for term in target.keys() {
            if let Some(names) = self.postings.get(term) {
                candidates.extend(names.iter().map(String::as_str));
            }
        }
        candidates.remove(name);

        let mut scored: Vec<(String, f32)> = candidates
            .into_iter()
            .filter_map(|other| {
                let vector = self.vectors.get(other)?;
                let sim = cosine_similarity(target, vector);
                (sim > 0.0).then(|| (other.to_string(), sim))
            })
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        scored
    }
}

impl Default for TextIndex {
    fn default() -> Self {
        Self::new()
    }
}
