//! Topic coherence against a reference corpus.
//!
//! Each document of the reference corpus is one co-occurrence window, which
//! suits short texts. `D(w)` counts documents containing `w`, `D(w, v)`
//! documents containing both, and `P(·) = D(·) / N`.
//!
//! | Metric | Pair measure | Pairs | Range |
//! |--------|--------------|-------|-------|
//! | `u_mass` | `ln((D(w_i, w_j) + ε) / D(w_j))` | `j < i` | (-∞, 0] |
//! | `c_uci` | `ln((P(w_i, w_j) + ε) / (P(w_i) P(w_j)))` | all `i ≠ j` | (-∞, ∞) |
//! | `c_npmi` | PMI normalized by `-ln P(w_i, w_j)` | all `i ≠ j` | [-1, 1] |
//! | `c_v` | cosine of NPMI context vectors, one word against the set | every word | [-1, 1] |
//!
//! Topic words missing from the reference corpus are ignored. A topic with
//! fewer than two remaining words has no coherence.

use crate::corpus::Corpus;
use crate::dmm::Topic;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

const EPSILON: f64 = 1e-12;

/// Coherence measure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoherenceMetric {
    /// Document-ordered log conditional probability.
    #[serde(rename = "u_mass")]
    UMass,
    /// Pointwise mutual information.
    #[serde(rename = "c_uci")]
    CUci,
    /// Normalized pointwise mutual information.
    #[serde(rename = "c_npmi")]
    CNpmi,
    /// Indirect cosine over NPMI vectors.
    #[default]
    #[serde(rename = "c_v")]
    CV,
}

impl CoherenceMetric {
    /// Wire name of the metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UMass => "u_mass",
            Self::CUci => "c_uci",
            Self::CNpmi => "c_npmi",
            Self::CV => "c_v",
        }
    }
}

impl fmt::Display for CoherenceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoherenceMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "u_mass" | "umass" => Ok(Self::UMass),
            "c_uci" | "uci" => Ok(Self::CUci),
            "c_npmi" | "npmi" => Ok(Self::CNpmi),
            "c_v" | "cv" => Ok(Self::CV),
            _ => Err(Error::InvalidParameter {
                name: "metric",
                message: "expected one of u_mass, c_uci, c_npmi, c_v",
            }),
        }
    }
}

/// Coherence of every topic of a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coherence {
    /// Measure used.
    pub metric: CoherenceMetric,
    /// One entry per topic; `None` when too few of its words occur in the
    /// reference corpus.
    pub per_topic: Vec<Option<f64>>,
    /// Mean over the topics that have a value.
    pub mean: Option<f64>,
}

/// Score `topics` against co-occurrence in `reference`.
///
/// ```rust
/// use shorttopic::coherence::{coherence, CoherenceMetric};
/// use shorttopic::{Corpus, Topic};
///
/// let reference = Corpus::from_lines(["a b", "a b", "c d"]);
/// let topics = vec![
///     Topic::from_iter([("a".to_string(), 0.5), ("b".to_string(), 0.5)]),
///     Topic::from_iter([("a".to_string(), 0.5), ("d".to_string(), 0.5)]),
/// ];
/// let c = coherence(&topics, &reference, CoherenceMetric::CNpmi).unwrap();
/// assert!(c.per_topic[0] > c.per_topic[1]);
/// ```
pub fn coherence(
    topics: &[Topic],
    reference: &Corpus,
    metric: CoherenceMetric,
) -> Result<Coherence> {
    if reference.is_empty() {
        return Err(Error::EmptyInput);
    }

    let counts = CoOccurrence::count(topics, reference);
    let per_topic: Vec<Option<f64>> = topics
        .iter()
        .map(|topic| {
            let ids: Vec<usize> = topic
                .words
                .iter()
                .filter_map(|w| counts.index.get(w.as_str()).copied())
                .filter(|&i| counts.doc_freq[i] > 0)
                .collect();
            if ids.len() < 2 {
                return None;
            }
            Some(match metric {
                CoherenceMetric::UMass => counts.u_mass(&ids),
                CoherenceMetric::CUci => counts.mean_pairwise(&ids, |c, i, j| c.pmi(i, j)),
                CoherenceMetric::CNpmi => counts.mean_pairwise(&ids, |c, i, j| c.npmi(i, j)),
                CoherenceMetric::CV => counts.c_v(&ids),
            })
        })
        .collect();

    let scored: Vec<f64> = per_topic.iter().flatten().copied().collect();
    let mean = (!scored.is_empty()).then(|| scored.iter().sum::<f64>() / scored.len() as f64);

    log::debug!(
        "{} coherence over {} topics ({} scored) against {} documents",
        metric,
        topics.len(),
        scored.len(),
        reference.len()
    );

    Ok(Coherence {
        metric,
        per_topic,
        mean,
    })
}

/// Document frequencies of the topic words and of their pairs.
struct CoOccurrence<'a> {
    n_docs: f64,
    index: HashMap<&'a str, usize>,
    doc_freq: Vec<usize>,
    joint: HashMap<(usize, usize), usize>,
}

impl<'a> CoOccurrence<'a> {
    fn count(topics: &'a [Topic], reference: &Corpus) -> Self {
        let mut index = HashMap::new();
        for word in topics.iter().flat_map(|t| &t.words) {
            let next = index.len();
            index.entry(word.as_str()).or_insert(next);
        }

        let mut doc_freq = vec![0usize; index.len()];
        let mut joint = HashMap::new();
        let mut present = Vec::new();
        for doc in reference {
            present.clear();
            present.extend(doc.iter().filter_map(|w| index.get(w.as_str()).copied()));
            present.sort_unstable();
            present.dedup();

            for (a, &i) in present.iter().enumerate() {
                doc_freq[i] += 1;
                for &j in &present[a + 1..] {
                    *joint.entry((i, j)).or_insert(0) += 1;
                }
            }
        }

        Self {
            n_docs: reference.len() as f64,
            index,
            doc_freq,
            joint,
        }
    }

    fn co_docs(&self, i: usize, j: usize) -> usize {
        if i == j {
            return self.doc_freq[i];
        }
        let key = if i < j { (i, j) } else { (j, i) };
        self.joint.get(&key).copied().unwrap_or(0)
    }

    fn prob(&self, i: usize) -> f64 {
        self.doc_freq[i] as f64 / self.n_docs
    }

    fn pmi(&self, i: usize, j: usize) -> f64 {
        let p_ij = self.co_docs(i, j) as f64 / self.n_docs;
        ((p_ij + EPSILON) / (self.prob(i) * self.prob(j))).ln()
    }

    fn npmi(&self, i: usize, j: usize) -> f64 {
        let p_ij = self.co_docs(i, j) as f64 / self.n_docs;
        if p_ij <= 0.0 {
            return -1.0;
        }
        if p_ij >= 1.0 {
            return 1.0;
        }
        (p_ij / (self.prob(i) * self.prob(j))).ln() / -p_ij.ln()
    }

    fn u_mass(&self, ids: &[usize]) -> f64 {
        let mut total = 0.0;
        let mut pairs = 0usize;
        for (a, &i) in ids.iter().enumerate().skip(1) {
            for &j in &ids[..a] {
                total += ((self.co_docs(i, j) as f64 + EPSILON) / self.doc_freq[j] as f64).ln();
                pairs += 1;
            }
        }
        total / pairs as f64
    }

    fn mean_pairwise(&self, ids: &[usize], measure: impl Fn(&Self, usize, usize) -> f64) -> f64 {
        let mut total = 0.0;
        let mut pairs = 0usize;
        for (a, &i) in ids.iter().enumerate() {
            for &j in &ids[a + 1..] {
                total += measure(self, i, j);
                pairs += 1;
            }
        }
        total / pairs as f64
    }

    fn c_v(&self, ids: &[usize]) -> f64 {
        let vectors: Vec<Vec<f64>> = ids
            .iter()
            .map(|&i| ids.iter().map(|&j| self.npmi(i, j)).collect())
            .collect();
        let mut topic_vector = vec![0.0; ids.len()];
        for v in &vectors {
            for (t, x) in topic_vector.iter_mut().zip(v) {
                *t += x;
            }
        }

        let total: f64 = vectors.iter().map(|v| cosine(v, &topic_vector)).sum();
        total / vectors.len() as f64
    }
}

fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a > 0.0 && norm_b > 0.0 {
        dot / (norm_a * norm_b)
    } else {
        0.0
    }
}
