//! Sampler state: hyperparameters, cluster tables and document assignment.

use super::cluster::{ClusterState, DocBag};
use crate::corpus::Corpus;
use crate::error::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The owned state of a Dirichlet Multinomial Mixture.
///
/// Holds everything scoring and introspection need (`K`, `alpha`, `beta`,
/// `V` and the per-cluster counts) plus the training assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DmmState {
    k: usize,
    alpha: f64,
    beta: f64,
    vocab_size: usize,
    clusters: Vec<ClusterState>,
    assignment: Vec<usize>,
}

impl DmmState {
    /// Assign every document uniformly at random to one of `k` clusters and
    /// build the counts from that assignment.
    pub(crate) fn initialize<R: Rng>(
        bags: &[DocBag<'_>],
        vocab_size: usize,
        k: usize,
        alpha: f64,
        beta: f64,
        rng: &mut R,
    ) -> Self {
        let mut clusters = vec![ClusterState::new(); k];
        let mut assignment = Vec::with_capacity(bags.len());
        for bag in bags {
            let z = rng.random_range(0..k);
            clusters[z].add_document(bag);
            assignment.push(z);
        }
        Self {
            k,
            alpha,
            beta,
            vocab_size,
            clusters,
            assignment,
        }
    }

    /// Rebuild the counts of `corpus` under a known assignment.
    ///
    /// `assignment[d]` is the cluster of document `d`. Fails if the lengths
    /// differ, a cluster id is not below `k`, or a hyperparameter is invalid.
    pub fn from_assignment(
        corpus: &Corpus,
        vocab_size: usize,
        k: usize,
        alpha: f64,
        beta: f64,
        assignment: Vec<usize>,
    ) -> Result<Self> {
        if corpus.is_empty() {
            return Err(Error::EmptyInput);
        }
        if assignment.len() != corpus.len() {
            return Err(Error::InvalidParameter {
                name: "assignment",
                message: "must have one entry per document",
            });
        }
        if let Some(&z) = assignment.iter().find(|&&z| z >= k) {
            return Err(Error::ClusterOutOfRange { cluster: z, k });
        }

        let mut clusters = vec![ClusterState::new(); k];
        for (doc, &z) in corpus.iter().zip(&assignment) {
            clusters[z].add_document(&DocBag::new(doc));
        }
        let state = Self {
            k,
            alpha,
            beta,
            vocab_size,
            clusters,
            assignment,
        };
        state.validate()?;
        Ok(state)
    }

    /// Maximum number of clusters, `K`.
    pub fn n_clusters(&self) -> usize {
        self.k
    }

    /// Number of training documents, `D`.
    pub fn n_docs(&self) -> usize {
        self.assignment.len()
    }

    /// Prior on cluster mixture weights.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Prior on per-cluster word distributions.
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Training vocabulary size, `V`.
    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// All cluster tables, indexed by cluster id.
    pub fn clusters(&self) -> &[ClusterState] {
        &self.clusters
    }

    /// Cluster `z`.
    pub fn cluster(&self, z: usize) -> Result<&ClusterState> {
        self.clusters
            .get(z)
            .ok_or(Error::ClusterOutOfRange { cluster: z, k: self.k })
    }

    /// Current cluster of every training document.
    pub fn assignment(&self) -> &[usize] {
        &self.assignment
    }

    /// Documents per cluster.
    pub fn cluster_sizes(&self) -> Vec<usize> {
        self.clusters.iter().map(ClusterState::doc_count).collect()
    }

    /// Clusters holding at least one document.
    pub fn populated_clusters(&self) -> usize {
        self.clusters.iter().filter(|c| !c.is_empty()).count()
    }

    /// Take document `d` out of its cluster's counts, returning that cluster.
    ///
    /// The assignment entry is kept; the document is "in flight" until
    /// [`Self::insert`] puts it back.
    pub(crate) fn remove(&mut self, d: usize, bag: &DocBag<'_>) -> usize {
        let z = self.assignment[d];
        self.clusters[z].remove_document(bag);
        z
    }

    /// Count document `d` in cluster `z` and record the assignment.
    pub(crate) fn insert(&mut self, d: usize, bag: &DocBag<'_>, z: usize) {
        self.clusters[z].add_document(bag);
        self.assignment[d] = z;
    }

    /// Check the count invariants against the training corpus.
    ///
    /// Σ doc_count = D, Σ word_count = total tokens, and each cluster's
    /// `word_count` matches its token table.
    pub fn check_invariants(&self, corpus: &Corpus) -> bool {
        self.validate().is_ok()
            && self.assignment.len() == corpus.len()
            && self.clusters.iter().map(ClusterState::word_count).sum::<usize>()
                == corpus.total_tokens()
    }

    /// Structural validation of a state, used when loading artifacts.
    pub fn validate(&self) -> Result<()> {
        let bad = |message: &'static str| -> Result<()> {
            Err(Error::InvalidParameter {
                name: "state",
                message,
            })
        };

        if self.k == 0 || self.clusters.len() != self.k {
            return bad("cluster table does not match K");
        }
        if !(self.alpha > 0.0 && self.alpha.is_finite()) {
            return bad("alpha must be positive");
        }
        if !(self.beta > 0.0 && self.beta.is_finite()) {
            return bad("beta must be positive");
        }
        if self.vocab_size == 0 {
            return bad("vocabulary size must be positive");
        }
        if self.assignment.is_empty() {
            return bad("no documents assigned");
        }

        let mut occupancy = vec![0usize; self.k];
        for &z in &self.assignment {
            if z >= self.k {
                return bad("assignment references a missing cluster");
            }
            occupancy[z] += 1;
        }
        if occupancy != self.cluster_sizes() {
            return bad("cluster occupancy disagrees with assignment");
        }
        if !self.clusters.iter().all(ClusterState::is_consistent) {
            return bad("word_count disagrees with word frequencies");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn bags(corpus: &Corpus) -> Vec<DocBag<'_>> {
        corpus.iter().map(DocBag::new).collect()
    }

    #[test]
    fn test_initialize_balances_counts() {
        let corpus = Corpus::from_lines(["a b", "c", "a a d", ""]);
        let mut rng = StdRng::seed_from_u64(7);
        let state = DmmState::initialize(&bags(&corpus), 4, 3, 0.1, 0.1, &mut rng);

        assert_eq!(state.n_docs(), 4);
        assert_eq!(state.cluster_sizes().iter().sum::<usize>(), 4);
        assert!(state.assignment().iter().all(|&z| z < 3));
        assert!(state.check_invariants(&corpus));
    }

    #[test]
    fn test_reassign_moves_counts() {
        let corpus = Corpus::from_lines(["a b", "c"]);
        let bags = bags(&corpus);
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = DmmState::initialize(&bags, 3, 2, 0.1, 0.1, &mut rng);

        let from = state.remove(0, &bags[0]);
        let to = 1 - from;
        state.insert(0, &bags[0], to);
        assert_eq!(state.assignment()[0], to);
        assert!(state.cluster(to).unwrap().freq("a") >= 1);
        assert_eq!(state.cluster(from).unwrap().freq("a"), 0);
        assert!(state.check_invariants(&corpus));
    }

    #[test]
    fn test_cluster_out_of_range() {
        let corpus = Corpus::from_lines(["a"]);
        let mut rng = StdRng::seed_from_u64(1);
        let state = DmmState::initialize(&bags(&corpus), 1, 2, 0.1, 0.1, &mut rng);
        assert_eq!(
            state.cluster(5).unwrap_err(),
            Error::ClusterOutOfRange { cluster: 5, k: 2 }
        );
    }

    #[test]
    fn test_from_assignment() {
        let corpus = Corpus::from_lines(["a b", "c", "a"]);
        let state = DmmState::from_assignment(&corpus, 3, 3, 0.1, 0.1, vec![0, 2, 0]).unwrap();
        assert_eq!(state.cluster_sizes(), vec![2, 0, 1]);
        assert_eq!(state.cluster(0).unwrap().freq("a"), 2);
        assert_eq!(state.cluster(0).unwrap().word_count(), 3);
        assert!(state.check_invariants(&corpus));
    }

    #[test]
    fn test_from_assignment_rejects_bad_input() {
        let corpus = Corpus::from_lines(["a b", "c"]);
        assert_eq!(
            DmmState::from_assignment(&corpus, 3, 2, 0.1, 0.1, vec![0, 2]).unwrap_err(),
            Error::ClusterOutOfRange { cluster: 2, k: 2 }
        );
        assert!(DmmState::from_assignment(&corpus, 3, 2, 0.1, 0.1, vec![0])
            .unwrap_err()
            .is_config());
        assert!(DmmState::from_assignment(&corpus, 3, 2, 0.0, 0.1, vec![0, 1]).is_err());
    }

    #[test]
    fn test_validate_rejects_tampered_assignment() {
        let corpus = Corpus::from_lines(["a b", "c d"]);
        let mut rng = StdRng::seed_from_u64(3);
        let mut state = DmmState::initialize(&bags(&corpus), 4, 2, 0.1, 0.1, &mut rng);
        assert!(state.validate().is_ok());
        state.assignment[0] = 1 - state.assignment[0];
        assert!(state.validate().is_err());
    }
}
