//! Comparing a discovered clustering with known labels.
//!
//! Cluster ids are arbitrary, so both measures are invariant to relabeling.
//!
//! | Metric | Range | Best | Notes |
//! |--------|-------|------|-------|
//! | [`purity`] | [0, 1] | 1 | Majority-vote accuracy; favors many small clusters |
//! | [`nmi`] | [0, 1] | 1 | Penalizes both splitting and merging |
//!
//! GSDMM leaves some of its `K` clusters empty, and empty clusters simply
//! never appear in `pred`, so neither measure is affected by them.

use std::collections::HashMap;

/// Majority-vote accuracy of `pred` against `truth`.
///
/// Every predicted cluster is labeled with its most common true class; the
/// score is the fraction of items carrying that label.
///
/// ```rust
/// use shorttopic::metrics::purity;
///
/// let pred = [3, 3, 0, 0, 0];
/// let truth = [1, 1, 2, 2, 1];
/// assert!((purity(&pred, &truth) - 0.8).abs() < 1e-12);
/// ```
pub fn purity(pred: &[usize], truth: &[usize]) -> f64 {
    if pred.len() != truth.len() || pred.is_empty() {
        return 0.0;
    }

    let mut majority: HashMap<usize, usize> = HashMap::new();
    for (&(p, _), &count) in &contingency(pred, truth) {
        let best = majority.entry(p).or_insert(0);
        *best = (*best).max(count);
    }

    majority.values().sum::<usize>() as f64 / pred.len() as f64
}

/// Normalized mutual information, `2 I(P; T) / (H(P) + H(T))`.
///
/// Two constant labelings count as perfect agreement.
pub fn nmi(pred: &[usize], truth: &[usize]) -> f64 {
    if pred.len() != truth.len() || pred.is_empty() {
        return 0.0;
    }

    let n = pred.len() as f64;
    let pred_counts = counts(pred);
    let truth_counts = counts(truth);

    let mut mi = 0.0;
    for (&(p, t), &c) in &contingency(pred, truth) {
        let p_joint = c as f64 / n;
        let p_p = pred_counts[&p] as f64 / n;
        let p_t = truth_counts[&t] as f64 / n;
        mi += p_joint * (p_joint / (p_p * p_t)).ln();
    }

    let denom = entropy(&pred_counts, n) + entropy(&truth_counts, n);
    if denom > 0.0 {
        (2.0 * mi / denom).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

fn contingency(pred: &[usize], truth: &[usize]) -> HashMap<(usize, usize), usize> {
    let mut table = HashMap::new();
    for (&p, &t) in pred.iter().zip(truth) {
        *table.entry((p, t)).or_insert(0) += 1;
    }
    table
}

fn counts(labels: &[usize]) -> HashMap<usize, usize> {
    let mut out = HashMap::new();
    for &l in labels {
        *out.entry(l).or_insert(0) += 1;
    }
    out
}

fn entropy(counts: &HashMap<usize, usize>, n: f64) -> f64 {
    counts
        .values()
        .map(|&c| {
            let p = c as f64 / n;
            -p * p.ln()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_purity_perfect_and_permuted() {
        assert!((purity(&[0, 0, 1, 1], &[0, 0, 1, 1]) - 1.0).abs() < 1e-12);
        assert!((purity(&[7, 7, 2, 2], &[0, 0, 1, 1]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_purity_merged() {
        // One cluster over two equal classes: half right.
        assert!((purity(&[0, 0, 0, 0], &[0, 0, 1, 1]) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_purity_mismatched_lengths() {
        assert_eq!(purity(&[0], &[0, 1]), 0.0);
        assert_eq!(purity(&[], &[]), 0.0);
    }

    #[test]
    fn test_nmi_perfect_and_permuted() {
        assert!((nmi(&[1, 1, 0, 0, 2, 2], &[0, 0, 1, 1, 2, 2]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_nmi_independent() {
        assert!(nmi(&[0, 1, 0, 1], &[0, 0, 1, 1]) < 1e-9);
    }

    #[test]
    fn test_nmi_constant_labelings() {
        assert_eq!(nmi(&[4, 4, 4], &[1, 1, 1]), 1.0);
    }
}
