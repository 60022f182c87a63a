// ============================================================
// Layer 4 — Stratified Train/Test Splitter
// ============================================================
// Splits the duplicates into a held-out test set and a training
// set, stratified by answer class:
//
//   for each AnswerId (in ascending order):
//       take max(1, floor(len * frac)) of its dupes at random
//
// Every class therefore lands in the test set at least once,
// even the ones too small for `frac` to select anything. The
// training set is whatever the test set did not take, in the
// original row order, matched by Id.
//
// Reference: rand::seq::SliceRandom documentation

use anyhow::{ensure, Result};
use rand::{seq::SliceRandom, Rng};
use std::collections::{BTreeMap, HashSet};

use crate::domain::post::{Post, PostId};

/// Sample `frac` of each class, at least one row per class.
///
/// Classes are visited in ascending AnswerId order, so a seeded `rng`
/// always yields the same sample for the same input.
///
/// # Arguments
/// * `dupes` - rows to sample from, grouped by `answer_id`
/// * `frac`  - fraction of each class to take, e.g. 0.21 = 21%
/// * `rng`   - source of randomness for the per-class draw
///
/// # Returns
/// The sampled rows, class by class. Within a class the order is the
/// order of the random draw.
///
/// # Example
/// ```
/// // a class of 10 gives 2 rows, a class of 3 still gives 1
/// let test = round_sample_strat(&dupes, 0.21, &mut rng);
/// ```
pub fn round_sample_strat<R: Rng + ?Sized>(dupes: &[Post], frac: f64, rng: &mut R) -> Vec<Post> {
    let mut groups: BTreeMap<PostId, Vec<&Post>> = BTreeMap::new();
    for d in dupes {
        groups.entry(d.answer_id).or_default().push(d);
    }

    let mut sample = Vec::new();
    for members in groups.values() {
        let take = ((members.len() as f64 * frac).floor() as usize).max(1);
        sample.extend(members.choose_multiple(rng, take).map(|d| (*d).clone()));
    }
    sample
}

/// Split dupes into (test, train). Fails if a class is missing
/// from the test set.
pub fn split_dupes<R: Rng + ?Sized>(
    dupes:     &[Post],
    test_size: f64,
    rng:       &mut R,
) -> Result<(Vec<Post>, Vec<Post>)> {
    let test = round_sample_strat(dupes, test_size, rng);

    let test_ids: HashSet<PostId> = test.iter().map(|d| d.id).collect();
    let train: Vec<Post> = dupes
        .iter()
        .filter(|d| !test_ids.contains(&d.id))
        .cloned()
        .collect();

    let all_classes:  HashSet<PostId> = dupes.iter().map(|d| d.answer_id).collect();
    let test_classes: HashSet<PostId> = test.iter().map(|d| d.answer_id).collect();
    ensure!(
        test_classes == all_classes,
        "Stratified split lost {} class(es) from the test set",
        all_classes.difference(&test_classes).count()
    );

    tracing::debug!(
        "Dupes split: {} test, {} train over {} classes",
        test.len(),
        train.len(),
        all_classes.len()
    );

    Ok((test, train))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    /// Class 100 has 10 dupes, class 200 has 3, class 300 has 1.
    fn dupes() -> Vec<Post> {
        let mut out = Vec::new();
        for i in 0..10 {
            out.push(Post::new(1000 + i, 100, "", ""));
        }
        for i in 0..3 {
            out.push(Post::new(2000 + i, 200, "", ""));
        }
        out.push(Post::new(3000, 300, "", ""));
        out
    }

    #[test]
    fn test_round_sample_sizes_per_class() {
        let mut rng = StdRng::seed_from_u64(5);
        let sample = round_sample_strat(&dupes(), 0.21, &mut rng);
        let count = |class| sample.iter().filter(|d| d.answer_id == class).count();
        // floor(10 * 0.21) = 2, floor(3 * 0.21) = 0 → 1, floor(0.21) = 0 → 1
        assert_eq!(count(100), 2);
        assert_eq!(count(200), 1);
        assert_eq!(count(300), 1);
    }

    #[test]
    fn test_every_class_in_test() {
        let all = dupes();
        let mut rng = StdRng::seed_from_u64(9);
        let (test, _) = split_dupes(&all, 0.01, &mut rng).unwrap();
        let classes: HashSet<PostId> = test.iter().map(|d| d.answer_id).collect();
        assert_eq!(classes, HashSet::from([100, 200, 300]));
    }

    #[test]
    fn test_train_and_test_partition_dupes() {
        let all = dupes();
        let mut rng = StdRng::seed_from_u64(2);
        let (test, train) = split_dupes(&all, 0.5, &mut rng).unwrap();

        let test_ids:  HashSet<PostId> = test.iter().map(|d| d.id).collect();
        let train_ids: HashSet<PostId> = train.iter().map(|d| d.id).collect();
        assert!(test_ids.is_disjoint(&train_ids));

        let union: HashSet<PostId> = test_ids.union(&train_ids).copied().collect();
        let every: HashSet<PostId> = all.iter().map(|d| d.id).collect();
        assert_eq!(union, every);
    }

    #[test]
    fn test_train_keeps_input_order() {
        let all = dupes();
        let mut rng = StdRng::seed_from_u64(4);
        let (_, train) = split_dupes(&all, 0.3, &mut rng).unwrap();
        let ids: Vec<PostId> = train.iter().map(|d| d.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }

    #[test]
    fn test_full_fraction_leaves_no_training_rows() {
        let all = dupes();
        let mut rng = StdRng::seed_from_u64(0);
        let (test, train) = split_dupes(&all, 1.0, &mut rng).unwrap();
        assert_eq!(test.len(), all.len());
        assert!(train.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let mut rng = StdRng::seed_from_u64(0);
        let (test, train) = split_dupes(&[], 0.2, &mut rng).unwrap();
        assert!(test.is_empty());
        assert!(train.is_empty());
    }
}
