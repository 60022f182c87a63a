// ============================================================
// Layer 4 — Pair Builder
// ============================================================
// Joins every duplicate to a set of candidate questions:
//
//   dupe ──┬── question(s) with the same AnswerId   Label=1  n=0
//          ├── random question, other AnswerId      Label=0  n=1
//          ├── random question, other AnswerId      Label=0  n=2
//          └── ...up to `n_candidates - 1` negatives
//
// Negatives are drawn uniformly without replacement from the
// questions of other classes. If fewer are available than
// requested, all of them are used. Asking for at least as many
// candidates as there are questions therefore pairs each dupe
// with every question (used for the test set).
//
// The result is sorted by (Id_x asc, Label desc, n asc) so each
// dupe's true match leads its group.
//
// Reference: rand::seq::SliceRandom documentation

use rand::{seq::SliceRandom, Rng};
use std::cmp::Reverse;
use std::collections::HashMap;

use crate::domain::pair::Pair;
use crate::domain::post::{Post, PostId};

/// Pair each dupe with its matching question(s) and up to
/// `n_candidates - 1` random non-matching questions.
///
/// # Arguments
/// * `dupes`        - the duplicates forming the left side (`_x`) of each pair
/// * `questions`    - candidate questions for the right side (`_y`)
/// * `n_candidates` - one match plus this many minus one negatives per dupe
/// * `rng`          - drives the negative draw
///
/// # Returns
/// Unsorted pairs. Matches carry `n = 0`; negatives are numbered from 1
/// in draw order. A dupe whose class has no question gets negatives only.
///
/// # Example
/// ```
/// // training: 1 match + 19 negatives per dupe
/// let train = random_merge(&dupes_train, &questions, 20, &mut rng);
/// // test: every question is a candidate
/// let test = random_merge(&dupes_test, &questions, questions.len(), &mut rng);
/// ```
pub fn random_merge<R: Rng + ?Sized>(
    dupes:        &[Post],
    questions:    &[Post],
    n_candidates: usize,
    rng:          &mut R,
) -> Vec<Pair> {
    let mut by_class: HashMap<PostId, Vec<&Post>> = HashMap::new();
    for q in questions {
        by_class.entry(q.answer_id).or_default().push(q);
    }
    let negatives_wanted = n_candidates.saturating_sub(1);

    let mut pairs = Vec::with_capacity(dupes.len() * n_candidates.min(questions.len()).max(1));

    for dupe in dupes {
        if let Some(matches) = by_class.get(&dupe.answer_id) {
            pairs.extend(matches.iter().map(|q| Pair::new(dupe, q, 0)));
        }

        let others: Vec<&Post> = questions
            .iter()
            .filter(|q| q.answer_id != dupe.answer_id)
            .collect();

        pairs.extend(
            others
                .choose_multiple(rng, negatives_wanted)
                .enumerate()
                .map(|(i, q)| Pair::new(dupe, q, i + 1)),
        );
    }

    pairs
}

/// Build, label and sort the pairing table for a set of dupes.
pub fn build_pairs<R: Rng + ?Sized>(
    dupes:        &[Post],
    questions:    &[Post],
    n_candidates: usize,
    rng:          &mut R,
) -> Vec<Pair> {
    let mut pairs = random_merge(dupes, questions, n_candidates, rng);
    sort_pairs(&mut pairs);
    pairs
}

pub fn sort_pairs(pairs: &mut [Pair]) {
    pairs.sort_by_key(|p| (p.id_x, Reverse(p.label), p.n));
}
