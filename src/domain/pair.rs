// ============================================================
// Layer 3 — Pair Domain Type
// ============================================================
// A candidate comparison between a duplicate (the `_x` side)
// and a canonical question (the `_y` side).
//
//   Label = 1  → both sides share an AnswerId (true match)
//   Label = 0  → a negative drawn from another answer class
//
// `n` is the candidate index within one duplicate's group:
// 0 for true matches, 1.. for negatives in draw order.
//
// Example:
//   Id_x=5  AnswerId_x=100  Id_y=1  AnswerId_y=100  Label=1  n=0
//   Id_x=5  AnswerId_x=100  Id_y=3  AnswerId_y=200  Label=0  n=1

use serde::{Deserialize, Serialize};

use crate::domain::post::{Post, PostId};

/// One row of balanced_pairs_{train,test}.tsv.
/// Field order is the column order on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    #[serde(rename = "Id_x")]
    pub id_x: PostId,
    #[serde(rename = "AnswerId_x")]
    pub answer_id_x: PostId,
    #[serde(rename = "Text_x")]
    pub text_x: String,
    #[serde(rename = "Id_y")]
    pub id_y: PostId,
    #[serde(rename = "Text_y")]
    pub text_y: String,
    #[serde(rename = "AnswerId_y")]
    pub answer_id_y: PostId,
    #[serde(rename = "Label")]
    pub label: u8,
    pub n: usize,
}

impl Pair {
    pub const COLUMNS: [&'static str; 8] = [
        "Id_x", "AnswerId_x", "Text_x", "Id_y", "Text_y", "AnswerId_y", "Label", "n",
    ];

    /// Join a duplicate to a question. The label is derived here,
    /// so it can never disagree with the two AnswerIds.
    pub fn new(dupe: &Post, question: &Post, n: usize) -> Self {
        Self {
            id_x:        dupe.id,
            answer_id_x: dupe.answer_id,
            text_x:      dupe.text.clone(),
            id_y:        question.id,
            text_y:      question.text.clone(),
            answer_id_y: question.answer_id,
            label:       u8::from(dupe.answer_id == question.answer_id),
            n,
        }
    }

    pub fn is_match(&self) -> bool {
        self.label == 1
    }
}

/// Mean label over a pairing table, i.e. the share of true matches.
pub fn match_rate(pairs: &[Pair]) -> f64 {
    if pairs.is_empty() {
        return 0.0;
    }
    let matches = pairs.iter().filter(|p| p.is_match()).count();
    matches as f64 / pairs.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: PostId, answer_id: PostId) -> Post {
        let mut p = Post::new(id, answer_id, "", "");
        p.text = format!("text {id}");
        p
    }

    #[test]
    fn test_label_follows_answer_ids() {
        let hit  = Pair::new(&post(5, 100), &post(1, 100), 0);
        let miss = Pair::new(&post(5, 100), &post(2, 200), 1);
        assert_eq!(hit.label, 1);
        assert_eq!(miss.label, 0);
        assert_eq!(hit.text_x, "text 5");
        assert_eq!(hit.text_y, "text 1");
    }

    #[test]
    fn test_match_rate() {
        let pairs = vec![
            Pair::new(&post(5, 100), &post(1, 100), 0),
            Pair::new(&post(5, 100), &post(2, 200), 1),
            Pair::new(&post(5, 100), &post(3, 300), 2),
            Pair::new(&post(5, 100), &post(4, 400), 3),
        ];
        assert!((match_rate(&pairs) - 0.25).abs() < 1e-12);
        assert_eq!(match_rate(&[]), 0.0);
    }
}
