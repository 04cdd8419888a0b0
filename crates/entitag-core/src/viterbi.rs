//! # Viterbi Decoder
//!
//! Finds the highest-scoring label sequence given per-token emission
//! scores and a flat transition matrix.

/// Viterbi decoder over a fixed label set.
#[derive(Debug, Clone)]
pub struct ViterbiDecoder {
    num_labels: usize,
}

impl ViterbiDecoder {
    pub fn new(num_labels: usize) -> Self {
        Self { num_labels }
    }

    /// Decode the best label sequence.
    ///
    /// `emissions` holds one score row per token; `transitions` is a flat
    /// matrix indexed as `to * num_labels + from`.
    pub fn decode(&self, emissions: &[Vec<f32>], transitions: &[f32]) -> Vec<usize> {
        let n = self.num_labels;
        let seq_len = emissions.len();
        if seq_len == 0 || n == 0 {
            return vec![];
        }

        let mut scores = vec![vec![f32::MIN / 1e10; n]; seq_len];
        let mut backpointers = vec![vec![0usize; n]; seq_len];

        for (j, &e) in emissions[0].iter().take(n).enumerate() {
            scores[0][j] = e;
        }

        for t in 1..seq_len {
            for j in 0..n {
                let mut best_score = f32::MIN / 1e10;
                let mut best_prev = 0;
                for i in 0..n {
                    let score = scores[t - 1][i] + transitions[j * n + i];
                    if score > best_score {
                        best_score = score;
                        best_prev = i;
                    }
                }
                scores[t][j] = best_score + emissions[t].get(j).copied().unwrap_or(0.0);
                backpointers[t][j] = best_prev;
            }
        }

        let mut path = vec![0usize; seq_len];
        path[seq_len - 1] = scores[seq_len - 1]
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i)
            .unwrap_or(0);

        for t in (0..seq_len - 1).rev() {
            path[t] = backpointers[t + 1][path[t + 1]];
        }

        path
    }
}
