// ============================================================
// Layer 4 — STS Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<StsSample>
// into tensor batches for the external trainer.
//
// Input:  Vec of N StsSamples, each with sequences of length S
//         (already padded to the same length by the encoder)
// Output: StsBatch with [N, S] integer tensors and, when every
//         sample carries a target, an [N] float target tensor.
//
// Prediction batches have no target tensor at all; the consumer
// checks the Option instead of catching a downstream failure.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::StsSample;

// ─── StsBatch ─────────────────────────────────────────────────────────────────
/// A batch of sentence-pair samples ready for a forward pass.
/// B is the Burn Backend, generic so the same batcher works on
/// any device.
#[derive(Debug, Clone)]
pub struct StsBatch<B: Backend> {
    /// Token id sequences, shape [batch_size, seq_len]
    pub input_ids: Tensor<B, 2, Int>,

    /// Attention masks, shape [batch_size, seq_len];
    /// 1 = real token, 0 = padding
    pub attention_mask: Tensor<B, 2, Int>,

    /// Similarity targets, shape [batch_size].
    /// None for prediction-mode batches.
    pub targets: Option<Tensor<B, 1>>,
}

// ─── StsBatcher ───────────────────────────────────────────────────────────────
/// Holds the target device so tensors are created in the right
/// place.
#[derive(Clone, Debug)]
pub struct StsBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> StsBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<StsSample, StsBatch<B>> for StsBatcher<B> {
    fn batch(&self, items: Vec<StsSample>) -> StsBatch<B> {
        let batch_size = items.len();
        // All sequences are pre-padded to the same length
        let seq_len = items.first().map_or(0, |s| s.input_ids.len());

        // Flatten Vec<Vec<u32>> to one Vec<i32> (Burn Int tensors
        // are created from i32), then reshape to [N, S]
        let input_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.input_ids.iter().map(|&x| x as i32))
            .collect();

        let mask_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.attention_mask.iter().map(|&x| x as i32))
            .collect();

        let input_ids = Tensor::<B, 1, Int>::from_ints(
            input_flat.as_slice(), &self.device
        ).reshape([batch_size, seq_len]);

        let attention_mask = Tensor::<B, 1, Int>::from_ints(
            mask_flat.as_slice(), &self.device
        ).reshape([batch_size, seq_len]);

        // A target tensor only exists when the whole batch has
        // targets. Mixed batches cannot occur: a dataset is
        // either fully labelled or fully unlabelled by
        // construction.
        let targets = if batch_size > 0 && items.iter().all(StsSample::has_target) {
            let values: Vec<f32> = items
                .iter()
                .map(|s| s.target.unwrap_or_default())
                .collect();
            Some(Tensor::<B, 1>::from_floats(values.as_slice(), &self.device))
        } else {
            None
        };

        StsBatch { input_ids, attention_mask, targets }
    }
}
