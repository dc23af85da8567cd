use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One fully tokenised and padded sentence-pair sample.
/// Sequence format: [CLS] sentence_1 [SEP] sentence_2 ... [PAD]...
/// `target` is the similarity score; None in prediction mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StsSample {
    pub input_ids:      Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub target:         Option<f32>,
}

impl StsSample {
    pub fn seq_len(&self) -> usize {
        self.input_ids.len()
    }

    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }
}

/// Read-only, fully materialised sample storage for one stage.
/// Built once during preprocessing; get() never re-tokenises.
#[derive(Debug, Clone)]
pub struct StsDataset {
    samples: Vec<StsSample>,
}

impl StsDataset {
    pub fn new(samples: Vec<StsSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    /// True when every sample carries a target (training-style
    /// dataset); false for prediction-style input-only data.
    pub fn has_targets(&self) -> bool {
        !self.samples.is_empty() && self.samples.iter().all(StsSample::has_target)
    }
}

impl Dataset<StsSample> for StsDataset {
    fn get(&self, index: usize) -> Option<StsSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
