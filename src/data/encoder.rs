// ============================================================
// Layer 4 — Pair Encoder
// ============================================================
// Turns one StsRecord into tokenized samples:
//
//   1. Normalize each sentence (punctuation/emoticon runs)
//   2. Join the two sentences with the tokenizer family's
//      separator token, in declared field order
//   3. Encode to a fixed-length id sequence
//   4. If swap augmentation is on, repeat with the field order
//      reversed, producing a second sample
//
// STS is order-invariant: sim(a, b) == sim(b, a). Encoding both
// directions doubles the training data without new labels; the
// record's label (when present) is attached unchanged to every
// sample produced for it.
//
// Swap is a training-time augmentation only. The orchestrator
// calls encode_records once per split partition, so both
// directions of a pair always land in the same partition.

use crate::data::dataset::StsSample;
use crate::data::normalizer::TextNormalizer;
use crate::domain::error::PipelineError;
use crate::domain::record::StsRecord;
use crate::infra::tokenizer::TokenizerAdapter;

// ─── AugmentedPair ────────────────────────────────────────────────────────────
/// The sample(s) produced from one record: always a forward
/// direction, plus the reversed direction when swap is enabled.
#[derive(Debug, Clone)]
pub struct AugmentedPair {
    pub forward: StsSample,
    pub reversed: Option<StsSample>,
}

impl AugmentedPair {
    /// Number of samples this pair contributes (1 or 2)
    pub fn len(&self) -> usize {
        1 + usize::from(self.reversed.is_some())
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Flatten into plain samples, forward first
    pub fn into_samples(self) -> Vec<StsSample> {
        let mut samples = vec![self.forward];
        if let Some(reversed) = self.reversed {
            samples.push(reversed);
        }
        samples
    }
}

// ─── PairEncoder ──────────────────────────────────────────────────────────────
/// Borrows the shared tokenizer adapter; stateless otherwise.
pub struct PairEncoder<'a> {
    tokenizer: &'a TokenizerAdapter,
    normalizer: TextNormalizer,
}

impl<'a> PairEncoder<'a> {
    pub fn new(tokenizer: &'a TokenizerAdapter) -> Self {
        Self { tokenizer, normalizer: TextNormalizer::new() }
    }

    /// Encode one record, optionally in both directions.
    pub fn encode_pair(
        &self,
        record: &StsRecord,
        swap: bool,
    ) -> Result<AugmentedPair, PipelineError> {
        let forward =
            self.encode_direction(&record.sentence_1, &record.sentence_2, record.label)?;
        let reversed = if swap {
            Some(self.encode_direction(&record.sentence_2, &record.sentence_1, record.label)?)
        } else {
            None
        };
        Ok(AugmentedPair { forward, reversed })
    }

    /// Encode the given record indices of a partition in order.
    /// With swap on, each record contributes its two directions
    /// back to back.
    pub fn encode_records(
        &self,
        records: &[StsRecord],
        indices: &[usize],
        swap: bool,
    ) -> Result<Vec<StsSample>, PipelineError> {
        let per_record = if swap { 2 } else { 1 };
        let mut samples = Vec::with_capacity(indices.len() * per_record);
        for &index in indices {
            let pair = self.encode_pair(&records[index], swap)?;
            samples.extend(pair.into_samples());
        }
        Ok(samples)
    }

    fn encode_direction(
        &self,
        first: &str,
        second: &str,
        target: Option<f32>,
    ) -> Result<StsSample, PipelineError> {
        // Normalize each field, then join with the separator.
        // Runs cannot span the separator, so per-field
        // normalization equals normalizing the joined text.
        let text = format!(
            "{}{}{}",
            self.normalizer.normalize(first),
            self.tokenizer.separator(),
            self.normalizer.normalize(second),
        );
        let (input_ids, attention_mask) = self.tokenizer.encode(&text)?;
        Ok(StsSample { input_ids, attention_mask, target })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::tokenizer::{testing, TokenizerRegistry};

    fn adapter(max_length: usize) -> (tempfile::TempDir, TokenizerAdapter) {
        let dir = tempfile::tempdir().unwrap();
        let path = testing::write_word_level_tokenizer(dir.path());
        let adapter = TokenizerAdapter::from_file(
            &path,
            "unknown/checkpoint",
            &TokenizerRegistry::with_known_checkpoints(),
            max_length,
            &[],
        )
        .unwrap();
        (dir, adapter)
    }

    #[test]
    fn test_forward_direction_layout() {
        let (_dir, adapter) = adapter(8);
        let encoder = PairEncoder::new(&adapter);

        let record = StsRecord::new("r0", "hello", "world").with_label(3.0);
        let pair = encoder.encode_pair(&record, false).unwrap();

        // hello [SEP] world, then padding
        assert_eq!(&pair.forward.input_ids[..3], &[4, 3, 5]);
        assert_eq!(pair.forward.target, Some(3.0));
        assert!(pair.reversed.is_none());
        assert_eq!(pair.len(), 1);
    }

    #[test]
    fn test_swap_produces_reversed_direction() {
        let (_dir, adapter) = adapter(8);
        let encoder = PairEncoder::new(&adapter);

        let record = StsRecord::new("r0", "hello", "world").with_label(3.0);
        let pair = encoder.encode_pair(&record, true).unwrap();

        let reversed = pair.reversed.as_ref().unwrap();
        assert_eq!(&pair.forward.input_ids[..3], &[4, 3, 5]);
        assert_eq!(&reversed.input_ids[..3], &[5, 3, 4]);
        assert_eq!(pair.len(), 2);
    }

    #[test]
    fn test_swap_duplicates_label_identically() {
        let (_dir, adapter) = adapter(8);
        let encoder = PairEncoder::new(&adapter);

        let record = StsRecord::new("r0", "good morning", "hello world").with_label(4.2);
        let samples = encoder.encode_pair(&record, true).unwrap().into_samples();

        assert_eq!(samples.len(), 2);
        for sample in &samples {
            assert_eq!(sample.target, Some(4.2));
        }
    }

    #[test]
    fn test_unlabelled_record_yields_no_target() {
        let (_dir, adapter) = adapter(8);
        let encoder = PairEncoder::new(&adapter);

        let record = StsRecord::new("p0", "hello", "world");
        let samples = encoder.encode_pair(&record, true).unwrap().into_samples();
        assert!(samples.iter().all(|s| s.target.is_none()));
    }

    #[test]
    fn test_normalization_applied_before_encoding() {
        let (_dir, adapter) = adapter(8);
        let encoder = PairEncoder::new(&adapter);

        // The runs collapse to the canonical "???" / "!!!" forms,
        // which exist in the fixture vocabulary as standalone words
        let record = StsRecord::new("r0", "really ??????", "hello !!!!");
        let pair = encoder.encode_pair(&record, false).unwrap();

        // really(8) ???(9) [SEP](3) hello(4) !!!(10)
        assert_eq!(&pair.forward.input_ids[..5], &[8, 9, 3, 4, 10]);
    }

    #[test]
    fn test_encode_records_doubles_with_swap() {
        let (_dir, adapter) = adapter(8);
        let encoder = PairEncoder::new(&adapter);

        let records = vec![
            StsRecord::new("r0", "hello", "world").with_label(1.0),
            StsRecord::new("r1", "good", "morning").with_label(2.0),
        ];
        let indices = [0usize, 1];

        let plain = encoder.encode_records(&records, &indices, false).unwrap();
        let swapped = encoder.encode_records(&records, &indices, true).unwrap();
        assert_eq!(plain.len(), 2);
        assert_eq!(swapped.len(), 4);
    }

    #[test]
    fn test_all_samples_fixed_length() {
        let (_dir, adapter) = adapter(6);
        let encoder = PairEncoder::new(&adapter);

        let long = "hello world good morning really hello world".to_string();
        let record = StsRecord::new("r0", long.clone(), long);
        let samples = encoder.encode_pair(&record, true).unwrap().into_samples();
        for sample in samples {
            assert_eq!(sample.seq_len(), 6);
            assert_eq!(sample.attention_mask.len(), 6);
        }
    }
}
