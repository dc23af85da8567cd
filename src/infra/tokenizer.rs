// ============================================================
// Layer 6 — Tokenizer Registry and Adapter
// ============================================================
// Wraps a pretrained subword tokenizer (HuggingFace
// tokenizer.json format) behind the small contract the data
// layer needs: encode to a fixed length, report vocabulary
// sizes, and extend the vocabulary with custom tokens exactly
// once at construction.
//
// Family resolution:
//   Different checkpoint families use different special-token
//   conventions ([CLS]/[SEP]/[PAD] vs <s>/</s>/<pad>). The
//   registry maps known checkpoint identifiers to a family;
//   unknown identifiers fall back to Auto, which probes the
//   loaded vocabulary for a "[SEP]" entry and picks the
//   convention from that. The known-checkpoint lists are
//   maintained by hand and must be kept in sync with the
//   checkpoints the team actually fine-tunes; that is a
//   declared limitation of the design, not an oversight.
//
// Vocabulary extension:
//   add_tokens() on the backing tokenizer skips tokens already
//   present and returns the count actually added. That count
//   plus the base vocabulary size is the embedding-table size
//   the model constructor must allocate, otherwise loading a
//   checkpoint fails with a dimension mismatch.
//
// The adapter is constructed once per pipeline instance and is
// immutable afterwards; no encoding happens before the
// extension is applied.

use std::path::Path;

use anyhow::Result;
use tokenizers::{AddedToken, Tokenizer};

use crate::domain::error::PipelineError;

// ─── Families ─────────────────────────────────────────────────────────────────

/// Tokenizer family tag. Decides the special-token convention
/// used when assembling pair inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerFamily {
    Bert,
    Electra,
    Roberta,
    /// Fallback for unknown checkpoints: probe the loaded
    /// vocabulary and auto-detect the convention
    Auto,
}

/// The token strings a family uses for padding and sentence
/// separation.
#[derive(Debug, Clone)]
pub struct SpecialTokens {
    pub pad: String,
    pub sep: String,
}

impl SpecialTokens {
    fn bert_style() -> Self {
        Self { pad: "[PAD]".to_string(), sep: "[SEP]".to_string() }
    }

    fn roberta_style() -> Self {
        Self { pad: "<pad>".to_string(), sep: "</s>".to_string() }
    }

    /// Probe the loaded vocabulary: BERT-style if it knows
    /// "[SEP]", RoBERTa-style otherwise.
    fn detect(tokenizer: &Tokenizer) -> Self {
        if tokenizer.token_to_id("[SEP]").is_some() {
            Self::bert_style()
        } else {
            Self::roberta_style()
        }
    }
}

// ─── Registry ─────────────────────────────────────────────────────────────────

/// Injectable mapping from checkpoint identifier to tokenizer
/// family. Built once at startup; the orchestrator passes it in
/// so tests can register their own fixtures.
#[derive(Debug, Clone)]
pub struct TokenizerRegistry {
    entries: Vec<(TokenizerFamily, Vec<String>)>,
}

impl TokenizerRegistry {
    /// An empty registry: every identifier resolves to Auto
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// The checkpoints this project fine-tunes, grouped by
    /// architecture family. Maintained by hand.
    pub fn with_known_checkpoints() -> Self {
        let mut registry = Self::empty();
        registry.register(
            TokenizerFamily::Bert,
            &[
                "klue/roberta-small",
                "klue/roberta-base",
                "klue/roberta-large",
            ],
        );
        registry.register(
            TokenizerFamily::Electra,
            &[
                "monologg/koelectra-base-v3-discriminator",
                "monologg/koelectra-base-finetuned-sentiment",
            ],
        );
        registry.register(
            TokenizerFamily::Roberta,
            &[
                "sentence-transformers/roberta-base-nli-stsb-mean-tokens",
                "jhgan/ko-sroberta-multitask",
            ],
        );
        registry
    }

    /// Add (or extend) a family's known-checkpoint list
    pub fn register(&mut self, family: TokenizerFamily, identifiers: &[&str]) {
        let identifiers = identifiers.iter().map(|s| s.to_string()).collect();
        self.entries.push((family, identifiers));
    }

    /// Map a checkpoint identifier to its family; unknown
    /// identifiers fall back to Auto.
    pub fn resolve(&self, model_name: &str) -> TokenizerFamily {
        for (family, identifiers) in &self.entries {
            if identifiers.iter().any(|id| id == model_name) {
                return *family;
            }
        }
        TokenizerFamily::Auto
    }
}

impl Default for TokenizerRegistry {
    fn default() -> Self {
        Self::with_known_checkpoints()
    }
}

// ─── Adapter ──────────────────────────────────────────────────────────────────

/// A loaded, configured, vocabulary-extended tokenizer.
/// Immutable after construction; encode() is read-only and safe
/// to share across concurrent readers.
pub struct TokenizerAdapter {
    tokenizer: Tokenizer,
    family: TokenizerFamily,
    special: SpecialTokens,
    pad_id: u32,
    max_length: usize,
    added_count: usize,
}

impl TokenizerAdapter {
    /// Load a tokenizer.json, resolve the family for
    /// `model_name`, and extend the vocabulary with
    /// `extra_tokens` (duplicates against the existing
    /// vocabulary are skipped, not appended twice).
    pub fn from_file(
        path:         impl AsRef<Path>,
        model_name:   &str,
        registry:     &TokenizerRegistry,
        max_length:   usize,
        extra_tokens: &[String],
    ) -> Result<Self> {
        let path = path.as_ref();
        let mut tokenizer = Tokenizer::from_file(path).map_err(|e| {
            anyhow::anyhow!("cannot load tokenizer from '{}': {}", path.display(), e)
        })?;

        let family = registry.resolve(model_name);
        let special = match family {
            TokenizerFamily::Bert | TokenizerFamily::Electra => SpecialTokens::bert_style(),
            TokenizerFamily::Roberta => SpecialTokens::roberta_style(),
            TokenizerFamily::Auto => SpecialTokens::detect(&tokenizer),
        };

        // Vocabulary extension happens exactly once, here, before
        // any encoding.
        let added: Vec<AddedToken> = extra_tokens
            .iter()
            .map(|t| AddedToken::from(t.clone(), false))
            .collect();
        let added_count = tokenizer.add_tokens(&added);

        // Unknown pad token falls back to id 0, the usual [PAD]
        // slot in BERT-style vocabularies.
        let pad_id = tokenizer.token_to_id(&special.pad).unwrap_or(0);

        tracing::info!(
            "Tokenizer ready: family {:?}, base vocab {}, {} custom token(s) added, max_length {}",
            family,
            tokenizer.get_vocab_size(false),
            added_count,
            max_length,
        );

        Ok(Self { tokenizer, family, special, pad_id, max_length, added_count })
    }

    /// Encode text into exactly `max_length` token ids with
    /// special boundary tokens, right-padded or truncated, plus
    /// the matching attention mask (1 = real token, 0 = pad).
    pub fn encode(&self, text: &str) -> Result<(Vec<u32>, Vec<u32>), PipelineError> {
        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| PipelineError::Encoding(e.to_string()))?;

        let mut ids: Vec<u32> = encoding.get_ids().to_vec();
        ids.truncate(self.max_length);

        let mut mask = vec![1u32; ids.len()];
        while ids.len() < self.max_length {
            ids.push(self.pad_id);
            mask.push(0);
        }

        Ok((ids, mask))
    }

    /// The separator token placed between the two sentences of
    /// a pair, per the resolved family convention.
    pub fn separator(&self) -> &str {
        &self.special.sep
    }

    pub fn family(&self) -> TokenizerFamily {
        self.family
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Base vocabulary size, excluding the custom additions
    pub fn vocab_size(&self) -> usize {
        self.tokenizer.get_vocab_size(false)
    }

    /// How many custom tokens were actually added (duplicates
    /// against the base vocabulary are not counted)
    pub fn added_token_count(&self) -> usize {
        self.added_count
    }

    /// The embedding-table size the model must allocate
    pub fn extended_vocab_size(&self) -> usize {
        self.vocab_size() + self.added_count
    }
}

// ─── Test fixtures ────────────────────────────────────────────────────────────
// A tiny word-level tokenizer.json, built the same way a real
// vocabulary file is laid out, so unit tests across the crate
// can load a working tokenizer without any network access.
#[cfg(test)]
pub(crate) mod testing {
    use std::path::{Path, PathBuf};

    /// Write a word-level tokenizer.json into `dir` and return
    /// its path. Vocabulary: specials + a handful of words.
    pub(crate) fn write_word_level_tokenizer(dir: &Path) -> PathBuf {
        let vocab = serde_json::json!({
            "[PAD]":  0,
            "[UNK]":  1,
            "[CLS]":  2,
            "[SEP]":  3,
            "hello":  4,
            "world":  5,
            "good":   6,
            "morning": 7,
            "really": 8,
            "???":    9,
            "!!!":    10,
        });

        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                {"id": 0, "content": "[PAD]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 1, "content": "[UNK]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 2, "content": "[CLS]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 3, "content": "[SEP]", "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
            ],
            "normalizer": null,
            "pre_tokenizer": { "type": "Whitespace" },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": "[UNK]"
            }
        });

        let path = dir.join("tokenizer.json");
        std::fs::write(&path, serde_json::to_string_pretty(&tokenizer_json).unwrap())
            .unwrap();
        path
    }
}
