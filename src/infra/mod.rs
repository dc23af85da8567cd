// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that do not belong to any one
// business layer:
//
//   tokenizer.rs  — Pretrained tokenizer loading and the
//                   family registry. Resolves a checkpoint
//                   identifier to a tokenizer family, loads
//                   the tokenizer.json, extends the vocabulary
//                   with custom tokens, and encodes text to
//                   fixed-length id sequences.
//
//   submission.rs — Inference output tables. Writes the raw,
//                   normalized, and ensembled prediction CSVs
//                   the scoring pipeline expects.
//
// Reference: Rust Book §7 (Modules)

/// Tokenizer family registry and encoding adapter
pub mod tokenizer;

/// Prediction post-processing and submission CSV writing
pub mod submission;
