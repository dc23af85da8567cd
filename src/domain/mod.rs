// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Pure Rust structs, enums, and traits that define the core
// concepts of the pipeline.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O or tokenizer calls
//   - Only plain Rust structs, enums, and traits
//
// This layer defines what things ARE; the data and infra
// layers define how they are produced.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// One row of an input table (id + sentence pair + optional labels)
pub mod record;

// Train/validation index assignment produced by a split strategy
pub mod split;

// The typed error taxonomy for preprocessing failures
pub mod error;

// Core abstractions (traits) that other layers implement
pub mod traits;
