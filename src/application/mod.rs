// ============================================================
// Layer 2 — Application Layer
// ============================================================
// Orchestrates the data pipeline per stage. The CLI calls into
// this layer; this layer calls into data and infra. No clap
// types and no tensor math live here.
//
//   data_module.rs — PipelineConfig plus StsDataModule, the
//                    per-stage orchestrator (fit / test /
//                    predict) that wires loader → splitter →
//                    encoder → datasets and hands out Burn
//                    data loaders.

/// Pipeline configuration and the per-stage data orchestrator
pub mod data_module;
