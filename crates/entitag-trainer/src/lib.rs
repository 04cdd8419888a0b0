//! # Entitag Trainer
//!
//! Offline pipeline for the entitag NER models: fetches public datasets
//! from the Hugging Face datasets server, exports them as normalized
//! training-record files, and fine-tunes a blank tagger on one of them.
//! Both steps run as unattended batch binaries (`fetch-dataset`, `train`)
//! driven by explicit configuration structs.

pub mod export;
pub mod hub;
pub mod trainer;

pub use export::{export, ExportConfig, ExportSummary};
pub use hub::{HubClient, TaggedExample};
pub use trainer::{train, TrainConfig};
