//! Structural decomposition of channel documents.
//!
//! A channel export is one large XML document. Comparing two revisions line
//! by line buries a one-line script edit in noise, so the document is first
//! split into independently keyed components (channel scripts, connector
//! scripts, plugins, pipeline steps, connector configuration and the residual
//! channel properties). Keys stay stable when destinations are reordered or
//! renamed.
//!
//! # Key Types
//!
//! - [`Decomposer`] -- Splits one revision into a [`DecompositionResult`](revlens_types::DecompositionResult)
//! - [`DecomposerConfig`] / [`Granularity`] / [`ScriptSlot`] -- Extraction settings
//! - [`ParseError`] -- The only failure: input that is not well-formed XML

pub mod config;
pub mod decomposer;
pub mod error;
mod xml;

pub use config::{DecomposerConfig, Granularity, ScriptSlot};
pub use decomposer::{
    decompose, step_type_name, Decomposer, CHANNEL_PROPERTIES, CHANNEL_SCRIPTS, CONFIGURATION,
    DESTINATION_ORDER, SOURCE_CONNECTOR,
};
pub use error::{ParseError, ParseResult};
