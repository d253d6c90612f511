//! Generative model adapters.
//!
//! Everything that talks to a language model goes through the
//! [`GenerativeModel`] trait, so the pipeline can be driven by the real
//! Gemini API in production and by a [`ScriptedModel`] in tests.
//!
//! ```text
//! plan::build_plan ----generate(prompt)----> &dyn GenerativeModel
//! plan::validate_plan --generate(prompt)---/      |
//!                                                 +-- GeminiModel   (HTTP)
//!                                                 +-- ScriptedModel (canned)
//! ```

pub mod gemini;
pub mod scripted;
pub mod trait_def;

pub use gemini::{GeminiConfig, GeminiModel};
pub use scripted::{ScriptedModel, ScriptedReply};
pub use trait_def::GenerativeModel;
