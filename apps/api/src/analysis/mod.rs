//! Assessment pipeline: models, prompts, orchestrator, and the HTTP
//! handlers that trigger analysis and serve results.

pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod prompts;
