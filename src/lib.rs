//! aish_core - Rust backend for the aish conversational terminal
//!
//! Modules:
//! - os_profile: OS identity detection and location alias table
//! - concepts: OS-independent command concepts and their alias triggers
//! - alias: Layer 1 resolution (exact trigger translation)
//! - rules: Layer 2 resolution (structured creation-intent matching)
//! - generative: Layer 3 resolution (model-backed fallback + extraction)
//! - safety: destructive-command gate applied to generated output
//! - resolver: the three-layer cascade orchestrator
//! - suggest_cache: bounded LRU cache for autocomplete suggestions
//! - autocomplete: debounced, cancellable suggestion coordinator
//! - exec: shell execution with captured output
//! - retrieval: knowledge-retrieval interface and question routing
//! - structured_log: JSON-formatted event logging
//! - error: typed errors for the collaborator seams

pub mod alias;
pub mod autocomplete;
pub mod concepts;
pub mod error;
pub mod exec;
pub mod generative;
pub mod os_profile;
pub mod resolver;
pub mod retrieval;
pub mod rules;
pub mod safety;
pub mod structured_log;
pub mod suggest_cache;

// Re-export key types for convenience
pub use alias::AliasResolver;
pub use autocomplete::{AutocompleteConfig, AutocompleteCoordinator, SuggestionEvent};
pub use concepts::Concept;
pub use error::{GeneratorError, RetrievalError};
pub use exec::{execute, ExecResult};
pub use generative::{
    CommandGenerator, GenerationOptions, GenerativeFallback, OllamaGenerator, SuggestionGenerator,
};
pub use os_profile::{LocationAliases, OsIdentity};
pub use resolver::{CommandResolver, Origin, ResolvedCommand};
pub use retrieval::{question_from_input, DocHit, KnowledgeRetriever};
pub use rules::RuleEngine;
pub use safety::{DangerCategory, GateVerdict, SafetyGate};
pub use suggest_cache::{CacheStats, SuggestionCache};
