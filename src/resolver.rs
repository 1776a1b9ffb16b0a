//! The three-layer resolution cascade
//!
//! `CommandResolver` owns the OS identity, the location alias table and the
//! three layers, and runs them strictly in order: exact alias translation,
//! then structured rule matching, then the generative fallback. Later
//! layers never run speculatively. All owned state is immutable after
//! construction, so one resolver is safely shared across concurrent calls.

use crate::alias::AliasResolver;
use crate::generative::{CommandGenerator, GenerativeFallback};
use crate::os_profile::{LocationAliases, OsIdentity};
use crate::rules::RuleEngine;
use crate::structured_log::{log_event, LogLevel};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Which layer produced a resolved command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Alias,
    Rule,
    Generative,
}

/// The resolver's output: an executable command plus provenance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCommand {
    /// The executable command string. Never empty.
    pub command: String,
    /// The layer that produced it.
    pub origin: Origin,
    /// Optional human-readable status note (gate trips, backend failures).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Orchestrates the alias → rule → generative cascade.
pub struct CommandResolver {
    os: OsIdentity,
    alias: AliasResolver,
    rules: RuleEngine,
    fallback: GenerativeFallback,
}

impl CommandResolver {
    /// Build a resolver for the host OS, discovering location aliases from
    /// the user's home directory.
    pub fn new(generator: Arc<dyn CommandGenerator>) -> Self {
        let os = OsIdentity::detect();
        Self::with_locations(generator, os, LocationAliases::discover(os))
    }

    /// Build a resolver with explicit OS and locations (used by tests and
    /// embedders that manage their own environment).
    pub fn with_locations(
        generator: Arc<dyn CommandGenerator>,
        os: OsIdentity,
        locations: LocationAliases,
    ) -> Self {
        Self {
            os,
            alias: AliasResolver::new(os),
            rules: RuleEngine::new(os, locations.clone()),
            fallback: GenerativeFallback::new(generator, os, &locations),
        }
    }

    pub fn os(&self) -> OsIdentity {
        self.os
    }

    /// Resolve free-form text into exactly one executable command.
    ///
    /// Returns `None` for empty/whitespace-only input; no layer runs in
    /// that case.
    pub async fn resolve(&self, text: &str) -> Option<ResolvedCommand> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }

        if let Some(command) = self.alias.translate(trimmed) {
            log_event(
                LogLevel::Info,
                "RESOLVER",
                "layer1_hit",
                json!({"input": trimmed, "command": command}),
            );
            return Some(ResolvedCommand {
                command,
                origin: Origin::Alias,
                note: None,
            });
        }

        if let Some(command) = self.rules.apply(trimmed) {
            log_event(
                LogLevel::Info,
                "RESOLVER",
                "layer2_hit",
                json!({"input": trimmed, "command": command}),
            );
            return Some(ResolvedCommand {
                command,
                origin: Origin::Rule,
                note: None,
            });
        }

        let (command, note) = self.fallback.resolve(trimmed).await;
        log_event(
            LogLevel::Info,
            "RESOLVER",
            "layer3_result",
            json!({"input": trimmed, "command": command, "note": note}),
        );
        Some(ResolvedCommand {
            command,
            origin: Origin::Generative,
            note,
        })
    }
}
