//! Layer 1 resolution - exact alias translation
//!
//! Translates a known command or verb at the head of the input into the
//! OS-correct equivalent, passing the remaining arguments through
//! untouched. Runs before every other layer and never calls out.

use crate::concepts::{concept_for_trigger, MAX_TRIGGER_TOKENS};
use crate::os_profile::OsIdentity;

/// Exact trigger → OS-correct command translation.
pub struct AliasResolver {
    os: OsIdentity,
}

impl AliasResolver {
    pub fn new(os: OsIdentity) -> Self {
        Self { os }
    }

    /// Translate the input when its leading token(s) form a known trigger.
    ///
    /// Multi-word triggers (`new-item -itemtype file`, `ls -a`) are tried
    /// longest-first so a longer trigger always wins over its own prefix.
    /// Returns `None` when no trigger matches or the matched concept has no
    /// command on this OS; the cascade then falls through to the next layer.
    pub fn translate(&self, input: &str) -> Option<String> {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        if tokens.is_empty() {
            return None;
        }

        for take in (1..=MAX_TRIGGER_TOKENS.min(tokens.len())).rev() {
            let trigger = tokens[..take].join(" ").to_lowercase();
            let Some(concept) = concept_for_trigger(&trigger) else {
                continue;
            };
            let prefix = concept.command_for(self.os)?;

            let args = &tokens[take..];
            let command = if args.is_empty() {
                prefix.to_string()
            } else {
                format!("{} {}", prefix, args.join(" "))
            };
            return Some(command.trim().to_string());
        }

        None
    }
}
