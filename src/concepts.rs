//! Command concepts for aish_core
//!
//! A concept is an OS-independent action ("list items", "make a directory")
//! that maps to a literal command prefix per OS. Concepts form a closed
//! enumeration so an unknown concept cannot exist at runtime, and the
//! per-OS tables are plain `match` arms checked at compile time.

use crate::os_profile::OsIdentity;
use serde::{Deserialize, Serialize};

/// OS-independent semantic actions the alias layer can translate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Concept {
    ListItems,
    ListAllItems,
    ShowLocation,
    ClearScreen,
    MakeDirectory,
    CreateFile,
}

impl Concept {
    /// The literal command prefix for this concept on the given OS, or
    /// `None` when the concept has no equivalent there.
    pub fn command_for(self, os: OsIdentity) -> Option<&'static str> {
        use OsIdentity::*;
        let cmd = match (self, os) {
            (Concept::ListItems, Windows) => "Get-ChildItem",
            (Concept::ListItems, Linux | Darwin) => "ls -l",
            (Concept::ListAllItems, Windows) => "Get-ChildItem -Force",
            (Concept::ListAllItems, Linux | Darwin) => "ls -a",
            (Concept::ShowLocation, Windows) => "Get-Location",
            (Concept::ShowLocation, Linux | Darwin) => "pwd",
            (Concept::ClearScreen, Windows) => "Clear-Host",
            (Concept::ClearScreen, Linux | Darwin) => "clear",
            (Concept::MakeDirectory, Windows) => "New-Item -ItemType Directory",
            (Concept::MakeDirectory, Linux | Darwin) => "mkdir",
            (Concept::CreateFile, Windows) => "New-Item -ItemType File",
            (Concept::CreateFile, Linux | Darwin) => "touch",
        };
        Some(cmd)
    }
}

/// Trigger phrases and the concept each one names.
///
/// Triggers are lowercase literals; the table is bidirectional in the sense
/// that both POSIX and PowerShell spellings map to the same concept, so
/// `get-childitem` typed on Linux translates to `ls -l` and vice versa.
pub const ALIAS_TRIGGERS: [(&str, Concept); 13] = [
    ("ls", Concept::ListItems),
    ("dir", Concept::ListItems),
    ("ls -a", Concept::ListAllItems),
    ("pwd", Concept::ShowLocation),
    ("clear", Concept::ClearScreen),
    ("cls", Concept::ClearScreen),
    ("mkdir", Concept::MakeDirectory),
    ("touch", Concept::CreateFile),
    ("get-childitem", Concept::ListItems),
    ("get-location", Concept::ShowLocation),
    ("clear-host", Concept::ClearScreen),
    ("new-item -itemtype directory", Concept::MakeDirectory),
    ("new-item -itemtype file", Concept::CreateFile),
];

/// Look up the concept named by a lowercase trigger phrase.
pub fn concept_for_trigger(trigger: &str) -> Option<Concept> {
    ALIAS_TRIGGERS
        .iter()
        .find(|(t, _)| *t == trigger)
        .map(|(_, c)| *c)
}

/// Longest trigger length in whitespace-delimited tokens.
pub const MAX_TRIGGER_TOKENS: usize = 3;
