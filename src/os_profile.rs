//! OS identity and location aliases for aish_core
//!
//! The resolver emits a different command dialect per operating system, and
//! the rule layer needs well-known folder paths ("desktop", "documents",
//! "downloads") resolved against the user's home directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The operating system the resolver emits commands for.
///
/// Detected once per process and immutable afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OsIdentity {
    Windows,
    Linux,
    Darwin,
}

impl OsIdentity {
    /// Detect the host OS from the build target.
    pub fn detect() -> Self {
        if cfg!(target_os = "windows") {
            OsIdentity::Windows
        } else if cfg!(target_os = "macos") {
            OsIdentity::Darwin
        } else {
            OsIdentity::Linux
        }
    }

    pub fn is_windows(self) -> bool {
        matches!(self, OsIdentity::Windows)
    }

    /// Human-readable OS name, as used in generation prompts.
    pub fn name(self) -> &'static str {
        match self {
            OsIdentity::Windows => "Windows",
            OsIdentity::Linux => "Linux",
            OsIdentity::Darwin => "Darwin",
        }
    }

    /// The shell dialect commands are written for on this OS.
    pub fn shell_name(self) -> &'static str {
        match self {
            OsIdentity::Windows => "PowerShell",
            OsIdentity::Linux | OsIdentity::Darwin => "bash/zsh",
        }
    }
}

/// Resolved absolute paths for the location keywords the rule layer accepts.
///
/// Computed once per process from the home directory. On Windows the
/// OneDrive-managed desktop is preferred when it exists.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocationAliases {
    desktop: PathBuf,
    documents: PathBuf,
    downloads: PathBuf,
}

/// Keywords recognized in "on <location>" clauses.
pub const LOCATION_KEYWORDS: [&str; 3] = ["desktop", "documents", "downloads"];

impl LocationAliases {
    /// Discover locations from the current user's home directory.
    ///
    /// Falls back to the current directory when no home can be determined
    /// (e.g. stripped-down containers).
    pub fn discover(os: OsIdentity) -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::with_home(os, &home)
    }

    /// Build the table from an explicit home directory.
    pub fn with_home(os: OsIdentity, home: &Path) -> Self {
        let desktop = if os.is_windows() {
            let onedrive = home.join("OneDrive").join("Desktop");
            if onedrive.exists() {
                onedrive
            } else {
                home.join("Desktop")
            }
        } else {
            home.join("Desktop")
        };

        Self {
            desktop,
            documents: home.join("Documents"),
            downloads: home.join("Downloads"),
        }
    }

    /// Resolve a location keyword to its absolute path.
    pub fn resolve(&self, keyword: &str) -> Option<&Path> {
        match keyword.trim().to_lowercase().as_str() {
            "desktop" => Some(&self.desktop),
            "documents" => Some(&self.documents),
            "downloads" => Some(&self.downloads),
            _ => None,
        }
    }

    pub fn desktop(&self) -> &Path {
        &self.desktop
    }

    pub fn documents(&self) -> &Path {
        &self.documents
    }

    pub fn downloads(&self) -> &Path {
        &self.downloads
    }
}
