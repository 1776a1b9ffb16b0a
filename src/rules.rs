//! Layer 2 resolution - structured creation-intent matching
//!
//! Recognizes "create/make a file/folder named X [on <location>]" style
//! requests and emits the OS-correct creation command directly, so common
//! phrasing never needs the generative layer. Applied only after Layer 1
//! declined; never calls a model.

use crate::os_profile::{LocationAliases, OsIdentity, LOCATION_KEYWORDS};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};

lazy_static! {
    static ref CREATION_RE: Regex = Regex::new(
        r#"\b(?:create|make)\s+(?:a\s+|an\s+|new\s+)*(?:.*?\s)??(file|folder|directory)\s+(?:named\s+|called\s+)?["']?(.+?)["']?\s*$"#
    )
    .expect("creation pattern compiles");
    static ref LOCATION_RE: Regex = Regex::new(&format!(
        r"\s*\bon\s+(?:the\s+)?({})\b",
        LOCATION_KEYWORDS.join("|")
    ))
    .expect("location pattern compiles");
}

/// What the creation pattern asked for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum CreationKind {
    File,
    Directory,
}

/// Structured-intent matcher for creation requests.
pub struct RuleEngine {
    os: OsIdentity,
    locations: LocationAliases,
}

impl RuleEngine {
    pub fn new(os: OsIdentity, locations: LocationAliases) -> Self {
        Self { os, locations }
    }

    /// Match the input against the creation pattern and emit the creation
    /// command, or `None` when the pattern does not apply.
    pub fn apply(&self, input: &str) -> Option<String> {
        let lower = input.trim().to_lowercase();

        // The location clause is excised before name capture so "on desktop"
        // never becomes part of the item name.
        let (scrubbed, base_dir) = match LOCATION_RE.captures(&lower) {
            Some(caps) => {
                let keyword = caps.get(1).map(|m| m.as_str())?;
                let whole = caps.get(0).map(|m| m.range())?;
                let mut rest = lower.clone();
                rest.replace_range(whole, " ");
                let base = self.locations.resolve(keyword)?.to_path_buf();
                (rest, base)
            }
            None => (lower.clone(), PathBuf::from(".")),
        };

        let caps = CREATION_RE.captures(scrubbed.trim())?;
        let kind = match caps.get(1)?.as_str() {
            "file" => CreationKind::File,
            _ => CreationKind::Directory,
        };
        let name = caps.get(2)?.as_str().trim();
        if name.is_empty() {
            return None;
        }

        Some(self.creation_command(kind, &base_dir.join(name)))
    }

    fn creation_command(&self, kind: CreationKind, path: &Path) -> String {
        if self.os.is_windows() {
            let item_type = match kind {
                CreationKind::Directory => "Directory",
                CreationKind::File => "File",
            };
            format!("New-Item -ItemType {} \"{}\"", item_type, path.display())
        } else {
            let command = match kind {
                CreationKind::Directory => "mkdir",
                CreationKind::File => "touch",
            };
            format!("{} \"{}\"", command, path.display())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(os: OsIdentity) -> RuleEngine {
        let locations = LocationAliases::with_home(os, Path::new("/home/user"));
        RuleEngine::new(os, locations)
    }

    #[test]
    fn test_folder_defaults_to_cwd() {
        let expected = format!("mkdir \"{}\"", Path::new(".").join("reports").display());
        assert_eq!(
            engine(OsIdentity::Linux).apply("create a folder named reports").unwrap(),
            expected
        );
    }

    #[test]
    fn test_file_on_desktop() {
        let expected = format!(
            "touch \"{}\"",
            Path::new("/home/user/Desktop").join("notes.txt").display()
        );
        assert_eq!(
            engine(OsIdentity::Linux)
                .apply("create a file named notes.txt on desktop")
                .unwrap(),
            expected
        );
    }

    #[test]
    fn test_location_before_name_keeps_name_clean() {
        let got = engine(OsIdentity::Linux)
            .apply("make a file called log.txt on the downloads")
            .unwrap();
        assert!(got.starts_with("touch "));
        assert!(got.contains("/home/user/Downloads"));
        assert!(got.ends_with("log.txt\""));
    }

    #[test]
    fn test_quoted_name() {
        let expected = format!("mkdir \"{}\"", Path::new(".").join("my project").display());
        assert_eq!(
            engine(OsIdentity::Linux)
                .apply("create a folder named \"my project\"")
                .unwrap(),
            expected
        );
    }

    #[test]
    fn test_directory_keyword() {
        let got = engine(OsIdentity::Linux).apply("make a directory called build").unwrap();
        assert!(got.starts_with("mkdir "));
        assert!(got.contains("build"));
    }

    #[test]
    fn test_windows_emission() {
        let got = engine(OsIdentity::Windows).apply("create a folder named reports").unwrap();
        assert!(got.starts_with("New-Item -ItemType Directory "));
        assert!(got.contains("reports"));

        let got = engine(OsIdentity::Windows).apply("create a file named notes.txt").unwrap();
        assert!(got.starts_with("New-Item -ItemType File "));
    }

    #[test]
    fn test_no_creation_intent_falls_through() {
        let engine = engine(OsIdentity::Linux);
        assert!(engine.apply("list all text files sorted by size").is_none());
        assert!(engine.apply("delete the folder named reports").is_none());
        assert!(engine.apply("").is_none());
    }

    #[test]
    fn test_pure_and_repeatable() {
        let engine = engine(OsIdentity::Linux);
        let first = engine.apply("create a folder named reports");
        let second = engine.apply("create a folder named reports");
        assert_eq!(first, second);
    }
}
