//! Safety gate for aish_core
//!
//! Screens candidate commands against a fixed set of destructive-operation
//! patterns before they are surfaced or executed. A blocked command is never
//! forwarded; the gate substitutes an inert diagnostic that shows the human
//! what would have run so they can review and re-issue it manually.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Categories of destructive operations the gate recognizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DangerCategory {
    RecursiveDelete,
    DiskFormat,
    RawDiskWrite,
    PowerState,
    ForkBomb,
    PermissionSweep,
}

/// A named destructive-operation pattern.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DangerPattern {
    pub name: String,
    pub pattern: String,
    pub category: DangerCategory,
}

struct CompiledPattern {
    info: DangerPattern,
    regex: Regex,
}

/// Verdict for a candidate command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateVerdict {
    /// The command carries none of the known destructive patterns.
    Pass,
    /// The command matched a destructive pattern and must not run.
    Blocked { rule: String, original: String },
}

/// The destructive-pattern filter.
pub struct SafetyGate {
    patterns: Vec<CompiledPattern>,
}

impl SafetyGate {
    /// Create a gate with the default pattern set.
    pub fn new() -> Self {
        Self::with_patterns(Self::default_patterns())
    }

    /// Create a gate with custom patterns. Patterns that fail to compile
    /// are dropped.
    pub fn with_patterns(patterns: Vec<DangerPattern>) -> Self {
        let compiled = patterns
            .into_iter()
            .filter_map(|p| {
                Regex::new(&p.pattern)
                    .ok()
                    .map(|regex| CompiledPattern { info: p, regex })
            })
            .collect();
        Self { patterns: compiled }
    }

    /// Classify a candidate command.
    pub fn inspect(&self, command: &str) -> GateVerdict {
        for compiled in &self.patterns {
            if compiled.regex.is_match(command) {
                return GateVerdict::Blocked {
                    rule: compiled.info.name.clone(),
                    original: command.to_string(),
                };
            }
        }
        GateVerdict::Pass
    }

    /// True when the command matches any destructive pattern.
    pub fn is_dangerous(&self, command: &str) -> bool {
        matches!(self.inspect(command), GateVerdict::Blocked { .. })
    }

    fn default_patterns() -> Vec<DangerPattern> {
        let p = |name: &str, pattern: &str, category| DangerPattern {
            name: name.to_string(),
            pattern: pattern.to_string(),
            category,
        };
        vec![
            p(
                "recursive delete",
                r"(?i)\brm\s+-[a-z]*(?:rf|fr)[a-z]*\b",
                DangerCategory::RecursiveDelete,
            ),
            p(
                "recursive delete (PowerShell)",
                r"(?i)\bremove-item\b.*-recurse.*-force|\bremove-item\b.*-force.*-recurse",
                DangerCategory::RecursiveDelete,
            ),
            p(
                "filesystem make",
                r"(?i)\bmkfs(\.[a-z0-9]+)?\b",
                DangerCategory::DiskFormat,
            ),
            p(
                "disk format",
                r"(?i)\b(?:format\s+[a-z]:|diskpart\b|format-volume\b)",
                DangerCategory::DiskFormat,
            ),
            p(
                "raw disk write",
                r"(?i)\bdd\b[^|;]*\bof=/dev/|>\s*/dev/(?:sd[a-z]|nvme|hd[a-z])",
                DangerCategory::RawDiskWrite,
            ),
            p(
                "shutdown/reboot",
                r"(?i)\b(?:shutdown|reboot|poweroff|halt|stop-computer|restart-computer)\b",
                DangerCategory::PowerState,
            ),
            p(
                "fork bomb",
                r":\(\)\s*\{\s*:\|:\s*&\s*\}\s*;\s*:",
                DangerCategory::ForkBomb,
            ),
            p(
                "permission sweep",
                r"(?i)\bchmod\s+-[a-z]*r[a-z]*\s+777\s+/(?:\s|$)",
                DangerCategory::PermissionSweep,
            ),
        ]
    }
}

impl Default for SafetyGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the inert replacement surfaced in place of a blocked command.
///
/// The replacement is itself a runnable no-op (an echo) so the pipeline
/// downstream of the gate never has to special-case blocked results.
pub fn blocked_notice(rule: &str, original: &str) -> String {
    let inert = original.replace('"', "'");
    format!(
        "echo \"[blocked: {}] command withheld for review: {}\"",
        rule, inert
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recursive_delete_blocked() {
        let gate = SafetyGate::new();
        assert!(gate.is_dangerous("rm -rf /"));
        assert!(gate.is_dangerous("rm -fr ~/projects"));
        assert!(gate.is_dangerous("sudo rm -rf / --no-preserve-root"));
        assert!(gate.is_dangerous("Remove-Item C:\\Users -Recurse -Force"));
    }

    #[test]
    fn test_disk_operations_blocked() {
        let gate = SafetyGate::new();
        assert!(gate.is_dangerous("mkfs.ext4 /dev/sda1"));
        assert!(gate.is_dangerous("dd if=/dev/zero of=/dev/sda"));
        assert!(gate.is_dangerous("echo junk > /dev/sda"));
        assert!(gate.is_dangerous("format c:"));
    }

    #[test]
    fn test_power_state_blocked() {
        let gate = SafetyGate::new();
        assert!(gate.is_dangerous("shutdown -h now"));
        assert!(gate.is_dangerous("reboot"));
        assert!(gate.is_dangerous("Restart-Computer"));
    }

    #[test]
    fn test_fork_bomb_blocked() {
        let gate = SafetyGate::new();
        assert!(gate.is_dangerous(":(){ :|:& };:"));
    }

    #[test]
    fn test_safe_commands_pass() {
        let gate = SafetyGate::new();
        assert_eq!(gate.inspect("ls -la"), GateVerdict::Pass);
        assert_eq!(gate.inspect("cat /tmp/test.txt"), GateVerdict::Pass);
        assert_eq!(gate.inspect("mkdir \"./reports\""), GateVerdict::Pass);
        // "rm" without the recursive-force flags is allowed through.
        assert_eq!(gate.inspect("rm notes.txt"), GateVerdict::Pass);
        // "performance" contains "form" but is not a format invocation.
        assert_eq!(gate.inspect("grep performance log.txt"), GateVerdict::Pass);
    }

    #[test]
    fn test_case_insensitive() {
        let gate = SafetyGate::new();
        assert!(gate.is_dangerous("RM -RF /"));
        assert!(gate.is_dangerous("MKFS.EXT4 /dev/sdb"));
    }

    #[test]
    fn test_blocked_verdict_preserves_original() {
        let gate = SafetyGate::new();
        match gate.inspect("rm -rf /") {
            GateVerdict::Blocked { rule, original } => {
                assert_eq!(rule, "recursive delete");
                assert_eq!(original, "rm -rf /");
            }
            GateVerdict::Pass => panic!("expected blocked"),
        }
    }

    #[test]
    fn test_blocked_notice_is_inert() {
        let notice = blocked_notice("recursive delete", "rm -rf \"/tmp\"");
        assert!(notice.starts_with("echo "));
        assert!(notice.contains("rm -rf '/tmp'"));
        assert!(!notice.contains("rm -rf \"/tmp\""));
    }
}
