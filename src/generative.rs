//! Layer 3 resolution - model-backed fallback
//!
//! Invoked only when the alias and rule layers both declined. Builds an
//! OS-parameterized system prompt with few-shot translation examples, asks
//! the generation collaborator for a single command, then extracts a clean
//! command string from whatever prose the model wrapped it in. The result
//! always passes the safety gate before being returned, and every failure
//! mode is converted into an inert diagnostic command; this layer never
//! raises to its caller.

use crate::error::GeneratorError;
use crate::os_profile::{LocationAliases, OsIdentity};
use crate::safety::{blocked_notice, GateVerdict, SafetyGate};
use crate::structured_log::{log_event, LogLevel};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Default local Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
/// Default model, matching the local assistant deployment.
pub const DEFAULT_MODEL: &str = "phi3:mini";

/// Sampling options forwarded to the generation collaborator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_tokens: Option<u32>,
}

impl GenerationOptions {
    /// Deterministic sampling for command translation.
    pub fn deterministic() -> Self {
        Self {
            temperature: 0.0,
            max_tokens: Some(128),
        }
    }
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self::deterministic()
    }
}

/// Text-generation collaborator used by the fallback layer.
#[async_trait]
pub trait CommandGenerator: Send + Sync {
    async fn generate(
        &self,
        system: &str,
        user: &str,
        opts: &GenerationOptions,
    ) -> Result<String, GeneratorError>;
}

/// Suggestion-generation collaborator used by the autocomplete subsystem.
///
/// Returns a bounded, relevance-ordered list of completion candidates.
#[async_trait]
pub trait SuggestionGenerator: Send + Sync {
    async fn suggest(&self, text: &str, limit: usize) -> Result<Vec<String>, GeneratorError>;
}

// =============================================================================
// OLLAMA CLIENT
// =============================================================================

#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

/// Generation collaborator backed by a local Ollama server.
pub struct OllamaGenerator {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Client for the default local endpoint and model.
    pub fn local() -> Self {
        Self::new(DEFAULT_OLLAMA_URL, DEFAULT_MODEL)
    }

    async fn call(
        &self,
        system: Option<&str>,
        prompt: &str,
        opts: &GenerationOptions,
    ) -> Result<String, GeneratorError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = OllamaRequest {
            model: &self.model,
            prompt,
            stream: false,
            system,
            options: OllamaOptions {
                temperature: opts.temperature,
                num_predict: opts.max_tokens,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| GeneratorError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GeneratorError::Malformed(format!(
                "status {}",
                response.status()
            )));
        }

        let parsed: OllamaResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::Malformed(e.to_string()))?;
        Ok(parsed.response)
    }
}

#[async_trait]
impl CommandGenerator for OllamaGenerator {
    async fn generate(
        &self,
        system: &str,
        user: &str,
        opts: &GenerationOptions,
    ) -> Result<String, GeneratorError> {
        self.call(Some(system), user, opts).await
    }
}

const SUGGESTION_SYSTEM_PROMPT: &str = "You complete partial terminal requests. \
Given the user's partial input, reply with up to {limit} likely completions of \
that input, one per line, most likely first. Reply with the completions only, \
no numbering, no commentary.";

#[async_trait]
impl SuggestionGenerator for OllamaGenerator {
    async fn suggest(&self, text: &str, limit: usize) -> Result<Vec<String>, GeneratorError> {
        let system = SUGGESTION_SYSTEM_PROMPT.replace("{limit}", &limit.to_string());
        let opts = GenerationOptions {
            temperature: 0.2,
            max_tokens: Some(160),
        };
        let response = self.call(Some(&system), text, &opts).await?;
        let candidates = response
            .lines()
            .map(|l| l.trim().trim_matches('`').to_string())
            .filter(|l| !l.is_empty())
            .take(limit)
            .collect();
        Ok(candidates)
    }
}

// =============================================================================
// PROMPT CONSTRUCTION & EXTRACTION
// =============================================================================

/// Build the translation system prompt for the detected OS.
///
/// Few-shot examples teach the model to answer with exactly one command;
/// the location examples use the real resolved paths so path answers come
/// back in the user's own directory layout.
pub fn build_system_prompt(os: OsIdentity, locations: &LocationAliases) -> String {
    let desktop = locations.desktop().display();
    let examples = if os.is_windows() {
        format!(
            r#"- User request: "ls" -> Your response: "Get-ChildItem"
- User request: "ls -a" -> Your response: "Get-ChildItem -Force"
- User request: "mkdir my_folder" -> Your response: "New-Item -ItemType Directory -Name my_folder"
- User request: "touch new_file.txt" -> Your response: "New-Item -ItemType File -Name new_file.txt"
- User request: "list all folders on the desktop" -> Your response: "Get-ChildItem -Path "{desktop}" -Directory"
- User request: "list all text files sorted by size" -> Your response: "Get-ChildItem -Path . -Filter *.txt | Sort-Object -Property Length"
- User request: "pwd" -> Your response: "Get-Location""#
        )
    } else {
        format!(
            r#"- User request: "dir" -> Your response: "ls -l"
- User request: "show hidden files" -> Your response: "ls -a"
- User request: "make a folder named my_folder" -> Your response: "mkdir my_folder"
- User request: "create an empty file new_file.txt" -> Your response: "touch new_file.txt"
- User request: "list all folders on the desktop" -> Your response: "ls -d {desktop}/*/"
- User request: "list all text files sorted by size" -> Your response: "ls -lS *.txt"
- User request: "where am i" -> Your response: "pwd""#
        )
    };

    format!(
        "You are an expert assistant that translates natural language or foreign \
shell commands into a single, executable command for the {} ({}) shell. \
Provide only the command.\n\nExamples:\n{}",
        os.name(),
        os.shell_name(),
        examples
    )
}

lazy_static! {
    static ref CODE_BLOCK_RE: Regex =
        Regex::new(r"(?s)```(?:\w+\n)?(.*?)```").expect("code block pattern compiles");
}

/// Pull a single clean command out of free-form model output.
///
/// Priority order: first fenced code block, then the last non-empty line,
/// then the sanitized raw response. Returns `None` when nothing usable
/// remains.
pub fn extract_command(content: &str) -> Option<String> {
    if let Some(caps) = CODE_BLOCK_RE.captures(content) {
        let block = caps.get(1).map(|m| m.as_str()).unwrap_or("").trim();
        if !block.is_empty() {
            return Some(block.to_string());
        }
    }

    if let Some(last) = content.lines().rev().find(|l| !l.trim().is_empty()) {
        let line = sanitize_line(last);
        if !line.is_empty() {
            return Some(line);
        }
    }

    let raw = sanitize(content);
    if raw.is_empty() {
        None
    } else {
        Some(raw)
    }
}

// A trailing period after inline code is prose punctuation; a bare trailing
// "." is a command argument. Only lines that carried backticks get the
// punctuation strip.
fn sanitize_line(line: &str) -> String {
    let trimmed = line.trim();
    if trimmed.contains('`') {
        sanitize(trimmed)
    } else {
        trimmed.to_string()
    }
}

fn sanitize(text: &str) -> String {
    text.replace('`', "")
        .trim()
        .trim_end_matches(['.', ';', '!'])
        .trim()
        .to_string()
}

/// True when the model explicitly declined instead of answering.
fn looks_like_refusal(content: &str) -> bool {
    let lower = content.to_lowercase();
    ["i cannot", "i can't", "i am unable", "i'm unable", "unable to provide"]
        .iter()
        .any(|phrase| lower.contains(phrase))
}

/// Fixed diagnostic when no usable command could be produced.
const NO_COMMAND_NOTICE: &str = "echo \"no executable command could be produced for this request\"";

fn unavailable_notice(detail: &str) -> String {
    format!(
        "echo \"command generation unavailable: {}\"",
        detail.replace('"', "'")
    )
}

// =============================================================================
// FALLBACK LAYER
// =============================================================================

/// The Layer 3 orchestration: prompt, generate, extract, gate.
pub struct GenerativeFallback {
    generator: std::sync::Arc<dyn CommandGenerator>,
    gate: SafetyGate,
    system_prompt: String,
}

impl GenerativeFallback {
    pub fn new(
        generator: std::sync::Arc<dyn CommandGenerator>,
        os: OsIdentity,
        locations: &LocationAliases,
    ) -> Self {
        Self {
            generator,
            gate: SafetyGate::new(),
            system_prompt: build_system_prompt(os, locations),
        }
    }

    /// Resolve free-form text into a safe command string plus an optional
    /// status note. Infallible by construction: every failure path yields
    /// an inert diagnostic command.
    pub async fn resolve(&self, text: &str) -> (String, Option<String>) {
        let request_id = format!("gen-{}", uuid::Uuid::new_v4());
        let response = match self
            .generator
            .generate(&self.system_prompt, text, &GenerationOptions::deterministic())
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log_event(
                    LogLevel::Warn,
                    "GENERATIVE",
                    "backend_error",
                    json!({"request_id": request_id, "error": e.to_string()}),
                );
                return (
                    unavailable_notice(&e.to_string()),
                    Some("generation backend unavailable".to_string()),
                );
            }
        };

        if looks_like_refusal(&response) {
            return (
                NO_COMMAND_NOTICE.to_string(),
                Some("model declined to produce a command".to_string()),
            );
        }

        let Some(command) = extract_command(&response) else {
            log_event(
                LogLevel::Warn,
                "GENERATIVE",
                "no_extractable_command",
                json!({"request_id": request_id}),
            );
            return (
                NO_COMMAND_NOTICE.to_string(),
                Some("model output contained no command".to_string()),
            );
        };

        match self.gate.inspect(&command) {
            GateVerdict::Pass => (command, None),
            GateVerdict::Blocked { rule, original } => {
                log_event(
                    LogLevel::Warn,
                    "GENERATIVE",
                    "gate_blocked",
                    json!({"request_id": request_id, "rule": rule}),
                );
                (
                    blocked_notice(&rule, &original),
                    Some(format!("blocked by safety gate ({})", rule)),
                )
            }
        }
    }
}
