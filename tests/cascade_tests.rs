//! End-to-end cascade tests: alias, rule and generative layers driven
//! through the public resolver API with a scripted generation backend.

use aish_core::error::GeneratorError;
use aish_core::generative::{CommandGenerator, GenerationOptions};
use aish_core::{CommandResolver, LocationAliases, Origin, OsIdentity};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Generation backend with canned answers per request text.
struct ScriptedBackend {
    responses: HashMap<String, String>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    fn new(responses: &[(&str, &str)]) -> Self {
        Self {
            responses: responses
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CommandGenerator for ScriptedBackend {
    async fn generate(
        &self,
        _system: &str,
        user: &str,
        _opts: &GenerationOptions,
    ) -> Result<String, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.responses
            .get(user)
            .cloned()
            .ok_or_else(|| GeneratorError::Unreachable("no canned response".to_string()))
    }
}

fn linux_resolver(backend: Arc<ScriptedBackend>) -> CommandResolver {
    let os = OsIdentity::Linux;
    let locations = LocationAliases::with_home(os, Path::new("/home/user"));
    CommandResolver::with_locations(backend, os, locations)
}

#[tokio::test]
async fn alias_scenario_ls_on_linux() {
    let backend = Arc::new(ScriptedBackend::new(&[]));
    let resolver = linux_resolver(Arc::clone(&backend));

    let resolved = resolver.resolve("ls").await.unwrap();
    assert_eq!(resolved.command, "ls -l");
    assert_eq!(resolved.origin, Origin::Alias);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rule_scenario_folder_in_cwd() {
    let backend = Arc::new(ScriptedBackend::new(&[]));
    let resolver = linux_resolver(Arc::clone(&backend));

    let resolved = resolver.resolve("create a folder named reports").await.unwrap();
    let expected = format!("mkdir \"{}\"", Path::new(".").join("reports").display());
    assert_eq!(resolved.command, expected);
    assert_eq!(resolved.origin, Origin::Rule);
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rule_scenario_file_on_desktop() {
    let backend = Arc::new(ScriptedBackend::new(&[]));
    let resolver = linux_resolver(backend);

    let resolved = resolver
        .resolve("create a file named notes.txt on desktop")
        .await
        .unwrap();
    let expected = format!(
        "touch \"{}\"",
        Path::new("/home/user/Desktop").join("notes.txt").display()
    );
    assert_eq!(resolved.command, expected);
    assert_eq!(resolved.origin, Origin::Rule);
}

#[tokio::test]
async fn windows_rule_emits_new_item() {
    let backend = Arc::new(ScriptedBackend::new(&[]));
    let os = OsIdentity::Windows;
    let locations = LocationAliases::with_home(os, Path::new("/home/user"));
    let resolver = CommandResolver::with_locations(backend, os, locations);

    let resolved = resolver.resolve("create a folder named reports").await.unwrap();
    assert!(resolved.command.starts_with("New-Item -ItemType Directory "));
    assert_eq!(resolved.origin, Origin::Rule);
}

#[tokio::test]
async fn dangerous_generation_never_surfaces_literally() {
    let backend = Arc::new(ScriptedBackend::new(&[(
        "delete everything recursively",
        "rm -rf /",
    )]));
    let resolver = linux_resolver(Arc::clone(&backend));

    let resolved = resolver.resolve("delete everything recursively").await.unwrap();
    assert_eq!(resolved.origin, Origin::Generative);
    assert_ne!(resolved.command, "rm -rf /");
    assert!(resolved.command.starts_with("echo "));
    assert!(resolved.command.contains("blocked"));
    assert!(resolved.note.unwrap().contains("safety gate"));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn generative_scenario_clean_answer() {
    let backend = Arc::new(ScriptedBackend::new(&[(
        "how much disk space is left",
        "```bash\ndf -h\n```",
    )]));
    let resolver = linux_resolver(backend);

    let resolved = resolver.resolve("how much disk space is left").await.unwrap();
    assert_eq!(resolved.command, "df -h");
    assert_eq!(resolved.origin, Origin::Generative);
    assert!(resolved.note.is_none());
}

#[tokio::test]
async fn backend_outage_becomes_diagnostic_result() {
    let backend = Arc::new(ScriptedBackend::new(&[]));
    let resolver = linux_resolver(backend);

    let resolved = resolver.resolve("summon the unknown").await.unwrap();
    assert_eq!(resolved.origin, Origin::Generative);
    assert!(resolved.command.starts_with("echo "));
    assert!(resolved.note.is_some());
}

#[tokio::test]
async fn empty_input_runs_no_layer() {
    let backend = Arc::new(ScriptedBackend::new(&[]));
    let resolver = linux_resolver(Arc::clone(&backend));

    assert!(resolver.resolve("").await.is_none());
    assert!(resolver.resolve(" \t\n").await.is_none());
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn resolver_is_shareable_across_tasks() {
    let backend = Arc::new(ScriptedBackend::new(&[]));
    let resolver = Arc::new(linux_resolver(backend));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let resolver = Arc::clone(&resolver);
        handles.push(tokio::spawn(async move {
            resolver.resolve("pwd").await.unwrap()
        }));
    }
    for handle in handles {
        let resolved = handle.await.unwrap();
        assert_eq!(resolved.command, "pwd");
        assert_eq!(resolved.origin, Origin::Alias);
    }
}
