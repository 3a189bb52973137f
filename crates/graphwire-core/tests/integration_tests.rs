//! Integration tests for graphwire-core: whole compilation passes over
//! small in-memory file trees.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use graphwire_core::{
    application::{ApplicationError, ContainerBuilder, ExtensionHandler, ResourceLocator},
    domain::{DomainError, ErrorKind},
    prelude::*,
};
use serde_json::{Map, Value as JsonValue};

/// Files keyed by absolute path; resources resolve by plain join.
struct Files(HashMap<PathBuf, String>);

impl Files {
    fn new(files: &[(&str, &str)]) -> Self {
        Self(
            files
                .iter()
                .map(|(p, body)| (PathBuf::from(p), body.to_string()))
                .collect(),
        )
    }
}

impl ResourceLocator for Files {
    fn locate(&self, resource: &str, current_dir: Option<&Path>) -> GraphResult<PathBuf> {
        let path = current_dir.unwrap_or(Path::new("/app")).join(resource);
        if self.0.contains_key(&path) {
            Ok(path)
        } else {
            Err(ApplicationError::ResourceNotFound {
                resource: resource.to_string(),
                searched: "/app".into(),
            }
            .into())
        }
    }

    fn read(&self, path: &Path) -> GraphResult<String> {
        Ok(self.0.get(path).cloned().unwrap_or_default())
    }
}

fn compiler(files: &[(&str, &str)]) -> GraphCompiler {
    GraphCompiler::new(Box::new(Files::new(files)))
}

#[test]
fn end_to_end_reference_resolution() {
    let graph = compiler(&[(
        "/app/services.json",
        r#"{"services": {"a": {"class": "X", "arguments": ["@b", "@?c", "@@d", "@=e+1"]}, "b": {"class": "Y"}}}"#,
    )])
    .compile("services.json")
    .unwrap();

    let ids: Vec<_> = graph.definitions().keys().map(String::as_str).collect();
    assert_eq!(ids, ["a", "b"]);
    assert_eq!(
        graph.get("a").unwrap().arguments(),
        &[
            Value::Reference(Reference::strict("b")),
            Value::Reference(Reference::optional("c")),
            Value::Reference(Reference::literal("@d")),
            Value::Reference(Reference::expression("e+1")),
        ]
    );
}

#[test]
fn duplicate_id_across_base_and_import_is_fatal() {
    let err = compiler(&[
        (
            "/app/services.json",
            r#"{"imports": [{"resource": "more.json"}], "services": {"mailer": {"class": "A"}}}"#,
        ),
        ("/app/more.json", r#"{"services": {"mailer": {"class": "B"}}}"#),
    ])
    .compile("services.json")
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Schema);
    assert!(matches!(
        err,
        GraphError::Domain(DomainError::DuplicateId { ref id, .. }) if id == "mailer"
    ));
}

#[test]
fn unknown_key_names_key_and_id() {
    let err = compiler(&[(
        "/app/services.json",
        r#"{"services": {"paint": {"class": "P", "colour": "red"}}}"#,
    )])
    .compile("services.json")
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Schema);
    let message = err.to_string();
    assert!(message.contains("\"colour\""));
    assert!(message.contains("\"paint\""));
    assert!(message.contains("/app/services.json"));
}

#[test]
fn sigil_in_factory_is_rejected() {
    let err = compiler(&[(
        "/app/services.json",
        r#"{"services": {"mailer": {"class": "M", "factory": "@service:method"}}}"#,
    )])
    .compile("services.json")
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidFactoryReference);
    assert!(err.to_string().contains("without the \"@\" prefix"));
}

#[test]
fn abstract_command_handler_fails_wiring() {
    let mut registry = CapabilityRegistry::new();
    registry.register(ClassDescriptor::new("App\\Handler").with(Capability::CommandHandler));

    let err = compiler(&[(
        "/app/services.json",
        r#"{"services": {
            "common.command_service_map": {"class": "App\\ServiceMap"},
            "handler": {"class": "App\\Handler", "abstract": true,
                        "tags": [{"name": "common.command_handler", "command": "App\\DoIt"}]}
        }}"#,
    )])
    .with_wiring(TagWiringCompiler::new("common", registry))
    .compile("services.json")
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Wiring);
    assert!(err.to_string().contains("\"handler\""));
}

#[test]
fn full_application_wiring() {
    let mut registry = CapabilityRegistry::new();
    registry
        .register(ClassDescriptor::new("App\\RegisterUserHandler").with(Capability::CommandHandler))
        .register(ClassDescriptor::new("App\\UserByIdHandler").with(Capability::QueryHandler))
        .register(ClassDescriptor::new("App\\Mailer").with(Capability::EventSubscriber));

    let graph = compiler(&[
        (
            "/app/services.json",
            r#"{
                "imports": [{"resource": "bus/bus.json"}, {"resource": "optional.json", "ignore_errors": true}],
                "parameters": {"app.ns": "App"},
                "services": {
                    "register_user": {"class": "%app.ns%\\RegisterUserHandler",
                        "tags": [{"name": "acme.command_handler", "command": "App\\RegisterUser"}]},
                    "user_by_id": {"class": "App\\UserByIdHandler",
                        "tags": [{"name": "acme.query_handler", "query": "App\\UserById"}]},
                    "mailer": {"class": "%app.ns%\\Mailer",
                        "tags": [{"name": "acme.event_subscriber"}]},
                    "logging_filter": {"class": "App\\LoggingFilter",
                        "tags": [{"name": "acme.command_filter"}, {"name": "acme.query_filter"}]}
                }
            }"#,
        ),
        (
            "/app/bus/bus.json",
            r#"{"services": {
                "bus.commands": {"class": "Bus\\CommandMap"},
                "acme.command_service_map": "@bus.commands",
                "acme.command_pipeline": {"class": "Bus\\Pipeline"},
                "acme.query_service_map": {"class": "Bus\\QueryMap"},
                "acme.query_pipeline": {"class": "Bus\\Pipeline"},
                "acme.event_dispatcher": {"class": "Bus\\Dispatcher"}
            }}"#,
        ),
    ])
    .with_wiring(TagWiringCompiler::new("acme", registry))
    .compile("services.json")
    .unwrap();

    let commands = graph.get("acme.command_service_map").unwrap().method_calls();
    assert_eq!(
        commands,
        &[MethodCall::new(
            "registerHandler",
            vec![Value::from("App\\RegisterUser"), Value::from("register_user")]
        )]
    );
    assert_eq!(graph.get("bus.commands").unwrap().method_calls().len(), 1);

    let events = graph.get("acme.event_dispatcher").unwrap().method_calls();
    assert_eq!(
        events[0].arguments,
        vec![Value::from("App\\Mailer"), Value::from("mailer")]
    );

    for pipeline in ["acme.command_pipeline", "acme.query_pipeline"] {
        assert_eq!(
            graph.get(pipeline).unwrap().method_calls()[0].arguments,
            vec![Value::Reference(Reference::strict("logging_filter"))]
        );
    }
    assert_eq!(graph.get("acme.query_service_map").unwrap().method_calls().len(), 1);

    let resources: Vec<_> = graph.resources().collect();
    assert_eq!(
        resources,
        [Path::new("/app/services.json"), Path::new("/app/bus/bus.json")]
    );
}

/// Turns `{"debug": <bool>}` blocks into a `kernel.debug` parameter and
/// registers a definition.
struct KernelExtension;

impl ExtensionHandler for KernelExtension {
    fn namespace(&self) -> &str {
        "kernel"
    }

    fn load(
        &self,
        configs: &[Map<String, JsonValue>],
        container: &mut dyn ContainerBuilder,
    ) -> GraphResult<()> {
        let debug = configs
            .iter()
            .filter_map(|c| c.get("debug").and_then(JsonValue::as_bool))
            .last()
            .unwrap_or(false);
        container.set_parameter("kernel.debug", Value::Bool(debug));
        container.set_definition("kernel", ServiceDefinition::with_class("App\\Kernel"));
        Ok(())
    }
}

#[test]
fn extension_blocks_reach_their_handler() {
    let mut compiler = compiler(&[
        (
            "/app/services.json",
            r#"{"imports": [{"resource": "dev.json"}], "kernel": {"debug": false}}"#,
        ),
        ("/app/dev.json", r#"{"kernel": {"debug": true}}"#),
    ]);
    compiler.register_extension(Box::new(KernelExtension)).unwrap();

    let graph = compiler.compile("services.json").unwrap();
    // the importing file's block is queued after its imports
    assert_eq!(graph.parameter("kernel.debug"), Some(&Value::Bool(false)));
    assert!(graph.has("kernel"));
}

#[test]
fn non_object_extension_block_becomes_empty() {
    let mut compiler = compiler(&[("/app/services.json", r#"{"kernel": null}"#)]);
    compiler.register_extension(Box::new(KernelExtension)).unwrap();

    let graph = compiler.compile("services.json").unwrap();
    assert_eq!(graph.parameter("kernel.debug"), Some(&Value::Bool(false)));
}

#[test]
fn empty_document_compiles_to_empty_graph() {
    let graph = compiler(&[("/app/services.json", "")])
        .compile("services.json")
        .unwrap();
    assert!(graph.is_empty());
    assert_eq!(graph.resources().count(), 1);
}

#[test]
fn several_entry_documents_share_one_graph() {
    let compiler = compiler(&[
        ("/app/a.json", r#"{"services": {"a": {}}}"#),
        ("/app/b.json", r#"{"services": {"b": {"parent": "a"}}}"#),
    ]);
    let graph = compiler.compile_all(&["a.json", "b.json"]).unwrap();
    assert!(graph.has("a") && graph.has("b"));

    let err = compiler.compile_all(&["a.json", "a.json", "nope.json"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Import);
}
