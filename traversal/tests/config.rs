//! Configuration-phase failure modes: everything must surface before
//! serving ever starts.

use std::sync::Arc;

use traversal::testing::{MockExchange, RespondingHandler};
use traversal::{
    ChainKind, ConfigError, DynHandler, ResourceDescriptor, RouterBuilder, Selector, boxed,
};

type Builder = RouterBuilder<MockExchange>;

fn view() -> Arc<dyn DynHandler<MockExchange>> {
    boxed(RespondingHandler::new("ok"))
}

#[test]
fn duplicate_resource_is_rejected() {
    let mut builder = Builder::new();
    builder
        .register_resource(ResourceDescriptor::new("rootResource"))
        .unwrap();
    let err = builder
        .register_resource(ResourceDescriptor::new("rootResource"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::DuplicateResource(id) if id == "rootResource"));
}

#[test]
fn malformed_descriptor_is_rejected() {
    let mut builder = Builder::new();
    let err = builder
        .register_resource(ResourceDescriptor::new("bad").children([("a/b", "other")]))
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidDescriptor { id, .. } if id == "bad"));

    let err = builder
        .register_resource(ResourceDescriptor::new(""))
        .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidDescriptor { .. }));
}

#[test]
fn root_must_be_registered() {
    let mut builder = Builder::new();
    let err = builder.set_root("missing").unwrap_err();
    assert!(matches!(err, ConfigError::UnknownResource(id) if id == "missing"));
}

#[test]
fn chain_requires_root_first() {
    let mut builder = Builder::new();
    builder
        .register_resource(ResourceDescriptor::new("testResource"))
        .unwrap();
    let err = builder
        .register_chain("testResource", Selector::new(), ChainKind::Terminal, [view()])
        .unwrap_err();
    assert!(matches!(err, ConfigError::RootNotSet));
}

#[test]
fn chain_target_must_be_registered() {
    let mut builder = Builder::new();
    builder
        .register_resource(ResourceDescriptor::new("testResource"))
        .unwrap();
    builder.set_root("testResource").unwrap();
    let err = builder
        .register_chain("asd", Selector::new(), ChainKind::Terminal, [view()])
        .unwrap_err();
    assert!(matches!(err, ConfigError::UnknownResource(id) if id == "asd"));
}

#[test]
fn ancestor_selector_must_be_registered() {
    let mut builder = Builder::new();
    builder
        .register_resource(ResourceDescriptor::new("testResource"))
        .unwrap();
    builder.set_root("testResource").unwrap();
    let err = builder
        .register_chain(
            "testResource",
            Selector::new().ancestor("ghost"),
            ChainKind::Terminal,
            [view()],
        )
        .unwrap_err();
    assert!(matches!(err, ConfigError::UnknownResource(id) if id == "ghost"));
}

#[test]
fn empty_handler_chain_is_rejected() {
    let mut builder = Builder::new();
    builder
        .register_resource(ResourceDescriptor::new("testResource"))
        .unwrap();
    builder.set_root("testResource").unwrap();
    let err = builder
        .register_chain(
            "testResource",
            Selector::new(),
            ChainKind::Terminal,
            Vec::<Arc<dyn DynHandler<MockExchange>>>::new(),
        )
        .unwrap_err();
    assert!(matches!(err, ConfigError::EmptyHandlerChain));
}

#[test]
fn build_requires_root() {
    let mut builder = Builder::new();
    builder
        .register_resource(ResourceDescriptor::new("testResource"))
        .unwrap();
    let err = builder.build().unwrap_err();
    assert!(matches!(err, ConfigError::RootNotSet));
}

#[test]
fn build_checks_child_references() {
    let mut builder = Builder::new();
    builder
        .register_resource(ResourceDescriptor::new("rootResource").children([("u", "ghost")]))
        .unwrap();
    builder.set_root("rootResource").unwrap();
    let err = builder.build().unwrap_err();
    assert!(matches!(err, ConfigError::UnknownResource(id) if id == "ghost"));

    let mut builder = Builder::new();
    builder
        .register_resource(ResourceDescriptor::new("rootResource").child("ghost"))
        .unwrap();
    builder.set_root("rootResource").unwrap();
    let err = builder.build().unwrap_err();
    assert!(matches!(err, ConfigError::UnknownResource(id) if id == "ghost"));
}

#[test]
fn forward_child_references_resolve_at_build() {
    let mut builder = Builder::new();
    builder
        .register_resource(ResourceDescriptor::new("rootResource").children([("users", "usersResource")]))
        .unwrap();
    // usersResource is registered after the descriptor that references it.
    builder
        .register_resource(ResourceDescriptor::new("usersResource"))
        .unwrap();
    builder.set_root("rootResource").unwrap();
    let router = builder.build().unwrap();
    assert_eq!(router.root_id(), "rootResource");
    assert!(router.has_resource("usersResource"));
    assert!(!router.has_resource("ghost"));
}
