//! Integration tests for extension class validation.

use extloom_core::prelude::*;
use extloom_core::BuildError;
use std::collections::HashSet;

const OWNER: &str = "com.example.Strings";

fn designated(name: &str) -> MemberDeclaration {
    MemberDeclaration::new(name, OWNER).with_kind(BehaviorKind::Designated)
}

fn effect(name: &str) -> MemberDeclaration {
    MemberDeclaration::new(name, "void").with_kind(BehaviorKind::VoidEffect)
}

#[test]
fn test_build_valid_class() {
    let class = ExtensionClass::build(
        DelegateKind::InstanceDelegate,
        OWNER,
        vec![
            effect("trim"),
            designated("get"),
            MemberDeclaration::new("length", "int").with_kind(BehaviorKind::Return),
        ],
    )
    .unwrap();

    assert_eq!(class.owner().as_str(), OWNER);
    assert_eq!(class.delegate_kind(), DelegateKind::InstanceDelegate);
    assert_eq!(class.designated().name, "get");

    let names: Vec<_> = class.methods().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["trim", "length"]);
    assert_eq!(class.methods()[1].kind, MethodKind::Return);
    assert_eq!(
        class.merge_key(),
        MergeKey::new(OWNER, DelegateKind::InstanceDelegate)
    );
}

#[test]
fn test_duplicate_designated_names_both() {
    let err = ExtensionClass::build(
        DelegateKind::InstanceDelegate,
        OWNER,
        vec![designated("get"), effect("trim"), designated("instance")],
    )
    .unwrap_err();

    assert_eq!(
        err,
        BuildError::DuplicateDesignated {
            existing: "get".to_string(),
            duplicate: "instance".to_string(),
        }
    );
    let message = err.to_string();
    assert!(message.contains("get"));
    assert!(message.contains("instance"));
}

#[test]
fn test_missing_designated() {
    let err = ExtensionClass::build(DelegateKind::InstanceDelegate, OWNER, vec![effect("trim")])
        .unwrap_err();

    assert!(matches!(err, BuildError::MissingDesignated { .. }));
    assert_eq!(
        err.to_string(),
        "com.example.Strings must have an instance method specified"
    );
}

#[test]
fn test_designated_must_return_owner() {
    let err = ExtensionClass::build(
        DelegateKind::InstanceDelegate,
        OWNER,
        vec![
            MemberDeclaration::new("get", "java.lang.String").with_kind(BehaviorKind::Designated),
            effect("trim"),
        ],
    )
    .unwrap_err();

    match err {
        BuildError::DesignatedReturnMismatch { owner, found } => {
            assert_eq!(owner.as_str(), OWNER);
            assert_eq!(found.as_str(), "java.lang.String");
        }
        other => panic!("Expected DesignatedReturnMismatch, got {:?}", other),
    }
}

#[test]
fn test_no_ordinary_methods() {
    let err = ExtensionClass::build(
        DelegateKind::StaticDelegate,
        OWNER,
        vec![designated("get"), MemberDeclaration::new("helper", "void")],
    )
    .unwrap_err();

    assert_eq!(
        err,
        BuildError::NoMethods {
            owner: TypeIdentity::new(OWNER)
        }
    );
}

#[test]
fn test_equality_is_owner_only() {
    let a = ExtensionClass::build(
        DelegateKind::InstanceDelegate,
        OWNER,
        vec![designated("get"), effect("trim")],
    )
    .unwrap();
    let b = ExtensionClass::build(
        DelegateKind::StaticDelegate,
        OWNER,
        vec![designated("get"), effect("pad"), effect("strip")],
    )
    .unwrap();
    let c = ExtensionClass::build(
        DelegateKind::InstanceDelegate,
        "com.example.Lists",
        vec![
            MemberDeclaration::new("get", "com.example.Lists").with_kind(BehaviorKind::Designated),
            effect("trim"),
        ],
    )
    .unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);

    let set: HashSet<_> = vec![a, b, c].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn test_discover_from_provider() {
    let json = r#"[
        {"name": "get", "kind": "Designated", "returns": "com.example.Strings"},
        {"name": "pad", "kind": "ReturnThis", "qualifiers": ["public"],
         "parameters": [{"name": "width", "ty": "int"}], "returns": "void"}
    ]"#;
    let members: Vec<MemberDeclaration> = serde_json::from_str(json).unwrap();

    let mut provider = StaticDeclarations::new();
    provider.insert(OWNER, members);

    let class = ExtensionClass::discover(
        &provider,
        DelegateKind::InstanceDelegate,
        &TypeIdentity::new(OWNER),
    )
    .unwrap();

    let pad = &class.methods()[0];
    assert_eq!(pad.kind, MethodKind::ReturnThis);
    assert!(pad.qualifiers.contains(&Qualifier::Public));
    assert_eq!(pad.parameters[0].ty.as_str(), "int");
}
