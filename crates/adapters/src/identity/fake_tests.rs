// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use gt_core::Role;

#[tokio::test]
async fn fake_registrar_lookup_missing_is_not_found() {
    let registrar = FakeIdentityRegistrar::new();
    let result = registrar
        .lookup(Path::new("/town"), &IdentityId::new("gt-a-architect"))
        .await;
    assert!(matches!(result, Err(IdentityError::NotFound(_))));
}

#[tokio::test]
async fn fake_registrar_create_then_lookup() {
    let registrar = FakeIdentityRegistrar::new();
    let id = IdentityId::new("gt-a-architect");
    let fields = AgentFields::idle(Role::Architect, "a");

    registrar
        .create(Path::new("/town"), &id, "Architect for a", &fields)
        .await
        .unwrap();
    let record = registrar.lookup(Path::new("/town"), &id).await.unwrap();

    assert_eq!(record.title, "Architect for a");
    assert!(record.description.contains("role_type: architect"));
    assert_eq!(registrar.calls().len(), 2);
}

#[tokio::test]
async fn fake_registrar_rejects_duplicate_create() {
    let registrar = FakeIdentityRegistrar::new();
    registrar.insert("gt-a-architect");
    let fields = AgentFields::idle(Role::Architect, "a");

    let result = registrar
        .create(Path::new("/town"), &IdentityId::new("gt-a-architect"), "x", &fields)
        .await;
    assert!(matches!(result, Err(IdentityError::CommandFailed(_))));
}

#[tokio::test]
async fn fake_registrar_scripted_failures() {
    let registrar = FakeIdentityRegistrar::new();
    registrar.insert("gt-a-architect");
    registrar.fail_lookup("db locked");
    registrar.fail_create("db locked");
    let id = IdentityId::new("gt-a-architect");

    assert!(matches!(
        registrar.lookup(Path::new("/town"), &id).await,
        Err(IdentityError::CommandFailed(_))
    ));
    assert!(registrar
        .create(Path::new("/town"), &id, "x", &AgentFields::idle(Role::Architect, "a"))
        .await
        .is_err());
}
