//! Role and permission resolution tests.

mod common;

use std::sync::Arc;

use uuid::Uuid;

use practicas_api::domain::{PermissionAction, PermissionModule, RoleName};
use practicas_api::errors::AppError;
use practicas_api::services::{RbacManager, RbacService};

use common::FakeUow;

fn manager(uow: &Arc<FakeUow>) -> RbacManager<FakeUow> {
    RbacManager::new(uow.clone())
}

#[tokio::test]
async fn assign_roles_is_a_full_replace() {
    let uow = Arc::new(FakeUow::new());
    let rbac = manager(&uow);
    let user = uow.add_user("ana@sion.com", None, true);
    let student = uow.add_role(RoleName::Estudiante);
    let docente = uow.add_role(RoleName::Docente);
    uow.link_user_role(user.id, student.id);

    rbac.assign_roles(user.id, vec![docente.id]).await.unwrap();

    let roles = rbac.get_user_roles(user.id).await.unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].name, RoleName::Docente);
}

#[tokio::test]
async fn assign_roles_rejects_unknown_ids_without_side_effects() {
    let uow = Arc::new(FakeUow::new());
    let rbac = manager(&uow);
    let user = uow.add_user("ana@sion.com", None, true);
    let student = uow.add_role(RoleName::Estudiante);
    uow.link_user_role(user.id, student.id);

    let err = rbac
        .assign_roles(user.id, vec![student.id, Uuid::new_v4()])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::RoleNotFound));

    // The existing set is untouched
    let roles = rbac.get_user_roles(user.id).await.unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].name, RoleName::Estudiante);
}

#[tokio::test]
async fn assign_roles_deduplicates_requested_ids() {
    let uow = Arc::new(FakeUow::new());
    let rbac = manager(&uow);
    let user = uow.add_user("ana@sion.com", None, true);
    let student = uow.add_role(RoleName::Estudiante);

    let roles = rbac
        .assign_roles(user.id, vec![student.id, student.id])
        .await
        .unwrap();
    assert_eq!(roles.len(), 1);
    assert_eq!(rbac.get_user_roles(user.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn assign_empty_set_clears_all_roles() {
    let uow = Arc::new(FakeUow::new());
    let rbac = manager(&uow);
    let user = uow.add_user("ana@sion.com", None, true);
    let student = uow.add_role(RoleName::Estudiante);
    uow.link_user_role(user.id, student.id);

    rbac.assign_roles(user.id, vec![]).await.unwrap();
    assert!(rbac.get_user_roles(user.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn permissions_union_across_roles_is_deduplicated() {
    let uow = Arc::new(FakeUow::new());
    let rbac = manager(&uow);
    let user = uow.add_user("ana@sion.com", None, true);
    let docente = uow.add_role(RoleName::Docente);
    let coordinador = uow.add_role(RoleName::Coordinador);
    let shared = uow.add_permission(PermissionModule::Practicas, PermissionAction::Read);
    let only_coord = uow.add_permission(PermissionModule::Reportes, PermissionAction::Export);

    uow.link_user_role(user.id, docente.id);
    uow.link_user_role(user.id, coordinador.id);
    uow.link_role_permission(docente.id, shared.id);
    uow.link_role_permission(coordinador.id, shared.id);
    uow.link_role_permission(coordinador.id, only_coord.id);

    let permissions = rbac.get_user_permissions(user.id).await.unwrap();
    assert_eq!(permissions.len(), 2);

    assert!(rbac.has_permission(user.id, "practicas:read").await.unwrap());
    assert!(rbac.has_permission(user.id, "reportes:export").await.unwrap());
    assert!(!rbac.has_permission(user.id, "usuarios:manage").await.unwrap());
}

#[tokio::test]
async fn role_without_grants_yields_empty_permissions() {
    let uow = Arc::new(FakeUow::new());
    let rbac = manager(&uow);
    let user = uow.add_user("ana@sion.com", None, true);
    let student = uow.add_role(RoleName::Estudiante);
    uow.link_user_role(user.id, student.id);

    let permissions = rbac.get_user_permissions(user.id).await.unwrap();
    assert!(permissions.is_empty());
}

#[tokio::test]
async fn has_role_reflects_current_links() {
    let uow = Arc::new(FakeUow::new());
    let rbac = manager(&uow);
    let user = uow.add_user("ana@sion.com", None, true);
    let student = uow.add_role(RoleName::Estudiante);
    uow.add_role(RoleName::Decano);
    uow.link_user_role(user.id, student.id);

    assert!(rbac.has_role(user.id, RoleName::Estudiante).await.unwrap());
    assert!(!rbac.has_role(user.id, RoleName::Decano).await.unwrap());
}

#[tokio::test]
async fn unknown_user_is_an_explicit_error() {
    let uow = Arc::new(FakeUow::new());
    let rbac = manager(&uow);

    let err = rbac.get_user_roles(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::UserNotFound));

    let err = rbac.get_user_permissions(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::UserNotFound));

    let err = rbac.assign_roles(Uuid::new_v4(), vec![]).await.unwrap_err();
    assert!(matches!(err, AppError::UserNotFound));
}

#[tokio::test]
async fn set_user_active_toggles_the_flag() {
    let uow = Arc::new(FakeUow::new());
    let rbac = manager(&uow);
    let user = uow.add_user("ana@sion.com", None, true);

    rbac.set_user_active(user.id, false).await.unwrap();
    let stored = uow.state.users.lock().unwrap()[0].clone();
    assert!(!stored.is_active);

    let err = rbac.set_user_active(Uuid::new_v4(), false).await.unwrap_err();
    assert!(matches!(err, AppError::UserNotFound));
}
