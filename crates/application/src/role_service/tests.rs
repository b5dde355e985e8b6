use std::sync::Arc;

use tessera_core::{AppError, NonEmptyString, TenantId};
use tessera_domain::{PasswordPolicy, Permission, Role};

use crate::account_service::AccountService;
use crate::directory_ports::{CreateRoleInput, InviteAccountInput, UpdateRoleInput};
use crate::test_support::{FakePasswordHasher, TestHarness, role_named};

use super::RoleService;

fn service(harness: &TestHarness) -> RoleService {
    RoleService::new(harness.repository.clone(), harness.events.clone())
}

fn create_input(name: &str, permissions: &[&str]) -> CreateRoleInput {
    CreateRoleInput {
        name: name.to_owned(),
        description: format!("{name} team"),
        permissions: permissions.iter().map(|tag| (*tag).to_owned()).collect(),
    }
}

#[tokio::test]
async fn create_role_attaches_catalog_permissions() {
    let harness = TestHarness::new();
    let service = service(&harness);

    let role = service
        .create_role(
            TenantId::new(),
            create_input("Ops", &["dashboard", "reports"]),
        )
        .await
        .unwrap_or_else(|error| panic!("create failed: {error}"));

    assert_eq!(
        role.permissions,
        vec![Permission::Dashboard, Permission::Reports]
    );
    assert!(!role.is_system);
    assert_eq!(role.assigned_accounts, 0);
}

#[tokio::test]
async fn unknown_permission_tag_rejects_the_whole_role() {
    let harness = TestHarness::new();
    let service = service(&harness);
    let tenant_id = TenantId::new();

    let result = service
        .create_role(tenant_id, create_input("Ops", &["dashboard", "fake_tag"]))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));

    let roles = service.list_roles(tenant_id).await.unwrap_or_default();
    assert!(roles.is_empty());
}

#[tokio::test]
async fn duplicate_role_name_is_a_conflict() {
    let harness = TestHarness::new();
    let service = service(&harness);
    let tenant_id = TenantId::new();

    let first = service
        .create_role(tenant_id, create_input("Ops", &["dashboard"]))
        .await;
    assert!(first.is_ok());

    let second = service
        .create_role(tenant_id, create_input("Ops", &[]))
        .await;
    assert!(matches!(second, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn system_roles_refuse_edits_and_deletion() {
    let harness = TestHarness::new();
    let admin = Role::system(
        NonEmptyString::new("Administrator").unwrap_or_else(|_| panic!("test")),
        NonEmptyString::new("Full access").unwrap_or_else(|_| panic!("test")),
        Permission::all().to_vec(),
    );
    let admin_id = admin.id;
    harness.repository.seed_role(admin).await;
    let service = service(&harness);
    let tenant_id = TenantId::new();

    let update = service
        .update_role(
            tenant_id,
            admin_id,
            UpdateRoleInput {
                name: "Renamed".to_owned(),
                description: "Renamed".to_owned(),
                permissions: Vec::new(),
            },
        )
        .await;
    assert!(matches!(update, Err(AppError::Forbidden(_))));

    let delete = service.delete_role(tenant_id, admin_id).await;
    assert!(matches!(delete, Err(AppError::Forbidden(_))));

    let roles = service.list_roles(tenant_id).await.unwrap_or_default();
    assert_eq!(roles.len(), 1);
}

#[tokio::test]
async fn referenced_role_cannot_be_deleted() {
    let harness = TestHarness::new();
    let clerk = role_named("Clerk");
    let clerk_id = clerk.id;
    harness.repository.seed_role(clerk).await;

    let accounts = AccountService::new(
        harness.repository.clone(),
        Arc::new(FakePasswordHasher),
        harness.events.clone(),
        PasswordPolicy::default(),
    );
    let service = service(&harness);
    let tenant_id = TenantId::new();

    accounts
        .invite_account(
            tenant_id,
            InviteAccountInput {
                username: "jdoe".to_owned(),
                full_name: "Jamie Doe".to_owned(),
                email: "jdoe@example.com".to_owned(),
                role_name: "Clerk".to_owned(),
                department: tessera_domain::Department::Finance,
                password: "a-strong-enough-pass".to_owned(),
                password_confirmation: "a-strong-enough-pass".to_owned(),
            },
        )
        .await
        .unwrap_or_else(|error| panic!("invite failed: {error}"));

    let delete = service.delete_role(tenant_id, clerk_id).await;
    assert!(matches!(delete, Err(AppError::Conflict(_))));

    // Role and referencing account are unchanged afterward.
    let roles = service.list_roles(tenant_id).await.unwrap_or_default();
    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].assigned_accounts, 1);

    accounts
        .list_accounts(tenant_id)
        .await
        .map(|accounts| assert_eq!(accounts.len(), 1))
        .unwrap_or_else(|error| panic!("list failed: {error}"));
}

#[tokio::test]
async fn unreferenced_role_deletes_cleanly() {
    let harness = TestHarness::new();
    let service = service(&harness);
    let tenant_id = TenantId::new();

    let role = service
        .create_role(tenant_id, create_input("Ops", &["dashboard"]))
        .await
        .unwrap_or_else(|error| panic!("create failed: {error}"));

    assert!(service.delete_role(tenant_id, role.id).await.is_ok());

    let roles = service.list_roles(tenant_id).await.unwrap_or_default();
    assert!(roles.is_empty());
}

#[tokio::test]
async fn rename_keeps_members_attached() {
    let harness = TestHarness::new();
    let clerk = role_named("Clerk");
    let clerk_id = clerk.id;
    harness.repository.seed_role(clerk).await;

    let accounts = AccountService::new(
        harness.repository.clone(),
        Arc::new(FakePasswordHasher),
        harness.events.clone(),
        PasswordPolicy::default(),
    );
    let service = service(&harness);
    let tenant_id = TenantId::new();

    let account = accounts
        .invite_account(
            tenant_id,
            InviteAccountInput {
                username: "jdoe".to_owned(),
                full_name: "Jamie Doe".to_owned(),
                email: "jdoe@example.com".to_owned(),
                role_name: "Clerk".to_owned(),
                department: tessera_domain::Department::Finance,
                password: "a-strong-enough-pass".to_owned(),
                password_confirmation: "a-strong-enough-pass".to_owned(),
            },
        )
        .await
        .unwrap_or_else(|error| panic!("invite failed: {error}"));

    let renamed = service
        .update_role(
            tenant_id,
            clerk_id,
            UpdateRoleInput {
                name: "Bookkeeper".to_owned(),
                description: "Renamed clerk role".to_owned(),
                permissions: vec!["accounting".to_owned()],
            },
        )
        .await
        .unwrap_or_else(|error| panic!("rename failed: {error}"));

    assert_eq!(renamed.name, "Bookkeeper");
    assert_eq!(renamed.assigned_accounts, 1);

    let refreshed = accounts
        .get_account(tenant_id, account.id)
        .await
        .unwrap_or_else(|error| panic!("lookup failed: {error}"));
    assert_eq!(refreshed.role_id, clerk_id);
}

#[tokio::test]
async fn seeding_system_roles_is_idempotent() {
    let harness = TestHarness::new();
    let service = service(&harness);
    let tenant_id = TenantId::new();

    service
        .seed_system_roles(tenant_id)
        .await
        .unwrap_or_else(|error| panic!("seed failed: {error}"));
    service
        .seed_system_roles(tenant_id)
        .await
        .unwrap_or_else(|error| panic!("second seed failed: {error}"));

    let roles = service.list_roles(tenant_id).await.unwrap_or_default();
    assert_eq!(roles.len(), 2);
    assert!(roles.iter().all(|role| role.is_system));
}
