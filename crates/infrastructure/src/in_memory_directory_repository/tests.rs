use chrono::{Duration, Utc};

use tessera_application::DirectoryRepository;
use tessera_core::{AppError, NonEmptyString, TenantId};
use tessera_domain::{
    Account, AccountId, AccountStatus, Department, EmailAddress, Permission, Role, Username,
};

use super::InMemoryDirectoryRepository;

fn text(value: &str) -> NonEmptyString {
    NonEmptyString::new(value).unwrap_or_else(|_| panic!("test"))
}

fn role(name: &str) -> Role {
    Role::new(text(name), text("test role"), vec![Permission::Dashboard])
}

fn account(role: &Role, username: &str, email: &str) -> Account {
    Account {
        id: AccountId::new(),
        username: Username::new(username).unwrap_or_else(|_| panic!("test")),
        full_name: text("Jamie Doe"),
        email: EmailAddress::new(email).unwrap_or_else(|_| panic!("test")),
        role_id: role.id,
        department: Department::Operations,
        status: AccountStatus::Active,
        two_factor_enabled: false,
        password_expires_at: Utc::now() + Duration::days(90),
        login_count: 0,
        last_login_at: None,
        revision: 0,
    }
}

#[tokio::test]
async fn duplicate_username_is_rejected_per_tenant() {
    let repository = InMemoryDirectoryRepository::new();
    let tenant_id = TenantId::new();
    let clerk = role("Clerk");
    let _ = repository.insert_role(tenant_id, clerk.clone()).await;

    let first = repository
        .insert_account(tenant_id, account(&clerk, "jdoe", "jdoe@example.com"), "hash")
        .await;
    assert!(first.is_ok());

    let second = repository
        .insert_account(
            tenant_id,
            account(&clerk, "jdoe", "other@example.com"),
            "hash",
        )
        .await;
    assert!(matches!(second, Err(AppError::Conflict(_))));

    // A different tenant may reuse the username.
    let other_tenant = TenantId::new();
    let _ = repository.insert_role(other_tenant, clerk.clone()).await;
    let elsewhere = repository
        .insert_account(
            other_tenant,
            account(&clerk, "jdoe", "jdoe@example.com"),
            "hash",
        )
        .await;
    assert!(elsewhere.is_ok());
}

#[tokio::test]
async fn stale_revision_update_is_a_conflict() {
    let repository = InMemoryDirectoryRepository::new();
    let tenant_id = TenantId::new();
    let clerk = role("Clerk");
    let _ = repository.insert_role(tenant_id, clerk.clone()).await;

    let stored = repository
        .insert_account(tenant_id, account(&clerk, "jdoe", "jdoe@example.com"), "hash")
        .await
        .unwrap_or_else(|error| panic!("insert failed: {error}"));

    let mut first_writer = stored.clone();
    first_writer.department = Department::Finance;
    let committed = repository.update_account(tenant_id, first_writer).await;
    assert!(committed.is_ok());

    // Second writer still holds revision 0; its write must abort.
    let mut second_writer = stored;
    second_writer.department = Department::Marketing;
    let stale = repository.update_account(tenant_id, second_writer).await;
    assert!(matches!(stale, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn account_write_revalidates_the_role_reference() {
    let repository = InMemoryDirectoryRepository::new();
    let tenant_id = TenantId::new();
    let clerk = role("Clerk");
    let _ = repository.insert_role(tenant_id, clerk.clone()).await;
    let ghost = role("Ghost");

    let result = repository
        .insert_account(tenant_id, account(&ghost, "jdoe", "jdoe@example.com"), "hash")
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn referenced_role_cannot_be_deleted() {
    let repository = InMemoryDirectoryRepository::new();
    let tenant_id = TenantId::new();
    let clerk = role("Clerk");
    let _ = repository.insert_role(tenant_id, clerk.clone()).await;
    let _ = repository
        .insert_account(tenant_id, account(&clerk, "jdoe", "jdoe@example.com"), "hash")
        .await;

    let blocked = repository.delete_role(tenant_id, clerk.id).await;
    assert!(matches!(blocked, Err(AppError::Conflict(_))));

    let remaining = repository.list_roles(tenant_id).await.unwrap_or_default();
    assert_eq!(remaining.len(), 1);
}

#[tokio::test]
async fn credential_update_replaces_the_stored_hash() {
    let repository = InMemoryDirectoryRepository::new();
    let tenant_id = TenantId::new();
    let clerk = role("Clerk");
    let _ = repository.insert_role(tenant_id, clerk.clone()).await;

    let stored = repository
        .insert_account(tenant_id, account(&clerk, "jdoe", "jdoe@example.com"), "old")
        .await
        .unwrap_or_else(|error| panic!("insert failed: {error}"));

    let updated = repository
        .update_account_credential(tenant_id, stored.clone(), "new")
        .await
        .unwrap_or_else(|error| panic!("update failed: {error}"));
    assert_eq!(updated.revision, stored.revision + 1);

    // Stale second reset aborts.
    let stale = repository
        .update_account_credential(tenant_id, stored, "newer")
        .await;
    assert!(matches!(stale, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn removing_twice_reports_not_found() {
    let repository = InMemoryDirectoryRepository::new();
    let tenant_id = TenantId::new();
    let clerk = role("Clerk");
    let _ = repository.insert_role(tenant_id, clerk.clone()).await;

    let stored = repository
        .insert_account(tenant_id, account(&clerk, "jdoe", "jdoe@example.com"), "hash")
        .await
        .unwrap_or_else(|error| panic!("insert failed: {error}"));

    assert!(repository.remove_account(tenant_id, stored.id).await.is_ok());
    let again = repository.remove_account(tenant_id, stored.id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn listings_are_sorted_and_tenant_scoped() {
    let repository = InMemoryDirectoryRepository::new();
    let tenant_id = TenantId::new();
    let clerk = role("Clerk");
    let admin = role("Admin");
    let _ = repository.insert_role(tenant_id, clerk.clone()).await;
    let _ = repository.insert_role(tenant_id, admin.clone()).await;
    let _ = repository.insert_role(TenantId::new(), role("Elsewhere")).await;

    let _ = repository
        .insert_account(tenant_id, account(&clerk, "zoe", "zoe@example.com"), "hash")
        .await;
    let _ = repository
        .insert_account(tenant_id, account(&admin, "amy", "amy@example.com"), "hash")
        .await;

    let roles = repository.list_roles(tenant_id).await.unwrap_or_default();
    let role_names: Vec<&str> = roles.iter().map(|role| role.name.as_str()).collect();
    assert_eq!(role_names, vec!["Admin", "Clerk"]);

    let accounts = repository.list_accounts(tenant_id).await.unwrap_or_default();
    let usernames: Vec<&str> = accounts
        .iter()
        .map(|account| account.username.as_str())
        .collect();
    assert_eq!(usernames, vec!["amy", "zoe"]);

    let counted = repository
        .count_accounts_with_role(tenant_id, clerk.id)
        .await
        .unwrap_or_default();
    assert_eq!(counted, 1);
}
