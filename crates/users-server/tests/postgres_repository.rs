//! Runs the Postgres adapter against a real database.
//!
//! Needs `DATABASE_URL`; run with `cargo test -- --ignored`.

use users_server::db;
use users_server::repository::{PgUserRepository, RepositoryError, UniqueField, UserRepository};
use users_shared::NewUser;
use uuid::Uuid;

async fn repository() -> PgUserRepository {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = db::create_pool(&url, 2).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    PgUserRepository::new(pool)
}

/// Fields unique to this run so tests can share a database.
fn new_user(tag: &str) -> NewUser {
    let run = Uuid::new_v4().simple().to_string();
    NewUser {
        username: format!("{tag}_{run}"),
        first_name: "First".to_string(),
        last_name: "Last".to_string(),
        email: format!("{tag}.{run}@example.com"),
        phone_number: format!("+{}", u128::from_str_radix(&run[..12], 16).unwrap()),
    }
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn find_conflicting_matches_any_field_and_honours_exclusion() {
    let repo = repository().await;
    let a = repo.insert(&new_user("a")).await.unwrap();
    let b = repo.insert(&new_user("b")).await.unwrap();

    let found = repo
        .find_conflicting(&a.email, &b.username, "+0", None)
        .await
        .unwrap();
    let mut ids: Vec<Uuid> = found.iter().map(|u| u.id).collect();
    ids.sort();
    let mut expected = vec![a.id, b.id];
    expected.sort();
    assert_eq!(ids, expected);

    let found = repo
        .find_conflicting(&a.email, &b.username, "+0", Some(a.id))
        .await
        .unwrap();
    assert_eq!(found.iter().map(|u| u.id).collect::<Vec<_>>(), vec![b.id]);

    let found = repo
        .find_conflicting(&a.email, &a.username, &a.phone_number, Some(a.id))
        .await
        .unwrap();
    assert!(found.is_empty());

    repo.delete_by_id(a.id).await.unwrap();
    repo.delete_by_id(b.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn unique_index_violation_names_the_field() {
    let repo = repository().await;
    let a = repo.insert(&new_user("a")).await.unwrap();

    let mut clash = new_user("b");
    clash.email = a.email.clone();

    assert!(matches!(
        repo.insert(&clash).await,
        Err(RepositoryError::Duplicate(UniqueField::Email))
    ));

    repo.delete_by_id(a.id).await.unwrap();
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn save_keeps_id_and_delete_removes_row() {
    let repo = repository().await;
    let mut user = repo.insert(&new_user("a")).await.unwrap();
    user.first_name = "Johnny".to_string();

    let saved = repo.save(&user).await.unwrap();
    assert_eq!(saved.id, user.id);
    assert_eq!(saved.first_name, "Johnny");

    repo.delete_by_id(user.id).await.unwrap();
    assert!(!repo.exists_by_id(user.id).await.unwrap());
    assert!(repo.find_by_id(user.id).await.unwrap().is_none());
}
