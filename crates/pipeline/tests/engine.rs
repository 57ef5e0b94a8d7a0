//! Database-backed tests for the reconciliation engine and the bulk
//! import, including the fail-fast guarantee and the pagination law.

mod common;

use assert_matches::assert_matches;
use herdscan_core::error::CoreError;
use herdscan_core::pagination::SortOrder;
use herdscan_core::prediction::Prediction;
use herdscan_db::models::breed::CreateBreed;
use herdscan_db::models::scan::CreateScan;
use herdscan_db::models::user::CreateUser;
use herdscan_db::repositories::{BreedRepo, ConfirmedBreedRepo, ScanRepo, UserRepo};
use herdscan_pipeline::{
    confirm, confirmed_page, import_confirmed, unconfirm, unconfirmed_page, BulkImportError,
    ConfirmedQuery, ReconcileError, UnconfirmedQuery, PAGE_SIZE,
};
use sqlx::PgPool;

use common::{StubStore, PNG_MAGIC};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_scan(url: &str) -> CreateScan {
    CreateScan {
        image_url: url.to_string(),
        predictions: vec![Prediction {
            label: "Gir".to_string(),
            confidence: 82.3,
        }],
        location: None,
        submitter_id: None,
    }
}

fn new_breed(name: &str) -> CreateBreed {
    CreateBreed {
        name: name.to_string(),
        species: "cattle".to_string(),
        breed_status: "indigenous".to_string(),
        temperament: "docile".to_string(),
        conservation_status: "not_at_risk".to_string(),
        milk_yield_min: None,
        milk_yield_max: None,
        milk_yield_unit: None,
        body_weight_min: None,
        body_weight_max: None,
        body_weight_unit: None,
        description: None,
        image_url: None,
    }
}

async fn seed_moderator(pool: &PgPool) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            display_name: "Meera".to_string(),
            role: Some("moderator".to_string()),
        },
    )
    .await
    .unwrap()
    .id
}

// ---------------------------------------------------------------------------
// Confirm / unconfirm
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn confirm_then_reread_never_shows_the_scan(pool: PgPool) {
    let moderator = seed_moderator(&pool).await;
    BreedRepo::create(&pool, &new_breed("Gir")).await.unwrap();
    let scan = ScanRepo::create(&pool, &new_scan("https://cdn.test/a.jpg"))
        .await
        .unwrap();

    let query = UnconfirmedQuery::default();
    let before = unconfirmed_page(&pool, &query).await.unwrap();
    assert!(before.rows.iter().any(|s| s.id == scan.id));

    let confirmed = confirm(&pool, scan.id, "Gir", moderator).await.unwrap();
    assert_eq!(confirmed.scan_id, Some(scan.id));
    assert_eq!(confirmed.image_url, scan.image_url);
    assert_eq!(confirmed.confirmed_by, moderator);

    let after = unconfirmed_page(&pool, &query).await.unwrap();
    assert!(after.rows.iter().all(|s| s.id != scan.id));
    assert_eq!(after.total, before.total - 1);

    // and the confirmed view picks it up
    let confirmed_view = confirmed_page(&pool, &ConfirmedQuery::default()).await.unwrap();
    assert!(confirmed_view.rows.iter().any(|c| c.id == confirmed.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unconfirm_reopens_the_scan(pool: PgPool) {
    let moderator = seed_moderator(&pool).await;
    BreedRepo::create(&pool, &new_breed("Gir")).await.unwrap();
    let scan = ScanRepo::create(&pool, &new_scan("https://cdn.test/b.jpg"))
        .await
        .unwrap();

    let confirmed = confirm(&pool, scan.id, "Gir", moderator).await.unwrap();
    unconfirm(&pool, confirmed.id).await.unwrap();

    let page = unconfirmed_page(&pool, &UnconfirmedQuery::default()).await.unwrap();
    assert!(page.rows.iter().any(|s| s.id == scan.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn confirm_preconditions_and_validation(pool: PgPool) {
    let moderator = seed_moderator(&pool).await;
    BreedRepo::create(&pool, &new_breed("Gir")).await.unwrap();
    let scan = ScanRepo::create(&pool, &new_scan("https://cdn.test/c.jpg"))
        .await
        .unwrap();

    let err = confirm(&pool, scan.id, "   ", moderator).await.unwrap_err();
    assert_matches!(err, ReconcileError::Core(CoreError::Precondition(_)));

    let err = confirm(&pool, scan.id, "Unicorn", moderator).await.unwrap_err();
    assert_matches!(err, ReconcileError::Core(CoreError::Validation(_)));

    let err = confirm(&pool, 424242, "Gir", moderator).await.unwrap_err();
    assert_matches!(err, ReconcileError::Core(CoreError::NotFound { .. }));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_confirm_is_a_conflict(pool: PgPool) {
    let moderator = seed_moderator(&pool).await;
    BreedRepo::create(&pool, &new_breed("Gir")).await.unwrap();
    BreedRepo::create(&pool, &new_breed("Sahiwal")).await.unwrap();
    let scan = ScanRepo::create(&pool, &new_scan("https://cdn.test/d.jpg"))
        .await
        .unwrap();

    confirm(&pool, scan.id, "Gir", moderator).await.unwrap();
    let err = confirm(&pool, scan.id, "Sahiwal", moderator).await.unwrap_err();
    assert_matches!(err, ReconcileError::Core(CoreError::Conflict(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unconfirm_missing_row_is_not_found(pool: PgPool) {
    let err = unconfirm(&pool, 99999).await.unwrap_err();
    assert_matches!(err, ReconcileError::Core(CoreError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// Pagination law
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn page_concatenation_yields_exactly_total_rows(pool: PgPool) {
    let count = PAGE_SIZE * 2 + 1;
    for i in 0..count {
        ScanRepo::create(&pool, &new_scan(&format!("https://cdn.test/{i}.jpg")))
            .await
            .unwrap();
    }

    let first = unconfirmed_page(
        &pool,
        &UnconfirmedQuery {
            sort: SortOrder::Asc,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(first.total, count);
    assert_eq!(first.page_count, 3);
    assert_eq!(first.page_size, PAGE_SIZE);

    let mut seen = Vec::new();
    for page in 1..=first.page_count {
        let result = unconfirmed_page(
            &pool,
            &UnconfirmedQuery {
                sort: SortOrder::Asc,
                page,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        seen.extend(result.rows.into_iter().map(|s| s.id));
    }

    assert_eq!(seen.len() as i64, count);
    let mut deduped = seen.clone();
    deduped.dedup();
    assert_eq!(deduped.len(), seen.len());
    let mut sorted = seen.clone();
    sorted.sort();
    assert_eq!(sorted, seen); // ascending sort order held across pages
}

// ---------------------------------------------------------------------------
// Bulk import
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_import_commits_whole_batch(pool: PgPool) {
    let moderator = seed_moderator(&pool).await;
    BreedRepo::create(&pool, &new_breed("Kankrej")).await.unwrap();
    let store = StubStore::ok();

    let images = vec![PNG_MAGIC.to_vec(), PNG_MAGIC.to_vec(), PNG_MAGIC.to_vec()];
    let rows = import_confirmed(&pool, &store, "Kankrej", &images, moderator)
        .await
        .unwrap();

    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.scan_id.is_none()));
    assert!(rows.iter().all(|r| r.confirmed_by == moderator));
    assert!(rows.iter().all(|r| r.image_url.contains("/reference/")));
    assert_eq!(store.upload_count(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_import_is_fail_fast_on_upload_failure(pool: PgPool) {
    let moderator = seed_moderator(&pool).await;
    BreedRepo::create(&pool, &new_breed("Kankrej")).await.unwrap();
    let store = StubStore::failing_at(2);

    let images = vec![PNG_MAGIC.to_vec(), PNG_MAGIC.to_vec(), PNG_MAGIC.to_vec()];
    let err = import_confirmed(&pool, &store, "Kankrej", &images, moderator)
        .await
        .unwrap_err();

    assert_matches!(err, BulkImportError::Upload { index: 2, total: 3, .. });

    // zero rows inserted
    let count = ConfirmedBreedRepo::count(&pool, &Default::default()).await.unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn bulk_import_rejects_unknown_breed_before_uploading(pool: PgPool) {
    let moderator = seed_moderator(&pool).await;
    let store = StubStore::ok();

    let err = import_confirmed(&pool, &store, "Unicorn", &[PNG_MAGIC.to_vec()], moderator)
        .await
        .unwrap_err();

    assert_matches!(err, BulkImportError::Core(CoreError::Validation(_)));
    assert_eq!(store.upload_count(), 0);
}
