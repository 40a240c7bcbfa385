//! Integration tests for batches and the feeding, harvest and mortality logs.
//!
//! These tests require a running `PostgreSQL` server reachable through
//! `DATABASE_URL`. Run with: `cargo test -p bsf-integration-tests -- --ignored`

use rust_decimal::Decimal;
use sqlx::PgPool;

use bsf_core::{ActivityStatus, BatchId, BatchStage, Percent};
use bsf_farm::db::{BatchRepository, FeedingRepository, HarvestRepository, MortalityRepository};
use bsf_farm::models::{
    BatchFilter, RecordFeedingInput, RecordHarvestInput, RecordMortalityInput, UpdateBatchInput,
};
use bsf_farm::{RepositoryError, ViolationKind};
use bsf_integration_tests::{count_where, date, egg_batch};

fn feeding(batch_id: BatchId, day: u32, kg: i64) -> RecordFeedingInput {
    RecordFeedingInput {
        batch_id,
        feed_date: date(2026, 3, day),
        feed_type: "Brewery grain".to_owned(),
        feed_quantity_kg: Decimal::new(kg, 0),
    }
}

fn harvest(batch_id: BatchId, day: u32, larvae_tenths: i64, frass_tenths: i64) -> RecordHarvestInput {
    RecordHarvestInput {
        batch_id,
        harvest_date: date(2026, 3, day),
        larvae_weight_kg: Decimal::new(larvae_tenths, 1),
        frass_weight_kg: Decimal::new(frass_tenths, 1),
    }
}

fn mortality(batch_id: BatchId, day: u32, rate: i64, update_batch: bool) -> RecordMortalityInput {
    RecordMortalityInput {
        batch_id,
        mortality_date: date(2026, 3, day),
        mortality_rate: Percent::new(Decimal::new(rate, 0)).expect("valid percent"),
        update_batch,
    }
}

// =============================================================================
// Batch Lifecycle
// =============================================================================

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_new_batch_defaults(pool: PgPool) {
    let batch = egg_batch(&pool).await.expect("create batch");

    assert_eq!(batch.stage, BatchStage::Egg);
    assert_eq!(batch.status, ActivityStatus::Active);
    assert_eq!(batch.current_mortality, Percent::ZERO);
    assert_eq!(batch.current_weight_kg, Decimal::ZERO);
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_advance_stage_walks_life_cycle(pool: PgPool) {
    let batches = BatchRepository::new(&pool);
    let batch = egg_batch(&pool).await.expect("create batch");

    let mut seen = vec![batch.stage];
    for _ in 0..3 {
        let advanced = batches.advance_stage(batch.id).await.expect("advance");
        seen.push(advanced.stage);
    }
    assert_eq!(seen, BatchStage::ALL);

    let err = batches
        .advance_stage(batch.id)
        .await
        .expect_err("adult cannot advance");
    assert!(matches!(err, RepositoryError::InvalidTransition(_)));

    let stored = batches.get(batch.id).await.expect("get").expect("exists");
    assert_eq!(stored.stage, BatchStage::Adult);
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_advance_missing_batch(pool: PgPool) {
    let err = BatchRepository::new(&pool)
        .advance_stage(BatchId::new(777))
        .await
        .expect_err("missing batch");
    assert!(matches!(err, RepositoryError::NotFound));
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_update_cannot_move_stage_backwards(pool: PgPool) {
    let batches = BatchRepository::new(&pool);
    let batch = egg_batch(&pool).await.expect("create batch");

    let pupae = batches
        .update(
            batch.id,
            &UpdateBatchInput {
                stage: Some(BatchStage::Pupae),
                ..UpdateBatchInput::default()
            },
        )
        .await
        .expect("skip ahead to pupae");
    assert_eq!(pupae.stage, BatchStage::Pupae);

    let err = batches
        .update(
            batch.id,
            &UpdateBatchInput {
                stage: Some(BatchStage::Egg),
                notes: Some("rewind".to_owned()),
                ..UpdateBatchInput::default()
            },
        )
        .await
        .expect_err("backward move rejected");
    assert!(matches!(err, RepositoryError::InvalidTransition(_)));

    let stored = batches.get(batch.id).await.expect("get").expect("exists");
    assert_eq!(stored.stage, BatchStage::Pupae);
    assert_eq!(stored.notes, batch.notes);

    let err = batches
        .update(BatchId::new(777), &UpdateBatchInput::default())
        .await
        .expect_err("missing batch");
    assert!(matches!(err, RepositoryError::NotFound));
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_update_and_deactivate(pool: PgPool) {
    let batches = BatchRepository::new(&pool);
    let batch = egg_batch(&pool).await.expect("create batch");

    let updated = batches
        .update(
            batch.id,
            &UpdateBatchInput {
                current_weight_kg: Some(Decimal::new(425, 2)),
                notes: Some("Moved to tray 4".to_owned()),
                ..UpdateBatchInput::default()
            },
        )
        .await
        .expect("update batch");
    assert_eq!(updated.current_weight_kg, Decimal::new(425, 2));
    assert_eq!(updated.notes.as_deref(), Some("Moved to tray 4"));
    assert_eq!(updated.stage, BatchStage::Egg);

    let err = batches
        .update(
            batch.id,
            &UpdateBatchInput {
                current_weight_kg: Some(Decimal::new(-1, 0)),
                ..UpdateBatchInput::default()
            },
        )
        .await
        .expect_err("negative weight rejected");
    let violation = err.violation().expect("constraint violation");
    assert_eq!(violation.kind, ViolationKind::Check);
    assert!(violation.is_on("batches", "current_weight_kg"));

    let ended = batches.deactivate(batch.id).await.expect("deactivate");
    assert_eq!(ended.status, ActivityStatus::Inactive);

    let active = batches
        .list(&BatchFilter {
            status: Some(ActivityStatus::Active),
            ..BatchFilter::default()
        })
        .await
        .expect("list active");
    assert!(active.is_empty());
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_list_filters_by_stage(pool: PgPool) {
    let batches = BatchRepository::new(&pool);
    let first = egg_batch(&pool).await.expect("create batch");
    egg_batch(&pool).await.expect("create batch");
    batches.advance_stage(first.id).await.expect("advance");

    let larvae = batches
        .list(&BatchFilter {
            stage: Some(BatchStage::Larvae),
            ..BatchFilter::default()
        })
        .await
        .expect("list larvae");
    assert_eq!(larvae.len(), 1);
    assert_eq!(larvae.first().map(|b| b.id), Some(first.id));

    let page = batches
        .list(&BatchFilter {
            limit: Some(1),
            offset: Some(1),
            ..BatchFilter::default()
        })
        .await
        .expect("list page");
    assert_eq!(page.len(), 1);
}

// =============================================================================
// Logs
// =============================================================================

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_logs_require_existing_batch(pool: PgPool) {
    let missing = BatchId::new(31_337);

    let err = FeedingRepository::new(&pool)
        .record(&feeding(missing, 2, 5))
        .await
        .expect_err("feeding rejected");
    assert!(
        err.violation()
            .is_some_and(|v| v.kind == ViolationKind::ForeignKey && v.is_on("feedings", "batch_id"))
    );

    let err = HarvestRepository::new(&pool)
        .record(&harvest(missing, 2, 10, 10))
        .await
        .expect_err("harvest rejected");
    assert!(
        err.violation()
            .is_some_and(|v| v.kind == ViolationKind::ForeignKey && v.is_on("harvests", "batch_id"))
    );

    let err = MortalityRepository::new(&pool)
        .record(&mortality(missing, 2, 5, true))
        .await
        .expect_err("mortality rejected");
    assert!(
        err.violation()
            .is_some_and(|v| v.kind == ViolationKind::ForeignKey && v.is_on("mortality", "batch_id"))
    );
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_feeding_quantity_must_be_positive(pool: PgPool) {
    let batch = egg_batch(&pool).await.expect("create batch");

    let err = FeedingRepository::new(&pool)
        .record(&feeding(batch.id, 2, 0))
        .await
        .expect_err("zero feed rejected");
    let violation = err.violation().expect("constraint violation");
    assert_eq!(violation.kind, ViolationKind::Check);
    assert!(violation.is_on("feedings", "feed_quantity_kg"));
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_harvest_totals(pool: PgPool) {
    let batch = egg_batch(&pool).await.expect("create batch");
    let harvests = HarvestRepository::new(&pool);

    let empty = harvests.totals_for_batch(batch.id).await.expect("totals");
    assert_eq!(empty.harvest_count, 0);
    assert_eq!(empty.larvae_weight_kg, Decimal::ZERO);

    harvests.record(&harvest(batch.id, 10, 125, 300)).await.expect("harvest");
    harvests.record(&harvest(batch.id, 12, 75, 100)).await.expect("harvest");

    let totals = harvests.totals_for_batch(batch.id).await.expect("totals");
    assert_eq!(totals.harvest_count, 2);
    assert_eq!(totals.larvae_weight_kg, Decimal::new(20, 0));
    assert_eq!(totals.frass_weight_kg, Decimal::new(40, 0));

    let listed = harvests.list_for_batch(batch.id).await.expect("list");
    let days: Vec<_> = listed.iter().map(|h| h.harvest_date).collect();
    assert_eq!(days, vec![date(2026, 3, 10), date(2026, 3, 12)]);
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_mortality_updates_batch_when_asked(pool: PgPool) {
    let batches = BatchRepository::new(&pool);
    let records = MortalityRepository::new(&pool);
    let batch = egg_batch(&pool).await.expect("create batch");

    records
        .record(&mortality(batch.id, 3, 4, false))
        .await
        .expect("record without batch update");
    let unchanged = batches.get(batch.id).await.expect("get").expect("exists");
    assert_eq!(unchanged.current_mortality, Percent::ZERO);

    records
        .record(&mortality(batch.id, 5, 7, true))
        .await
        .expect("record with batch update");
    let updated = batches.get(batch.id).await.expect("get").expect("exists");
    assert_eq!(updated.current_mortality.value(), Decimal::new(7, 0));

    assert_eq!(
        records.list_for_batch(batch.id).await.expect("list").len(),
        2
    );
}

// =============================================================================
// Summary and Cascade
// =============================================================================

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_summary_aggregates_logs(pool: PgPool) {
    let batch = egg_batch(&pool).await.expect("create batch");
    let feedings = FeedingRepository::new(&pool);
    feedings.record(&feeding(batch.id, 2, 30)).await.expect("feed");
    feedings.record(&feeding(batch.id, 4, 10)).await.expect("feed");
    HarvestRepository::new(&pool)
        .record(&harvest(batch.id, 9, 100, 250))
        .await
        .expect("harvest");
    let records = MortalityRepository::new(&pool);
    records.record(&mortality(batch.id, 3, 2, false)).await.expect("mortality");
    records.record(&mortality(batch.id, 8, 6, false)).await.expect("mortality");

    let summary = BatchRepository::new(&pool)
        .summary(batch.id)
        .await
        .expect("summary")
        .expect("batch exists");

    assert_eq!(summary.batch.id, batch.id);
    assert_eq!(summary.feeding_count, 2);
    assert_eq!(summary.total_feed_kg, Decimal::new(40, 0));
    assert_eq!(summary.harvest_count, 1);
    assert_eq!(summary.total_larvae_kg, Decimal::new(10, 0));
    assert_eq!(summary.total_frass_kg, Decimal::new(25, 0));
    assert_eq!(summary.mortality_observations, 2);
    assert_eq!(
        summary.latest_mortality_rate.map(Percent::value),
        Some(Decimal::new(6, 0))
    );
    assert_eq!(summary.feed_conversion(), Some(Decimal::new(25, 2)));

    assert!(
        BatchRepository::new(&pool)
            .summary(BatchId::new(999))
            .await
            .expect("summary")
            .is_none()
    );
}

#[sqlx::test(migrator = "bsf_farm::db::MIGRATOR")]
#[ignore = "Requires a running PostgreSQL database (DATABASE_URL)"]
async fn test_delete_batch_cascades_to_logs(pool: PgPool) {
    let batch = egg_batch(&pool).await.expect("create batch");
    let survivor = egg_batch(&pool).await.expect("create other batch");

    for target in [batch.id, survivor.id] {
        FeedingRepository::new(&pool)
            .record(&feeding(target, 2, 5))
            .await
            .expect("feed");
        HarvestRepository::new(&pool)
            .record(&harvest(target, 9, 10, 10))
            .await
            .expect("harvest");
        MortalityRepository::new(&pool)
            .record(&mortality(target, 3, 1, false))
            .await
            .expect("mortality");
    }

    assert!(BatchRepository::new(&pool).delete(batch.id).await.expect("delete"));

    for table in ["feedings", "harvests", "mortality"] {
        let gone = count_where(&pool, table, "batch_id", batch.id.as_i32())
            .await
            .expect("count");
        assert_eq!(gone, 0, "{table} rows left for deleted batch");

        let kept = count_where(&pool, table, "batch_id", survivor.id.as_i32())
            .await
            .expect("count");
        assert_eq!(kept, 1, "{table} rows of other batch");
    }
}
