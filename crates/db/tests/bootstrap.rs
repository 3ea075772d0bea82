mod common;

use iotm_core::telemetry::DeviceConfig;
use iotm_db::repositories::DeviceConfigRepo;

/// Full bootstrap test: connect, migrate, verify schema.
#[tokio::test]
async fn test_full_bootstrap() {
    let pool = common::migrated_pool().await;
    iotm_db::health_check(&pool).await.unwrap();

    for table in ["device_configs", "metrics", "alerts"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Foreign keys must be enforced on pooled connections.
#[tokio::test]
async fn test_foreign_keys_enabled() {
    let pool = common::migrated_pool().await;
    let enabled: (i64,) = sqlx::query_as("PRAGMA foreign_keys")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(enabled.0, 1);
}

/// Memory URLs passed to `create_pool` share one database across queries.
#[tokio::test]
async fn test_memory_url_uses_single_database() {
    let pool = iotm_db::create_pool(iotm_db::MEMORY_URL).await.unwrap();
    iotm_db::run_migrations(&pool).await.unwrap();

    DeviceConfigRepo::upsert(&pool, &common::config("sensor-1", 50.0, 10.0))
        .await
        .unwrap();
    assert_eq!(DeviceConfigRepo::count(&pool).await.unwrap(), 1);
}

/// File databases are created on demand and survive a reconnect.
#[tokio::test]
async fn test_file_database_persists_across_pools() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("metrics.db").display());

    {
        let pool = iotm_db::create_pool(&url).await.unwrap();
        iotm_db::run_migrations(&pool).await.unwrap();
        DeviceConfigRepo::upsert(&pool, &common::config("sensor-1", 50.0, 10.0))
            .await
            .unwrap();
        pool.close().await;
    }

    let pool = iotm_db::create_pool(&url).await.unwrap();
    iotm_db::run_migrations(&pool).await.unwrap();
    let row = DeviceConfigRepo::find_by_device(&pool, "sensor-1")
        .await
        .unwrap()
        .expect("config should survive reconnect");
    assert_eq!(
        DeviceConfig::from(row),
        common::config("sensor-1", 50.0, 10.0)
    );

    let mode: (String,) = sqlx::query_as("PRAGMA journal_mode")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(mode.0.to_lowercase(), "wal");
}
