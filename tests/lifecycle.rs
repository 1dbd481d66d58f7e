//! Integration tests for EngageDB database lifecycle operations.
//!
//! These tests verify the end-to-end behavior of:
//! - Opening new databases
//! - Opening existing databases
//! - Configuration validation
//! - Proper resource cleanup on close

use engagedb::{Config, EngageDB, EngageError, RankingConfig, SyncMode, UserId, ValidationError};
use tempfile::tempdir;

// ============================================================================
// Database Creation Tests
// ============================================================================

#[test]
fn test_open_creates_new_database() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");

    assert!(!path.exists(), "Database should not exist before open");

    let db = EngageDB::open(&path, Config::default()).unwrap();

    assert!(path.exists(), "Database file should exist after open");

    db.close().unwrap();
}

#[test]
fn test_open_with_default_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");

    let db = EngageDB::open(&path, Config::default()).unwrap();

    assert_eq!(db.config().sync_mode, SyncMode::Normal);
    assert_eq!(db.config().ranking.default_limit, 20);
    assert_eq!(db.metadata().schema_version, engagedb::storage::SCHEMA_VERSION);

    db.close().unwrap();
}

// ============================================================================
// Existing Database Tests
// ============================================================================

#[test]
fn test_metadata_preserved_across_opens() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");

    let db = EngageDB::open(&path, Config::default()).unwrap();
    let created_at = db.metadata().created_at;
    db.close().unwrap();

    // Small delay to ensure timestamps differ
    std::thread::sleep(std::time::Duration::from_millis(10));

    let db = EngageDB::open(&path, Config::default()).unwrap();
    assert_eq!(db.metadata().created_at, created_at);
    assert!(db.metadata().last_opened_at > created_at);

    db.close().unwrap();
}

#[test]
fn test_close_flushes_data() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let alice = UserId::new("alice");

    let db = EngageDB::open(&path, Config::default()).unwrap();
    db.register_user(alice.clone(), "Alice").unwrap();
    db.close().unwrap();

    let db = EngageDB::open(&path, Config::default()).unwrap();
    let user = db.get_user(&alice).unwrap().expect("user must persist");
    assert_eq!(user.display_name, "Alice");
    db.close().unwrap();
}

#[test]
fn test_multiple_open_close_cycles() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");

    for i in 0..5 {
        let db = EngageDB::open(&path, Config::default()).unwrap();
        db.register_user(UserId::new(format!("user-{}", i)), "User")
            .unwrap();
        db.close().unwrap();
    }

    let db = EngageDB::open(&path, Config::default()).unwrap();
    for i in 0..5 {
        assert!(db.get_user(&UserId::new(format!("user-{}", i))).unwrap().is_some());
    }
    db.close().unwrap();
}

// ============================================================================
// Validation Tests
// ============================================================================

#[test]
fn test_invalid_config_cache_size_zero() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");

    let config = Config {
        cache_size_mb: 0,
        ..Default::default()
    };

    let result = EngageDB::open(&path, config);
    assert!(matches!(
        result,
        Err(EngageError::Validation(ValidationError::InvalidField { .. }))
    ));
    assert!(!path.exists(), "Invalid config must not create a file");
}

#[test]
fn test_invalid_config_default_limit() {
    let dir = tempdir().unwrap();

    for default_limit in [0, 51] {
        let config = Config {
            ranking: RankingConfig { default_limit },
            ..Default::default()
        };
        let err = EngageDB::open(dir.path().join("test.db"), config).unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("default_limit"));
    }
}

#[test]
fn test_invalid_user_id_rejected() {
    let dir = tempdir().unwrap();
    let db = EngageDB::open(dir.path().join("test.db"), Config::default()).unwrap();

    assert!(db.register_user(UserId::new(""), "Nobody").unwrap_err().is_validation());
    assert!(db
        .register_user(UserId::new("x".repeat(256)), "Long")
        .unwrap_err()
        .is_validation());

    db.close().unwrap();
}

// ============================================================================
// Sync Mode Tests
// ============================================================================

#[test]
fn test_sync_modes() {
    for sync_mode in [SyncMode::Normal, SyncMode::Fast, SyncMode::Paranoid] {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let config = Config {
            sync_mode,
            ..Default::default()
        };

        let db = EngageDB::open(&path, config).unwrap();
        assert_eq!(db.config().sync_mode, sync_mode);
        db.register_user(UserId::new("alice"), "Alice").unwrap();
        db.close().unwrap();
    }
}
