//! Fuzz item submission with arbitrary names, taglines and tags.
//!
//! Any input must either be accepted or rejected with a validation error,
//! never panic or corrupt the database.

#![no_main]

use engagedb::{Config, EngageDB, NewItem, RankQuery, SortMode, UserId};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mut parts = text.split('\n');
    let name = parts.next().unwrap_or_default().to_string();
    let tagline = parts.next().unwrap_or_default().to_string();
    let tags: Vec<String> = parts.map(str::to_string).collect();

    let dir = tempfile::tempdir().unwrap();
    let db = EngageDB::open(dir.path().join("fuzz.db"), Config::default()).unwrap();
    let owner = UserId::new("fuzz");
    db.register_user(owner.clone(), "Fuzz").unwrap();

    let result = db.submit_item(NewItem {
        owner_id: owner,
        name,
        tagline,
        tags,
        ..Default::default()
    });

    match result {
        Ok(id) => {
            let item = db.get_item(id).unwrap().unwrap();
            assert!(item.tags.iter().all(|t| t == &t.to_lowercase()));
            let listing = db.rank(RankQuery::new(SortMode::Alphabetical)).unwrap();
            assert_eq!(listing.len(), 1);
        }
        Err(e) => assert!(e.is_validation()),
    }

    db.close().unwrap();
});
