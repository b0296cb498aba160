//! Test helpers for building catalogs, analytics databases and requests.

use camino::Utf8PathBuf;
use giftwise_core::{
    RawTagColumns,
    test_support::{CatalogRow, write_catalog_database},
};
use giftwise_feedback::test_support::{AnalyticsSeed, SeedAnswers};
use std::fs;
use tempfile::TempDir;

pub(super) const KEYBOARD_ID: u64 = 1;
pub(super) const HEADPHONES_ID: u64 = 2;

pub(super) const REQUEST_JSON: &str = r#"{
    "answers": [
        {"tag": "gender", "value": "gender_male"},
        {"tag": "age", "value": "age_26_35"},
        {"tag": "occasion", "value": "occasion_birthday"},
        {"tag": "budget", "value": "budget_15000"},
        {"tag": "practical_emotional", "value": "practical"}
    ],
    "interests": ["interest_tech"]
}"#;

pub(super) fn write_utf8(path: &Utf8PathBuf, contents: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent directories");
    }
    fs::write(path, contents).expect("write file");
}

pub(super) fn workspace() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

/// Two male birthday gifts inside a 15K budget and one outside it.
pub(super) fn write_catalog(path: &Utf8PathBuf) {
    let rows = [
        CatalogRow::new(1, "Keyboard")
            .price(11_000.0)
            .description("Mechanical keyboard")
            .tags(RawTagColumns {
                budget: "budget_10000,budget_15000",
                gender: "gender_male",
                age: "age_26_35",
                occasion: "occasion_birthday",
                values: "gift_practical:1",
                interests: "interest_tech:1",
                ..RawTagColumns::default()
            }),
        CatalogRow::new(2, "Headphones").price(9_000.0).tags(RawTagColumns {
            budget: "budget_5000,budget_10000",
            gender: "gender_male",
            age: "age_26_35",
            occasion: "occasion_birthday",
            values: "gift_practical:1",
            interests: "interest_tech:1",
            ..RawTagColumns::default()
        }),
        CatalogRow::new(3, "Yacht charter").price(90_000.0).tags(RawTagColumns {
            budget: "budget_100000",
            gender: "gender_male",
            age: "age_26_35",
            occasion: "occasion_birthday",
            ..RawTagColumns::default()
        }),
    ];
    write_catalog_database(path.as_std_path(), &rows).expect("write catalog");
}

/// Three matching sessions: two dislike the keyboard, all like the headphones.
pub(super) fn write_analytics(path: &Utf8PathBuf) {
    let birthday = || SeedAnswers::new("gender_male", "age_26_35", "occasion_birthday");
    AnalyticsSeed::new()
        .answered(1, true, birthday())
        .answered(2, true, birthday())
        .answered(3, true, birthday())
        .session(4, false)
        .rating(1, 1, "Keyboard", -1)
        .rating(2, 1, "Keyboard", -1)
        .rating(1, 2, "Headphones", 1)
        .rating(2, 2, "Headphones", 1)
        .rating(3, 2, "Headphones", 1)
        .write(path.as_std_path())
        .expect("write analytics database");
}
