//! Behaviour-driven step definitions driving the CLI end to end.

use super::helpers::{
    HEADPHONES_ID, KEYBOARD_ID, REQUEST_JSON, workspace, write_analytics, write_catalog,
    write_utf8,
};
use super::*;
use camino::Utf8PathBuf;
use giftwise_core::ScoredGift;
use giftwise_feedback::FeedbackReport;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use tempfile::TempDir;

struct CliWorld {
    _tmp: TempDir,
    root: Utf8PathBuf,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl CliWorld {
    fn new() -> Self {
        let (tmp, root) = workspace();
        Self {
            _tmp: tmp,
            root,
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    fn run(&self, command: &str, extra: &[String]) {
        let mut argv = vec!["giftwise".to_owned(), command.to_owned()];
        argv.extend(extra.iter().cloned());
        let mut buffer = Vec::new();
        let outcome = run_from(argv, &mut buffer);
        self.stdout.replace(buffer);
        self.result.replace(Some(outcome));
    }

    fn run_recommend(&self, extra: &[String]) {
        let mut args = vec![
            self.path("quiz.json").into_string(),
            format!("--{ARG_CATALOG_DB}"),
            self.path("gifts.db").into_string(),
        ];
        args.extend(extra.iter().cloned());
        self.run("recommend", &args);
    }

    fn expect_success(&self) {
        let borrowed = self.result.borrow();
        let result = borrowed.as_ref().expect("result recorded");
        if let Err(err) = result {
            panic!("expected success, found {err:?}");
        }
    }

    fn ranked(&self) -> Vec<ScoredGift> {
        serde_json::from_slice(&self.stdout.borrow()).expect("output should be ranked gifts")
    }

    fn with_error(&self, check: impl FnOnce(&CliError)) {
        let borrowed = self.result.borrow();
        let error = borrowed
            .as_ref()
            .expect("result recorded")
            .as_ref()
            .expect_err("expected error");
        check(error);
    }
}

#[fixture]
fn world() -> CliWorld {
    CliWorld::new()
}

#[given("a gift catalog exists on disk")]
fn catalog_exists(#[from(world)] world: &CliWorld) {
    write_catalog(&world.path("gifts.db"));
}

#[given("a quiz answers file exists on disk")]
fn quiz_answers_exist(#[from(world)] world: &CliWorld) {
    write_utf8(&world.path("quiz.json"), REQUEST_JSON.as_bytes());
}

#[given("the quiz answers file contains invalid JSON")]
fn quiz_answers_invalid(#[from(world)] world: &CliWorld) {
    write_utf8(&world.path("quiz.json"), b"{ not valid json");
}

#[given("an analytics database with ratings exists on disk")]
fn analytics_exists(#[from(world)] world: &CliWorld) {
    write_analytics(&world.path("analytics.db"));
}

#[when("I run the recommend command")]
fn run_recommend_without_feedback(#[from(world)] world: &CliWorld) {
    world.run_recommend(&[]);
}

#[when("I run the recommend command with the analytics database")]
fn run_recommend_with_database(#[from(world)] world: &CliWorld) {
    world.run_recommend(&[
        format!("--{ARG_FEEDBACK_DB}"),
        world.path("analytics.db").into_string(),
    ]);
}

#[when("I run the recommend command with the snapshot")]
fn run_recommend_with_snapshot(#[from(world)] world: &CliWorld) {
    world.run_recommend(&[
        format!("--{ARG_FEEDBACK_SNAPSHOT}"),
        world.path("feedback.bin").into_string(),
    ]);
}

#[when("I run the recommend command with both feedback sources")]
fn run_recommend_with_both_sources(#[from(world)] world: &CliWorld) {
    world.run_recommend(&[
        format!("--{ARG_FEEDBACK_DB}"),
        world.path("analytics.db").into_string(),
        format!("--{ARG_FEEDBACK_SNAPSHOT}"),
        world.path("feedback.bin").into_string(),
    ]);
}

#[when("I run the snapshot command")]
fn run_snapshot_command(#[from(world)] world: &CliWorld) {
    world.run(
        "snapshot",
        &[
            format!("--{ARG_FEEDBACK_DB}"),
            world.path("analytics.db").into_string(),
            format!("--{ARG_OUTPUT}"),
            world.path("feedback.bin").into_string(),
        ],
    );
    world.expect_success();
}

#[when("I run the ratings command")]
fn run_ratings_command(#[from(world)] world: &CliWorld) {
    world.run(
        "ratings",
        &[
            format!("--{ARG_FEEDBACK_DB}"),
            world.path("analytics.db").into_string(),
        ],
    );
}

#[then("the command succeeds")]
fn command_succeeds(#[from(world)] world: &CliWorld) {
    world.expect_success();
}

#[then("the keyboard is recommended first")]
fn keyboard_first(#[from(world)] world: &CliWorld) {
    let ranked = world.ranked();
    let ids: Vec<u64> = ranked.iter().map(|gift| gift.id).collect();
    assert_eq!(ids, vec![KEYBOARD_ID, HEADPHONES_ID]);
}

#[then("the headphones are recommended first")]
fn headphones_first(#[from(world)] world: &CliWorld) {
    let ranked = world.ranked();
    let ids: Vec<u64> = ranked.iter().map(|gift| gift.id).collect();
    assert_eq!(ids, vec![HEADPHONES_ID, KEYBOARD_ID]);
    let headphones = ranked.first().expect("headphones ranked");
    assert!(headphones.collaborative_score > 0.0);
}

#[then("the report leaderboard starts with the headphones")]
fn report_leaderboard(#[from(world)] world: &CliWorld) {
    let report: FeedbackReport =
        serde_json::from_slice(&world.stdout.borrow()).expect("output should be a report");
    let leader = report.leaderboard.first().expect("leaderboard entry");
    assert_eq!(leader.gift_id, HEADPHONES_ID);
    assert_eq!(leader.likes, 3);
}

#[then("the command fails because the quiz answers are invalid")]
fn fails_invalid_answers(#[from(world)] world: &CliWorld) {
    world.with_error(|error| match error {
        CliError::ParseRequest { path, .. } => assert_eq!(*path, world.path("quiz.json")),
        other => panic!("expected ParseRequest, found {other:?}"),
    });
}

#[then("the command fails because the feedback sources conflict")]
fn fails_conflicting_sources(#[from(world)] world: &CliWorld) {
    world.with_error(|error| match error {
        CliError::ConflictingFeedbackSources { .. } => {}
        other => panic!("expected ConflictingFeedbackSources, found {other:?}"),
    });
}

macro_rules! register_cli_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/cli.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: CliWorld) {
            let _ = world;
        }
    };
}

register_cli_scenario!(recommend_happy_path, "recommending gifts from quiz answers");
register_cli_scenario!(recommend_with_feedback, "crowd feedback reorders recommendations");
register_cli_scenario!(recommend_with_snapshot, "recommending from an exported snapshot");
register_cli_scenario!(ratings_report, "reporting recorded ratings");
register_cli_scenario!(recommend_invalid_json, "rejecting invalid quiz answers");
register_cli_scenario!(recommend_conflicting_sources, "rejecting two feedback sources");
