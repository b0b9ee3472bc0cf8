mod common;

use rstest::rstest;
use wikicase_core::AnyEmptyResult;
use wikicase_core::WikicaseConfig;

#[test]
fn config_show_prints_defaults() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::wikicase_cmd()
		.arg("config")
		.arg("show")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("debounce_ms      500"))
		.stdout(predicates::str::contains("ignore_list      HTTP, JSON, NASA, iOS, macOS"));

	Ok(())
}

#[test]
fn config_set_saves_value() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::wikicase_cmd()
		.args(["config", "set", "min-length", "6", "--path"])
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("min_length = 6"));

	let config = WikicaseConfig::load_from_path(&tmp.path().join("wikicase.toml"))?;
	assert_eq!(config.min_length, 6);

	Ok(())
}

#[test]
fn config_set_splits_ignore_list() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::wikicase_cmd()
		.args(["config", "set", "ignore_list", "UserService, ,OrderService", "--path"])
		.arg(tmp.path())
		.assert()
		.success();

	let config = WikicaseConfig::load_from_path(&tmp.path().join("wikicase.toml"))?;
	assert_eq!(config.ignore_list, vec!["UserService", "OrderService"]);

	Ok(())
}

#[rstest]
#[case::text("soon")]
#[case::trailing_text("12abc")]
fn config_set_rejects_non_numeric_value(#[case] value: &str) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("wikicase.toml"), "debounce_ms = 300\n")?;

	common::wikicase_cmd()
		.args(["config", "set", "debounce_ms", value, "--path"])
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("debounce_ms was not changed"));

	let content = std::fs::read_to_string(tmp.path().join("wikicase.toml"))?;
	assert_eq!(content, "debounce_ms = 300\n");

	Ok(())
}

#[test]
fn config_set_help_describes_number_rules() {
	common::wikicase_cmd()
		.args(["config", "set", "--help"])
		.assert()
		.success()
		.stdout(predicates::str::contains("plain non-negative integers"))
		.stdout(predicates::str::contains("12abc"));
}

#[test]
fn config_set_unknown_key_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::wikicase_cmd()
		.args(["config", "set", "colour", "blue", "--path"])
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("unknown setting"));

	Ok(())
}

#[test]
fn config_path_prefers_existing_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join(".wikicase.toml"), "")?;

	common::wikicase_cmd()
		.args(["config", "path", "--path"])
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(".wikicase.toml"));

	Ok(())
}
