mod common;

use clap::Parser;
use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;
use wikicase_cli::Commands;
use wikicase_cli::OutputFormat;
use wikicase_cli::WikicaseCli;
use wikicase_core::AnyEmptyResult;

#[test]
fn check_passes_when_nothing_to_link() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("notes.md"), "Plain words and `CodeSpan`.\n")?;

	common::wikicase_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Check passed"));

	Ok(())
}

#[test]
fn check_fails_with_pending_links() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let original = "See UserService\n";
	std::fs::write(tmp.path().join("notes.md"), original)?;

	common::wikicase_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("notes.md (1 link(s))"))
		.stderr(predicates::str::contains("Run `wikicase update`"));

	// Check never writes.
	assert_eq!(std::fs::read_to_string(tmp.path().join("notes.md"))?, original);

	Ok(())
}

#[test]
fn check_diff_shows_changes() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("notes.md"), "intro\nSee UserService\n")?;

	common::wikicase_cmd()
		.arg("check")
		.arg("--diff")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("-See UserService"))
		.stderr(predicates::str::contains("+See [[User Service|UserService]]"))
		.stderr(predicates::str::contains("-intro").not());

	Ok(())
}

#[test]
fn check_json_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("notes.md"), "userId\n")?;

	let output = common::wikicase_cmd()
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert_eq!(output.status.code(), Some(1));

	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], Value::Bool(false));
	assert_eq!(json["files"][0]["file"], "notes.md");
	assert_eq!(json["files"][0]["links"][0], "[[user Id|userId]]");

	Ok(())
}

#[test]
fn check_json_output_when_clean() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("notes.md"), "nothing\n")?;

	let output = common::wikicase_cmd()
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], Value::Bool(true));

	Ok(())
}

#[test]
fn check_github_annotations() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("notes.md"), "UserService and OrderService\n")?;

	common::wikicase_cmd()
		.arg("check")
		.arg("--format")
		.arg("github")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicates::str::contains(
			"::warning file=notes.md::2 word(s) can be linked",
		));

	Ok(())
}

#[test]
fn check_skips_gitignored_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join(".gitignore"), "drafts/\n")?;
	std::fs::create_dir_all(tmp.path().join("drafts"))?;
	std::fs::write(tmp.path().join("drafts/wip.md"), "UserService\n")?;

	common::wikicase_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	Ok(())
}

#[test]
fn parses_check_arguments() {
	let cli = WikicaseCli::parse_from(["wikicase", "check", "--diff", "--format", "github", "a.md"]);
	let Some(Commands::Check {
		diff,
		format,
		files,
	}) = cli.command
	else {
		panic!("expected the check command");
	};

	assert!(diff);
	assert!(matches!(format, OutputFormat::Github));
	assert_eq!(files, vec![std::path::PathBuf::from("a.md")]);
}
