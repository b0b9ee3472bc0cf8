mod common;

use wikicase_core::AnyEmptyResult;

#[test]
fn update_links_identifiers() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("notes.md"),
		"# Notes\n\nCyberSecurity matters.\n\n```\nCodeSample\n```\n",
	)?;

	common::wikicase_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Added 1 link(s) in 1 file(s)."));

	let content = std::fs::read_to_string(tmp.path().join("notes.md"))?;
	assert_eq!(
		content,
		"# Notes\n\n[[Cyber Security|CyberSecurity]] matters.\n\n```\nCodeSample\n```\n"
	);

	Ok(())
}

#[test]
fn update_is_a_noop_the_second_time() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("notes.md"), "userId and api_client\n")?;

	common::wikicase_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	common::wikicase_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already linked"));

	Ok(())
}

#[test]
fn update_dry_run_does_not_write() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let original = "See UserService\n";
	std::fs::write(tmp.path().join("notes.md"), original)?;

	common::wikicase_cmd()
		.arg("update")
		.arg("--dry-run")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Dry run"))
		.stdout(predicates::str::contains("notes.md"));

	let content = std::fs::read_to_string(tmp.path().join("notes.md"))?;
	assert_eq!(content, original);

	Ok(())
}

#[test]
fn update_only_named_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("a.md"), "UserService\n")?;
	std::fs::write(tmp.path().join("b.md"), "UserService\n")?;

	common::wikicase_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.arg("a.md")
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("a.md"))?,
		"[[User Service|UserService]]\n"
	);
	assert_eq!(std::fs::read_to_string(tmp.path().join("b.md"))?, "UserService\n");

	Ok(())
}

#[test]
fn update_respects_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("wikicase.toml"),
		"smart_aliasing = false\nignore_list = [\"UserService\"]\n",
	)?;
	std::fs::write(tmp.path().join("notes.md"), "UserService and OrderService\n")?;

	common::wikicase_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("notes.md"))?,
		"UserService and [[OrderService]]\n"
	);

	Ok(())
}

#[test]
fn update_warns_about_invalid_custom_pattern() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("wikicase.toml"),
		"[patterns]\ncustom = \"([unclosed\"\n",
	)?;
	std::fs::write(tmp.path().join("notes.md"), "UserService\n")?;

	common::wikicase_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("custom pattern `([unclosed` is invalid"));

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("notes.md"))?,
		"[[User Service|UserService]]\n"
	);

	Ok(())
}

#[test]
fn watch_requires_live_mode() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("wikicase.toml"), "live_mode = false\n")?;

	common::wikicase_cmd()
		.arg("update")
		.arg("--watch")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("live_mode = true"));

	Ok(())
}

#[test]
fn invalid_config_is_reported() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("wikicase.toml"), "min_length = \"four\"\n")?;

	common::wikicase_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to parse config file"));

	Ok(())
}
