mod common;

use wikicase_core::AnyEmptyResult;
use wikicase_core::WikicaseConfig;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::wikicase_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created wikicase.toml"));

	let config = WikicaseConfig::load_from_path(&tmp.path().join("wikicase.toml"))?;
	assert_eq!(config, WikicaseConfig::default());

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = tmp.path().join("wikicase.toml");
	std::fs::write(&config_path, "min_length = 9\n")?;

	common::wikicase_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already exists"));

	assert_eq!(std::fs::read_to_string(&config_path)?, "min_length = 9\n");

	Ok(())
}
