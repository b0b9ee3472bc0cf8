mod common;

use rstest::rstest;
use wikicase_core::AnyEmptyResult;

#[rstest]
#[case::word_at_cursor("CamelCaseWord", "5", "CamelCaseWord\ncursor: 5\n")]
#[case::cursor_past_end(
	"CamelCaseWord",
	"20",
	"[[Camel Case Word|CamelCaseWord]]\ncursor: 40\n"
)]
#[case::cursor_on_later_word(
	"UserService then x",
	"17",
	"[[User Service|UserService]] then x\ncursor: 34\n"
)]
#[case::inline_code("`CodeSpan` CamelCase", "0", "`CodeSpan` [[Camel Case|CamelCase]]\ncursor: 0\n")]
fn line_conversion(
	#[case] text: &str,
	#[case] cursor: &str,
	#[case] expected: &str,
) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::wikicase_cmd()
		.arg("line")
		.arg("--path")
		.arg(tmp.path())
		.arg("--cursor")
		.arg(cursor)
		.arg(text)
		.assert()
		.success()
		.stdout(expected.to_string());

	Ok(())
}

#[test]
fn line_uses_project_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("wikicase.toml"), "smart_aliasing = false\n")?;

	common::wikicase_cmd()
		.arg("line")
		.arg("--path")
		.arg(tmp.path())
		.arg("x Cyber_Security")
		.assert()
		.success()
		.stdout("x [[Cyber_Security]]\ncursor: 0\n");

	Ok(())
}
