use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn wikicase_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("wikicase"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("WIKICASE_LOG");
	cmd
}
