use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("docblock").unwrap()
}

// -- generate --

#[test]
fn generate_javascript_function() {
    let dir = TempDir::new().unwrap();
    let source = dir.child("app.js");
    source
        .write_str("// helpers\nfunction foo (bar, baz) {\n  return bar + baz;\n}\n")
        .unwrap();

    cmd()
        .args(["generate", "--line", "2", "--file"])
        .arg(source.path())
        .assert()
        .success()
        .stdout(
            "\n * ${1:[foo description]}\
             \n * @param  {${2:[type]}} bar ${3:[description]}\
             \n * @param  {${4:[type]}} baz ${5:[description]}\
             \n * @return {${6:[type]}}     ${7:[description]}\
             \n */\n",
        );
}

#[test]
fn generate_uses_extension_for_language() {
    let dir = TempDir::new().unwrap();
    let source = dir.child("Model.php");
    source.write_str("protected $items = [];\n").unwrap();

    cmd()
        .args(["generate", "--line", "1", "--file"])
        .arg(source.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("@var ${2:array}"));
}

#[test]
fn generate_reads_stdin_with_explicit_language() {
    cmd()
        .args(["generate", "--file", "-", "--line", "1", "--language", "rust"])
        .write_stdin("pub fn area(width: u32, height: u32) -> u32 {\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("@param  width"))
        .stdout(predicate::str::contains("@param  height"))
        .stdout(predicate::str::contains("@return"));
}

#[test]
fn generate_json_output() {
    cmd()
        .args(["generate", "--file", "-", "--line", "1", "--language", "js", "--json"])
        .write_stdin("var ready = true;\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"snippet\""))
        .stdout(predicate::str::contains("@type {${2:Boolean}}"));
}

#[test]
fn generate_inline_with_trailing_text() {
    cmd()
        .args(["generate", "--file", "-", "--line", "1", "--language", "js"])
        .args(["--trailing", "Counts things */"])
        .write_stdin("function count(items) {\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("${1:Counts things}"));

    cmd()
        .args(["generate", "--file", "-", "--line", "1", "--language", "js", "--inline"])
        .write_stdin("var total = 0;\n")
        .assert()
        .success()
        .stdout(" @type {${1:Number}} ${2:[description]} */\n");
}

#[test]
fn generate_honours_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.child("docblock.toml");
    config
        .write_str("align_tags = \"off\"\nspacer_between_sections = true\n")
        .unwrap();

    cmd()
        .arg("--config")
        .arg(config.path())
        .args(["generate", "--file", "-", "--line", "1", "--language", "js"])
        .write_stdin("function foo(bar) {\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            " * ${1:[foo description]}\n *\n * @param {${2:[type]}} bar ${3:[description]}\n *\n * @return",
        ));
}

#[test]
fn generate_rejects_unknown_language() {
    cmd()
        .args(["generate", "--file", "-", "--line", "1", "--language", "cobol"])
        .write_stdin("x\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown language tag"));
}

#[test]
fn generate_rejects_line_past_end() {
    cmd()
        .args(["generate", "--file", "-", "--line", "5", "--language", "js"])
        .write_stdin("one\ntwo\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of range"));
}

#[test]
fn generate_rejects_invalid_config() {
    let dir = TempDir::new().unwrap();
    let config = dir.child("docblock.toml");
    config.write_str("[[notation_map]]\nregex = \"([\"\n").unwrap();

    cmd()
        .arg("--config")
        .arg(config.path())
        .args(["generate", "--file", "-", "--line", "1"])
        .write_stdin("function f() {}\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid notation rule"));
}

// -- block commands --

#[test]
fn wrap_rewraps_description() {
    let dir = TempDir::new().unwrap();
    let config = dir.child("docblock.toml");
    config.write_str("rulers = [30]\n").unwrap();

    cmd()
        .arg("--config")
        .arg(config.path())
        .args(["wrap", "--file", "-", "--line", "2"])
        .write_stdin("x = 1;\n/**\n * one two three four five six seven eight nine ten\n */\n")
        .assert()
        .success()
        .stdout("/**\n * one two three four five\n * six seven eight nine ten\n */\n");
}

#[test]
fn wrap_requires_comment_opener() {
    cmd()
        .args(["wrap", "--file", "-", "--line", "1"])
        .write_stdin("let x = 1;\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No comment block opens at line 1"));
}

#[test]
fn reparse_restores_tab_stops() {
    cmd()
        .args(["reparse", "--file", "-", "--line", "1"])
        .write_stdin("/**\n   * [run description]\n   * @return {[type]} [description]\n   */\n")
        .assert()
        .success()
        .stdout(
            "/**\n * ${1:[run description]}\n * @return \\{${2:[type]}\\} ${3:[description]}\n */\n",
        );
}

#[test]
fn decorate_and_join() {
    cmd()
        .args(["decorate", "--file", "-", "--start", "1", "--end", "2"])
        .write_stdin("// Title\n// More text\n")
        .assert()
        .success()
        .stdout("///////////////\n// Title     //\n// More text //\n///////////////\n");

    cmd()
        .args(["decorate", "--file", "-", "--start", "1", "--end", "2"])
        .write_stdin("// Title\ncode();\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Line 2 is not a `//` comment"));

    cmd()
        .args(["join", "--file", "-", "--start", "1", "--end", "3"])
        .write_stdin(" * first\n * second\n * third\n")
        .assert()
        .success()
        .stdout(" * first second third\n");
}

#[test]
fn languages_lists_tags() {
    cmd()
        .arg("languages")
        .assert()
        .success()
        .stdout(predicate::str::contains("js\n"))
        .stdout(predicate::str::contains("c++\n"))
        .stdout(predicate::str::contains("rust\n"));
}
