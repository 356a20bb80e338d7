//! End-to-end tests driving the `sprig` binary.

use std::fs;

use assert_cmd::Command;
use tempfile::TempDir;

fn sprig(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("sprig").unwrap();
    cmd.current_dir(dir.path());
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().expect("failed to execute sprig");
    assert!(
        output.status.success(),
        "sprig failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn test_translate_writes_next_to_source() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("app.jsx"), "const App = () => <div>hi</div>\n").unwrap();

    let stdout = stdout_of(sprig(&dir).args(["translate", "app.jsx"]));
    assert!(stdout.contains("app.jsx -> app.cljs"), "{stdout}");
    assert_eq!(
        fs::read_to_string(dir.path().join("app.cljs")).unwrap(),
        "(defn App [] [:div nil \"hi\"])\n"
    );
}

#[test]
fn test_translate_into_out_dir() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.js"), "var a = 1").unwrap();
    fs::write(dir.path().join("b.js"), "b()").unwrap();

    stdout_of(sprig(&dir).args(["translate", "a.js", "b.js", "--out", "build"]));
    assert_eq!(
        fs::read_to_string(dir.path().join("build/a.cljs")).unwrap(),
        "(def a 1)\n"
    );
    assert_eq!(fs::read_to_string(dir.path().join("build/b.cljs")).unwrap(), "(b)\n");
}

#[test]
fn test_translate_stdin_to_stdout() {
    let dir = TempDir::new().unwrap();
    let stdout = stdout_of(
        sprig(&dir)
            .args(["translate", "-"])
            .write_stdin("setTimeout(() => done(), 10)"),
    );
    assert_eq!(stdout, "(js/setTimeout (fn [] (done)) 10)\n");
}

#[test]
fn test_global_flags_and_config() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("sprig.toml"), "[globals]\ninclude = [\"React\"]\n").unwrap();

    let stdout = stdout_of(
        sprig(&dir)
            .args(["translate", "-", "--no-global", "setTimeout"])
            .write_stdin("React.render(x); setTimeout()"),
    );
    assert_eq!(stdout, "(.render js/React x)\n\n(setTimeout)\n");
}

#[test]
fn test_raw_output() {
    let dir = TempDir::new().unwrap();
    let stdout = stdout_of(
        sprig(&dir)
            .args(["translate", "-", "--raw"])
            .write_stdin("f(x)"),
    );
    assert_eq!(stdout, "(f x)\n\n");
}

#[test]
fn test_emit_forms() {
    let dir = TempDir::new().unwrap();
    let stdout = stdout_of(
        sprig(&dir)
            .args(["translate", "-", "--emit", "forms"])
            .write_stdin("x"),
    );
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["type"], "program");
    assert_eq!(value["children"][0]["type"], "symbol");
    assert_eq!(value["children"][0]["name"], "x");
}

#[test]
fn test_emit_ast() {
    let dir = TempDir::new().unwrap();
    let stdout = stdout_of(
        sprig(&dir)
            .args(["translate", "-", "--emit", "ast"])
            .write_stdin("x"),
    );
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["type"], "Program");
    assert_eq!(value["body"][0]["type"], "ExpressionStatement");
}

#[test]
fn test_translate_failure_writes_nothing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.js"), "class A {}").unwrap();

    let output = sprig(&dir).args(["translate", "bad.js"]).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("class_declaration"));
    assert!(!dir.path().join("bad.cljs").exists());
}

#[test]
fn test_check_reports_each_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("good.js"), "f()").unwrap();
    fs::write(dir.path().join("bad.js"), "for (;;) {}").unwrap();

    let output = sprig(&dir).args(["check", "good.js", "bad.js"]).output().unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("ok: good.js"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("bad.js:"));
    assert!(!dir.path().join("good.cljs").exists());

    stdout_of(sprig(&dir).args(["check", "good.js"]));
}

#[test]
fn test_library_warnings_reach_stderr() {
    let dir = TempDir::new().unwrap();
    let output = sprig(&dir)
        .env_remove("RUST_LOG")
        .args(["translate", "-"])
        .write_stdin("// about a\nvar a = 1")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "(def a 1)\n");
    assert!(String::from_utf8_lossy(&output.stderr).contains("dropping comment above"));
}
