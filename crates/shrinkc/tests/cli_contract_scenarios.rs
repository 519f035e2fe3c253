//! CLI contract tests against a trivial oracle: an executable shell script
//! that exits 0 iff `t.c` still contains the substring `X` (plus, where a
//! scenario needs to force a particular candidate to be rejected, an extra
//! substring check).

use std::fs;
use std::os::unix::fs::PermissionsExt;

use assert_cmd::Command;
use tempfile::TempDir;

fn shrinkc_cmd() -> Command {
    Command::cargo_bin("shrinkc").expect("failed to find shrinkc binary")
}

/// Writes an executable `oracle.sh` in `dir` running `checks` (a `&&`-joined
/// shell condition over `t.c`) and the input file `t.c` containing `input`.
fn setup(dir: &TempDir, checks: &str, input: &str) {
    let oracle = dir.path().join("oracle.sh");
    fs::write(&oracle, format!("#!/bin/sh\n{checks}\n")).unwrap();
    let mut perms = fs::metadata(&oracle).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&oracle, perms).unwrap();
    fs::write(dir.path().join("t.c"), input).unwrap();
}

fn read_t_c(dir: &TempDir) -> String {
    fs::read_to_string(dir.path().join("t.c")).unwrap()
}

/// Scenario 1: `--brackets` deletes the whole `{...}` span first; when that
/// candidate drops `X` the oracle rejects it, falling back to deleting just
/// the two brace characters.
#[test]
fn scenario_1_brackets_falls_back_to_braces_only() {
    let dir = TempDir::new().unwrap();
    setup(
        &dir,
        "exec grep -q X t.c",
        " int main(void){int x; X; return 0;} ",
    );

    shrinkc_cmd()
        .current_dir(dir.path())
        .args(["./oracle.sh", "t.c", "--brackets"])
        .assert()
        .success();

    let out = read_t_c(&dir);
    assert!(out.contains('X'));
    assert!(!out.contains('{'));
    assert!(!out.contains('}'));
    assert!(out.contains("int main(void)"));
}

/// Scenario 2: `--parens` tries deleting the whole `(b + c)` span first;
/// the oracle also requires `+` to survive, so that candidate is rejected
/// and the fallback (delete only the parens) is accepted instead.
#[test]
fn scenario_2_parens_falls_back_to_parens_only() {
    let dir = TempDir::new().unwrap();
    setup(
        &dir,
        "grep -q X t.c && exec grep -q '+' t.c",
        " a = (b + c); X ",
    );

    shrinkc_cmd()
        .current_dir(dir.path())
        .args(["./oracle.sh", "t.c", "--parens"])
        .assert()
        .success();

    let out = read_t_c(&dir);
    assert!(out.contains('X'));
    assert!(!out.contains('('));
    assert!(!out.contains(')'));
    assert!(out.contains("b + c"));
}

/// Scenario 3: `--shorten_ints` walks `0x1ULL` down to `1` one edit at a
/// time (suffix letters, then the `0x` prefix; no digit-drop candidate
/// since only one digit remains).
#[test]
fn scenario_3_shorten_ints_walks_to_bare_digit() {
    let dir = TempDir::new().unwrap();
    setup(&dir, "exec grep -q X t.c", " int x = 0x1ULL; X ");

    shrinkc_cmd()
        .current_dir(dir.path())
        .args(["./oracle.sh", "t.c", "--shorten_ints"])
        .assert()
        .success();

    let out = read_t_c(&dir);
    assert!(out.contains("int x = 1;"));
    assert!(out.contains('X'));
}

/// Scenario 4: `--ternary` tries the `b` branch first; the oracle requires
/// `c` to survive, so it falls back to the `c` branch.
#[test]
fn scenario_4_ternary_falls_back_to_c_branch() {
    let dir = TempDir::new().unwrap();
    setup(&dir, "grep -q X t.c && exec grep -q c t.c", " a ? b : c ; X ");

    shrinkc_cmd()
        .current_dir(dir.path())
        .args(["./oracle.sh", "t.c", "--ternary"])
        .assert()
        .success();

    let out = read_t_c(&dir);
    assert!(out.contains('X'));
    assert!(out.contains('c'));
    assert!(!out.contains('?'));
    assert!(!out.contains('b'));
}

/// Scenario 5: `--crc` rewrites `transparent_crc(g_1, "x", 0)` to a plain
/// `printf` over its first argument.
#[test]
fn scenario_5_crc_rewrites_to_printf() {
    let dir = TempDir::new().unwrap();
    setup(
        &dir,
        "exec grep -q X t.c",
        " transparent_crc(g_1, \"x\", 0); X ",
    );

    shrinkc_cmd()
        .current_dir(dir.path())
        .args(["./oracle.sh", "t.c", "--crc"])
        .assert()
        .success();

    let out = read_t_c(&dir);
    assert!(out.contains("printf (\"%d\\n\", (int)g_1);"));
    assert!(!out.contains("transparent_crc"));
    assert!(out.contains('X'));
}

/// Scenario 6: `--all_blanks` collapses runs of whitespace to a single
/// space and inserts a newline after every `:`.
#[test]
fn scenario_6_all_blanks_normalizes_whitespace() {
    let dir = TempDir::new().unwrap();
    setup(
        &dir,
        "exec grep -q X t.c",
        " int  main(void)  {  goto  l;  l:  X;  } ",
    );

    shrinkc_cmd()
        .current_dir(dir.path())
        .args(["./oracle.sh", "t.c", "--all_blanks"])
        .assert()
        .success();

    let out = read_t_c(&dir);
    assert!(out.contains('X'));
    assert!(!out.contains("  "));
    assert!(out.contains("l:\n"));
}

/// An unrecognized method flag aborts with a usage error.
#[test]
fn unknown_method_flag_aborts_with_usage_message() {
    let dir = TempDir::new().unwrap();
    setup(&dir, "exec grep -q X t.c", " X ");

    shrinkc_cmd()
        .current_dir(dir.path())
        .args(["./oracle.sh", "t.c", "--not_a_real_method"])
        .assert()
        .failure();
}

/// A non-executable oracle script aborts with a usage error.
#[test]
fn non_executable_oracle_aborts() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("oracle.sh"), "#!/bin/sh\nexit 0\n").unwrap();
    fs::write(dir.path().join("t.c"), " X ").unwrap();

    shrinkc_cmd()
        .current_dir(dir.path())
        .args(["./oracle.sh", "t.c", "--all"])
        .assert()
        .failure();
}
