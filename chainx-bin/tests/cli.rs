use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

use chainx_test::generate::setup_sequences;

fn fasta(records: &[(&str, &[u8])]) -> anyhow::Result<NamedTempFile> {
    let mut f = tempfile::Builder::new().suffix(".fa").tempfile()?;
    for (id, seq) in records {
        writeln!(f, ">{id}")?;
        f.write_all(seq)?;
        writeln!(f)?;
    }
    Ok(f)
}

fn example() -> anyhow::Result<(NamedTempFile, NamedTempFile)> {
    Ok((
        fasta(&[("target", &b"ACGTACGT"[..])])?,
        fasta(&[("query", &b"ACGTTCGT"[..])])?,
    ))
}

#[test]
fn distance_with_mems() -> anyhow::Result<()> {
    let (t, q) = example()?;
    let extras: [&[&str]; 4] = [
        &[],
        &["--strategy", "plain"],
        &["--naive"],
        &["--precedence", "weak-reverse"],
    ];
    for extra in extras {
        Command::cargo_bin("chainx")?
            .arg("distance")
            .arg("-t")
            .arg(t.path())
            .arg("-q")
            .arg(q.path())
            .args(["-m", "g", "-l", "3", "-a", "MEM"])
            .args(extra)
            .assert()
            .success()
            .stdout("distance = 1\n");
    }
    Ok(())
}

#[test]
fn distance_without_anchors() -> anyhow::Result<()> {
    let (t, q) = example()?;
    // No MUM of the default length 20 exists, so only the sentinels remain.
    Command::cargo_bin("chainx")?
        .arg("distance")
        .arg("-t")
        .arg(t.path())
        .arg("-q")
        .arg(q.path())
        .assert()
        .success()
        .stdout("distance = 8\n");
    Ok(())
}

#[test]
fn distance_json() -> anyhow::Result<()> {
    let (t, q) = example()?;
    Command::cargo_bin("chainx")?
        .arg("distance")
        .arg("-t")
        .arg(t.path())
        .arg("-q")
        .arg(q.path())
        .args(["-l", "3", "-a", "mem", "--json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""id":"query""#)
                .and(predicate::str::contains(r#""distance":1,"#)),
        );
    Ok(())
}

#[test]
fn trace_logs_cost_array() -> anyhow::Result<()> {
    let (t, q) = example()?;
    Command::cargo_bin("chainx")?
        .env_remove("RUST_LOG")
        .arg("distance")
        .arg("-t")
        .arg(t.path())
        .arg("-q")
        .arg(q.path())
        .args(["-l", "3", "-a", "MEM", "--trace"])
        .assert()
        .success()
        .stdout("distance = 1\n")
        .stderr(predicate::str::contains("Cost array = ["))
        .stderr(predicate::str::contains("Sorted anchors of query #0"));
    Ok(())
}

#[test]
fn all2all_identical() -> anyhow::Result<()> {
    let (a, _) = setup_sequences(100, 0.0);
    let f = fasta(&[("x", &a[..]), ("y", &a[..]), ("z", &a[..])])?;
    Command::cargo_bin("chainx")?
        .arg("distance")
        .arg("-t")
        .arg(f.path())
        .arg("-q")
        .arg(f.path())
        .args(["-m", "g", "--all2all", "-j", "2"])
        .assert()
        .success()
        .stdout("3\nx  0  0  0\ny  0  0  0\nz  0  0  0\n");
    Ok(())
}

#[test]
fn all2all_misuse() -> anyhow::Result<()> {
    let (t, q) = example()?;
    Command::cargo_bin("chainx")?
        .arg("distance")
        .arg("-t")
        .arg(t.path())
        .arg("-q")
        .arg(q.path())
        .arg("--all2all")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be the same"));
    Command::cargo_bin("chainx")?
        .arg("distance")
        .arg("-t")
        .arg(t.path())
        .arg("-q")
        .arg(t.path())
        .args(["--all2all", "-m", "sg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Only the global distance"));
    Ok(())
}

#[test]
fn missing_input() -> anyhow::Result<()> {
    let (t, _) = example()?;
    Command::cargo_bin("chainx")?
        .arg("distance")
        .arg("-t")
        .arg(t.path())
        .args(["-q", "/nonexistent/queries.fa"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not open"));
    Ok(())
}

#[test]
fn anchors_one_based() -> anyhow::Result<()> {
    let (t, q) = example()?;
    Command::cargo_bin("chainx")?
        .arg("anchors")
        .arg("-t")
        .arg(t.path())
        .arg("-q")
        .arg(q.path())
        .args(["-l", "4", "-a", "MEM"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0\t1\t4\t1\t4\t4\n"))
        .stdout(predicate::str::contains("0\t1\t4\t5\t8\t4\n"));
    Ok(())
}

#[test]
fn edit_distance() -> anyhow::Result<()> {
    let (t, q) = example()?;
    Command::cargo_bin("chainx")?
        .arg("edit")
        .arg("-t")
        .arg(t.path())
        .arg("-q")
        .arg(q.path())
        .args(["-m", "g"])
        .assert()
        .success()
        .stdout("distance = 1\n");
    Ok(())
}
