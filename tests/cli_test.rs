use assert_cmd::prelude::*; // Add methods on commands
use predicates::prelude::*;
use std::path::{PathBuf,Path};
use std::process::Command; // Run programs
use tempfile;
type STDRESULT = Result<(),Box<dyn std::error::Error>>;

const HAMLET: &str = "Who's there?
Nay, answer me: stand, and unfold yourself.
Long live the king!
Bernardo?
He.
You come most carefully upon your hour.
'Tis now struck twelve; get thee to bed, Francisco.
For this relief much thanks: 'tis bitter cold,
And I am sick at heart.
";

// Write `dat` into the temporary directory and return the path.
fn stage(temp_dir: &tempfile::TempDir,name: &str,dat: &[u8]) -> Result<PathBuf,Box<dyn std::error::Error>> {
    let path = temp_dir.path().join(name);
    std::fs::write(&path,dat)?;
    Ok(path)
}

fn run(subcmd: &str,in_path: &Path,out_path: &Path) -> Result<assert_cmd::assert::Assert,Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("statichuff")?;
    Ok(cmd.arg(subcmd)
        .arg("-i").arg(in_path)
        .arg("-o").arg(out_path)
        .assert())
}

fn round_trip_test(dat: &[u8],compress_cmd: &str,expand_cmd: &str) -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = stage(&temp_dir,"source.bin",dat)?;
    let cmp_path = temp_dir.path().join("source.huf");
    let out_path = temp_dir.path().join("expanded.bin");
    run(compress_cmd,&in_path,&cmp_path)?
        .success()
        .stderr(predicate::str::contains(format!("compressed {} into",dat.len())));
    run(expand_cmd,&cmp_path,&out_path)?
        .success()
        .stderr(predicate::str::contains(format!("into {}",dat.len())));
    match (std::fs::read(in_path),std::fs::read(out_path)) {
        (Ok(v1),Ok(v2)) => {
            assert_eq!(v1,v2);
        },
        _ => panic!("unable to compare output with reference")
    }
    Ok(())
}

#[test]
fn text_round_trip() -> STDRESULT {
    round_trip_test(HAMLET.as_bytes(),"compress","expand")
}

#[test]
fn short_mode_names() -> STDRESULT {
    round_trip_test(HAMLET.as_bytes(),"e","d")
}

#[test]
fn binary_round_trip() -> STDRESULT {
    let dat: Vec<u8> = (0..20000u32).map(|i| (i.wrapping_mul(2654435761) >> 13) as u8).collect();
    round_trip_test(&dat,"compress","expand")
}

#[test]
fn empty_round_trip() -> STDRESULT {
    round_trip_test(&[],"compress","expand")
}

#[test]
fn compressed_file_contents() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let in_path = stage(&temp_dir,"aaaab.txt","aaaab".as_bytes())?;
    let cmp_path = temp_dir.path().join("aaaab.huf");
    run("compress",&in_path,&cmp_path)?.success();
    let expected = hex::decode("00000005 00000002 6100000004 6200000001 F0".replace(" ",""))?;
    assert_eq!(std::fs::read(cmp_path)?,expected);
    Ok(())
}

#[test]
fn truncated_file_fails() -> STDRESULT {
    let temp_dir = tempfile::tempdir()?;
    let cmp_path = stage(&temp_dir,"bad.huf",&hex::decode("0000000500000002610000")?)?;
    let out_path = temp_dir.path().join("bad.txt");
    run("expand",&cmp_path,&out_path)?
        .failure()
        .stderr(predicate::str::contains("HeaderFormat"));
    Ok(())
}

#[test]
fn usage_on_bad_invocation() -> STDRESULT {
    let mut cmd = Command::cargo_bin("statichuff")?;
    cmd.arg("compress").arg("-i").arg("only_input")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
    Ok(())
}
