use assert_cmd::Command;
use flate2::Compression;
use flate2::write::GzEncoder;
use gvmkit_bootstrap::meta::{Meta, RELEASE_TAG};
use gvmkit_bootstrap::platform::{ArchiveFormat, PlatformDescriptor, resolve_current};
use mockito::Server;
use predicates::prelude::*;
use std::io::prelude::*;
use tempfile::tempdir;

fn create_tar_gz(files: &[(&str, &str, u32)]) -> Vec<u8> {
    let mut tar_builder = tar::Builder::new(Vec::new());
    for (name, content, mode) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_path(name).unwrap();
        header.set_mode(*mode);
        header.set_cksum();
        tar_builder.append(&header, content.as_bytes()).unwrap();
    }
    let tar = tar_builder.into_inner().unwrap();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar).unwrap();
    encoder.finish().unwrap()
}

fn create_zip(files: &[(&str, &str)]) -> Vec<u8> {
    use zip::CompressionMethod;
    use zip::ZipWriter;
    use zip::write::FileOptions;

    let mut writer = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options: FileOptions<()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, content) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(content.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

/// Release archive path for the host's target, and a body holding a fake
/// binary named after the bundled package.
fn host_release(desc: &PlatformDescriptor) -> (String, Vec<u8>) {
    let meta = Meta::bundled().unwrap();
    let path = format!(
        "/releases/download/{}/{}-{}.{}",
        RELEASE_TAG,
        meta.name,
        desc.target_triple,
        desc.archive_format.extension()
    );
    let binary_name = format!("{}{}", meta.name, std::env::consts::EXE_SUFFIX);
    let body = match desc.archive_format {
        ArchiveFormat::TarGz => create_tar_gz(&[(&binary_name, "fake binary", 0o755)]),
        ArchiveFormat::Zip => create_zip(&[(&binary_name, "fake binary")]),
    };
    (path, body)
}

#[test]
fn test_end_to_end_install() {
    // The binary resolves the host platform itself; skip on unsupported hosts.
    let Ok(desc) = resolve_current() else {
        return;
    };

    let mut server = Server::new();
    let (path, body) = host_release(desc);

    let mock = server
        .mock("GET", path.as_str())
        .with_status(200)
        .with_body(body)
        .create();

    let dir = tempdir().unwrap();
    let root = dir.path().join("gvmkit");

    Command::cargo_bin("gvmkit-bootstrap")
        .unwrap()
        .args(["install", "--root"])
        .arg(&root)
        .args(["--base-url", &server.url()])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Downloading release from")
                .and(predicate::str::contains("gvmkit-build has been installed!")),
        );

    mock.assert();
    let binary = root
        .join("bin")
        .join(format!("gvmkit-build{}", std::env::consts::EXE_SUFFIX));
    assert_eq!(std::fs::read_to_string(binary).unwrap(), "fake binary");
    assert!(!root.join("bin.partial").exists());
}

#[test]
fn test_install_then_uninstall() {
    let Ok(desc) = resolve_current() else {
        return;
    };

    let mut server = Server::new();
    let (path, body) = host_release(desc);
    server
        .mock("GET", path.as_str())
        .with_status(200)
        .with_body(body)
        .create();

    let dir = tempdir().unwrap();
    let root = dir.path().join("gvmkit");

    Command::cargo_bin("gvmkit-bootstrap")
        .unwrap()
        .args(["install", "--root"])
        .arg(&root)
        .args(["--base-url", &server.url()])
        .assert()
        .success();
    assert!(root.join("bin").exists());

    Command::cargo_bin("gvmkit-bootstrap")
        .unwrap()
        .args(["uninstall", "--root"])
        .arg(&root)
        .assert()
        .success();
    assert!(!root.join("bin").exists());

    // Uninstall is idempotent
    Command::cargo_bin("gvmkit-bootstrap")
        .unwrap()
        .args(["uninstall", "--root"])
        .arg(&root)
        .assert()
        .success();
}

#[test]
fn test_install_download_failure_exits_nonzero() {
    let Ok(desc) = resolve_current() else {
        return;
    };

    let mut server = Server::new();
    let (path, _body) = host_release(desc);
    server
        .mock("GET", path.as_str())
        .with_status(404)
        .create();

    let dir = tempdir().unwrap();
    let root = dir.path().join("gvmkit");

    Command::cargo_bin("gvmkit-bootstrap")
        .unwrap()
        .args(["install", "--root"])
        .arg(&root)
        .args(["--base-url", &server.url()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error fetching release"));

    assert!(!root.join("bin").exists());
}

#[test]
fn test_run_without_install_fails() {
    if resolve_current().is_err() {
        return;
    }

    let dir = tempdir().unwrap();
    let root = dir.path().join("gvmkit");

    Command::cargo_bin("gvmkit-bootstrap")
        .unwrap()
        .args(["run", "--root"])
        .arg(&root)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("is not installed"));
}

#[cfg(unix)]
#[test]
fn test_run_forwards_exit_code_and_args() {
    if resolve_current().is_err() {
        return;
    }

    let dir = tempdir().unwrap();
    let root = dir.path().join("gvmkit");
    let bin = root.join("bin");
    std::fs::create_dir_all(&bin).unwrap();

    // Installed "binary" that echoes its first argument and exits 3
    let script = bin.join("gvmkit-build");
    std::fs::write(&script, "#!/bin/sh\necho \"arg:$1\"\nexit 3\n").unwrap();
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    Command::cargo_bin("gvmkit-bootstrap")
        .unwrap()
        .args(["run", "--root"])
        .arg(&root)
        .args(["--", "hello"])
        .assert()
        .code(3)
        .stdout(predicate::str::contains("arg:hello"));
}
