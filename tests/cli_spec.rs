//! CLI integration tests.
//!
//! These tests run the built `nbdash` binary against temporary content
//! directories. The config directory is pointed at an empty temp dir so a
//! user's own `config.json` cannot leak in.

use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpStream;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

fn notebook_json(heading: &str) -> String {
    format!(
        r##"{{"nbformat": 4, "nbformat_minor": 5, "metadata": {{}},
            "cells": [{{"cell_type": "markdown", "metadata": {{}}, "source": "# {}"}}]}}"##,
        heading
    )
}

/// A `nbdash` command isolated from the caller's config and environment.
fn nbdash(home: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_nbdash"));
    command
        .env("XDG_CONFIG_HOME", home)
        .env("HOME", home)
        .env_remove("NBDASH_NOTEBOOKS_DIR")
        .env_remove("NBDASH_IMAGES_DIR")
        .env_remove("NBDASH_CACHE_CAPACITY")
        .env_remove("NBDASH_TITLE")
        .env("RUST_LOG", "off");
    command
}

fn run(command: &mut Command) -> Output {
    command.output().expect("Failed to run nbdash")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("stdout is not utf-8")
}

/// A directory with `b.ipynb` written before `a.ipynb` and one stray file.
fn notebooks_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("b.ipynb"), notebook_json("Beta")).unwrap();
    fs::write(dir.path().join("a.ipynb"), notebook_json("Alpha")).unwrap();
    fs::write(dir.path().join("notes.txt"), "not a notebook").unwrap();
    dir
}

mod list {
    use super::*;

    #[test]
    fn prints_notebooks_sorted() {
        let home = tempfile::tempdir().unwrap();
        let dir = notebooks_dir();

        let output = run(nbdash(home.path())
            .args(["list", "notebooks", "--notebooks-dir"])
            .arg(dir.path()));

        assert!(output.status.success());
        assert_eq!(stdout(&output), "a.ipynb\nb.ipynb\n");
    }

    #[test]
    fn prints_images_sorted() {
        let home = tempfile::tempdir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        for name in ["p2.png", "p1.jpg", "chart.jpeg", "readme.md"] {
            fs::write(dir.path().join(name), b"bytes").unwrap();
        }

        let output = run(nbdash(home.path())
            .args(["list", "images", "--images-dir"])
            .arg(dir.path()));

        assert!(output.status.success());
        assert_eq!(stdout(&output), "chart.jpeg\np1.jpg\np2.png\n");
    }

    #[test]
    fn empty_directory_prints_nothing() {
        let home = tempfile::tempdir().unwrap();
        let dir = tempfile::tempdir().unwrap();

        let output = run(nbdash(home.path())
            .args(["list", "notebooks", "--notebooks-dir"])
            .arg(dir.path()));

        assert!(output.status.success());
        assert!(stdout(&output).is_empty());
    }

    #[test]
    fn missing_directory_fails() {
        let home = tempfile::tempdir().unwrap();
        let dir = tempfile::tempdir().unwrap();

        let output = run(nbdash(home.path())
            .args(["list", "notebooks", "--notebooks-dir"])
            .arg(dir.path().join("absent")));

        assert!(!output.status.success());
        assert!(stdout(&output).is_empty());
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let home = tempfile::tempdir().unwrap();
        let output = run(nbdash(home.path()).args(["list", "videos"]));
        assert!(!output.status.success());
    }
}

mod render {
    use super::*;

    #[test]
    fn prints_html_body() {
        let home = tempfile::tempdir().unwrap();
        let dir = notebooks_dir();

        let output = run(nbdash(home.path())
            .arg("render")
            .arg(dir.path().join("a.ipynb")));

        assert!(output.status.success());
        let html = stdout(&output);
        assert!(html.contains("nb-notebook"));
        assert!(html.contains("Alpha"));
        assert!(!html.contains("Beta"));
    }

    #[test]
    fn malformed_notebook_fails() {
        let home = tempfile::tempdir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ipynb");
        fs::write(&path, "{ not json").unwrap();

        let output = run(nbdash(home.path()).arg("render").arg(&path));

        assert!(!output.status.success());
        assert!(stdout(&output).is_empty());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("broken.ipynb"));
    }

    #[test]
    fn missing_path_fails() {
        let home = tempfile::tempdir().unwrap();
        let dir = tempfile::tempdir().unwrap();

        let output = run(nbdash(home.path())
            .arg("render")
            .arg(dir.path().join("ghost.ipynb")));

        assert!(!output.status.success());
    }
}

mod serve {
    use super::*;

    /// Kills the server when the test ends, pass or fail.
    struct Server(std::process::Child);

    impl Drop for Server {
        fn drop(&mut self) {
            let _ = self.0.kill();
            let _ = self.0.wait();
        }
    }

    /// Read stderr until the server logs the address it bound.
    fn bound_address(server: &mut Server) -> String {
        let stderr = server.0.stderr.take().expect("Failed to get stderr");
        for line in BufReader::new(stderr).lines() {
            let line = line.expect("Failed to read stderr");
            if let Some((_, rest)) = line.split_once("listening on http://") {
                return rest
                    .chars()
                    .take_while(|c| c.is_ascii_digit() || *c == '.' || *c == ':')
                    .collect();
            }
        }
        panic!("server exited before listening");
    }

    fn get(addr: &str, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).expect("Failed to connect");
        write!(
            stream,
            "GET {} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n\r\n",
            path, addr
        )
        .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).unwrap();
        response
    }

    #[test]
    fn serves_the_api_on_the_bound_port() {
        let home = tempfile::tempdir().unwrap();
        let dir = notebooks_dir();

        let child = nbdash(home.path())
            .env("RUST_LOG", "nbdash=info")
            .env("NO_COLOR", "1")
            .args(["serve", "--port", "0", "--notebooks-dir"])
            .arg(dir.path())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn nbdash serve");
        let mut server = Server(child);
        let addr = bound_address(&mut server);

        let health = get(&addr, "/api/v1/health");
        assert!(health.starts_with("HTTP/1.1 200"));
        assert!(health.contains(r#""status":"ok""#));

        let notebooks = get(&addr, "/api/v1/notebooks");
        assert!(notebooks.contains(r#"["a.ipynb","b.ipynb"]"#));
    }
}
