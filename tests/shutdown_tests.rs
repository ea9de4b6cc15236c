#![cfg(unix)]

use std::net::{TcpListener, TcpStream};
use std::process::{Command, Stdio};
use std::thread::sleep;
use std::time::{Duration, Instant};

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn wait_until(timeout: Duration, mut ready: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if ready() {
            return true;
        }
        sleep(Duration::from_millis(100));
    }
    false
}

#[test]
fn server_exits_cleanly_on_sigterm() {
    let tmp = tempfile::tempdir().unwrap();
    let data_dir = tmp.path().join("data");
    let port = free_port();

    let mut server = Command::new(env!("CARGO_BIN_EXE_company-directory-server"))
        .current_dir(tmp.path())
        .env("DIRECTORY_SERVER__BIND", "127.0.0.1")
        .env("DIRECTORY_SERVER__PORT", port.to_string())
        .env("DIRECTORY_DATA__DIR", data_dir.display().to_string())
        .env(
            "DIRECTORY_DATA__DB_URL",
            format!("sqlite://{}", data_dir.join("directory.sqlite").display()),
        )
        .env("DIRECTORY_SEED__ENABLED", "false")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let listening = wait_until(Duration::from_secs(20), || {
        TcpStream::connect(("127.0.0.1", port)).is_ok()
    });
    if !listening {
        let _ = server.kill();
        panic!("server did not start listening on port {port}");
    }

    let status = Command::new("kill")
        .args(["-TERM", &server.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let mut exit = None;
    let exited = wait_until(Duration::from_secs(10), || {
        exit = server.try_wait().unwrap();
        exit.is_some()
    });
    if !exited {
        let _ = server.kill();
        panic!("server ignored SIGTERM");
    }
    assert!(exit.unwrap().success());
    assert!(data_dir.join("directory.sqlite").is_file());
}
