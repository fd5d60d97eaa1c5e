//! Tests running the `octoplace-scripts` binary as an operator would

use std::{
    fs,
    path::Path,
    process::{Command, Output},
};

use eyre::Result;

/// The first default account of an Anvil node
const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// A command running the binary with an empty environment
fn scripts() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_octoplace-scripts"));
    cmd.env_clear().env("NO_COLOR", "1");
    cmd
}

/// Lossy stdout and stderr of a finished command
fn streams(output: &Output) -> (String, String) {
    (
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

/// Write a networks file with a single profile nothing listens on
fn write_unreachable_network(path: &Path) -> Result<()> {
    fs::write(
        path,
        r#"[{ "name": "unreachable", "rpc_url": "http://127.0.0.1:9/rpc", "signing_key_vars": ["ETH_KEY"], "chain_id": 365 }]"#,
    )?;
    Ok(())
}

/// Write artifacts for the marketplace and the proxy into `dir`
fn write_artifacts(dir: &Path) -> Result<()> {
    fs::write(
        dir.join("OctoplaceMarketUpgradeable.json"),
        r#"{
            "contractName": "OctoplaceMarketUpgradeable",
            "abi": [{ "type": "function", "name": "init", "inputs": [{ "name": "admin", "type": "address" }], "outputs": [], "stateMutability": "nonpayable" }],
            "bytecode": "0x6080604052"
        }"#,
    )?;
    fs::write(
        dir.join("TransparentUpgradeableProxy.json"),
        r#"{ "contractName": "TransparentUpgradeableProxy", "abi": [], "bytecode": "0x6080604052" }"#,
    )?;
    Ok(())
}

#[cfg(unix)]
#[test]
fn non_unicode_environment_does_not_abort() -> Result<()> {
    use std::{ffi::OsStr, os::unix::ffi::OsStrExt};

    let output = scripts()
        .env("UNRELATED_BYTES", OsStr::from_bytes(&[0xff, 0xfe]))
        .arg("networks")
        .output()?;
    let (stdout, stderr) = streams(&output);

    assert!(output.status.success(), "stderr: {stderr}");
    assert!(stdout.contains("theta_testnet"));
    Ok(())
}

#[test]
fn missing_key_exits_non_zero_without_an_address() -> Result<()> {
    let output = scripts()
        .args(["deploy-proxy", "--network", "theta_testnet", "--no-record"])
        .output()?;
    let (stdout, stderr) = streams(&output);

    assert!(!output.status.success());
    assert!(!stdout.contains("Deployed"));
    assert!(stderr.contains("ETH_KEY"), "stderr: {stderr}");
    Ok(())
}

#[test]
fn logs_go_to_stderr_and_leave_stdout_to_the_record() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let networks = dir.path().join("networks.json");
    write_unreachable_network(&networks)?;
    write_artifacts(dir.path())?;

    let output = scripts()
        .env("ETH_KEY", TEST_KEY)
        .env("RUST_LOG", "info")
        .arg("--networks-file")
        .arg(&networks)
        .args(["deploy-proxy", "--network", "unreachable", "--no-record", "--json"])
        .arg("--artifacts-dir")
        .arg(dir.path())
        .output()?;
    let (stdout, stderr) = streams(&output);

    assert!(!output.status.success());
    assert!(stdout.is_empty(), "stdout: {stdout}");
    assert!(stderr.contains("resolved network profile"), "stderr: {stderr}");
    assert!(stderr.contains("Connectivity"), "stderr: {stderr}");
    Ok(())
}
