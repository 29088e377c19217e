use std::process::Command;

// Capture the toolchain version for VersionHeaderBuilder::append_rust_environment.
fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let rustc = std::env::var_os("RUSTC").unwrap_or_else(|| "rustc".into());
    let version = Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .and_then(|out| String::from_utf8(out.stdout).ok())
        // "rustc 1.89.0 (hash date)" -> "1.89.0"
        .and_then(|line| line.split_whitespace().nth(1).map(str::to_owned))
        .unwrap_or_default();

    println!("cargo:rustc-env=GRPC_CLIENT_KIT_RUSTC_VERSION={version}");
}
