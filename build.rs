//! Build script that embeds the crate version from `THEMECONF_VERSION` or `git describe`.
use std::process::Command;

fn main() {
    // Prefer THEMECONF_VERSION env var if set (e.g., by a release workflow),
    // otherwise fall back to git describe for local development builds.
    if let Ok(version) = std::env::var("THEMECONF_VERSION") {
        println!("cargo:rustc-env=THEMECONF_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=THEMECONF_VERSION={version}");
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=THEMECONF_VERSION");
}
