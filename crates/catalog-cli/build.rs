use std::process::Command;

use chrono::Utc;

/// `git describe` of the checkout, e.g. `a1b2c3d4` or `a1b2c3d4-dirty`.
fn describe() -> Option<String> {
    let out = Command::new("git")
        .args(["describe", "--always", "--dirty", "--abbrev=8", "--exclude=*"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let described = String::from_utf8(out.stdout).ok()?;
    Some(described.trim().to_owned()).filter(|d| !d.is_empty())
}

fn main() {
    let stamp = match describe() {
        // Local edits get a build time so two dirty binaries can be told apart.
        Some(d) if d.ends_with("-dirty") => format!("{d}@{}", Utc::now().format("%Y%m%d%H%M")),
        Some(d) => d,
        None => String::from("nogit"),
    };
    println!("cargo:rustc-env=BUILD_HASH={stamp}");

    for watched in ["HEAD", "index", "refs"] {
        println!("cargo:rerun-if-changed=../../.git/{watched}");
    }
}
