// Embeds the service version at compile time. Release builds may replace the
// patch segment with a build number through HEADLESS_SEO_PATCH_VERSION.

use std::env;

const PATCH_OVERRIDE: &str = "HEADLESS_SEO_PATCH_VERSION";

fn main() {
    let version = env::var("CARGO_PKG_VERSION").expect("CARGO_PKG_VERSION not set");

    let [major, minor, patch] = version.split('.').collect::<Vec<_>>()[..] else {
        panic!("expected MAJOR.MINOR.PATCH in Cargo.toml, got {version}");
    };

    let patch = env::var(PATCH_OVERRIDE)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| patch.to_string());

    println!("cargo:rustc-env=HEADLESS_SEO_VERSION={major}.{minor}.{patch}");
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed={PATCH_OVERRIDE}");
}
