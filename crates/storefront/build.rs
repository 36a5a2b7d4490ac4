//! Build script for the storefront crate.
//!
//! Computes a content hash of the stylesheet so templates can append it as a
//! cache-busting query parameter (`/static/css/main.css?v=<hash>`).

use std::env;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

fn main() {
    let manifest_dir =
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR must be set by Cargo");
    let css_path = Path::new(&manifest_dir).join("static/css/main.css");

    println!("cargo:rerun-if-changed={}", css_path.display());

    // An empty hash is tolerated so a fresh checkout without assets still builds
    let hash = match fs::read(&css_path) {
        Ok(content) => {
            let mut hasher = Sha256::new();
            hasher.update(&content);
            let digest = format!("{:x}", hasher.finalize());
            digest.get(..8).map(String::from).unwrap_or_default()
        }
        Err(e) => {
            println!("cargo:warning=Could not read main.css: {e}");
            String::new()
        }
    };

    println!("cargo:rustc-env=CSS_HASH={hash}");
}
