//! Build script
//!
//! Resolves the script payload and, for Windows targets, embeds it into the
//! executable as RCDATA resource 101. The path is also exported as
//! `PSLAUNCH_PAYLOAD_PATH` for hosts that bundle the bytes directly.

use std::env;
use std::fs;
use std::path::PathBuf;

const PAYLOAD_ENV: &str = "PSLAUNCH_PAYLOAD";
const DEFAULT_PAYLOAD: &str = "resources/payload.ps1";
const SCRIPT_RESOURCE_ID: u16 = 101;

fn main() {
    println!("cargo:rerun-if-env-changed={PAYLOAD_ENV}");

    let manifest_dir = PathBuf::from(env::var_os("CARGO_MANIFEST_DIR").unwrap_or_default());
    let payload = match env::var_os(PAYLOAD_ENV) {
        Some(path) => manifest_dir.join(path),
        None => manifest_dir.join(DEFAULT_PAYLOAD),
    };
    if !payload.is_file() {
        panic!("payload script not found: {}", payload.display());
    }
    println!("cargo:rerun-if-changed={}", payload.display());
    println!("cargo:rustc-env=PSLAUNCH_PAYLOAD_PATH={}", payload.display());

    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows") {
        return;
    }

    let out_dir = PathBuf::from(env::var_os("OUT_DIR").unwrap_or_default());
    let rc = out_dir.join("payload.rc");
    // rc string literals take backslashes as escapes.
    let quoted = payload.display().to_string().replace('\\', "\\\\");
    let script = format!("{SCRIPT_RESOURCE_ID} RCDATA \"{quoted}\"\n");
    if let Err(e) = fs::write(&rc, script) {
        panic!("failed to write {}: {e}", rc.display());
    }

    if let Err(e) = embed_resource::compile(&rc, embed_resource::NONE).manifest_required() {
        panic!("failed to embed payload resource: {e}");
    }
}
