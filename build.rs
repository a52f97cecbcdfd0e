//! Retrieves information about the version of the engine from Git and the build
//! environment. The generated `shadow.rs` is included by `src/lib.rs` and
//! identifies the binary at startup and in `--version`.

fn main() -> shadow_rs::SdResult<()> {
    shadow_rs::new()
}
