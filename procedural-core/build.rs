// Windows DLLs only export what the linker is told to; the C-ABI surface of
// `bridge` is listed in cave_core.def.
use std::env;
use std::path::PathBuf;

const DEF_FILE: &str = "cave_core.def";

fn main() {
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_default());
    let def_path = manifest_dir.join(DEF_FILE);
    println!("cargo:rerun-if-changed={}", def_path.display());

    if env::var("CARGO_CFG_TARGET_OS").as_deref() != Ok("windows") {
        return;
    }

    match env::var("CARGO_CFG_TARGET_ENV").as_deref() {
        Ok("msvc") => println!("cargo:rustc-cdylib-link-arg=/DEF:{}", def_path.display()),
        Ok("gnu") => println!("cargo:rustc-cdylib-link-arg=-Wl,--export-all-symbols"),
        _ => {}
    }
}
