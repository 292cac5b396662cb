// build.rs

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // The headless build needs no system libraries.
    if std::env::var_os("CARGO_FEATURE_X11").is_none() {
        return;
    }

    // --- Link against X11 ---
    // Try pkg-config first; fall back to manual linking against the standard
    // library name if it is not available.
    if let Err(e) = pkg_config::probe_library("x11") {
        eprintln!(
            "pkg-config failed for library 'x11' ({}). Falling back to manual linking.",
            e
        );
        println!("cargo:rustc-link-lib=X11");
        println!("cargo:rustc-link-search=/usr/lib");
        eprintln!("Manual linking flags applied. Ensure the X11 development libraries are installed.");
    } else {
        eprintln!("pkg-config successfully found libX11. Linking configured automatically.");
    }
}
