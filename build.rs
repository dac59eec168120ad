fn main() {
    // The desktop shell needs the Tauri context generated at build time;
    // the plain library build has nothing to generate.
    #[cfg(feature = "desktop")]
    tauri_build::build();
}
