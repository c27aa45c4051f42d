fn main() {
    // Tell Cargo to rerun this build script if app.rc or app.manifest changes.
    println!("cargo:rerun-if-changed=app.rc");
    println!("cargo:rerun-if-changed=app.manifest");

    // The resource only carries the manifest enabling version 6 common controls,
    // so the form and message boxes get the themed look.
    #[cfg(target_os = "windows")]
    {
        let _ = embed_resource::compile("app.rc", &[] as &[&str]);
    }
}
