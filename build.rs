//! Validate and minify the built-in WGSL shaders.

use std::path::Path;

use naga::{
    back::wgsl::WriterFlags,
    valid::{Capabilities, ValidationFlags, Validator},
};

/// Prepend the shared prelude to a fragment shader, validate it and write it minified to file.
fn compose_and_minify(prelude: &str, fragment: impl AsRef<Path>, target: impl AsRef<Path>) {
    // Read the fragment WGSL
    let fragment = std::fs::read_to_string(fragment).expect("Error reading WGSL shader file");

    // The prelude defines the vertex stage and all bindings
    let source = format!("{prelude}\n{fragment}");

    // Parse into NAGA module
    let mut module = naga::front::wgsl::parse_str(&source).unwrap_or_else(|err| {
        panic!(
            "Error compiling WGSL shader:\n{}",
            err.emit_to_string(&source)
        )
    });

    // Create the validator
    let info = Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .unwrap_or_else(|err| {
            panic!(
                "Error validating WGSL shader:\n{}",
                err.emit_to_string(&source)
            )
        });

    // Optimize shader, removing unused stuff
    naga::compact::compact(&mut module);

    // Compile back into WGSL
    let output = naga::back::wgsl::write_string(&module, &info, WriterFlags::empty())
        .expect("Error converting WGSL module back to WGSL code");

    // Minify the WGSL
    let output = wgsl_minifier::minify_wgsl_source(&output);

    std::fs::write(target, output).expect("Error writing minified WGSL shader to file");
}

fn main() {
    // Rerun build script if shaders changed
    println!("cargo::rerun-if-changed=shaders/prelude.wgsl");
    println!("cargo::rerun-if-changed=shaders/post_processing.wgsl");
    println!("cargo::rerun-if-changed=shaders/passthrough.wgsl");

    let out_dir_str = std::env::var_os("OUT_DIR").unwrap();
    let out_dir = Path::new(&out_dir_str);

    let prelude =
        std::fs::read_to_string("shaders/prelude.wgsl").expect("Error reading WGSL prelude");

    // Compile the complete shader programs into the OUT_DIR
    compose_and_minify(
        &prelude,
        "shaders/post_processing.wgsl",
        out_dir.join("post_processing.wgsl"),
    );
    compose_and_minify(
        &prelude,
        "shaders/passthrough.wgsl",
        out_dir.join("passthrough.wgsl"),
    );
}
