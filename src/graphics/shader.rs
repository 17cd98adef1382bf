//! Load, compose and validate the WGSL source of the post-processing shader.

use std::{borrow::Cow, path::Path};

use miette::{Context, IntoDiagnostic, Result};
use naga::{
    valid::{Capabilities, ValidationFlags, Validator},
    Binding, EntryPoint, Handle, Module, Scalar, ShaderStage, Type, TypeInner, VectorSize,
};

/// Bindings and vertex stage every fragment shader is appended to.
const PRELUDE: &str = include_str!("../../shaders/prelude.wgsl");

/// Built-in post-processing program, used when no valid shader file is available.
pub(crate) const BUILTIN: &str = include_str!(concat!(env!("OUT_DIR"), "/post_processing.wgsl"));

/// Program copying the offscreen surface as is, used when the shader is disabled.
pub(crate) const PASSTHROUGH: &str = include_str!(concat!(env!("OUT_DIR"), "/passthrough.wgsl"));

/// Name of the entry point the fragment shader must define.
const FRAGMENT_ENTRY_POINT: &str = "fs_main";

/// Name of the entry point defined by the prelude.
const VERTEX_ENTRY_POINT: &str = "vs_main";

/// Resource bindings as `(group, binding)` declared by the prelude, the pipeline layout only provides these.
const PRELUDE_BINDINGS: [(u32, u32); 3] = [(0, 0), (0, 1), (1, 0)];

/// Type of the single color output, matching the window surface.
const COLOR_OUTPUT: TypeInner = TypeInner::Vector {
    size: VectorSize::Quad,
    scalar: Scalar::F32,
};

/// Prepend the shared prelude to the source of a fragment shader.
fn compose(fragment: &str) -> String {
    format!("{PRELUDE}\n{fragment}")
}

/// Check that a complete program compiles and fits the post-processing pipeline.
///
/// # Errors
///
/// - When the WGSL can't be parsed.
/// - When the module is invalid, for example because of mismatching types.
/// - When the module needs a GPU feature, 64-bit floats for example.
/// - When a resource is bound outside of the prelude bindings.
/// - When there's no `fs_main` fragment entry point.
/// - When `fs_main` reads a value the vertex stage doesn't write, or doesn't write a single color.
pub(crate) fn validate(source: &str) -> Result<()> {
    profiling::scope!("Validate shader");

    let module = naga::front::wgsl::parse_str(source)
        .map_err(|err| miette::miette!("{}", err.emit_to_string(source)))
        .wrap_err("Error parsing WGSL shader")?;

    // The device is requested without any optional features
    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|err| miette::miette!("{}", err.emit_to_string(source)))
        .wrap_err("Error validating WGSL shader")?;

    validate_bindings(&module)?;
    validate_stages(&module)?;

    Ok(())
}

/// Every bound global must be one of the prelude bindings, used only once.
fn validate_bindings(module: &Module) -> Result<()> {
    let mut used = Vec::with_capacity(PRELUDE_BINDINGS.len());

    for (_, global) in module.global_variables.iter() {
        let Some(resource) = global.binding.as_ref() else {
            continue;
        };
        let slot = (resource.group, resource.binding);
        let name = global.name.as_deref().unwrap_or("<unnamed>");

        if !PRELUDE_BINDINGS.contains(&slot) {
            miette::bail!(
                "WGSL shader binds '{name}' to @group({}) @binding({}) which is not provided, only the prelude bindings are available",
                slot.0,
                slot.1
            );
        }

        if used.contains(&slot) {
            miette::bail!(
                "WGSL shader binds '{name}' to @group({}) @binding({}) which is already used",
                slot.0,
                slot.1
            );
        }
        used.push(slot);
    }

    Ok(())
}

/// The fragment stage must only read what the vertex stage writes, and write one color.
fn validate_stages(module: &Module) -> Result<()> {
    let fragment = entry_point(module, ShaderStage::Fragment, FRAGMENT_ENTRY_POINT)?;
    let vertex = entry_point(module, ShaderStage::Vertex, VERTEX_ENTRY_POINT)?;

    let vertex_outputs = vertex
        .function
        .result
        .as_ref()
        .map(|result| locations(module, result.binding.as_ref(), result.ty))
        .unwrap_or_default();

    for argument in &fragment.function.arguments {
        for (location, inner) in locations(module, argument.binding.as_ref(), argument.ty) {
            if !vertex_outputs.contains(&(location, inner)) {
                miette::bail!(
                    "'{FRAGMENT_ENTRY_POINT}' input @location({location}) is not written by the vertex stage, use the 'VertexOutput' struct"
                );
            }
        }
    }

    let fragment_outputs = fragment
        .function
        .result
        .as_ref()
        .map(|result| locations(module, result.binding.as_ref(), result.ty))
        .unwrap_or_default();
    if fragment_outputs != [(0, &COLOR_OUTPUT)] {
        miette::bail!("'{FRAGMENT_ENTRY_POINT}' must return a single '@location(0) vec4<f32>'");
    }

    Ok(())
}

/// Find an entry point by stage and name.
fn entry_point<'a>(module: &'a Module, stage: ShaderStage, name: &str) -> Result<&'a EntryPoint> {
    module
        .entry_points
        .iter()
        .find(|entry| entry.stage == stage && entry.name == name)
        .ok_or_else(|| miette::miette!("WGSL shader has no entry point '{name}'"))
}

/// Interstage values with a `@location`, flattening structs.
fn locations<'a>(
    module: &'a Module,
    binding: Option<&Binding>,
    ty: Handle<Type>,
) -> Vec<(u32, &'a TypeInner)> {
    match binding {
        Some(&Binding::Location { location, .. }) => vec![(location, &module.types[ty].inner)],
        Some(Binding::BuiltIn(_)) => Vec::new(),
        None => match &module.types[ty].inner {
            TypeInner::Struct { members, .. } => members
                .iter()
                .flat_map(|member| locations(module, member.binding.as_ref(), member.ty))
                .collect(),
            _ => Vec::new(),
        },
    }
}

/// Read a fragment shader file and turn it into a complete, validated program.
///
/// # Errors
///
/// - When the file can't be read.
/// - When [`validate`] fails.
pub(crate) fn load(path: &Path) -> Result<String> {
    let fragment = std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Error reading shader file '{}'", path.display()))?;

    let source = compose(&fragment);
    validate(&source).wrap_err_with(|| format!("Invalid shader file '{}'", path.display()))?;

    Ok(source)
}

/// Pick the program for the post-processing pass.
///
/// Failing to load the shader file is not fatal, the built-in shader is used instead.
pub(crate) fn resolve(shader_path: Option<&Path>) -> Cow<'static, str> {
    let Some(path) = shader_path else {
        log::debug!("No shader file configured, using the built-in shader");

        return Cow::Borrowed(BUILTIN);
    };

    match load(path) {
        Ok(source) => {
            log::info!("Loaded shader '{}'", path.display());

            Cow::Owned(source)
        }
        Err(err) => {
            log::error!("{err:?}");
            log::warn!("Falling back to the built-in shader");

            Cow::Borrowed(BUILTIN)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{borrow::Cow, path::PathBuf};

    use super::{compose, load, resolve, validate, BUILTIN, PASSTHROUGH};

    /// Write a shader to a unique temporary file.
    fn temporary_shader(name: &str, source: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "letterbox-{}-{name}.wgsl",
            std::process::id()
        ));
        std::fs::write(&path, source).unwrap();

        path
    }

    #[test]
    fn builtin_programs_are_valid() {
        validate(BUILTIN).unwrap();
        validate(PASSTHROUGH).unwrap();
    }

    #[test]
    fn shipped_shader_file_is_valid() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("shader.wgsl");

        load(&path).unwrap();
    }

    #[test]
    fn fragment_can_use_resolution() {
        let source = compose(
            "@fragment
            fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
                let pixel = floor(in.uv * screen.resolution);
                return vec4<f32>(pixel / screen.resolution, 0.0, 1.0);
            }",
        );

        validate(&source).unwrap();
    }

    #[test]
    fn binding_outside_the_layout_is_rejected() {
        let source = compose(
            "@group(2) @binding(0)
            var<uniform> extra: vec4<f32>;

            @fragment
            fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
                return textureSample(source, source_sampler, in.uv) * extra;
            }",
        );

        let err = validate(&source).unwrap_err();
        assert!(err.to_string().contains("@group(2) @binding(0)"));
    }

    #[test]
    fn rebinding_a_prelude_slot_is_rejected() {
        let source = compose(
            "@group(1) @binding(0)
            var<uniform> tint: vec4<f32>;

            @fragment
            fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
                return tint;
            }",
        );

        assert!(validate(&source).is_err());
    }

    #[test]
    fn gpu_features_are_rejected() {
        let source = compose(
            "@fragment
            fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
                let d: f64 = 1.0lf;
                return vec4<f32>(f32(d));
            }",
        );

        assert!(validate(&source).is_err());
    }

    #[test]
    fn validation_errors_are_rendered_against_the_source() {
        let source = compose(
            "@fragment
            fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
                let d: f64 = 1.0lf;
                return vec4<f32>(f32(d));
            }",
        );

        let err = validate(&source).unwrap_err();
        assert_eq!(err.to_string(), "Error validating WGSL shader");
        assert!(err
            .chain()
            .skip(1)
            .any(|cause| cause.to_string().starts_with("error:")));
    }

    #[test]
    fn wrong_color_output_is_rejected() {
        for output in [
            "@location(0) f32 { return 1.0; }",
            "@location(1) vec4<f32> { return vec4<f32>(1.0); }",
            "@location(0) vec4<u32> { return vec4<u32>(1u); }",
        ] {
            let source = compose(&format!(
                "@fragment
                fn fs_main(in: VertexOutput) -> {output}"
            ));

            assert!(validate(&source).is_err(), "{output}");
        }
    }

    #[test]
    fn input_not_written_by_vertex_stage_is_rejected() {
        let source = compose(
            "@fragment
            fn fs_main(@location(3) extra: vec2<f32>) -> @location(0) vec4<f32> {
                return vec4<f32>(extra, 0.0, 1.0);
            }",
        );
        assert!(validate(&source).is_err());

        let source = compose(
            "@fragment
            fn fs_main(@location(0) uv: vec4<f32>) -> @location(0) vec4<f32> {
                return uv;
            }",
        );
        assert!(validate(&source).is_err());
    }

    #[test]
    fn separate_uv_input_is_accepted() {
        let source = compose(
            "@fragment
            fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
                return textureSample(source, source_sampler, uv);
            }",
        );

        validate(&source).unwrap();
    }

    #[test]
    fn missing_entry_point_is_rejected() {
        let source = compose(
            "@fragment
            fn main(in: VertexOutput) -> @location(0) vec4<f32> {
                return vec4<f32>(1.0);
            }",
        );

        assert!(validate(&source).is_err());
    }

    #[test]
    fn syntax_error_is_rejected() {
        assert!(validate(&compose("@fragment fn fs_main( {")).is_err());
    }

    #[test]
    fn fallback_to_builtin() {
        assert!(matches!(resolve(None), Cow::Borrowed(BUILTIN)));

        let missing = std::env::temp_dir().join("letterbox-shader-that-does-not-exist.wgsl");
        assert!(matches!(resolve(Some(&missing)), Cow::Borrowed(BUILTIN)));

        let broken = temporary_shader("broken", "this is not WGSL");
        assert!(matches!(resolve(Some(&broken)), Cow::Borrowed(BUILTIN)));
        std::fs::remove_file(broken).unwrap();
    }

    #[test]
    fn file_unfit_for_the_pipeline_falls_back() {
        let path = temporary_shader(
            "extra-binding",
            "@group(2) @binding(0)
            var<uniform> extra: vec4<f32>;

            @fragment
            fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
                return extra;
            }",
        );
        assert!(matches!(resolve(Some(&path)), Cow::Borrowed(BUILTIN)));
        std::fs::remove_file(path).unwrap();

        let path = temporary_shader(
            "f64",
            "@fragment
            fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
                let d: f64 = 1.0lf;
                return vec4<f32>(f32(d));
            }",
        );
        assert!(matches!(resolve(Some(&path)), Cow::Borrowed(BUILTIN)));
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn valid_file_is_used() {
        let path = temporary_shader(
            "valid",
            "@fragment
            fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
                return textureSample(source, source_sampler, in.uv).bgra;
            }",
        );

        let source = resolve(Some(&path));
        assert!(matches!(source, Cow::Owned(_)));
        assert!(source.contains(".bgra"));

        std::fs::remove_file(path).unwrap();
    }
}
