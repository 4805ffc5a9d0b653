use thiserror::Error;
use wgpu::naga;

use crate::loader::ShaderSource;
use crate::types::StageKind;

/// GLSL dialect every stage is compiled as.
const GLSL_VERSION: &str = "#version 450";

/// Uniform block replacing loose `uniform float winWidth;`/`winHeight;`
/// declarations. Kept on one line so the user's line numbers survive.
const WINDOW_UNIFORM_BLOCK: &str =
    "layout(std140, set = 0, binding = 0) uniform WindowParams { float winWidth; float winHeight; };";

/// Pass-through vertex shader used when the user's vertex stage is unusable.
const FALLBACK_VERTEX_GLSL: &str = r"#version 450
layout(location = 0) in vec2 position;

void main() {
    gl_Position = vec4(position, 0.0, 1.0);
}
";

/// Solid magenta fragment shader used when the user's fragment stage is unusable.
const FALLBACK_FRAGMENT_GLSL: &str = r"#version 450
layout(std140, set = 0, binding = 0) uniform WindowParams { float winWidth; float winHeight; };
layout(location = 0) out vec4 outColor;

void main() {
    outColor = vec4(1.0, 0.0, 1.0, 1.0);
}
";

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{stage} shader failed to parse")]
    Parse { stage: StageKind, log: String },

    #[error("{stage} shader failed validation")]
    Validation { stage: StageKind, log: String },

    #[error("{stage} shader has no `main` entry point")]
    MissingEntryPoint { stage: StageKind },
}

impl CompileError {
    pub fn stage(&self) -> StageKind {
        match self {
            CompileError::Parse { stage, .. }
            | CompileError::Validation { stage, .. }
            | CompileError::MissingEntryPoint { stage } => *stage,
        }
    }

    /// Compiler diagnostic text; never empty.
    pub fn log(&self) -> String {
        match self {
            CompileError::Parse { log, .. } | CompileError::Validation { log, .. }
                if !log.trim().is_empty() =>
            {
                log.clone()
            }
            other => other.to_string(),
        }
    }
}

/// A stage that parsed and validated, ready to be linked.
#[derive(Debug, Clone)]
pub struct CompiledStage {
    pub kind: StageKind,
    /// Normalised GLSL handed to the GPU backend.
    pub glsl: String,
    /// naga IR used to check the interface contract at link time.
    pub module: naga::Module,
    /// True when this is the built-in replacement shader.
    pub fallback: bool,
}

/// Normalises and compiles a loaded source.
pub fn compile_stage(source: &ShaderSource) -> Result<CompiledStage, CompileError> {
    let glsl = normalize_source(&source.text);
    let module = compile_glsl(source.stage, &glsl)?;
    Ok(CompiledStage {
        kind: source.stage,
        glsl,
        module,
        fallback: false,
    })
}

/// Compiles the built-in replacement for `kind`.
pub fn fallback_stage(kind: StageKind) -> Result<CompiledStage, CompileError> {
    let glsl = match kind {
        StageKind::Vertex => FALLBACK_VERTEX_GLSL,
        StageKind::Fragment => FALLBACK_FRAGMENT_GLSL,
    };
    let module = compile_glsl(kind, glsl)?;
    Ok(CompiledStage {
        kind,
        glsl: glsl.to_string(),
        module,
        fallback: true,
    })
}

fn compile_glsl(stage: StageKind, glsl: &str) -> Result<naga::Module, CompileError> {
    let naga_stage = match stage {
        StageKind::Vertex => naga::ShaderStage::Vertex,
        StageKind::Fragment => naga::ShaderStage::Fragment,
    };

    let mut frontend = naga::front::glsl::Frontend::default();
    let options = naga::front::glsl::Options::from(naga_stage);
    let module = frontend
        .parse(&options, glsl)
        .map_err(|errors| CompileError::Parse {
            stage,
            log: errors.emit_to_string(glsl),
        })?;

    if !module
        .entry_points
        .iter()
        .any(|entry| entry.stage == naga_stage)
    {
        return Err(CompileError::MissingEntryPoint { stage });
    }

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    );
    validator
        .validate(&module)
        .map_err(|err| CompileError::Validation {
            stage,
            log: err.emit_to_string(glsl),
        })?;

    tracing::debug!(
        %stage,
        globals = module.global_variables.len(),
        functions = module.functions.len(),
        "compiled shader stage"
    );
    Ok(module)
}

/// Produces GLSL the naga front-end accepts from a GL-style source.
///
/// The source is scanned statement by statement, skipping comments and
/// preprocessor lines:
///
/// 1. The first `#version` directive is replaced by [`GLSL_VERSION`]; one is
///    prepended when the source has none.
/// 2. Every `uniform float` declaration that names only `winWidth` and/or
///    `winHeight` is removed. The first one is replaced by
///    [`WINDOW_UNIFORM_BLOCK`], which keeps the same names in scope.
///
/// Removed declarations keep their line breaks, so diagnostics still point at
/// the user's line numbers.
fn normalize_source(source: &str) -> String {
    let mut out = String::with_capacity(source.len() + WINDOW_UNIFORM_BLOCK.len());
    let mut saw_version = false;
    let mut injected_block = false;
    let mut in_comment = false;
    // Code of the statement being scanned, comments blanked out.
    let mut statement = String::new();
    // Where that statement starts in `out`.
    let mut statement_start = 0;

    for line in source.lines() {
        let directive = line.trim_start();
        if !in_comment && directive.starts_with('#') {
            if !saw_version && directive.starts_with("#version") {
                saw_version = true;
                out.push_str(GLSL_VERSION);
            } else {
                out.push_str(line);
            }
            out.push('\n');
            statement.clear();
            statement_start = out.len();
            continue;
        }

        let mut rest = line;
        while !rest.is_empty() {
            if in_comment {
                match rest.find("*/") {
                    Some(end) => {
                        out.push_str(&rest[..end + 2]);
                        rest = &rest[end + 2..];
                        in_comment = false;
                        statement.push(' ');
                        if statement.trim().is_empty() {
                            statement.clear();
                            statement_start = out.len();
                        }
                    }
                    None => {
                        out.push_str(rest);
                        rest = "";
                    }
                }
                continue;
            }

            let Some(pos) = rest.find(['/', ';', '{', '}']) else {
                out.push_str(rest);
                statement.push_str(rest);
                break;
            };
            out.push_str(&rest[..pos]);
            statement.push_str(&rest[..pos]);
            rest = &rest[pos..];

            if rest.starts_with("//") {
                out.push_str(rest);
                rest = "";
            } else if rest.starts_with("/*") {
                out.push_str("/*");
                rest = &rest[2..];
                in_comment = true;
            } else if rest.starts_with('/') {
                out.push('/');
                statement.push('/');
                rest = &rest[1..];
            } else if rest.starts_with(';') {
                rest = &rest[1..];
                if declares_window_uniforms(&statement) {
                    let line_breaks = out[statement_start..].matches('\n').count();
                    out.truncate(statement_start);
                    if !injected_block {
                        injected_block = true;
                        out.push_str(WINDOW_UNIFORM_BLOCK);
                    }
                    out.extend(std::iter::repeat('\n').take(line_breaks));
                } else {
                    out.push(';');
                }
                statement.clear();
                statement_start = out.len();
            } else {
                out.push_str(&rest[..1]);
                rest = &rest[1..];
                statement.clear();
                statement_start = out.len();
            }
        }

        out.push('\n');
        statement.push('\n');
        if statement.trim().is_empty() {
            statement.clear();
            statement_start = out.len();
        }
    }

    if saw_version {
        out
    } else {
        format!("{GLSL_VERSION}\n{out}")
    }
}

/// True when `statement` (without its `;` and comments) declares only the
/// window uniforms, e.g. `uniform highp float winWidth, winHeight = 600.0`.
fn declares_window_uniforms(statement: &str) -> bool {
    let mut tokens = statement.split_whitespace();
    if tokens.next() != Some("uniform") {
        return false;
    }
    let mut ty = tokens.next();
    if matches!(ty, Some("lowp" | "mediump" | "highp")) {
        ty = tokens.next();
    }
    if ty != Some("float") {
        return false;
    }

    let names = tokens.collect::<Vec<_>>().join(" ");
    names.split(',').all(|declarator| {
        let name = declarator.split('=').next().unwrap_or_default().trim();
        matches!(name, "winWidth" | "winHeight")
    })
}
