use std::path::PathBuf;

use clap::Parser;
use renderer::types::{DEFAULT_FRAGMENT_PATH, DEFAULT_VERTEX_PATH};
use renderer::{ContextProfile, MissingSourcePolicy, RedrawMode, ShaderFailurePolicy};

#[derive(Parser, Debug)]
#[command(
    name = "shadertrace",
    author,
    version,
    about = "Host window for a GLSL ray-tracing fragment shader"
)]
pub struct Cli {
    /// Vertex shader source.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_VERTEX_PATH)]
    pub vertex: PathBuf,

    /// Fragment shader source.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_FRAGMENT_PATH)]
    pub fragment: PathBuf,

    /// Window size in pixels; also the values of `winWidth`/`winHeight`.
    #[arg(
        long,
        value_name = "WIDTHxHEIGHT",
        value_parser = parse_size,
        default_value = "600x600"
    )]
    pub size: (u32, u32),

    /// What to do when a shader file cannot be opened: `degrade` or `fail-fast`.
    #[arg(
        long,
        value_name = "POLICY",
        value_parser = parse_missing_source,
        default_value = "degrade"
    )]
    pub on_missing_source: MissingSourcePolicy,

    /// What to do when a shader fails to compile or link: `fallback` or `abort`.
    #[arg(
        long,
        value_name = "POLICY",
        value_parser = parse_shader_failure,
        default_value = "fallback"
    )]
    pub on_shader_error: ShaderFailurePolicy,

    /// Redraw scheduling: `on-demand` or `continuous`.
    #[arg(
        long,
        value_name = "MODE",
        value_parser = parse_redraw,
        default_value = "on-demand"
    )]
    pub redraw: RedrawMode,

    /// Device limits to request: `core` or `downlevel`.
    #[arg(
        long,
        value_name = "PROFILE",
        value_parser = parse_profile,
        default_value = "core"
    )]
    pub profile: ContextProfile,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid width '{}'", w.trim()))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid height '{}'", h.trim()))?;
    if width == 0 || height == 0 {
        return Err("window dimensions must be greater than zero".into());
    }
    Ok((width, height))
}

pub fn parse_missing_source(value: &str) -> Result<MissingSourcePolicy, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "degrade" | "continue" => Ok(MissingSourcePolicy::Degrade),
        "fail-fast" | "fail" => Ok(MissingSourcePolicy::FailFast),
        other => Err(format!(
            "unknown missing-source policy '{other}'; expected degrade or fail-fast"
        )),
    }
}

pub fn parse_shader_failure(value: &str) -> Result<ShaderFailurePolicy, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "fallback" => Ok(ShaderFailurePolicy::Fallback),
        "abort" => Ok(ShaderFailurePolicy::Abort),
        other => Err(format!(
            "unknown shader-error policy '{other}'; expected fallback or abort"
        )),
    }
}

pub fn parse_redraw(value: &str) -> Result<RedrawMode, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on-demand" | "ondemand" => Ok(RedrawMode::OnDemand),
        "continuous" => Ok(RedrawMode::Continuous),
        other => Err(format!(
            "unknown redraw mode '{other}'; expected on-demand or continuous"
        )),
    }
}

pub fn parse_profile(value: &str) -> Result<ContextProfile, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "core" => Ok(ContextProfile::Core),
        "downlevel" | "compat" => Ok(ContextProfile::Downlevel),
        other => Err(format!(
            "unknown device profile '{other}'; expected core or downlevel"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_window_size() {
        assert_eq!(parse_size("600x600").unwrap(), (600, 600));
        assert_eq!(parse_size(" 1280X720 ").unwrap(), (1280, 720));
        assert!(parse_size("600").is_err());
        assert!(parse_size("0x600").is_err());
        assert!(parse_size("wide x tall").is_err());
    }

    #[test]
    fn parses_policies() {
        assert_eq!(
            parse_missing_source("fail-fast").unwrap(),
            MissingSourcePolicy::FailFast
        );
        assert_eq!(
            parse_shader_failure("ABORT").unwrap(),
            ShaderFailurePolicy::Abort
        );
        assert!(parse_shader_failure("ignore").is_err());
        assert_eq!(parse_redraw("continuous").unwrap(), RedrawMode::Continuous);
        assert_eq!(parse_profile("downlevel").unwrap(), ContextProfile::Downlevel);
    }

    #[test]
    fn defaults_match_fixed_harness() {
        let cli = Cli::try_parse_from(["shadertrace"]).unwrap();
        assert_eq!(cli.vertex, PathBuf::from("RT_Shader.vert"));
        assert_eq!(cli.fragment, PathBuf::from("RT_Shader.frag"));
        assert_eq!(cli.size, (600, 600));
        assert_eq!(cli.on_missing_source, MissingSourcePolicy::Degrade);
        assert_eq!(cli.on_shader_error, ShaderFailurePolicy::Fallback);
        assert_eq!(cli.redraw, RedrawMode::OnDemand);
        assert_eq!(cli.profile, ContextProfile::Core);
    }

    #[test]
    fn accepts_overrides() {
        let cli = Cli::try_parse_from([
            "shadertrace",
            "--fragment",
            "scenes/spheres.frag",
            "--size",
            "800x450",
            "--on-shader-error",
            "abort",
            "--redraw",
            "continuous",
        ])
        .unwrap();
        assert_eq!(cli.fragment, PathBuf::from("scenes/spheres.frag"));
        assert_eq!(cli.size, (800, 450));
        assert_eq!(cli.on_shader_error, ShaderFailurePolicy::Abort);
        assert_eq!(cli.redraw, RedrawMode::Continuous);
    }
}
