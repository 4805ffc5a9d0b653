use std::fmt;
use std::path::PathBuf;

/// Window width used when the caller does not override it.
pub const DEFAULT_WIDTH: u32 = 600;
/// Window height used when the caller does not override it.
pub const DEFAULT_HEIGHT: u32 = 600;
/// Title of the preview window.
pub const WINDOW_TITLE: &str = "Shader based RT";
/// Pass-through vertex shader read from the working directory by default.
pub const DEFAULT_VERTEX_PATH: &str = "RT_Shader.vert";
/// Ray-tracing fragment shader read from the working directory by default.
pub const DEFAULT_FRAGMENT_PATH: &str = "RT_Shader.frag";

/// Pipeline stage a shader source is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageKind::Vertex => f.write_str("vertex"),
            StageKind::Fragment => f.write_str("fragment"),
        }
    }
}

/// What the loader does when a shader file cannot be opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingSourcePolicy {
    /// Report the problem and keep going with an empty source string.
    #[default]
    Degrade,
    /// Abort start-up with an error.
    FailFast,
}

/// What the initializer does when a stage fails to compile or the program
/// fails to link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShaderFailurePolicy {
    /// Report the diagnostic and substitute the built-in solid-colour shader.
    #[default]
    Fallback,
    /// Report the diagnostic and abort start-up.
    Abort,
}

/// When the event loop asks the window for a new frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RedrawMode {
    /// Only redraw when the windowing system invalidates the window.
    #[default]
    OnDemand,
    /// Request another redraw every time the loop goes idle.
    Continuous,
}

/// Device capability profile requested from the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextProfile {
    /// Full `wgpu` default limits.
    #[default]
    Core,
    /// Downlevel limits for older GL/GLES class hardware.
    Downlevel,
}

impl ContextProfile {
    pub(crate) fn limits(self) -> wgpu::Limits {
        match self {
            ContextProfile::Core => wgpu::Limits::default(),
            ContextProfile::Downlevel => wgpu::Limits::downlevel_defaults(),
        }
    }
}

impl fmt::Display for ContextProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextProfile::Core => f.write_str("core"),
            ContextProfile::Downlevel => f.write_str("downlevel"),
        }
    }
}

/// On-disk locations of the two shader stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl Default for ShaderPaths {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from(DEFAULT_VERTEX_PATH),
            fragment: PathBuf::from(DEFAULT_FRAGMENT_PATH),
        }
    }
}

/// Everything the scene initializer needs, independent of the window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneConfig {
    /// Shader files to load.
    pub shaders: ShaderPaths,
    /// Dimensions written to `winWidth`/`winHeight`.
    pub size: (u32, u32),
    /// Behaviour when a shader file cannot be opened.
    pub missing_source: MissingSourcePolicy,
    /// Behaviour when compilation or linking fails.
    pub shader_failure: ShaderFailurePolicy,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            shaders: ShaderPaths::default(),
            size: (DEFAULT_WIDTH, DEFAULT_HEIGHT),
            missing_source: MissingSourcePolicy::default(),
            shader_failure: ShaderFailurePolicy::default(),
        }
    }
}

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors the CLI flags: which shader files to compile, how
/// large the window is, and how the event loop should schedule redraws.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererConfig {
    /// Shader locations, uniform dimensions and failure policies.
    pub scene: SceneConfig,
    /// Title of the window.
    pub title: String,
    /// Redraw scheduling for the event loop.
    pub redraw: RedrawMode,
    /// Device limits requested from the adapter.
    pub profile: ContextProfile,
}

impl RendererConfig {
    /// Window size in physical pixels, equal to the uniform dimensions.
    pub fn window_size(&self) -> (u32, u32) {
        self.scene.size
    }
}

impl Default for RendererConfig {
    /// The fixed 600x600 configuration reading `RT_Shader.vert`/`RT_Shader.frag`.
    fn default() -> Self {
        Self {
            scene: SceneConfig::default(),
            title: WINDOW_TITLE.to_string(),
            redraw: RedrawMode::default(),
            profile: ContextProfile::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_fixed_harness() {
        let config = RendererConfig::default();
        assert_eq!(config.window_size(), (600, 600));
        assert_eq!(config.title, "Shader based RT");
        assert_eq!(config.scene.shaders.vertex, PathBuf::from("RT_Shader.vert"));
        assert_eq!(config.scene.shaders.fragment, PathBuf::from("RT_Shader.frag"));
        assert_eq!(config.scene.missing_source, MissingSourcePolicy::Degrade);
        assert_eq!(config.scene.shader_failure, ShaderFailurePolicy::Fallback);
        assert_eq!(config.redraw, RedrawMode::OnDemand);
        assert_eq!(config.profile, ContextProfile::Core);
    }

    #[test]
    fn downlevel_profile_relaxes_limits() {
        let core = ContextProfile::Core.limits();
        let downlevel = ContextProfile::Downlevel.limits();
        assert!(downlevel.max_texture_dimension_2d <= core.max_texture_dimension_2d);
    }
}
