use anyhow::Result;
use renderer::{Renderer, RendererConfig, SceneConfig, ShaderPaths};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

pub fn run(cli: Cli) -> Result<()> {
    let config = renderer_config(cli);
    tracing::debug!(
        vertex = %config.scene.shaders.vertex.display(),
        fragment = %config.scene.shaders.fragment.display(),
        width = config.scene.size.0,
        height = config.scene.size.1,
        missing_source = ?config.scene.missing_source,
        shader_failure = ?config.scene.shader_failure,
        redraw = ?config.redraw,
        profile = %config.profile,
        "resolved shadertrace configuration"
    );

    let mut renderer = Renderer::new(config);
    renderer.run()
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn renderer_config(cli: Cli) -> RendererConfig {
    RendererConfig {
        scene: SceneConfig {
            shaders: ShaderPaths {
                vertex: cli.vertex,
                fragment: cli.fragment,
            },
            size: cli.size,
            missing_source: cli.on_missing_source,
            shader_failure: cli.on_shader_error,
        },
        redraw: cli.redraw,
        profile: cli.profile,
        ..RendererConfig::default()
    }
}
