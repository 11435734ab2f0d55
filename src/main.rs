//! `a2ui-view`: replays an A2UI message batch and prints every surface as
//! an indented outline.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use a2ui_kit::a2ui::{
    A2uiConfig, A2uiMessageProcessor, OutlinePrimitives, SurfaceRenderer, ignore_actions,
};
use anyhow::{Context, Result};
use clap::Parser;

/// Replay an A2UI message batch and print the resolved surfaces
#[derive(Parser, Debug)]
#[command(name = "a2ui-view", version, about)]
struct Cli {
    /// JSON file holding one message or an array of messages; `-` reads stdin
    #[arg(default_value = "-")]
    input: String,

    /// JSON file with engine settings (`maxDepth`, `maxNodes`, `maxSurfaces`)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maximum component nesting per surface
    #[arg(long)]
    max_depth: Option<usize>,

    /// Maximum components rendered per surface
    #[arg(long)]
    max_nodes: Option<usize>,

    /// Surfaces kept before the oldest is evicted; 0 keeps all
    #[arg(long)]
    max_surfaces: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let json = read_input(&cli.input)?;

    let mut processor = A2uiMessageProcessor::with_config(&config);
    let events = processor
        .process_json(&json)
        .context("input is not JSON, even after repair")?;
    log::info!(
        "Applied {} events across {} surfaces",
        events.len(),
        processor.len()
    );
    for event in &events {
        log::debug!("{:?}", event);
    }

    let mut primitives = OutlinePrimitives;
    let on_action = ignore_actions();
    let mut renderer = SurfaceRenderer::new(&mut primitives).with_config(&config);
    for surface in processor.surfaces() {
        println!("== surface `{}` ==", surface.id());
        print!("{}", renderer.render_surface(surface, &on_action));
    }

    for action in processor.take_pending_actions() {
        println!(
            "queued: {}",
            serde_json::to_string(&action.to_envelope()).context("serializing queued action")?
        );
    }

    Ok(())
}

/// Defaults, then the config file, then the environment, then flags.
fn load_config(cli: &Cli) -> Result<A2uiConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            A2uiConfig::from_json(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => A2uiConfig::default(),
    };

    config = config.overlay(|key| std::env::var(key).ok());

    if let Some(depth) = cli.max_depth {
        config.max_depth = depth;
    }
    if let Some(nodes) = cli.max_nodes {
        config.max_nodes = nodes;
    }
    if let Some(cap) = cli.max_surfaces {
        config.max_surfaces = (cap > 0).then_some(cap);
    }
    Ok(config)
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading messages from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(input).with_context(|| format!("reading messages from {}", input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from(["a2ui-view", "batch.json", "--max-depth", "5", "--max-nodes", "200", "--max-surfaces", "0"]);
        let config = load_config(&cli).unwrap();

        assert_eq!(cli.input, "batch.json");
        assert_eq!(config.max_depth, 5);
        assert_eq!(config.max_nodes, 200);
        assert_eq!(config.max_surfaces, None);
    }

    #[test]
    fn test_input_defaults_to_stdin() {
        let cli = Cli::parse_from(["a2ui-view", "--max-surfaces", "3"]);
        assert_eq!(cli.input, "-");
        assert_eq!(load_config(&cli).unwrap().max_surfaces, Some(3));
    }
}
