// SPDX-License-Identifier: MIT OR Apache-2.0
//! `blockflow_inspect`: load a schema and graph and report their layout.
//!
//! Usage: `blockflow_inspect <config.ron>`
//!
//! The config names a schema file, an optional initial graph and optional
//! layout overrides. Paths are resolved relative to the config file.

use blockflow_graph::{Geometry, GraphError, GraphState, Layout, SchemaError, SchemaRegistry};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Errors that stop the inspector
#[derive(Debug, Error)]
enum InspectError {
    #[error("usage: blockflow_inspect <config.ron>")]
    Usage,

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Invalid graph: {0}")]
    Graph(#[from] GraphError),
}

/// Inspector configuration file
#[derive(Debug, Deserialize)]
struct InspectConfig {
    schema: PathBuf,
    #[serde(default)]
    graph: Option<PathBuf>,
    #[serde(default)]
    layout: Layout,
}

fn read(path: &Path) -> Result<String, InspectError> {
    std::fs::read_to_string(path).map_err(|source| InspectError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, InspectError> {
    let text = read(path)?;
    ron::from_str(&text).map_err(|source| InspectError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn inspect(config_path: &Path) -> Result<(), InspectError> {
    let config: InspectConfig = parse(config_path)?;
    let base = config_path.parent().unwrap_or_else(|| Path::new("."));

    let schema = SchemaRegistry::from_ron(&read(&base.join(&config.schema))?)?;
    tracing::info!("Loaded {} kinds from {}", schema.len(), config.schema.display());

    let state = match &config.graph {
        Some(path) => parse::<GraphState>(&base.join(path))?,
        None => GraphState::new(),
    };
    state.validate(&schema, &config.layout)?;

    let geometry = Geometry::new(Arc::new(schema), config.layout);
    report(&geometry, &state)
}

fn report(geometry: &Geometry, state: &GraphState) -> Result<(), InspectError> {
    for kind in geometry.schema().kinds() {
        let size = geometry.footprint(kind.id())?;
        match kind.group() {
            Some(group) => tracing::info!(
                "{} ({}/{}): {}x{}",
                kind.id(),
                group.archetype,
                group.action,
                size.x,
                size.y
            ),
            None => tracing::info!("{}: {}x{}", kind.id(), size.x, size.y),
        }
    }

    for node in state.nodes() {
        let rect = geometry.node_rect(node)?;
        tracing::debug!("{} [{}] at {:?}", node.id, node.kind, rect);
    }
    tracing::info!(
        "{} nodes, {} edges, canvas width {}",
        state.node_count(),
        state.edge_count(),
        geometry.canvas_width(state)
    );
    Ok(())
}

fn main() {
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "blockflow_inspect=info".parse() {
        env_filter = env_filter.add_directive(directive);
    }
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let result = match std::env::args_os().nth(1) {
        Some(path) => inspect(Path::new(&path)),
        None => Err(InspectError::Usage),
    };
    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data/demo.ron")
    }

    #[test]
    fn test_demo_config_loads() {
        let config: InspectConfig = parse(&demo_path()).unwrap();
        assert_eq!(config.layout.height, 32);
        assert_eq!(config.layout.font_size, Layout::default().font_size);
        inspect(&demo_path()).unwrap();
    }

    #[test]
    fn test_demo_graph_matches_schema() {
        let schema = SchemaRegistry::from_ron(include_str!("../data/demo.schema.ron")).unwrap();
        assert_eq!(schema.variants("reader").collect::<Vec<_>>(), ["csv", "json"]);

        let state = GraphState::from_ron(include_str!("../data/demo.graph.ron")).unwrap();
        state.validate(&schema, &Layout::default()).unwrap();
        assert_eq!(state.next_node_id().as_str(), "n3");
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = inspect(Path::new("does/not/exist.ron")).unwrap_err();
        assert!(matches!(err, InspectError::Io { .. }));
        assert!(err.to_string().contains("exist.ron"));
    }
}
