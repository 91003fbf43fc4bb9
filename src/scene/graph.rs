use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use crate::effect::instance::EffectInstance;
use crate::effect::params::ParamValue;
use crate::effects::create_effect;
use crate::foundation::core::Format;
use crate::foundation::error::{FxError, FxResult};
use crate::node::host::{BasicNode, NodeHost};
use crate::session::project::Project;

/// JSON description of an effect graph.
///
/// ```json
/// {
///   "format": { "width": 320, "height": 240 },
///   "nodes": [
///     { "name": "bg", "kind": "checkerboard" },
///     { "name": "soft", "kind": "box_blur",
///       "params": { "radius": { "type": "int", "value": 4 } },
///       "inputs": ["bg"] },
///     { "name": "out", "kind": "writer", "inputs": ["soft"] }
///   ],
///   "output": "out"
/// }
/// ```
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraphDesc {
    /// Render format of every node.
    #[serde(default)]
    pub format: Format,
    /// Views per node.
    #[serde(default = "default_views")]
    pub views: u32,
    /// Nodes, in any order.
    pub nodes: Vec<NodeDesc>,
    /// Name of the node to render.
    pub output: String,
}

/// One node of a [`GraphDesc`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDesc {
    /// Unique node name.
    pub name: String,
    /// Built-in effect kind, see [`crate::EFFECT_KINDS`].
    pub kind: String,
    /// Parameter overrides.
    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,
    /// Upstream node names in slot order; `null` leaves a slot disconnected.
    #[serde(default)]
    pub inputs: Vec<Option<String>>,
}

fn default_views() -> u32 {
    1
}

impl GraphDesc {
    /// Parse from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> FxResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| FxError::validation(format!("parse graph JSON: {e}")))
    }

    /// Parse from a JSON string.
    pub fn from_json_str(s: &str) -> FxResult<Self> {
        serde_json::from_str(s).map_err(|e| FxError::validation(format!("parse graph JSON: {e}")))
    }

    /// Parse from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> FxResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            FxError::validation(format!("open graph JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Create nodes and live instances in `project` and connect them.
    pub fn build(&self, project: &Arc<Project>) -> FxResult<Graph> {
        if self.views == 0 {
            return Err(FxError::validation("graph 'views' must be >= 1"));
        }

        let mut nodes: Vec<GraphNode> = Vec::with_capacity(self.nodes.len());
        let mut by_name = HashMap::new();
        for desc in &self.nodes {
            if by_name.contains_key(desc.name.as_str()) {
                return Err(FxError::validation(format!(
                    "duplicate node name '{}'",
                    desc.name
                )));
            }
            let mut effect = create_effect(&desc.kind)?;
            for (name, value) in &desc.params {
                effect.params_mut().set(name, value.clone()).map_err(|e| {
                    FxError::validation(format!("node '{}': {e}", desc.name))
                })?;
            }
            if desc.inputs.len() > effect.maximum_inputs() {
                return Err(FxError::validation(format!(
                    "node '{}' ({}) takes at most {} input(s), got {}",
                    desc.name,
                    desc.kind,
                    effect.maximum_inputs(),
                    desc.inputs.len()
                )));
            }

            let node =
                Arc::new(BasicNode::new(desc.name.clone(), self.format).with_views(self.views));
            let host: Arc<dyn NodeHost> = node.clone();
            let instance = EffectInstance::new(project, &host, effect);
            instance.open_files_for_all_file_knobs();
            by_name.insert(desc.name.as_str(), nodes.len());
            nodes.push(GraphNode { node, instance });
        }

        for desc in &self.nodes {
            let target = &nodes[by_name[desc.name.as_str()]].instance;
            for (slot, input) in desc.inputs.iter().enumerate() {
                let Some(input) = input else {
                    continue;
                };
                let &idx = by_name.get(input.as_str()).ok_or_else(|| {
                    FxError::validation(format!(
                        "node '{}' input {slot} refers to unknown node '{input}'",
                        desc.name
                    ))
                })?;
                nodes[idx].node.set_output_connected(true);
                target.connect_input(slot, Arc::clone(&nodes[idx].instance))?;
            }
        }

        let &output = by_name.get(self.output.as_str()).ok_or_else(|| {
            FxError::validation(format!("output '{}' is not a node", self.output))
        })?;
        let range = nodes[output].instance.frame_range()?;
        if !range.is_unbounded() {
            nodes[output]
                .instance
                .notify_frame_range_changed(range.first.0, range.last.0)?;
        }

        tracing::debug!(nodes = nodes.len(), output = %self.output, "graph built");
        Ok(Graph { nodes, output })
    }
}

#[derive(Debug)]
struct GraphNode {
    node: Arc<BasicNode>,
    instance: Arc<EffectInstance>,
}

/// Live graph built from a [`GraphDesc`]. Keeps the nodes alive.
#[derive(Debug)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    output: usize,
}

impl Graph {
    /// Live instance of the output node.
    pub fn output(&self) -> &Arc<EffectInstance> {
        &self.nodes[self.output].instance
    }

    /// Live instance named `name`.
    pub fn instance(&self, name: &str) -> Option<&Arc<EffectInstance>> {
        self.find(name).map(|n| &n.instance)
    }

    /// Node named `name`.
    pub fn node(&self, name: &str) -> Option<&Arc<BasicNode>> {
        self.find(name).map(|n| &n.node)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Return `true` for a graph without nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn find(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.node.name() == name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/graph.rs"]
mod tests;
