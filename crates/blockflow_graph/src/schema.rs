// SPDX-License-Identifier: MIT OR Apache-2.0
//! Kind declarations and the registry built from them.
//!
//! The registry is built once per editor session and is read-only after
//! that. Every validation in the reducer and every measurement in the
//! geometry engine looks kinds up here by name.

use crate::error::{GraphError, Result, SchemaError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Declared input or output port
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortDecl {
    /// Port name, unique within its side of the kind
    pub name: String,
    /// Display label, defaults to the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl PortDecl {
    /// Declare a port whose label is its name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
        }
    }

    /// Label shown next to the port
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// Declared node parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamDecl {
    /// Param name, unique within the kind
    pub name: String,
    /// Display label, defaults to the name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Value given to new nodes
    #[serde(default)]
    pub default: String,
}

impl ParamDecl {
    /// Label shown above the field
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// Secondary `{archetype, action}` tag used to resolve a kind indirectly
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    /// Family of kinds offered together
    pub archetype: String,
    /// Variant within the family
    pub action: String,
}

/// Host-supplied description of one node kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindDecl {
    /// Kind name used by nodes
    pub id: String,
    /// Display name
    pub name: String,
    /// Ordered inputs
    #[serde(default)]
    pub inputs: Vec<PortDecl>,
    /// Ordered outputs
    #[serde(default)]
    pub outputs: Vec<PortDecl>,
    /// Ordered params
    #[serde(default)]
    pub params: Vec<ParamDecl>,
    /// Whether the node shows an image above its ports
    #[serde(default)]
    pub image: bool,
    /// Optional variant tag
    #[serde(default)]
    pub group: Option<Group>,
    /// Header color
    #[serde(default = "default_color")]
    pub color: [u8; 3],
}

fn default_color() -> [u8; 3] {
    [70, 100, 130]
}

impl KindDecl {
    /// Start a declaration with no ports
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            params: Vec::new(),
            image: false,
            group: None,
            color: default_color(),
        }
    }

    /// Append an input port
    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(PortDecl::new(name));
        self
    }

    /// Append an output port
    pub fn output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(PortDecl::new(name));
        self
    }

    /// Append a param with a default value
    pub fn param(mut self, name: impl Into<String>, default: impl Into<String>) -> Self {
        self.params.push(ParamDecl {
            name: name.into(),
            label: None,
            default: default.into(),
        });
        self
    }

    /// Show an image above the ports
    pub fn with_image(mut self) -> Self {
        self.image = true;
        self
    }

    /// Tag with an archetype and action
    pub fn with_group(mut self, archetype: impl Into<String>, action: impl Into<String>) -> Self {
        self.group = Some(Group {
            archetype: archetype.into(),
            action: action.into(),
        });
        self
    }

    /// Set the header color
    pub fn with_color(mut self, color: [u8; 3]) -> Self {
        self.color = color;
        self
    }
}

/// Registry-owned view of a kind with name→index lookups built upfront
#[derive(Debug, Clone)]
pub struct KindDescriptor {
    id: String,
    name: String,
    inputs: IndexMap<String, PortDecl>,
    outputs: IndexMap<String, PortDecl>,
    params: IndexMap<String, ParamDecl>,
    image: bool,
    group: Option<Group>,
    color: [u8; 3],
}

impl KindDescriptor {
    fn from_decl(decl: KindDecl) -> std::result::Result<Self, SchemaError> {
        let inputs = index_unique(&decl.id, "input", decl.inputs, |p| &p.name)?;
        let outputs = index_unique(&decl.id, "output", decl.outputs, |p| &p.name)?;
        let params = index_unique(&decl.id, "param", decl.params, |p| &p.name)?;

        Ok(Self {
            id: decl.id,
            name: decl.name,
            inputs,
            outputs,
            params,
            image: decl.image,
            group: decl.group,
            color: decl.color,
        })
    }

    /// Kind name
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Inputs in declaration order
    pub fn inputs(&self) -> impl ExactSizeIterator<Item = &PortDecl> {
        self.inputs.values()
    }

    /// Outputs in declaration order
    pub fn outputs(&self) -> impl ExactSizeIterator<Item = &PortDecl> {
        self.outputs.values()
    }

    /// Params in declaration order
    pub fn params(&self) -> impl ExactSizeIterator<Item = &ParamDecl> {
        self.params.values()
    }

    /// Index of an input in declaration order
    pub fn input_index(&self, name: &str) -> Option<usize> {
        self.inputs.get_index_of(name)
    }

    /// Index of an output in declaration order
    pub fn output_index(&self, name: &str) -> Option<usize> {
        self.outputs.get_index_of(name)
    }

    /// Index of a param in declaration order
    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.params.get_index_of(name)
    }

    /// Whether the kind declares this input
    pub fn has_input(&self, name: &str) -> bool {
        self.inputs.contains_key(name)
    }

    /// Whether the kind declares this output
    pub fn has_output(&self, name: &str) -> bool {
        self.outputs.contains_key(name)
    }

    /// Whether the kind declares this param
    pub fn has_param(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Number of inputs
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Number of outputs
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Number of params
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Whether the node shows an image
    pub fn image(&self) -> bool {
        self.image
    }

    /// Variant tag, if any
    pub fn group(&self) -> Option<&Group> {
        self.group.as_ref()
    }

    /// Header color as raw RGB
    pub fn color(&self) -> [u8; 3] {
        self.color
    }

    /// Header color for egui painters
    pub fn color32(&self) -> egui::Color32 {
        let [r, g, b] = self.color;
        egui::Color32::from_rgb(r, g, b)
    }

    /// Input port, failing with `InvalidPort`
    pub fn require_input(&self, name: &str) -> Result<usize> {
        self.input_index(name).ok_or_else(|| self.invalid_port(name))
    }

    /// Output port, failing with `InvalidPort`
    pub fn require_output(&self, name: &str) -> Result<usize> {
        self.output_index(name).ok_or_else(|| self.invalid_port(name))
    }

    fn invalid_port(&self, name: &str) -> GraphError {
        GraphError::InvalidPort {
            kind: self.id.clone(),
            port: name.to_string(),
        }
    }
}

fn index_unique<T>(
    kind: &str,
    section: &'static str,
    items: Vec<T>,
    name: impl Fn(&T) -> &String,
) -> std::result::Result<IndexMap<String, T>, SchemaError> {
    let mut map = IndexMap::with_capacity(items.len());
    for item in items {
        let key = name(&item).clone();
        if map.contains_key(&key) {
            return Err(SchemaError::DuplicateName {
                kind: kind.to_string(),
                section,
                name: key,
            });
        }
        map.insert(key, item);
    }
    Ok(map)
}

/// Registry of available node kinds
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    kinds: IndexMap<String, KindDescriptor>,
}

impl SchemaRegistry {
    /// Build the registry from host declarations
    pub fn new(decls: impl IntoIterator<Item = KindDecl>) -> std::result::Result<Self, SchemaError> {
        let mut kinds = IndexMap::new();
        for decl in decls {
            if kinds.contains_key(&decl.id) {
                return Err(SchemaError::DuplicateKind(decl.id));
            }
            let kind = KindDescriptor::from_decl(decl)?;
            kinds.insert(kind.id.clone(), kind);
        }
        tracing::debug!("Schema registry built with {} kinds", kinds.len());
        Ok(Self { kinds })
    }

    /// Build the registry from a RON list of declarations
    pub fn from_ron(text: &str) -> std::result::Result<Self, SchemaError> {
        let decls: Vec<KindDecl> = ron::from_str(text)?;
        Self::new(decls)
    }

    /// Get a kind by name
    pub fn get(&self, kind: &str) -> Option<&KindDescriptor> {
        self.kinds.get(kind)
    }

    /// Get a kind by name, failing with `UnknownKind`
    pub fn kind(&self, kind: &str) -> Result<&KindDescriptor> {
        self.get(kind)
            .ok_or_else(|| GraphError::UnknownKind(kind.to_string()))
    }

    /// Whether the kind is declared
    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains_key(kind)
    }

    /// All kinds in declaration order
    pub fn kinds(&self) -> impl Iterator<Item = &KindDescriptor> {
        self.kinds.values()
    }

    /// Number of kinds
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    /// Whether no kinds are declared
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// Resolve the single kind tagged with `archetype`/`action`
    pub fn resolve(&self, archetype: &str, action: &str) -> Result<&KindDescriptor> {
        let mut matches = self.kinds.values().filter(|kind| {
            kind.group
                .as_ref()
                .is_some_and(|g| g.archetype == archetype && g.action == action)
        });

        match (matches.next(), matches.next()) {
            (Some(kind), None) => Ok(kind),
            (Some(_), Some(_)) => Err(GraphError::AmbiguousArchetype {
                archetype: archetype.to_string(),
                action: action.to_string(),
            }),
            (None, _) => Err(GraphError::UnknownArchetype {
                archetype: archetype.to_string(),
                action: action.to_string(),
            }),
        }
    }

    /// Actions offered for an archetype, in declaration order
    pub fn variants<'a>(&'a self, archetype: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.kinds
            .values()
            .filter_map(|kind| kind.group.as_ref())
            .filter(move |g| g.archetype == archetype)
            .map(|g| g.action.as_str())
    }
}
