//! JSON interchange for trees, enabled by the `tree-json` feature.
//!
//! A node is written as `{"type": kind, "attributes": {...}, "children": [...]}`
//! with empty attribute maps and child lists left out.

use serde::{Deserialize, Serialize};

use super::{Attributes, NodeId, NodeKind, Tree};

#[derive(Debug, Serialize, Deserialize)]
struct JsonNode {
    #[serde(rename = "type")]
    kind: NodeKind,
    #[serde(default, skip_serializing_if = "Attributes::is_empty")]
    attributes: Attributes,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<JsonNode>,
}

impl Tree {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.to_json_node(self.root()))
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_json_node(self.root()))
    }

    /// Reads a tree of any nesting depth; deep input grows the stack on the
    /// heap instead of hitting `serde_json`'s recursion limit.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut deserializer = serde_json::Deserializer::from_str(json);
        deserializer.disable_recursion_limit();
        let root = JsonNode::deserialize(serde_stacker::Deserializer::new(&mut deserializer))?;
        deserializer.end()?;

        let mut tree = Tree::new(root.kind);
        let root_id = tree.root();
        tree.fill_from_json(root_id, root);
        Ok(tree)
    }

    fn to_json_node(&self, id: NodeId) -> JsonNode {
        let node = self.node(id);
        JsonNode {
            kind: node.kind,
            attributes: node.attributes.clone(),
            children: node
                .children()
                .iter()
                .map(|&child| self.to_json_node(child))
                .collect(),
        }
    }

    fn fill_from_json(&mut self, id: NodeId, json: JsonNode) {
        let mut pending = vec![(id, json)];
        while let Some((id, json)) = pending.pop() {
            self.node_mut(id).attributes = json.attributes;
            for child in json.children {
                let child_id = self.create(child.kind);
                self.append_child(id, child_id);
                pending.push((child_id, child));
            }
        }
    }
}
