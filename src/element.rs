//! Design element trees as handed over by the canvas editor.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;

use crate::error::{BrandError, Result};
use crate::input::{read_input, InputFormat};

/// Headroom left before a nested (de)serialization call switches to a fresh stack segment.
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_SEGMENT: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Per-kind attributes. Only text carries typography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    #[serde(rename_all = "camelCase")]
    Text {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_family: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        font_size: Option<f32>,
    },
    Shape,
    Image,
    Group,
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Text { .. } => "text",
            ElementKind::Shape => "shape",
            ElementKind::Image => "image",
            ElementKind::Group => "group",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One canvas node. Clone, drop and (de)serialization never recurse on the
/// call stack, so trees of any depth are safe to handle.
#[derive(Debug, PartialEq)]
pub struct DesignElement {
    pub id: String,
    pub kind: ElementKind,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub position: Option<Position>,
    pub children: Vec<DesignElement>,
}

/// Wire shape used when reading an element.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ElementFields {
    id: String,
    #[serde(flatten)]
    kind: ElementKind,
    #[serde(default)]
    fill: Option<String>,
    #[serde(default)]
    stroke: Option<String>,
    #[serde(default)]
    position: Option<Position>,
    #[serde(default)]
    children: Vec<DesignElement>,
}

/// Wire shape used when writing an element.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ElementFieldsRef<'a> {
    id: &'a str,
    #[serde(flatten)]
    kind: &'a ElementKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    fill: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stroke: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<Position>,
    #[serde(skip_serializing_if = "no_children")]
    children: &'a [DesignElement],
}

fn no_children(children: &&[DesignElement]) -> bool {
    children.is_empty()
}

impl Serialize for DesignElement {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let fields = ElementFieldsRef {
            id: &self.id,
            kind: &self.kind,
            fill: self.fill.as_deref(),
            stroke: self.stroke.as_deref(),
            position: self.position,
            children: &self.children,
        };
        stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || fields.serialize(serializer))
    }
}

impl<'de> Deserialize<'de> for DesignElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let fields = stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || {
            ElementFields::deserialize(deserializer)
        })?;
        Ok(Self {
            id: fields.id,
            kind: fields.kind,
            fill: fields.fill,
            stroke: fields.stroke,
            position: fields.position,
            children: fields.children,
        })
    }
}

impl Clone for DesignElement {
    fn clone(&self) -> Self {
        struct Frame<'a> {
            source: &'a DesignElement,
            copy: DesignElement,
            next: usize,
        }

        let mut stack = vec![Frame {
            source: self,
            copy: self.clone_node(),
            next: 0,
        }];
        let mut root = None;
        while let Some(frame) = stack.last_mut() {
            let source = frame.source;
            if let Some(child) = source.children.get(frame.next) {
                frame.next += 1;
                stack.push(Frame {
                    source: child,
                    copy: child.clone_node(),
                    next: 0,
                });
                continue;
            }
            if let Some(done) = stack.pop() {
                match stack.last_mut() {
                    Some(parent) => parent.copy.children.push(done.copy),
                    None => root = Some(done.copy),
                }
            }
        }
        root.unwrap_or_else(|| self.clone_node())
    }
}

impl Drop for DesignElement {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl DesignElement {
    pub fn new(id: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: id.into(),
            kind,
            fill: None,
            stroke: None,
            position: None,
            children: Vec::new(),
        }
    }

    pub fn text(id: impl Into<String>, font_family: impl Into<String>, font_size: f32) -> Self {
        Self::new(
            id,
            ElementKind::Text {
                font_family: Some(font_family.into()),
                font_size: Some(font_size),
            },
        )
    }

    pub fn shape(id: impl Into<String>) -> Self {
        Self::new(id, ElementKind::Shape)
    }

    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    pub fn with_stroke(mut self, stroke: impl Into<String>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position { x, y });
        self
    }

    pub fn with_children(mut self, children: Vec<DesignElement>) -> Self {
        self.children = children;
        self
    }

    pub fn font_family(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Text { font_family, .. } => font_family.as_deref(),
            _ => None,
        }
    }

    pub fn font_size(&self) -> Option<f32> {
        match &self.kind {
            ElementKind::Text { font_size, .. } => *font_size,
            _ => None,
        }
    }

    /// Copy of this node without its children.
    fn clone_node(&self) -> Self {
        Self {
            id: self.id.clone(),
            kind: self.kind.clone(),
            fill: self.fill.clone(),
            stroke: self.stroke.clone(),
            position: self.position,
            children: Vec::with_capacity(self.children.len()),
        }
    }

    /// Pre-order traversal of this node and its descendants.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }
}

/// Pre-order iterator over a forest. Uses an explicit stack, so depth is unbounded.
pub struct PreOrder<'a> {
    stack: Vec<&'a DesignElement>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a DesignElement;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

pub fn walk(forest: &[DesignElement]) -> PreOrder<'_> {
    PreOrder {
        stack: forest.iter().rev().collect(),
    }
}

pub fn count_nodes(forest: &[DesignElement]) -> usize {
    walk(forest).count()
}

/// A design file holds either a forest (`[...]`) or a single root element.
fn is_single_json_root(content: &str) -> bool {
    content.trim_start().starts_with('{')
}

fn is_single_yaml_root(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#') && *line != "---")
        .is_some_and(|line| !line.starts_with('-') && !line.starts_with('['))
}

pub fn parse_design_json(content: &str) -> Result<Vec<DesignElement>> {
    let mut de = serde_json::Deserializer::from_str(content);
    de.disable_recursion_limit();
    let forest = if is_single_json_root(content) {
        vec![DesignElement::deserialize(&mut de)?]
    } else {
        Vec::<DesignElement>::deserialize(&mut de)?
    };
    de.end()?;
    Ok(forest)
}

/// serde_yaml caps nesting at 128 collections, which is 64 element levels.
pub fn parse_design_yaml(content: &str) -> Result<Vec<DesignElement>> {
    let parsed = if is_single_yaml_root(content) {
        serde_yaml::from_str::<DesignElement>(content).map(|root| vec![root])
    } else {
        serde_yaml::from_str::<Vec<DesignElement>>(content)
    };
    parsed.map_err(|err| {
        if err.to_string().contains("recursion limit exceeded") {
            BrandError::Config(format!(
                "YAML design nests deeper than 64 elements ({err}). Hint: save the design as JSON, which has no depth limit."
            ))
        } else {
            BrandError::Yaml(err)
        }
    })
}

/// Loads a design from `.json`, `.yaml` or `.yml`.
pub fn load_design(path: &Path) -> Result<Vec<DesignElement>> {
    let format = InputFormat::from_path(path)?;
    let content = read_input(path)?;
    match format {
        InputFormat::Json => parse_design_json(&content),
        InputFormat::Yaml => parse_design_yaml(&content),
    }
}

/// Writes a design as pretty JSON.
pub fn save_design(path: &Path, forest: &[DesignElement]) -> Result<()> {
    let content = serde_json::to_string_pretty(forest)?;
    std::fs::write(path, content).map_err(BrandError::Io)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_forest() -> Vec<DesignElement> {
        vec![
            DesignElement::new("frame", ElementKind::Group).with_children(vec![
                DesignElement::shape("card")
                    .with_fill("#ffffff")
                    .with_children(vec![DesignElement::text("title", "Poppins", 32.0)]),
                DesignElement::new("logo", ElementKind::Image),
            ]),
            DesignElement::shape("footer"),
        ]
    }

    #[test]
    fn walk_visits_every_node_in_pre_order() {
        let forest = sample_forest();
        let ids: Vec<&str> = walk(&forest).map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["frame", "card", "title", "logo", "footer"]);
        assert_eq!(count_nodes(&forest), 5);
        assert_eq!(count_nodes(&[]), 0);
    }

    #[test]
    fn walk_handles_very_deep_trees() {
        let mut node = DesignElement::shape("leaf");
        for depth in 0..50_000 {
            node = DesignElement::new(format!("g{depth}"), ElementKind::Group)
                .with_children(vec![node]);
        }
        assert_eq!(node.iter().count(), 50_001);

        let copy = node.clone();
        drop(node);
        assert_eq!(copy.iter().count(), 50_001);
        assert_eq!(copy.iter().last().map(|e| e.id.as_str()), Some("leaf"));
    }

    fn nested_groups_json(depth: usize) -> String {
        let mut json = String::new();
        for level in 0..depth {
            json.push_str(&format!(r#"{{"id":"g{level}","type":"group","children":["#));
        }
        json.push_str(r##"{"id":"leaf","type":"shape","fill":"#ff0000"}"##);
        for _ in 0..depth {
            json.push_str("]}");
        }
        json
    }

    #[test]
    fn deeply_nested_json_design_loads() {
        let forest = parse_design_json(&nested_groups_json(5_000)).unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(count_nodes(&forest), 5_001);
        let leaf = walk(&forest).last().unwrap();
        assert_eq!(leaf.fill.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn deeply_nested_design_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deep.json");
        let forest = parse_design_json(&nested_groups_json(2_000)).unwrap();

        save_design(&path, &forest).unwrap();
        let reloaded = load_design(&path).unwrap();
        assert_eq!(count_nodes(&reloaded), 2_001);
    }

    #[test]
    fn yaml_beyond_parser_depth_points_to_json() {
        let shallow = format!("{}\n", nested_groups_json(40));
        assert_eq!(count_nodes(&parse_design_yaml(&shallow).unwrap()), 41);

        let err = parse_design_yaml(&nested_groups_json(100)).unwrap_err();
        match err {
            BrandError::Config(msg) => assert!(msg.contains("save the design as JSON"), "{msg}"),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn font_accessors_only_apply_to_text() {
        let text = DesignElement::text("t", "Inter", 14.0);
        assert_eq!(text.font_family(), Some("Inter"));
        assert_eq!(text.font_size(), Some(14.0));

        let shape = DesignElement::shape("s");
        assert_eq!(shape.font_family(), None);
        assert_eq!(shape.font_size(), None);
    }

    #[test]
    fn parses_tagged_json_elements() {
        let json = r##"[
            {
                "id": "root",
                "type": "group",
                "children": [
                    {"id": "h1", "type": "text", "fontFamily": "Arial", "fontSize": 28, "fill": "#111827"},
                    {"id": "box", "type": "shape", "fill": "#FF0000", "stroke": "#000000", "position": {"x": 12, "y": 16}}
                ]
            }
        ]"##;
        let forest = parse_design_json(json).unwrap();
        assert_eq!(count_nodes(&forest), 3);
        let h1 = &forest[0].children[0];
        assert_eq!(h1.font_family(), Some("Arial"));
        assert_eq!(h1.font_size(), Some(28.0));
        let shape = &forest[0].children[1];
        assert_eq!(shape.kind, ElementKind::Shape);
        assert_eq!(shape.position, Some(Position { x: 12.0, y: 16.0 }));
    }

    #[test]
    fn single_object_is_a_one_tree_forest() {
        let forest = parse_design_json(r#"{"id": "solo", "type": "image"}"#).unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].kind, ElementKind::Image);
    }

    #[test]
    fn parses_yaml_design() {
        let yaml = r##"
- id: hero
  type: text
  fontFamily: Inter
  fontSize: 16
  fill: "#111827"
- id: bg
  type: shape
  fill: "#ffffff"
"##;
        let forest = parse_design_yaml(yaml).unwrap();
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].kind.name(), "text");
    }

    #[test]
    fn save_then_load_design_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("design.json");
        let forest = sample_forest();
        save_design(&path, &forest).unwrap();
        assert_eq!(load_design(&path).unwrap(), forest);
    }

    #[test]
    fn unknown_element_type_is_rejected() {
        assert!(parse_design_json(r#"[{"id": "x", "type": "video"}]"#).is_err());
    }

    #[test]
    fn malformed_element_errors_keep_their_location() {
        let err = parse_design_json("[\n  {\"id\": \"x\", \"type\": \"video\"}\n]").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("video"), "{msg}");
        assert!(msg.contains("line 2"), "{msg}");

        let err = parse_design_json(r#"{"id": "x", "type": "shape", "fill": 7}"#).unwrap_err();
        assert!(err.to_string().contains("column"), "{err}");

        let err = parse_design_yaml("- id: x\n  type: video\n").unwrap_err();
        assert!(err.to_string().contains("video"), "{err}");
        assert!(!err.to_string().contains("untagged"), "{err}");
    }

    #[test]
    fn single_yaml_root_is_a_one_tree_forest() {
        let yaml = "# hero banner\n---\nid: hero\ntype: shape\nfill: \"#ffffff\"\n";
        let forest = parse_design_yaml(yaml).unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, "hero");
    }
}
