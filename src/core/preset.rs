//! Preset records and their XML markup.
//!
//! A preset file looks like:
//!
//! ```xml
//! <preset name="vc15win64" comment="VC15 Win64 PhysX general settings">
//!   <platform targetPlatform="win64" compiler="vc15" />
//!   <CMakeSwitches>
//!     <cmakeSwitch name="PX_BUILDSNIPPETS" value="True" comment="Generate the snippets" />
//!   </CMakeSwitches>
//!   <CMakeParams>
//!     <cmakeParam name="CMAKE_INSTALL_PREFIX" value="install/vc15win64/PhysX" />
//!   </CMakeParams>
//! </preset>
//! ```

use std::path::{Path, PathBuf};

use anyhow::Result;
use roxmltree::{Document, Node};

use crate::core::errors::GenerateError;
use crate::core::platform::{Compiler, TargetPlatform};
use crate::util::diagnostic::PresetSyntaxError;
use crate::util::fs::read_to_string;

/// A boolean-ish toggle passed to CMake as a definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CMakeSwitch {
    pub name: String,
    pub value: String,
}

/// A free-form CMake definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CMakeParam {
    pub name: String,
    pub value: String,
}

/// A parsed preset. Switches and params keep their declaration order.
#[derive(Debug, Clone)]
pub struct PresetRecord {
    name: String,
    comment: Option<String>,
    target_platform: TargetPlatform,
    compiler: Compiler,
    switches: Vec<CMakeSwitch>,
    params: Vec<CMakeParam>,
    path: PathBuf,
}

impl PresetRecord {
    /// Load and parse a preset file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)?;
        Ok(Self::parse(&contents, path)?)
    }

    /// Parse preset markup. `path` is used for error reporting.
    pub fn parse(src: &str, path: &Path) -> Result<Self, GenerateError> {
        let syntax = |message: String| PresetSyntaxError::new(message, path, src);

        let doc = Document::parse(src).map_err(|e| {
            let pos = e.pos();
            let offset = offset_of(src, pos.row, pos.col);
            syntax(format!("malformed preset markup: {}", e)).with_span(offset..offset)
        })?;

        let root = doc.root_element();
        let name = required_attr(root, "name", &syntax)?.to_string();
        let comment = root.attribute("comment").map(str::to_string);

        let platforms: Vec<Node> = root
            .children()
            .filter(|n| n.has_tag_name("platform"))
            .collect();
        let platform = match platforms.as_slice() {
            [platform] => *platform,
            [] => {
                return Err(syntax(format!("preset `{}` has no <platform> element", name))
                    .with_span(root.range())
                    .with_help("Add <platform targetPlatform=\"...\" compiler=\"...\" />")
                    .into())
            }
            [_, second, ..] => {
                return Err(syntax(format!(
                    "preset `{}` declares {} <platform> elements, expected exactly one",
                    name,
                    platforms.len()
                ))
                .with_span(second.range())
                .into())
            }
        };

        let platform_id = required_attr(platform, "targetPlatform", &syntax)?;
        let target_platform = platform_id.parse::<TargetPlatform>().map_err(|_| {
            GenerateError::UnsupportedPlatform {
                preset: name.clone(),
                platform: platform_id.to_string(),
            }
        })?;
        let compiler = Compiler::from(required_attr(platform, "compiler", &syntax)?);

        tracing::info!(
            "Target platform: {} using compiler: {}",
            target_platform,
            compiler
        );

        let switches = entries(root, "CMakeSwitches", &syntax)?
            .into_iter()
            .map(|(name, value)| CMakeSwitch { name, value })
            .collect();
        let params = entries(root, "CMakeParams", &syntax)?
            .into_iter()
            .map(|(name, value)| CMakeParam { name, value })
            .collect();

        Ok(PresetRecord {
            name,
            comment,
            target_platform,
            compiler,
            switches,
            params,
            path: path.to_path_buf(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn target_platform(&self) -> TargetPlatform {
        self.target_platform
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    pub fn switches(&self) -> &[CMakeSwitch] {
        &self.switches
    }

    pub fn params(&self) -> &[CMakeParam] {
        &self.params
    }

    /// File the preset was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn required_attr<'a, F>(node: Node<'a, '_>, attr: &str, syntax: &F) -> Result<&'a str, PresetSyntaxError>
where
    F: Fn(String) -> PresetSyntaxError,
{
    node.attribute(attr).ok_or_else(|| {
        syntax(format!(
            "<{}> is missing the `{}` attribute",
            node.tag_name().name(),
            attr
        ))
        .with_span(node.range())
    })
}

/// `(name, value)` pairs of every element under the `collection` child.
/// An absent collection yields nothing.
fn entries<F>(root: Node, collection: &str, syntax: &F) -> Result<Vec<(String, String)>, PresetSyntaxError>
where
    F: Fn(String) -> PresetSyntaxError,
{
    let Some(parent) = root.children().find(|n| n.has_tag_name(collection)) else {
        return Ok(Vec::new());
    };

    parent
        .children()
        .filter(Node::is_element)
        .map(|entry| {
            let name = required_attr(entry, "name", syntax)?;
            let value = required_attr(entry, "value", syntax)?;
            Ok((name.to_string(), value.to_string()))
        })
        .collect()
}

/// Byte offset of a 1-based row/column position.
fn offset_of(src: &str, row: u32, col: u32) -> usize {
    let line_start: usize = src
        .split_inclusive('\n')
        .take(row.saturating_sub(1) as usize)
        .map(str::len)
        .sum();
    (line_start + col.saturating_sub(1) as usize).min(src.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VC15_WIN64: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<preset name="vc15win64" comment="VC15 Win64 PhysX general settings">
  <platform targetPlatform="win64" compiler="vc15" />
  <CMakeSwitches>
    <cmakeSwitch name="PX_BUILDSNIPPETS" value="True" comment="Generate the snippets" />
    <cmakeSwitch name="PX_GENERATE_STATIC_LIBRARIES" value="False" />
  </CMakeSwitches>
  <CMakeParams>
    <cmakeParam name="CMAKE_INSTALL_PREFIX" value="install/vc15win64/PhysX" />
    <cmakeParam name="PX_OUTPUT_LIB_DIR" value="bin" />
  </CMakeParams>
</preset>
"#;

    #[test]
    fn test_parse_preset() {
        let preset = PresetRecord::parse(VC15_WIN64, Path::new("vc15win64.xml")).unwrap();

        assert_eq!(preset.name(), "vc15win64");
        assert_eq!(preset.comment(), Some("VC15 Win64 PhysX general settings"));
        assert_eq!(preset.target_platform(), TargetPlatform::Win64);
        assert_eq!(preset.compiler(), &Compiler::Vc15);

        let switches: Vec<_> = preset.switches().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(switches, ["PX_BUILDSNIPPETS", "PX_GENERATE_STATIC_LIBRARIES"]);
        assert_eq!(preset.params()[0].value, "install/vc15win64/PhysX");
        assert_eq!(preset.params()[1].name, "PX_OUTPUT_LIB_DIR");
    }

    #[test]
    fn test_missing_collections_are_empty() {
        let src = r#"<preset name="mac64"><platform targetPlatform="mac64" compiler="xcode"/></preset>"#;
        let preset = PresetRecord::parse(src, Path::new("mac64.xml")).unwrap();
        assert!(preset.switches().is_empty());
        assert!(preset.params().is_empty());
        assert_eq!(preset.comment(), None);
    }

    #[test]
    fn test_platform_must_appear_exactly_once() {
        let none = r#"<preset name="p"><CMakeSwitches/></preset>"#;
        let err = PresetRecord::parse(none, Path::new("p.xml")).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidPreset(_)));
        assert!(err.to_string().contains("no <platform> element"));

        let two = r#"<preset name="p">
  <platform targetPlatform="linux" compiler="clang"/>
  <platform targetPlatform="win64" compiler="vc15"/>
</preset>"#;
        let err = PresetRecord::parse(two, Path::new("p.xml")).unwrap_err();
        assert!(err.to_string().contains("declares 2 <platform> elements"));
    }

    #[test]
    fn test_unknown_platform_is_unsupported() {
        let src = r#"<preset name="amiga"><platform targetPlatform="amiga500" compiler="gcc"/></preset>"#;
        let err = PresetRecord::parse(src, Path::new("amiga.xml")).unwrap_err();
        match err {
            GenerateError::UnsupportedPlatform { preset, platform } => {
                assert_eq!(preset, "amiga");
                assert_eq!(platform, "amiga500");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_switch_missing_value_is_reported() {
        let src = r#"<preset name="p">
  <platform targetPlatform="linux" compiler="clang"/>
  <CMakeSwitches><cmakeSwitch name="PX_BUILDSNIPPETS"/></CMakeSwitches>
</preset>"#;
        let err = PresetRecord::parse(src, Path::new("p.xml")).unwrap_err();
        assert!(err.to_string().contains("<cmakeSwitch> is missing the `value` attribute"));
    }

    #[test]
    fn test_malformed_markup() {
        let err = PresetRecord::parse("<preset name=", Path::new("bad.xml")).unwrap_err();
        assert!(err.to_string().starts_with("malformed preset markup"));
    }

    #[test]
    fn test_offset_of() {
        let src = "ab\ncd\nef";
        assert_eq!(offset_of(src, 1, 1), 0);
        assert_eq!(offset_of(src, 2, 2), 4);
        assert_eq!(offset_of(src, 9, 9), src.len());
    }
}
