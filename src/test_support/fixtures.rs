//! Preset fixtures.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::core::preset::PresetRecord;

/// Minimal preset markup with no switches or params.
pub fn preset_xml(name: &str, platform: &str, compiler: &str) -> String {
    PresetFixture::new(name, platform, compiler).to_xml()
}

/// Builder for preset files.
#[derive(Debug, Clone)]
pub struct PresetFixture {
    pub name: String,
    pub comment: String,
    pub platform: String,
    pub compiler: String,
    pub switches: Vec<(String, String)>,
    pub params: Vec<(String, String)>,
}

impl PresetFixture {
    pub fn new(name: &str, platform: &str, compiler: &str) -> Self {
        PresetFixture {
            name: name.to_string(),
            comment: format!("{} settings", name),
            platform: platform.to_string(),
            compiler: compiler.to_string(),
            switches: Vec::new(),
            params: Vec::new(),
        }
    }

    pub fn switch(mut self, name: &str, value: &str) -> Self {
        self.switches.push((name.to_string(), value.to_string()));
        self
    }

    pub fn param(mut self, name: &str, value: &str) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        writeln!(xml, r#"<?xml version="1.0" encoding="utf-8"?>"#).unwrap();
        writeln!(xml, r#"<preset name="{}" comment="{}">"#, self.name, self.comment).unwrap();
        writeln!(
            xml,
            r#"  <platform targetPlatform="{}" compiler="{}" />"#,
            self.platform, self.compiler
        )
        .unwrap();
        writeln!(xml, "  <CMakeSwitches>").unwrap();
        for (name, value) in &self.switches {
            writeln!(xml, r#"    <cmakeSwitch name="{}" value="{}" />"#, name, value).unwrap();
        }
        writeln!(xml, "  </CMakeSwitches>").unwrap();
        writeln!(xml, "  <CMakeParams>").unwrap();
        for (name, value) in &self.params {
            writeln!(xml, r#"    <cmakeParam name="{}" value="{}" />"#, name, value).unwrap();
        }
        writeln!(xml, "  </CMakeParams>").unwrap();
        writeln!(xml, "</preset>").unwrap();
        xml
    }

    /// Parse the fixture as if read from `<name>.xml`.
    pub fn parse(&self) -> PresetRecord {
        PresetRecord::parse(&self.to_xml(), Path::new(&format!("{}.xml", self.name))).unwrap()
    }

    /// Write `<dir>/<name>.xml`, creating `dir`.
    pub fn write_to(&self, dir: &Path) -> PathBuf {
        std::fs::create_dir_all(dir).unwrap();
        let path = dir.join(format!("{}.xml", self.name));
        std::fs::write(&path, self.to_xml()).unwrap();
        path
    }
}
