//! Document layer: YAML schema + validated in-memory structures.
//!
//! We keep two representations:
//! - SpecDoc: raw YAML input (serde-friendly)
//! - Document: validated, immutable parse result with built blocks

use crate::spec::block::{CalibBlock, RawBlock};
use anyhow::Context;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Raw document shape. `dataTypes` and `calibBlocks` are required; the
/// bootstrap section is only needed when bootstrap processing is requested.
#[derive(Debug, Clone, Deserialize)]
pub struct SpecDoc {
    #[serde(rename = "dataTypes")]
    pub data_types: Vec<String>,

    #[serde(default)]
    pub bootstrap: Option<BootstrapSpec>,

    #[serde(rename = "calibBlocks")]
    pub calib_blocks: IndexMap<String, RawBlock>,
}

/// Bootstrap descriptor: where the seed detector maps live and how their
/// per-arm filenames are formed (`detectorMapFmt` carries one `%s` for the
/// arm; its shape is validated by the bootstrap consumer, not here).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BootstrapSpec {
    #[serde(rename = "dirName")]
    pub dir_name: String,

    pub arms: Vec<String>,

    #[serde(rename = "detectorMapFmt")]
    pub detector_map_fmt: String,
}

/// Validated parse result. Built once at load time, read-only thereafter.
#[derive(Debug, Clone)]
pub struct Document {
    pub data_types: Vec<String>,
    pub bootstrap: Option<BootstrapSpec>,
    pub blocks: IndexMap<String, CalibBlock>,
}

impl SpecDoc {
    /// Build every block, threading the recognized data-type list through
    /// construction. Block order follows the document.
    pub fn validate_and_build(&self) -> anyhow::Result<Document> {
        let mut blocks = IndexMap::new();
        for (block_name, raw) in &self.calib_blocks {
            let block = CalibBlock::from_raw(block_name, raw, &self.data_types)?;
            blocks.insert(block_name.clone(), block);
        }

        Ok(Document {
            data_types: self.data_types.clone(),
            bootstrap: self.bootstrap.clone(),
            blocks,
        })
    }
}

/// Read and validate a specification file.
pub fn load_spec_file(path: &Path) -> anyhow::Result<Document> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read spec file {}", path.display()))?;
    let doc: SpecDoc = serde_yaml::from_str(&text)
        .with_context(|| format!("parse spec file {}", path.display()))?;
    doc.validate_and_build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visits::Visit;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SPEC: &str = r#"
dataTypes: [bias, dark, flat, fiberTrace]
bootstrap:
  dirName: bootstrapCalibs
  arms: [b1, r1]
  detectorMapFmt: detectorMap-sim-%s.fits
calibBlocks:
  week1:
    bias:
      visits: ["12..15"]
    dark:
      config: isr.doBias=True
      visits: [20, "22..26:2"]
  week2:
    flat:
      visits: [30]
"#;

    #[test]
    fn loads_full_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SPEC.as_bytes()).unwrap();

        let doc = load_spec_file(file.path()).unwrap();
        assert_eq!(doc.data_types, vec!["bias", "dark", "flat", "fiberTrace"]);
        assert_eq!(
            doc.bootstrap,
            Some(BootstrapSpec {
                dir_name: "bootstrapCalibs".into(),
                arms: vec!["b1".into(), "r1".into()],
                detector_map_fmt: "detectorMap-sim-%s.fits".into(),
            })
        );

        // Declaration order is preserved.
        let names: Vec<&String> = doc.blocks.keys().collect();
        assert_eq!(names, vec!["week1", "week2"]);

        let dark: Vec<Visit> = [20, 22, 24, 26].iter().map(|&n| Visit::Id(n)).collect();
        assert_eq!(doc.blocks["week1"].data["dark"].visits, dark);
    }

    #[test]
    fn bootstrap_section_is_optional() {
        let doc: SpecDoc = serde_yaml::from_str(
            "dataTypes: [bias]\ncalibBlocks:\n  b:\n    bias: {visits: [1]}\n",
        )
        .unwrap();
        let doc = doc.validate_and_build().unwrap();
        assert_eq!(doc.bootstrap, None);
    }

    #[test]
    fn missing_top_level_key_is_fatal() {
        let err = serde_yaml::from_str::<SpecDoc>("dataTypes: [bias]\n");
        assert!(err.is_err());
        let err = serde_yaml::from_str::<SpecDoc>("calibBlocks: {}\n");
        assert!(err.is_err());
    }
}
