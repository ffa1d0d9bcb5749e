//! Calibration-block model.
//!
//! A block is a named grouping of per-data-type selections. Each selection
//! carries configuration overrides and a fully expanded visit list; range
//! tokens are expanded in place so downstream code only ever sees explicit
//! visits.

use crate::visits::{Visit, VisitToken, expand_token};
use anyhow::Context;
use indexmap::IndexMap;
use log::warn;
use serde::Deserialize;

/// Raw per-data-type fragment as it appears under a block in the document.
/// All four fields are optional; singular and plural may both be present.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTypeEntry {
    #[serde(default)]
    pub config: Option<String>,

    #[serde(default)]
    pub configs: Option<Vec<String>>,

    #[serde(default)]
    pub visit: Option<VisitToken>,

    #[serde(default)]
    pub visits: Option<Vec<VisitToken>>,
}

/// Raw block shape: data-type name -> fragment, in declaration order.
pub type RawBlock = IndexMap<String, RawTypeEntry>;

/// One data type's selection within a block, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSelection {
    pub configs: Vec<String>,
    pub visits: Vec<Visit>,
}

/// A named grouping of per-data-type visit/configuration selections.
#[derive(Debug, Clone)]
pub struct CalibBlock {
    pub name: String,
    pub data: IndexMap<String, TypeSelection>,
}

impl CalibBlock {
    /// Build a block from its document fragment.
    ///
    /// Data-type keys outside `data_types` are dropped with a warning.
    /// Configs are collected singular-then-plural; visits likewise, with
    /// every string token expanded. Nothing is deduped or sorted.
    pub fn from_raw(name: &str, raw: &RawBlock, data_types: &[String]) -> anyhow::Result<CalibBlock> {
        let mut data = IndexMap::new();

        for (dt, entry) in raw {
            if !data_types.iter().any(|known| known == dt) {
                warn!(
                    "saw unknown dataType \"{}\" in block {} (expected {})",
                    dt,
                    name,
                    data_types.join(", ")
                );
                continue;
            }

            let mut configs = Vec::new();
            if let Some(c) = &entry.config {
                configs.push(c.clone());
            }
            if let Some(cs) = &entry.configs {
                configs.extend(cs.iter().cloned());
            }

            let mut visits = Vec::new();
            if let Some(v) = &entry.visit {
                visits.extend(
                    expand_token(v)
                        .with_context(|| format!("block {}, dataType {}", name, dt))?,
                );
            }
            if let Some(vs) = &entry.visits {
                for v in vs {
                    visits.extend(
                        expand_token(v)
                            .with_context(|| format!("block {}, dataType {}", name, dt))?,
                    );
                }
            }

            data.insert(dt.clone(), TypeSelection { configs, visits });
        }

        Ok(CalibBlock {
            name: name.to_string(),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn recognized() -> Vec<String> {
        vec!["bias".into(), "dark".into(), "flat".into(), "fiberTrace".into()]
    }

    #[test]
    fn singular_then_plural_visits_concatenate() {
        let raw: RawBlock = serde_yaml::from_str(
            r#"
bias:
  visit: 7
  visits: ["1..3", 20]
"#,
        )
        .unwrap();

        let block = CalibBlock::from_raw("b1", &raw, &recognized()).unwrap();
        let sel = &block.data["bias"];
        let want: Vec<Visit> = [7, 1, 2, 3, 20].iter().map(|&n| Visit::Id(n)).collect();
        assert_eq!(sel.visits, want);
    }

    #[test]
    fn config_order_is_singular_then_plural() {
        let raw: RawBlock = serde_yaml::from_str(
            r#"
flat:
  config: isr.doDark=False
  configs: ["isr.doBias=True", "repair.doCosmicRay=False"]
  visits: [100]
"#,
        )
        .unwrap();

        let block = CalibBlock::from_raw("b1", &raw, &recognized()).unwrap();
        assert_eq!(
            block.data["flat"].configs,
            vec![
                "isr.doDark=False".to_string(),
                "isr.doBias=True".to_string(),
                "repair.doCosmicRay=False".to_string(),
            ]
        );
    }

    #[test]
    fn unknown_data_type_is_dropped() {
        let raw: RawBlock = serde_yaml::from_str(
            r#"
bias:
  visits: [1, 2]
arc:
  visits: [3]
"#,
        )
        .unwrap();

        let block = CalibBlock::from_raw("b1", &raw, &recognized()).unwrap();
        assert!(block.data.contains_key("bias"));
        assert!(!block.data.contains_key("arc"));
    }

    #[test]
    fn missing_fields_give_empty_lists() {
        let raw: RawBlock = serde_yaml::from_str("dark: {}\n").unwrap();
        let block = CalibBlock::from_raw("b1", &raw, &recognized()).unwrap();
        assert_eq!(block.data["dark"].configs, Vec::<String>::new());
        assert_eq!(block.data["dark"].visits, Vec::<Visit>::new());
    }

    #[test]
    fn bad_range_token_fails_construction() {
        let raw: RawBlock = serde_yaml::from_str("bias: {visits: [\"1..x\"]}\n").unwrap();
        assert!(CalibBlock::from_raw("b1", &raw, &recognized()).is_err());
    }
}
