//! Gradient boosted tree ensemble evaluated natively from an XGBoost JSON dump.
//!
//! Expected per-tree shape (`Booster.get_dump(dump_format="json")`):
//! split nodes carry `split`, `split_condition`, `yes`, `no`, `missing` and
//! `children`; leaves carry `leaf`. Routing follows XGBoost: `x < split_condition`
//! goes to `yes`, NaN goes to `missing`, everything else to `no`.
//!
//! Inputs, split conditions, leaves and the margin sum are all f32, as in XGBoost.

use super::logistic::{check_threshold, sigmoid};
use crate::domain::errors::ChurnError;
use crate::domain::ml::feature_registry::{FeatureVector, feature_index};
use crate::domain::ports::ChurnClassifier;
use crate::domain::prediction::{ChurnLabel, PredictionResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_base_score() -> f64 {
    0.5
}

fn default_threshold() -> f64 {
    0.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeEnsembleArtifact {
    /// Initial prediction in probability space
    #[serde(default = "default_base_score")]
    pub base_score: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    pub trees: Vec<DumpNode>,
}

/// One node of a dumped tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DumpNode {
    Leaf {
        nodeid: u32,
        leaf: f64,
    },
    Split {
        nodeid: u32,
        split: String,
        split_condition: f64,
        yes: u32,
        no: u32,
        missing: u32,
        children: Vec<DumpNode>,
    },
}

impl DumpNode {
    fn id(&self) -> u32 {
        match self {
            DumpNode::Leaf { nodeid, .. } | DumpNode::Split { nodeid, .. } => *nodeid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Node {
    Leaf(f32),
    Split {
        feature: usize,
        threshold: f32,
        yes: usize,
        no: usize,
        missing: usize,
    },
}

/// A tree flattened into an arena; index 0 is the root
#[derive(Debug, Clone, PartialEq)]
struct CompiledTree {
    nodes: Vec<Node>,
}

impl CompiledTree {
    fn compile(root: &DumpNode) -> Result<Self, String> {
        let mut nodes = Vec::new();
        push_node(root, &mut nodes)?;
        Ok(Self { nodes })
    }

    fn leaf_value(&self, features: &FeatureVector) -> f32 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                Node::Leaf(value) => return value,
                Node::Split {
                    feature,
                    threshold,
                    yes,
                    no,
                    missing,
                } => {
                    let x = features[feature] as f32;
                    idx = if x.is_nan() {
                        missing
                    } else if x < threshold {
                        yes
                    } else {
                        no
                    };
                }
            }
        }
    }
}

/// Appends `node` and its subtree, returning the arena index of `node`.
/// Children always land after their parent, so traversal cannot loop.
fn push_node(node: &DumpNode, nodes: &mut Vec<Node>) -> Result<usize, String> {
    let idx = nodes.len();
    match node {
        DumpNode::Leaf { leaf, nodeid } => {
            let leaf = *leaf as f32;
            if !leaf.is_finite() {
                return Err(format!("leaf {} is not finite", nodeid));
            }
            nodes.push(Node::Leaf(leaf));
        }
        DumpNode::Split {
            nodeid,
            split,
            split_condition,
            yes,
            no,
            missing,
            children,
        } => {
            let feature = feature_index(split)
                .ok_or_else(|| format!("node {} splits on unknown feature {:?}", nodeid, split))?;
            // placeholder, patched once children have indices
            nodes.push(Node::Leaf(0.0));

            let mut child_index = HashMap::new();
            for child in children {
                let child_idx = push_node(child, nodes)?;
                child_index.insert(child.id(), child_idx);
            }
            let resolve = |target: &u32| {
                child_index
                    .get(target)
                    .copied()
                    .ok_or_else(|| format!("node {} references missing child {}", nodeid, target))
            };

            nodes[idx] = Node::Split {
                feature,
                threshold: *split_condition as f32,
                yes: resolve(yes)?,
                no: resolve(no)?,
                missing: resolve(missing)?,
            };
        }
    }
    Ok(idx)
}

/// Binary-logistic gradient boosted trees
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEnsembleClassifier {
    trees: Vec<CompiledTree>,
    base_margin: f32,
    threshold: f64,
}

impl TryFrom<TreeEnsembleArtifact> for TreeEnsembleClassifier {
    type Error = String;

    fn try_from(artifact: TreeEnsembleArtifact) -> Result<Self, Self::Error> {
        if !(artifact.base_score > 0.0 && artifact.base_score < 1.0) {
            return Err(format!(
                "base_score {} must lie strictly between 0 and 1",
                artifact.base_score
            ));
        }
        check_threshold(artifact.threshold)?;
        if artifact.trees.is_empty() {
            return Err("ensemble has no trees".to_string());
        }

        let trees = artifact
            .trees
            .iter()
            .enumerate()
            .map(|(i, tree)| CompiledTree::compile(tree).map_err(|e| format!("tree {}: {}", i, e)))
            .collect::<Result<Vec<_>, _>>()?;

        let p = artifact.base_score;
        Ok(Self {
            trees,
            base_margin: (p / (1.0 - p)).ln() as f32,
            threshold: artifact.threshold,
        })
    }
}

impl TreeEnsembleClassifier {
    pub fn tree_count(&self) -> usize {
        self.trees.len()
    }

    /// Raw additive score before the sigmoid link
    pub fn margin(&self, scaled: &FeatureVector) -> f64 {
        let margin = self
            .trees
            .iter()
            .fold(self.base_margin, |acc, tree| acc + tree.leaf_value(scaled));
        f64::from(margin)
    }
}

impl ChurnClassifier for TreeEnsembleClassifier {
    fn predict(&self, scaled: &FeatureVector) -> Result<PredictionResult, ChurnError> {
        let probability = sigmoid(self.margin(scaled));
        let label = if probability > self.threshold {
            ChurnLabel::Churned
        } else {
            ChurnLabel::Retained
        };
        Ok(PredictionResult::new(label, probability))
    }

    fn name(&self) -> &str {
        "Gradient Boosted Trees"
    }
}
