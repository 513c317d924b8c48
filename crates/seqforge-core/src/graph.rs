use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Summary of slot dependency graph structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencySummary {
    pub slots: usize,
    pub driving: usize,
    pub derived: usize,
}

/// Report for slot dependency ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyReport {
    pub summary: DependencySummary,
    /// Every slot, referenced slots before the slots derived from them.
    pub topo_order: Option<Vec<usize>>,
    pub cycle: Option<Vec<usize>>,
}

impl DependencyReport {
    /// Derived slots only, in evaluation order.
    pub fn derived_order(&self, inputs: &BTreeMap<usize, usize>) -> Option<Vec<usize>> {
        self.topo_order.as_ref().map(|order| {
            order
                .iter()
                .copied()
                .filter(|index| inputs.get(index).is_some_and(|input| input != index))
                .collect()
        })
    }
}

/// Build a deterministic dependency report from `slot -> input slot` edges.
///
/// A slot whose input is itself is a driving slot and has no incoming edge.
/// Inputs pointing at unknown slots are ignored here; callers check them.
pub fn build_dependency_report(inputs: &BTreeMap<usize, usize>) -> DependencyReport {
    let graph = build_adjacency(inputs);
    let driving = inputs
        .iter()
        .filter(|(index, input)| index == input)
        .count();
    let summary = DependencySummary {
        slots: inputs.len(),
        driving,
        derived: inputs.len() - driving,
    };

    match toposort(&graph) {
        Ok(order) => DependencyReport {
            summary,
            topo_order: Some(order),
            cycle: None,
        },
        Err(cycle) => DependencyReport {
            summary,
            topo_order: None,
            cycle: Some(cycle),
        },
    }
}

fn build_adjacency(inputs: &BTreeMap<usize, usize>) -> BTreeMap<usize, BTreeSet<usize>> {
    let mut graph: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();

    for (&index, &input) in inputs {
        graph.entry(index).or_default();
        if index != input && inputs.contains_key(&input) {
            graph.entry(input).or_default().insert(index);
        }
    }

    graph
}

fn toposort(graph: &BTreeMap<usize, BTreeSet<usize>>) -> Result<Vec<usize>, Vec<usize>> {
    let mut indegree: BTreeMap<usize, usize> = graph.keys().map(|node| (*node, 0)).collect();

    for targets in graph.values() {
        for target in targets {
            *indegree.entry(*target).or_insert(0) += 1;
        }
    }

    let mut ready: BTreeSet<usize> = indegree
        .iter()
        .filter_map(|(node, count)| if *count == 0 { Some(*node) } else { None })
        .collect();

    let mut order = Vec::with_capacity(graph.len());

    while let Some(node) = ready.pop_first() {
        order.push(node);

        if let Some(targets) = graph.get(&node) {
            for target in targets {
                if let Some(count) = indegree.get_mut(target) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        ready.insert(*target);
                    }
                }
            }
        }
    }

    if order.len() == graph.len() {
        Ok(order)
    } else {
        let cycle_nodes: Vec<usize> = indegree
            .into_iter()
            .filter_map(|(node, count)| if count > 0 { Some(node) } else { None })
            .collect();
        Err(cycle_nodes)
    }
}
