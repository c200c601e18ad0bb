// src/dag/cycle.rs

//! Reachability search used to reject cycle-closing edges.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::dag::graph::DagNode;
use crate::types::TaskId;

/// Depth-first search from `start` along prerequisite edges, looking for
/// `target`.
///
/// Returns the prerequisite chain `start -> ... -> target` if `target` is
/// reachable, `None` otherwise. Iterative so deep chains cannot overflow the
/// stack.
pub(crate) fn prerequisite_path(
    nodes: &BTreeMap<TaskId, DagNode>,
    start: &str,
    target: &str,
) -> Option<Vec<TaskId>> {
    let mut stack: Vec<&str> = vec![start];
    let mut visited: HashSet<&str> = HashSet::new();
    // First node from which each node was discovered.
    let mut discovered_from: HashMap<&str, &str> = HashMap::new();

    while let Some(current) = stack.pop() {
        if current == target {
            return Some(unwind(&discovered_from, start, current));
        }
        if !visited.insert(current) {
            continue;
        }

        let Some(node) = nodes.get(current) else {
            continue;
        };
        for next in node.prerequisites.iter().map(String::as_str) {
            if !visited.contains(next) {
                discovered_from.entry(next).or_insert(current);
                stack.push(next);
            }
        }
    }

    None
}

fn unwind<'a>(discovered_from: &HashMap<&'a str, &'a str>, start: &str, end: &'a str) -> Vec<TaskId> {
    let mut path = vec![end.to_string()];
    let mut current = end;
    while current != start {
        match discovered_from.get(current) {
            Some(&prev) => {
                path.push(prev.to_string());
                current = prev;
            }
            None => break,
        }
    }
    path.reverse();
    path
}
