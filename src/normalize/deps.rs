//! Dependency resolution and cycle removal.

use std::collections::{HashMap, HashSet};

use super::error::NormalizeError;
use super::Draft;
use crate::task::TaskCollection;

/// Resolves raw references into task ids and builds the collection.
///
/// A reference matches a task id first, then a task title (case-insensitive,
/// whitespace-normalized, first in document order). Unmatched references are
/// dropped and reported.
pub fn resolve(drafts: Vec<Draft>, errors: &mut Vec<NormalizeError>) -> TaskCollection {
    let ids: HashSet<String> = drafts.iter().map(|d| d.task.id.clone()).collect();
    let mut titles: HashMap<String, String> = HashMap::new();
    for draft in &drafts {
        titles.entry(title_key(&draft.task.title)).or_insert_with(|| draft.task.id.clone());
    }

    let tasks = drafts
        .into_iter()
        .map(|Draft { mut task, depends }| {
            for reference in depends {
                let target = if ids.contains(&reference) {
                    Some(reference.clone())
                } else {
                    titles.get(&title_key(&reference)).cloned()
                };
                match target {
                    Some(id) if !task.depends_on.contains(&id) => task.depends_on.push(id),
                    Some(_) => {}
                    None => errors.push(NormalizeError::DanglingDependency {
                        referrer: task.id.clone(),
                        target: reference,
                    }),
                }
            }
            task
        })
        .collect();

    TaskCollection::from_tasks(tasks)
}

fn title_key(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Removes dependency cycles, returning each removed cycle's members.
///
/// Cycles are searched depth-first in document order. All edges of a found
/// cycle are removed before searching again, so the remaining graph is acyclic.
pub fn break_cycles(collection: &mut TaskCollection) -> Vec<Vec<String>> {
    let mut removed = Vec::new();
    while let Some(cycle) = find_cycle(collection) {
        for (i, from) in cycle.iter().enumerate() {
            let to = &cycle[(i + 1) % cycle.len()];
            if let Some(task) = collection.get_mut(from) {
                task.depends_on.retain(|dep| dep != to);
            }
        }
        tracing::debug!(members = ?cycle, "removed dependency cycle");
        removed.push(cycle);
    }
    removed
}

fn find_cycle(collection: &TaskCollection) -> Option<Vec<String>> {
    let mut visited: HashSet<&str> = HashSet::new();
    for task in collection.tasks() {
        if visited.contains(task.id.as_str()) {
            continue;
        }
        if let Some(cycle) = walk(&task.id, collection, &mut visited) {
            return Some(cycle);
        }
    }
    None
}

/// Depth-first walk from `root`. The path holds `(id, next dependency index)`
/// frames so chain length never grows the call stack.
fn walk<'a>(
    root: &'a str,
    collection: &'a TaskCollection,
    visited: &mut HashSet<&'a str>,
) -> Option<Vec<String>> {
    let mut path: Vec<(&'a str, usize)> = vec![(root, 0)];
    let mut on_path: HashSet<&'a str> = HashSet::from([root]);
    visited.insert(root);

    while let Some((id, next)) = path.last_mut() {
        let deps = collection.get(*id).map_or(&[][..], |task| task.depends_on.as_slice());
        let Some(dep) = deps.get(*next) else {
            on_path.remove(*id);
            path.pop();
            continue;
        };
        *next += 1;
        let dep = dep.as_str();
        if on_path.contains(dep) {
            let start = path.iter().position(|(n, _)| *n == dep).unwrap_or(0);
            return Some(path[start..].iter().map(|(n, _)| (*n).to_string()).collect());
        }
        if visited.insert(dep) {
            on_path.insert(dep);
            path.push((dep, 0));
        }
    }
    None
}
