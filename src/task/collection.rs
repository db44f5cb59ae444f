//! The full set of tasks from one normalizer run.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Task, TaskStatus};

/// Status tally over a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of tasks.
    pub total: usize,
    /// Tasks with status `completed`.
    pub completed: usize,
    /// Tasks with status `pending`.
    pub pending: usize,
}

impl Summary {
    /// Counts statuses over the given tasks.
    #[must_use]
    pub fn of(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|t| t.status == TaskStatus::Completed).count();
        Self { total: tasks.len(), completed, pending: tasks.len() - completed }
    }

    /// One-line human summary, e.g. `4 tasks: 1 completed, 3 pending`.
    #[must_use]
    pub fn line(&self) -> String {
        let noun = if self.total == 1 { "task" } else { "tasks" };
        format!("{} {noun}: {} completed, {} pending", self.total, self.completed, self.pending)
    }
}

/// Tasks in document order, with lookup by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskCollection {
    tasks: Vec<Task>,
    index: HashMap<String, usize>,
}

impl TaskCollection {
    /// Builds a collection from tasks already in document order.
    ///
    /// Later tasks with an id already present are dropped.
    #[must_use]
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut collection = Self::default();
        for task in tasks {
            if collection.index.contains_key(&task.id) {
                tracing::warn!(id = %task.id, "dropping task with duplicate id");
                continue;
            }
            collection.index.insert(task.id.clone(), collection.tasks.len());
            collection.tasks.push(task);
        }
        collection
    }

    /// All tasks in document order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Consumes the collection, returning its tasks.
    #[must_use]
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if there are no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.index.get(id).map(|&i| &self.tasks[i])
    }

    /// Returns `true` if a task with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        match self.index.get(id) {
            Some(&i) => Some(&mut self.tasks[i]),
            None => None,
        }
    }

    /// Mutable access to all tasks.
    pub fn tasks_mut(&mut self) -> &mut [Task] {
        &mut self.tasks
    }

    /// Top-level tasks in document order.
    pub fn top_level(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.is_top_level())
    }

    /// Children of `task`, in the order listed by its `children` field.
    pub fn children_of<'a>(&'a self, task: &'a Task) -> impl Iterator<Item = &'a Task> {
        task.children.iter().filter_map(move |id| self.get(id))
    }

    /// Status tally.
    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary::of(&self.tasks)
    }

    /// Recomputes every task's `blocked_by` from `depends_on` and current statuses.
    pub fn refresh_blocked(&mut self) {
        let completed: HashMap<String, bool> =
            self.tasks.iter().map(|t| (t.id.clone(), t.is_completed())).collect();
        for task in &mut self.tasks {
            task.blocked_by = task
                .depends_on
                .iter()
                .filter(|dep| !completed.get(dep.as_str()).copied().unwrap_or(false))
                .cloned()
                .collect();
        }
    }
}
