//! Task store - the to-do list behind the `add task` / `show tasks` /
//! `remove task` / `mark done` commands
//!
//! The store owns the records and hands every change to a [`TaskBackend`].
//! A mutation is built on a copy of the list, persisted, and only then
//! committed in memory, so a failed write leaves the store unchanged.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::error::{ResponderError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    pub status: TaskStatus,
    pub created_at: NaiveDateTime,
}

/// How a command refers to a task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRef {
    Id(u64),
    /// Matched case-insensitively against task titles
    Title(String),
    /// A number too large to ever be assigned as an id; matches nothing
    OutOfRange,
}

impl TaskRef {
    /// Numeric arguments are ids, anything else is a title.
    pub fn parse(arg: &str) -> Self {
        let arg = arg.trim();
        match arg.parse::<u64>() {
            Ok(id) => TaskRef::Id(id),
            Err(_) if !arg.is_empty() && arg.bytes().all(|b| b.is_ascii_digit()) => {
                TaskRef::OutOfRange
            }
            Err(_) => TaskRef::Title(arg.to_string()),
        }
    }

    fn matches(&self, task: &Task) -> bool {
        match self {
            TaskRef::Id(id) => task.id == *id,
            TaskRef::Title(title) => task.title.to_lowercase() == title.to_lowercase(),
            TaskRef::OutOfRange => false,
        }
    }
}

/// Durable storage for the whole task list
pub trait TaskBackend: Send + Sync {
    fn load(&self) -> Result<Vec<Task>>;
    /// Replace the stored list with `tasks`.
    fn save(&self, tasks: &[Task]) -> Result<()>;
}

/// Stores the list as pretty-printed JSON, rewritten in full on every save.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TaskBackend for JsonFileBackend {
    fn load(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            debug!("No task file at {}, starting empty", self.path.display());
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path).map_err(|e| ResponderError::io(&self.path, e))?;
        Ok(serde_json::from_str(&data)?)
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ResponderError::io(parent, e))?;
        }
        let data = serde_json::to_string_pretty(tasks)?;

        // Write beside the target and rename over it, so the file is either
        // the old list or the new one
        let tmp = self.temp_path();
        fs::write(&tmp, data).map_err(|e| ResponderError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                debug!("Could not remove {}: {}", tmp.display(), cleanup);
            }
            ResponderError::io(&self.path, e)
        })
    }
}

/// Keeps the list in memory only
#[derive(Default)]
pub struct MemoryBackend {
    tasks: Mutex<Vec<Task>>,
}

impl TaskBackend for MemoryBackend {
    fn load(&self) -> Result<Vec<Task>> {
        Ok(self
            .tasks
            .lock()
            .map_err(|_| ResponderError::Internal("memory backend lock poisoned".into()))?
            .clone())
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        *self
            .tasks
            .lock()
            .map_err(|_| ResponderError::Internal("memory backend lock poisoned".into()))? =
            tasks.to_vec();
        Ok(())
    }
}

pub struct TaskStore {
    tasks: Mutex<Vec<Task>>,
    backend: Box<dyn TaskBackend>,
}

impl TaskStore {
    /// Load every stored task from `backend`.
    pub fn open(backend: Box<dyn TaskBackend>) -> Result<Self> {
        let tasks = backend.load()?;
        info!("Loaded {} tasks", tasks.len());
        Ok(Self {
            tasks: Mutex::new(tasks),
            backend,
        })
    }

    pub fn in_memory() -> Self {
        Self {
            tasks: Mutex::new(Vec::new()),
            backend: Box::new(MemoryBackend::default()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Task>>> {
        self.tasks
            .lock()
            .map_err(|_| ResponderError::Internal("task store lock poisoned".into()))
    }

    /// Persist `next` and make it the current list.
    fn commit(&self, current: &mut Vec<Task>, next: Vec<Task>) -> Result<()> {
        self.backend.save(&next)?;
        *current = next;
        Ok(())
    }

    pub fn add_task(&self, title: &str) -> Result<String> {
        let title = title.trim();
        if title.is_empty() {
            return Ok("Task cannot be empty".to_string());
        }

        let mut tasks = self.lock()?;
        let wanted = title.to_lowercase();
        if tasks.iter().any(|t| t.title.to_lowercase() == wanted) {
            return Ok("Task already exists".to_string());
        }

        let id = tasks
            .iter()
            .map(|t| t.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or_else(|| ResponderError::Storage("no task ids left".into()))?;
        let mut next = tasks.clone();
        next.push(Task {
            id,
            title: title.to_string(),
            status: TaskStatus::Pending,
            created_at: Local::now().naive_local(),
        });
        self.commit(&mut tasks, next)?;

        info!("Added task {}: {}", id, title);
        Ok(format!("Task added: {}", title))
    }

    /// All tasks in insertion order, optionally only those with `status`.
    pub fn get_tasks(&self, status: Option<TaskStatus>) -> Result<Vec<Task>> {
        Ok(self
            .lock()?
            .iter()
            .filter(|t| status.map_or(true, |s| t.status == s))
            .cloned()
            .collect())
    }

    pub fn remove_task(&self, target: &TaskRef) -> Result<String> {
        let mut tasks = self.lock()?;
        let Some(pos) = tasks.iter().position(|t| target.matches(t)) else {
            return Ok("Task not found".to_string());
        };

        let mut next = tasks.clone();
        let removed = next.remove(pos);
        self.commit(&mut tasks, next)?;

        info!("Removed task {}: {}", removed.id, removed.title);
        Ok(format!("Removed task: {}", removed.title))
    }

    pub fn mark_done(&self, target: &TaskRef) -> Result<String> {
        let mut tasks = self.lock()?;
        let Some(pos) = tasks.iter().position(|t| target.matches(t)) else {
            return Ok("Task not found".to_string());
        };

        let mut next = tasks.clone();
        next[pos].status = TaskStatus::Done;
        let title = next[pos].title.clone();
        self.commit(&mut tasks, next)?;

        info!("Marked task {} done", title);
        Ok(format!("Marked done: {}", title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingBackend;

    impl TaskBackend for FailingBackend {
        fn load(&self) -> Result<Vec<Task>> {
            Ok(Vec::new())
        }

        fn save(&self, _tasks: &[Task]) -> Result<()> {
            Err(ResponderError::Storage("disk full".to_string()))
        }
    }

    #[test]
    fn test_round_trip() {
        let store = TaskStore::in_memory();

        assert_eq!(store.add_task("Buy milk").unwrap(), "Task added: Buy milk");
        let tasks = store.get_tasks(None).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, 1);
        assert_eq!(tasks[0].title, "Buy milk");
        assert_eq!(tasks[0].status, TaskStatus::Pending);

        assert_eq!(store.mark_done(&TaskRef::Id(1)).unwrap(), "Marked done: Buy milk");
        assert_eq!(store.get_tasks(None).unwrap()[0].status, TaskStatus::Done);

        assert_eq!(store.remove_task(&TaskRef::Id(1)).unwrap(), "Removed task: Buy milk");
        assert!(store.get_tasks(None).unwrap().is_empty());
        assert_eq!(store.remove_task(&TaskRef::Id(1)).unwrap(), "Task not found");
    }

    #[test]
    fn test_add_rejects_empty_and_duplicates() {
        let store = TaskStore::in_memory();
        assert_eq!(store.add_task("   ").unwrap(), "Task cannot be empty");
        store.add_task("Buy milk").unwrap();
        assert_eq!(store.add_task("buy MILK").unwrap(), "Task already exists");
        assert_eq!(store.get_tasks(None).unwrap().len(), 1);
    }

    #[test]
    fn test_ids_never_reused_after_removal() {
        let store = TaskStore::in_memory();
        store.add_task("one").unwrap();
        store.add_task("two").unwrap();
        store.remove_task(&TaskRef::Id(1)).unwrap();
        store.add_task("three").unwrap();

        let ids: Vec<u64> = store.get_tasks(None).unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_title_references() {
        let store = TaskStore::in_memory();
        store.add_task("Brush teeth").unwrap();
        assert_eq!(
            store.mark_done(&TaskRef::parse("brush teeth")).unwrap(),
            "Marked done: Brush teeth"
        );
        assert_eq!(
            store.remove_task(&TaskRef::parse("BRUSH TEETH")).unwrap(),
            "Removed task: Brush teeth"
        );
        assert_eq!(store.mark_done(&TaskRef::parse("floss")).unwrap(), "Task not found");
    }

    #[test]
    fn test_status_filter() {
        let store = TaskStore::in_memory();
        store.add_task("a").unwrap();
        store.add_task("b").unwrap();
        store.mark_done(&TaskRef::Id(2)).unwrap();

        let pending = store.get_tasks(Some(TaskStatus::Pending)).unwrap();
        let done = store.get_tasks(Some(TaskStatus::Done)).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title, "a");
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].title, "b");
    }

    #[test]
    fn test_parse_task_ref() {
        assert_eq!(TaskRef::parse("3"), TaskRef::Id(3));
        assert_eq!(TaskRef::parse(" 12 "), TaskRef::Id(12));
        assert_eq!(TaskRef::parse("-1"), TaskRef::Title("-1".to_string()));
        assert_eq!(TaskRef::parse("laundry"), TaskRef::Title("laundry".to_string()));
        assert_eq!(TaskRef::parse("18446744073709551616"), TaskRef::OutOfRange);
    }

    #[test]
    fn test_failed_save_leaves_store_unchanged() {
        let store = TaskStore::open(Box::new(FailingBackend)).unwrap();
        assert!(store.add_task("Buy milk").is_err());
        assert!(store.get_tasks(None).unwrap().is_empty());
    }

    #[test]
    fn test_json_file_persistence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tasks.json");

        {
            let store = TaskStore::open(Box::new(JsonFileBackend::new(&path))).unwrap();
            store.add_task("Buy milk").unwrap();
            store.add_task("Walk dog").unwrap();
            store.mark_done(&TaskRef::Id(2)).unwrap();
        }

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"status\": \"done\""));

        let reopened = TaskStore::open(Box::new(JsonFileBackend::new(&path))).unwrap();
        let tasks = reopened.get_tasks(None).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[1].title, "Walk dog");
        assert_eq!(tasks[1].status, TaskStatus::Done);
    }

    #[test]
    fn test_json_save_replaces_file_whole() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        let backend = JsonFileBackend::new(&path);

        backend.save(&[]).unwrap();
        let store = TaskStore::open(Box::new(JsonFileBackend::new(&path))).unwrap();
        store.add_task("Buy milk").unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("tasks.json")]);
        assert_eq!(backend.load().unwrap().len(), 1);
    }

    #[test]
    fn test_json_save_failure_keeps_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        // a non-empty directory where the file should go makes the rename fail
        std::fs::create_dir_all(path.join("blocker")).unwrap();

        let backend = JsonFileBackend::new(&path);
        assert!(backend.save(&[]).is_err());
        assert!(!dir.path().join("tasks.json.tmp").exists());
    }

    #[test]
    fn test_add_fails_when_ids_run_out() {
        let backend = MemoryBackend::default();
        backend
            .save(&[Task {
                id: u64::MAX,
                title: "last".to_string(),
                status: TaskStatus::Pending,
                created_at: Local::now().naive_local(),
            }])
            .unwrap();

        let store = TaskStore::open(Box::new(backend)).unwrap();
        assert!(store.add_task("one more").is_err());
        assert_eq!(store.get_tasks(None).unwrap().len(), 1);
    }
}
