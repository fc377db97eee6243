use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::rc::{Rc, Weak};

use futures::future::{abortable, AbortHandle};

/// Async work owned by a mounted view.
///
/// Every future passed through [`ViewTasks::guard`] is aborted when the set is
/// aborted or dropped, so nothing keeps running after unmount.
#[derive(Debug, Default)]
pub struct ViewTasks {
    next_id: Cell<u64>,
    live: Rc<RefCell<HashMap<u64, AbortHandle>>>,
}

impl ViewTasks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps `task` so it can be aborted. Resolves to `None` when it was.
    pub fn guard<F>(&self, task: F) -> impl Future<Output = Option<F::Output>> + 'static
    where
        F: Future + 'static,
    {
        let (task, handle) = abortable(task);
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.live.borrow_mut().insert(id, handle);

        let live: Weak<RefCell<HashMap<u64, AbortHandle>>> = Rc::downgrade(&self.live);
        async move {
            let output = task.await.ok();
            if let Some(live) = live.upgrade() {
                live.borrow_mut().remove(&id);
            }
            output
        }
    }

    /// Number of guarded futures that have neither finished nor been aborted.
    pub fn len(&self) -> usize {
        self.live.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn abort_all(&self) {
        let handles: Vec<AbortHandle> = self.live.borrow_mut().drain().map(|(_, h)| h).collect();
        if !handles.is_empty() {
            log::debug!("aborting {} view tasks", handles.len());
        }
        for handle in handles {
            handle.abort();
        }
    }
}

impl Drop for ViewTasks {
    fn drop(&mut self) {
        self.abort_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::executor::block_on;

    #[test]
    fn finished_task_yields_output_and_is_forgotten() {
        let tasks = ViewTasks::new();
        let task = tasks.guard(async { 7 });
        assert_eq!(tasks.len(), 1);
        assert_eq!(block_on(task), Some(7));
        assert!(tasks.is_empty());
    }

    #[test]
    fn aborted_task_never_completes() {
        let tasks = ViewTasks::new();
        let (tx, rx) = oneshot::channel::<u8>();
        let task = tasks.guard(rx);
        tasks.abort_all();
        assert!(tasks.is_empty());
        // the sender is still alive, so an unaborted task would block here
        assert_eq!(block_on(task), None);
        drop(tx);
    }

    #[test]
    fn dropping_the_set_aborts_pending_tasks() {
        let tasks = ViewTasks::new();
        let (_tx, rx) = oneshot::channel::<u8>();
        let task = tasks.guard(rx);
        drop(tasks);
        assert_eq!(block_on(task), None);
    }

    #[test]
    fn abort_leaves_later_tasks_alone() {
        let tasks = ViewTasks::new();
        let (_tx, rx) = oneshot::channel::<u8>();
        let first = tasks.guard(rx);
        tasks.abort_all();
        let second = tasks.guard(async { "fresh" });
        assert_eq!(block_on(first), None);
        assert_eq!(block_on(second), Some("fresh"));
    }
}
