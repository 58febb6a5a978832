// Copyright 2026 The sente authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A fixed-size worker pool, constructed once for the whole process, with
//! a fan-out/join primitive. Tasks run to completion, there is no
//! preemption and no cooperative yielding.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Sender};

use crate::config;

type Task = Box<dyn FnOnce() + Send + 'static>;

pub struct ThreadPool {
    sender: Sender<Task>,
    handles: Mutex<Vec<JoinHandle<()>>>
}

impl ThreadPool {
    pub fn new(capacity: usize) -> ThreadPool {
        let (sender, receiver) = unbounded::<Task>();
        let handles = (0..capacity).map(|i| {
            let receiver = receiver.clone();

            thread::Builder::new()
                .name(format!("sente_worker_{}", i))
                .spawn(move || {
                    while let Ok(task) = receiver.recv() {
                        task();
                    }
                })
                .expect("could not spawn worker thread")
        }).collect::<Vec<_>>();

        ThreadPool { sender, handles: Mutex::new(handles) }
    }

    /// Returns a new empty group of tasks on this pool.
    pub fn group(&self) -> TaskGroup {
        TaskGroup {
            pool: self,
            pending: Arc::new(Pending {
                count: Mutex::new(0),
                is_done: Condvar::new()
            })
        }
    }

    /// Wait for all worker threads to terminate. Only useful during
    /// process shutdown, since the queue is closed by dropping the pool.
    pub fn join(&self) {
        for handle in self.handles.lock().expect("could not acquire handle lock").drain(..) {
            handle.join().expect("could not join worker thread");
        }
    }
}

struct Pending {
    count: Mutex<usize>,
    is_done: Condvar
}

/// Tracks a set of tasks submitted to a `ThreadPool`, so that the
/// submitter can block until every one of them has finished.
pub struct TaskGroup<'a> {
    pool: &'a ThreadPool,
    pending: Arc<Pending>
}

/// Decrements the pending count when dropped, so that a panicking task
/// does not leave `wait_all` blocked forever.
struct CountGuard {
    pending: Arc<Pending>
}

impl Drop for CountGuard {
    fn drop(&mut self) {
        let mut count = self.pending.count.lock().expect("could not acquire task count lock");

        *count -= 1;

        if *count == 0 {
            self.pending.is_done.notify_all();
        }
    }
}

impl<'a> TaskGroup<'a> {
    /// Enqueue a task as part of this group.
    pub fn add<F: FnOnce() + Send + 'static>(&self, task: F) {
        {
            let mut count = self.pending.count.lock().expect("could not acquire task count lock");
            *count += 1;
        }

        let guard = CountGuard { pending: self.pending.clone() };

        self.pool.sender.send(Box::new(move || {
            let _guard = guard;

            task();
        })).expect("could not enqueue task");
    }

    /// Block until every task added to this group has completed.
    pub fn wait_all(&self) {
        let mut count = self.pending.count.lock().expect("could not acquire task count lock");

        while *count > 0 {
            count = self.pending.is_done.wait(count).expect("could not wait for task count");
        }
    }
}

lazy_static! {
    /// The process-wide worker pool that all searches fan out over.
    pub static ref THREAD_POOL: ThreadPool = ThreadPool::new(*config::NUM_THREADS);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn all_tasks_run() {
        let pool = ThreadPool::new(4);
        let group = pool.group();
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..100 {
            let counter = counter.clone();

            group.add(move || { counter.fetch_add(1, Ordering::SeqCst); });
        }

        group.wait_all();
        assert_eq!(counter.load(Ordering::SeqCst), 100);
    }

    #[test]
    fn empty_group_does_not_block() {
        let pool = ThreadPool::new(1);
        let group = pool.group();

        group.wait_all();
    }

    #[test]
    fn groups_are_independent() {
        let pool = ThreadPool::new(2);
        let slow = pool.group();
        let fast = pool.group();
        let counter = Arc::new(AtomicUsize::new(0));

        {
            let counter = counter.clone();
            slow.add(move || {
                ::std::thread::sleep(::std::time::Duration::from_millis(50));
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        {
            let counter = counter.clone();
            fast.add(move || { counter.fetch_add(1, Ordering::SeqCst); });
        }

        fast.wait_all();
        slow.wait_all();
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
