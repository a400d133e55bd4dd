/*!
Process-wide cleanup hooks.

Appenders register a hook to release their socket when the process exits.
The host is expected to call `run_exit_hooks` on its way out. Hooks that are
deregistered before then, like when an appender is shut down explicitly, don't run.
*/

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex, MutexGuard,
    },
};

type Hook = Box<dyn FnOnce() + Send>;

lazy_static! {
    static ref EXIT_HOOKS: Hooks = Hooks::new();
}

/**
Register a hook to run at process exit.
*/
pub fn register(hook: impl FnOnce() + Send + 'static) -> HookId {
    EXIT_HOOKS.register(hook)
}

/**
Deregister a hook so it won't run at process exit.

Returns `true` if the hook was still registered.
*/
pub fn deregister(id: HookId) -> bool {
    EXIT_HOOKS.deregister(id)
}

/**
Run all hooks registered for process exit.
*/
pub fn run_exit_hooks() {
    EXIT_HOOKS.run()
}

/**
A registered hook.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HookId(u64);

/**
A set of hooks to run once.
*/
pub struct Hooks {
    next_id: AtomicU64,
    hooks: Mutex<BTreeMap<u64, Hook>>,
}

impl Hooks {
    pub fn new() -> Self {
        Hooks {
            next_id: AtomicU64::new(0),
            hooks: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn register(&self, hook: impl FnOnce() + Send + 'static) -> HookId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        self.lock().insert(id, Box::new(hook));

        HookId(id)
    }

    pub fn deregister(&self, id: HookId) -> bool {
        self.lock().remove(&id.0).is_some()
    }

    /**
    Run all registered hooks, in the order they were registered.

    Each hook runs at most once.
    */
    pub fn run(&self) {
        // Hooks run without holding the lock so they're free to deregister themselves
        let hooks = std::mem::take(&mut *self.lock());

        for (_, hook) in hooks {
            hook();
        }
    }

    fn lock(&self) -> MutexGuard<BTreeMap<u64, Hook>> {
        self.hooks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for Hooks {
    fn default() -> Self {
        Hooks::new()
    }
}
