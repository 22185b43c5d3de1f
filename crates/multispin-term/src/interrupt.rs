// SPDX-License-Identifier: MIT
//
// Interrupt restore hooks.
//
// Ctrl-C while a spinner block is animating would otherwise leave the
// terminal with a hidden cursor, echo disabled, and the shell prompt drawn
// on top of the block. Each animating engine registers a restore hook here
// and removes it again when it goes idle; the hook is scoped to that engine
// instance, never to module-global spinner state.
//
// The underlying Ctrl-C handler is installed once per process through
// `ctrlc`, which runs it on a dedicated thread rather than in signal
// context, so hooks are free to take locks and write to the terminal. After
// every hook has run, the process exits with the conventional 130.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, Once, PoisonError};

type Hook = Box<dyn Fn() + Send + Sync>;

static HOOKS: Mutex<Vec<(HookId, Hook)>> = Mutex::new(Vec::new());
static NEXT_ID: AtomicU64 = AtomicU64::new(1);
static HANDLER_INSTALLED: Once = Once::new();

/// Exit status used after an interrupt (128 + SIGINT).
pub const INTERRUPT_EXIT_CODE: i32 = 130;

/// Identifies a registered hook so its owner can remove it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

/// Register `hook` to run on Ctrl-C, installing the process handler on
/// first use.
pub fn register<F>(hook: F) -> HookId
where
    F: Fn() + Send + Sync + 'static,
{
    install_handler();
    let id = HookId(NEXT_ID.fetch_add(1, Ordering::Relaxed));
    HOOKS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push((id, Box::new(hook)));
    id
}

/// Remove a hook. Unknown or already-removed ids are ignored.
pub fn deregister(id: HookId) {
    HOOKS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .retain(|(hook_id, _)| *hook_id != id);
}

/// Whether `id` is still registered.
#[must_use]
pub fn is_registered(id: HookId) -> bool {
    HOOKS
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .any(|(hook_id, _)| *hook_id == id)
}

/// Run one hook and drop it, as an interrupt would. Returns `false` when
/// `id` is not registered.
///
/// For programs that own the Ctrl-C handler themselves and restore one
/// group at a time.
pub fn run(id: HookId) -> bool {
    let hook = {
        let mut hooks = HOOKS.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(pos) = hooks.iter().position(|(hook_id, _)| *hook_id == id) else {
            return false;
        };
        hooks.remove(pos).1
    };
    hook();
    true
}

/// Run every registered hook, oldest first, and drop them.
///
/// Hooks are taken out of the registry before they run, so a hook that
/// calls back into [`deregister`] cannot deadlock.
pub fn run_hooks() {
    let hooks = std::mem::take(&mut *HOOKS.lock().unwrap_or_else(PoisonError::into_inner));
    for (_, hook) in hooks {
        hook();
    }
}

fn install_handler() {
    HANDLER_INSTALLED.call_once(|| {
        let result = ctrlc::set_handler(|| {
            run_hooks();
            std::process::exit(INTERRUPT_EXIT_CODE);
        });
        if let Err(err) = result {
            // Another Ctrl-C handler owns the signal; the embedding program
            // can still call `run_hooks` from it.
            tracing::warn!(%err, "could not install interrupt handler");
        }
    });
}

// ─── Tests ───────────────────────────────────────────────────────────────────
