// src/solver/mod.rs
pub mod composite;
pub mod ink;
pub mod velocity;

pub use composite::composite_pass;
pub use ink::ink_pass;
pub use velocity::{relax_cell, relax_pass};

use bevy::tasks::{ComputeTaskPool, TaskPool};

/// Compute pool shared by the pass drivers. Initialized lazily so passes also
/// run outside a full `App` (tests, benches).
#[inline]
pub(crate) fn task_pool() -> &'static ComputeTaskPool {
    ComputeTaskPool::get_or_init(TaskPool::new)
}
