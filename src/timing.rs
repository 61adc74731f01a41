//! Deferred callbacks: the debounce wrapper and one-shot timers.

pub mod debounce;
pub mod scheduler;

pub use debounce::Debounced;
pub use scheduler::Scheduler;
