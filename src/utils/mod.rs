// Utility functions
// Helpers shared by the storefront behaviors

pub mod timer_slot;

pub use timer_slot::TimerSlot;
