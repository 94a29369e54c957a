//! Shared utilities for the rotation pipeline.
//!
//! Helpers for blend easing, tick pacing, and the restarting cycle timer
//! that drives the scheduler in the standalone binary.

pub mod cycle_timer;
pub mod easing;
pub mod tick_pacer;
