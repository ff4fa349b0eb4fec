/*!
 * Core Types
 * Common types used across the simulator
 */

/// OS-level process ID
pub type Pid = u32;

/// Common result type for simulator operations
pub type SimResult<T> = Result<T, super::errors::SimError>;
