/*!
 * Process Module
 * Application records, process launching and signal control
 */

pub mod launcher;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use launcher::{ProcessHandle, ProcessLauncher};
pub use traits::ProcessControl;
pub use types::{Application, ExitInfo, ProcessResult, ProcessStatus, TerminationEvent};
