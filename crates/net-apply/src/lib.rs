//! netcfg apply
//!
//! Configuration sessions tying validation, tree building and persistence
//! together, plus the service restart race.

pub mod restart;
pub mod runner;
pub mod session;


pub use restart::ServiceRestarter;
pub use runner::{CommandOutput, CommandRunner, ShellCommandRunner};
pub use session::{ConfigSession, SessionState};
