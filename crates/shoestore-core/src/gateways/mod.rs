//! Outbound collaborators: mail transport and OS process runner

pub mod mailer;
pub mod command_runner;

pub use mailer::Mailer;
pub use command_runner::{CommandOutput, CommandRunner};

#[cfg(any(test, feature = "mocks"))]
pub use mailer::MockMailer;
#[cfg(any(test, feature = "mocks"))]
pub use command_runner::MockCommandRunner;
