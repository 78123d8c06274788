// Session layer: one explicit context per logged-in user replaces process-global UI flags.
// All session mutation goes through `context` methods, orchestrated by `flow`.

pub mod context;
pub mod flow;
pub mod handlers;
pub mod registry;

pub use context::SessionContext;
pub use registry::SessionRegistry;
