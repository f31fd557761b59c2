//! One module per subcommand, each exposing an `execute` function.

pub mod completions;
pub mod export;
pub mod get;
pub mod init;
pub mod list;
pub mod set;
pub mod storage;
pub mod unset;
pub mod version;
