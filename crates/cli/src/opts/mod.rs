mod rpc;
mod shell;

pub use rpc::*;
pub use shell::*;
