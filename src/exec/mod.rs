mod builtins;
pub mod executable;
pub mod pipeline;
pub mod pipes;
pub mod redirect;
pub mod segment;
pub mod streams;

pub use builtins::command::{Builtin, Context};
pub use builtins::functions as builtin_funcs;
pub use executable::Executable;
pub use pipeline::Pipeline;
pub use redirect::open_redirects;
pub use streams::Streams;
