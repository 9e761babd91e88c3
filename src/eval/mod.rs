pub mod completion;
pub mod dispatcher;
pub mod parser;
pub mod pipeline;
mod quote;
pub mod readline;
pub mod redirect;
mod symbols;
mod tokenizer;

pub use completion::build_command_trie;
pub use dispatcher::Dispatcher;
pub use readline::{Input, LineEditor};
