/*
A quick write-up on builtins:
Builtins are commands that run inside the shell process instead of being spawned as executables.
They are the only commands with access to the shell's state, which is how `cd`, `exit` and `history` work.
Every builtin gets its standard streams through its `Context` rather than the process-wide ones,
which lets a builtin be one segment of a pipeline while other segments run at the same time.
 */

pub mod args;
pub mod command;
pub mod functions;
