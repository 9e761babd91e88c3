use std::env;
use std::io::Write;

use super::args::{
    parse_arguments, ChangeDirectoryArgs, ExitArgs, HistoryArgs, TypeArgs, WorkingDirectoryArgs,
};
use super::command::Context;
use crate::errors::{Handle, Result};
use crate::state::{read_state, write_state};

pub fn echo(context: &mut Context, args: Vec<&str>) -> Result<()> {
    writeln!(context.stdout, "{}", args.join(" ")).replace_err(|| builtin_err!(FailedToWrite))
}

pub fn working_directory(context: &mut Context, args: Vec<&str>) -> Result<()> {
    clap_handle!(parse_arguments::<WorkingDirectoryArgs>("pwd", &args));
    let cwd = env::current_dir().replace_err(|| builtin_err!(UnknownDirectory(".".to_owned())))?;
    writeln!(context.stdout, "{}", cwd.display()).replace_err(|| builtin_err!(FailedToWrite))
}

pub fn change_directory(context: &mut Context, args: Vec<&str>) -> Result<()> {
    let arguments = clap_handle!(parse_arguments::<ChangeDirectoryArgs>("cd", &args));
    let shell = read_state(context.shell);
    let target = match &arguments.path {
        Some(path) => shell.environment.resolve_directory(path),
        None => shell.environment.HOME.clone(),
    };

    let typed = arguments.path.unwrap_or_else(|| target.display().to_string());
    env::set_current_dir(&target).replace_err(|| builtin_err!(UnknownDirectory(typed)))?;
    log::debug!("changed directory to {}", target.display());
    Ok(())
}

pub fn type_of(context: &mut Context, args: Vec<&str>) -> Result<()> {
    let arguments = clap_handle!(parse_arguments::<TypeArgs>("type", &args));
    let shell = read_state(context.shell);

    for name in &arguments.names {
        let description = match context.dispatcher.resolve(name) {
            Some(_) => format!("{} is a shell builtin", name),
            None => match shell.environment.find_executable(name) {
                Some(path) => format!("{} is {}", name, path.display()),
                None => format!("{}: not found", name),
            },
        };

        writeln!(context.stdout, "{}", description).replace_err(|| builtin_err!(FailedToWrite))?;
    }

    Ok(())
}

pub fn exit(context: &mut Context, args: Vec<&str>) -> Result<()> {
    let arguments = clap_handle!(parse_arguments::<ExitArgs>("exit", &args));
    // A pipeline segment is a child of the pipeline, so it only ends itself
    if context.in_pipeline() {
        log::debug!("ignoring exit inside a pipeline");
        return Ok(());
    }

    write_state(context.shell).should_exit = Some(arguments.code.unwrap_or(0));
    Ok(())
}

pub fn history(context: &mut Context, args: Vec<&str>) -> Result<()> {
    let arguments = clap_handle!(parse_arguments::<HistoryArgs>("history", &args));

    if let Some(path) = arguments.read {
        return write_state(context.shell)
            .history
            .read_file(&path)
            .map_err(|cause| builtin_err!(HistoryFile(path, cause)));
    }

    if let Some(path) = arguments.write {
        return read_state(context.shell)
            .history
            .write_file(&path)
            .map_err(|cause| builtin_err!(HistoryFile(path, cause)));
    }

    if let Some(path) = arguments.append {
        return write_state(context.shell)
            .history
            .append_file(&path)
            .map_err(|cause| builtin_err!(HistoryFile(path, cause)));
    }

    let count = arguments.count.unwrap_or(0).max(0) as usize;
    let listing = read_state(context.shell).history.render(count);
    context
        .stdout
        .write_all(listing.as_bytes())
        .replace_err(|| builtin_err!(FailedToWrite))
}
