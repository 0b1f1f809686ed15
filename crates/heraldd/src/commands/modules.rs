//! Command modules compiled into the binary.
//!
//! Adding a module means declaring its type here and listing it in
//! [`BUILTIN_MODULES`]; nothing is discovered at runtime.

use super::descriptor::{CommandModule, CommandModuleDescriptor, CommandSpec, DescriptorFn};

/// Liveness and build information commands.
#[derive(Debug)]
pub struct DiagnosticsCommands;

impl CommandModule for DiagnosticsCommands {
    const NAME: &'static str = "diagnostics";
    const COMMANDS: &'static [CommandSpec] = &[
        CommandSpec::new("ping", "Checks that the session is responsive"),
        CommandSpec::new("about", "Shows the running build and uptime"),
    ];
}

/// Issue tracker lookups.
#[derive(Debug)]
pub struct TrackerCommands;

impl CommandModule for TrackerCommands {
    const NAME: &'static str = "tracker";
    const COMMANDS: &'static [CommandSpec] = &[
        CommandSpec::new("task", "Looks up a task by its identifier"),
        CommandSpec::new("revision", "Looks up a code revision by its identifier"),
        CommandSpec::new("search", "Searches open tasks by title"),
    ];
}

/// Every command module shipped with the binary, in declaration order.
pub const BUILTIN_MODULES: &[DescriptorFn] = &[
    CommandModuleDescriptor::of::<DiagnosticsCommands>,
    CommandModuleDescriptor::of::<TrackerCommands>,
];
