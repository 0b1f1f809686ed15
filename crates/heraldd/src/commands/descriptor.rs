//! Declarative command modules and their descriptors.

use std::any::{TypeId, type_name};
use std::fmt;

/// Declaration of one remotely invokable command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    /// Command name as invoked by users.
    pub name: &'static str,
    /// One-line description shown by the platform.
    pub description: &'static str,
}

impl CommandSpec {
    /// Declares a command.
    #[must_use]
    pub const fn new(name: &'static str, description: &'static str) -> Self {
        Self { name, description }
    }
}

/// A bundle of related commands known at build time.
pub trait CommandModule: 'static {
    /// Module name used in logs and registration reports.
    const NAME: &'static str;

    /// Commands declared by the module, in declaration order.
    const COMMANDS: &'static [CommandSpec];
}

/// Type-identified description of a [`CommandModule`].
#[derive(Clone, Copy)]
pub struct CommandModuleDescriptor {
    type_id: TypeId,
    type_name: &'static str,
    name: &'static str,
    commands: &'static [CommandSpec],
}

impl CommandModuleDescriptor {
    /// Describes the module type `M`.
    #[must_use]
    pub fn of<M: CommandModule>() -> Self {
        Self {
            type_id: TypeId::of::<M>(),
            type_name: type_name::<M>(),
            name: M::NAME,
            commands: M::COMMANDS,
        }
    }

    /// Fully qualified Rust type name of the module.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Module name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Commands declared by the module.
    #[must_use]
    pub fn commands(&self) -> &'static [CommandSpec] {
        self.commands
    }
}

impl PartialEq for CommandModuleDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for CommandModuleDescriptor {}

impl fmt::Debug for CommandModuleDescriptor {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CommandModuleDescriptor")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("commands", &self.commands.len())
            .finish()
    }
}

/// Constructor entry in a build-time module table.
pub type DescriptorFn = fn() -> CommandModuleDescriptor;
