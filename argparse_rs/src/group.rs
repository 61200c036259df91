//! Argument groups with required / exclusive constraints.

use crate::argument::Argument;

/// A named set of arguments checked together after a parse pass.
///
/// Members are indices into the owning parser's argument table; the group
/// never owns definitions.
#[derive(Debug, Clone)]
pub struct ArgGroup {
    name: String,
    description: String,
    required: bool,
    exclusive: bool,
    members: Vec<usize>,
}

impl ArgGroup {
    pub(crate) fn new(name: String, description: String, required: bool, exclusive: bool) -> Self {
        Self {
            name,
            description,
            required,
            exclusive,
            members: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// At least one member must be set.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// At most one member may be set.
    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }

    pub fn members(&self) -> &[usize] {
        &self.members
    }

    pub(crate) fn push(&mut self, index: usize) {
        self.members.push(index);
    }

    pub(crate) fn contains(&self, index: usize) -> bool {
        self.members.contains(&index)
    }

    /// `[a | b]` when exclusive, `[a] [b]` otherwise.
    pub(crate) fn usage(&self, arguments: &[Argument]) -> String {
        let usages = self.members.iter().map(|&index| arguments[index].usage());

        if self.exclusive {
            let joined: Vec<String> = usages.collect();
            return format!("[{}]", joined.join(" | "));
        }

        usages
            .map(|usage| format!("[{}]", usage))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Diagnostic line for a violated constraint, if any.
    pub(crate) fn validate(
        &self,
        arguments: &[Argument],
        was_set: impl Fn(usize) -> bool,
    ) -> Option<String> {
        let set: Vec<usize> = self
            .members
            .iter()
            .copied()
            .filter(|&index| was_set(index))
            .collect();

        if set.is_empty() && self.required {
            return Some(format!(
                "no argument from group \"{}\" ({}) was specified",
                self.name,
                labels(arguments, &self.members)
            ));
        }

        if set.len() > 1 && self.exclusive {
            return Some(format!(
                "more than one argument of group \"{}\" was specified ({})",
                self.name,
                labels(arguments, &set)
            ));
        }

        None
    }
}

fn labels(arguments: &[Argument], indices: &[usize]) -> String {
    indices
        .iter()
        .map(|&index| arguments[index].label())
        .collect::<Vec<_>>()
        .join(",")
}
