//! Usage and help text.

use super::ArgParser;

impl ArgParser {
    /// One-line usage: groups, ungrouped optional flags, positionals and
    /// subcommands, in registration order.
    pub fn usage(&self) -> String {
        let mut usage = format!("Usage: {} ", self.name);

        for group in self.groups.values() {
            usage.push_str(&group.usage(&self.arguments));
            usage.push(' ');
        }

        for (index, argument) in self.arguments.iter().enumerate() {
            let grouped = self.groups.values().any(|group| group.contains(index));
            if !argument.is_positional() && !grouped {
                usage.push_str(&format!("[{}] ", argument.usage()));
            }
        }

        for argument in self.positionals() {
            usage.push_str(&argument.usage());
            usage.push(' ');
        }

        if !self.subparsers.is_empty() {
            usage.push_str(&format!("{{{}}} ...", self.subcommand_list()));
        }

        usage
    }

    /// Full help text for this node.
    pub fn help(&self) -> String {
        let mut help = self.usage();
        help.push('\n');

        if !self.description.is_empty() {
            help.push('\n');
            help.push_str(&self.description);
            help.push('\n');
        }

        if !self.positionals.is_empty() || !self.subparsers.is_empty() {
            help.push_str("\nPositional arguments:\n");
        }
        for argument in self.positionals() {
            help.push_str(&argument.help());
            help.push('\n');
        }
        if !self.subparsers.is_empty() {
            help.push_str(&format!("{{{}}}\tsubcommands\n", self.subcommand_list()));
            for child in self.subparsers.values() {
                help.push_str(&format!("  {}\t{}\n", child.name, child.description));
            }
        }

        let optional: Vec<String> = self
            .arguments
            .iter()
            .filter(|argument| !argument.is_positional())
            .map(|argument| argument.help())
            .collect();
        if !optional.is_empty() {
            help.push_str("\nOptional arguments:\n");
            for line in optional {
                help.push_str(&line);
                help.push('\n');
            }
        }

        help
    }

    fn subcommand_list(&self) -> String {
        self.subparsers
            .values()
            .map(|child| child.name.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}
