//! ui::help
//!
//! Help text generated from the registry schema.
//!
//! Nothing here is hand-written per command: the listing and the option
//! tables are derived from the descriptors, in registration order.

use crate::core::command::CommandDescriptor;
use crate::core::option::OptionDescriptor;
use crate::core::registry::Shell;

/// Heading for commands that belong to no class.
const UNCLASSED_HEADING: &str = "Other";

/// List every command grouped by class.
///
/// Classes appear in creation order; unclassed commands come last. Empty
/// classes are skipped.
pub fn render_command_list<C>(shell: &Shell<C>) -> String {
    let width = shell
        .commands()
        .map(|c| c.name().as_str().len())
        .max()
        .unwrap_or(0);

    let mut sections = Vec::new();
    for class in shell.classes() {
        let commands: Vec<_> = shell.commands_in_class(class.id()).collect();
        if commands.is_empty() {
            continue;
        }
        sections.push(render_section(class.name(), &commands, width));
    }

    let unclassed: Vec<_> = shell.commands().filter(|c| c.class().is_none()).collect();
    if !unclassed.is_empty() {
        sections.push(render_section(UNCLASSED_HEADING, &unclassed, width));
    }

    sections.join("\n")
}

fn render_section<C>(heading: &str, commands: &[&CommandDescriptor<C>], width: usize) -> String {
    let mut out = format!("{}:\n", heading);
    for cmd in commands {
        let line = format!("  {:<width$}  {}", cmd.name().as_str(), cmd.help(), width = width);
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Usage and option table for one command.
///
/// Returns `None` if the command is unknown.
pub fn render_command_help<C>(shell: &Shell<C>, name: &str) -> Option<String> {
    let cmd = shell.command_by_name(name)?;
    let mut out = String::new();

    out.push_str(&format!("{}: {}\n", cmd.name(), cmd.help()));
    if let Some(class) = cmd.class().and_then(|c| shell.class(c)) {
        out.push_str(&format!("Class: {}\n", class.name()));
    }
    if !cmd.dependencies().is_empty() {
        let deps: Vec<_> = cmd
            .dependencies()
            .iter()
            .map(|d| shell.name_of(*d))
            .collect();
        out.push_str(&format!("Requires: {}\n", deps.join(", ")));
    }

    out.push_str(&format!("Usage: {}\n", usage_line(cmd)));

    if !cmd.options().is_empty() {
        out.push_str("Options:\n");
        let labels: Vec<String> = cmd.options().iter().map(option_label).collect();
        let width = labels.iter().map(String::len).max().unwrap_or(0);
        for (opt, label) in cmd.options().iter().zip(&labels) {
            let mut help = opt.help().to_string();
            if opt.is_required() {
                help = if help.is_empty() {
                    "[required]".to_string()
                } else {
                    format!("[required] {}", help)
                };
            }
            let line = format!("  {:<width$}  {}", label, help, width = width);
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }

    Some(out)
}

/// `write_fabric_verilog --file <string> [options]`
fn usage_line<C>(cmd: &CommandDescriptor<C>) -> String {
    let mut parts = vec![cmd.name().to_string()];
    for opt in cmd.options().iter().filter(|o| o.is_required()) {
        match opt.value_type() {
            Some(t) => parts.push(format!("--{} {}", opt.name(), t.placeholder())),
            None => parts.push(format!("--{}", opt.name())),
        }
    }
    if cmd.options().iter().any(|o| !o.is_required()) {
        parts.push("[options]".to_string());
    }
    parts.join(" ")
}

/// `--file, -f <string>`
fn option_label(opt: &OptionDescriptor) -> String {
    let mut label = format!("--{}", opt.name());
    if let Some(short) = opt.short_name() {
        label.push_str(&format!(", -{}", short));
    }
    if let Some(t) = opt.value_type() {
        label.push(' ');
        label.push_str(t.placeholder());
    }
    label
}
