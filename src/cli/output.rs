//! Colored terminal output helpers.
//!
//! All user-facing messages go through these functions so every command
//! is styled the same way.  Secret values themselves are written raw by
//! the commands, never through here.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::backend::Registry;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message to stderr.
pub fn info(msg: &str) {
    eprintln!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint to stderr.
pub fn tip(msg: &str) {
    eprintln!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Build the table of storage types and their options.
pub fn storage_table(registry: &Registry) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Storage", "Description", "Options"]);

    for factory in registry.iter() {
        let options = factory
            .options()
            .iter()
            .map(|o| {
                let req = if o.required { " (required)" } else { "" };
                format!("{}{req}: {}", o.flag, o.description)
            })
            .collect::<Vec<_>>()
            .join("\n");

        table.add_row(vec![
            format!("{} ({})", factory.name(), factory.display_name()),
            factory.description().to_string(),
            options,
        ]);
    }

    table
}

/// Print the table of storage types.
pub fn print_storage_table(registry: &Registry) {
    println!("{}", storage_table(registry));
}
