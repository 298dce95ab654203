pub mod commands;
pub mod config;
pub mod console;
pub mod logging;
pub mod reply;

use clap::builder::styling;

pub fn clap_base_command() -> clap::Command {
    clap::Command::default().styles(
        styling::Styles::styled()
            .header(
                styling::Style::default()
                    .bold()
                    .fg_color(Some(styling::Color::Ansi(styling::AnsiColor::Blue))),
            )
            .placeholder(styling::Style::default().dimmed()),
    )
}
