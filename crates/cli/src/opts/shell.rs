use clap::{Parser, ValueEnum};

/// When to color the output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when writing to a terminal that supports it.
    #[default]
    Auto,
    Always,
    Never,
}

/// Global shell options.
#[derive(Clone, Copy, Debug, Default, Parser)]
pub struct ShellOptions {
    /// Do not print status messages, only the requested output.
    #[arg(long, short, global = true, alias = "silent")]
    pub quiet: bool,

    /// Output coloring.
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,
}

impl ShellOptions {
    /// Applies the color choice to all painted output.
    pub fn apply(self) {
        match self.color.unwrap_or_default() {
            ColorChoice::Auto => crate::utils::enable_paint(),
            ColorChoice::Always => yansi::enable(),
            ColorChoice::Never => yansi::disable(),
        }
    }
}
