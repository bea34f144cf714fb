use clap::ValueEnum;

/// Color preference for terminal output
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Force colors on or off; `Auto` leaves the terminal detection in place
    pub fn apply(self) {
        match self {
            ColorMode::Always => colored::control::set_override(true),
            ColorMode::Never => colored::control::set_override(false),
            ColorMode::Auto => {}
        }
    }
}
