//! Theme system for human-mode output.

use console::Style;

/// Visual theme for snap human-mode output.
///
/// Centralizes styles so every command renders consistently.
pub struct SnapTheme {
    pub success: Style,
    pub error: Style,
    pub warning: Style,
    pub muted: Style,

    pub header: Style,
    pub label: Style,
    pub value: Style,
    pub path: Style,
    pub dimensions: Style,
}

impl Default for SnapTheme {
    fn default() -> Self {
        Self {
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warning: Style::new().yellow().bold(),
            muted: Style::new().dim(),
            header: Style::new().cyan().bold().underlined(),
            label: Style::new().dim(),
            value: Style::new().bold(),
            path: Style::new().italic(),
            dimensions: Style::new().yellow(),
        }
    }
}
