//! Print the built-in theme and template catalogs.

use briklyst_core::template::templates;
use briklyst_core::theme::themes;

use super::CommandError;

/// List themes, as a table or as JSON.
///
/// # Errors
///
/// Returns an error only if JSON encoding fails.
#[allow(clippy::print_stdout)]
pub fn list_themes(json: bool) -> Result<(), CommandError> {
    if json {
        println!("{}", serde_json::to_string_pretty(themes())?);
        return Ok(());
    }
    println!("{:<16} {:<18} {:<10} VIBE", "ID", "NAME", "PRIMARY");
    for theme in themes() {
        println!(
            "{:<16} {:<18} {:<10} {}",
            theme.id, theme.name, theme.colors.primary, theme.vibe
        );
    }
    Ok(())
}

/// List templates, as a table or as JSON.
///
/// # Errors
///
/// Returns an error only if JSON encoding fails.
#[allow(clippy::print_stdout)]
pub fn list_templates(json: bool) -> Result<(), CommandError> {
    if json {
        println!("{}", serde_json::to_string_pretty(templates())?);
        return Ok(());
    }
    println!("{:<16} {:<18} DEFAULT THEME", "ID", "NAME");
    for template in templates() {
        println!(
            "{:<16} {:<18} {}",
            template.id, template.name, template.default_theme
        );
    }
    Ok(())
}
