use crate::MigrationContext;
use anyhow::Result;
use colored::Colorize;

/// Print the catalog versions oldest first, marking the latest.
///
/// # Errors
///
/// Never fails today; the signature matches the other commands.
pub fn execute(ctx: &MigrationContext) -> Result<()> {
    let latest = ctx.migrator.latest();
    for updater in ctx.migrator.updaters() {
        let version = updater.version();
        if Some(version) == latest {
            println!("{} {}", version.to_string().green().bold(), "(latest)".dimmed());
        } else {
            println!("{version}");
        }
    }
    Ok(())
}
