use crate::catalog::Credit;
use anyhow::{Context, Result};

/// Open a credit's reference page in the user's default browser
///
/// # Errors
/// Returns error if the credit has no source link or the browser cannot be
/// opened (e.g., no browser available)
pub fn open_source(credit: &Credit) -> Result<()> {
    let url = credit.source.trim();
    if url.is_empty() {
        anyhow::bail!("Credit {} has no source link", credit.id);
    }
    webbrowser::open(url)
        .with_context(|| format!("Failed to open browser for URL: {}", url))?;
    Ok(())
}
