//! Anti-automation evasions registered before the first navigation.
//!
//! Everything here runs through `Page.addScriptToEvaluateOnNewDocument`, so
//! the target page's own scripts never observe the unpatched values.

use anyhow::Result;
use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide_cdp::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use tracing::debug;

mod evasions;
mod profile;

pub use profile::FingerprintProfile;

/// Register the fingerprint profile and evasion scripts on `page` and
/// override its user agent.
pub async fn inject(page: &Page, user_agent: &str) -> Result<()> {
    let profile = FingerprintProfile::for_user_agent(user_agent);
    let seed = hex::encode(rand::random::<[u8; 16]>());

    page.execute(
        SetUserAgentOverrideParams::builder()
            .user_agent(user_agent)
            .accept_language(profile.accept_language.clone())
            .platform(profile.platform.clone())
            .build()
            .map_err(anyhow::Error::msg)?,
    )
    .await?;

    let mut sources = vec![profile.to_script(&seed)?];
    sources.extend(evasions::SCRIPTS.iter().map(|s| (*s).to_string()));

    for source in sources {
        page.execute(AddScriptToEvaluateOnNewDocumentParams {
            source,
            include_command_line_api: None,
            world_name: None,
            run_immediately: None,
        })
        .await?;
    }

    debug!(
        scripts = evasions::SCRIPTS.len() + 1,
        platform = %profile.platform,
        "Stealth scripts registered"
    );
    Ok(())
}
