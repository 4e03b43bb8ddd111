use serde::Serialize;

/// Values the evasion scripts report in place of the real ones.
///
/// Kept consistent with the user agent so `navigator.platform` does not
/// contradict the UA string.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FingerprintProfile {
    pub accept_language: String,
    pub platform: String,
    pub languages: Vec<String>,
    pub hardware_concurrency: u32,
    pub webgl_vendor: String,
    pub webgl_renderer: String,
}

impl FingerprintProfile {
    #[must_use]
    pub fn for_user_agent(user_agent: &str) -> Self {
        let platform = if user_agent.contains("Windows") {
            "Win32"
        } else if user_agent.contains("Macintosh") {
            "MacIntel"
        } else {
            "Linux x86_64"
        };
        Self {
            accept_language: "en-US,en;q=0.9".to_string(),
            platform: platform.to_string(),
            languages: vec!["en-US".to_string(), "en".to_string()],
            hardware_concurrency: 8,
            webgl_vendor: "Intel Inc.".to_string(),
            webgl_renderer: "Intel(R) UHD Graphics".to_string(),
        }
    }

    /// `window.__jwProfile = {...}` read by the evasion scripts
    pub fn to_script(&self, session_seed: &str) -> serde_json::Result<String> {
        let mut value = serde_json::to_value(self)?;
        value["sessionSeed"] = serde_json::Value::String(session_seed.to_string());
        Ok(format!(
            "Object.defineProperty(window, '__jwProfile', {{ value: {value}, enumerable: false }});"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_follows_user_agent() {
        let mac = FingerprintProfile::for_user_agent(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_3) AppleWebKit/605.1.15",
        );
        assert_eq!(mac.platform, "MacIntel");
        let linux = FingerprintProfile::for_user_agent("Mozilla/5.0 (X11; Linux x86_64)");
        assert_eq!(linux.platform, "Linux x86_64");
    }

    #[test]
    fn script_embeds_seed() {
        let script = FingerprintProfile::for_user_agent("Windows")
            .to_script("abcd")
            .unwrap();
        assert!(script.contains("\"sessionSeed\":\"abcd\""));
        assert!(script.contains("\"platform\":\"Win32\""));
    }
}
