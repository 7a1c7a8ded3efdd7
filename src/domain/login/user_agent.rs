// src/domain/login/user_agent.rs

/// Browser and platform as guessed from a `User-Agent` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSoftware {
    pub browser: Option<String>,
    pub version: Option<String>,
    pub platform: Option<String>,
}

// Order matters: Edge and Opera also announce Chrome, Chrome announces Safari.
const BROWSERS: &[(&str, &str)] = &[
    ("Edg/", "Edge"),
    ("Edge/", "Edge"),
    ("OPR/", "Opera"),
    ("Opera/", "Opera"),
    ("Firefox/", "Firefox"),
    ("FxiOS/", "Firefox"),
    ("CriOS/", "Chrome"),
    ("Chrome/", "Chrome"),
    ("Version/", "Safari"),
    ("MSIE ", "Internet Explorer"),
    ("rv:", "Internet Explorer"),
    ("curl/", "curl"),
    ("Wget/", "Wget"),
];

const PLATFORMS: &[(&str, &str)] = &[
    ("CrOS", "ChromeOS"),
    ("Android", "Android"),
    ("iPhone", "iOS"),
    ("iPad", "iOS"),
    ("Windows", "Windows"),
    ("Macintosh", "macOS"),
    ("Mac OS X", "macOS"),
    ("Linux", "Linux"),
];

impl ClientSoftware {
    pub fn detect(user_agent: &str) -> Self {
        let ua = user_agent.trim();
        if ua.is_empty() {
            return Self::default();
        }

        let platform = PLATFORMS
            .iter()
            .find(|(needle, _)| ua.contains(needle))
            .map(|(_, name)| (*name).to_string());

        let (browser, version) = Self::detect_browser(ua);

        Self {
            browser,
            version,
            platform,
        }
    }

    fn detect_browser(ua: &str) -> (Option<String>, Option<String>) {
        for (token, name) in BROWSERS {
            if *token == "Version/" && !ua.contains("Safari/") {
                continue;
            }
            if *token == "rv:" && !ua.contains("Trident/") {
                continue;
            }
            if let Some(idx) = ua.find(token) {
                let rest = &ua[idx + token.len()..];
                let version: String = rest
                    .chars()
                    .take_while(|c| c.is_ascii_digit() || *c == '.')
                    .collect();
                let version = (!version.is_empty()).then_some(version);
                return (Some((*name).to_string()), version);
            }
        }
        (None, None)
    }
}
