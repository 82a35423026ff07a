//! Automation-hiding launch flags and page scripts.

/// Chrome flags applied to every launch.
pub const STEALTH_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-web-security",
    "--disable-features=IsolateOrigins,site-per-process",
    "--disable-blink-features=AutomationControlled",
    "--disable-infobars",
    "--disable-dev-shm-usage",
    "--no-first-run",
    "--no-default-browser-check",
    "--disable-gpu",
];

/// Scripts registered to run before any page script on each new document.
pub const STEALTH_SCRIPTS: &[&str] = &[
    // Report as not automated
    r#"
    Object.defineProperty(navigator, 'webdriver', {
        get: () => false,
        configurable: true
    });
    "#,
    // Non-empty plugin list
    r#"
    Object.defineProperty(navigator, 'plugins', {
        get: () => [
            { name: 'Chrome PDF Plugin', filename: 'internal-pdf-viewer', description: 'Portable Document Format' },
            { name: 'Chrome PDF Viewer', filename: 'mhjfbmdgcfjbbpaeojofohoefgiehjai', description: '' },
            { name: 'Native Client', filename: 'internal-nacl-plugin', description: '' }
        ],
        configurable: true
    });
    "#,
    r#"
    Object.defineProperty(navigator, 'languages', {
        get: () => ['en-US', 'en'],
        configurable: true
    });
    "#,
    r#"
    if (!window.chrome) {
        window.chrome = { runtime: {} };
    }
    "#,
];
