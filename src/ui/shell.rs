//! Page layout: header, tab bar, the active input panel, and the result slot.

use super::result_view::render_slot;
use super::{Tab, escape_html};
use crate::analysis::TransFatResult;

/// Everything one full page render needs.
#[derive(Debug, Default)]
pub struct Page<'a> {
    pub active: Tab,
    pub result: Option<&'a TransFatResult>,
    pub notice: Option<&'a str>,
    /// Barcode the result was looked up for.
    pub scanned: Option<&'a str>,
    /// Previous search text, echoed back into the search box.
    pub query: &'a str,
}

impl Page<'_> {
    /// Contents of the result slot, also sent alone to HTMX requests.
    #[must_use]
    pub fn slot(&self) -> String {
        let mut out = String::new();
        if let Some(code) = self.scanned {
            out.push_str(&format!(
                r#"<div class="scanned" role="status">✓ Scanned: {}</div>"#,
                escape_html(code)
            ));
        }
        out.push_str(&render_slot(self.result, self.notice));
        out
    }
}

/// Render a complete HTML document.
#[must_use]
pub fn render_page(page: &Page<'_>) -> String {
    let tabs: String = Tab::ALL
        .iter()
        .map(|&tab| {
            let current = if tab == page.active {
                r#" class="tab active" aria-current="page""#
            } else {
                r#" class="tab""#
            };
            format!(
                r#"<a href="/?tab={slug}"{current}>{label}</a>"#,
                slug = tab.slug(),
                label = tab.label()
            )
        })
        .collect();

    let panel = match page.active {
        Tab::Search => search_panel(page.query),
        Tab::Scan => SCAN_PANEL.to_string(),
        Tab::Upload => UPLOAD_PANEL.to_string(),
    };

    let slot = page.slot();
    let version = env!("CARGO_PKG_VERSION");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Check food products for trans fats">
    <title>Trans Fat Detector</title>
    <script src="https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js" defer></script>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body>
    <header class="site-header">
        <h1>Trans Fat Detector</h1>
        <p>Is your snack hiding something? 🍪🔍</p>
    </header>
    <main>
        <nav class="tabs">{tabs}</nav>
        <section class="panel" id="panel-{slug}">{panel}</section>
        <div id="result" aria-live="polite">{slot}</div>
    </main>
    <footer class="site-footer">
        <p>Made with ❤️ to help you make healthier choices</p>
        <p class="tip">Consumption of trans fats is associated with increased risk for cardiovascular diseases. Artificial trans fats are highly regulated or banned in many countries. However, they are still widely consumed in developing nations where they are associated with increased risk of diabetes, cardiovascular diseases, and death.</p>
        <p><a href="https://en.wikipedia.org/wiki/Trans_fat" target="_blank" rel="noopener noreferrer">Learn more about Trans Fats and why they're not awesome</a></p>
        <p class="version">Version {version} - Powered by Anthropic</p>
    </footer>
</body>
</html>"#,
        slug = page.active.slug(),
    )
}

fn search_panel(query: &str) -> String {
    format!(
        r##"<div class="panel-heading">
    <h2>Search by Name</h2>
    <p>Type in a food brand or product name</p>
</div>
<form method="post" action="/ui/search" hx-post="/ui/search" hx-target="#result" hx-disabled-elt="find button">
    <label for="q">Product name or ingredients</label>
    <div class="row">
        <input id="q" name="q" type="text" value="{value}" placeholder="Try 'Oreos' or 'Doritos'..." autocomplete="off">
        <button type="submit">Analyze<span class="htmx-indicator"> ...</span></button>
    </div>
    <p class="tip">💡 Tip: Try searching for popular snack brands or packaged foods</p>
</form>"##,
        value = escape_html(query)
    )
}

/// Camera decoding runs in the browser; the decoded text is posted as `code`.
const SCAN_PANEL: &str = r##"<div class="panel-heading">
    <h2>Scan Barcode</h2>
    <p>Use your camera to scan a product barcode</p>
</div>
<form method="post" action="/ui/barcode" hx-post="/ui/barcode" hx-target="#result" hx-disabled-elt="find button">
    <div class="camera">
        <div id="barcode-reader"></div>
        <p id="camera-error" class="notice" role="alert" hidden>Unable to access camera. Please check permissions.</p>
        <button type="button" id="camera-toggle">Start Camera</button>
    </div>
    <label for="code">Or type the barcode number</label>
    <div class="row">
        <input id="code" name="code" type="text" inputmode="numeric" placeholder="e.g. 0123456789012" autocomplete="off">
        <button type="submit">Look up<span class="htmx-indicator"> ...</span></button>
    </div>
    <p class="tip">📱 Tip: Hold the barcode steady in front of your camera</p>
</form>
<script src="https://unpkg.com/html5-qrcode@2.3.8/html5-qrcode.min.js" defer></script>
<script>
(() => {
    const toggle = document.getElementById("camera-toggle");
    const error = document.getElementById("camera-error");
    const input = document.getElementById("code");
    let scanner = null;

    async function stop() {
        if (scanner) {
            try {
                await scanner.stop();
                scanner.clear();
            } catch (e) {
                console.error("Error stopping scanner:", e);
            }
            scanner = null;
        }
        toggle.textContent = "Start Camera";
    }

    async function start() {
        error.hidden = true;
        try {
            scanner = new Html5Qrcode("barcode-reader");
            await scanner.start(
                { facingMode: "environment" },
                { fps: 10, qrbox: { width: 250, height: 250 } },
                async (decoded) => {
                    await stop();
                    input.value = decoded;
                    input.form.requestSubmit();
                },
                () => {}
            );
            toggle.textContent = "Stop Scanning";
        } catch (e) {
            console.error(e);
            scanner = null;
            error.hidden = false;
        }
    }

    toggle.addEventListener("click", () => (scanner ? stop() : start()));
})();
</script>"##;

const UPLOAD_PANEL: &str = r##"<div class="panel-heading">
    <h2>Upload Image</h2>
    <p>Take a photo of the ingredients label</p>
</div>
<form method="post" action="/ui/upload" enctype="multipart/form-data" hx-post="/ui/upload" hx-encoding="multipart/form-data" hx-target="#result" hx-disabled-elt="find button">
    <label for="image">Photo of the ingredients label</label>
    <div class="row">
        <input id="image" name="image" type="file" accept="image/*" capture="environment">
        <button type="submit">Analyze<span class="htmx-indicator"> ...</span></button>
    </div>
    <p class="tip">📸 Tip: Make sure the ingredients list is clear and well-lit</p>
</form>"##;
