//! Server-side HTML rendering for the single page of the UI.
//!
//! The page has three states: idle (form only), failed (form + inline error)
//! and succeeded (form + success box + five tabs). Tabs are pure CSS radio
//! buttons, so the only script on the page is the submit indicator.

use crate::error::ConvertError;
use crate::output::{Artifact, ConversionOutput};
use std::fmt::Write;

/// What the page is showing below the form.
pub enum Outcome<'a> {
    Idle,
    Failed(&'a ConvertError),
    Succeeded(&'a ConversionOutput),
}

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = r#"<style>
  body { font-family: system-ui, -apple-system, sans-serif; margin: 0 auto; max-width: 1100px; padding: 1.5rem; color: #1f2937; }
  .main-header { font-size: 3rem; font-weight: 700; text-align: center; margin-bottom: 1rem;
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    -webkit-background-clip: text; background-clip: text; -webkit-text-fill-color: transparent; }
  .subtitle { text-align: center; }
  details.howto { margin: 1rem 0; }
  form .fields { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
  form label { display: block; font-weight: 600; margin-bottom: .25rem; }
  form input[type=text], form input[type=password] { width: 100%; box-sizing: border-box; padding: .5rem; }
  .btn { display: inline-block; width: 100%; box-sizing: border-box; margin-top: 1rem; padding: .75rem;
    border: 0; border-radius: 8px; background: #667eea; color: #fff; font-size: 1rem; text-align: center;
    text-decoration: none; cursor: pointer; }
  .btn[disabled], .btn.disabled { background: #9ca3af; cursor: not-allowed; }
  .success-box { padding: 2rem; background: #f0f9ff; border-radius: 10px; border-left: 4px solid #10b981; margin: 1rem 0; }
  .error-box { padding: 1rem; background: #fef2f2; border-radius: 10px; border-left: 4px solid #dc2626; margin: 1rem 0; white-space: pre-wrap; }
  .warning { padding: .75rem; background: #fffbeb; border-left: 4px solid #f59e0b; border-radius: 6px; }
  .info { padding: .75rem; background: #eff6ff; border-left: 4px solid #3b82f6; border-radius: 6px; }
  pre.code { background: #111827; color: #e5e7eb; padding: 1rem; border-radius: 8px; overflow: auto; max-height: 600px; }
  .tabs > input { display: none; }
  .tabs > label { display: inline-block; padding: .5rem 1rem; cursor: pointer; border-bottom: 2px solid transparent; }
  .tabs > input:checked + label { border-bottom-color: #667eea; font-weight: 600; }
  .tabs > .panel { display: none; padding-top: 1rem; }
  #tab-preview:checked ~ #panel-preview,
  #tab-html:checked ~ #panel-html,
  #tab-css:checked ~ #panel-css,
  #tab-files:checked ~ #panel-files,
  #tab-download:checked ~ #panel-download { display: block; }
  iframe.preview { width: 100%; height: 600px; border: 1px solid #e5e7eb; border-radius: 8px; }
  table.files td { padding: .25rem 1rem .25rem 0; }
  .downloads { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
  footer { margin-top: 2rem; text-align: center; color: #666; }
</style>"#;

const HOWTO: &str = r#"<details class="howto"><summary>📋 How to use</summary>
<ol>
  <li><strong>Get your Figma Access Token</strong> from <a href="https://www.figma.com/settings" target="_blank" rel="noopener">Account Settings → Personal Access Tokens</a></li>
  <li><strong>Copy your Figma file URL</strong> (should look like: <code>https://figma.com/design/ABC123/Project-Name</code>)</li>
  <li><strong>Paste both below</strong> and click Convert</li>
  <li><strong>View and download</strong> your generated HTML and CSS files</li>
</ol>
</details>"#;

const SUBMIT_SCRIPT: &str = r#"<script>
document.getElementById('convert-form').addEventListener('submit', function () {
  var b = document.getElementById('convert-btn');
  b.disabled = true;
  b.textContent = '🔄 Converting your Figma design… This may take a moment.';
});
</script>"#;

/// Render the whole page.
///
/// `figma_url` pre-fills the URL field; the token field is always empty.
pub fn render_page(figma_url: &str, outcome: &Outcome<'_>) -> String {
    let mut html = String::with_capacity(8 * 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>Figma to HTML Converter</title>\n");
    html.push_str(STYLE);
    html.push_str("\n</head>\n<body>\n");
    html.push_str("<h1 class=\"main-header\">🎨 Figma to HTML Converter</h1>\n");
    html.push_str(
        "<p class=\"subtitle\">Convert your Figma designs to clean HTML/CSS code instantly!</p>\n",
    );
    html.push_str(HOWTO);
    render_form(&mut html, figma_url);

    match outcome {
        Outcome::Idle => {}
        Outcome::Failed(err) => render_error(&mut html, err),
        Outcome::Succeeded(out) => render_results(&mut html, out),
    }

    html.push_str("<footer><hr>figma2html-web</footer>\n");
    html.push_str(SUBMIT_SCRIPT);
    html.push_str("\n</body>\n</html>\n");
    html
}

fn render_form(html: &mut String, figma_url: &str) {
    let _ = write!(
        html,
        r#"<form id="convert-form" method="post" action="/convert">
<div class="fields">
  <div>
    <label for="access_token">Figma Access Token</label>
    <input type="password" id="access_token" name="access_token" autocomplete="off"
      placeholder="figd_xxxxxxxxxxxxxxxxxxxxxxxx"
      title="Get this from Figma Account Settings → Personal Access Tokens">
  </div>
  <div>
    <label for="figma_url">Figma File URL</label>
    <input type="text" id="figma_url" name="figma_url" value="{}"
      placeholder="https://figma.com/design/ABC123/Project-Name"
      title="Paste your Figma design URL here">
  </div>
</div>
<button type="submit" id="convert-btn" class="btn">🚀 Convert to HTML/CSS</button>
</form>
"#,
        escape_html(figma_url)
    );
}

fn render_error(html: &mut String, err: &ConvertError) {
    let _ = writeln!(
        html,
        "<div class=\"error-box\" role=\"alert\">❌ {}</div>",
        escape_html(&err.to_string())
    );
}

fn render_results(html: &mut String, out: &ConversionOutput) {
    let _ = write!(
        html,
        r#"<div class="success-box">
<h3>✅ Conversion Successful!</h3>
<p>Generated HTML and CSS files in <code>{dir}</code> (run <code>{run}</code>)</p>
<p><strong>{count}</strong> elements converted from your Figma design.</p>
</div>
"#,
        dir = escape_html(&out.output_dir),
        run = escape_html(&out.run_id),
        count = out.stats.element_count,
    );

    for err in out.artifact_errors() {
        let _ = writeln!(
            html,
            "<div class=\"error-box\" role=\"alert\">❌ {}</div>",
            escape_html(&err.to_string())
        );
    }

    html.push_str("<div class=\"tabs\">\n");
    for (id, label, checked) in [
        ("preview", "👁️ Live Preview", true),
        ("html", "📄 HTML Preview", false),
        ("css", "🎨 CSS Preview", false),
        ("files", "📁 File Browser", false),
        ("download", "⬇️ Download", false),
    ] {
        let _ = writeln!(
            html,
            "<input type=\"radio\" name=\"tab\" id=\"tab-{id}\"{}><label for=\"tab-{id}\">{label}</label>",
            if checked { " checked" } else { "" }
        );
    }

    render_preview_panel(html, out);
    render_source_panel(html, "html", "Generated HTML", &out.markup, "No HTML file generated");
    render_source_panel(html, "css", "Generated CSS", &out.stylesheet, "No CSS file generated");
    render_files_panel(html, out);
    render_download_panel(html, out);
    html.push_str("</div>\n");

    if !out.log.is_empty() {
        let _ = writeln!(
            html,
            "<details><summary>Converter output</summary><pre class=\"code\">{}</pre></details>",
            escape_html(&out.log)
        );
    }
}

fn render_preview_panel(html: &mut String, out: &ConversionOutput) {
    html.push_str("<section class=\"panel\" id=\"panel-preview\">\n<h3>Live Preview</h3>\n");
    if out.markup.is_empty() {
        html.push_str("<p class=\"info\">Preview not available - missing HTML content</p>\n");
    } else {
        let _ = writeln!(
            html,
            "<iframe class=\"preview\" sandbox src=\"/runs/{}/preview\" title=\"Live preview\"></iframe>",
            escape_html(&out.run_id)
        );
    }
    html.push_str("</section>\n");
}

fn render_source_panel(html: &mut String, id: &str, title: &str, artifact: &Artifact, empty: &str) {
    let _ = writeln!(html, "<section class=\"panel\" id=\"panel-{id}\">\n<h3>{title}</h3>");
    if artifact.is_empty() {
        let _ = writeln!(html, "<p class=\"warning\">{empty}</p>");
    } else {
        let _ = writeln!(
            html,
            "<pre class=\"code\"><code class=\"language-{id}\">{}</code></pre>",
            escape_html(&artifact.content)
        );
    }
    html.push_str("</section>\n");
}

fn render_files_panel(html: &mut String, out: &ConversionOutput) {
    html.push_str("<section class=\"panel\" id=\"panel-files\">\n<h3>Generated Files</h3>\n");
    if out.files.is_empty() {
        html.push_str("<p class=\"info\">No files found in output directory</p>\n");
    } else {
        html.push_str("<table class=\"files\">\n");
        for f in &out.files {
            let _ = writeln!(
                html,
                "<tr><td>📄 {}</td><td>({} bytes)</td></tr>",
                escape_html(&f.name),
                f.size
            );
        }
        html.push_str("</table>\n");
    }
    html.push_str("</section>\n");
}

fn render_download_panel(html: &mut String, out: &ConversionOutput) {
    html.push_str(
        "<section class=\"panel\" id=\"panel-download\">\n<h3>Download Files</h3>\n<div class=\"downloads\">\n",
    );
    for (kind, label, artifact, empty) in [
        ("markup", "📄 Download HTML", &out.markup, "No HTML content to download"),
        ("stylesheet", "🎨 Download CSS", &out.stylesheet, "No CSS content to download"),
    ] {
        html.push_str("<div>\n");
        if artifact.is_empty() {
            let _ = writeln!(
                html,
                "<span class=\"btn disabled\" aria-disabled=\"true\">{label}</span>\n<p class=\"warning\">{empty}</p>"
            );
        } else {
            let _ = writeln!(
                html,
                "<a class=\"btn\" href=\"/runs/{}/download/{kind}\" download=\"{}\">{label}</a>",
                escape_html(&out.run_id),
                escape_html(&artifact.file_name)
            );
        }
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n</section>\n");
}
