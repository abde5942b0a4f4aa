/// Shown until the first game of a session has been generated.
pub const PLACEHOLDER_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Game Architect</title>
<style>
  body { margin: 0; min-height: 100vh; display: flex; align-items: center; justify-content: center;
         background: #0f172a; color: #e2e8f0; font-family: system-ui, sans-serif; }
  main { max-width: 32rem; padding: 2rem; }
  h1 { margin-top: 0; color: #38bdf8; }
  li { margin: 0.4rem 0; }
</style>
</head>
<body>
<main>
  <h1>Game Architect</h1>
  <p>Describe a game and the Architect will build it as a single playable page. Keep chatting to refine it.</p>
  <p>Try one of these:</p>
  <ul>
    <li>A retro space shooter with waves of enemies and power-ups</li>
    <li>Snake, but the board wraps around and speeds up every 5 apples</li>
    <li>A one-button endless runner with a day/night cycle</li>
  </ul>
</main>
</body>
</html>
"#;

/// Sandbox flags for the preview frame: scripts and pointer lock, nothing else.
pub const SANDBOX_FLAGS: &str = "allow-scripts allow-pointer-lock";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PreviewDocument {
    #[default]
    Placeholder,
    Game(String),
}

impl PreviewDocument {
    pub fn html(&self) -> &str {
        match self {
            PreviewDocument::Placeholder => PLACEHOLDER_HTML,
            PreviewDocument::Game(html) => html,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, PreviewDocument::Placeholder)
    }
}

fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Host page embedding `document` in a sandboxed frame. Without
/// `allow-same-origin` or `allow-top-navigation` the game can run but cannot
/// reach the host page or navigate it.
pub fn render_sandbox_page(document: &PreviewDocument) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>Game Architect preview</title>\n\
<style>html, body {{ margin: 0; height: 100%; background: #000; }} iframe {{ border: 0; width: 100%; height: 100%; }}</style>\n\
</head>\n<body>\n<iframe title=\"Game preview\" sandbox=\"{}\" srcdoc=\"{}\"></iframe>\n</body>\n</html>\n",
        SANDBOX_FLAGS,
        escape_attr(document.html())
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_stable_across_renders() {
        let doc = PreviewDocument::default();
        assert!(doc.is_placeholder());
        assert_eq!(render_sandbox_page(&doc), render_sandbox_page(&PreviewDocument::Placeholder));
        assert_eq!(doc.html(), PLACEHOLDER_HTML);
    }

    #[test]
    fn sandbox_page_escapes_untrusted_document() {
        let doc = PreviewDocument::Game(r#"<p class="x">a & b</p>"#.into());
        let page = render_sandbox_page(&doc);

        assert!(page.contains(r#"sandbox="allow-scripts allow-pointer-lock""#));
        assert!(page.contains("srcdoc=\"&lt;p class=&quot;x&quot;&gt;a &amp; b&lt;/p&gt;\""));
        assert!(!page.contains("allow-top-navigation"));
        assert!(!page.contains("allow-same-origin"));
    }
}
