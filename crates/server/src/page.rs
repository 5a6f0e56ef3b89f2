//! # HTML Page Rendering
//!
//! Renders the single upload page. The left column always holds the upload
//! form; the right column shows the outcome of the last extraction action,
//! whether that is nothing yet, a notice, an error or the extracted invoices.

use base64::{engine::general_purpose, Engine as _};
use pdfjson::{ExtractError, ExtractedDocument};

const PAGE_TITLE: &str = "PDF to JSON Extractor";

const STYLE: &str = r#"
body { margin: 0; font-family: system-ui, sans-serif; background-color: #f0f4f8; color: #2c3e50; }
.layout { display: flex; min-height: 100vh; }
.sidebar { width: 20rem; padding: 1.5rem; background-color: #2c3e50; color: #ecf0f1; }
.sidebar h2, .sidebar h3 { margin-top: 0; }
.sidebar .info { background-color: #34495e; border-radius: 5px; padding: 0.8rem; }
.main { flex: 1; padding: 2rem; }
.main h1 { text-align: center; color: #2c3e50; }
.columns { display: flex; gap: 2rem; }
.col-upload { flex: 1; }
.col-results { flex: 2; }
.subheader { color: #34495e; font-weight: bold; margin-bottom: 1rem; }
.uploader { display: block; background-color: #e0e6ed; padding: 1rem; border: 1px dashed #bdc3c7; border-radius: 5px; text-align: center; cursor: pointer; color: #34495e; }
.uploader:hover { background-color: #d5dbdb; }
.button { display: block; width: 100%; box-sizing: border-box; margin-top: 0.8rem; background-color: #8AAAE5; color: white; font-weight: bold; border-radius: 5px; padding: 0.8rem 1.2rem; border: none; text-align: center; text-decoration: none; cursor: pointer; transition: all 0.3s ease; }
.button:hover { background-color: #2980b9; box-shadow: 0 4px 8px rgba(0,0,0,0.1); }
.success { background-color: #d4efdf; border-radius: 5px; padding: 0.8rem; margin: 0.8rem 0; }
.warning { background-color: #fcf3cf; border-radius: 5px; padding: 0.8rem; margin: 0.8rem 0; }
.error { background-color: #fadbd8; border-radius: 5px; padding: 0.8rem; margin: 0.8rem 0; }
.spinner { display: none; margin: 0.8rem 0; }
details.invoice { background-color: #ecf0f1; border-radius: 5px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); margin-bottom: 0.8rem; padding: 0.8rem; }
details.invoice pre { background-color: #101820; color: #F9E795; padding: 1rem; border-radius: 5px; overflow-x: auto; }
"#;

const SCRIPT: &str = r#"
const input = document.getElementById('files');
const count = document.getElementById('upload-count');
input.addEventListener('change', () => {
  const n = input.files.length;
  count.textContent = n > 0 ? `✅ ${n} file(s) uploaded!` : '';
  count.style.display = n > 0 ? 'block' : 'none';
});
document.getElementById('extract-form').addEventListener('submit', () => {
  if (input.files.length > 0) {
    document.getElementById('spinner').style.display = 'block';
  }
});
"#;

/// The outcome shown in the results column.
#[derive(Debug)]
pub enum ResultsView<'a> {
    Empty,
    Notice(&'a str),
    Error(&'a str),
    Documents(&'a [ExtractedDocument]),
}

/// Escapes text for use in HTML element content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// A `data:` URI carrying the JSON download for one document.
pub fn download_href(json: &str) -> String {
    format!(
        "data:application/json;base64,{}",
        general_purpose::STANDARD.encode(json)
    )
}

fn render_document(doc: &ExtractedDocument) -> Result<String, ExtractError> {
    let json = doc.to_download_json()?;
    Ok(format!(
        r#"<details class="invoice">
  <summary>Invoice {index}</summary>
  <p>Source: {source}</p>
  <pre>{json_display}</pre>
  <a class="button" href="{href}" download="{file_name}" title="Download the extracted JSON data">📥 Download JSON</a>
</details>"#,
        index = doc.index,
        source = escape_html(&doc.source),
        json_display = escape_html(&json),
        href = download_href(&json),
        file_name = escape_html(&doc.file_name),
    ))
}

fn render_results(view: &ResultsView<'_>) -> Result<String, ExtractError> {
    Ok(match view {
        ResultsView::Empty => String::new(),
        ResultsView::Notice(message) => {
            format!(r#"<div class="warning">⚠️ {}</div>"#, escape_html(message))
        }
        ResultsView::Error(message) => {
            format!(r#"<div class="error">❌ {}</div>"#, escape_html(message))
        }
        ResultsView::Documents(documents) => {
            let mut html = String::from(r#"<div class="success">✅ Extraction Complete!</div>"#);
            for doc in documents.iter() {
                html.push('\n');
                html.push_str(&render_document(doc)?);
            }
            html
        }
    })
}

/// Renders the full page with the given results column.
pub fn render_page(view: ResultsView<'_>) -> Result<String, ExtractError> {
    let results = render_results(&view)?;
    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{PAGE_TITLE}</title>
<link rel="icon" href="data:image/svg+xml,<svg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22><text y=%22.9em%22 font-size=%2290%22>📄</text></svg>">
<style>{STYLE}</style>
</head>
<body>
<div class="layout">
<aside class="sidebar">
  <h2>Instructions for User</h2>
  <ol>
    <li><strong>Upload PDFs</strong>: Use the file uploader to select one or more PDF files.</li>
    <li><strong>Extract Data</strong>: Click the 'Extract Data' button to process the files.</li>
    <li><strong>Review Results</strong>: Expand each invoice section to view the extracted JSON data.</li>
    <li><strong>Download JSON</strong>: Use the download buttons to save the extracted data for each invoice.</li>
    <li><strong>Clear Files</strong>: Click 'Clear Files' to reset and upload new files.</li>
  </ol>
  <hr>
  <h3>About</h3>
  <p class="info">This app extracts invoice information from PDF files and converts it to JSON format. It uses AI to analyze the content and structure the data for easy processing.</p>
</aside>
<main class="main">
  <h1>📄 {PAGE_TITLE} 📝</h1>
  <div class="columns">
    <section class="col-upload">
      <div class="subheader">📂 Upload your PDFs</div>
      <form id="extract-form" method="post" action="/extract" enctype="multipart/form-data">
        <label class="uploader" for="files" title="Drag and drop your PDF files here or click to browse">Drag and drop your PDF files here or click to browse
          <input id="files" type="file" name="files" accept=".pdf,application/pdf" multiple>
        </label>
        <div id="upload-count" class="success" style="display: none"></div>
        <button class="button" type="submit">🚀 Extract Data</button>
        <a class="button" href="/">🧹 Clear Files</a>
      </form>
    </section>
    <section class="col-results">
      <div class="subheader">📝 Extracted JSON Data</div>
      <div id="spinner" class="spinner">🤖 Working on it... This may take a few moments.</div>
      {results}
    </section>
  </div>
</main>
</div>
<script>{SCRIPT}</script>
</body>
</html>
"#
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_download_href_round_trips() {
        let href = download_href("{}");
        assert_eq!(href, "data:application/json;base64,e30=");
    }

    #[test]
    fn test_results_page_lists_each_invoice() {
        let docs = vec![
            ExtractedDocument::new(1, "a.pdf", json!({"name": "<ACME>"})),
            ExtractedDocument::new(2, "b.pdf", json!({"name": "Bob"})),
        ];
        let html = render_page(ResultsView::Documents(&docs)).unwrap();

        assert!(html.contains("Extraction Complete!"));
        assert!(html.contains("Invoice 1"));
        assert!(html.contains("Invoice 2"));
        assert!(html.contains(r#"download="extracted_data_1.json""#));
        assert!(html.contains(r#"download="extracted_data_2.json""#));
        assert!(html.contains("&lt;ACME&gt;"));
        assert!(!html.contains("<ACME>"));
    }

    #[test]
    fn test_empty_page_has_form_and_no_results() {
        let html = render_page(ResultsView::Empty).unwrap();
        assert!(html.contains(r#"action="/extract""#));
        assert!(html.contains("Instructions for User"));
        assert!(!html.contains("Extraction Complete!"));
    }
}
