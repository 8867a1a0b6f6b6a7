//! Document Exporter: serializes a report into a self-contained
//! Word-compatible HTML file. The output opens in common word processors when
//! saved with a `.doc` extension; a byte-order marker prefix keeps non-Latin
//! text rendering correctly.

use crate::domain::{Report, locale};

#[derive(Debug, Clone)]
pub struct ExportedDoc {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Produces the downloadable document. Synchronous, infallible: a missing
/// logo gets a placeholder heading, everything else is plain templating.
pub fn to_word_doc(report: &Report) -> ExportedDoc {
    let language = report.language;
    let is_rtl = language.is_rtl();
    let dir = if is_rtl { "rtl" } else { "ltr" };
    let align_start = if is_rtl { "right" } else { "left" };
    let align_end = if is_rtl { "left" } else { "right" };
    let body_font = if is_rtl {
        "'Simplified Arabic', 'Times New Roman', serif"
    } else {
        "'Times New Roman', serif"
    };

    let date_str = locale::long_date(language, report.created_at);
    let localized_type = locale::type_label(language, report.kind);

    let logo_block = match &report.logo_url {
        Some(url) => format!(r#"<img src="{url}" style="max-height: 90px; width: auto;" />"#),
        None => format!(
            r#"<h2 style="margin:0; color:#2d3748;">{}</h2>"#,
            locale::document_heading(language)
        ),
    };

    // Line breaks become hard breaks; word processors collapse raw newlines.
    let content_html = report.content.replace('\n', "<br/>");

    let html = format!(
        r#"<html xmlns:o='urn:schemas-microsoft-com:office:office' xmlns:w='urn:schemas-microsoft-com:office:word' xmlns='http://www.w3.org/TR/REC-html40'>
<head>
  <meta charset="utf-8">
  <style>
    @page {{ size: A4; margin: 1.25in 1in 1in 1in; }}
    body {{
      font-family: {body_font};
      direction: {dir};
      line-height: 1.6;
      color: #1a1a1a;
      font-size: 13pt;
    }}
    .header-section {{ width: 100%; border-bottom: 2px solid #2d3748; margin-bottom: 40px; padding-bottom: 20px; }}
    .header-table {{ width: 100%; border-collapse: collapse; }}
    .logo-cell {{ width: 50%; text-align: {align_start}; }}
    .meta-cell {{ width: 50%; text-align: {align_end}; font-size: 10pt; color: #4a5568; }}
    .title-block {{ text-align: center; margin: 40px 0; }}
    .doc-type {{ font-size: 16pt; font-weight: bold; color: #2d3748; text-decoration: underline; text-transform: uppercase; }}
    .subject-line {{ font-weight: bold; font-size: 14pt; margin-bottom: 30px; border-bottom: 1px solid #e2e8f0; padding-bottom: 10px; }}
    .content-body {{ text-align: justify; margin-bottom: 60px; white-space: pre-wrap; }}
    .signature-section {{ margin-top: 50px; text-align: {align_end}; padding-{align_end}: 60px; }}
    .signature-line {{ font-weight: bold; font-size: 14pt; margin-top: 10px; display: block; }}
    .footer-note {{ margin-top: 100px; font-size: 8pt; color: #a0aec0; text-align: center; border-top: 1px solid #edf2f7; padding-top: 10px; }}
  </style>
</head>
<body>
  <div class="header-section">
    <table class="header-table">
      <tr>
        <td class="logo-cell">{logo_block}</td>
        <td class="meta-cell">
          <div style="font-weight:bold;">{date_str}</div>
          <div>{ref_label}: {ref_code}</div>
          <div>{class_label}</div>
        </td>
      </tr>
    </table>
  </div>

  <div class="title-block">
    <div class="doc-type">{localized_type}</div>
  </div>

  <div class="subject-line">{subject_label}: {title}</div>

  <div class="content-body">{content_html}</div>

  <div class="signature-section">
    <p>{closing}</p>
    <br/><br/>
    <span class="signature-line">{sender}</span>
    <p style="font-size: 10pt; color: #718096; margin-top:5px;">{localized_type}</p>
  </div>

  <div class="footer-note">{footer}</div>
</body>
</html>"#,
        ref_label = locale::reference_label(language),
        ref_code = report.reference_code(),
        class_label = locale::classification_label(language),
        subject_label = locale::subject_label(language),
        title = report.title,
        closing = locale::closing_line(language),
        sender = report.sender_name,
        footer = locale::footer_note(language),
    );

    ExportedDoc {
        filename: format!("{}_{}.doc", sanitize_title(&report.title), date_str),
        bytes: format!("\u{feff}{html}").into_bytes(),
    }
}

/// Collapses whitespace runs to underscores and strips path-hostile
/// characters so the title is safe as a filename stem.
fn sanitize_title(title: &str) -> String {
    let collapsed: String = title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    collapsed
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect()
}

/// RFC 5987 `filename*` value for non-ASCII download names.
pub fn encode_rfc5987(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
