// src/export/xml.rs

use crate::export::EventExport;

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render rows as the `<logs>` document shown by "show logs".
pub fn to_xml(rows: &[EventExport]) -> String {
    let mut xml = String::from("<logs>\n");
    for r in rows {
        xml.push_str(&format!(
            "  <event id=\"{}\" timestamp=\"{}\">\n",
            r.id,
            escape(&r.timestamp)
        ));
        xml.push_str(&format!("    <name>{}</name>\n", escape(&r.event_name)));
        xml.push_str(&format!("    <note>{}</note>\n", escape(&r.note)));
        xml.push_str(&format!("    <extra>{}</extra>\n", escape(&r.extra)));
        xml.push_str("  </event>\n");
    }
    xml.push_str("</logs>");
    xml
}
