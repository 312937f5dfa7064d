use std::fmt;

const XML_PROLOG: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Call-control document with a single instruction: bridge the call to a SIP address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialSip {
    sip_url: String,
}

impl DialSip {
    pub fn new(sip_url: impl Into<String>) -> Self {
        Self {
            sip_url: sip_url.into(),
        }
    }
}

impl fmt::Display for DialSip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{XML_PROLOG}<Response><Dial><Sip>{}</Sip></Dial></Response>",
            escape_text(&self.sip_url)
        )
    }
}

fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_dial_sip_document() {
        let doc = DialSip::new("sip:test@localhost:5060").to_string();
        assert_eq!(
            doc,
            r#"<?xml version="1.0" encoding="UTF-8"?><Response><Dial><Sip>sip:test@localhost:5060</Sip></Dial></Response>"#
        );
    }

    #[test]
    fn escapes_uri_parameters() {
        let doc = DialSip::new("sip:bob@pbx.example.com?x-a=1&x-b=<2>").to_string();
        assert!(doc.contains("<Sip>sip:bob@pbx.example.com?x-a=1&amp;x-b=&lt;2&gt;</Sip>"));
    }
}
