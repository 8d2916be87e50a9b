use html_escape::encode_safe;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub const DEFAULT_LABEL: &str = "Download Link";
pub const DEFAULT_FILENAME: &str = "download.txt";
pub const DEFAULT_PROXY_BASE: &str = "/wp-content/plugins/wordpress-aws-signed-pdf-download";

/// Same unreserved set as PHP's `urlencode`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Label and suggested filename for a rendered download link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub label: String,
    pub filename: String,
}

impl Default for DownloadLink {
    fn default() -> Self {
        Self {
            label: DEFAULT_LABEL.to_string(),
            filename: DEFAULT_FILENAME.to_string(),
        }
    }
}

impl DownloadLink {
    /// Read `label` and `filename` from shortcode-style attributes, falling
    /// back to the defaults. Unknown attributes are ignored.
    pub fn from_attributes<'a>(attrs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut link = Self::default();
        for (name, value) in attrs {
            match name {
                "label" => link.label = value.to_string(),
                "filename" => link.filename = value.to_string(),
                _ => {}
            }
        }
        link
    }
}

/// Render a paragraph linking to the download proxy for `url`.
pub fn render_download_link(url: &str, link: &DownloadLink, proxy_base: &str) -> String {
    let base = proxy_base.trim_end_matches('/');
    let filename = utf8_percent_encode(&link.filename, QUERY_VALUE);
    let target = utf8_percent_encode(url, QUERY_VALUE);
    format!(
        "<p><a href='{base}/download.php?filename={filename}&downloadUrl={target}'>{}</a></p>",
        encode_safe(&link.label)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_shortcode() {
        let link = DownloadLink::from_attributes(Vec::<(&str, &str)>::new());
        assert_eq!(link.label, "Download Link");
        assert_eq!(link.filename, "download.txt");
    }

    #[test]
    fn attributes_override_defaults() {
        let link =
            DownloadLink::from_attributes([("label", "Get it"), ("size", "big"), ("filename", "a.pdf")]);
        assert_eq!(
            link,
            DownloadLink {
                label: "Get it".into(),
                filename: "a.pdf".into(),
            }
        );
    }

    #[test]
    fn renders_proxy_link_with_encoded_url() {
        let html = render_download_link(
            "https://cdn.example.com/f.pdf?Expires=1&Signature=a~b_&Key-Pair-Id=K",
            &DownloadLink::default(),
            DEFAULT_PROXY_BASE,
        );
        assert_eq!(
            html,
            "<p><a href='/wp-content/plugins/wordpress-aws-signed-pdf-download/download.php\
             ?filename=download.txt&downloadUrl=https%3A%2F%2Fcdn.example.com%2Ff.pdf%3FExpires%3D1\
             %26Signature%3Da%7Eb_%26Key-Pair-Id%3DK'>Download Link</a></p>"
        );
    }

    #[test]
    fn label_is_escaped_and_filename_encoded() {
        let link = DownloadLink {
            label: "<b>'Q&A'</b> \"now\"".into(),
            filename: "my report.pdf".into(),
        };
        let html = render_download_link("u", &link, "/proxy/");
        assert!(html.contains("href='/proxy/download.php?filename=my%20report.pdf&downloadUrl=u'"));
        assert!(html.ends_with(
            ">&lt;b&gt;&#x27;Q&amp;A&#x27;&lt;&#x2F;b&gt; &quot;now&quot;</a></p>"
        ));
    }

    #[test]
    fn label_cannot_break_out_of_anchor() {
        let link = DownloadLink {
            label: "x</a><script>alert(1)</script>".into(),
            filename: DEFAULT_FILENAME.into(),
        };
        let html = render_download_link("u", &link, DEFAULT_PROXY_BASE);
        assert!(!html.contains("<script>"));
        assert_eq!(html.matches("</a>").count(), 1);
    }
}
