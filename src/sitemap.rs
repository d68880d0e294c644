//! Sitemap `OBJECT` serialization shared by the contents and index files.

use serde::Serialize;

/// Boilerplate opening a contents (`.hhc`) file.
pub const CONTENTS_HEADER: &str = concat!(
    "<!DOCTYPE HTML PUBLIC \"-//IETF//DTD HTML//EN\">\n",
    "<HTML><HEAD><meta name=\"GENERATOR\" content=\"Microsoft&reg; HTML Help Workshop 4.1\">\n",
    "<!-- Sitemap 1.0 -->\n",
    "</HEAD><BODY><OBJECT type=\"text/site properties\"><param name=\"ImageType\" value=\"Folder\"></OBJECT><UL>",
);

/// Boilerplate opening an index (`.hhk`) file.
pub const INDEX_HEADER: &str = concat!(
    "<!DOCTYPE HTML PUBLIC \"-//IETF//DTD HTML//EN\">\n",
    "<HTML><HEAD><meta name=\"GENERATOR\" content=\"Microsoft&reg; HTML Help Workshop 4.1\">\n",
    "<!-- Sitemap 1.0 -->\n",
    "</HEAD><BODY><UL>",
);

/// Closes both contents and index files.
pub const FOOTER: &str = "</UL></BODY></HTML>";

pub const GROUP_OPEN: &str = "<UL>";
pub const GROUP_CLOSE: &str = "</UL>";

/// One topic line in a contents or index file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicEntry {
    /// Display name.
    pub name: String,
    /// Archive address of the page, if the topic has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<String>,
    /// Icon number from the compiler's image list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<u32>,
}

impl TopicEntry {
    /// A topic pointing at a page.
    pub fn page(name: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local: Some(local.into()),
            image: None,
        }
    }

    /// A heading with no page of its own.
    pub fn header(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            local: None,
            image: None,
        }
    }

    pub fn with_image(mut self, image: u32) -> Self {
        self.image = Some(image);
        self
    }

    fn has_local(&self) -> bool {
        self.local.as_deref().is_some_and(|l| !l.is_empty())
    }

    /// Contents entries need at least a name.
    pub fn is_contents_entry(&self) -> bool {
        !self.name.is_empty()
    }

    /// Index entries need a name and an address.
    pub fn is_index_entry(&self) -> bool {
        !self.name.is_empty() && self.has_local()
    }

    /// Render as a `text/sitemap` object, omitting empty parameters.
    ///
    /// ```
    /// use genchm::sitemap::TopicEntry;
    ///
    /// let entry = TopicEntry::page("intro", "site/intro.html");
    /// assert_eq!(
    ///     entry.to_object(),
    ///     r#"<OBJECT type="text/sitemap"><param name="Name" value="intro"><param name="Local" value="site/intro.html"></OBJECT>"#
    /// );
    /// ```
    pub fn to_object(&self) -> String {
        let mut out = String::from("<OBJECT type=\"text/sitemap\">");
        if !self.name.is_empty() {
            push_param(&mut out, "Name", &self.name);
        }
        if let Some(local) = self.local.as_deref().filter(|l| !l.is_empty()) {
            push_param(&mut out, "Local", local);
        }
        if let Some(image) = self.image {
            push_param(&mut out, "ImageNumber", &image.to_string());
        }
        out.push_str("</OBJECT>");
        out
    }

    /// Render as a list item line.
    pub fn to_list_item(&self) -> String {
        format!("<LI>{}", self.to_object())
    }
}

fn push_param(out: &mut String, name: &str, value: &str) {
    out.push_str("<param name=\"");
    out.push_str(name);
    out.push_str("\" value=\"");
    out.push_str(&escape_attr(value));
    out.push_str("\">");
}

/// Escape a string for use inside a double-quoted attribute.
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
