use url::Url;

use crate::errors::{PodcastError, PodcastResult};

/// Feed metadata plus its items, in the order the source served them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Channel {
    pub title: String,
    pub link: String,
    pub description: String,
    pub last_build_date: String,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    pub title: String,
    pub link: String,
    pub guid: String,
    pub pub_date: String,
    pub author: String,
    pub description: String,
    pub enclosures: Vec<Enclosure>,
}

impl Item {
    pub fn has_enclosures(&self) -> bool {
        !self.enclosures.is_empty()
    }
}

/// One downloadable payload attached to an item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enclosure {
    pub url: String,
    pub length: Option<u64>,
    pub mime_type: String,
}

impl Enclosure {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            length: None,
            mime_type: String::new(),
        }
    }

    /// Scheme, host (and port) and path only; query string and fragment are dropped.
    pub fn normalized_url(&self) -> PodcastResult<String> {
        let parsed = Url::parse(self.url.trim())
            .map_err(|e| PodcastError::InvalidUrl(format!("{}: {}", self.url, e)))?;

        let host = parsed.host_str().unwrap_or_default();
        let port = parsed.port().map(|p| format!(":{}", p)).unwrap_or_default();

        Ok(format!("{}://{}{}{}", parsed.scheme(), host, port, parsed.path()))
    }

    /// The directive for this enclosure. An unparseable URL keeps its directive
    /// with an empty target and the raw URL as source.
    pub fn directive(&self) -> Directive {
        match self.normalized_url() {
            Ok(source) => Directive {
                target: last_segment(&source).to_string(),
                source,
            },
            Err(_) => Directive {
                target: String::new(),
                source: self.url.trim().to_string(),
            },
        }
    }
}

fn last_segment(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or_default()
}

/// A `wget -O <target> <source>` download line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub target: String,
    pub source: String,
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "wget -O {} {}", self.target, self.source)
    }
}
