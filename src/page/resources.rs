use crate::api::ResourceLink;

use super::NO_SOURCES_TEXT;

/// A resource link ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLink {
    pub href: String,
    pub label: String,
}

impl From<&ResourceLink> for RenderedLink {
    fn from(link: &ResourceLink) -> Self {
        Self {
            href: link.href().to_string(),
            label: link.label().to_string(),
        }
    }
}

/// The sources panel under the generated code.
///
/// An empty list is never shown as an empty list: it is the explicit
/// [`ResourcesPanel::NoSources`] placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResourcesPanel {
    /// Cleared, nothing to show yet.
    #[default]
    Blank,
    NoSources,
    Links(Vec<RenderedLink>),
}

impl ResourcesPanel {
    pub fn from_links(links: &[ResourceLink]) -> Self {
        if links.is_empty() {
            Self::NoSources
        } else {
            Self::Links(links.iter().map(RenderedLink::from).collect())
        }
    }

    /// Rendered links, empty for the placeholder variants.
    pub fn links(&self) -> &[RenderedLink] {
        match self {
            Self::Links(links) => links,
            Self::Blank | Self::NoSources => &[],
        }
    }

    /// Placeholder text, if this panel shows one.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::NoSources => Some(NO_SOURCES_TEXT),
            Self::Blank | Self::Links(_) => None,
        }
    }
}
