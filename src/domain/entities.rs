//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::ids::NodeId;

/// Top-level container owning an ordered list of modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: NodeId,
    pub title: String,
    pub description: String,
    /// Display order
    pub modules: Vec<Module>,
}

/// Mid-level container owning an ordered list of resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: NodeId,
    pub title: String,
    /// Display order
    pub resources: Vec<Resource>,
}

/// Leaf content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: NodeId,
    pub title: String,
    pub kind: ResourceKind,
    /// URL for links, resolved blob reference for images and PDFs.
    /// Opaque to the tree.
    pub payload: String,
}

/// Content type of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    #[default]
    Link,
    Image,
    Pdf,
}

impl ResourceKind {
    /// Image and PDF payloads come from a user-selected file.
    pub fn is_file_backed(&self) -> bool {
        !matches!(self, ResourceKind::Link)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Link => write!(f, "link"),
            ResourceKind::Image => write!(f, "image"),
            ResourceKind::Pdf => write!(f, "pdf"),
        }
    }
}

impl FromStr for ResourceKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "link" => Ok(ResourceKind::Link),
            "image" => Ok(ResourceKind::Image),
            "pdf" => Ok(ResourceKind::Pdf),
            _ => Err(DomainError::UnknownKind {
                what: "resource kind",
                value: s.to_string(),
            }),
        }
    }
}

/// The three tiers of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Course,
    Module,
    Resource,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Course => write!(f, "course"),
            NodeKind::Module => write!(f, "module"),
            NodeKind::Resource => write!(f, "resource"),
        }
    }
}

impl FromStr for NodeKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "course" => Ok(NodeKind::Course),
            "module" => Ok(NodeKind::Module),
            "resource" => Ok(NodeKind::Resource),
            _ => Err(DomainError::UnknownKind {
                what: "node kind",
                value: s.to_string(),
            }),
        }
    }
}

/// Values for a resource about to be committed to the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResource {
    pub title: String,
    pub kind: ResourceKind,
    pub payload: String,
}

impl NewResource {
    pub fn new(title: impl Into<String>, kind: ResourceKind, payload: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind,
            payload: payload.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_mixed_case_when_parsing_kinds_then_accepts() {
        assert_eq!("PDF".parse::<ResourceKind>().unwrap(), ResourceKind::Pdf);
        assert_eq!(" Module ".parse::<NodeKind>().unwrap(), NodeKind::Module);
    }

    #[test]
    fn given_unknown_kind_when_parsing_then_reports_value() {
        let err = "video".parse::<ResourceKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown resource kind: video");
    }

    #[test]
    fn given_link_when_checking_file_backed_then_false() {
        assert!(!ResourceKind::Link.is_file_backed());
        assert!(ResourceKind::Image.is_file_backed());
        assert!(ResourceKind::Pdf.is_file_backed());
    }
}
