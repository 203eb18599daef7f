//! Droppable containers and their string ids.
//!
//! The view tags each drop zone with an id: `course-<course>` for the
//! module list of a course and `module-<course>-<module>` for the resource
//! list of a module.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::entities::NodeKind;
use crate::domain::error::DomainError;
use crate::domain::ids::NodeId;

static COURSE_DROPPABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^course-(\d+)$").expect("valid course droppable pattern"));
static MODULE_DROPPABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^module-(\d+)-(\d+)$").expect("valid module droppable pattern")
});

/// An ordered sequence that accepts drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    /// Module list of a course.
    Course(NodeId),
    /// Resource list of a module inside a course.
    Module { course: NodeId, module: NodeId },
}

impl Container {
    /// Kind of node the container holds.
    pub fn holds(&self) -> NodeKind {
        match self {
            Container::Course(_) => NodeKind::Module,
            Container::Module { .. } => NodeKind::Resource,
        }
    }
}

impl fmt::Display for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Container::Course(course) => write!(f, "course-{course}"),
            Container::Module { course, module } => write!(f, "module-{course}-{module}"),
        }
    }
}

impl FromStr for Container {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let malformed = || DomainError::MalformedDroppable(s.to_string());
        let id = |text: &str| text.parse::<NodeId>().map_err(|_| malformed());

        if let Some(caps) = COURSE_DROPPABLE.captures(s) {
            return Ok(Container::Course(id(&caps[1])?));
        }
        if let Some(caps) = MODULE_DROPPABLE.captures(s) {
            return Ok(Container::Module {
                course: id(&caps[1])?,
                module: id(&caps[2])?,
            });
        }
        Err(malformed())
    }
}
