//! Normalized object/link graph.
//!
//! A [`Graph`] is the hand-off artifact between the compiler front end and
//! any rendering or serialization layer. Field names used by the `serde`
//! derives are part of the external contract and must not change.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Property key whose value becomes an object's description.
pub const INFO_PROPERTY: &str = "Info";
/// Property key whose value becomes an object's technology stack.
pub const STACK_PROPERTY: &str = "Stack";
/// Property key whose value becomes an object's owning team.
pub const TEAM_PROPERTY: &str = "Team";
/// Property key whose value becomes an object's environment.
pub const ENV_PROPERTY: &str = "Env";

/// Classification of an object after semantic analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    /// A `map` or `service` definition carrying properties.
    ProgramSystem,
    /// A rectangle-family definition without nested objects.
    ExtProgramSystem,
    /// A rectangle-family definition with at least one nested object.
    Group,
}

impl ObjectKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::ProgramSystem => "program_system",
            ObjectKind::ExtProgramSystem => "ext_program_system",
            ObjectKind::Group => "group",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual category of a rectangle-family keyword.
///
/// `rectangle` and `group` both map to [`GroupType::Group`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupType {
    Group,
    Computer,
    Vm,
    Container,
    Containers,
    External,
    Service,
}

impl GroupType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupType::Group => "group",
            GroupType::Computer => "computer",
            GroupType::Vm => "vm",
            GroupType::Container => "container",
            GroupType::Containers => "containers",
            GroupType::External => "external",
            GroupType::Service => "service",
        }
    }
}

impl fmt::Display for GroupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One object of the output graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectRecord {
    #[serde(rename = "type")]
    kind: ObjectKind,
    num_id: usize,
    id: String,
    name: String,
    qid: String,
    qname: String,
    num_parent_id: i64,
    parent_id: Option<String>,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    env: Option<String>,
    src_ref: String,
    #[serde(skip)]
    group_type: Option<GroupType>,
    #[serde(skip)]
    properties: IndexMap<String, String>,
}

/// Identity and placement of an object, shared by every [`ObjectKind`].
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPlacement {
    pub num_id: usize,
    pub id: String,
    pub name: String,
    /// Ancestor ids from the root down to, but excluding, this object.
    pub id_path: Vec<String>,
    /// Ancestor names from the root down to, but excluding, this object.
    pub name_path: Vec<String>,
    pub num_parent_id: Option<usize>,
    pub parent_id: Option<String>,
    pub src_ref: String,
}

impl ObjectRecord {
    /// Qualified-id separator.
    pub const QID_SEPARATOR: &'static str = ":";
    /// Qualified-name separator.
    pub const QNAME_SEPARATOR: &'static str = "→";

    /// Create a `group` record. Its description is its display name.
    pub fn group(placement: ObjectPlacement, group_type: GroupType) -> Self {
        let description = placement.name.clone();
        let mut record = Self::new(ObjectKind::Group, placement, description);
        record.group_type = Some(group_type);
        record
    }

    /// Create an `ext_program_system` record for a leaf rectangle.
    pub fn external_system(placement: ObjectPlacement, group_type: GroupType) -> Self {
        let mut record = Self::system(ObjectKind::ExtProgramSystem, placement, IndexMap::new());
        record.group_type = Some(group_type);
        record
    }

    /// Create a `program_system` record from a map's folded properties.
    pub fn program_system(placement: ObjectPlacement, properties: IndexMap<String, String>) -> Self {
        Self::system(ObjectKind::ProgramSystem, placement, properties)
    }

    fn system(
        kind: ObjectKind,
        placement: ObjectPlacement,
        properties: IndexMap<String, String>,
    ) -> Self {
        let lookup = |key: &str| properties.get(key).cloned().unwrap_or_default();
        let description = lookup(INFO_PROPERTY);
        let stack = Some(lookup(STACK_PROPERTY));
        let team = Some(lookup(TEAM_PROPERTY));
        let env = Some(lookup(ENV_PROPERTY));

        let mut record = Self::new(kind, placement, description);
        record.stack = stack;
        record.team = team;
        record.env = env;
        record.properties = properties;
        record
    }

    fn new(kind: ObjectKind, placement: ObjectPlacement, description: String) -> Self {
        let qid = qualify(&placement.id_path, &placement.id, Self::QID_SEPARATOR);
        let qname = qualify(&placement.name_path, &placement.name, Self::QNAME_SEPARATOR);
        let num_parent_id = placement
            .num_parent_id
            .and_then(|n| i64::try_from(n).ok())
            .unwrap_or(-1);

        Self {
            kind,
            num_id: placement.num_id,
            id: placement.id,
            name: placement.name,
            qid,
            qname,
            num_parent_id,
            parent_id: placement.parent_id,
            description,
            stack: None,
            team: None,
            env: None,
            src_ref: placement.src_ref,
            group_type: None,
            properties: IndexMap::new(),
        }
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn num_id(&self) -> usize {
        self.num_id
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Colon-joined id path including this object.
    pub fn qid(&self) -> &str {
        &self.qid
    }

    /// Arrow-joined name path including this object.
    pub fn qname(&self) -> &str {
        &self.qname
    }

    /// Numeric id of the enclosing object, or `-1` at the root level.
    pub fn num_parent_id(&self) -> i64 {
        self.num_parent_id
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref()
    }

    pub fn team(&self) -> Option<&str> {
        self.team.as_deref()
    }

    pub fn env(&self) -> Option<&str> {
        self.env.as_deref()
    }

    pub fn src_ref(&self) -> &str {
        &self.src_ref
    }

    /// Rectangle keyword category; `None` for maps.
    pub fn group_type(&self) -> Option<GroupType> {
        self.group_type
    }

    /// Properties in declaration order. Empty for groups and external systems.
    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }
}

fn qualify(prefix: &[String], last: &str, separator: &str) -> String {
    prefix
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(last))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Direction flags of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LinkDirection {
    pub forward: bool,
    pub backward: bool,
}

impl LinkDirection {
    /// `a - b`
    pub const PLAIN: Self = Self {
        forward: false,
        backward: false,
    };
    /// `a -> b`
    pub const FORWARD: Self = Self {
        forward: true,
        backward: false,
    };
    /// `a <- b`
    pub const BACKWARD: Self = Self {
        forward: false,
        backward: true,
    };
    /// `a <-> b`
    pub const BIDIRECTIONAL: Self = Self {
        forward: true,
        backward: true,
    };
}

/// One link of the output graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkRecord {
    num_id1: i64,
    num_id2: i64,
    id1: String,
    id2: String,
    info: Option<String>,
    #[serde(rename = "_1to2")]
    forward: bool,
    #[serde(rename = "_2to1")]
    backward: bool,
    src_ref: String,
}

impl LinkRecord {
    pub fn new(
        (id1, num_id1): (String, Option<usize>),
        (id2, num_id2): (String, Option<usize>),
        direction: LinkDirection,
        info: Option<String>,
        src_ref: String,
    ) -> Self {
        let numeric = |n: Option<usize>| n.and_then(|n| i64::try_from(n).ok()).unwrap_or(-1);
        Self {
            num_id1: numeric(num_id1),
            num_id2: numeric(num_id2),
            id1,
            id2,
            info,
            forward: direction.forward,
            backward: direction.backward,
            src_ref,
        }
    }

    pub fn id1(&self) -> &str {
        &self.id1
    }

    pub fn id2(&self) -> &str {
        &self.id2
    }

    /// Resolved index of the first endpoint, `-1` if unresolved.
    pub fn num_id1(&self) -> i64 {
        self.num_id1
    }

    /// Resolved index of the second endpoint, `-1` if unresolved.
    pub fn num_id2(&self) -> i64 {
        self.num_id2
    }

    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    pub fn direction(&self) -> LinkDirection {
        LinkDirection {
            forward: self.forward,
            backward: self.backward,
        }
    }

    pub fn src_ref(&self) -> &str {
        &self.src_ref
    }
}

/// The compiled diagram: every object in tree order and every link in
/// source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Graph {
    objects: Vec<ObjectRecord>,
    links: Vec<LinkRecord>,
}

impl Graph {
    pub fn new(objects: Vec<ObjectRecord>, links: Vec<LinkRecord>) -> Self {
        Self { objects, links }
    }

    pub fn objects(&self) -> &[ObjectRecord] {
        &self.objects
    }

    pub fn links(&self) -> &[LinkRecord] {
        &self.links
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty() && self.links.is_empty()
    }

    /// Find an object by its textual id.
    pub fn object(&self, id: &str) -> Option<&ObjectRecord> {
        self.objects.iter().find(|o| o.id == id)
    }
}
