//! Parameter schema: resources, operations, and the conditionally visible fields
//! a host renders and resolves before each item is dispatched.
//!
//! The schema is metadata only. [`Selection`] is the validated (resource, operation)
//! pair that drives [`crate::action::Action::resolve`].

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::client::SkillsBankError;

pub const SKILL_ID: &str = "skillId";
pub const INPUT: &str = "input";
pub const SEARCH_QUERY: &str = "searchQuery";
pub const GROUP_ID: &str = "groupId";
pub const GROUP_SKILL_ID: &str = "groupSkillId";
pub const GROUP_INPUT: &str = "groupInput";
pub const OPTIONS: &str = "options";
pub const DRY_RUN: &str = "dryRun";
pub const INCLUDE_SCHEMA: &str = "includeSchema";

/// Top-level resource a request targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Resource {
    #[default]
    Skill,
    Group,
}

/// Operation on a resource. Not every operation is valid for every resource; see [`Resource::operations`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Operation {
    Execute,
    Get,
    List,
    ListMine,
    Search,
    ExecuteSkill,
}

impl Resource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Skill => "skill",
            Resource::Group => "group",
        }
    }

    /// Operations offered for this resource, in display order.
    pub fn operations(&self) -> &'static [Operation] {
        match self {
            Resource::Skill => &[
                Operation::Execute,
                Operation::Get,
                Operation::List,
                Operation::ListMine,
                Operation::Search,
            ],
            Resource::Group => &[Operation::Get, Operation::List, Operation::ExecuteSkill],
        }
    }

    /// Operation preselected when the resource is chosen.
    pub fn default_operation(&self) -> Operation {
        match self {
            Resource::Skill => Operation::Execute,
            Resource::Group => Operation::List,
        }
    }
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Execute => "execute",
            Operation::Get => "get",
            Operation::List => "list",
            Operation::ListMine => "listMine",
            Operation::Search => "search",
            Operation::ExecuteSkill => "executeSkill",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = SkillsBankError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skill" => Ok(Resource::Skill),
            "group" => Ok(Resource::Group),
            other => Err(SkillsBankError::UnknownResource(other.to_string())),
        }
    }
}

/// A (resource, operation) pair known to be valid. Read once per execution, shared by every item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    resource: Resource,
    operation: Operation,
}

impl Selection {
    pub fn new(resource: Resource, operation: Operation) -> Result<Self, SkillsBankError> {
        if !resource.operations().contains(&operation) {
            return Err(SkillsBankError::UnknownOperation {
                resource: resource.to_string(),
                operation: operation.to_string(),
            });
        }
        Ok(Self {
            resource,
            operation,
        })
    }

    /// Parse host-supplied names, e.g. ("group", "executeSkill").
    pub fn parse(resource: &str, operation: &str) -> Result<Self, SkillsBankError> {
        let resource: Resource = resource.parse()?;
        let operation = resource
            .operations()
            .iter()
            .copied()
            .find(|op| op.as_str() == operation)
            .ok_or_else(|| SkillsBankError::UnknownOperation {
                resource: resource.to_string(),
                operation: operation.to_string(),
            })?;
        Ok(Self {
            resource,
            operation,
        })
    }

    /// Like [`Selection::parse`], but no operation means the resource's default operation.
    pub fn parse_or_default(resource: &str, operation: Option<&str>) -> Result<Self, SkillsBankError> {
        match operation {
            Some(operation) => Self::parse(resource, operation),
            None => {
                let resource: Resource = resource.parse()?;
                Self::new(resource, resource.default_operation())
            }
        }
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }
}

impl Default for Selection {
    fn default() -> Self {
        let resource = Resource::default();
        Self {
            resource,
            operation: resource.default_operation(),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource, self.operation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    String,
    /// String masked in UI and storage.
    Password,
    Json,
    Boolean,
    Collection,
}

/// Show the field only for this resource and one of these operations.
#[derive(Debug, Clone, Serialize)]
pub struct Visibility {
    pub resource: Resource,
    pub operations: &'static [Operation],
}

/// One user-facing field (credential property or node parameter).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub name: &'static str,
    pub display_name: &'static str,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub default: serde_json::Value,
    pub required: bool,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show: Option<Visibility>,
    /// Nested fields of a collection.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldSpec>,
}

impl FieldSpec {
    fn new(
        name: &'static str,
        display_name: &'static str,
        kind: FieldKind,
        default: serde_json::Value,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            display_name,
            kind,
            default,
            required: false,
            description,
            show: None,
            options: Vec::new(),
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn shown_for(mut self, resource: Resource, operations: &'static [Operation]) -> Self {
        self.show = Some(Visibility {
            resource,
            operations,
        });
        self
    }

    pub(crate) fn string(name: &'static str, display_name: &'static str, description: &'static str) -> Self {
        Self::new(name, display_name, FieldKind::String, "".into(), description)
    }

    pub(crate) fn password(name: &'static str, display_name: &'static str, description: &'static str) -> Self {
        Self::new(name, display_name, FieldKind::Password, "".into(), description)
    }

    /// True when the field is rendered for this selection.
    pub fn is_visible(&self, selection: Selection) -> bool {
        match &self.show {
            None => true,
            Some(v) => {
                v.resource == selection.resource() && v.operations.contains(&selection.operation())
            }
        }
    }
}

/// All node parameters besides `resource` and `operation`.
pub fn parameter_fields() -> Vec<FieldSpec> {
    use Operation::*;
    use Resource::*;

    let mut options = FieldSpec::new(
        OPTIONS,
        "Options",
        FieldKind::Collection,
        serde_json::json!({}),
        "Additional options",
    );
    options.options = vec![
        FieldSpec::new(
            DRY_RUN,
            "Dry Run",
            FieldKind::Boolean,
            false.into(),
            "Whether to validate without executing",
        ),
        FieldSpec::new(
            INCLUDE_SCHEMA,
            "Include Schema",
            FieldKind::Boolean,
            false.into(),
            "Whether to include input schema in response",
        ),
    ];

    vec![
        FieldSpec::string(SKILL_ID, "Skill ID", "The ID or name of the skill")
            .required()
            .shown_for(Skill, &[Execute, Get]),
        FieldSpec::new(
            INPUT,
            "Input",
            FieldKind::Json,
            "{}".into(),
            "Input parameters for the skill (JSON)",
        )
        .required()
        .shown_for(Skill, &[Execute]),
        FieldSpec::string(SEARCH_QUERY, "Search Query", "Search term for skills")
            .shown_for(Skill, &[Search]),
        FieldSpec::string(GROUP_ID, "Group ID", "The ID of the group")
            .required()
            .shown_for(Group, &[Get, ExecuteSkill]),
        FieldSpec::string(GROUP_SKILL_ID, "Skill ID", "The ID of the skill within the group")
            .required()
            .shown_for(Group, &[ExecuteSkill]),
        FieldSpec::new(
            GROUP_INPUT,
            "Input",
            FieldKind::Json,
            "{}".into(),
            "Input parameters for the skill (JSON)",
        )
        .required()
        .shown_for(Group, &[ExecuteSkill]),
        options,
    ]
}

/// Fields rendered for a selection, in declaration order.
pub fn fields_for(selection: Selection) -> Vec<FieldSpec> {
    parameter_fields()
        .into_iter()
        .filter(|f| f.is_visible(selection))
        .collect()
}

/// True when `field` must be supplied for this selection.
pub fn is_required(field: &str, selection: Selection) -> bool {
    parameter_fields()
        .iter()
        .any(|f| f.name == field && f.required && f.is_visible(selection))
}

/// Operation choices for one resource, as rendered by a host.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationChoices {
    pub resource: Resource,
    pub operations: &'static [Operation],
    pub default: Operation,
}

/// Full declarative description: credential descriptor plus parameter schema.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDescription {
    pub name: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub credential: crate::credentials::CredentialDescriptor,
    pub resources: Vec<OperationChoices>,
    pub default_resource: Resource,
    pub fields: Vec<FieldSpec>,
}

pub fn node_description() -> NodeDescription {
    NodeDescription {
        name: "skillsBank",
        display_name: "Skills Bank",
        description: "Execute skills from Skills Bank",
        credential: crate::credentials::credential_descriptor(),
        resources: [Resource::Skill, Resource::Group]
            .into_iter()
            .map(|r| OperationChoices {
                resource: r,
                operations: r.operations(),
                default: r.default_operation(),
            })
            .collect(),
        default_resource: Resource::default(),
        fields: parameter_fields(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(resource: &str, operation: &str) -> Selection {
        Selection::parse(resource, operation).unwrap()
    }

    #[test]
    fn operations_depend_on_resource() {
        assert!(Selection::parse("skill", "listMine").is_ok());
        assert!(Selection::parse("group", "executeSkill").is_ok());
        assert!(matches!(
            Selection::parse("group", "search"),
            Err(SkillsBankError::UnknownOperation { .. })
        ));
        assert!(matches!(
            Selection::parse("skill", "executeSkill"),
            Err(SkillsBankError::UnknownOperation { .. })
        ));
        assert!(matches!(
            Selection::parse("team", "list"),
            Err(SkillsBankError::UnknownResource(_))
        ));
    }

    #[test]
    fn new_checks_operation_belongs_to_resource() {
        let s = Selection::new(Resource::Group, Operation::ExecuteSkill).unwrap();
        assert_eq!(s.to_string(), "group.executeSkill");
        assert!(matches!(
            Selection::new(Resource::Group, Operation::Search),
            Err(SkillsBankError::UnknownOperation { .. })
        ));
        assert!(Selection::new(Resource::Skill, Operation::ExecuteSkill).is_err());
    }

    #[test]
    fn missing_operation_falls_back_to_resource_default() {
        let s = Selection::parse_or_default("skill", None).unwrap();
        assert_eq!(s.operation(), Operation::Execute);
        let s = Selection::parse_or_default("group", None).unwrap();
        assert_eq!(s.operation(), Operation::List);
        let s = Selection::parse_or_default("group", Some("get")).unwrap();
        assert_eq!(s.operation(), Operation::Get);
        assert!(Selection::parse_or_default("group", Some("listMine")).is_err());
        assert!(Selection::parse_or_default("team", None).is_err());
    }

    #[test]
    fn defaults() {
        let s = Selection::default();
        assert_eq!(s.resource(), Resource::Skill);
        assert_eq!(s.operation(), Operation::Execute);
        assert_eq!(Resource::Group.default_operation(), Operation::List);
    }

    #[test]
    fn required_fields_per_selection() {
        assert!(is_required(SKILL_ID, sel("skill", "execute")));
        assert!(is_required(INPUT, sel("skill", "execute")));
        assert!(is_required(SKILL_ID, sel("skill", "get")));
        assert!(!is_required(INPUT, sel("skill", "get")));
        assert!(!is_required(SEARCH_QUERY, sel("skill", "search")));
        assert!(is_required(GROUP_ID, sel("group", "get")));
        assert!(is_required(GROUP_SKILL_ID, sel("group", "executeSkill")));
        assert!(is_required(GROUP_INPUT, sel("group", "executeSkill")));
        assert!(!is_required(SKILL_ID, sel("group", "executeSkill")));
        assert!(!is_required(OPTIONS, sel("skill", "list")));
    }

    #[test]
    fn visible_fields_for_list_are_only_options() {
        let names: Vec<_> = fields_for(sel("skill", "list")).iter().map(|f| f.name).collect();
        assert_eq!(names, vec![OPTIONS]);

        let names: Vec<_> = fields_for(sel("group", "executeSkill"))
            .iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec![GROUP_ID, GROUP_SKILL_ID, GROUP_INPUT, OPTIONS]);
    }

    #[test]
    fn description_serializes_camel_case() {
        let v = serde_json::to_value(node_description()).unwrap();
        assert_eq!(v["defaultResource"], "skill");
        assert_eq!(v["resources"][1]["operations"][2], "executeSkill");
        let options = v["fields"]
            .as_array()
            .unwrap()
            .iter()
            .find(|f| f["name"] == OPTIONS)
            .unwrap();
        assert_eq!(options["options"][0]["name"], DRY_RUN);
        assert_eq!(options["options"][1]["default"], false);
    }
}
