//! Typed actions: one variant per (resource, operation), each with its required fields,
//! resolved from an item's raw parameters before anything is sent.

use serde::Deserialize;
use serde_json::Value;

use crate::client::SkillsBankError;
use crate::schema::{self, Operation, Resource, Selection};

/// Per-item options collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Route skill execution to `/dry-run` instead of `/run`.
    pub dry_run: bool,
    /// Declared for hosts but not sent to the service.
    pub include_schema: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillExecution {
    pub skill_id: String,
    pub input: Value,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupSkillExecution {
    pub group_id: String,
    pub execution: SkillExecution,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ExecuteSkill(SkillExecution),
    GetSkill { skill_id: String },
    ListSkills,
    ListMySkills,
    SearchSkills { query: String },
    ListGroups,
    GetGroup { group_id: String },
    ExecuteGroupSkill(GroupSkillExecution),
}

impl Action {
    /// Build the action for `selection` from one item's parameters (a JSON object keyed by field name).
    pub fn resolve(selection: Selection, params: &Value) -> Result<Self, SkillsBankError> {
        let options = options(params)?;
        let action = match (selection.resource(), selection.operation()) {
            (Resource::Skill, Operation::Execute) => Action::ExecuteSkill(SkillExecution {
                skill_id: required_str(params, schema::SKILL_ID)?,
                input: json_param(params, schema::INPUT)?,
                dry_run: options.dry_run,
            }),
            (Resource::Skill, Operation::Get) => Action::GetSkill {
                skill_id: required_str(params, schema::SKILL_ID)?,
            },
            (Resource::Skill, Operation::List) => Action::ListSkills,
            (Resource::Skill, Operation::ListMine) => Action::ListMySkills,
            (Resource::Skill, Operation::Search) => Action::SearchSkills {
                query: optional_str(params, schema::SEARCH_QUERY)?.unwrap_or_default(),
            },
            (Resource::Group, Operation::List) => Action::ListGroups,
            (Resource::Group, Operation::Get) => Action::GetGroup {
                group_id: required_str(params, schema::GROUP_ID)?,
            },
            (Resource::Group, Operation::ExecuteSkill) => {
                Action::ExecuteGroupSkill(GroupSkillExecution {
                    group_id: required_str(params, schema::GROUP_ID)?,
                    execution: SkillExecution {
                        skill_id: required_str(params, schema::GROUP_SKILL_ID)?,
                        input: json_param(params, schema::GROUP_INPUT)?,
                        dry_run: options.dry_run,
                    },
                })
            }
            (resource, operation) => {
                return Err(SkillsBankError::UnknownOperation {
                    resource: resource.to_string(),
                    operation: operation.to_string(),
                })
            }
        };
        Ok(action)
    }
}

fn options(params: &Value) -> Result<Options, SkillsBankError> {
    match params.get(schema::OPTIONS) {
        None | Some(Value::Null) => Ok(Options::default()),
        Some(v) => Options::deserialize(v).map_err(|e| SkillsBankError::InvalidParameter {
            name: schema::OPTIONS,
            reason: e.to_string(),
        }),
    }
}

fn optional_str(params: &Value, name: &'static str) -> Result<Option<String>, SkillsBankError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(SkillsBankError::InvalidParameter {
            name,
            reason: format!("expected a string, got {}", other),
        }),
    }
}

/// Required identifiers may not be absent or blank.
fn required_str(params: &Value, name: &'static str) -> Result<String, SkillsBankError> {
    optional_str(params, name)?
        .filter(|s| !s.trim().is_empty())
        .ok_or(SkillsBankError::MissingParameter(name))
}

/// JSON field: text is parsed, an already-parsed value is used as is, absent means `{}`.
pub fn json_param(params: &Value, name: &'static str) -> Result<Value, SkillsBankError> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(serde_json::json!({})),
        Some(Value::String(s)) => serde_json::from_str(s)
            .map_err(|source| SkillsBankError::InvalidInput { field: name, source }),
        Some(v) => Ok(v.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sel(resource: &str, operation: &str) -> Selection {
        Selection::parse(resource, operation).unwrap()
    }

    #[test]
    fn input_text_and_object_resolve_identically() {
        let from_text = Action::resolve(
            sel("skill", "execute"),
            &json!({ "skillId": "s1", "input": "{\"name\":\"Ada\"}" }),
        )
        .unwrap();
        let from_object = Action::resolve(
            sel("skill", "execute"),
            &json!({ "skillId": "s1", "input": { "name": "Ada" } }),
        )
        .unwrap();
        assert_eq!(from_text, from_object);
        assert_eq!(
            from_text,
            Action::ExecuteSkill(SkillExecution {
                skill_id: "s1".to_string(),
                input: json!({ "name": "Ada" }),
                dry_run: false,
            })
        );
    }

    #[test]
    fn missing_input_defaults_to_empty_object() {
        let a = Action::resolve(sel("skill", "execute"), &json!({ "skillId": "s1" })).unwrap();
        let Action::ExecuteSkill(exec) = a else {
            panic!("expected ExecuteSkill");
        };
        assert_eq!(exec.input, json!({}));
    }

    #[test]
    fn malformed_input_is_an_input_error() {
        let err = Action::resolve(
            sel("group", "executeSkill"),
            &json!({ "groupId": "g1", "groupSkillId": "s1", "groupInput": "{not json" }),
        )
        .unwrap_err();
        assert!(matches!(err, SkillsBankError::InvalidInput { field: "groupInput", .. }));
    }

    #[test]
    fn required_ids_must_be_present() {
        let err = Action::resolve(sel("skill", "get"), &json!({})).unwrap_err();
        assert!(matches!(err, SkillsBankError::MissingParameter("skillId")));

        let err = Action::resolve(sel("group", "get"), &json!({ "groupId": "  " })).unwrap_err();
        assert!(matches!(err, SkillsBankError::MissingParameter("groupId")));

        let err = Action::resolve(sel("skill", "get"), &json!({ "skillId": 5 })).unwrap_err();
        assert!(matches!(err, SkillsBankError::InvalidParameter { name: "skillId", .. }));
    }

    #[test]
    fn dry_run_option_carries_into_group_execution() {
        let a = Action::resolve(
            sel("group", "executeSkill"),
            &json!({
                "groupId": "g1",
                "groupSkillId": "Greeter",
                "options": { "dryRun": true, "includeSchema": true }
            }),
        )
        .unwrap();
        assert_eq!(
            a,
            Action::ExecuteGroupSkill(GroupSkillExecution {
                group_id: "g1".to_string(),
                execution: SkillExecution {
                    skill_id: "Greeter".to_string(),
                    input: json!({}),
                    dry_run: true,
                },
            })
        );
    }

    #[test]
    fn search_query_defaults_to_empty() {
        let a = Action::resolve(sel("skill", "search"), &json!({})).unwrap();
        assert_eq!(a, Action::SearchSkills { query: String::new() });
    }

    #[test]
    fn unrelated_fields_are_ignored() {
        let a = Action::resolve(
            sel("skill", "list"),
            &json!({ "skillId": "s1", "input": "{bad", "groupId": 3 }),
        )
        .unwrap();
        assert_eq!(a, Action::ListSkills);
    }

    #[test]
    fn bad_options_are_rejected() {
        let err = Action::resolve(sel("skill", "list"), &json!({ "options": { "dryRun": "yes" } }))
            .unwrap_err();
        assert!(matches!(err, SkillsBankError::InvalidParameter { name: "options", .. }));
    }
}
