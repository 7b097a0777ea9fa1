//! Group detail as returned by `GET /groups/{id}`, membership checks, and
//! annotation of group-scoped skill results.

use serde::Deserialize;
use serde_json::Value;

/// A group and its ordered skill list. Fields are kept as raw JSON so any shape the
/// service returns can be inspected without failing.
#[derive(Debug, Clone, Default)]
pub struct Group {
    pub id: Option<Value>,
    pub name: Option<Value>,
    pub skills: Option<Vec<GroupSkill>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupSkill {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
}

impl GroupSkill {
    /// Exact, case-sensitive match on id or name.
    pub fn matches(&self, skill_id: &str) -> bool {
        [&self.id, &self.name]
            .into_iter()
            .any(|v| v.as_ref().and_then(Value::as_str) == Some(skill_id))
    }
}

impl Group {
    /// Read a group from a response body. Each field is read on its own; `skills` entries
    /// that are not skill objects are skipped. Anything that is not an object reads as an empty group.
    pub fn from_response(value: &Value) -> Self {
        let field = |key: &str| value.get(key).filter(|v| !v.is_null()).cloned();
        let skills = value.get("skills").and_then(Value::as_array).map(|entries| {
            entries
                .iter()
                .filter_map(|entry| GroupSkill::deserialize(entry).ok())
                .collect()
        });
        Group {
            id: field("id"),
            name: field("name"),
            skills,
        }
    }

    /// True when any skill in the group matches `skill_id` by id or by name.
    pub fn contains_skill(&self, skill_id: &str) -> bool {
        self.skills
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .any(|s| s.matches(skill_id))
    }

    /// Insert `group: {id, name}` into a skill result. Other fields are left untouched;
    /// non-object results are returned as is.
    pub fn annotate(&self, group_id: &str, mut response: Value) -> Value {
        match response.as_object_mut() {
            Some(obj) => {
                obj.insert(
                    "group".to_string(),
                    serde_json::json!({
                        "id": group_id,
                        "name": self.name.clone().unwrap_or(Value::Null),
                    }),
                );
            }
            None => {
                log::warn!("group {}: skill result is not an object, not annotated", group_id);
            }
        }
        response
    }
}
