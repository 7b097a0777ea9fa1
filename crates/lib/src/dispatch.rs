//! Per-item dispatch: resolve each item's action, perform it against the API, and collect
//! exactly one output record per item.
//!
//! Items run strictly in order; an item's requests complete before the next item starts.

use serde_json::Value;

use crate::action::{Action, GroupSkillExecution};
use crate::client::{SkillsApi, SkillsBankError};
use crate::group::Group;
use crate::schema::Selection;

/// Batch aborted at `index` (continue-on-fail disabled). Items after it were not dispatched.
#[derive(Debug, thiserror::Error)]
#[error("item {index}: {source}")]
pub struct ItemError {
    pub index: usize,
    #[source]
    pub source: SkillsBankError,
}

/// Perform one resolved action. One request, or two for a group skill execution.
pub async fn perform(api: &dyn SkillsApi, action: &Action) -> Result<Value, SkillsBankError> {
    match action {
        Action::ExecuteSkill(exec) => {
            api.run_skill(&exec.skill_id, &exec.input, exec.dry_run)
                .await
        }
        Action::GetSkill { skill_id } => api.get_skill(skill_id).await,
        Action::ListSkills => api.list_skills().await,
        Action::ListMySkills => api.list_my_skills().await,
        Action::SearchSkills { query } => api.search_skills(query).await,
        Action::ListGroups => api.list_groups().await,
        Action::GetGroup { group_id } => api.get_group(group_id).await,
        Action::ExecuteGroupSkill(req) => execute_group_skill(api, req).await,
    }
}

/// Fetch the group, check the skill is a member (by id or name), then run it and tag
/// the result with the group. No run request is sent when the check fails.
pub async fn execute_group_skill(
    api: &dyn SkillsApi,
    req: &GroupSkillExecution,
) -> Result<Value, SkillsBankError> {
    let group = Group::from_response(&api.get_group(&req.group_id).await?);
    let exec = &req.execution;
    if !group.contains_skill(&exec.skill_id) {
        return Err(SkillsBankError::NotInGroup {
            skill_id: exec.skill_id.clone(),
            group_id: req.group_id.clone(),
        });
    }
    let response = api
        .run_skill(&exec.skill_id, &exec.input, exec.dry_run)
        .await?;
    Ok(group.annotate(&req.group_id, response))
}

async fn run_item(
    api: &dyn SkillsApi,
    selection: Selection,
    params: &Value,
) -> Result<Value, SkillsBankError> {
    let action = Action::resolve(selection, params)?;
    perform(api, &action).await
}

/// Run every item against `selection`. With `continue_on_fail`, a failing item yields
/// `{"error": message}` and the batch continues; otherwise the first failure aborts.
pub async fn run_items(
    api: &dyn SkillsApi,
    selection: Selection,
    items: &[Value],
    continue_on_fail: bool,
) -> Result<Vec<Value>, ItemError> {
    let mut out = Vec::with_capacity(items.len());
    for (index, params) in items.iter().enumerate() {
        log::debug!("item {}: {}", index, selection);
        match run_item(api, selection, params).await {
            Ok(response) => out.push(response),
            Err(e) if continue_on_fail => {
                log::warn!("item {} failed, continuing: {}", index, e);
                out.push(error_record(&e));
            }
            Err(source) => return Err(ItemError { index, source }),
        }
    }
    Ok(out)
}

/// Output record for a failed item.
pub fn error_record(e: &SkillsBankError) -> Value {
    serde_json::json!({ "error": e.to_string() })
}
