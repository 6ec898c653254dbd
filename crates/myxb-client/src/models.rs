//! Wire types for the portal API that do not belong in the core model.

use serde::{Deserialize, Serialize};

use myxb_core::model::{EvaluationProject, SemesterScore};

/// Every portal response is wrapped in this envelope.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub state: i64,
    #[serde(default)]
    pub msg: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    pub fn message(&self) -> String {
        self.msg.clone().unwrap_or_default()
    }
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub name: &'a str,
    pub password: String,
    pub timestamp: u64,
}

/// One page of the learning task list.
#[derive(Debug, Deserialize)]
pub struct TaskPage {
    #[serde(default)]
    pub list: Option<Vec<TaskItem>>,
}

#[derive(Debug, Deserialize)]
pub struct TaskItem {
    pub id: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicScoreData {
    #[serde(default)]
    pub evaluation_project_list: Option<Vec<EvaluationProject>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemesterDynamicData {
    #[serde(default)]
    pub student_semester_dynamic_score_basic_dtos: Option<Vec<SemesterScore>>,
}
