use crate::domain::{ActionTag, SelectedFile, SubmissionId};

pub const JOB_DESCRIPTION_FIELD: &str = "job_description";
pub const RESUME_FIELD: &str = "resume";
pub const ACTION_FIELD: &str = "action";

/// Form snapshot captured when an action button is activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub id: SubmissionId,
    pub job_description: String,
    pub resume: SelectedFile,
    pub action: ActionTag,
}

impl ActionRequest {
    pub fn new(job_description: impl Into<String>, resume: SelectedFile, action: ActionTag) -> Self {
        Self {
            id: SubmissionId::new(),
            job_description: job_description.into(),
            resume,
            action,
        }
    }
}
