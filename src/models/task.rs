//! One-shot task records.

use std::sync::OnceLock;

use bbs_format::{ModelError, Validation, Versioner};
use regex::Regex;

/// Longest annotation a task definition may carry, in bytes.
pub const MAX_ANNOTATION_LENGTH: usize = 10 * 1024;

fn guid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("guid pattern is valid"))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum TaskState {
    Invalid = 0,
    Pending = 1,
    Running = 2,
    Completed = 3,
    Resolving = 4,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TaskDefinition {
    #[prost(string, tag = "1")]
    pub root_fs: String,
    #[prost(int32, tag = "2")]
    pub memory_mb: i32,
    #[prost(int32, tag = "3")]
    pub disk_mb: i32,
    #[prost(uint32, tag = "4")]
    pub cpu_weight: u32,
    #[prost(string, tag = "5")]
    pub log_guid: String,
    #[prost(string, tag = "6")]
    pub result_file: String,
    #[prost(string, tag = "7")]
    pub completion_callback_url: String,
    #[prost(string, tag = "8")]
    pub annotation: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Task {
    #[prost(message, optional, tag = "1")]
    pub task_definition: Option<TaskDefinition>,
    #[prost(string, tag = "2")]
    pub task_guid: String,
    #[prost(string, tag = "3")]
    pub domain: String,
    #[prost(int64, tag = "4")]
    pub created_at: i64,
    #[prost(int64, tag = "5")]
    pub updated_at: i64,
    #[prost(int64, tag = "6")]
    pub first_completed_at: i64,
    #[prost(enumeration = "TaskState", tag = "7")]
    pub state: i32,
    #[prost(string, tag = "8")]
    pub cell_id: String,
    #[prost(string, tag = "9")]
    pub result: String,
    #[prost(bool, tag = "10")]
    pub failed: bool,
    #[prost(string, tag = "11")]
    pub failure_reason: String,
    #[prost(int32, tag = "12")]
    pub rejection_count: i32,
    #[prost(string, tag = "13")]
    pub rejection_reason: String,
}

impl TaskDefinition {
    fn check(&self, validation: &mut Validation) {
        validation
            .check(!self.root_fs.is_empty(), "task_definition.rootfs", "must be present")
            .check(self.memory_mb >= 0, "task_definition.memory_mb", "must not be negative")
            .check(self.disk_mb >= 0, "task_definition.disk_mb", "must not be negative")
            .check(self.cpu_weight <= 100, "task_definition.cpu_weight", "must be at most 100")
            .check(
                self.annotation.len() <= MAX_ANNOTATION_LENGTH,
                "task_definition.annotation",
                format!("must be at most {} bytes", MAX_ANNOTATION_LENGTH),
            );
    }
}

impl Versioner for Task {
    fn validate(&self) -> Result<(), ModelError> {
        let mut validation = Validation::new();
        validation
            .check(
                guid_pattern().is_match(&self.task_guid),
                "task_guid",
                "must match [a-zA-Z0-9_-]+",
            )
            .check(!self.domain.is_empty(), "domain", "must be present")
            .check(TaskState::try_from(self.state).is_ok(), "state", "unknown task state");

        match &self.task_definition {
            Some(definition) => definition.check(&mut validation),
            None => {
                validation.check(false, "task_definition", "must be present");
            }
        }
        validation.finish()
    }
}
