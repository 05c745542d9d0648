//! JIRA issue creation inputs and fixed workflow identifiers

/// Value written to the custom field for non-admin tickets
pub const SOFTPACK_EPIC_KEY: &str = "HI-229";

/// Priority id set on every created issue
pub const DEFAULT_PRIORITY_ID: &str = "10000";

/// Issue type, mapped to the tracker's numeric ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueType {
    Story,
    Task,
    SubTask,
}

impl IssueType {
    /// Story wins over everything; otherwise a parent makes it a sub-task
    pub fn select(user_story: bool, has_parent: bool) -> Self {
        if user_story {
            IssueType::Story
        } else if has_parent {
            IssueType::SubTask
        } else {
            IssueType::Task
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            IssueType::Story => "10001",
            IssueType::Task => "10002",
            IssueType::SubTask => "10003",
        }
    }
}

/// Workflow transitions the service knows how to trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    ToDo,
    Done,
}

impl Transition {
    pub fn id(&self) -> &'static str {
        match self {
            Transition::ToDo => "11",
            Transition::Done => "41",
        }
    }
}

/// Everything needed to file one issue
#[derive(Debug, Clone, Default)]
pub struct NewIssue {
    pub summary: String,
    pub description: String,
    /// Transition the issue to done right after creating it
    pub done: bool,
    pub labels: Vec<String>,
    pub assignee: String,
    pub reporter: String,
    pub project_code: String,
    /// Parent issue key; turns a task into a sub-task
    pub parent: Option<String>,
    pub softpack_admin: bool,
    pub user_story: bool,
}

impl NewIssue {
    pub fn issue_type(&self) -> IssueType {
        IssueType::select(self.user_story, self.parent.is_some())
    }

    /// Admin tickets leave the custom field empty
    pub fn custom_field_value(&self) -> Option<&'static str> {
        if self.softpack_admin {
            None
        } else {
            Some(SOFTPACK_EPIC_KEY)
        }
    }
}
