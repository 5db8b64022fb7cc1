//! Boilerplate tasks seeded onto PBIs, and which of them each PBI type gets.

use clap::ValueEnum;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::credentials::Credentials;
use crate::model::fields;
use crate::model::work_item::FieldMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    Development,
    Requirements,
}

impl Activity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Activity::Development => "Development",
            Activity::Requirements => "Requirements",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignee {
    /// The display name of whoever runs the tool.
    CurrentUser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTemplate {
    pub title: &'static str,
    pub backlog_priority: &'static str,
    pub activity: Activity,
    pub remaining_work: &'static str,
    pub description: Option<&'static str>,
    pub assignee: Option<Assignee>,
}

impl TaskTemplate {
    /// Field values for a new task built from this template.
    pub fn to_fields(&self, creds: &Credentials) -> FieldMap {
        let mut map = FieldMap::new();
        map.insert(fields::TITLE.into(), self.title.into());
        map.insert(fields::BACKLOG_PRIORITY.into(), self.backlog_priority.into());
        map.insert(fields::ACTIVITY.into(), self.activity.as_str().into());
        map.insert(fields::REMAINING_WORK.into(), self.remaining_work.into());
        if let Some(description) = self.description {
            map.insert(fields::DESCRIPTION.into(), description.into());
        }
        if let Some(Assignee::CurrentUser) = self.assignee {
            map.insert(
                fields::ASSIGNED_TO.into(),
                Value::String(creds.display_name.clone()),
            );
        }
        map
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    WriteTests,
    RunTests,
    ReviewTests,
    HighLevelDesign,
    ReleasePlan,
    RemoveToggleCode,
    RemoveToggleConsul,
    ActivateToggle,
    Rollback,
    Notify,
    ExploratoryTests,
    Requirement,
}

const RELEASE_PLAN_DESCRIPTION: &str = "1) What needs to be released? including work order</br></br>\
2) Dependencies (other PBIs, other teams)</br></br>\
3) PM Work (demo, content, security…)</br></br>\
4) Release to all environments</br>* QA2 (full QA)</br>\
* Staging2</br>* Production (feature sanity if possible)</br>* PerfCD</br>* ProdLikeCD";

const fn template(
    title: &'static str,
    backlog_priority: &'static str,
    activity: Activity,
    remaining_work: &'static str,
) -> TaskTemplate {
    TaskTemplate {
        title,
        backlog_priority,
        activity,
        remaining_work,
        description: None,
        assignee: None,
    }
}

impl TaskKind {
    pub fn template(&self) -> TaskTemplate {
        use Activity::*;
        match self {
            TaskKind::WriteTests => template("Write Tests", "160", Development, ""),
            TaskKind::RunTests => template("Run Tests", "180", Development, ""),
            TaskKind::ReviewTests => TaskTemplate {
                assignee: Some(Assignee::CurrentUser),
                ..template("Review Tests", "170", Requirements, "0.5")
            },
            TaskKind::HighLevelDesign => template("High Level Design", "10", Development, "0"),
            TaskKind::ReleasePlan => TaskTemplate {
                description: Some(RELEASE_PLAN_DESCRIPTION),
                ..template("Release Plan", "150", Development, "0.5")
            },
            TaskKind::RemoveToggleCode => {
                template("Remove toggle from code", "50", Development, "")
            }
            TaskKind::RemoveToggleConsul => {
                template("Remove toggle from consul", "60", Development, "")
            }
            TaskKind::ActivateToggle => template("Activate feature toggle", "50", Development, ""),
            TaskKind::Rollback => template("Rollback Plan", "20", Development, "0"),
            TaskKind::Notify => template("Notify ...", "190", Requirements, "0"),
            TaskKind::ExploratoryTests => template("Exploratory Tests", "180", Development, ""),
            TaskKind::Requirement => template("Requirement", "20", Development, ""),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "verbatim")]
pub enum PbiType {
    RegularTasks,
    CleanupTasks,
    ExploratoryTasks,
    GoingLiveTasks,
    E2ETasks,
}

impl PbiType {
    pub const ALL: [PbiType; 5] = [
        PbiType::RegularTasks,
        PbiType::CleanupTasks,
        PbiType::ExploratoryTasks,
        PbiType::GoingLiveTasks,
        PbiType::E2ETasks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PbiType::RegularTasks => "RegularTasks",
            PbiType::CleanupTasks => "CleanupTasks",
            PbiType::ExploratoryTasks => "ExploratoryTasks",
            PbiType::GoingLiveTasks => "GoingLiveTasks",
            PbiType::E2ETasks => "E2ETasks",
        }
    }

    pub fn task_kinds(&self) -> &'static [TaskKind] {
        use TaskKind::*;
        match self {
            PbiType::RegularTasks => &[
                WriteTests,
                RunTests,
                ReviewTests,
                HighLevelDesign,
                ReleasePlan,
                Requirement,
            ],
            PbiType::CleanupTasks => &[
                RemoveToggleCode,
                RemoveToggleConsul,
                HighLevelDesign,
                ReleasePlan,
                ExploratoryTests,
            ],
            PbiType::ExploratoryTasks => &[HighLevelDesign, ReleasePlan, ExploratoryTests],
            PbiType::GoingLiveTasks => &[ActivateToggle, Rollback, Notify, ExploratoryTests],
            PbiType::E2ETasks => &[WriteTests, RunTests, ReviewTests],
        }
    }

    pub fn templates(&self) -> Vec<TaskTemplate> {
        self.task_kinds().iter().map(TaskKind::template).collect()
    }
}

impl fmt::Display for PbiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PbiType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PbiType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown PBI type: {s}"))
    }
}

/// Templates for a PBI type given by name. Unknown names get no tasks.
pub fn templates_for(pbi_type: &str) -> Vec<TaskTemplate> {
    pbi_type
        .parse::<PbiType>()
        .map(|t| t.templates())
        .unwrap_or_default()
}
