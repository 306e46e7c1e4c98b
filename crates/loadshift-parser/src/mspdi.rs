//! MSPDI document extraction
//!
//! Deserializes the MS Project XML interchange shape (serde via quick-xml)
//! and resolves assignment UIDs into the core's (name, start, finish) task
//! key. UID resolution happens here, at the ingestion boundary; the
//! analysis core only ever sees names and dates.

use loadshift_core::{Assignment, Project, Resource, Task};
use serde::Deserialize;

use crate::values::{parse_date, parse_max_units, parse_work_hours};
use crate::{ParseError, ParseSummary};

#[derive(Debug, Deserialize)]
struct XmlProject {
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Tasks")]
    tasks: Option<XmlTasks>,
    #[serde(rename = "Resources")]
    resources: Option<XmlResources>,
    #[serde(rename = "Assignments")]
    assignments: Option<XmlAssignments>,
}

#[derive(Debug, Default, Deserialize)]
struct XmlTasks {
    #[serde(rename = "Task", default)]
    tasks: Vec<XmlTask>,
}

#[derive(Debug, Deserialize)]
struct XmlTask {
    #[serde(rename = "UID")]
    uid: Option<String>,
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Start")]
    start: Option<String>,
    #[serde(rename = "Finish")]
    finish: Option<String>,
    #[serde(rename = "PredecessorLink", default)]
    predecessor_links: Vec<XmlPredecessorLink>,
}

#[derive(Debug, Deserialize)]
struct XmlPredecessorLink {
    #[serde(rename = "PredecessorUID")]
    predecessor_uid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct XmlResources {
    #[serde(rename = "Resource", default)]
    resources: Vec<XmlResource>,
}

#[derive(Debug, Deserialize)]
struct XmlResource {
    #[serde(rename = "UID")]
    uid: Option<String>,
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "MaxUnits")]
    max_units: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct XmlAssignments {
    #[serde(rename = "Assignment", default)]
    assignments: Vec<XmlAssignment>,
}

#[derive(Debug, Deserialize)]
struct XmlAssignment {
    #[serde(rename = "TaskUID")]
    task_uid: Option<String>,
    #[serde(rename = "ResourceUID")]
    resource_uid: Option<String>,
    #[serde(rename = "Work")]
    work: Option<String>,
    #[serde(rename = "Units")]
    units: Option<String>,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Extract a [`Project`] from MSPDI XML text.
pub fn parse(xml: &str) -> Result<(Project, ParseSummary), ParseError> {
    let doc: XmlProject = quick_xml::de::from_str(xml)?;
    let mut summary = ParseSummary::default();

    let mut project = Project::new(doc.name.unwrap_or_default());

    // Keep UID→record side tables for assignment resolution; the core
    // model itself carries names, not UIDs.
    let mut task_uids: Vec<String> = Vec::new();
    for xml_task in doc.tasks.unwrap_or_default().tasks {
        let (Some(uid), Some(name)) = (
            non_empty(xml_task.uid.as_ref()),
            non_empty(xml_task.name.as_ref()),
        ) else {
            summary.dropped_tasks += 1;
            continue;
        };

        let mut task = Task::new(uid).name(name);
        task.start = xml_task.start.as_deref().and_then(parse_date);
        task.finish = xml_task.finish.as_deref().and_then(parse_date);
        for link in &xml_task.predecessor_links {
            if let Some(pred) = non_empty(link.predecessor_uid.as_ref()) {
                task.predecessors.push(pred.to_string());
            }
        }

        task_uids.push(uid.to_string());
        project.tasks.push(task);
    }

    let mut resource_uids: Vec<String> = Vec::new();
    for xml_resource in doc.resources.unwrap_or_default().resources {
        let (Some(uid), Some(name)) = (
            non_empty(xml_resource.uid.as_ref()),
            non_empty(xml_resource.name.as_ref()),
        ) else {
            summary.dropped_resources += 1;
            continue;
        };

        resource_uids.push(uid.to_string());
        project.resources.push(
            Resource::new(name).max_units(parse_max_units(xml_resource.max_units.as_deref())),
        );
    }

    for xml_assignment in doc.assignments.unwrap_or_default().assignments {
        let (Some(task_uid), Some(resource_uid)) = (
            non_empty(xml_assignment.task_uid.as_ref()),
            non_empty(xml_assignment.resource_uid.as_ref()),
        ) else {
            summary.dropped_assignments += 1;
            continue;
        };

        let task = task_uids
            .iter()
            .position(|uid| uid == task_uid)
            .map(|i| &project.tasks[i]);
        let resource = resource_uids
            .iter()
            .position(|uid| uid == resource_uid)
            .map(|i| &project.resources[i]);

        let (Some(task), Some(resource)) = (task, resource) else {
            summary.dropped_assignments += 1;
            continue;
        };

        project.assignments.push(
            Assignment::new(&resource.name, &task.name)
                .task_dates(task.start, task.finish)
                .work_hours(parse_work_hours(
                    xml_assignment.work.as_deref().unwrap_or(""),
                ))
                .units(parse_max_units(xml_assignment.units.as_deref())),
        );
    }

    Ok((project, summary))
}
