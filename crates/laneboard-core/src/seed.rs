//! Default board content used when nothing has been persisted yet.

use crate::board::{ChecklistProgress, Column, Label, Participant, Priority, Task};
use crate::color::SerializableColor;
use serde::{Deserialize, Serialize};

/// Default number of generated tasks per column.
pub const DEFAULT_TASKS_PER_COLUMN: usize = 5;

/// Seed generation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedConfig {
    pub tasks_per_column: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            tasks_per_column: DEFAULT_TASKS_PER_COLUMN,
        }
    }
}

const TASK_TITLES: &[&str] = &[
    "User authentication flow design",
    "Database schema optimization",
    "API documentation update",
    "End-to-end test suite",
    "Performance monitoring setup",
    "Security audit implementation",
    "Mobile responsive layout",
    "Payment gateway integration",
    "Email notification system",
    "User profile management",
    "Search functionality enhancement",
    "Analytics dashboard design",
    "File upload module",
    "Role-based access control",
    "CI/CD pipeline setup",
];

const DESCRIPTIONS: &[Option<&str>] = &[
    Some("Implement comprehensive solution"),
    Some("Review and optimize for better performance"),
    None,
    Some("Create detailed test cases for all scenarios"),
    Some("Setup monitoring and alerting"),
];

const ACTIVITIES: &[&str] = &[
    "WP1: Project Setup",
    "WP2: Development",
    "WP3: Quality Assurance",
    "WP4: Design",
    "WP5: Infrastructure",
    "WP6: Security",
];

const LABEL_SETS: &[&[&str]] = &[&["l1"], &["l2"], &["l3"], &["l4"], &["l5"], &["l6"], &["l1", "l9"], &[]];

const PRIORITIES: &[Option<Priority>] = &[
    Some(Priority::High),
    Some(Priority::Medium),
    Some(Priority::Low),
    Some(Priority::Medium),
    None,
];

const PEOPLE: &[(&str, &str, &str)] = &[
    ("u1", "Sarah Chen", "SC"),
    ("u2", "Mike Johnson", "MJ"),
    ("u3", "Alex Park", "AP"),
    ("u4", "Emma Wilson", "EW"),
    ("u5", "David Lee", "DL"),
];

/// Generate deterministic seed tasks for a column.
pub fn generate_tasks(column_id: &str, count: usize) -> Vec<Task> {
    (0..count)
        .map(|i| {
            let mut task = Task::with_id(
                format!("task-{}-{}", column_id, i + 1),
                TASK_TITLES[i % TASK_TITLES.len()],
            );
            task.description = DESCRIPTIONS[i % DESCRIPTIONS.len()].map(str::to_string);
            task.activity = Some(ACTIVITIES[i % ACTIVITIES.len()].to_string());
            task.labels = LABEL_SETS[i % LABEL_SETS.len()]
                .iter()
                .map(|l| l.to_string())
                .collect();
            task.priority = PRIORITIES[i % PRIORITIES.len()];

            let (id, name, avatar) = PEOPLE[i % PEOPLE.len()];
            task.assign(Participant {
                id: id.to_string(),
                name: name.to_string(),
                avatar: Some(avatar.to_string()),
            });

            if i % 3 == 0 {
                task.comment_count = Some((i % 7) as u32 + 1);
            }
            if i % 4 == 1 {
                task.attachment_count = Some((i % 5) as u32 + 1);
                task.checklist = Some(ChecklistProgress {
                    completed: (i % 3) as u32,
                    total: 5,
                });
            }
            task.due_date = Some(format!("2024-12-{:02}", i % 28 + 1));
            task
        })
        .collect()
}

/// The default column layout with generated tasks.
pub fn default_columns(config: &SeedConfig) -> Vec<Column> {
    let n = config.tasks_per_column;
    vec![
        Column::entry("open", "Open", SerializableColor::rgb(0x60, 0xA5, 0xFA))
            .with_tasks(generate_tasks("open", n)),
        Column::new("in-progress", "In Progress", SerializableColor::rgb(0xFF, 0xBD, 0x01))
            .with_wip_limit(15)
            .with_tasks(generate_tasks("in-progress", n)),
        Column::new("in-review", "In Review", SerializableColor::rgb(0x96, 0x8F, 0xE5))
            .with_wip_limit(20)
            .with_tasks(generate_tasks("in-review", n)),
        Column::new("testing", "Testing", SerializableColor::rgb(0x00, 0xD4, 0x00))
            .with_wip_limit(25)
            .with_tasks(generate_tasks("testing", n)),
        Column::new("ready-deploy", "Ready to Deploy", SerializableColor::rgb(0x00, 0xB4, 0xCD))
            .with_tasks(generate_tasks("ready-deploy", n)),
        Column::completion("completed", "Completed", SerializableColor::rgb(0x34, 0xD3, 0x99))
            .with_tasks(generate_tasks("completed", n)),
    ]
}

/// The default label definitions.
pub fn default_labels() -> Vec<Label> {
    [
        ("l1", "Design", (0x96, 0x8F, 0xE5)),
        ("l2", "Backend", (0x34, 0xD3, 0x99)),
        ("l3", "Frontend", (0x60, 0xA5, 0xFA)),
        ("l4", "Testing", (0xFF, 0xBD, 0x01)),
        ("l5", "Documentation", (0x00, 0xB4, 0xCD)),
        ("l6", "Bug", (0xF8, 0x71, 0x71)),
        ("l7", "Enhancement", (0x00, 0xD4, 0x00)),
        ("l9", "High Priority", (0xFF, 0x4F, 0x6A)),
        ("l8", "Urgent", (0xF8, 0x71, 0x71)),
    ]
    .into_iter()
    .map(|(id, name, (r, g, b))| Label::new(id, name, SerializableColor::rgb(r, g, b)))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::validate_columns;

    #[test]
    fn test_seed_is_deterministic() {
        let config = SeedConfig::default();
        assert_eq!(default_columns(&config), default_columns(&config));
    }

    #[test]
    fn test_seed_layout_is_valid() {
        let columns = default_columns(&SeedConfig { tasks_per_column: 12 });
        assert!(validate_columns(&columns).is_ok());
        assert!(columns.iter().all(|c| c.len() == 12));
    }

    #[test]
    fn test_seed_labels_exist() {
        let labels = default_labels();
        let columns = default_columns(&SeedConfig::default());
        for task in columns.iter().flat_map(|c| c.tasks()) {
            for label in &task.labels {
                assert!(labels.iter().any(|l| &l.id == label), "missing label {label}");
            }
        }
    }
}
