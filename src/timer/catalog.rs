//! Selectable subjects and quick-start templates

use serde::Serialize;

/// A subject offered in the dashboard picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Subject {
    pub id: &'static str,
    pub label: &'static str,
}

/// Preset subject/topic pair that starts a session in one click
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuickStartTemplate {
    pub id: &'static str,
    pub subject: &'static str,
    pub label: &'static str,
    pub topic: &'static str,
}

pub const SUBJECTS: &[Subject] = &[
    Subject { id: "mathematics", label: "Mathematics" },
    Subject { id: "physics", label: "Physics" },
    Subject { id: "chemistry", label: "Chemistry" },
    Subject { id: "biology", label: "Biology" },
    Subject { id: "english", label: "English" },
    Subject { id: "history", label: "History" },
    Subject { id: "geography", label: "Geography" },
    Subject { id: "computer_science", label: "Computer Science" },
];

pub const QUICK_START_TEMPLATES: &[QuickStartTemplate] = &[
    QuickStartTemplate {
        id: "mathematics-calculus",
        subject: "mathematics",
        label: "Mathematics",
        topic: "Calculus",
    },
    QuickStartTemplate {
        id: "physics-mechanics",
        subject: "physics",
        label: "Physics",
        topic: "Mechanics",
    },
    QuickStartTemplate {
        id: "computer-science-algorithms",
        subject: "computer_science",
        label: "Computer Science",
        topic: "Algorithms",
    },
];

pub fn find_template(id: &str) -> Option<&'static QuickStartTemplate> {
    QUICK_START_TEMPLATES.iter().find(|t| t.id == id)
}
