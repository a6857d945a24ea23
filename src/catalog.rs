//! Closed catalogs offered to the step forms: message templates and the record
//! fields a branch condition can test.

/// A message template that a `template` step can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateEntry {
    pub id: &'static str,
    pub label: &'static str,
}

pub const TEMPLATES: &[TemplateEntry] = &[
    TemplateEntry {
        id: "welcome_email",
        label: "Welcome Email",
    },
    TemplateEntry {
        id: "appointment_reminder",
        label: "Appointment Reminder",
    },
    TemplateEntry {
        id: "follow_up",
        label: "Follow-up",
    },
    TemplateEntry {
        id: "prescription_renewal",
        label: "Prescription Renewal",
    },
];

/// Looks up a template by id. Step validity never consults this.
pub fn find_template(id: &str) -> Option<&'static TemplateEntry> {
    TEMPLATES.iter().find(|t| t.id == id)
}

pub const DEFAULT_FIELDS: &[&str] = &[
    "patient.name",
    "patient.email",
    "patient.phone",
    "patient.age",
    "patient.status",
    "appointment.date",
    "appointment.type",
    "appointment.status",
    "prescription.status",
    "prescription.refills",
];

/// The dotted record paths offered when authoring a condition.
///
/// Fields carry no type information, so every operator is selectable for every field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCatalog {
    fields: Vec<String>,
}

impl FieldCatalog {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// The field a freshly added condition starts with.
    pub fn first(&self) -> Option<&str> {
        self.fields.first().map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_FIELDS.iter().copied())
    }
}
