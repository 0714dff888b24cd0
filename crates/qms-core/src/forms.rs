//! Intake form workflow
//!
//! A form is rendered with a freshly generated identifier. The identifier
//! travels with the draft and is stored verbatim when the draft is accepted.
//!
//! Submitting a draft:
//! 1. trims every value and checks required fields
//! 2. checks the identifier still belongs to the form's record type
//! 3. rejects identifiers from closed months or ahead of the table
//! 4. re-reads the table and rejects identifiers stored in the meantime
//! 5. appends the row

use qms_records::{
    ChangeControlFields, ChangeType, Choice, ComplaintFields, DeviationFields, DeviationType,
    Record, RecordFields, RecordId, RecordType, Severity,
};
use qms_store::RecordStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::clock::Clock;
use crate::config::RecordTables;
use crate::error::{QmsError, QmsResult, ValidationError};
use crate::id_gen::IdGenerator;

/// Raw complaint form values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplaintDraft {
    pub id: String,
    pub product_name: String,
    pub severity: String,
    pub contact_number: String,
    pub details: String,
    pub submitted_by: String,
}

/// Raw deviation form values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviationDraft {
    pub id: String,
    pub department: String,
    pub deviation_type: String,
    pub details: String,
    pub reported_by: String,
}

/// Raw change request form values
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChangeControlDraft {
    pub id: String,
    pub change_type: String,
    pub justification: String,
    pub impact_analysis: String,
    pub requested_by: String,
}

/// Submitted form of any record type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draft {
    Complaint(ComplaintDraft),
    Deviation(DeviationDraft),
    ChangeControl(ChangeControlDraft),
}

impl Draft {
    /// Empty form carrying a freshly rendered identifier
    #[must_use]
    pub fn blank(id: &RecordId) -> Self {
        let record_type = id.record_type();
        let id = id.to_string();
        match record_type {
            RecordType::Complaint => Draft::Complaint(ComplaintDraft {
                id,
                ..ComplaintDraft::default()
            }),
            RecordType::Deviation => Draft::Deviation(DeviationDraft {
                id,
                ..DeviationDraft::default()
            }),
            RecordType::ChangeControl => Draft::ChangeControl(ChangeControlDraft {
                id,
                ..ChangeControlDraft::default()
            }),
        }
    }

    /// Record type the form creates
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        match self {
            Draft::Complaint(_) => RecordType::Complaint,
            Draft::Deviation(_) => RecordType::Deviation,
            Draft::ChangeControl(_) => RecordType::ChangeControl,
        }
    }

    /// Identifier text carried by the form
    #[must_use]
    pub fn id_text(&self) -> &str {
        match self {
            Draft::Complaint(d) => &d.id,
            Draft::Deviation(d) => &d.id,
            Draft::ChangeControl(d) => &d.id,
        }
    }

    /// Replace the carried identifier, keeping every other value
    pub fn set_id(&mut self, id: &RecordId) {
        let slot = match self {
            Draft::Complaint(d) => &mut d.id,
            Draft::Deviation(d) => &mut d.id,
            Draft::ChangeControl(d) => &mut d.id,
        };
        *slot = id.to_string();
    }

    /// Check the draft and convert it to typed values
    ///
    /// # Errors
    /// Returns a `ValidationError` listing every problem found
    pub fn validate(&self) -> Result<(RecordId, RecordFields), ValidationError> {
        let mut errors = ValidationError::new(self.record_type());
        let id = parse_id(self.record_type(), self.id_text(), &mut errors);

        let fields = match self {
            Draft::Complaint(d) => RecordFields::Complaint(ComplaintFields {
                product_name: required(&d.product_name, "Product Name", &mut errors),
                severity: choice_or_default::<Severity>(&d.severity, &mut errors),
                contact_number: required(&d.contact_number, "Contact Number", &mut errors),
                details: required(&d.details, "Complaint Details", &mut errors),
                submitted_by: d.submitted_by.trim().to_string(),
            }),
            Draft::Deviation(d) => RecordFields::Deviation(DeviationFields {
                department: required(&d.department, "Responsible Department", &mut errors),
                deviation_type: choice_or_default::<DeviationType>(&d.deviation_type, &mut errors),
                details: required(&d.details, "Deviation Details", &mut errors),
                reported_by: required(&d.reported_by, "Reported By", &mut errors),
            }),
            Draft::ChangeControl(d) => RecordFields::ChangeControl(ChangeControlFields {
                change_type: required_choice::<ChangeType>(&d.change_type, &mut errors),
                justification: required(&d.justification, "Justification for Change", &mut errors),
                impact_analysis: required(&d.impact_analysis, "Impact Analysis", &mut errors),
                requested_by: required(&d.requested_by, "Requested By", &mut errors),
            }),
        };

        // parse_id records a problem whenever it yields None
        match id {
            Some(id) if errors.is_empty() => Ok((id, fields)),
            _ => Err(errors),
        }
    }
}

fn required(value: &str, label: &'static str, errors: &mut ValidationError) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.missing(label);
    }
    value.to_string()
}

fn choice_or_default<C: Choice>(value: &str, errors: &mut ValidationError) -> C {
    if value.trim().is_empty() {
        return C::default();
    }
    value.parse().unwrap_or_else(|err| {
        errors.record_error(&err);
        C::default()
    })
}

fn required_choice<C: Choice>(value: &str, errors: &mut ValidationError) -> C {
    if value.trim().is_empty() {
        errors.missing(C::FIELD);
        return C::default();
    }
    choice_or_default(value, errors)
}

fn parse_id(record_type: RecordType, text: &str, errors: &mut ValidationError) -> Option<RecordId> {
    let text = text.trim();
    if text.is_empty() {
        errors.invalid("form identifier is missing, reload the form");
        return None;
    }
    match text.parse::<RecordId>() {
        Ok(id) if id.record_type() == record_type => Some(id),
        Ok(id) => {
            errors.invalid(format!(
                "identifier {id} does not belong to {}",
                record_type.table_name()
            ));
            None
        }
        Err(err) => {
            errors.record_error(&err);
            None
        }
    }
}

/// Accepted submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    record: Record,
    row: Vec<String>,
}

impl Submission {
    /// Stored record
    #[inline]
    #[must_use]
    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Identifier assigned
    #[inline]
    #[must_use]
    pub fn id(&self) -> &RecordId {
        &self.record.id
    }

    /// Row as appended
    #[inline]
    #[must_use]
    pub fn row(&self) -> &[String] {
        &self.row
    }

    /// Confirmation shown to the submitter
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "{} registered successfully with ID {}!",
            self.record.record_type().label(),
            self.record.id
        )
    }
}

/// Form render and submit handler
#[derive(Clone)]
pub struct FormWorkflow {
    store: Arc<dyn RecordStore>,
    tables: RecordTables,
    clock: Arc<dyn Clock>,
    ids: IdGenerator,
}

impl FormWorkflow {
    /// Create workflow
    #[must_use]
    pub fn new(store: Arc<dyn RecordStore>, tables: RecordTables, clock: Arc<dyn Clock>) -> Self {
        let ids = IdGenerator::new(Arc::clone(&store), tables.clone());
        Self {
            store,
            tables,
            clock,
            ids,
        }
    }

    /// Identifier to embed in a freshly rendered form
    ///
    /// # Errors
    /// Returns `QmsError::BackingStore` if the table cannot be read
    pub async fn render(&self, record_type: RecordType) -> QmsResult<RecordId> {
        self.ids.next_id(record_type, self.clock.now()).await
    }

    /// Validate and store a draft
    ///
    /// # Errors
    /// - `QmsError::Validation` for missing or malformed values
    /// - `QmsError::UnissuedId` if the identifier could not have been rendered
    /// - `QmsError::DuplicateId` if the identifier was stored after render
    /// - `QmsError::BackingStore` if the table cannot be read or appended to
    pub async fn submit(&self, draft: &Draft) -> QmsResult<Submission> {
        let record_type = draft.record_type();
        let (id, fields) = draft.validate()?;
        let now = self.clock.now();

        self.ids.check_issued(&id, now).await?;

        let record = Record::new(now, id, fields).map_err(|err| {
            let mut errors = ValidationError::new(record_type);
            errors.record_error(&err);
            errors
        })?;
        let row = record.to_row();
        let table = self.tables.get(record_type);
        self.store.append_row(table, &row).await?;

        info!(%table, id = %record.id, "{} registered", record_type.label());
        Ok(Submission { record, row })
    }
}
