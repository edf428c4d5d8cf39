//! Per-resource-type care-date field paths
//!
//! The single canonical date field of each supported resource type, as a
//! dotted path relative to the resource root. Read-only after process start;
//! types absent from the table simply have no care date.

use phf::phf_map;

static CARE_DATE_PATHS: phf::Map<&'static str, &'static str> = phf_map! {
    "AllergyIntolerance" => "recordedDate",
    "CarePlan" => "period.start",
    "ClinicalImpression" => "date",
    "Condition" => "recordedDate",
    "DiagnosticReport" => "issued",
    "DocumentReference" => "date",
    "Encounter" => "period.start",
    "EpisodeOfCare" => "period.start",
    "Goal" => "startDate",
    "Immunization" => "occurrenceDateTime",
    "MedicationRequest" => "authoredOn",
    "Observation" => "issued",
    "Procedure" => "performedDateTime",
    "ServiceRequest" => "authoredOn",
};

/// Care-date field path for a resource type, if one is registered.
pub fn care_date_path(resource_type: &str) -> Option<&'static str> {
    CARE_DATE_PATHS.get(resource_type).copied()
}
