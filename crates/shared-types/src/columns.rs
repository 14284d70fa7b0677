//! Spreadsheet column labels.
//!
//! These are the exact German headers of the upload template.

pub const OBJECT_STREET: &str = "Objekt Str + Hnr";
pub const OBJECT_POSTAL_CODE: &str = "Objekt PLZ";
pub const OBJECT_CITY: &str = "Objekt Ort";
pub const UNIT_COUNT: &str = "Anzahl WE";

pub const AGENT_COMPANY: &str = "Bevollm. Firma";
pub const AGENT_NAME: &str = "Bevollm. Name";
pub const AGENT_FIRST_NAME: &str = "Bevollm. Vorname";
pub const AGENT_STREET: &str = "Bevollm. Str. Hnr";
pub const AGENT_POSTAL_CODE: &str = "Bevollm. PLZ";
pub const AGENT_CITY: &str = "Bevollm. Ort";
pub const AGENT_SALUTATION: &str = "Bevollm. Herr/Frau (H/F)";

pub const PARTNER_COMPANY: &str = "Vertragsp. Firma";
pub const PARTNER_NAME: &str = "Vertragsp. Name";
pub const PARTNER_FIRST_NAME: &str = "Vertragsp. Vorname";
pub const PARTNER_STREET: &str = "Vertragsp. Str + Hnr";
pub const PARTNER_POSTAL_CODE: &str = "Vertragsp. PLZ";
pub const PARTNER_CITY: &str = "Vertragsp. Ort";
pub const PARTNER_SALUTATION: &str = "Vertragsp. Herr/Frau (H/F)";

/// Columns holding comma-separated "street number" lists.
pub const ADDRESS_COLUMNS: [&str; 3] = [OBJECT_STREET, AGENT_STREET, PARTNER_STREET];
