//! Serialized modification stream parser
//!
//! Tools that speak the external source control protocol print their
//! changes already in canonical form:
//!
//! ```xml
//! <ArrayOfModification>
//!   <Modification>
//!     <Type>added</Type>
//!     <FileName>main.c</FileName>
//!     <FolderName>src</FolderName>
//!     <ModifiedTime>2004-12-01T12:00:00</ModifiedTime>
//!     <UserName>alice</UserName>
//!     <ChangeNumber>17</ChangeNumber>
//!     <Comment>initial import</Comment>
//!   </Modification>
//! </ArrayOfModification>
//! ```
//!
//! Timestamps without an offset are taken as UTC.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::super::VcsError;
use super::HistoryParser;
use super::date::{DateFormat, parse_with_formats};
use crate::model::Modification;

const DATE_FORMATS: &[DateFormat] = &[
    DateFormat::Rfc3339,
    DateFormat::Utc("%Y-%m-%dT%H:%M:%S%.f"),
    DateFormat::Utc("%Y-%m-%d %H:%M:%S"),
];

#[derive(Debug, Deserialize)]
struct ModificationList {
    #[serde(rename = "Modification", default)]
    items: Vec<RawModification>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawModification {
    #[serde(default)]
    r#type: String,
    #[serde(default)]
    file_name: String,
    #[serde(default)]
    folder_name: String,
    modified_time: String,
    #[serde(default)]
    user_name: String,
    #[serde(default)]
    email_address: Option<String>,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    change_number: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    issue_url: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl RawModification {
    fn into_modification(self) -> Result<Modification, VcsError> {
        Ok(Modification {
            kind: self.r#type,
            file_name: self.file_name,
            folder_name: self.folder_name,
            modified_time: parse_with_formats(&self.modified_time, DATE_FORMATS)?,
            user_name: self.user_name,
            email_address: non_empty(self.email_address),
            comment: non_empty(self.comment),
            change_number: self.change_number,
            version: self.version,
            url: non_empty(self.url),
            issue_url: non_empty(self.issue_url),
        })
    }
}

/// Parser for `<ArrayOfModification>` documents
#[derive(Debug, Clone, Copy, Default)]
pub struct ModificationXmlParser;

impl HistoryParser for ModificationXmlParser {
    fn parse(
        &self,
        output: &str,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<Vec<Modification>, VcsError> {
        if output.trim().is_empty() {
            return Ok(Vec::new());
        }

        let list: ModificationList = quick_xml::de::from_str(output).map_err(|e| {
            VcsError::ParseFailure(format!("Invalid modification list: {}", e))
        })?;

        list.items
            .into_iter()
            .map(RawModification::into_modification)
            .collect()
    }
}
