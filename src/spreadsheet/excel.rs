//! Office Open XML package helpers
use crate::error::XlMapperError;
use crate::helpers::reader::SourceReader;
use crate::helpers::xml::match_xml_events;
use crate::helpers::xml::XmlNodeHelper;
use crate::helpers::zip::ZipHelper;
use crate::spreadsheet::SpreadsheetError;
use quick_xml::events::Event;
use std::borrow::Cow;
use std::collections::HashMap;
use zip::ZipArchive;

/// XML tag name for relationship elements in package `.rels` parts
const TAG_RELATIONSHIP: &[u8] = b"Relationship";

/// Signature of an OLE compound file; encrypted OOXML packages are wrapped in one
const CFB_SIGNATURE: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Opens the ZIP container of an Excel package
///
/// # Arguments
/// * `name` - File name used in error messages
/// * `reader` - Package bytes
///
/// # Returns
/// The ZIP archive handle, or an error if the file is encrypted or not a ZIP
pub(super) fn open(name: &str, mut reader: SourceReader) -> Result<ZipArchive<SourceReader>, XlMapperError> {
    if is_password_protected(&mut reader)? {
        Err(SpreadsheetError::SpreadsheetPasswordProtectedError(name.to_owned()))?;
    }
    Ok(ZipArchive::new(reader)?)
}

/// Loads worksheet relationships from an Excel package
///
/// # Arguments
/// * `zip` - Zip archive handle
/// * `path` - Path to the relationships XML file within the archive
///
/// # Returns
/// Mapping of relationship IDs to worksheet paths
pub(super) fn load_relationships(zip: &mut ZipArchive<SourceReader>, path: &str) -> Result<HashMap<String, String>, XlMapperError> {
    let mut reader = zip.xml_reader(path)?
        .ok_or_else(|| SpreadsheetError::FileError(path.to_string()))?;
    let mut relationships: HashMap<String, String> = HashMap::new();
    match_xml_events!(reader => {
        Event::Start(event) if event.local_name().as_ref() == TAG_RELATIONSHIP => {
            let id = event.get_attribute_value("Id")?;
            let kind = event.get_attribute_value("Type")?;
            let target = event.get_attribute_value("Target")?;
            // Only worksheets carry tabular data
            if kind.map(|it| it.ends_with("/worksheet")).unwrap_or(true) {
                if let Some((id, target)) = id.zip(target) {
                    relationships.insert(id.to_string(), to_zip_path(target));
                }
            }
        }
    });
    Ok(relationships)
}

/// Normalizes a relationship target to a path inside the package
///
/// # Arguments
/// * `path` - Target as written in the relationship, relative to `xl/` or absolute
pub(crate) fn to_zip_path(path: Cow<'_, str>) -> String {
    if let Some(absolute) = path.strip_prefix('/') {
        absolute.to_string()
    } else if path.starts_with("xl/") {
        path.to_string()
    } else {
        format!("xl/{path}")
    }
}

/// Checks whether the package bytes start with the compound file signature
fn is_password_protected(reader: &mut SourceReader) -> Result<bool, XlMapperError> {
    Ok(reader.peek::<8>()? == Some(CFB_SIGNATURE))
}
