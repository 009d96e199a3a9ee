// Device privacy XML parser
//
// Produces the `PrivacyType -> rows` map consumed by
// `AudioDeviceManager::on_xml_parsing_completed`. Unknown names are
// reported as errors so that a typo never silently drops a device class.

use std::collections::HashMap;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{info, warn};

use super::privacy::DevicePrivacyInfo;
use crate::audio::types::{DeviceCategory, DeviceRoleFlags, DeviceType, DeviceUsage, PrivacyType};
use crate::error::{PolicyError, Result};

pub type PrivacyMap = HashMap<PrivacyType, Vec<DevicePrivacyInfo>>;

/// Parser for `audio_device_privacy` documents
#[derive(Debug, Default)]
pub struct AudioDeviceParser;

impl AudioDeviceParser {
    pub fn new() -> Self {
        Self
    }

    /// Read and parse a privacy file from disk
    pub fn parse_file(&self, path: &Path) -> Result<PrivacyMap> {
        let xml = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let map = self.parse_str(&xml)?;
        info!(
            "Loaded device privacy table from {}: {} privacy, {} public rows",
            path.display(),
            map.get(&PrivacyType::Privacy).map_or(0, Vec::len),
            map.get(&PrivacyType::Public).map_or(0, Vec::len)
        );
        Ok(map)
    }

    /// Parse a privacy document held in memory
    pub fn parse_str(&self, xml: &str) -> Result<PrivacyMap> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut map: PrivacyMap = HashMap::new();
        let mut current: Option<PrivacyType> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                    b"privacy_type" => {
                        let name = required_attribute(e, "privacy_type", "name")?;
                        current = Some(parse_privacy_type(&name)?);
                    }
                    b"device" => match current {
                        Some(privacy_type) => {
                            let row = parse_device(e)?;
                            crate::device_debug!(
                                "Privacy row {:?}: {:?} role={:?} usage={:?} category={:?}",
                                privacy_type,
                                row.device_type,
                                row.device_role,
                                row.device_usage,
                                row.device_category
                            );
                            map.entry(privacy_type).or_default().push(row);
                        }
                        None => warn!("Ignoring <device> outside of <privacy_type>"),
                    },
                    _ => {}
                },
                Ok(Event::End(ref e)) => {
                    if e.name().as_ref() == b"privacy_type" {
                        current = None;
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(PolicyError::Xml(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        if map.values().all(Vec::is_empty) {
            return Err(PolicyError::EmptyTable);
        }
        Ok(map)
    }
}

fn attribute(e: &BytesStart<'_>, key: &str) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|err| PolicyError::Xml(err.to_string()))?;
        if attr.key.as_ref() == key.as_bytes() {
            let value = attr
                .unescape_value()
                .map_err(|err| PolicyError::Xml(err.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

fn required_attribute(
    e: &BytesStart<'_>,
    element: &'static str,
    key: &'static str,
) -> Result<String> {
    attribute(e, key)?.ok_or(PolicyError::MissingAttribute {
        element,
        attribute: key,
    })
}

fn parse_privacy_type(name: &str) -> Result<PrivacyType> {
    match name.trim() {
        "privacy" => Ok(PrivacyType::Privacy),
        "public" => Ok(PrivacyType::Public),
        other => Err(PolicyError::UnknownValue {
            kind: "privacy type",
            value: other.to_string(),
        }),
    }
}

fn parse_device(e: &BytesStart<'_>) -> Result<DevicePrivacyInfo> {
    let type_name = required_attribute(e, "device", "type")?;
    let device_type =
        DeviceType::from_config_name(&type_name).ok_or_else(|| PolicyError::UnknownValue {
            kind: "device type",
            value: type_name.clone(),
        })?;

    let device_role = parse_roles(&required_attribute(e, "device", "role")?)?;
    let device_usage = parse_usages(&required_attribute(e, "device", "usage")?)?;
    let device_category = match attribute(e, "category")? {
        Some(value) => parse_categories(&value)?,
        None => DeviceCategory::CATEGORY_DEFAULT,
    };

    Ok(DevicePrivacyInfo {
        device_name: attribute(e, "name")?.unwrap_or(type_name),
        device_type,
        device_role,
        device_usage,
        device_category,
    })
}

fn parse_roles(value: &str) -> Result<DeviceRoleFlags> {
    let mut roles = DeviceRoleFlags::empty();
    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        roles |= match part {
            "input" => DeviceRoleFlags::INPUT,
            "output" => DeviceRoleFlags::OUTPUT,
            other => {
                return Err(PolicyError::UnknownValue {
                    kind: "device role",
                    value: other.to_string(),
                })
            }
        };
    }
    Ok(roles)
}

fn parse_usages(value: &str) -> Result<DeviceUsage> {
    let mut usage = DeviceUsage::empty();
    for part in value.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        usage |= match part {
            "media" => DeviceUsage::MEDIA,
            "voice" => DeviceUsage::VOICE,
            "recognition" => DeviceUsage::RECOGNITION,
            "all" => DeviceUsage::ALL_USAGE,
            other => {
                return Err(PolicyError::UnknownValue {
                    kind: "device usage",
                    value: other.to_string(),
                })
            }
        };
    }
    Ok(usage)
}

fn parse_categories(value: &str) -> Result<DeviceCategory> {
    let mut category = DeviceCategory::CATEGORY_DEFAULT;
    for part in value.split('|').map(str::trim).filter(|p| !p.is_empty()) {
        category |= DeviceCategory::from_config_name(part).ok_or_else(|| {
            PolicyError::UnknownValue {
                kind: "device category",
                value: part.to_string(),
            }
        })?;
    }
    Ok(category)
}
