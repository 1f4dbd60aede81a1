// Copyright (c) 2022 Huawei Technologies Co.,Ltd. All rights reserved.
//
// sysMaster is licensed under Mulan PSL v2.
// You can use this software according to the terms and conditions of the Mulan
// PSL v2.
// You may obtain a copy of Mulan PSL v2 at:
//         http://license.coscl.org.cn/MulanPSL2
// THIS SOFTWARE IS PROVIDED ON AN "AS IS" BASIS, WITHOUT WARRANTIES OF ANY
// KIND, EITHER EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO
// NON-INFRINGEMENT, MERCHANTABILITY OR FIT FOR A PARTICULAR PURPOSE.
// See the Mulan PSL v2 for more details.

//! The unit file text format: `[Section]` headers, `Key=Value` lines, trailing
//! backslash continuation, `#`/`;` comments.
//!
//! Values of a repeated key accumulate. An empty assignment `Key=` clears what
//! has been accumulated so far, which is how a drop-in resets a key.

use crate::error::*;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

/// Properties written before any section header land here.
pub const TOP_LEVEL_SECTION: &str = "";

/// The section holding the dependency keys.
pub const UNIT_SECTION: &str = "Unit";

lazy_static! {
    static ref SECTION_RE: Regex = Regex::new(r"^\[(.+)\]$").unwrap();
    static ref PROPERTY_RE: Regex = Regex::new(r"^([^=]+)=(.*)$").unwrap();
}

/// key => values of one section
pub type UnitSection = HashMap<String, Vec<String>>;

/// section => key => values
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UnitConfig {
    sections: HashMap<String, UnitSection>,
}

/* A value still collecting continuation lines. */
struct PendingProperty {
    key: String,
    segments: Vec<String>,
}

impl PendingProperty {
    /* every line contributes one separator, even an empty one */
    fn value(&self) -> String {
        self.segments.join(" ").trim().to_string()
    }
}

/// Strip an unescaped trailing backslash, Some(rest) if there was one.
fn strip_continuation(s: &str) -> Option<&str> {
    let backslashes = s.len() - s.trim_end_matches('\\').len();
    if backslashes % 2 == 1 {
        Some(s[..s.len() - 1].trim_end())
    } else {
        None
    }
}

impl UnitConfig {
    /// empty config
    pub fn new() -> Self {
        UnitConfig::default()
    }

    /// Parse unit file text into a new config.
    pub fn decode(text: &str) -> Result<UnitConfig> {
        let mut config = UnitConfig::new();
        config.decode_into(text)?;
        Ok(config)
    }

    /// Parse unit file text on top of what is already in the config.
    pub fn decode_into(&mut self, text: &str) -> Result<()> {
        let mut cursect = TOP_LEVEL_SECTION.to_string();
        let mut pending: Option<PendingProperty> = None;

        for line in text.split(|c: char| c == '\r' || c == '\n') {
            let line = line.trim();

            if let Some(mut prop) = pending.take() {
                match strip_continuation(line) {
                    Some(segment) => {
                        prop.segments.push(segment.to_string());
                        pending = Some(prop);
                    }
                    None => {
                        prop.segments.push(line.to_string());
                        self.append(&cursect, &prop.key, prop.value());
                    }
                }
                continue;
            }

            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(caps) = SECTION_RE.captures(line) {
                cursect = caps[1].to_string();
                self.sections.entry(cursect.clone()).or_default();
                continue;
            }

            if let Some(caps) = PROPERTY_RE.captures(line) {
                let key = caps[1].trim();
                let value = caps[2].trim();
                if key.is_empty() {
                    return Err(Error::Syntax {
                        line: line.to_string(),
                    });
                }
                if value.is_empty() {
                    self.reset(&cursect, key);
                    continue;
                }
                match strip_continuation(value) {
                    Some(segment) => {
                        pending = Some(PendingProperty {
                            key: key.to_string(),
                            segments: vec![segment.to_string()],
                        });
                    }
                    None => self.append(&cursect, key, value.to_string()),
                }
                continue;
            }

            return Err(Error::Syntax {
                line: line.to_string(),
            });
        }

        /* the text ended in the middle of a continuation */
        if let Some(prop) = pending {
            self.append(&cursect, &prop.key, prop.value());
        }

        Ok(())
    }

    /// Append a value to section.key, never overwriting earlier values.
    pub fn append(&mut self, section: &str, key: &str, value: String) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .entry(key.to_string())
            .or_default()
            .push(value);
    }

    /// Drop the accumulated values of section.key, keeping the key.
    pub fn reset(&mut self, section: &str, key: &str) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .insert(key.to_string(), Vec::new());
    }

    /// all values of section.key
    pub fn get(&self, section: &str, key: &str) -> Option<&[String]> {
        self.sections
            .get(section)
            .and_then(|s| s.get(key))
            .map(|v| v.as_slice())
    }

    /// the last value of section.key
    pub fn get_last(&self, section: &str, key: &str) -> Option<&str> {
        self.get(section, key)
            .and_then(|v| v.last())
            .map(|v| v.as_str())
    }

    /// one whole section
    pub fn section(&self, section: &str) -> Option<&UnitSection> {
        self.sections.get(section)
    }

    /// names of all sections, the implicit top-level one included if used
    pub fn section_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sections.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// no section at all
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_value() {
        let config = UnitConfig::decode("[Unit]\nDescription=Hi").unwrap();
        let mut expected = UnitConfig::new();
        expected.append("Unit", "Description", "Hi".to_string());
        assert_eq!(config, expected);
        assert_eq!(config.section_names(), vec!["Unit"]);
    }

    #[test]
    fn test_continuation() {
        let config = UnitConfig::decode("[Unit]\nDescription=Hello \\\nWorld").unwrap();
        assert_eq!(
            config.get("Unit", "Description").unwrap(),
            values(&["Hello World"]).as_slice()
        );

        let text = "[Service]\nExecStart=/bin/sleep \\\n  --foo \\\n  5\nType=simple\n";
        let config = UnitConfig::decode(text).unwrap();
        assert_eq!(
            config.get_last("Service", "ExecStart").unwrap(),
            "/bin/sleep --foo 5"
        );
        assert_eq!(config.get_last("Service", "Type").unwrap(), "simple");
    }

    #[test]
    fn test_continuation_keeps_empty_lines() {
        let config = UnitConfig::decode("[Unit]\nA=x \\\n\\\ny").unwrap();
        assert_eq!(config.get_last("Unit", "A").unwrap(), "x  y");
    }

    #[test]
    fn test_continuation_at_end_of_text() {
        let config = UnitConfig::decode("[Unit]\nDescription=dangling \\").unwrap();
        assert_eq!(config.get_last("Unit", "Description").unwrap(), "dangling");
    }

    #[test]
    fn test_escaped_backslash_is_not_continuation() {
        let config = UnitConfig::decode("[Unit]\nDescription=C:\\\\\nAfter=a.target").unwrap();
        assert_eq!(config.get_last("Unit", "Description").unwrap(), "C:\\\\");
        assert_eq!(config.get_last("Unit", "After").unwrap(), "a.target");
    }

    #[test]
    fn test_malformed_line() {
        match UnitConfig::decode("not a valid line") {
            Err(Error::Syntax { line }) => assert_eq!(line, "not a valid line"),
            _ => panic!("expected a syntax error"),
        }

        let text = "# Comment 1\n[Unit]\nRequires=b.target\n\n[Service]\nExecStart=/bin/sleep 5\nsada";
        match UnitConfig::decode(text) {
            Err(Error::Syntax { line }) => assert_eq!(line, "sada"),
            _ => panic!("expected a syntax error"),
        }

        assert!(UnitConfig::decode("[Unit]\n=value").is_err());

        match UnitConfig::decode("[]\nA=b") {
            Err(Error::Syntax { line }) => assert_eq!(line, "[]"),
            _ => panic!("expected a syntax error"),
        }
    }

    #[test]
    fn test_empty_value_resets() {
        let config = UnitConfig::decode("[Unit]\nWants=a.service\nWants=").unwrap();
        assert_eq!(config.get("Unit", "Wants").unwrap(), Vec::<String>::new().as_slice());

        let config = UnitConfig::decode("[Unit]\nWants=a.service\nWants=\nWants=b.service").unwrap();
        assert_eq!(
            config.get("Unit", "Wants").unwrap(),
            values(&["b.service"]).as_slice()
        );
    }

    #[test]
    fn test_repeated_keys_accumulate() {
        let text = "[Unit]\nWants=a.service\nAfter=a.service\nWants=b.service c.service\n";
        let config = UnitConfig::decode(text).unwrap();
        assert_eq!(
            config.get("Unit", "Wants").unwrap(),
            values(&["a.service", "b.service c.service"]).as_slice()
        );
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let text = "# leading\n; another\n\n[Unit]\n   \n# Wants=x.service\nAfter = y.target \r\n";
        let config = UnitConfig::decode(text).unwrap();
        assert!(config.get("Unit", "Wants").is_none());
        assert_eq!(config.get_last("Unit", "After").unwrap(), "y.target");
    }

    #[test]
    fn test_top_level_section() {
        let config = UnitConfig::decode("Description=orphan\n[Unit]\nAfter=a.target").unwrap();
        assert_eq!(
            config.get_last(TOP_LEVEL_SECTION, "Description").unwrap(),
            "orphan"
        );
        assert_eq!(config.section_names(), vec!["", "Unit"]);
    }

    #[test]
    fn test_decode_into_keeps_sections() {
        let mut config = UnitConfig::decode("[Unit]\nWants=a.service\n[Service]\nType=oneshot").unwrap();
        config
            .decode_into("[Unit]\nWants=b.service\nDescription=override")
            .unwrap();
        assert_eq!(
            config.get("Unit", "Wants").unwrap(),
            values(&["a.service", "b.service"]).as_slice()
        );
        assert_eq!(config.get_last("Service", "Type").unwrap(), "oneshot");

        /* properties of the overlay start in its own top-level section */
        config.decode_into("Wants=c.service").unwrap();
        assert_eq!(
            config.get_last(TOP_LEVEL_SECTION, "Wants").unwrap(),
            "c.service"
        );
        assert_eq!(config.get("Unit", "Wants").unwrap().len(), 2);
    }

    #[test]
    fn test_empty_text() {
        let config = UnitConfig::decode("").unwrap();
        assert!(config.is_empty());
    }
}
