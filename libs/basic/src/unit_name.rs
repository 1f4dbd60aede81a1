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

//! Interfaces related to the unit name.
//!
//! A unit name follows `BASE ['@' [PARAM]] ['.' TYPE]`, none of the parts
//! containing '@', '.' or white space. Take foo@123.service for example, "foo"
//! is the base, "123" is the instance parameter and "service" is the type.

use bitflags::bitflags;
use std::fmt;

/// The type assumed when a unit name carries none
pub const UNIT_TYPE_DEFAULT: &str = "service";

/// The maximum length of a valid unit name
pub const UNIT_NAME_MAX: usize = 255;

bitflags! {
    /// used to when check the given unit name is valid
    pub struct UnitNameFlags: u8 {
        /// Allow foo.service
        const PLAIN = 1 << 0;
        /// Allow foo@.service
        const TEMPLATE = 1 << 1;
        /// Allow foo@123.service
        const INSTANCE = 1 << 2;
        /// Any of the above
        const ANY = Self::PLAIN.bits() | Self::TEMPLATE.bits() | Self::INSTANCE.bits();
    }
}

/// The parts of a well-formed unit name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitNameInfo {
    /// the name before '@' and the type suffix
    pub base: String,
    /// the text after '@', None if there is no '@'
    pub param: Option<String>,
    /// the type suffix, "service" if omitted
    pub unit_type: String,
    /// false if the type was filled in with the default
    pub explicit_type: bool,
}

impl UnitNameInfo {
    /// foo@.service
    pub fn is_template(&self) -> bool {
        matches!(&self.param, Some(p) if p.is_empty())
    }

    /// foo@123.service
    pub fn is_instance(&self) -> bool {
        matches!(&self.param, Some(p) if !p.is_empty())
    }

    /// The name of the template the instance is derived from, None if not an instance.
    pub fn template_name(&self) -> Option<String> {
        if !self.is_instance() {
            return None;
        }
        Some(format!("{}@.{}", self.base, self.unit_type))
    }

    /// Instantiate a template with the parameter, None if not a template.
    pub fn instantiate(&self, param: &str) -> Option<String> {
        if !self.is_template() {
            return None;
        }
        Some(format!("{}@{}.{}", self.base, param, self.unit_type))
    }
}

impl fmt::Display for UnitNameInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            None => write!(f, "{}.{}", self.base, self.unit_type),
            Some(p) => write!(f, "{}@{}.{}", self.base, p, self.unit_type),
        }
    }
}

fn is_name_part(s: &str) -> bool {
    !s.chars().any(|c| c == '@' || c == '.' || c.is_whitespace())
}

/// Split a unit name into its parts, None if it's not a well-formed unit name.
pub fn unit_name_analyze(name: &str) -> Option<UnitNameInfo> {
    if name.is_empty() || name.len() > UNIT_NAME_MAX {
        return None;
    }

    let (first_name, last_name) = match name.split_once('.') {
        None => (name, None),
        Some(v) => (v.0, Some(v.1)),
    };
    if let Some(t) = last_name {
        if t.is_empty() || !is_name_part(t) {
            return None;
        }
    }

    let (base, param) = match first_name.split_once('@') {
        None => (first_name, None),
        Some(v) => (v.0, Some(v.1)),
    };
    /* "@" is the first character */
    if base.is_empty() || !is_name_part(base) {
        return None;
    }
    /* there is more than one "@" */
    if let Some(p) = param {
        if !is_name_part(p) {
            return None;
        }
    }

    Some(UnitNameInfo {
        base: base.to_string(),
        param: param.map(|p| p.to_string()),
        unit_type: last_name.unwrap_or(UNIT_TYPE_DEFAULT).to_string(),
        explicit_type: last_name.is_some(),
    })
}

/// Add the implicit ".service" to a unit name without a type suffix.
pub fn unit_name_canonicalize(name: &str) -> String {
    if name.contains('.') {
        return name.to_string();
    }
    format!("{}.{}", name, UNIT_TYPE_DEFAULT)
}

/// foo@123.service => foo@.service, None if the name is not an instance.
pub fn unit_name_template(name: &str) -> Option<String> {
    unit_name_analyze(name)?.template_name()
}

/// Get the content between the first '@' and the type suffix from unit name.
pub fn unit_name_to_instance(name: &str) -> Option<String> {
    let info = unit_name_analyze(name)?;
    if !info.is_instance() {
        return None;
    }
    info.param
}

/// check if the given unit name is valid, a valid unit file name spells its type out
pub fn unit_name_is_valid(name: &str, flag: UnitNameFlags) -> bool {
    let info = match unit_name_analyze(name) {
        None => return false,
        Some(v) => v,
    };
    if !info.explicit_type {
        return false;
    }
    if info.is_template() {
        return flag.contains(UnitNameFlags::TEMPLATE);
    }
    if info.is_instance() {
        return flag.contains(UnitNameFlags::INSTANCE);
    }
    flag.contains(UnitNameFlags::PLAIN)
}
