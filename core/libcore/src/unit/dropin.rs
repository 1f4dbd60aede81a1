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

//! Drop-in directories of a unit: `<name>.d/*.conf` overlays, and the
//! dependency directories `<name>.wants/`, `<name>.requires/` whose entries
//! name the units to depend on.

use super::config::{UnitConfig, UNIT_SECTION};
use super::deps::UnitRelations;
use super::file::UnitFs;
use super::locate::AliasSet;
use crate::error::*;
use basic::path_lookup::LookupPaths;
use basic::unit_name::{
    unit_name_analyze, unit_name_canonicalize, unit_name_template, unit_name_to_instance,
};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// dependency directory suffix => relation its entries are added under
pub type DropinTable = Vec<(String, UnitRelations)>;

/// wants => Wants, requires => Requires
pub fn default_dropin_table() -> DropinTable {
    vec![
        ("wants".to_string(), UnitRelations::UnitWants),
        ("requires".to_string(), UnitRelations::UnitRequires),
    ]
}

/// The directory names searched for drop-ins of the aliases: every alias,
/// and the template of an instance alias.
pub fn dropin_subpaths(aliases: &AliasSet) -> Vec<String> {
    let mut subpaths: Vec<String> = Vec::new();
    for name in aliases.names() {
        let mut candidates = vec![unit_name_canonicalize(name)];
        if let Some(template) = unit_name_template(name) {
            candidates.push(template);
        }
        for c in candidates {
            if !subpaths.contains(&c) {
                subpaths.push(c);
            }
        }
    }
    subpaths
}

/// Merge the drop-ins of a located unit into its config.
pub struct DropinResolver<'a> {
    fs: &'a dyn UnitFs,
    lookup_path: &'a LookupPaths,
    table: &'a [(String, UnitRelations)],
}

impl<'a> DropinResolver<'a> {
    /// new resolver
    pub fn new(
        fs: &'a dyn UnitFs,
        lookup_path: &'a LookupPaths,
        table: &'a [(String, UnitRelations)],
    ) -> DropinResolver<'a> {
        DropinResolver {
            fs,
            lookup_path,
            table,
        }
    }

    /// Apply the `.d/*.conf` overlays, then append the entries of the
    /// dependency directories.
    ///
    /// Only a syntax error in an overlay fails, unreadable directories and
    /// files are skipped.
    pub fn resolve_dropins(&self, aliases: &AliasSet, config: &mut UnitConfig) -> Result<()> {
        let prefixes: Vec<String> = dropin_subpaths(aliases)
            .iter()
            .flat_map(|subpath| self.lookup_path.prepend(subpath))
            .collect();

        self.apply_conf_overlays(&prefixes, config)?;

        let param = unit_name_to_instance(aliases.id());
        for (suffix, relation) in self.table {
            for prefix in &prefixes {
                let dir = format!("{}.{}", prefix, suffix);
                self.add_dependency_dir(Path::new(&dir), *relation, param.as_deref(), config);
            }
        }

        Ok(())
    }

    fn list(&self, dir: &Path) -> Option<Vec<String>> {
        match self.fs.list_directory(dir) {
            Ok(v) => Some(v),
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                log::warn!("Failed to read directory {:?}: {}, ignoring.", dir, e);
                None
            }
        }
    }

    fn apply_conf_overlays(&self, prefixes: &[String], config: &mut UnitConfig) -> Result<()> {
        /* file name => path, the first prefix having the name wins */
        let mut overlays: BTreeMap<String, PathBuf> = BTreeMap::new();
        for prefix in prefixes {
            let dir = PathBuf::from(format!("{}.d", prefix));
            let entries = match self.list(&dir) {
                None => continue,
                Some(v) => v,
            };
            for entry in entries {
                if !entry.ends_with(".conf") {
                    continue;
                }
                let path = dir.join(&entry);
                overlays.entry(entry).or_insert(path);
            }
        }

        for path in overlays.values() {
            let content = match self.fs.read_file(path) {
                Ok(v) => v,
                Err(e) => {
                    log::warn!("Failed to read drop-in {:?}: {}, ignoring.", path, e);
                    continue;
                }
            };
            log::debug!("Applying drop-in {:?}", path);
            config.decode_into(&String::from_utf8_lossy(&content))?;
        }

        Ok(())
    }

    fn add_dependency_dir(
        &self,
        dir: &Path,
        relation: UnitRelations,
        param: Option<&str>,
        config: &mut UnitConfig,
    ) {
        let mut entries = match self.list(dir) {
            None => return,
            Some(v) => v,
        };
        entries.sort();

        for entry in entries {
            let info = match unit_name_analyze(&entry) {
                Some(v) => v,
                None => {
                    log::debug!("{:?} in {:?} is not a unit name, ignoring.", entry, dir);
                    continue;
                }
            };

            /* a template entry of an instance gets the same instance */
            let name = match param.filter(|_| info.is_template()) {
                Some(p) => info
                    .instantiate(p)
                    .unwrap_or_else(|| unit_name_canonicalize(&entry)),
                None => unit_name_canonicalize(&entry),
            };

            log::debug!("Adding {}={} from {:?}", relation, name, dir);
            config.append(UNIT_SECTION, relation.key(), name);
        }
    }
}
