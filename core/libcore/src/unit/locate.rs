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

use super::file::UnitFs;
use crate::error::*;
use basic::fs::path_basename;
use basic::path_lookup::LookupPaths;
use basic::unit_name::{unit_name_analyze, unit_name_canonicalize};
use basic::DEV_NULL;
use std::path::{Path, PathBuf};

/// All the names one fragment is reachable under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasSet {
    names: Vec<String>,
    paths: Vec<PathBuf>,
}

impl AliasSet {
    fn new(paths: Vec<PathBuf>) -> AliasSet {
        let mut set = AliasSet {
            names: Vec::new(),
            paths,
        };
        let names: Vec<String> = set
            .paths
            .iter()
            .filter_map(|p| path_basename(p))
            .map(|n| unit_name_canonicalize(&n))
            .collect();
        for n in names {
            set.push_name(n);
        }
        set
    }

    fn push_name(&mut self, name: String) {
        if !self.names.contains(&name) {
            self.names.push(name);
        }
    }

    /// canonical alias names, in link resolution order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// the symlink chain the names were derived from
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// the path the fragment is read through
    pub fn fragment_path(&self) -> &Path {
        /* the chain is never empty, see UnitLocator::search_fragment */
        &self.paths[0]
    }

    /// the name the unit was located by
    pub fn id(&self) -> &str {
        &self.names[0]
    }

    /// whether name is one of the aliases
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// Find the fragment of a unit in the lookup paths.
pub struct UnitLocator<'a> {
    fs: &'a dyn UnitFs,
    lookup_path: &'a LookupPaths,
}

impl<'a> UnitLocator<'a> {
    /// new locator
    pub fn new(fs: &'a dyn UnitFs, lookup_path: &'a LookupPaths) -> UnitLocator<'a> {
        UnitLocator { fs, lookup_path }
    }

    /// Locate the fragment of name and every alias of it.
    ///
    /// An instance without a fragment of its own falls back to its template.
    pub fn locate(&self, name: &str) -> Result<AliasSet> {
        let name = unit_name_canonicalize(name);
        /* the chain starts with dir/name, so the requested name comes first */
        if let Some(chain) = self.search_fragment(&name)? {
            return Ok(AliasSet::new(chain));
        }

        let info = match unit_name_analyze(&name) {
            Some(v) if v.is_instance() => v,
            _ => {
                return Err(Error::NotFound {
                    what: format!("unit {}", name),
                })
            }
        };
        let template = match info.template_name() {
            Some(v) => v,
            None => {
                return Err(Error::NotFound {
                    what: format!("unit {}", name),
                })
            }
        };
        let param = info.param.unwrap_or_default();

        let chain = match self.search_fragment(&template)? {
            Some(v) => v,
            None => {
                return Err(Error::NotFound {
                    what: format!("unit {} or its template {}", name, template),
                })
            }
        };
        log::debug!("Using the template fragment {:?} for {}", chain[0], name);

        let template_set = AliasSet::new(chain.clone());
        let mut set = AliasSet {
            names: vec![name.clone()],
            paths: chain,
        };
        for alias in template_set.names() {
            match unit_name_analyze(alias).and_then(|i| i.instantiate(&param)) {
                Some(v) => set.push_name(v),
                None => log::debug!(
                    "Alias {} of template {} is not a template, ignoring.",
                    alias,
                    template
                ),
            }
        }
        Ok(set)
    }

    /* Ok(None) if no lookup path has the name. */
    fn search_fragment(&self, name: &str) -> Result<Option<Vec<PathBuf>>> {
        for dir in &self.lookup_path.search_path {
            let path = Path::new(dir).join(name);
            let chain = match self.fs.resolve_symlink_chain(&path) {
                Ok(v) => v,
                Err(e) if e.is_not_found() => continue,
                Err(e) => {
                    log::debug!("Failed to resolve {:?}: {}, ignoring.", path, e);
                    continue;
                }
            };
            if chain.is_empty() {
                continue;
            }

            log::debug!("Found fragment of {} at {}, symlink chain: {:?}", name, dir, chain);
            /* One is enough, the first lookup path has the highest priority. */
            if chain.iter().any(|p| p == Path::new(DEV_NULL)) {
                return Err(Error::Masked {
                    name: name.to_string(),
                });
            }
            return Ok(Some(chain));
        }

        Ok(None)
    }
}
