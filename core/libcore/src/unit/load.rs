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

//! The resolution pipeline: locate, parse, merge drop-ins, compile, and hand
//! the result to the scheduler.

use super::config::UnitConfig;
use super::deps::EdgeType;
use super::dropin::{default_dropin_table, DropinResolver, DropinTable};
use super::file::{OsUnitFs, UnitFs};
use super::graph::GraphDelta;
use super::locate::{AliasSet, UnitLocator};
use crate::error::*;
use basic::path_lookup::LookupPaths;
use basic::unit_name::{unit_name_canonicalize, unit_name_is_valid, UnitNameFlags};
use std::collections::BTreeMap;
use std::sync::Arc;

/// The scheduler side of the resolver, it owns the dependency graph.
pub trait SchedulerIf {
    /// Take over a resolved unit: its aliases, the edges from it to its peers
    /// and the edges from its peers to it.
    fn load_unit(
        &self,
        aliases: &[String],
        edges_from: &BTreeMap<String, EdgeType>,
        edges_to: &BTreeMap<String, EdgeType>,
    );
}

/// Everything known about one unit after resolution.
#[derive(Debug, Clone)]
pub struct ResolvedUnit {
    /// names and symlink chain
    pub aliases: AliasSet,
    /// fragment merged with its drop-ins
    pub config: UnitConfig,
    /// compiled dependency edges
    pub delta: GraphDelta,
}

/// Resolves unit names against the lookup paths.
pub struct UnitLoad<F: UnitFs = OsUnitFs> {
    fs: F,
    lookup_path: Arc<LookupPaths>,
    dropin_table: Arc<DropinTable>,
}

impl UnitLoad<OsUnitFs> {
    /// resolver over the real file system with the default drop-in directories
    pub fn with_lookup_paths(lookup_path: &Arc<LookupPaths>) -> UnitLoad<OsUnitFs> {
        UnitLoad::new(OsUnitFs, lookup_path, &Arc::new(default_dropin_table()))
    }
}

impl<F: UnitFs> UnitLoad<F> {
    /// new resolver
    pub fn new(
        fs: F,
        lookup_path: &Arc<LookupPaths>,
        dropin_table: &Arc<DropinTable>,
    ) -> UnitLoad<F> {
        UnitLoad {
            fs,
            lookup_path: Arc::clone(lookup_path),
            dropin_table: Arc::clone(dropin_table),
        }
    }

    /// the directories searched, highest priority first
    pub fn lookup_paths(&self) -> &LookupPaths {
        &self.lookup_path
    }

    /// Resolve a unit without telling the scheduler.
    pub fn resolve(&self, name: &str) -> Result<ResolvedUnit> {
        let name = unit_name_canonicalize(name);
        if name.contains('/') {
            return Err(Error::InvalidName {
                what: format!("{} is not a file name", name),
            });
        }
        /* a template is only loaded through one of its instances */
        if unit_name_is_valid(&name, UnitNameFlags::TEMPLATE) {
            return Err(Error::InvalidName {
                what: format!("{} is a template", name),
            });
        }

        let aliases = UnitLocator::new(&self.fs, &self.lookup_path).locate(&name)?;
        log::debug!("Loading {} from {:?}", name, aliases.fragment_path());

        let content = self.fs.read_file(aliases.fragment_path())?;
        let mut config = UnitConfig::decode(&String::from_utf8_lossy(&content))?;

        DropinResolver::new(&self.fs, &self.lookup_path, &self.dropin_table)
            .resolve_dropins(&aliases, &mut config)?;

        let delta = GraphDelta::compile(&config);
        log::debug!(
            "Resolved {}: aliases {:?}, {} edges from, {} edges to",
            name,
            aliases.names(),
            delta.edges_from.len(),
            delta.edges_to.len()
        );

        Ok(ResolvedUnit {
            aliases,
            config,
            delta,
        })
    }

    /// Resolve a unit and hand it to the scheduler. The scheduler is called
    /// exactly once on success, and never on failure.
    pub fn load(&self, name: &str, scheduler: &dyn SchedulerIf) -> Result<ResolvedUnit> {
        let unit = self.resolve(name).map_err(|e| {
            log::error!("Failed to load {}: {}", name, e);
            e
        })?;
        scheduler.load_unit(
            unit.aliases.names(),
            &unit.delta.edges_from,
            &unit.delta.edges_to,
        );
        Ok(unit)
    }
}
