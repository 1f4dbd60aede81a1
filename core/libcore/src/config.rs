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

//! The resolver configuration file
#![allow(non_snake_case)]

use crate::error::*;
use crate::unit::{default_dropin_table, DropinTable, UnitRelations};
use basic::logger::LOG_FILE_PATH;
use basic::path_lookup::LookupPaths;
use confique::{Config, FileFormat, Partial};
use std::collections::BTreeMap;

/// default configuration path
pub const RESOLVER_CONFIG: &str = "/etc/unitgraph/resolver.conf";

/// configuration of the resolver
#[derive(Config, Debug)]
pub struct ResolverConfig {
    /// directories searched for units, highest priority first
    pub LookupPaths: Option<Vec<String>>,
    /// dependency directory suffix => relation key
    pub DropinDirectories: Option<BTreeMap<String, String>>,

    #[config(default = "info")]
    pub LogLevel: String,
    #[config(default = "console")]
    pub LogTarget: String,
    #[config(default = "/var/log/unitgraph.log")]
    pub LogFile: String,
}

impl ResolverConfig {
    /// Load the configuration, falling back to the defaults on any failure.
    ///
    /// The error is handed back instead of logged, the configuration decides
    /// where the log goes.
    pub fn load_or_default(file: Option<&str>) -> (ResolverConfig, Option<Error>) {
        match ResolverConfig::load(file) {
            Ok(v) => (v, None),
            Err(e) => (ResolverConfig::default(), Some(e)),
        }
    }

    /// Load the configuration from the environment, then the file, then the
    /// defaults. A missing file is not an error.
    pub fn load(file: Option<&str>) -> Result<ResolverConfig> {
        type ConfigPartial = <ResolverConfig as Config>::Partial;
        let mut partial: ConfigPartial = Partial::from_env().context(ConfiqueSnafu)?;
        let from_file = confique::File::with_format(file.unwrap_or(RESOLVER_CONFIG), FileFormat::Toml)
            .load()
            .context(ConfiqueSnafu)?;
        partial = partial.with_fallback(from_file);
        partial = partial.with_fallback(ConfigPartial::default_values());
        ResolverConfig::from_partial(partial).context(ConfiqueSnafu)
    }

    /// The configured lookup paths, or the default system directories.
    pub fn lookup_paths(&self) -> LookupPaths {
        match &self.LookupPaths {
            Some(paths) => LookupPaths::from_paths(paths.iter().map(|p| p.as_str())),
            None => LookupPaths::default(),
        }
    }

    /// The configured dependency directories, or wants and requires.
    pub fn dropin_table(&self) -> Result<DropinTable> {
        let dirs = match &self.DropinDirectories {
            None => return Ok(default_dropin_table()),
            Some(v) => v,
        };

        let mut table = DropinTable::new();
        for (suffix, key) in dirs {
            if suffix.is_empty() || suffix.contains('/') {
                return Err(Error::InvalidName {
                    what: format!("drop-in directory suffix {:?}", suffix),
                });
            }
            let relation: UnitRelations = key.parse()?;
            table.push((suffix.to_string(), relation));
        }
        Ok(table)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            LookupPaths: None,
            DropinDirectories: None,
            LogLevel: "info".to_string(),
            LogTarget: "console".to_string(),
            LogFile: LOG_FILE_PATH.to_string(),
        }
    }
}
