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

//! the management of the unit file lookup path

/// unit lookup path in /etc
pub const ETC_SYSTEM_PATH: &str = "/etc/systemd/system";
/// unit lookup path in /usr/lib
pub const LIB_SYSTEM_PATH: &str = "/usr/lib/systemd/system";

/// struct LookupPaths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupPaths {
    /// Used to search fragment and dropin, the first one has the highest priority
    pub search_path: Vec<String>,
}

impl LookupPaths {
    /// new
    pub fn new() -> Self {
        LookupPaths {
            search_path: Vec::new(),
        }
    }

    /// build from an explicit directory list, keeping the given priority order
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut lp = LookupPaths::new();
        for p in paths {
            let p: String = p.into();
            /* "/etc/systemd/system/" and "/etc/systemd/system" are the same directory */
            let p = match p.trim_end_matches('/') {
                "" => "/".to_string(),
                v => v.to_string(),
            };
            if !lp.search_path.contains(&p) {
                lp.search_path.push(p);
            }
        }
        lp
    }

    /// init lookup paths
    pub fn init_lookup_paths(&mut self) {
        self.search_path.push(ETC_SYSTEM_PATH.to_string());
        self.search_path.push(LIB_SYSTEM_PATH.to_string());
    }

    /// prepend every search path to subpath
    pub fn prepend(&self, subpath: &str) -> Vec<String> {
        self.search_path
            .iter()
            .map(|dir| format!("{}/{}", dir, subpath))
            .collect()
    }
}

impl Default for LookupPaths {
    fn default() -> Self {
        let mut lp = Self::new();
        lp.init_lookup_paths();
        lp
    }
}
