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

#[cfg(test)]
pub(crate) mod test_utils {
    use std::cell::RefCell;
    use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
    use std::path::{Path, PathBuf};

    use crate::error::*;
    use crate::unit::{EdgeType, SchedulerIf, UnitFs};

    /// A file tree kept in memory: regular files, symlinks and directories.
    #[derive(Default)]
    pub(crate) struct MemUnitFs {
        files: HashMap<PathBuf, Vec<u8>>,
        links: HashMap<PathBuf, PathBuf>,
        dirs: HashMap<PathBuf, BTreeSet<String>>,
        broken: HashSet<PathBuf>,
    }

    impl MemUnitFs {
        pub(crate) fn new() -> MemUnitFs {
            MemUnitFs::default()
        }

        fn add_entry(&mut self, path: &Path) {
            if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
                self.dirs
                    .entry(parent.to_path_buf())
                    .or_default()
                    .insert(name.to_string_lossy().to_string());
            }
        }

        pub(crate) fn add_file(&mut self, path: &str, content: &str) {
            let path = PathBuf::from(path);
            self.add_entry(&path);
            self.files.insert(path, content.as_bytes().to_vec());
        }

        pub(crate) fn add_link(&mut self, path: &str, target: &str) {
            let path = PathBuf::from(path);
            self.add_entry(&path);
            self.links.insert(path, PathBuf::from(target));
        }

        /// a directory whose entries are names only
        pub(crate) fn add_dir(&mut self, path: &str, entries: &[&str]) {
            let path = PathBuf::from(path);
            self.add_entry(&path);
            let dir = self.dirs.entry(path).or_default();
            for e in entries {
                dir.insert(e.to_string());
            }
        }

        /// a directory that fails to be listed with something other than NotFound
        pub(crate) fn add_broken_dir(&mut self, path: &str) {
            let path = PathBuf::from(path);
            self.add_entry(&path);
            self.broken.insert(path);
        }
    }

    impl UnitFs for MemUnitFs {
        fn resolve_symlink_chain(&self, path: &Path) -> Result<Vec<PathBuf>> {
            let mut chain = Vec::new();
            let mut cur = path.to_path_buf();
            for _ in 0..32 {
                chain.push(cur.clone());
                match self.links.get(&cur) {
                    Some(target) => cur = target.clone(),
                    None if self.files.contains_key(&cur) => return Ok(chain),
                    None => {
                        return Err(Error::NotFound {
                            what: cur.to_string_lossy().to_string(),
                        })
                    }
                }
            }
            Err(Error::Io {
                source: std::io::Error::new(std::io::ErrorKind::Other, "too many links"),
            })
        }

        fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
            let chain = self.resolve_symlink_chain(path)?;
            match chain.last().and_then(|p| self.files.get(p)) {
                Some(v) => Ok(v.clone()),
                None => Err(Error::NotFound {
                    what: path.to_string_lossy().to_string(),
                }),
            }
        }

        fn list_directory(&self, path: &Path) -> Result<Vec<String>> {
            if self.broken.contains(path) {
                return Err(Error::Io {
                    source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
                });
            }
            match self.dirs.get(path) {
                Some(v) => Ok(v.iter().cloned().collect()),
                None => Err(Error::NotFound {
                    what: path.to_string_lossy().to_string(),
                }),
            }
        }
    }

    /// One load_unit call.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub(crate) struct LoadRecord {
        pub(crate) aliases: Vec<String>,
        pub(crate) edges_from: BTreeMap<String, EdgeType>,
        pub(crate) edges_to: BTreeMap<String, EdgeType>,
    }

    /// A scheduler remembering every unit handed over.
    #[derive(Default)]
    pub(crate) struct RecordingScheduler {
        pub(crate) records: RefCell<Vec<LoadRecord>>,
    }

    impl SchedulerIf for RecordingScheduler {
        fn load_unit(
            &self,
            aliases: &[String],
            edges_from: &BTreeMap<String, EdgeType>,
            edges_to: &BTreeMap<String, EdgeType>,
        ) {
            self.records.borrow_mut().push(LoadRecord {
                aliases: aliases.to_vec(),
                edges_from: edges_from.clone(),
                edges_to: edges_to.clone(),
            });
        }
    }
}
