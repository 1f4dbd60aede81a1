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

//! The file system primitives the resolver reads unit files through
use crate::error::*;
use std::fs;
use std::path::{Path, PathBuf};

///The trait Defining the read-only file access of the resolver
///
/// Every method reports a missing path as Error::NotFound, and any other
/// failure as Error::Io or Error::Util.
pub trait UnitFs {
    /// the path itself followed by every link target, in resolution order
    fn resolve_symlink_chain(&self, path: &Path) -> Result<Vec<PathBuf>>;

    /// the whole content of a file
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;

    /// the entry names of a directory, in no particular order
    fn list_directory(&self, path: &Path) -> Result<Vec<String>>;
}

/// UnitFs on top of the real file system
#[derive(Debug, Default, Clone, Copy)]
pub struct OsUnitFs;

impl UnitFs for OsUnitFs {
    fn resolve_symlink_chain(&self, path: &Path) -> Result<Vec<PathBuf>> {
        Ok(basic::fs::chase_symlink_chain(path)?)
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(fs::read(path)?)
    }

    fn list_directory(&self, path: &Path) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        Ok(names)
    }
}

impl<T: UnitFs + ?Sized> UnitFs for &T {
    fn resolve_symlink_chain(&self, path: &Path) -> Result<Vec<PathBuf>> {
        (**self).resolve_symlink_chain(path)
    }

    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        (**self).read_file(path)
    }

    fn list_directory(&self, path: &Path) -> Result<Vec<String>> {
        (**self).list_directory(path)
    }
}
