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

//! the utils of the path operation
use crate::error::*;
use std::path::{Path, PathBuf};

const CHASE_SYMLINK_MAX: i32 = 32;

/// Replace unstable is_symlink method in std
pub fn is_symlink(path: &Path) -> bool {
    let md = match path.symlink_metadata() {
        Ok(md) => md,
        Err(_) => return false,
    };

    md.file_type().is_symlink()
}

/// Resolve one link step: relative targets are taken relative to the link's directory.
fn read_link_target(link_path: &Path) -> Result<PathBuf> {
    let target_path = std::fs::read_link(link_path).context(IoSnafu)?;
    if !target_path.is_relative() {
        return Ok(target_path);
    }

    let mut current_dir = match link_path.parent() {
        None => {
            return Err(Error::NotExisted {
                what: "couldn't determine parent directory".to_string(),
            })
        }
        Some(v) => v.to_string_lossy().to_string(),
    };
    /* empty current_dir joined with "/target_path" will generate root directory mistakenly. */
    if current_dir.is_empty() {
        current_dir = ".".to_string();
    }

    let joined = current_dir + "/" + &target_path.to_string_lossy();
    match path_simplify(&joined) {
        None => Err(Error::Invalid {
            what: format!("invalid file path: {}", joined),
        }),
        Some(v) => Ok(PathBuf::from(v)),
    }
}

/// Follow the symlink chain starting at `path`.
///
/// The result starts with `path` itself, followed by every link target in
/// resolution order; the last element is not a symlink.
pub fn chase_symlink_chain(path: &Path) -> Result<Vec<PathBuf>> {
    if path.symlink_metadata().is_err() {
        return Err(Error::NotExisted {
            what: path.to_string_lossy().to_string(),
        });
    }

    let mut chain = vec![path.to_path_buf()];
    let mut current_path = path.to_path_buf();
    let mut max_follows = CHASE_SYMLINK_MAX;
    while is_symlink(&current_path) {
        max_follows -= 1;
        if max_follows < 0 {
            return Err(Error::Nix {
                source: nix::errno::Errno::ELOOP,
            });
        }

        let target_path = read_link_target(&current_path)?;
        if target_path.symlink_metadata().is_err() {
            /* dangling link */
            return Err(Error::NotExisted {
                what: target_path.to_string_lossy().to_string(),
            });
        }
        chain.push(target_path.clone());
        current_path = target_path;
    }

    Ok(chain)
}

/// Remove redundant inner and trailing slashes and unnecessary dots to simplify path.
/// e.g., //foo//.//bar/ becomes /foo/bar
/// /foo/foo1/../bar becomes /foo/bar
pub fn path_simplify(p: &str) -> Option<String> {
    let absolute = p.starts_with('/');
    let mut stack: Vec<&str> = Vec::new();
    for f in p.split('/') {
        match f {
            "" | "." => continue,
            ".." => match stack.last() {
                Some(v) if *v != ".." => {
                    stack.pop();
                }
                /* can't go above the root */
                _ if absolute => return None,
                _ => stack.push(f),
            },
            _ => stack.push(f),
        }
    }

    let joined = stack.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => Some(format!("/{}", joined)),
        (false, true) => Some(".".to_string()),
        (false, false) => Some(joined),
    }
}

/// Get the last component of a path as a String.
pub fn path_basename(path: &Path) -> Option<String> {
    path.file_name().map(|v| v.to_string_lossy().to_string())
}
