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

//! error definitions
use snafu::prelude::*;
#[allow(unused_imports)]
pub use snafu::ResultExt;

#[allow(missing_docs)]
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("Io: {}", source))]
    Io { source: std::io::Error },

    #[snafu(display("Errno: {}", source))]
    Nix { source: nix::Error },

    #[snafu(display("Not exist: '{}'.", what))]
    NotExisted { what: String },

    #[snafu(display("Invalid: '{}'.", what))]
    Invalid { what: String },
}

impl Error {
    /// Translate the basic error to error number.
    pub fn get_errno(&self) -> i32 {
        match self {
            Error::Io { source } => source.raw_os_error().unwrap_or_default(),
            Error::Nix { source } => *source as i32,
            Error::NotExisted { what: _ } => nix::errno::Errno::ENOENT as i32,
            Error::Invalid { what: _ } => nix::errno::Errno::EINVAL as i32,
        }
    }

    /// Whether the error means the object does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Io { source } => source.kind() == std::io::ErrorKind::NotFound,
            _ => self.get_errno() == nix::errno::Errno::ENOENT as i32,
        }
    }
}

///
pub type Result<T, E = Error> = std::result::Result<T, E>;
