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

//! Error define. Within this crate only this unified Error is used.
//!
//! NotFound is benign: the unit or a drop-in directory simply does not exist.
//! Syntax aborts the resolution of the unit carrying the bad line. Io aborts
//! the resolution when it hits the fragment, and is only logged for drop-ins.

use snafu::prelude::*;
#[allow(unused_imports)]
pub use snafu::ResultExt;

/// unitcore Error
#[allow(missing_docs)]
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
#[non_exhaustive]
pub enum Error {
    #[snafu(display("NotFound(unitcore): '{}'.", what))]
    NotFound { what: String },

    #[snafu(display("Failed to parse line <{}>", line))]
    Syntax { line: String },

    #[snafu(display("IoError(unitcore): {}", source))]
    Io { source: std::io::Error },

    #[snafu(display("UtilError(unitcore): {}", source))]
    Util { source: basic::Error },

    #[snafu(display("unit {} is masked.", name))]
    Masked { name: String },

    #[snafu(display("Invalid Name: {}", what))]
    InvalidName { what: String },

    #[snafu(display("Confique error: {}", source))]
    Confique { source: confique::Error },
}

impl Error {
    /// The unit or directory does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

impl From<basic::Error> for Error {
    fn from(e: basic::Error) -> Self {
        if e.is_not_found() {
            return Error::NotFound {
                what: e.to_string(),
            };
        }
        Error::Util { source: e }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        if e.kind() == std::io::ErrorKind::NotFound {
            return Error::NotFound {
                what: e.to_string(),
            };
        }
        Error::Io { source: e }
    }
}

/// new Result
pub type Result<T, E = Error> = std::result::Result<T, E>;
