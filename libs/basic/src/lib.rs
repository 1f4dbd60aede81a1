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

//! Shared helpers of the unit resolver: unit names, symlink chains, lookup paths and logging.
pub mod error;
pub use error::*;
#[cfg(feature = "fs")]
pub mod fs;
pub mod logger;
pub mod path_lookup;
#[cfg(feature = "unit_name")]
pub mod unit_name;

/// the unit resolved when none is named
pub const DEFAULT_TARGET: &str = "default.target";

/// the path masked units are linked to
pub const DEV_NULL: &str = "/dev/null";
