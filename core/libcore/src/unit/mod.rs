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

//! Unit resolution: from a unit name to its aliases, its merged config and
//! the dependency edges it adds to the scheduler graph.
pub use config::{UnitConfig, UnitSection, TOP_LEVEL_SECTION, UNIT_SECTION};
pub use deps::{unit_relation_reverse, unit_relation_to_edge, EdgeType, UnitRelations};
pub use dropin::{default_dropin_table, dropin_subpaths, DropinResolver, DropinTable};
pub use file::{OsUnitFs, UnitFs};
pub use graph::GraphDelta;
pub use load::{ResolvedUnit, SchedulerIf, UnitLoad};
pub use locate::{AliasSet, UnitLocator};

mod config;
mod deps;
mod dropin;
mod file;
mod graph;
mod load;
mod locate;
mod test;
