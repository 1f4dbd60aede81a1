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

use super::config::{UnitConfig, UNIT_SECTION};
use super::deps::{unit_relation_reverse, unit_relation_to_edge, EdgeType, UnitRelations};
use std::collections::BTreeMap;

/// The edges one unit adds to the scheduler graph, keyed by peer unit name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GraphDelta {
    /// this unit => peer
    pub edges_from: BTreeMap<String, EdgeType>,
    /// peer => this unit
    pub edges_to: BTreeMap<String, EdgeType>,
}

impl GraphDelta {
    /// Compile the dependency keys of the [Unit] section.
    ///
    /// Every relation also yields its reverse towards the peer, so the peer
    /// does not have to declare it.
    pub fn compile(config: &UnitConfig) -> GraphDelta {
        let mut delta = GraphDelta::default();
        let section = match config.section(UNIT_SECTION) {
            None => return delta,
            Some(v) => v,
        };

        for relation in UnitRelations::iterator() {
            let values = match section.get(relation.key()) {
                None => continue,
                Some(v) => v,
            };
            for peer in values.iter().flat_map(|v| v.split_whitespace()) {
                delta.add_relation(relation, peer);
            }
        }

        delta
    }

    fn add_relation(&mut self, relation: UnitRelations, peer: &str) {
        let forward = unit_relation_to_edge(relation);
        if !forward.is_empty() {
            *self
                .edges_from
                .entry(peer.to_string())
                .or_insert_with(EdgeType::empty) |= forward;
        }

        let reverse = unit_relation_to_edge(unit_relation_reverse(relation));
        if !reverse.is_empty() {
            *self
                .edges_to
                .entry(peer.to_string())
                .or_insert_with(EdgeType::empty) |= reverse;
        }
    }

    /// no edge in either direction
    pub fn is_empty(&self) -> bool {
        self.edges_from.is_empty() && self.edges_to.is_empty()
    }
}
