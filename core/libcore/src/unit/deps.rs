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

use crate::error::*;
use bitflags::bitflags;
use std::{fmt, str::FromStr};

/// The dependency keys of the [Unit] section.
#[allow(missing_docs)]
#[derive(Hash, PartialEq, Eq, PartialOrd, Ord, Copy, Clone, Debug)]
pub enum UnitRelations {
    UnitRequires,
    UnitRequisite,
    UnitWants,
    UnitBindsTo,
    UnitPartOf,
    UnitUpHolds,

    UnitRequiresBy,
    UnitRequisiteOf,
    UnitWantsBy,
    UnitBoundBy,
    UnitConsistsOf,
    UnitUpHeldBy,

    UnitConflicts,
    UnitConflictedBy,

    UnitBefore,
    UnitAfter,

    UnitOnSuccess,
    UnitOnSuccessOf,
    UnitOnFailure,
    UnitOnFailureOf,

    UnitTriggers,
    UnitTriggeredBy,

    UnitPropagatesReloadTo,
    UnitReloadPropagatedFrom,

    UnitPropagatesStopTo,
    UnitStopPropagatedFrom,
}

impl UnitRelations {
    /// every relation, in declaration order
    pub fn iterator() -> impl Iterator<Item = UnitRelations> {
        [
            UnitRelations::UnitRequires,
            UnitRelations::UnitRequisite,
            UnitRelations::UnitWants,
            UnitRelations::UnitBindsTo,
            UnitRelations::UnitPartOf,
            UnitRelations::UnitUpHolds,
            UnitRelations::UnitRequiresBy,
            UnitRelations::UnitRequisiteOf,
            UnitRelations::UnitWantsBy,
            UnitRelations::UnitBoundBy,
            UnitRelations::UnitConsistsOf,
            UnitRelations::UnitUpHeldBy,
            UnitRelations::UnitConflicts,
            UnitRelations::UnitConflictedBy,
            UnitRelations::UnitBefore,
            UnitRelations::UnitAfter,
            UnitRelations::UnitOnSuccess,
            UnitRelations::UnitOnSuccessOf,
            UnitRelations::UnitOnFailure,
            UnitRelations::UnitOnFailureOf,
            UnitRelations::UnitTriggers,
            UnitRelations::UnitTriggeredBy,
            UnitRelations::UnitPropagatesReloadTo,
            UnitRelations::UnitReloadPropagatedFrom,
            UnitRelations::UnitPropagatesStopTo,
            UnitRelations::UnitStopPropagatedFrom,
        ]
        .iter()
        .copied()
    }

    /// the key spelling used in unit files
    pub fn key(&self) -> &'static str {
        match self {
            UnitRelations::UnitRequires => "Requires",
            UnitRelations::UnitRequisite => "Requisite",
            UnitRelations::UnitWants => "Wants",
            UnitRelations::UnitBindsTo => "BindsTo",
            UnitRelations::UnitPartOf => "PartOf",
            UnitRelations::UnitUpHolds => "Upholds",
            UnitRelations::UnitRequiresBy => "RequiredBy",
            UnitRelations::UnitRequisiteOf => "RequisiteOf",
            UnitRelations::UnitWantsBy => "WantedBy",
            UnitRelations::UnitBoundBy => "BoundBy",
            UnitRelations::UnitConsistsOf => "ConsistsOf",
            UnitRelations::UnitUpHeldBy => "UpheldBy",
            UnitRelations::UnitConflicts => "Conflicts",
            UnitRelations::UnitConflictedBy => "ConflictedBy",
            UnitRelations::UnitBefore => "Before",
            UnitRelations::UnitAfter => "After",
            UnitRelations::UnitOnSuccess => "OnSuccess",
            UnitRelations::UnitOnSuccessOf => "OnSuccessOf",
            UnitRelations::UnitOnFailure => "OnFailure",
            UnitRelations::UnitOnFailureOf => "OnFailureOf",
            UnitRelations::UnitTriggers => "Triggers",
            UnitRelations::UnitTriggeredBy => "TriggeredBy",
            UnitRelations::UnitPropagatesReloadTo => "PropagatesReloadTo",
            UnitRelations::UnitReloadPropagatedFrom => "ReloadPropagatedFrom",
            UnitRelations::UnitPropagatesStopTo => "PropagatesStopTo",
            UnitRelations::UnitStopPropagatedFrom => "StopPropagatedFrom",
        }
    }
}

impl FromStr for UnitRelations {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match UnitRelations::iterator().find(|r| r.key() == s) {
            Some(v) => Ok(v),
            None => Err(Error::InvalidName {
                what: format!("unknown dependency key {}", s),
            }),
        }
    }
}

impl fmt::Display for UnitRelations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

bitflags! {
    /// What an edge from one unit to a peer asks the scheduler to do.
    pub struct EdgeType: u32 {
        /// For a start job, enqueue a required start job on the peer.
        const ADD_START = 1 << 0;
        /// For a start job, enqueue a start job on the peer, ignoring its result.
        const ADD_START_NONREQ = 1 << 1;
        /// For a start job, enqueue a required verify job on the peer.
        const ADD_VERIFY = 1 << 2;
        /// For a start job, enqueue a required stop job on the peer.
        const ADD_STOP = 1 << 3;
        /// For a start job, enqueue a stop job on the peer, ignoring its result.
        const ADD_STOP_NONREQ = 1 << 4;
        /// For a stop job, enqueue a stop job on the peer.
        const PROPAGATES_STOP_TO = 1 << 5;
        /// For a restart job, enqueue a try-restart job on the peer.
        const PROPAGATES_RESTART_TO = 1 << 6;
        /// For a reload job, enqueue a try-reload job on the peer.
        const PROPAGATES_RELOAD_TO = 1 << 7;
        /// On unexpected start, start the peer.
        const START_ON_STARTED = 1 << 8;
        /// On unexpected start, start the peer unless that reverses an upcoming job.
        const TRY_START_ON_STARTED = 1 << 9;
        /// On unexpected start, stop the peer.
        const STOP_ON_STARTED = 1 << 10;
        /// On unexpected stop, stop the peer.
        const STOP_ON_STOPPED = 1 << 11;
        /// On going offline from online, start the peer.
        const ON_SUCCESS = 1 << 12;
        /// On entering the failed state, start the peer.
        const ON_FAILURE = 1 << 13;
        /// Run after an existing job of the peer in a transaction.
        const AFTER = 1 << 14;
        /// Run before an existing job of the peer in a transaction.
        const BEFORE = 1 << 15;
    }
}

const EDGE_TYPE_NAMES: [(EdgeType, &str); 16] = [
    (EdgeType::ADD_START, "AddStart"),
    (EdgeType::ADD_START_NONREQ, "AddStartNonreq"),
    (EdgeType::ADD_VERIFY, "AddVerify"),
    (EdgeType::ADD_STOP, "AddStop"),
    (EdgeType::ADD_STOP_NONREQ, "AddStopNonreq"),
    (EdgeType::PROPAGATES_STOP_TO, "PropagatesStopTo"),
    (EdgeType::PROPAGATES_RESTART_TO, "PropagatesRestartTo"),
    (EdgeType::PROPAGATES_RELOAD_TO, "PropagatesReloadTo"),
    (EdgeType::START_ON_STARTED, "StartOnStarted"),
    (EdgeType::TRY_START_ON_STARTED, "TryStartOnStarted"),
    (EdgeType::STOP_ON_STARTED, "StopOnStarted"),
    (EdgeType::STOP_ON_STOPPED, "StopOnStopped"),
    (EdgeType::ON_SUCCESS, "OnSuccess"),
    (EdgeType::ON_FAILURE, "OnFailure"),
    (EdgeType::AFTER, "After"),
    (EdgeType::BEFORE, "Before"),
];

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        let names: Vec<&str> = EDGE_TYPE_NAMES
            .iter()
            .filter(|(t, _)| self.contains(*t))
            .map(|(_, n)| *n)
            .collect();
        f.write_str(&names.join("|"))
    }
}

/// The edge a relation declared by a unit sets up from that unit to the peer.
/// An empty mask is recorded for bookkeeping only.
pub fn unit_relation_to_edge(relation: UnitRelations) -> EdgeType {
    match relation {
        UnitRelations::UnitRequires | UnitRelations::UnitBindsTo => {
            EdgeType::ADD_START | EdgeType::START_ON_STARTED
        }
        UnitRelations::UnitRequisite => EdgeType::ADD_VERIFY,
        UnitRelations::UnitWants => EdgeType::ADD_START_NONREQ | EdgeType::TRY_START_ON_STARTED,
        UnitRelations::UnitUpHolds => EdgeType::ADD_START_NONREQ | EdgeType::START_ON_STARTED,
        UnitRelations::UnitRequiresBy
        | UnitRelations::UnitRequisiteOf
        | UnitRelations::UnitConsistsOf => {
            EdgeType::PROPAGATES_STOP_TO | EdgeType::PROPAGATES_RESTART_TO
        }
        UnitRelations::UnitBoundBy => {
            EdgeType::PROPAGATES_STOP_TO
                | EdgeType::PROPAGATES_RESTART_TO
                | EdgeType::STOP_ON_STOPPED
        }
        UnitRelations::UnitConflicts => EdgeType::ADD_STOP | EdgeType::STOP_ON_STARTED,
        UnitRelations::UnitConflictedBy => EdgeType::ADD_STOP_NONREQ | EdgeType::STOP_ON_STARTED,
        UnitRelations::UnitBefore => EdgeType::BEFORE,
        UnitRelations::UnitAfter => EdgeType::AFTER,
        UnitRelations::UnitOnSuccess => EdgeType::ON_SUCCESS,
        UnitRelations::UnitOnFailure => EdgeType::ON_FAILURE,
        UnitRelations::UnitPropagatesReloadTo => EdgeType::PROPAGATES_RELOAD_TO,
        UnitRelations::UnitPropagatesStopTo => {
            EdgeType::PROPAGATES_STOP_TO | EdgeType::STOP_ON_STOPPED
        }
        UnitRelations::UnitPartOf
        | UnitRelations::UnitWantsBy
        | UnitRelations::UnitUpHeldBy
        | UnitRelations::UnitOnSuccessOf
        | UnitRelations::UnitOnFailureOf
        | UnitRelations::UnitTriggers
        | UnitRelations::UnitTriggeredBy
        | UnitRelations::UnitReloadPropagatedFrom
        | UnitRelations::UnitStopPropagatedFrom => EdgeType::empty(),
    }
}

/// The relation the peer holds towards the declaring unit.
pub fn unit_relation_reverse(relation: UnitRelations) -> UnitRelations {
    match relation {
        UnitRelations::UnitRequires => UnitRelations::UnitRequiresBy,
        UnitRelations::UnitRequiresBy => UnitRelations::UnitRequires,
        UnitRelations::UnitRequisite => UnitRelations::UnitRequisiteOf,
        UnitRelations::UnitRequisiteOf => UnitRelations::UnitRequisite,
        UnitRelations::UnitWants => UnitRelations::UnitWantsBy,
        UnitRelations::UnitWantsBy => UnitRelations::UnitWants,
        UnitRelations::UnitBindsTo => UnitRelations::UnitBoundBy,
        UnitRelations::UnitBoundBy => UnitRelations::UnitBindsTo,
        UnitRelations::UnitPartOf => UnitRelations::UnitConsistsOf,
        UnitRelations::UnitConsistsOf => UnitRelations::UnitPartOf,
        UnitRelations::UnitUpHolds => UnitRelations::UnitUpHeldBy,
        UnitRelations::UnitUpHeldBy => UnitRelations::UnitUpHolds,
        UnitRelations::UnitConflicts => UnitRelations::UnitConflictedBy,
        UnitRelations::UnitConflictedBy => UnitRelations::UnitConflicts,
        UnitRelations::UnitBefore => UnitRelations::UnitAfter,
        UnitRelations::UnitAfter => UnitRelations::UnitBefore,
        UnitRelations::UnitOnSuccess => UnitRelations::UnitOnSuccessOf,
        UnitRelations::UnitOnSuccessOf => UnitRelations::UnitOnSuccess,
        UnitRelations::UnitOnFailure => UnitRelations::UnitOnFailureOf,
        UnitRelations::UnitOnFailureOf => UnitRelations::UnitOnFailure,
        UnitRelations::UnitTriggers => UnitRelations::UnitTriggeredBy,
        UnitRelations::UnitTriggeredBy => UnitRelations::UnitTriggers,
        UnitRelations::UnitPropagatesReloadTo => UnitRelations::UnitReloadPropagatedFrom,
        UnitRelations::UnitReloadPropagatedFrom => UnitRelations::UnitPropagatesReloadTo,
        UnitRelations::UnitPropagatesStopTo => UnitRelations::UnitStopPropagatedFrom,
        UnitRelations::UnitStopPropagatedFrom => UnitRelations::UnitPropagatesStopTo,
    }
}
