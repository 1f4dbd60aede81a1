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

//! uresolve: resolve units and print the dependency edges they add

use basic::logger;
use clap::Parser;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::process::exit;
use std::sync::Arc;
use unitcore::config::ResolverConfig;
use unitcore::unit::{EdgeType, SchedulerIf, UnitLoad};

/// parse program arguments
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Configuration file
    #[clap(short, long)]
    config: Option<String>,

    /// Directory searched for units, highest priority first; replaces the
    /// configured lookup paths
    #[clap(short = 'p', long = "lookup-path")]
    lookup_path: Vec<String>,

    /// Maximum log level: error, warn, info, debug or trace
    #[clap(long)]
    log_level: Option<String>,

    /// Print a Graphviz digraph instead of text
    #[clap(long)]
    dot: bool,

    /// Units to resolve, default.target if none
    units: Vec<String>,
}

/// Prints every unit it is handed.
struct TextScheduler;

impl SchedulerIf for TextScheduler {
    fn load_unit(
        &self,
        aliases: &[String],
        edges_from: &BTreeMap<String, EdgeType>,
        edges_to: &BTreeMap<String, EdgeType>,
    ) {
        println!("{}", aliases.join(" "));
        for (peer, edge) in edges_from {
            println!("  -> {}: {}", peer, edge);
        }
        for (peer, edge) in edges_to {
            println!("  <- {}: {}", peer, edge);
        }
    }
}

/// Collects the edges of every unit into one digraph.
#[derive(Default)]
struct DotScheduler {
    lines: RefCell<Vec<String>>,
}

impl DotScheduler {
    fn render(&self) -> String {
        let mut out = String::from("digraph units {\n");
        for l in self.lines.borrow().iter() {
            out.push_str("    ");
            out.push_str(l);
            out.push('\n');
        }
        out.push_str("}\n");
        out
    }
}

impl SchedulerIf for DotScheduler {
    fn load_unit(
        &self,
        aliases: &[String],
        edges_from: &BTreeMap<String, EdgeType>,
        edges_to: &BTreeMap<String, EdgeType>,
    ) {
        let id = match aliases.first() {
            None => return,
            Some(v) => v,
        };
        let mut lines = self.lines.borrow_mut();
        for (peer, edge) in edges_from {
            lines.push(format!("\"{}\" -> \"{}\" [label=\"{}\"];", id, peer, edge));
        }
        for (peer, edge) in edges_to {
            lines.push(format!("\"{}\" -> \"{}\" [label=\"{}\"];", peer, id, edge));
        }
    }
}

fn main() {
    let args = Args::parse();

    let (config, config_err) = ResolverConfig::load_or_default(args.config.as_deref());
    let level = args.log_level.as_deref().unwrap_or(&config.LogLevel);
    logger::init_log(
        "uresolve",
        logger::parse_level(level),
        &config.LogTarget,
        &config.LogFile,
    );
    if let Some(e) = config_err {
        log::warn!("Failed to load the resolver configuration: {}, using defaults.", e);
    }

    let lookup_path = if args.lookup_path.is_empty() {
        config.lookup_paths()
    } else {
        basic::path_lookup::LookupPaths::from_paths(args.lookup_path.iter().map(|p| p.as_str()))
    };

    let dropin_table = match config.dropin_table() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Invalid DropinDirectories: {}", e);
            exit(1);
        }
    };

    let load = UnitLoad::new(
        unitcore::unit::OsUnitFs,
        &Arc::new(lookup_path),
        &Arc::new(dropin_table),
    );
    log::debug!("Lookup paths: {:?}", load.lookup_paths().search_path);

    let text = TextScheduler;
    let dot = DotScheduler::default();
    let scheduler: &dyn SchedulerIf = if args.dot { &dot } else { &text };

    let units = match args.units.is_empty() {
        true => vec![basic::DEFAULT_TARGET.to_string()],
        false => args.units.clone(),
    };

    let mut failed = false;
    for name in &units {
        if let Err(e) = load.load(name, scheduler) {
            eprintln!("Failed to resolve {}: {}", name, e);
            failed = true;
        }
    }

    if args.dot {
        print!("{}", dot.render());
    }

    if failed {
        exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_render() {
        let dot = DotScheduler::default();
        let mut from = BTreeMap::new();
        from.insert("basic.target".to_string(), EdgeType::AFTER);
        let mut to = BTreeMap::new();
        to.insert("basic.target".to_string(), EdgeType::BEFORE);
        dot.load_unit(&["sshd.service".to_string()], &from, &to);
        assert_eq!(
            dot.render(),
            "digraph units {\n    \"sshd.service\" -> \"basic.target\" [label=\"After\"];\n    \"basic.target\" -> \"sshd.service\" [label=\"Before\"];\n}\n"
        );
    }

    #[test]
    fn test_args() {
        let args = Args::parse_from([
            "uresolve",
            "-p",
            "/etc/units",
            "--lookup-path",
            "/lib/units",
            "--dot",
            "default.target",
            "sshd",
        ]);
        assert_eq!(args.lookup_path, vec!["/etc/units", "/lib/units"]);
        assert!(args.dot);
        assert_eq!(args.units, vec!["default.target", "sshd"]);
        assert!(Args::parse_from(["uresolve"]).units.is_empty());
    }
}
