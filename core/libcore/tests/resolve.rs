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
mod test {
    use basic::path_lookup::LookupPaths;
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::fs;
    use std::os::unix::fs::symlink;
    use std::path::Path;
    use std::sync::Arc;
    use std::thread;
    use tempfile::TempDir;
    use unitcore::unit::{
        default_dropin_table, EdgeType, OsUnitFs, SchedulerIf, UnitLoad, UnitRelations,
    };
    use unitcore::Error;

    #[derive(Default)]
    struct Recorder {
        loaded: RefCell<Vec<(Vec<String>, BTreeMap<String, EdgeType>, BTreeMap<String, EdgeType>)>>,
    }

    impl SchedulerIf for Recorder {
        fn load_unit(
            &self,
            aliases: &[String],
            edges_from: &BTreeMap<String, EdgeType>,
            edges_to: &BTreeMap<String, EdgeType>,
        ) {
            self.loaded
                .borrow_mut()
                .push((aliases.to_vec(), edges_from.clone(), edges_to.clone()));
        }
    }

    /* <tmp>/etc and <tmp>/lib, in that priority */
    fn unit_tree() -> (TempDir, Arc<LookupPaths>) {
        let root = tempfile::tempdir().unwrap();
        let etc = root.path().join("etc");
        let lib = root.path().join("lib");
        fs::create_dir_all(&etc).unwrap();
        fs::create_dir_all(&lib).unwrap();
        let lp = LookupPaths::from_paths([
            etc.to_string_lossy().to_string(),
            lib.to_string_lossy().to_string(),
        ]);
        (root, Arc::new(lp))
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_resolve_default_target() {
        let (root, lp) = unit_tree();
        let etc = root.path().join("etc");
        let lib = root.path().join("lib");

        write(
            &lib.join("multi-user.target"),
            "[Unit]\nDescription=Multi-User System\nRequires=network.target\n",
        );
        symlink(lib.join("multi-user.target"), etc.join("default.target")).unwrap();
        write(&lib.join("ssh.service"), "[Unit]\nDescription=ssh\n");
        fs::create_dir_all(etc.join("default.target.wants")).unwrap();
        symlink(
            lib.join("ssh.service"),
            etc.join("default.target.wants/ssh.service"),
        )
        .unwrap();

        let load = UnitLoad::with_lookup_paths(&lp);
        let recorder = Recorder::default();
        let unit = load.load("default.target", &recorder).unwrap();

        assert_eq!(
            unit.aliases.names(),
            ["default.target".to_string(), "multi-user.target".to_string()]
        );
        assert_eq!(unit.aliases.fragment_path(), etc.join("default.target"));
        assert_eq!(
            unit.config.get_last("Unit", "Description").unwrap(),
            "Multi-User System"
        );

        let loaded = recorder.loaded.borrow();
        assert_eq!(loaded.len(), 1);
        let (aliases, from, to) = &loaded[0];
        assert_eq!(aliases, &vec!["default.target", "multi-user.target"]);
        assert_eq!(
            from["network.target"],
            EdgeType::ADD_START | EdgeType::START_ON_STARTED
        );
        assert_eq!(
            to["network.target"],
            EdgeType::PROPAGATES_STOP_TO | EdgeType::PROPAGATES_RESTART_TO
        );
        assert_eq!(
            from["ssh.service"],
            EdgeType::ADD_START_NONREQ | EdgeType::TRY_START_ON_STARTED
        );
        assert!(!to.contains_key("ssh.service"));
    }

    #[test]
    fn test_resolve_dotted_fragment() {
        let (root, lp) = unit_tree();
        let etc = root.path().join("etc");
        let lib = root.path().join("lib");

        write(&lib.join("multi-user.target.service"), "[Unit]\nAfter=basic.target\n");
        symlink(lib.join("multi-user.target.service"), etc.join("default.target")).unwrap();
        write(&lib.join("ssh.service"), "[Unit]\n");
        fs::create_dir_all(etc.join("default.target.wants")).unwrap();
        symlink(
            lib.join("ssh.service"),
            etc.join("default.target.wants/ssh.service"),
        )
        .unwrap();
        write(&etc.join("default.target.wants/tmpl@.service"), "");

        let load = UnitLoad::with_lookup_paths(&lp);
        let recorder = Recorder::default();
        let unit = load.load("default.target", &recorder).unwrap();
        assert_eq!(
            unit.aliases.names(),
            [
                "default.target".to_string(),
                "multi-user.target.service".to_string()
            ]
        );
        assert_eq!(
            unit.config.get("Unit", "Wants").unwrap(),
            ["ssh.service".to_string(), "tmpl@.service".to_string()]
        );
        assert_eq!(unit.delta.edges_from["basic.target"], EdgeType::AFTER);
        assert!(unit.delta.edges_from.contains_key("tmpl@.service"));

        let unit = load.load("multi-user.target.service", &recorder).unwrap();
        assert_eq!(unit.aliases.id(), "multi-user.target.service");
        assert_eq!(recorder.loaded.borrow().len(), 2);
    }

    #[test]
    fn test_resolve_not_found() {
        let (_root, lp) = unit_tree();
        let recorder = Recorder::default();
        let e = UnitLoad::with_lookup_paths(&lp)
            .load("nonexistent.service", &recorder)
            .unwrap_err();
        assert!(e.is_not_found());
        assert!(recorder.loaded.borrow().is_empty());
    }

    #[test]
    fn test_resolve_masked() {
        let (root, lp) = unit_tree();
        write(&root.path().join("lib/cups.service"), "[Unit]\n");
        symlink("/dev/null", root.path().join("etc/cups.service")).unwrap();

        let e = UnitLoad::with_lookup_paths(&lp)
            .resolve("cups.service")
            .unwrap_err();
        assert!(matches!(e, Error::Masked { .. }));
    }

    #[test]
    fn test_overlay_reset_then_dependency_dir() {
        let (root, lp) = unit_tree();
        let lib = root.path().join("lib");
        write(&lib.join("app.target"), "[Unit]\nWants=old.service\n");
        write(&lib.join("app.target.d/50-reset.conf"), "[Unit]\nWants=\n");
        write(&lib.join("app.target.wants/new.service"), "");

        let unit = UnitLoad::with_lookup_paths(&lp).resolve("app.target").unwrap();
        assert_eq!(
            unit.config.get("Unit", "Wants").unwrap(),
            ["new.service".to_string()]
        );
        assert!(!unit.delta.edges_from.contains_key("old.service"));
        assert!(unit.delta.edges_from.contains_key("new.service"));
    }

    #[test]
    fn test_template_instance() {
        let (root, lp) = unit_tree();
        let lib = root.path().join("lib");
        write(&lib.join("getty@.service"), "[Unit]\nBefore=getty.target\n");
        symlink(lib.join("getty@.service"), lib.join("autovt@.service")).unwrap();

        let unit = UnitLoad::with_lookup_paths(&lp)
            .resolve("autovt@tty2.service")
            .unwrap();
        assert_eq!(
            unit.aliases.names(),
            [
                "autovt@tty2.service".to_string(),
                "getty@tty2.service".to_string()
            ]
        );
        assert_eq!(unit.delta.edges_from["getty.target"], EdgeType::BEFORE);
    }

    #[test]
    fn test_custom_dropin_table() {
        let (root, lp) = unit_tree();
        let lib = root.path().join("lib");
        write(&lib.join("app.target"), "[Unit]\n");
        write(&lib.join("app.target.upholds/keeper.service"), "");
        write(&lib.join("app.target.wants/helper.service"), "");

        let mut table = default_dropin_table();
        table.push(("upholds".to_string(), UnitRelations::UnitUpHolds));
        let load = UnitLoad::new(OsUnitFs, &lp, &Arc::new(table));
        let unit = load.resolve("app.target").unwrap();
        assert_eq!(
            unit.delta.edges_from["keeper.service"],
            EdgeType::ADD_START_NONREQ | EdgeType::START_ON_STARTED
        );
        /* UpheldBy carries no edge back */
        assert!(!unit.delta.edges_to.contains_key("keeper.service"));
        assert!(unit.delta.edges_from.contains_key("helper.service"));
    }

    #[test]
    fn test_concurrent_resolution() {
        let (root, lp) = unit_tree();
        let lib = root.path().join("lib");
        for i in 0..8 {
            write(
                &lib.join(format!("worker{}.service", i)),
                &format!("[Unit]\nAfter=worker{}.service\n", i + 1),
            );
        }

        let load = Arc::new(UnitLoad::with_lookup_paths(&lp));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let load = Arc::clone(&load);
                thread::spawn(move || load.resolve(&format!("worker{}", i)).unwrap())
            })
            .collect();
        for (i, h) in handles.into_iter().enumerate() {
            let unit = h.join().unwrap();
            assert_eq!(
                unit.delta.edges_from[&format!("worker{}.service", i + 1)],
                EdgeType::AFTER
            );
        }
    }
}
