//! Integration tests for `unbound-forwards`.
//!
//! The fake below models Unbound's forward table: one target per name,
//! `forward_add` replaces, `forward_remove` drops by name. Unix-only tests
//! run the real process-backed client against a shell script standing in
//! for `unbound-control`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use unbound_forwards::{
    Control, ControlOutput, ForwardError, Reconciler, Result, Zone, ZoneSet, live_zones,
    read_sources,
};

#[derive(Default)]
struct FakeUnbound {
    table: RefCell<BTreeMap<String, String>>,
    mutations: RefCell<usize>,
}

impl Control for &FakeUnbound {
    fn list_forwards(&self) -> Result<ControlOutput> {
        let mut stdout = String::from("ok\n");
        for (name, addr) in self.table.borrow().iter() {
            stdout.push_str(&format!("{name}. IN forward {addr}\n"));
        }
        Ok(ControlOutput {
            stdout,
            stderr: String::new(),
        })
    }

    fn forward_add(&self, zone: &Zone) -> Result<()> {
        *self.mutations.borrow_mut() += 1;
        self.table
            .borrow_mut()
            .insert(zone.name.clone(), zone.address.clone());
        Ok(())
    }

    fn forward_remove(&self, name: &str) -> Result<()> {
        *self.mutations.borrow_mut() += 1;
        self.table.borrow_mut().remove(name);
        Ok(())
    }
}

fn write_config(dir: &tempfile::TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, text).unwrap();
    path
}

// ---------------------------------------------------------------------------
// In-memory resolver
// ---------------------------------------------------------------------------

#[test]
fn second_run_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "forwards.conf",
        "forward-zone:\n  name: \"a.com\"\n  forward-addr: 1.2.3.4\nforward-zone:\n  name: \"b.com\"\n  forward-addr: 5.6.7.8\n",
    );
    let unbound = FakeUnbound::default();
    unbound
        .table
        .borrow_mut()
        .insert("gone.net".into(), "9.9.9.9".into());
    let reconciler = Reconciler::new(&unbound, [path]);

    let first = reconciler.reconcile().unwrap();
    assert!(first.converged);
    assert_eq!(first.added.len(), 2);
    assert_eq!(first.removed.len(), 1);

    let mutations = *unbound.mutations.borrow();
    let second = reconciler.reconcile().unwrap();
    assert!(second.converged);
    assert!(second.added.is_empty());
    assert!(second.removed.is_empty());
    assert!(second.residual.is_empty());
    assert_eq!(*unbound.mutations.borrow(), mutations);
}

#[test]
fn applied_config_reads_back_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        &dir,
        "forwards.conf",
        "name: a.com\nforward-addr: 1.2.3.4\nname: b.org.\nforward-addr: 5.6.7.8\nname: c.net\nforward-addr: 10.0.0.1\n",
    );
    let unbound = FakeUnbound::default();

    Reconciler::new(&unbound, [&path]).reconcile().unwrap();

    assert_eq!(live_zones(&&unbound).unwrap(), read_sources(&[&path]).unwrap());
}

#[test]
fn zones_from_several_files_are_merged() {
    let dir = tempfile::tempdir().unwrap();
    let one = write_config(&dir, "one.conf", "name: a.com\nforward-addr: 1.1.1.1\n");
    let two = write_config(
        &dir,
        "two.conf",
        "name: a.com\nforward-addr: 1.1.1.1\nname: b.com\nforward-addr: 2.2.2.2\n",
    );
    let unbound = FakeUnbound::default();

    let result = Reconciler::new(&unbound, [one, two]).reconcile().unwrap();

    assert!(result.converged);
    let expected: ZoneSet = [Zone::new("a.com", "1.1.1.1"), Zone::new("b.com", "2.2.2.2")]
        .into_iter()
        .collect();
    assert_eq!(result.added.into_iter().collect::<ZoneSet>(), expected);
}

#[test]
fn missing_source_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_config(&dir, "good.conf", "name: a.com\nforward-addr: 1.1.1.1\n");
    let unbound = FakeUnbound::default();

    let err = Reconciler::new(&unbound, [good, dir.path().join("missing.conf")])
        .reconcile()
        .unwrap_err();

    assert!(matches!(err, ForwardError::ConfigParse { .. }));
    assert_eq!(*unbound.mutations.borrow(), 0);
}

// ---------------------------------------------------------------------------
// Process-backed client against a stand-in script
// ---------------------------------------------------------------------------

#[cfg(unix)]
mod script {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use unbound_forwards::UnboundControl;

    /// Writes an `unbound-control` stand-in that logs every call to
    /// `calls.log` and answers `list_forwards` with `stdout`/`stderr`.
    fn fake_control(dir: &tempfile::TempDir, stdout: &str, stderr: &str) -> PathBuf {
        let log = dir.path().join("calls.log");
        let path = dir.path().join("unbound-control");
        let script = format!(
            "#!/bin/sh\necho \"$*\" >> '{log}'\nif [ \"$1\" = list_forwards ]; then\nprintf '{stdout}'\nprintf '{stderr}' >&2\nfi\n",
            log = log.display(),
        );
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn calls(dir: &tempfile::TempDir) -> Vec<String> {
        std::fs::read_to_string(dir.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn list_forwards_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let control = UnboundControl::new(fake_control(
            &dir,
            "a.com. IN forward 1.2.3.4\\nb.com. IN forward 0 5.6.7.8\\nnot a record\\n",
            "",
        ));

        let zones = live_zones(&control).unwrap();

        let expected: ZoneSet = [Zone::new("a.com", "1.2.3.4"), Zone::new("b.com", "5.6.7.8")]
            .into_iter()
            .collect();
        assert_eq!(zones, expected);
    }

    #[test]
    fn stderr_fails_fast_without_mutations() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_config(&dir, "forwards.conf", "name: a.com\nforward-addr: 1.1.1.1\n");
        let control = UnboundControl::new(fake_control(&dir, "", "error: connect failed\\n"));

        let err = Reconciler::new(control, [source]).reconcile().unwrap_err();

        assert!(matches!(err, ForwardError::ControlReported { .. }));
        assert_eq!(calls(&dir), vec!["list_forwards"]);
    }

    #[test]
    fn static_resolver_reports_drift() {
        // The script never changes its answer, so every add is "lost".
        let dir = tempfile::tempdir().unwrap();
        let source = write_config(&dir, "forwards.conf", "name: a.com\nforward-addr: 1.1.1.1\n");
        let control = UnboundControl::new(fake_control(&dir, "b.com. IN forward 2.2.2.2\\n", ""));

        let result = Reconciler::new(control, [source]).reconcile().unwrap();

        assert!(!result.converged);
        assert_eq!(result.added, vec![Zone::new("a.com", "1.1.1.1")]);
        assert_eq!(result.removed, vec![Zone::new("b.com", "2.2.2.2")]);
        assert_eq!(
            calls(&dir),
            vec![
                "list_forwards",
                "forward_remove b.com",
                "forward_add a.com 1.1.1.1",
                "list_forwards",
            ]
        );
        assert!(matches!(
            result.ensure_converged(),
            Err(ForwardError::Drift {
                missing: 1,
                unexpected: 1
            })
        ));
    }
}
