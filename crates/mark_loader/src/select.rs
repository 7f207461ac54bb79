//! Choosing the best window system module

use crate::error::LoaderError;
use crate::module::ModuleProvider;
use crate::probe::probe_module;
use std::path::{Path, PathBuf};

/// Outcome of probing one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub candidate: PathBuf,
    pub priority: i32,
}

/// Probe every candidate in order.
pub fn probe_candidates<P: ModuleProvider>(provider: &P, candidates: Vec<PathBuf>) -> Vec<ProbeReport> {
    candidates
        .into_iter()
        .map(|candidate| {
            let priority = probe_module(provider, &candidate);
            ProbeReport {
                candidate,
                priority,
            }
        })
        .collect()
}

/// The highest-priority report, earliest on ties, if its priority is positive.
pub fn select_best(reports: &[ProbeReport]) -> Option<&ProbeReport> {
    let mut best: Option<&ProbeReport> = None;
    for report in reports {
        if best.map_or(true, |best| report.priority > best.priority) {
            best = Some(report);
        }
    }

    best.filter(|best| best.priority > 0)
}

/// Scan `dir`, probe every candidate and return the module to activate.
pub fn find_best_module<P: ModuleProvider>(provider: &P, dir: &Path) -> Result<PathBuf, LoaderError> {
    tracing::debug!(dir = %dir.display(), "looking for window system modules");

    let reports = probe_candidates(provider, provider.candidates(dir));

    match select_best(&reports) {
        Some(best) => {
            tracing::info!(
                module = %best.candidate.display(),
                priority = best.priority,
                "selected window system module"
            );
            Ok(best.candidate.clone())
        }
        None => Err(LoaderError::NoUsableModule {
            dir: dir.to_path_buf(),
            candidates: reports.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeModuleConfig, FakeProvider};

    fn report(name: &str, priority: i32) -> ProbeReport {
        ProbeReport {
            candidate: PathBuf::from(name),
            priority,
        }
    }

    #[test]
    fn picks_strict_maximum() {
        let reports = [report("a.so", 5), report("b.so", 9), report("c.so", 0)];
        assert_eq!(select_best(&reports), Some(&reports[1]));
    }

    #[test]
    fn ties_go_to_the_earliest_candidate() {
        let reports = [report("a.so", 3), report("b.so", 7), report("c.so", 7)];
        assert_eq!(select_best(&reports).unwrap().candidate, PathBuf::from("b.so"));
    }

    #[test]
    fn nothing_positive_selects_nothing() {
        assert_eq!(select_best(&[]), None);
        assert_eq!(select_best(&[report("a.so", 0), report("b.so", -2)]), None);
    }

    #[test]
    fn failed_candidates_do_not_stop_the_scan() {
        let provider = FakeProvider::new(vec![
            ("a.so", FakeModuleConfig::priority(5)),
            ("b.so", FakeModuleConfig::priority(9)),
            ("c.so", FakeModuleConfig::unloadable()),
            ("d.so", FakeModuleConfig::without_probe()),
        ]);

        let best = find_best_module(&provider, Path::new("/ws")).unwrap();
        assert_eq!(best, PathBuf::from("b.so"));

        let reports = probe_candidates(&provider, provider.candidates(Path::new("/ws")));
        let priorities: Vec<_> = reports.iter().map(|r| r.priority).collect();
        assert_eq!(priorities, [5, 9, 0, 0]);

        // Probing never keeps a module loaded
        assert_eq!(provider.journal().live(), 0);
    }

    #[test]
    fn all_zero_is_no_usable_module() {
        let provider = FakeProvider::new(vec![
            ("a.so", FakeModuleConfig::priority(0)),
            ("b.so", FakeModuleConfig::unloadable()),
        ]);

        let err = find_best_module(&provider, Path::new("/ws")).unwrap_err();
        assert!(matches!(err, LoaderError::NoUsableModule { candidates: 2, .. }));
        assert!(err.to_string().contains("window_system_dir"));
    }

    #[test]
    fn empty_directory_is_no_usable_module() {
        let provider = FakeProvider::new(vec![]);

        let err = find_best_module(&provider, Path::new("/ws")).unwrap_err();
        assert!(matches!(err, LoaderError::NoUsableModule { candidates: 0, .. }));
        assert_eq!(provider.journal().loads(), 0);
    }
}
