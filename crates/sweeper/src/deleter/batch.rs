//! Sequential, rate-limited delete loop shared by all deleters

use super::config::DeleteConfig;
use super::sink::DeleteSink;
use anyhow::Result;
use std::future::Future;
use sweeper_common::{ResourceKind, ResourceNames};
use tracing::debug;

/// Delete `names` one at a time, in order.
///
/// Dry runs only report. Real runs sleep `backoff_time` before every call.
/// A failure is always reported to `sink`; in ignore mode the loop moves
/// on, otherwise that error is returned as is and later names are left
/// untouched.
pub(crate) async fn delete_each<F, Fut>(
    kind: ResourceKind,
    names: &ResourceNames,
    cfg: &DeleteConfig,
    sink: &dyn DeleteSink,
    mut delete_one: F,
) -> Result<()>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    for name in names {
        if cfg.dry_run {
            sink.dry_run(kind, name);
            continue;
        }

        // Prevent throttling
        tokio::time::sleep(cfg.backoff_time).await;

        debug!(resource_type = %kind, resource_name = %name, "Deleting");
        if let Err(e) = delete_one(name.to_string()).await {
            sink.failed(kind, name, &e);
            if cfg.ignore_errors {
                continue;
            }
            return Err(e);
        }

        sink.deleted(kind, name);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deleter::sink::{RecordingSink, SinkEvent};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    const KIND: ResourceKind = ResourceKind::LaunchConfiguration;

    fn names(names: &[&str]) -> ResourceNames {
        names.iter().copied().collect()
    }

    #[tokio::test(start_paused = true)]
    async fn sleeps_before_every_real_call() {
        let sink = RecordingSink::default();
        let cfg = DeleteConfig::execute(false, Duration::from_secs(2));
        let calls = Mutex::new(Vec::new());
        let start = Instant::now();

        delete_each(KIND, &names(&["a", "b", "c"]), &cfg, &sink, |name| {
            calls.lock().unwrap().push((name, start.elapsed()));
            async { anyhow::Ok(()) }
        })
        .await
        .unwrap();

        let calls = calls.into_inner().unwrap();
        assert_eq!(
            calls,
            vec![
                ("a".to_string(), Duration::from_secs(2)),
                ("b".to_string(), Duration::from_secs(4)),
                ("c".to_string(), Duration::from_secs(6)),
            ]
        );
        assert_eq!(sink.deleted_names(), vec!["a", "b", "c"]);
    }

    #[tokio::test(start_paused = true)]
    async fn dry_run_neither_calls_nor_sleeps() {
        let sink = RecordingSink::default();
        let cfg = DeleteConfig {
            dry_run: true,
            ignore_errors: false,
            backoff_time: Duration::from_secs(5),
        };
        let calls = Mutex::new(0);
        let start = Instant::now();

        delete_each(KIND, &names(&["a", "b"]), &cfg, &sink, |_| {
            *calls.lock().unwrap() += 1;
            async { anyhow::Ok(()) }
        })
        .await
        .unwrap();

        assert_eq!(calls.into_inner().unwrap(), 0);
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(
            sink.events(),
            vec![
                SinkEvent::DryRun(KIND, "a".to_string()),
                SinkEvent::DryRun(KIND, "b".to_string()),
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn duplicates_are_deleted_twice() {
        let sink = RecordingSink::default();
        let cfg = DeleteConfig::execute(false, Duration::ZERO);
        let calls = Mutex::new(0);

        delete_each(KIND, &names(&["a", "a"]), &cfg, &sink, |_| {
            *calls.lock().unwrap() += 1;
            async { anyhow::Ok(()) }
        })
        .await
        .unwrap();

        assert_eq!(calls.into_inner().unwrap(), 2);
    }
}
