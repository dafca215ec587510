//! Periodic sweep runtime.
//!
//! Wraps tokio-cron-scheduler to run the engine's two sweeps in the
//! background: the daily activity reset and the voice engagement sweep.
//! Intervals come from the engine's configuration.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, info};

use crate::engine::Engine;
use crate::error::{StewardError, StewardResult};

/// Runs the engine's periodic sweeps on their configured intervals.
///
/// Both sweeps tick relative to runtime start, not wall-clock midnight; the
/// daily reset stamps entries to the current date whenever it fires, so a
/// drifting tick cannot corrupt the counters.
pub struct SweepRuntime {
    scheduler: JobScheduler,
    engine: Arc<Engine>,
    running: Arc<RwLock<bool>>,
}

impl SweepRuntime {
    /// Create a runtime for `engine`. Call [`SweepRuntime::start`] to begin
    /// ticking.
    pub async fn new(engine: Arc<Engine>) -> StewardResult<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| StewardError::scheduler(e.to_string()))?;
        Ok(Self {
            scheduler,
            engine,
            running: Arc::new(RwLock::new(false)),
        })
    }

    /// Register both sweep jobs and start the scheduler.
    pub async fn start(&self) -> StewardResult<()> {
        {
            let mut running = self.running.write().await;
            if *running {
                return Err(StewardError::scheduler("sweep runtime already running"));
            }
            *running = true;
        }

        let reset_hours = self.engine.config().daily_reset_hours.max(1);
        let engagement_minutes = self.engine.config().engagement_interval_minutes;

        let engine = self.engine.clone();
        let reset_job = Job::new_repeated_async(
            Duration::from_secs(reset_hours * 3_600),
            move |_uuid, _lock| {
                let engine = engine.clone();
                Box::pin(async move {
                    debug!("Running scheduled daily reset");
                    engine.run_daily_reset(Utc::now().date_naive()).await;
                })
            },
        )
        .map_err(|e| StewardError::scheduler(e.to_string()))?;

        let engine = self.engine.clone();
        let engagement_job = Job::new_repeated_async(
            Duration::from_secs(engagement_minutes * 60),
            move |_uuid, _lock| {
                let engine = engine.clone();
                Box::pin(async move {
                    debug!("Running scheduled engagement sweep");
                    engine.run_engagement_sweep(Utc::now()).await;
                })
            },
        )
        .map_err(|e| StewardError::scheduler(e.to_string()))?;

        self.scheduler
            .add(reset_job)
            .await
            .map_err(|e| StewardError::scheduler(e.to_string()))?;
        self.scheduler
            .add(engagement_job)
            .await
            .map_err(|e| StewardError::scheduler(e.to_string()))?;
        self.scheduler
            .start()
            .await
            .map_err(|e| StewardError::scheduler(e.to_string()))?;

        info!(
            reset_hours,
            engagement_minutes, "Sweep runtime started"
        );
        Ok(())
    }

    /// Stop the scheduler gracefully. Engine state is untouched.
    pub async fn shutdown(&mut self) -> StewardResult<()> {
        info!("Shutting down sweep runtime");
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| StewardError::scheduler(e.to_string()))?;
        *self.running.write().await = false;
        Ok(())
    }

    /// Whether the runtime has been started and not shut down.
    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::traits::NotificationSurface;
    use crate::types::{ChannelId, DestinationId, LogRecord, MessageRef, RecordId, RoleId};
    use async_trait::async_trait;

    struct NullSurface;

    #[async_trait]
    impl NotificationSurface for NullSurface {
        async fn publish(
            &self,
            _destination: DestinationId,
            _record: LogRecord,
        ) -> StewardResult<RecordId> {
            Ok(RecordId::new(1))
        }

        async fn send_message(
            &self,
            _channel: ChannelId,
            _record: LogRecord,
        ) -> StewardResult<RecordId> {
            Ok(RecordId::new(1))
        }

        async fn retract_message(&self, _message: MessageRef) -> StewardResult<()> {
            Ok(())
        }

        async fn role_exists(&self, _role: RoleId) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_start_and_shutdown() {
        let engine = Arc::new(Engine::new(EngineConfig::default(), Arc::new(NullSurface)));
        let mut runtime = SweepRuntime::new(engine).await.unwrap();
        assert!(!runtime.is_running().await);

        runtime.start().await.unwrap();
        assert!(runtime.is_running().await);

        runtime.shutdown().await.unwrap();
        assert!(!runtime.is_running().await);
    }

    #[tokio::test]
    async fn test_double_start_is_rejected() {
        let engine = Arc::new(Engine::new(EngineConfig::default(), Arc::new(NullSurface)));
        let mut runtime = SweepRuntime::new(engine).await.unwrap();
        runtime.start().await.unwrap();
        assert!(runtime.start().await.is_err());
        runtime.shutdown().await.unwrap();
    }
}
