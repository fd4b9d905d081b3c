use chrono::Utc;
use futures_util::future::join_all;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{info, warn};

use perks_core::simulator::HealthProbe;
use perks_shared::models::status::{OverallStatus, ServiceStatus, StatusReport};

/// Probes every simulator's `/health` at once.
#[derive(Clone)]
pub struct StatusMonitor {
    probes: Vec<Arc<dyn HealthProbe>>,
}

impl StatusMonitor {
    pub fn new(probes: Vec<Arc<dyn HealthProbe>>) -> Self {
        Self { probes }
    }

    pub async fn check(&self) -> StatusReport {
        let services: Vec<ServiceStatus> = join_all(self.probes.iter().map(|p| probe(p.as_ref()))).await;
        let healthy = services.iter().filter(|s| s.reachable).count();
        let overall = OverallStatus::from_counts(healthy, services.len());
        info!("Simulator status: {}/{} reachable", healthy, services.len());

        StatusReport {
            overall,
            healthy,
            total: services.len(),
            services,
            timestamp: Utc::now(),
        }
    }
}

async fn probe(target: &dyn HealthProbe) -> ServiceStatus {
    let started = Instant::now();
    let result = target.health().await;
    let latency_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok(_) => ServiceStatus {
            name: target.service().to_string(),
            url: target.base_url().to_string(),
            reachable: true,
            latency_ms: Some(latency_ms),
            error: None,
        },
        Err(err) => {
            warn!("{} simulator unreachable: {}", target.service(), err);
            ServiceStatus {
                name: target.service().to_string(),
                url: target.base_url().to_string(),
                reachable: false,
                latency_ms: None,
                error: Some(err.cause().to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::StubProbe;
    use perks_shared::ServiceKind;
    use std::time::Duration;

    #[tokio::test]
    async fn test_all_reachable() {
        let monitor = StatusMonitor::new(vec![
            Arc::new(StubProbe::up(ServiceKind::Travel, Duration::ZERO)),
            Arc::new(StubProbe::up(ServiceKind::Hotel, Duration::ZERO)),
            Arc::new(StubProbe::up(ServiceKind::Shopping, Duration::ZERO)),
        ]);
        let report = monitor.check().await;
        assert_eq!(report.overall, OverallStatus::AllHealthy);
        assert_eq!(report.healthy, 3);
        assert_eq!(report.services[1].name, "hotel");
    }

    #[tokio::test]
    async fn test_mixed_is_degraded_and_none_is_unavailable() {
        let monitor = StatusMonitor::new(vec![
            Arc::new(StubProbe::up(ServiceKind::Travel, Duration::ZERO)),
            Arc::new(StubProbe::down(ServiceKind::Hotel)),
        ]);
        let report = monitor.check().await;
        assert_eq!(report.overall, OverallStatus::Degraded);
        let hotel = &report.services[1];
        assert!(!hotel.reachable);
        assert!(hotel.latency_ms.is_none());
        assert!(hotel.error.as_deref().unwrap().starts_with("connection failed"));

        let monitor = StatusMonitor::new(vec![Arc::new(StubProbe::down(ServiceKind::Shopping))]);
        assert_eq!(monitor.check().await.overall, OverallStatus::Unavailable);
    }

    #[tokio::test(start_paused = true)]
    async fn test_probes_run_concurrently() {
        let monitor = StatusMonitor::new(vec![
            Arc::new(StubProbe::up(ServiceKind::Travel, Duration::from_millis(300))),
            Arc::new(StubProbe::up(ServiceKind::Hotel, Duration::from_millis(500))),
            Arc::new(StubProbe::up(ServiceKind::Shopping, Duration::from_millis(200))),
        ]);
        let started = Instant::now();
        let report = monitor.check().await;
        let elapsed = started.elapsed();

        assert_eq!(report.overall, OverallStatus::AllHealthy);
        assert!(elapsed >= Duration::from_millis(500));
        assert!(elapsed < Duration::from_millis(600), "took {:?}", elapsed);
        let hotel_latency = report.services[1].latency_ms.unwrap();
        assert!((500..510).contains(&hotel_latency), "latency {}", hotel_latency);
    }
}
