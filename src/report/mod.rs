//! Report rendering and dispatch
//!
//! The core renders an HTML report per due kind and hands it to a
//! [`ReportSender`]. Delivery transport stays behind the trait; the
//! bundled implementation is an HTTP mail relay (`relay`). A failed
//! send is logged and never prevents the remaining kinds from being
//! attempted.

pub mod html;
pub mod relay;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{info, warn};

use crate::cadence::ReportKind;
use crate::utils::format_currency;
use crate::valuation::PortfolioSnapshot;

/// Outbound report transport
#[async_trait]
pub trait ReportSender: Send + Sync {
    async fn send(&self, subject: &str, html_body: &str) -> Result<()>;

    /// Cheap reachability probe for the `test` command
    async fn verify(&self) -> Result<()>;
}

/// Subject line: "<Kind> Portfolio Report - <total> | <date>"
pub fn subject(snapshot: &PortfolioSnapshot, kind: ReportKind) -> String {
    format!(
        "{} Portfolio Report - {} | {}",
        kind,
        format_currency(snapshot.total_value),
        snapshot.date.format("%d/%m/%Y")
    )
}

/// Send each due report in order. Returns how many were delivered;
/// failures are logged and the remaining kinds still go out.
pub async fn dispatch(
    sender: &dyn ReportSender,
    snapshot: &PortfolioSnapshot,
    kinds: &[ReportKind],
) -> usize {
    let mut delivered = 0;

    for &kind in kinds {
        let body = html::render(snapshot, kind);
        match sender.send(&subject(snapshot, kind), &body).await {
            Ok(()) => {
                info!("{} report sent successfully", kind);
                delivered += 1;
            }
            Err(e) => {
                warn!("Failed to send {} report: {:#}", kind, e);
            }
        }
    }

    delivered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav::NavRegistry;
    use crate::valuation::value_holdings;
    use chrono::Local;
    use std::sync::Mutex;

    fn snapshot() -> PortfolioSnapshot {
        value_holdings(&NavRegistry::new(), &[], Local::now())
    }

    /// Records subjects; fails any send whose subject matches `poison`
    struct StubSender {
        sent: Mutex<Vec<String>>,
        poison: Option<&'static str>,
    }

    impl StubSender {
        fn new(poison: Option<&'static str>) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                poison,
            }
        }
    }

    #[async_trait]
    impl ReportSender for StubSender {
        async fn send(&self, subject: &str, _html_body: &str) -> Result<()> {
            if let Some(poison) = self.poison {
                if subject.contains(poison) {
                    anyhow::bail!("relay rejected message");
                }
            }
            self.sent.lock().unwrap().push(subject.to_string());
            Ok(())
        }

        async fn verify(&self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_subject_contains_kind_total_and_date() {
        let snap = snapshot();
        let line = subject(&snap, ReportKind::Monthly);
        assert!(line.starts_with("Monthly Portfolio Report - ₹0.00 | "));
        assert!(line.contains(&snap.date.format("%d/%m/%Y").to_string()));
    }

    #[tokio::test]
    async fn test_dispatch_sends_in_order() {
        let sender = StubSender::new(None);
        let kinds = [ReportKind::Yearly, ReportKind::Monthly, ReportKind::Weekly];
        let delivered = dispatch(&sender, &snapshot(), &kinds).await;

        assert_eq!(delivered, 3);
        let sent = sender.sent.lock().unwrap();
        assert!(sent[0].starts_with("Yearly"));
        assert!(sent[1].starts_with("Monthly"));
        assert!(sent[2].starts_with("Weekly"));
    }

    #[tokio::test]
    async fn test_dispatch_continues_past_a_failed_send() {
        let sender = StubSender::new(Some("Monthly"));
        let kinds = [
            ReportKind::Quarterly,
            ReportKind::Monthly,
            ReportKind::Weekly,
        ];
        let delivered = dispatch(&sender, &snapshot(), &kinds).await;

        assert_eq!(delivered, 2);
        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].starts_with("Quarterly"));
        assert!(sent[1].starts_with("Weekly"));
    }

    #[tokio::test]
    async fn test_dispatch_empty_kinds_sends_nothing() {
        let sender = StubSender::new(None);
        assert_eq!(dispatch(&sender, &snapshot(), &[]).await, 0);
        assert!(sender.sent.lock().unwrap().is_empty());
    }
}
