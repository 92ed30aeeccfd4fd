//! Tick report -> defmt log records.

use defmt::{debug, info, warn};
use wristband_common::TickReport;
use wristband_common::monitor::DisplayRefresh;
use wristband_common::telemetry::PublishOutcome;

pub fn log_report(report: &TickReport) {
    if let Some(connected) = report.link_changed {
        if connected {
            info!("Phone connected");
        } else {
            info!("Phone disconnected");
        }
    }

    if let Some(error) = report.ignored_command {
        warn!("Ignored link command: {}", error);
    }

    if let Some(t) = report.transition {
        info!("Mode {} -> {} ({})", t.from, t.to, t.cause);
    }

    if report.presence.changed {
        if report.presence.present {
            info!("Finger detected, IR={}", report.infrared);
        } else {
            info!("No finger?");
        }
    }

    if let Some(bpm) = report.accepted_bpm {
        debug!("IR={}, BPM={}, Avg BPM={}", report.infrared, bpm, report.average_bpm);
    }

    if report.countdown_expired {
        warn!("Emergency countdown reached zero, waiting for the wearer");
    }

    if let Some(ack) = report.cancel_ack {
        match ack {
            PublishOutcome::Sent { .. } => info!("Emergency cancelled, acknowledgement sent"),
            _ => warn!("Emergency cancelled, acknowledgement not delivered: {}", ack),
        }
    }

    if let PublishOutcome::Failed(error) = report.published {
        warn!("Telemetry not published: {}", error);
    }

    if report.display == DisplayRefresh::Full {
        debug!("Full redraw for {}", report.mode);
    }
}
