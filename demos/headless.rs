//! Headless run of a tracked path: markers appear, the agent runs the path,
//! jumps once on the way and is restarted at the end.
//!
//! Usage:
//! ```text
//! cargo run --example headless
//! RUST_LOG=trackway=debug cargo run --example headless
//! ```

use trackway::math::Point3;
use trackway::motion::{Command, MotionEvent};
use trackway::registry::{TrackingEvent, FINISH_LABEL, START_LABEL};
use trackway::{PathSession, SessionConfig};

const DT: f64 = 1.0 / 60.0;

fn main() -> trackway::Result<()> {
    // Default: WARN for everything, INFO for trackway.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("trackway=info".parse().unwrap_or_default())
        .add_directive("headless=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut config = SessionConfig {
        tracked_labels: vec!["Tracking-Obstacle-1".into()],
        prop_kinds: vec!["cone".into(), "barrel".into(), "sign".into()],
        ..SessionConfig::default()
    };
    config.segments.base_segment_length = Some(0.1);
    config.scatter.seed = Some(11);
    let mut session = PathSession::new(config)?;

    // Markers trickle in over the first frames, the way a tracker reports them.
    let sightings = [
        TrackingEvent::new(START_LABEL, Point3::new(0.0, 0.0, 0.0)),
        TrackingEvent::new("Tracking-Obstacle-1", Point3::new(0.15, 0.0, 0.3)),
        TrackingEvent::new(FINISH_LABEL, Point3::new(0.0, 0.0, 0.6)),
    ];
    for sighting in &sightings {
        let frame = session.tick(DT, std::slice::from_ref(sighting), &[])?;
        if frame.rebuilt {
            tracing::info!(segments = session.segments().count(), "path rebuilt");
        }
    }

    let mut commands = vec![Command::Start];
    for step in 0..2_000 {
        if step == 120 {
            commands.push(Command::Jump);
        }
        let frame = session.tick(DT, &[], &commands)?;
        commands.clear();
        for event in &frame.events {
            tracing::info!(?event, "motion");
        }
        if frame
            .events
            .iter()
            .any(|event| matches!(event, MotionEvent::ReachedEnd { .. }))
        {
            let board = frame.scoreboard;
            tracing::info!(
                score = board.score,
                speed_kmh = board.display_speed,
                "run complete"
            );
            session.tick(DT, &[], &[Command::Restart])?;
            break;
        }
    }

    for prop in session.props() {
        tracing::info!(kind = %prop.kind, t = prop.parameter, "prop");
    }
    Ok(())
}
