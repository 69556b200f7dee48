use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use shuttle_tracker::dataset;
use shuttle_tracker::domain::{DayTime, ServiceId, Timetable};
use shuttle_tracker::query::ScheduleQueryEngine;
use shuttle_tracker::tracker::{
    Clock, PositionFix, SyntheticPositionSource, SystemClock, TrackingSession,
};

/// The bundled demonstration timetable.
const SAMPLE_TIMETABLE: &str = include_str!("../data/sample-timetable.json");

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load the timetable: a path argument overrides the bundled sample.
    let timetable = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .unwrap_or_else(|e| panic!("Failed to read {path}: {e}"));
            dataset::load_str(&json).expect("Failed to load timetable")
        }
        None => dataset::load_str(SAMPLE_TIMETABLE).expect("Failed to load bundled timetable"),
    };

    let engine = ScheduleQueryEngine::new(&timetable).expect("Failed to index timetable");

    print_queries(&timetable, &engine);
    run_tracking_demo(&engine).await;
}

fn print_queries(timetable: &Timetable, engine: &ScheduleQueryEngine<'_>) {
    println!(
        "{} timetable, version {}, valid from {}",
        timetable.carrier.name, timetable.version, timetable.valid_from
    );
    println!();

    println!("Lines:");
    for line in engine.lines() {
        println!("  {:>3}  {}", line.line_number, line.description);
    }
    println!();

    println!("Services on line 23:");
    for service in engine.services_for_line("23").unwrap_or_default() {
        let departure = service
            .schedule
            .first()
            .and_then(|e| e.departure)
            .map(|t| t.to_string())
            .unwrap_or_else(|| "--:--".to_string());
        let terminus = engine
            .index()
            .name_of(service.final_stop_id())
            .unwrap_or("?");
        println!("  service {:>4}  dep {departure}  to {terminus}", service.id);
    }
    println!();

    let after = DayTime::parse("10:00").expect("valid literal");
    println!("Departures from Na verandě after {after}:");
    for departure in engine.departures_from_stop("Na verandě", after) {
        println!(
            "  {}  line {:>3}  to {}",
            departure.departure, departure.line, departure.final_stop
        );
    }
    println!();

    println!("Connections U pracovního stolu -> Na verandě after {after}:");
    for connection in engine.connections("U pracovního stolu", "Na verandě", after) {
        println!(
            "  line {:>3}  dep {}  arr {}  ({} calls)",
            connection.line,
            connection.departure,
            connection.arrival,
            connection.journey.len()
        );
    }
    println!();
}

/// Drive a synthetic run of one service end to end: feed a fix at each
/// stop, advance, and print what a driver's display would show.
async fn run_tracking_demo(engine: &ScheduleQueryEngine<'_>) {
    let clock = Arc::new(SystemClock);
    let schedule = engine.service_details("14", ServiceId(101), clock.today());
    let stops = schedule.clone();

    let source = SyntheticPositionSource::granted();
    let session =
        TrackingSession::start(&source, schedule, clock.clone()).expect("permission granted");

    println!("Tracking line 14, service 101:");
    for stop in &stops {
        source.push(PositionFix {
            latitude: stop.coordinates.lat,
            longitude: stop.coordinates.lon,
            timestamp: clock.now(),
        });
        tokio::time::sleep(Duration::from_millis(50)).await;

        let snapshot = session.snapshot();
        let flag = if snapshot.current_stop_is_request_stop {
            " (request stop)"
        } else {
            ""
        };
        println!(
            "  at {}{flag}, progress {:.0}%, next: {}",
            snapshot.current_stop.as_deref().unwrap_or("-"),
            snapshot.progress_percent,
            snapshot.next_stop.as_deref().unwrap_or("end of run"),
        );

        session.advance_to_next_stop().await;
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    println!("Run complete.");
}
