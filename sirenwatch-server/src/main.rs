use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::io::{self, BufRead};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio_graceful_shutdown::{SubsystemBuilder, SubsystemHandle, Toplevel};

use sirenwatch_core::SharedLocation;
use sirenwatch_server::commands::{self, Command, Reply};
use sirenwatch_server::gps::GpsReceiver;
use sirenwatch_server::render::LogSink;
use sirenwatch_server::session::{AppSession, SharedSession};
use sirenwatch_server::tokio_sched::TokioScheduler;
use sirenwatch_server::Cli;

type Session = SharedSession<TokioScheduler, LogSink>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let fix = args.fix().into_diagnostic()?;
    let location = SharedLocation::new();
    let mut app = AppSession::new(
        TokioScheduler::current(),
        location.clone(),
        LogSink,
        args.session_config(),
    );
    if args.alerts {
        app.toggle_alerts();
    }
    log::info!("Sirenwatch started in {} mode, type 'quit' to exit", app.mode());
    let tracking = app.tracking();
    let session: Session = Arc::new(Mutex::new(app));

    let receiver = fix.map(|fix| GpsReceiver::new(location, fix, args.fix_delay()));
    let console_session = session.clone();
    let result = Toplevel::new(move |s| async move {
        if let Some(receiver) = receiver {
            s.start(SubsystemBuilder::new("gps", move |a| gps(a, receiver, tracking)));
        } else {
            log::warn!("No location fix available");
        }
        s.start(SubsystemBuilder::new("console", move |a| {
            console(a, console_session)
        }));
    })
    .catch_signals()
    .handle_shutdown_requests(Duration::from_millis(1000))
    .await;

    session
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .shutdown();

    result.map_err(Into::into)
}

async fn gps(
    subsys: SubsystemHandle,
    receiver: GpsReceiver,
    tracking: watch::Receiver<bool>,
) -> std::result::Result<(), io::Error> {
    tokio::select! {
        _ = subsys.on_shutdown_requested() => {}
        _ = receiver.track(tracking) => {}
    }
    Ok(())
}

/// Reads stdin on a plain thread so a pending read never holds up runtime
/// shutdown. The channel closes at end of input.
fn stdin_lines() -> mpsc::Receiver<io::Result<String>> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let failed = line.is_err();
            if tx.blocking_send(line).is_err() || failed {
                break;
            }
        }
    });
    rx
}

async fn console(subsys: SubsystemHandle, session: Session) -> std::result::Result<(), io::Error> {
    let mut lines = stdin_lines();

    loop {
        tokio::select! {
            _ = subsys.on_shutdown_requested() => {
                log::debug!("console: shutdown");
                return Ok(());
            },

            line = lines.recv() => {
                let Some(line) = line.transpose()? else {
                    log::debug!("console: end of input, keep running until interrupted");
                    subsys.on_shutdown_requested().await;
                    return Ok(());
                };
                let command = match Command::parse_line(&line) {
                    None => continue,
                    Some(Ok(command)) => command,
                    Some(Err(e)) => {
                        log::warn!("{}", e);
                        continue;
                    }
                };
                let timestamp = chrono::Utc::now().timestamp_millis().max(0) as u64;
                let reply = {
                    let mut session = session.lock().unwrap_or_else(PoisonError::into_inner);
                    commands::execute(&mut *session, command, timestamp)
                };
                match reply {
                    Ok(Reply::Message(message)) => println!("{}", message),
                    Ok(Reply::Quit) => {
                        subsys.request_shutdown();
                        return Ok(());
                    }
                    Err(e) => log::warn!("{}", e),
                }
            },
        }
    }
}
