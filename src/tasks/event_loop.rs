//! Cooperative event loop driving the controller

use std::time::Duration;
use tokio::{
    sync::mpsc,
    time::{interval, sleep, Interval, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::{
    services::KeyValueStore,
    state::{AppState, CountdownEngine, PickerId, PointerEvent},
    ui::Presenter,
};

/// Interval between picker snap animation frames
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Everything that can happen to the application from outside
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    Pointer(PickerId, PointerEvent),
    Start,
    TogglePause,
    Reset,
    /// Host regained focus or the process was continued
    Resume,
    Redraw,
    Quit,
}

/// Run until `Quit` arrives or every sender is gone.
///
/// The periodic tick exists only while the engine asks for it; whenever it
/// re-arms (new generation) the old interval is dropped before a new one is
/// created, so two tick sources never overlap.
pub async fn run_event_loop<P, S, C>(
    app: &mut AppState<P, S>,
    mut events: mpsc::Receiver<AppEvent>,
    tick_every: Duration,
    clock: C,
) -> Result<(), String>
where
    P: Presenter,
    S: KeyValueStore,
    C: Fn() -> i64,
{
    info!("Starting event loop, tick every {:?}", tick_every);

    let mut ticker: Option<(u64, Interval)> = None;
    let mut frames: Option<Interval> = None;
    app.presenter_mut().flush()?;

    loop {
        sync_ticker(app.engine(), &mut ticker, tick_every);
        if !app.is_animating() {
            frames = None;
        } else if frames.is_none() {
            frames = Some(interval(FRAME_INTERVAL));
        }
        let indicator_in = app
            .indicator_deadline()
            .map(|deadline| Duration::from_millis((deadline - clock()).max(0) as u64));

        tokio::select! {
            event = events.recv() => {
                let now = clock();
                match event {
                    Some(AppEvent::Quit) | None => {
                        info!("Event loop stopping");
                        break;
                    }
                    Some(AppEvent::Pointer(id, pointer)) => app.pointer(id, pointer),
                    Some(AppEvent::Start) => {
                        if let Err(e) = app.start(now) {
                            warn!("Start rejected: {}", e);
                        }
                    }
                    Some(AppEvent::TogglePause) => app.toggle_pause(now),
                    Some(AppEvent::Reset) => app.reset(),
                    Some(AppEvent::Resume) => app.on_resume(now),
                    Some(AppEvent::Redraw) => debug!("Redraw requested"),
                }
            }
            _ = next_tick(&mut ticker) => app.tick(clock()),
            _ = next_frame(&mut frames) => {
                app.animate(clock());
            }
            _ = sleep_for(indicator_in) => app.expire_indicator(clock()),
        }

        app.presenter_mut().flush()?;
    }

    Ok(())
}

fn sync_ticker(engine: &CountdownEngine, ticker: &mut Option<(u64, Interval)>, every: Duration) {
    if !engine.is_ticking() {
        if ticker.take().is_some() {
            debug!("Periodic tick cancelled");
        }
        return;
    }

    let generation = engine.tick_generation();
    if ticker.as_ref().map(|(armed, _)| *armed) != Some(generation) {
        // Drop the previous interval before arming the new one
        ticker.take();
        let mut fresh = interval(every);
        fresh.set_missed_tick_behavior(MissedTickBehavior::Delay);
        *ticker = Some((generation, fresh));
        debug!("Periodic tick armed, generation {}", generation);
    }
}

async fn next_tick(ticker: &mut Option<(u64, Interval)>) {
    match ticker {
        Some((_, interval)) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn next_frame(frames: &mut Option<Interval>) {
    match frames {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

async fn sleep_for(duration: Option<Duration>) {
    match duration {
        Some(duration) => sleep(duration).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::{alert::testing::FakeSoundSource, AlertPlayer, MemoryStore, SessionStore},
        state::TimerPhase,
        ui::{Labels, Screen},
    };
    use tokio::time::Instant;

    const T0: i64 = 1_700_000_000_000;

    fn app_with(source: &FakeSoundSource, store: MemoryStore) -> AppState<Screen, MemoryStore> {
        let labels = Labels::swedish();
        AppState::new(
            Screen::new(&labels),
            SessionStore::new(store),
            AlertPlayer::new(Box::new(source.clone())),
            labels,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_runs_countdown_to_completion() {
        let source = FakeSoundSource::new();
        let mut store = MemoryStore::new();
        store.set(crate::services::KEY_MINUTES, "0").unwrap();
        store.set(crate::services::KEY_SECONDS, "15").unwrap();
        let mut app = app_with(&source, store);

        let base = Instant::now();
        let clock = move || T0 + base.elapsed().as_millis() as i64;
        app.load(clock());

        let (tx, rx) = mpsc::channel(8);
        let driver = async move {
            tx.send(AppEvent::Start).await.unwrap();
            sleep(Duration::from_secs(20)).await;
            tx.send(AppEvent::Quit).await.unwrap();
        };

        let (result, ()) = tokio::join!(
            run_event_loop(&mut app, rx, Duration::from_millis(500), clock),
            driver
        );
        result.unwrap();

        assert_eq!(app.engine().phase(), TimerPhase::Finished);
        assert_eq!(app.presenter().time_text, "00:00");
        // Warning at 10s plus completion
        assert_eq!(source.log().plays, 2);
        assert_eq!(app.store().inner().get(crate::services::KEY_END_AT), None);
        // The indicator timer ran out during the remaining seconds
        assert!(!app.presenter().sound_indicator);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_pause_stops_ticking() {
        let source = FakeSoundSource::new();
        let mut app = app_with(&source, MemoryStore::new());

        let base = Instant::now();
        let clock = move || T0 + base.elapsed().as_millis() as i64;
        app.load(clock());

        let (tx, rx) = mpsc::channel(8);
        let driver = async move {
            tx.send(AppEvent::Start).await.unwrap();
            sleep(Duration::from_secs(60)).await;
            tx.send(AppEvent::TogglePause).await.unwrap();
            sleep(Duration::from_secs(600)).await;
            tx.send(AppEvent::Quit).await.unwrap();
        };

        let (result, ()) = tokio::join!(
            run_event_loop(&mut app, rx, Duration::from_millis(500), clock),
            driver
        );
        result.unwrap();

        assert_eq!(app.engine().phase(), TimerPhase::Paused);
        assert_eq!(app.engine().remaining_seconds(), 240);
        assert_eq!(app.presenter().time_text, "04:00");
        assert_eq!(source.log().plays, 0);
    }
}
