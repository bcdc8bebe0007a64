use gong_timer::{
    services::{
        alert::testing::FakeSoundSource, AlertPlayer, KeyValueStore, MemoryStore, SessionStore,
        KEY_END_AT, KEY_MINUTES, KEY_SECONDS,
    },
    state::{
        picker_state::ITEM_HEIGHT, AppState, PickerId, PointerEvent, PointerKind, PointerPhase,
        TimerPhase,
    },
    ui::{Controls, Labels, Screen, View},
};

const T0: i64 = 1_700_000_000_000;

fn store_with(minutes: u32, seconds: u32) -> MemoryStore {
    let mut store = MemoryStore::new();
    store.set(KEY_MINUTES, &minutes.to_string()).unwrap();
    store.set(KEY_SECONDS, &seconds.to_string()).unwrap();
    store
}

fn app(source: &FakeSoundSource, store: MemoryStore) -> AppState<Screen, MemoryStore> {
    let labels = Labels::swedish();
    let mut app = AppState::new(
        Screen::new(&labels),
        SessionStore::new(store),
        AlertPlayer::new(Box::new(source.clone())),
        labels,
    );
    app.load(T0);
    app
}

/// Simulated reload: a fresh controller over whatever was persisted
fn reload(
    previous: &AppState<Screen, MemoryStore>,
    source: &FakeSoundSource,
    now_ms: i64,
) -> AppState<Screen, MemoryStore> {
    let labels = Labels::swedish();
    let mut app = AppState::new(
        Screen::new(&labels),
        SessionStore::new(previous.store().inner().clone()),
        AlertPlayer::new(Box::new(source.clone())),
        labels,
    );
    app.load(now_ms);
    app
}

fn drag(app: &mut AppState<Screen, MemoryStore>, id: PickerId, rows: f64, start_ms: i64) {
    let event = |phase, y, time_ms| PointerEvent {
        kind: PointerKind::Mouse,
        phase,
        y,
        time_ms,
    };
    app.pointer(id, event(PointerPhase::Down, 0.0, start_ms));
    app.pointer(id, event(PointerPhase::Move, -rows * ITEM_HEIGHT, start_ms + 500));
    app.pointer(id, event(PointerPhase::Move, -rows * ITEM_HEIGHT, start_ms + 1_000));
    app.pointer(id, event(PointerPhase::Up, -rows * ITEM_HEIGHT, start_ms + 1_000));
}

#[test]
fn fresh_start_shows_default_five_minutes() {
    let source = FakeSoundSource::new();
    let app = app(&source, MemoryStore::new());

    let screen = app.presenter();
    assert_eq!(screen.view, View::Setup);
    assert_eq!(screen.minutes, 5);
    assert_eq!(screen.seconds, 0);
    assert_eq!(screen.time_text, "05:00");
    assert_eq!(screen.controls, Controls::setup());
    assert_eq!(app.engine().phase(), TimerPhase::Idle);
}

#[test]
fn zero_duration_is_rejected_with_message() {
    let source = FakeSoundSource::new();
    let mut app = app(&source, store_with(0, 0));

    assert!(app.start(T0).is_err());
    assert_eq!(app.engine().phase(), TimerPhase::Idle);
    assert_eq!(
        app.presenter().validation.as_deref(),
        Some("Ställ in en tid större än 0")
    );
    assert_eq!(app.store().inner().get(KEY_END_AT), None);
    // The gesture still unlocked the sound
    assert!(app.alert().is_unlocked());
}

#[test]
fn dragging_pickers_commits_and_persists_duration() {
    let source = FakeSoundSource::new();
    let mut app = app(&source, store_with(5, 0));

    drag(&mut app, PickerId::Minutes, -6.0, T0);
    drag(&mut app, PickerId::Seconds, 15.0, T0 + 2_000);

    // 5 minus 6 wraps to the top of the 0..=60 range
    assert_eq!(app.chosen_duration().minutes, 60);
    assert_eq!(app.chosen_duration().seconds, 15);
    assert_eq!(app.store().inner().get(KEY_MINUTES), Some("60".to_string()));
    assert_eq!(app.store().inner().get(KEY_SECONDS), Some("15".to_string()));
    assert_eq!(app.presenter().time_text, "60:15");

    assert!(app.is_animating());
    assert!(!app.animate(T0 + 10_000));
    assert_eq!(app.presenter().minutes, 60);
    assert_eq!(app.presenter().seconds, 15);
}

#[test]
fn flick_highlight_moves_toward_target_without_jumping_back() {
    let source = FakeSoundSource::new();
    let mut app = app(&source, store_with(5, 0));
    let event = |phase, y, time_ms| PointerEvent {
        kind: PointerKind::Mouse,
        phase,
        y,
        time_ms,
    };

    app.pointer(PickerId::Minutes, event(PointerPhase::Down, 0.0, T0));
    app.pointer(PickerId::Minutes, event(PointerPhase::Move, -ITEM_HEIGHT, T0 + 80));
    assert_eq!(app.presenter().minutes, 6);

    // Momentum carries the commit two rows further
    app.pointer(PickerId::Minutes, event(PointerPhase::Up, -ITEM_HEIGHT, T0 + 80));
    assert_eq!(app.chosen_duration().minutes, 8);
    assert_eq!(app.presenter().time_text, "08:00");
    assert_eq!(app.presenter().minutes, 6);

    assert!(app.animate(T0 + 130));
    assert_eq!(app.presenter().minutes, 7);
    assert!(!app.animate(T0 + 330));
    assert_eq!(app.presenter().minutes, 8);
}

#[test]
fn fifteen_second_session_completes_once() {
    let source = FakeSoundSource::new();
    let mut app = app(&source, store_with(0, 15));

    app.start(T0).unwrap();
    assert_eq!(app.store().inner().get(KEY_END_AT), Some((T0 + 15_000).to_string()));
    assert_eq!(app.presenter().view, View::Timer);
    assert!(app.presenter().pulsing);

    let mut now = T0;
    while now < T0 + 20_000 {
        now += 500;
        app.tick(now);
    }

    assert_eq!(app.engine().phase(), TimerPhase::Finished);
    assert_eq!(app.store().inner().get(KEY_END_AT), None);
    // One warning at ten seconds, one at completion
    assert_eq!(source.log().plays, 2);
    let screen = app.presenter();
    assert_eq!(screen.time_text, "00:00");
    assert_eq!(screen.controls, Controls::finished());
    assert!(!screen.pulsing);
    assert!(screen.sound_indicator);

    app.expire_indicator(T0 + 19_000);
    assert!(!app.presenter().sound_indicator);
}

#[test]
fn warning_fires_when_ten_seconds_remain() {
    let source = FakeSoundSource::new();
    let mut app = app(&source, store_with(0, 30));
    app.start(T0).unwrap();

    app.tick(T0 + 19_500);
    assert_eq!(source.log().plays, 0);
    app.tick(T0 + 20_000);
    assert_eq!(source.log().plays, 1);
    assert_eq!(app.presenter().time_text, "00:10");
    app.tick(T0 + 20_500);
    app.tick(T0 + 21_000);
    assert_eq!(source.log().plays, 1);
}

#[test]
fn pause_survives_any_length_and_clears_persisted_end() {
    let source = FakeSoundSource::new();
    let mut app = app(&source, store_with(2, 0));
    app.start(T0).unwrap();
    app.tick(T0 + 45_000);

    app.toggle_pause(T0 + 45_000);
    assert_eq!(app.engine().phase(), TimerPhase::Paused);
    assert_eq!(app.store().inner().get(KEY_END_AT), None);
    assert_eq!(app.presenter().pause_label, "Fortsätt");
    assert!(!app.presenter().pulsing);

    let later = T0 + 3 * 3_600_000;
    app.tick(later);
    assert_eq!(app.presenter().time_text, "01:15");

    app.toggle_pause(later);
    assert_eq!(app.engine().phase(), TimerPhase::Running);
    assert_eq!(app.store().inner().get(KEY_END_AT), Some((later + 75_000).to_string()));
    assert_eq!(app.presenter().pause_label, "Paus");
    app.tick(later + 1_000);
    assert_eq!(app.presenter().time_text, "01:14");
}

#[test]
fn reload_while_running_continues_without_sound() {
    let source = FakeSoundSource::new();
    let mut first = app(&source, store_with(1, 0));
    first.start(T0).unwrap();

    let reloaded_source = FakeSoundSource::new();
    let mut second = reload(&first, &reloaded_source, T0 + 20_000);
    assert_eq!(second.engine().phase(), TimerPhase::Running);
    assert!(second.engine().is_ticking());
    assert_eq!(second.presenter().view, View::Timer);
    assert_eq!(second.presenter().time_text, "00:40");
    assert!(!second.alert().is_unlocked());

    // Warning comes due while still locked: indicator only, no audio
    second.tick(T0 + 49_500);
    second.tick(T0 + 50_000);
    assert!(second.presenter().sound_indicator);
    assert_eq!(reloaded_source.log().plays, 0);

    // Next interaction unlocks again
    second.toggle_pause(T0 + 51_000);
    assert!(second.alert().is_unlocked());
}

#[test]
fn reload_after_end_finishes_silently() {
    let source = FakeSoundSource::new();
    let mut first = app(&source, store_with(0, 30));
    first.start(T0).unwrap();

    let reloaded_source = FakeSoundSource::new();
    let second = reload(&first, &reloaded_source, T0 + 120_000);

    assert_eq!(second.engine().phase(), TimerPhase::Finished);
    assert_eq!(reloaded_source.log().plays, 0);
    assert_eq!(reloaded_source.log().loads, 0);
    let screen = second.presenter();
    assert!(screen.completion_cue);
    assert!(!screen.sound_indicator);
    assert_eq!(screen.time_text, "00:00");
    assert_eq!(screen.controls, Controls::finished());
    assert_eq!(second.store().inner().get(KEY_END_AT), None);
}

#[test]
fn reload_while_paused_starts_idle() {
    let source = FakeSoundSource::new();
    let mut first = app(&source, store_with(3, 0));
    first.start(T0).unwrap();
    first.toggle_pause(T0 + 10_000);

    let second = reload(&first, &source, T0 + 20_000);
    assert_eq!(second.engine().phase(), TimerPhase::Idle);
    assert_eq!(second.presenter().view, View::Setup);
    assert_eq!(second.presenter().time_text, "03:00");
}

#[test]
fn corrupt_end_time_is_treated_as_no_session() {
    let source = FakeSoundSource::new();
    let mut store = store_with(4, 0);
    store.set(KEY_END_AT, "not-a-number").unwrap();
    let app = app(&source, store);

    assert_eq!(app.engine().phase(), TimerPhase::Idle);
    assert_eq!(app.store().inner().get(KEY_END_AT), None);
}

#[test]
fn end_time_beyond_longest_duration_is_treated_as_no_session() {
    let source = FakeSoundSource::new();
    let mut store = store_with(4, 0);
    store.set(KEY_END_AT, &(T0 + 10_000_000_000).to_string()).unwrap();
    let app = app(&source, store);

    assert_eq!(app.engine().phase(), TimerPhase::Idle);
    assert_eq!(app.presenter().view, View::Setup);
    assert_eq!(app.presenter().time_text, "04:00");
    assert_eq!(app.store().inner().get(KEY_END_AT), None);
}

#[test]
fn max_end_time_never_overflows_on_pause_and_resume() {
    let source = FakeSoundSource::new();
    let mut store = store_with(4, 0);
    store.set(KEY_END_AT, &i64::MAX.to_string()).unwrap();
    let mut app = app(&source, store);
    assert_eq!(app.engine().phase(), TimerPhase::Idle);

    // Even a session started the normal way survives the round trip
    app.start(T0).unwrap();
    app.toggle_pause(T0 + 1_000);
    app.toggle_pause(T0 + 2_000);
    assert_eq!(app.engine().phase(), TimerPhase::Running);
    assert_eq!(app.store().inner().get(KEY_END_AT), Some((T0 + 241_000).to_string()));
}

#[test]
fn resume_from_background_catches_up() {
    let source = FakeSoundSource::new();
    let mut app = app(&source, store_with(10, 0));
    app.start(T0).unwrap();
    let generation = app.engine().tick_generation();

    app.on_resume(T0 + 7 * 60_000);
    assert_eq!(app.presenter().time_text, "03:00");
    assert_eq!(app.engine().tick_generation(), generation + 1);

    app.on_resume(T0 + 11 * 60_000);
    assert_eq!(app.engine().phase(), TimerPhase::Finished);
    assert_eq!(source.log().plays, 1);
}

#[test]
fn reset_returns_to_setup_and_needs_fresh_unlock() {
    let source = FakeSoundSource::new();
    let mut app = app(&source, store_with(0, 20));
    app.start(T0).unwrap();
    app.tick(T0 + 30_000);
    assert_eq!(app.engine().phase(), TimerPhase::Finished);

    app.reset();
    assert_eq!(app.engine().phase(), TimerPhase::Idle);
    assert!(!app.alert().is_unlocked());
    assert_eq!(source.log().stops, 1);
    let screen = app.presenter();
    assert_eq!(screen.view, View::Setup);
    assert_eq!(screen.controls, Controls::setup());
    assert_eq!(screen.time_text, "00:20");
    assert_eq!(screen.progress, 0.0);

    app.start(T0 + 40_000).unwrap();
    assert_eq!(source.log().loads, 2);
}
