// Kanaboard End-to-End Test Scenarios
//
// These tests simulate whole input sessions: touch gestures, an attached
// keyboard and configuration changes, observed through the recording
// engine and view.
//
// Run with: cargo test --test e2e_scenarios

use kanaboard_core::key::scan;
use kanaboard_core::touch::code;
use kanaboard_core::{
    ActiveSource, CompositionMode, DeviceConfiguration, EngineRequest, FlickDirection,
    GestureEvent, HardwareKeyboardSpecification, InputSession, Key, KeyGeometry, KeyboardClass,
    LayoutFamily, MetaState, MetaTracker, NormalizedKeyEvent, RawKeyEvent, RecordingEngine,
    RecordingView, ScanCode, TouchSample, ViewNotification,
};

// =========================================================================
// Test Helpers
// =========================================================================

const KEY_SIZE: f32 = 120.0;

type Session = InputSession<RecordingEngine, RecordingView>;

fn new_session() -> (Session, RecordingEngine, RecordingView) {
    let engine = RecordingEngine::new();
    let view = RecordingView::new();
    let session = InputSession::new(engine.clone(), view.clone());
    (session, engine, view)
}

/// The '5' key of a twelve-key pad with its four flick characters
fn five_key() -> Key {
    Key::flick('5', 'k', '%', 'j', 'l', KeyGeometry::sized(KEY_SIZE, KEY_SIZE))
}

/// Touch down at the key center, move by (dx, dy), release there
fn flick(
    session: &mut Session,
    key: &Key,
    pointer: u32,
    start: u64,
    dx: f32,
    dy: f32,
) -> Vec<GestureEvent> {
    let (cx, cy) = key.geometry().local_center();
    let mut out = Vec::new();
    out.extend(session.touch(key, &TouchSample::down(pointer, cx, cy, start)));
    out.extend(session.touch_pointer(&TouchSample::moved(pointer, cx + dx, cy + dy, start + 30)));
    out.extend(session.touch_pointer(&TouchSample::up(pointer, cx + dx, cy + dy, start + 60)));
    out
}

fn jis_down(tracker: &mut MetaTracker, code: ScanCode) -> RawKeyEvent {
    tracker.observe(code, 1).expect("press is a key action")
}

fn jis_up(tracker: &mut MetaTracker, code: ScanCode) -> RawKeyEvent {
    tracker.observe(code, 0).expect("release is a key action")
}

// =========================================================================
// Flick input
// =========================================================================

#[test]
fn e2e_flick_in_every_direction() {
    let (mut session, engine, view) = new_session();
    let key = five_key();

    let moves = [
        (0.0, -KEY_SIZE, FlickDirection::Up, 'k'),
        (0.0, KEY_SIZE, FlickDirection::Down, '%'),
        (-KEY_SIZE, 0.0, FlickDirection::Left, 'j'),
        (KEY_SIZE, 0.0, FlickDirection::Right, 'l'),
    ];
    for (i, (dx, dy, direction, expected)) in moves.into_iter().enumerate() {
        let out = flick(&mut session, &key, 0, i as u64 * 1000, dx, dy);
        assert_eq!(out.len(), 4, "{}", expected);
        assert_eq!(out[0], GestureEvent::PressFeedback { pointer_id: 0, code: '5' as i32 });
        assert_eq!(
            out[1],
            GestureEvent::FlickLocked { pointer_id: 0, direction, code: expected as i32 }
        );
        assert!(matches!(out[2], GestureEvent::Commit { code, .. } if code == expected as i32));
        assert_eq!(out[3], GestureEvent::ReleaseFeedback { pointer_id: 0, code: '5' as i32 });
        assert!(view
            .notifications()
            .contains(&ViewNotification::PressFeedback(expected as i32)));
    }

    assert_eq!(
        engine.sent_keys(),
        vec![
            NormalizedKeyEvent::char('k'),
            NormalizedKeyEvent::char('%'),
            NormalizedKeyEvent::char('j'),
            NormalizedKeyEvent::char('l'),
        ]
    );
    let presses = view
        .notifications()
        .iter()
        .filter(|n| **n == ViewNotification::PressFeedback('5' as i32))
        .count();
    assert_eq!(presses, 4);
}

#[test]
fn e2e_small_drift_is_a_tap() {
    let (mut session, engine, _) = new_session();
    let key = five_key();
    flick(&mut session, &key, 0, 0, 10.0, -12.0);
    assert_eq!(engine.sent_keys(), vec![NormalizedKeyEvent::char('5')]);
}

#[test]
fn e2e_two_fingers_do_not_interfere() {
    let (mut session, engine, _) = new_session();
    let five = five_key();
    let a = Key::char('a', KeyGeometry::new(KEY_SIZE, 0.0, KEY_SIZE, KEY_SIZE));

    session.touch(&five, &TouchSample::down(0, 60.0, 60.0, 0));
    session.touch(&a, &TouchSample::down(1, 60.0, 60.0, 10));
    session.touch_pointer(&TouchSample::moved(0, 60.0, -40.0, 20));
    session.touch_pointer(&TouchSample::up(1, 60.0, 60.0, 30));
    session.touch_pointer(&TouchSample::up(0, 60.0, -40.0, 40));

    assert_eq!(
        engine.sent_keys(),
        vec![NormalizedKeyEvent::char('a'), NormalizedKeyEvent::char('k')]
    );
    assert_eq!(session.recognizer().active_pointers(), 0);
}

#[test]
fn e2e_cancelled_gesture_commits_nothing() {
    let (mut session, engine, view) = new_session();
    let key = five_key();
    session.touch(&key, &TouchSample::down(0, 60.0, 60.0, 0));
    session.touch_pointer(&TouchSample::cancel(0, 50));
    session.advance(10_000);

    assert!(engine.sent_keys().is_empty());
    assert_eq!(
        view.notifications(),
        vec![
            ViewNotification::PressFeedback('5' as i32),
            ViewNotification::ReleaseFeedback('5' as i32)
        ]
    );
}

#[test]
fn e2e_long_press_commits_alternate() {
    let (mut session, engine, _) = new_session();
    let key = Key::char('は', KeyGeometry::sized(KEY_SIZE, KEY_SIZE)).with_long_press('ぱ' as i32);

    session.touch(&key, &TouchSample::down(0, 60.0, 60.0, 0));
    let fired = session.advance(450);
    assert!(matches!(fired[0], GestureEvent::LongPress { count: 1, repeatable: false, .. }));
    session.touch_pointer(&TouchSample::up(0, 60.0, 60.0, 600));

    assert_eq!(engine.sent_keys(), vec![NormalizedKeyEvent::char('ぱ')]);
}

#[test]
fn e2e_flick_after_long_press_delay_still_flicks() {
    let (mut session, engine, _) = new_session();
    let key = five_key();
    session.touch(&key, &TouchSample::down(0, 60.0, 60.0, 0));
    session.touch_pointer(&TouchSample::moved(0, 60.0, -60.0, 100));
    session.advance(1_000);
    session.touch_pointer(&TouchSample::up(0, 60.0, -60.0, 1_100));

    assert_eq!(engine.sent_keys(), vec![NormalizedKeyEvent::char('k')]);
    assert_eq!(key.flick_code(FlickDirection::Up), 'k' as i32);
}

// =========================================================================
// Hardware keyboard sessions
// =========================================================================

#[test]
fn e2e_attach_jis_keyboard_and_type() {
    let (mut session, engine, view) = new_session();
    session.configuration_changed(DeviceConfiguration::new().with_keyboard(KeyboardClass::Qwerty));
    assert_eq!(
        session.state().hardware,
        Some(HardwareKeyboardSpecification::Japanese109A)
    );
    assert!(session.state().narrow);
    assert_eq!(view.last_layout().map(|(_, narrow)| narrow), Some(true));
    engine.take();

    let mut tracker = MetaTracker::new();
    for event in [
        jis_down(&mut tracker, scan::LEFT_SHIFT),
        jis_down(&mut tracker, ScanCode(3)),
        jis_up(&mut tracker, ScanCode(3)),
        jis_up(&mut tracker, scan::LEFT_SHIFT),
        jis_down(&mut tracker, scan::A),
        jis_up(&mut tracker, scan::A),
    ] {
        session.hardware_key(&event);
    }

    let requests = engine.take();
    // Shift alone is forwarded before the first keystroke commits touch input
    assert!(matches!(&requests[0], EngineRequest::SendKey { event, .. } if event.is_modifier_only()));
    assert_eq!(requests[1], EngineRequest::Submit);
    assert_eq!(requests.iter().filter(|r| **r == EngineRequest::Submit).count(), 1);
    let typed: Vec<char> = requests
        .iter()
        .filter_map(|request| match request {
            EngineRequest::SendKey { event, raw, touches } => {
                assert!(raw.is_some());
                assert!(touches.is_empty());
                event.as_char()
            }
            _ => None,
        })
        .collect();
    assert_eq!(typed, vec!['"', 'a']);
    assert_eq!(session.state().source, ActiveSource::Hardware);
}

#[test]
fn e2e_hankaku_zenkaku_switches_once_per_press() {
    let (mut session, engine, view) = new_session();
    session.configuration_changed(DeviceConfiguration::new().with_keyboard(KeyboardClass::Qwerty));
    session.hardware_key(&RawKeyEvent::from_scan_code(scan::A, MetaState::NONE));
    engine.take();
    view.take();

    let mut tracker = MetaTracker::new();
    session.hardware_key(&jis_down(&mut tracker, scan::GRAVE));
    session.hardware_key(&jis_up(&mut tracker, scan::GRAVE));

    assert_eq!(session.state().mode, CompositionMode::Latin);
    assert_eq!(
        session.state().software_layout,
        HardwareKeyboardSpecification::Japanese109A.latin_layout()
    );
    let requests = engine.take();
    assert!(!requests.iter().any(|r| matches!(r, EngineRequest::SendKey { .. })));
    let switches: Vec<&EngineRequest> = requests
        .iter()
        .filter(|r| matches!(r, EngineRequest::SwitchInputMode { .. }))
        .collect();
    assert_eq!(switches.len(), 1);
    assert!(matches!(
        switches[0],
        EngineRequest::SwitchInputMode { trigger: Some(raw), mode: CompositionMode::Latin }
            if raw.scan_code == scan::GRAVE
    ));
}

#[test]
fn e2e_held_hankaku_zenkaku_switches_once() {
    let (mut session, engine, _) = new_session();
    session.configuration_changed(DeviceConfiguration::new().with_keyboard(KeyboardClass::Qwerty));
    session.hardware_key(&RawKeyEvent::from_scan_code(scan::A, MetaState::NONE));
    assert_eq!(session.state().source, ActiveSource::Hardware);
    engine.take();

    // Press, two auto-repeats, release
    let mut tracker = MetaTracker::new();
    for value in [1, 2, 2, 0] {
        let raw = tracker.observe(scan::GRAVE, value).expect("key action");
        session.hardware_key(&raw);
    }

    let switches = engine
        .take()
        .into_iter()
        .filter(|r| matches!(r, EngineRequest::SwitchInputMode { .. }))
        .count();
    assert_eq!(switches, 1);
    assert_eq!(session.state().mode, CompositionMode::Latin);
}

#[test]
fn e2e_detach_keyboard_returns_to_touch() {
    let (mut session, _, view) = new_session();
    session.configuration_changed(DeviceConfiguration::new().with_keyboard(KeyboardClass::Qwerty));
    session.hardware_key(&RawKeyEvent::from_scan_code(scan::A, MetaState::NONE));
    assert_eq!(session.state().source, ActiveSource::Hardware);

    session.configuration_changed(DeviceConfiguration::new().with_keyboard(KeyboardClass::NoKeys));
    assert_eq!(session.state().source, ActiveSource::Software);
    assert_eq!(session.state().hardware, None);
    assert!(!session.state().narrow);
    assert_eq!(session.state().software_layout.family, LayoutFamily::TwelveKey);
    assert_eq!(view.last_layout().map(|(_, narrow)| narrow), Some(false));
}

#[test]
fn e2e_touch_layout_key_while_keyboard_attached() {
    let (mut session, engine, _) = new_session();
    session.configuration_changed(DeviceConfiguration::new().with_keyboard(KeyboardClass::Qwerty));
    session.hardware_key(&RawKeyEvent::from_scan_code(scan::A, MetaState::NONE));
    engine.take();

    let key = Key::new(code::QWERTY_KANA, KeyGeometry::sized(KEY_SIZE, KEY_SIZE));
    session.touch(&key, &TouchSample::down(0, 10.0, 10.0, 5_000));
    session.touch_pointer(&TouchSample::up(0, 10.0, 10.0, 5_050));

    assert_eq!(session.state().source, ActiveSource::Software);
    assert_eq!(session.state().software_layout.family, LayoutFamily::Qwerty);
    assert_eq!(session.state().mode, CompositionMode::NativeScript);
    assert!(!engine.requests().contains(&EngineRequest::Submit));
}

// =========================================================================
// Session teardown
// =========================================================================

#[test]
fn e2e_reset_between_sessions() {
    let (mut session, engine, _) = new_session();
    session.configuration_changed(DeviceConfiguration::new().with_keyboard(KeyboardClass::TwelveKey));
    session.touch(&five_key(), &TouchSample::down(0, 60.0, 60.0, 0));
    session.reset();

    assert_eq!(session.state().hardware, None);
    assert_eq!(session.next_deadline(), None);
    assert!(session.advance(5_000).is_empty());

    let (returned_engine, _) = session.into_parts();
    assert_eq!(returned_engine.len(), engine.len());
}

#[cfg(feature = "settings")]
mod with_settings {
    use super::*;
    use kanaboard_core::replay::Script;
    use kanaboard_core::settings::Settings;

    #[test]
    fn e2e_settings_pin_layout_and_policy() {
        let settings = Settings::from_toml(
            r#"
            [hardware]
            layout = "default"

            [touch]
            long_press_delay_ms = 300

            [display]
            narrow_policy = "keystroke"
            "#,
        )
        .unwrap();

        let engine = RecordingEngine::new();
        let mut session = InputSession::from_settings(engine.clone(), RecordingView::new(), &settings);
        session.configuration_changed(DeviceConfiguration::new().with_keyboard(KeyboardClass::Qwerty));
        assert_eq!(session.state().hardware, Some(HardwareKeyboardSpecification::Default));
        assert!(!session.state().narrow);

        session.hardware_key(&RawKeyEvent::from_key_code(
            kanaboard_core::key::keycode::A,
            MetaState::NONE,
        ));
        assert!(session.state().narrow);
        assert_eq!(engine.sent_keys(), vec![NormalizedKeyEvent::char('a')]);

        session.touch(&five_key(), &TouchSample::down(0, 60.0, 60.0, 1_000));
        assert_eq!(session.next_deadline(), Some(1_300));
    }

    #[test]
    fn e2e_replay_script_from_file() {
        let path = std::env::temp_dir().join(format!(
            "kanaboard-e2e-replay-{}.toml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"
[keys.five]
code = "5"
flick = { up = "k", down = "%", left = "j", right = "l" }
width = 120.0
height = 120.0

[[steps]]
kind = "configure"
keyboard = "twelve_key"

[[steps]]
kind = "touch"
action = "down"
key = "five"
x = 60.0
y = 60.0
at = 0

[[steps]]
kind = "touch"
action = "move"
x = -60.0
y = 60.0
at = 30

[[steps]]
kind = "touch"
action = "up"
x = -60.0
y = 60.0
at = 60

[[steps]]
kind = "key"
scan = 0
key_code = "POUND"
"#,
        )
        .unwrap();

        let script = Script::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let (mut session, engine, _) = new_session();
        let reports = script.run(&mut session);
        assert_eq!(reports.len(), 5);
        assert_eq!(session.state().hardware, Some(HardwareKeyboardSpecification::TwelveKey));

        let sent = engine.sent_keys();
        assert_eq!(sent[0], NormalizedKeyEvent::char('j'));
        assert_eq!(sent[1].as_special(), Some(kanaboard_core::SpecialKey::Enter));
        assert!(reports[4].outcome.is_some_and(|outcome| outcome.is_consumed()));
    }
}
