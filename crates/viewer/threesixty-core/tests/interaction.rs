mod common;

use common::{mk_ready_viewer, mk_viewer, run_until_settled};
use threesixty_core::{FrameState, TickOutcome, ViewerConfig, ViewerEvent};

#[test]
fn first_frame_is_shown_on_ready() {
    let v = mk_ready_viewer(ViewerConfig {
        total_frames: 8,
        ..Default::default()
    });
    assert_eq!(v.current_index(), Some(0));
    assert_eq!(v.frames().count(FrameState::Current), 1);
}

#[test]
fn spin_disabled_shows_slot_zero() {
    let mut v = mk_ready_viewer(ViewerConfig {
        total_frames: 8,
        disable_spin: true,
        ..Default::default()
    });
    assert_eq!(v.current_index(), Some(0));
    assert_eq!(v.state().current_frame, 1.0);
    // refresh on ready finds nothing to do
    run_until_settled(&mut v);
    assert_eq!(v.current_index(), Some(0));
}

#[test]
fn wrap_drag_end_to_end() {
    let mut v = mk_ready_viewer(ViewerConfig {
        total_frames: 4,
        zero_based: true,
        speed_multiplier: 1.0,
        ..Default::default()
    });
    run_until_settled(&mut v);

    // width 400: ceil(3 * 1 * 800 / 400) = 6
    v.pointer_down(0.0);
    v.pointer_move(800.0, 1_000.0);
    v.pointer_up();
    assert_eq!(v.state().end_frame, 6.0);
    assert!(v.state().is_animating());

    while v.state().is_animating() {
        v.tick();
        assert_eq!(v.frames().count(FrameState::Current), 1);
    }
    assert_eq!(v.state().current_frame, 6.0);
    assert_eq!(v.current_index(), Some(2));
}

#[test]
fn clamp_drag_stops_at_last_frame() {
    let mut v = mk_ready_viewer(ViewerConfig {
        total_frames: 10,
        disable_wrap: true,
        ..Default::default()
    });
    run_until_settled(&mut v);
    // ready pulled the position into [1, 10]
    assert_eq!(v.state().current_frame, 1.0);

    v.pointer_down(0.0);
    v.pointer_move(4_000.0, 1_000.0);
    assert_eq!(v.state().end_frame, 10.0);
    run_until_settled(&mut v);
    assert_eq!(v.state().current_frame, 10.0);
    assert_eq!(v.current_index(), Some(9));

    // dragging further right changes nothing
    v.pointer_move(8_000.0, 2_000.0);
    assert_eq!(v.state().end_frame, 10.0);
    run_until_settled(&mut v);
    assert_eq!(v.current_index(), Some(9));

    v.pointer_move(-8_000.0, 3_000.0);
    assert_eq!(v.state().end_frame, 1.0);
    run_until_settled(&mut v);
    assert_eq!(v.current_index(), Some(0));
}

#[test]
fn moves_before_ready_do_nothing() {
    let mut v = mk_viewer(ViewerConfig {
        total_frames: 4,
        ..Default::default()
    });
    v.load().unwrap();
    v.pointer_down(0.0);
    v.pointer_move(300.0, 1_000.0);
    assert_eq!(v.state().end_frame, 0.0);
    assert!(!v.state().is_animating());
    assert_eq!(v.gesture_samples(), 0);
}

#[test]
fn press_held_through_readiness_does_not_jump() {
    let mut v = mk_viewer(ViewerConfig {
        total_frames: 4,
        ..Default::default()
    });
    v.load().unwrap();
    v.pointer_down(0.0);
    for i in 0..4 {
        v.frame_loaded(i).unwrap();
    }
    assert!(v.state().is_ready());
    assert!(!v.state().dragging);
    run_until_settled(&mut v);

    v.pointer_move(300.0, 1_000.0);
    assert_eq!(v.gesture_samples(), 0);
    assert_eq!(v.state().end_frame, 0.0);
    assert!(!v.state().is_animating());
}

#[test]
fn fast_moves_are_throttled() {
    let mut v = mk_ready_viewer(ViewerConfig {
        total_frames: 36,
        ..Default::default()
    });
    v.pointer_down(0.0);
    // one move per millisecond for 100 ms
    for t in 0..100 {
        v.pointer_move(t as f64, 10_000.0 + t as f64);
    }
    assert!(v.gesture_samples() <= 10, "{} samples", v.gesture_samples());
    assert!(v.gesture_samples() >= 9);
}

#[test]
fn cancel_ends_the_drag() {
    let mut v = mk_ready_viewer(ViewerConfig {
        total_frames: 36,
        ..Default::default()
    });
    v.pointer_down(0.0);
    assert!(v.state().dragging);
    v.pointer_cancel();
    assert!(!v.state().dragging);
    let before = v.state().end_frame;
    v.pointer_move(200.0, 5_000.0);
    assert_eq!(v.state().end_frame, before);
}

#[test]
fn only_one_timer_while_dragging() {
    let mut v = mk_ready_viewer(ViewerConfig {
        total_frames: 180,
        ..Default::default()
    });
    run_until_settled(&mut v);
    let started_before = v.host().sched.started();

    v.pointer_down(0.0);
    for step in 1..=20 {
        v.pointer_move(step as f64 * 15.0, 1_000.0 + step as f64 * 20.0);
        assert!(v.host().sched.active_count() <= 1);
        v.tick();
    }
    v.pointer_up();
    run_until_settled(&mut v);
    assert_eq!(v.host().sched.started(), started_before + 1);
    assert_eq!(v.host().sched.active_count(), 0);
    assert_eq!(v.frames().count(FrameState::Current), 1);
}

#[test]
fn refresh_is_single_flight() {
    let mut v = mk_ready_viewer(ViewerConfig {
        total_frames: 12,
        ..Default::default()
    });
    run_until_settled(&mut v);
    v.drain_events();

    v.refresh();
    v.refresh();
    assert_eq!(v.host().sched.active_count(), 1);
    assert_eq!(v.drain_events(), vec![ViewerEvent::AnimationStarted]);
    assert_eq!(v.tick(), TickOutcome::Settled { frame: 0 });
    assert_eq!(
        v.drain_events(),
        vec![ViewerEvent::AnimationSettled { frame: 0 }]
    );
    assert_eq!(v.tick(), TickOutcome::Idle);
}

#[test]
fn scheduler_drives_the_loop() {
    let mut v = mk_ready_viewer(ViewerConfig {
        total_frames: 60,
        framerate: 50.0,
        speed_multiplier: 1.0,
        ..Default::default()
    });
    run_until_settled(&mut v);

    v.pointer_down(0.0);
    v.pointer_move(400.0, 1_000.0);
    v.pointer_up();
    let timer = v.state().timer().expect("timer running");
    assert_eq!(v.host().sched.period_of(timer), Some(20));

    // simulate 16 ms host frames
    let mut frames = 0;
    while v.state().is_animating() {
        let due = v.host_mut().sched.advance(16.0);
        for _ in 0..due {
            v.tick();
        }
        frames += 1;
        assert!(frames < 500);
    }
    assert_eq!(v.state().current_frame, 59.0);
    assert_eq!(v.current_index(), Some(59));
}

#[test]
fn previous_frame_marked_before_current() {
    let mut v = mk_ready_viewer(ViewerConfig {
        total_frames: 36,
        zero_based: true,
        speed_multiplier: 1.0,
        ..Default::default()
    });
    run_until_settled(&mut v);
    v.host_mut().states.clear();

    v.pointer_down(0.0);
    // ceil(35 * 40 / 400) = 4
    v.pointer_move(40.0, 1_000.0);
    v.tick();
    assert_eq!(
        v.host().states,
        vec![(0, FrameState::Previous), (1, FrameState::Current)]
    );
}
