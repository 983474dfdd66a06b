//! Integration tests for the backdrop lifecycle.
//!
//! These drive an [`Animator`] through the public test doubles the way a
//! host binding would: frames, timers, resizes and visibility changes.

use std::time::Duration;

use pagefx::field::target_count;
use pagefx::testing::{DrawCommand, ManualHost, RecordingSurface};
use pagefx::{Animator, AnimatorState, FieldConfig, InitSkip, UVec2, RESIZE_DEBOUNCE};

fn create(host: &ManualHost) -> Result<Animator<RecordingSurface>, InitSkip> {
    Animator::create(
        host,
        Some(()),
        |_| Some(RecordingSurface::new()),
        FieldConfig::default().with_seed(11),
    )
}

fn running(host: &mut ManualHost) -> Animator<RecordingSurface> {
    let mut animator = create(host).unwrap();
    animator.start(host);
    animator
}

/// Fire the live frame `n` times.
fn pump(host: &mut ManualHost, animator: &mut Animator<RecordingSurface>, n: usize) {
    for _ in 0..n {
        let frame = host.take_frame().expect("a frame should be pending");
        animator.frame(host, frame);
    }
}

// ============================================================================
// Creation
// ============================================================================

#[test]
fn test_missing_surface_skips_before_anything_else() {
    let host = ManualHost::new(800.0, 600.0).with_reduced_motion(true);
    let mut acquired = false;
    let result = Animator::<RecordingSurface>::create(
        &host,
        None::<()>,
        |_| {
            acquired = true;
            Some(RecordingSurface::new())
        },
        FieldConfig::default(),
    );
    assert_eq!(result.err(), Some(InitSkip::NoSurface));
    assert!(!acquired);
}

#[test]
fn test_reduced_motion_never_touches_context() {
    let host = ManualHost::new(800.0, 600.0).with_reduced_motion(true);
    let mut acquired = false;
    let result = Animator::<RecordingSurface>::create(
        &host,
        Some(()),
        |_| {
            acquired = true;
            Some(RecordingSurface::new())
        },
        FieldConfig::default(),
    );
    assert_eq!(result.err(), Some(InitSkip::ReducedMotion));
    assert!(!acquired);
    assert_eq!(host.frames_requested(), 0);
}

#[test]
fn test_missing_context_is_reported() {
    let host = ManualHost::new(800.0, 600.0);
    let result = Animator::<RecordingSurface>::create(&host, Some(()), |_| None, FieldConfig::default());
    assert_eq!(result.err(), Some(InitSkip::NoContext));
}

#[test]
fn test_created_animator_is_idle_until_started() {
    let host = ManualHost::new(800.0, 600.0);
    let animator = create(&host).unwrap();
    assert_eq!(animator.state(), AnimatorState::Idle);
    assert!(animator.surface().is_untouched());
    assert_eq!(host.frames_requested(), 0);
}

// ============================================================================
// Frames
// ============================================================================

#[test]
fn test_particle_count_follows_viewport_area() {
    for (w, h) in [(320.0, 480.0), (1000.0, 500.0), (1920.0, 1080.0), (0.0, 0.0)] {
        let mut host = ManualHost::new(w, h);
        let animator = running(&mut host);
        let expected = target_count(w as f32, h as f32, FieldConfig::default().density);
        assert_eq!(animator.field().len(), expected, "{}x{}", w, h);
        assert!((18..=120).contains(&expected));
    }
}

#[test]
fn test_particles_stay_within_wrap_margin() {
    let mut host = ManualHost::new(400.0, 300.0);
    let mut animator = running(&mut host);
    pump(&mut host, &mut animator, 500);

    for p in animator.field().particles() {
        assert!(p.position.x >= -10.0 && p.position.x <= 410.0, "{:?}", p.position);
        assert!(p.position.y >= -10.0 && p.position.y <= 310.0, "{:?}", p.position);
    }
}

#[test]
fn test_each_frame_clears_then_presents() {
    let mut host = ManualHost::new(640.0, 480.0);
    let mut animator = running(&mut host);
    animator.surface_mut().take_commands();

    pump(&mut host, &mut animator, 3);
    let commands = animator.surface().commands();
    let clears = commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::Clear { .. }))
        .count();
    assert_eq!(clears, 3);
    assert_eq!(animator.surface().frames_presented(), 3);
    assert_eq!(animator.time().frame(), 3);
}

// ============================================================================
// Visibility
// ============================================================================

#[test]
fn test_hidden_then_visible_keeps_one_schedule() {
    let mut host = ManualHost::new(800.0, 600.0);
    let mut animator = running(&mut host);

    animator.visibility_changed(&mut host, true);
    assert_eq!(animator.state(), AnimatorState::Paused);
    assert!(host.pending_frames().is_empty());

    animator.visibility_changed(&mut host, false);
    animator.visibility_changed(&mut host, false);
    assert!(animator.is_running());
    assert_eq!(host.pending_frames().len(), 1);
    assert_eq!(animator.live_frame(), host.pending_frames().first().copied());
}

#[test]
fn test_visible_while_running_is_noop() {
    let mut host = ManualHost::new(800.0, 600.0);
    let mut animator = running(&mut host);
    let before = host.frames_requested();
    animator.visibility_changed(&mut host, false);
    assert_eq!(host.frames_requested(), before);
}

#[test]
fn test_paused_animator_does_not_draw() {
    let mut host = ManualHost::new(800.0, 600.0);
    let mut animator = running(&mut host);
    animator.visibility_changed(&mut host, true);
    animator.surface_mut().take_commands();
    assert!(host.take_frame().is_none());
    assert!(animator.surface().is_untouched());
    assert!(animator.time().is_paused());
}

// ============================================================================
// Resize
// ============================================================================

#[test]
fn test_resize_burst_rebuilds_once_after_quiet_window() {
    let mut host = ManualHost::new(1400.0, 800.0);
    let mut animator = running(&mut host);
    assert_eq!(animator.field().len(), 95);
    animator.surface_mut().take_commands();

    host.set_viewport(1000.0, 500.0);
    for _ in 0..4 {
        animator.resized(&mut host);
        for timer in host.advance(Duration::from_millis(50)) {
            animator.timer_fired(&mut host, timer);
        }
    }
    assert_eq!(animator.field().len(), 95, "still inside the debounce window");

    let fired = host.advance(Duration::from_millis(120));
    assert_eq!(fired.len(), 1);
    assert!(animator.timer_fired(&mut host, fired[0]));
    assert_eq!(animator.field().len(), 42);
    assert_eq!(
        animator.surface().commands()[0],
        DrawCommand::Resize {
            backing: UVec2::new(1000, 500),
            css: UVec2::new(1000, 500),
        }
    );
}

#[test]
fn test_shrinking_keeps_leading_particles() {
    let mut host = ManualHost::new(1920.0, 1080.0);
    let mut animator = running(&mut host);
    let before: Vec<_> = animator.field().particles()[..42].to_vec();

    host.set_viewport(1000.0, 500.0);
    animator.resized(&mut host);
    let fired = host.advance(RESIZE_DEBOUNCE);
    animator.timer_fired(&mut host, fired[0]);

    let after = animator.field().particles();
    assert_eq!(after.len(), 42);
    for (old, new) in before.iter().zip(after) {
        assert_eq!(old.velocity, new.velocity);
        assert_eq!(old.radius, new.radius);
    }
}

#[test]
fn test_pixel_scale_is_fixed_at_creation() {
    let mut host = ManualHost::new(500.0, 400.0).with_pixel_ratio(1.5);
    let mut animator = running(&mut host);
    animator.surface_mut().take_commands();

    // A later ratio change is not picked up.
    let mut moved = ManualHost::new(500.0, 400.0).with_pixel_ratio(2.0);
    animator.resized(&mut moved);
    let fired = moved.advance(RESIZE_DEBOUNCE);
    animator.timer_fired(&mut moved, fired[0]);

    assert_eq!(animator.scale(), 1.5);
    assert_eq!(animator.surface().commands()[1], DrawCommand::Transform(1.5));
}

// ============================================================================
// Teardown
// ============================================================================

#[test]
fn test_dispose_cancels_everything() {
    let mut host = ManualHost::new(800.0, 600.0);
    let mut animator = running(&mut host);
    animator.resized(&mut host);
    assert_eq!(host.pending_timers(), 1);

    animator.dispose(&mut host);
    assert_eq!(animator.state(), AnimatorState::Disposed);
    assert!(host.pending_frames().is_empty());
    assert_eq!(host.pending_timers(), 0);
    assert!(animator.field().is_empty());

    animator.start(&mut host);
    animator.visibility_changed(&mut host, false);
    animator.resized(&mut host);
    assert_eq!(animator.state(), AnimatorState::Disposed);
    assert!(host.pending_frames().is_empty());
    assert_eq!(host.pending_timers(), 0);
}

#[test]
fn test_stop_then_start_resumes() {
    let mut host = ManualHost::new(800.0, 600.0);
    let mut animator = running(&mut host);
    animator.stop(&mut host);
    assert!(host.pending_frames().is_empty());

    animator.start(&mut host);
    assert!(animator.is_running());
    pump(&mut host, &mut animator, 1);
    assert_eq!(host.pending_frames().len(), 1);
}
