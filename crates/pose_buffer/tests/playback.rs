use glam::{Quat, Vec3};

use pose_buffer::{BufferState, InterpolationBuffer, InterpolationMode, PoseSample};

fn lerp_buffer(buffer_time_secs: f64) -> InterpolationBuffer {
    InterpolationBuffer::create(InterpolationMode::Lerp, buffer_time_secs).unwrap()
}

#[test]
fn test_state_progression_never_regresses() {
    let mut buffer = lerp_buffer(0.1);
    assert_eq!(buffer.state(), BufferState::Initializing);

    buffer.append_sample(PoseSample::position(Vec3::ZERO));
    buffer.advance(16.0);
    assert_eq!(buffer.state(), BufferState::Buffering);

    let mut previous = buffer.state();
    for step in 1..20 {
        buffer.set_position(Vec3::X * step as f32, None);
        buffer.advance(16.0);
        assert!(buffer.state() >= previous);
        previous = buffer.state();
    }
    assert_eq!(buffer.state(), BufferState::Playing);

    // no further samples
    for _ in 0..20 {
        buffer.advance(16.0);
        assert_eq!(buffer.state(), BufferState::Playing);
    }
}

#[test]
fn test_buffering_waits_for_window_and_pending_sample() {
    let mut buffer = lerp_buffer(0.1);
    buffer.set_position(Vec3::ZERO, None);
    buffer.advance(200.0);

    // window elapsed but nothing queued behind the origin
    assert_eq!(buffer.state(), BufferState::Buffering);
    buffer.advance(16.0);
    assert_eq!(buffer.state(), BufferState::Buffering);

    buffer.set_position(Vec3::X, None);
    buffer.advance(16.0);
    assert_eq!(buffer.state(), BufferState::Playing);
}

#[test]
fn test_playback_scenario() {
    let mut buffer = lerp_buffer(0.1);
    buffer.append_sample(PoseSample::position(Vec3::ZERO));
    buffer.advance(50.0);
    buffer.append_sample(PoseSample::position(Vec3::new(10.0, 0.0, 0.0)));
    buffer.advance(60.0);

    assert_eq!(buffer.state(), BufferState::Playing);
    assert!((buffer.clock_ms() - 110.0).abs() < 1e-9);
    let x = buffer.position().x;
    assert!(x > 0.0 && x < 10.0, "x = {x}");
}

#[test]
fn test_same_tick_samples_share_one_keyframe() {
    let mut buffer = lerp_buffer(0.1);
    buffer.append_sample(PoseSample::position(Vec3::new(1.0, 0.0, 0.0)));
    buffer.append_sample(PoseSample::position(Vec3::new(2.0, 0.0, 0.0)));

    assert_eq!(buffer.pending_len(), 1);

    buffer.advance(16.0);
    assert_eq!(*buffer.position(), Vec3::new(2.0, 0.0, 0.0));
}

#[test]
fn test_position_only_update_carries_orientation_and_scale() {
    let mut buffer = lerp_buffer(0.05);
    let rotation = Quat::from_rotation_y(0.7);
    buffer.set_target(
        Some(Vec3::ZERO),
        None,
        Some(rotation),
        Some(Vec3::splat(1.5)),
    );
    buffer.advance(20.0);
    buffer.set_position(Vec3::X, None);
    buffer.advance(20.0);
    buffer.set_position(Vec3::X * 2.0, None);
    buffer.advance(20.0);

    for frame in buffer.pending_frames() {
        assert_eq!(frame.orientation, rotation);
        assert_eq!(frame.scale, Vec3::splat(1.5));
    }

    for _ in 0..10 {
        buffer.advance(20.0);
        assert!(buffer.orientation().dot(rotation).abs() > 0.9999);
        assert!((*buffer.scale() - Vec3::splat(1.5)).length() < 1e-4);
    }
}

#[test]
fn test_clock_is_sum_of_deltas_after_initializing() {
    let mut buffer = lerp_buffer(0.1);
    buffer.advance(25.0);
    buffer.advance(25.0);
    assert_eq!(buffer.clock_ms(), 0.0);

    buffer.set_position(Vec3::ZERO, None);
    let deltas = [16.0, 0.0, 33.0, 8.5, 100.0, 16.0];
    let mut previous = buffer.clock_ms();
    for (step, delta) in deltas.iter().enumerate() {
        if step % 2 == 0 {
            buffer.set_position(Vec3::Y * step as f32, None);
        }
        buffer.advance(*delta);
        assert!(buffer.clock_ms() >= previous);
        previous = buffer.clock_ms();
    }

    let total: f64 = deltas.iter().sum();
    assert!((buffer.clock_ms() - total).abs() < 1e-9);
}

#[test]
fn test_lerp_output_stays_between_origin_and_target() {
    let mut buffer = lerp_buffer(0.1);
    let start = Vec3::new(-4.0, 2.0, 8.0);
    let end = Vec3::new(6.0, -3.0, 9.0);
    buffer.set_position(start, None);
    buffer.advance(50.0);
    buffer.set_position(end, None);

    // read time walks from 0 to 50 ms, the span between the two samples
    for _ in 0..10 {
        buffer.advance(10.0);
        if buffer.read_time_ms() < 0.0 || buffer.read_time_ms() > 50.0 {
            continue;
        }
        let p = *buffer.position();
        for axis in 0..3 {
            let lo = start[axis].min(end[axis]) - 1e-4;
            let hi = start[axis].max(end[axis]) + 1e-4;
            assert!(p[axis] >= lo && p[axis] <= hi, "axis {axis}: {}", p[axis]);
        }
    }
}

#[test]
fn test_holds_last_sample_when_feed_stops() {
    let mut buffer = lerp_buffer(0.1);
    let last = Vec3::new(3.0, 4.0, 5.0);
    buffer.set_position(Vec3::ZERO, None);
    buffer.advance(30.0);
    buffer.set_position(Vec3::ONE, None);
    buffer.advance(30.0);
    buffer.set_position(last, None);

    for _ in 0..50 {
        buffer.advance(16.0);
    }

    assert_eq!(buffer.pending_len(), 1);
    assert!((*buffer.position() - last).length() < 1e-4);
    assert!(buffer.pending_frames().next().unwrap().time_ms > buffer.read_time_ms());
}

#[test]
fn test_single_sample_output_is_steady() {
    let mut buffer = lerp_buffer(0.1);
    let sample = Vec3::new(1.0, 1.0, 1.0);
    buffer.set_target(Some(sample), None, Some(Quat::IDENTITY), Some(Vec3::ONE));

    for _ in 0..30 {
        buffer.advance(16.0);
        assert_eq!(*buffer.position(), sample);
        assert_eq!(*buffer.scale(), Vec3::ONE);
    }
}

#[test]
fn test_hermite_mode_tracks_moving_entity() {
    let mut buffer = InterpolationBuffer::create(InterpolationMode::Hermite, 0.1).unwrap();
    assert_eq!(buffer.mode(), InterpolationMode::Hermite);

    // constant 0.01 units per ms, sampled every 50 ms
    let speed = 0.01f32;
    let velocity = Vec3::X * speed;
    let mut clock = 0.0f32;
    for _ in 0..8 {
        buffer.set_position(Vec3::X * clock * speed, Some(velocity));
        for _ in 0..5 {
            buffer.advance(10.0);
        }
        clock += 50.0;
    }

    let expected = buffer.read_time_ms() as f32 * speed;
    assert!((buffer.position().x - expected).abs() < 1e-3);
}

#[test]
fn test_hermite_mode_eases_between_resting_samples() {
    let mut lerp = lerp_buffer(0.1);
    let mut hermite = InterpolationBuffer::create(InterpolationMode::Hermite, 0.1).unwrap();
    for buffer in [&mut lerp, &mut hermite] {
        buffer.set_position(Vec3::ZERO, Some(Vec3::ZERO));
        buffer.advance(50.0);
        buffer.set_position(Vec3::X * 5.0, Some(Vec3::ZERO));
        buffer.advance(62.5);
    }

    // alpha 0.25: linear gives 1.25, zero tangents give 5 * smoothstep(0.25)
    assert!((lerp.position().x - 1.25).abs() < 1e-4);
    assert!((hermite.position().x - 0.78125).abs() < 1e-4);
}

#[test]
fn test_stats_and_pose_serialize() {
    let mut buffer = lerp_buffer(0.1);
    buffer.set_position(Vec3::X, None);
    buffer.advance(16.0);

    let stats = serde_json::to_value(buffer.stats()).unwrap();
    assert_eq!(stats["state"], "buffering");
    assert_eq!(stats["pending_frames"], 0);

    let pose = serde_json::to_string(&buffer.pose()).unwrap();
    let back: pose_buffer::Pose = serde_json::from_str(&pose).unwrap();
    assert_eq!(back, buffer.pose());
}
